use serde::Serialize;
use serde_json::{json, Value as JsonValue};

use crate::{Result, SkytapError};

/// Status code and undecoded body of one API response.
///
/// This is what [`ResponseMode::Raw`](crate::ResponseMode::Raw) yields, and
/// what the backoff poller inspects between attempts.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// Decoded body of a successful API call, shaped by the request's
/// [`ResponseMode`](crate::ResponseMode).
#[derive(Clone, Debug, PartialEq)]
pub enum ApiData {
    Json(JsonValue),
    Bytes(Vec<u8>),
    Text(String),
    Raw(ApiResponse),
    Empty,
}

impl ApiData {
    /// Unwraps the parsed-JSON variant.
    pub fn into_json(self) -> Result<JsonValue> {
        match self {
            Self::Json(value) => Ok(value),
            other => Err(unexpected_variant("json", &other)),
        }
    }

    /// Unwraps the raw-bytes variant.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Self::Bytes(bytes) => Ok(bytes),
            other => Err(unexpected_variant("bytes", &other)),
        }
    }

    /// Unwraps the decoded-text variant.
    pub fn into_text(self) -> Result<String> {
        match self {
            Self::Text(text) => Ok(text),
            other => Err(unexpected_variant("text", &other)),
        }
    }

    /// Unwraps the raw-response variant.
    pub fn into_raw(self) -> Result<ApiResponse> {
        match self {
            Self::Raw(response) => Ok(response),
            other => Err(unexpected_variant("raw", &other)),
        }
    }
}

fn unexpected_variant(wanted: &str, got: &ApiData) -> SkytapError {
    let got = match got {
        ApiData::Json(_) => "json",
        ApiData::Bytes(_) => "bytes",
        ApiData::Text(_) => "text",
        ApiData::Raw(_) => "raw",
        ApiData::Empty => "empty",
    };
    SkytapError::Decode(format!("expected {wanted} response data, got {got}"))
}

/// Attributes for creating a user.
///
/// Every field the API accepts is named here; optional attributes carry the
/// provider's documented defaults.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub login_name: String,
    pub email: String,
    pub title: String,
    pub account_role: String,
    pub time_zone: String,
    pub can_export: bool,
    pub can_import: bool,
    pub has_public_library: bool,
    pub sso_enabled: bool,
}

impl NewUser {
    /// Builds a user from the four required attributes, with defaults for
    /// the rest: standard user role, Pacific time zone, export/import and
    /// public library off, SSO on.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        login_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            login_name: login_name.into(),
            email: email.into(),
            title: String::new(),
            account_role: "standard_user".to_owned(),
            time_zone: "Pacific Time (US & Canada)".to_owned(),
            can_export: false,
            can_import: false,
            has_public_library: false,
            sso_enabled: true,
        }
    }

    /// Query-parameter encoding used by the user-creation endpoint.
    pub(crate) fn to_query(&self) -> Vec<(String, String)> {
        let JsonValue::Object(fields) = json!(self) else {
            return Vec::new();
        };
        fields
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    JsonValue::String(text) => text,
                    other => other.to_string(),
                };
                (name, value)
            })
            .collect()
    }
}

/// Department quota limits. `None` leaves the corresponding limit unset.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct QuotaLimits {
    pub svm_hours: Option<u64>,
    pub concurrent_svms: Option<u64>,
    pub storage: Option<u64>,
    pub concurrent_vms: Option<u64>,
}

impl QuotaLimits {
    /// JSON array body expected by the v2 quotas endpoint.
    pub(crate) fn to_body(&self) -> JsonValue {
        #[derive(Serialize)]
        struct Entry<'a> {
            id: &'a str,
            limit: Option<u64>,
        }
        let entries = [
            Entry { id: "svm_hours", limit: self.svm_hours },
            Entry { id: "concurrent_svms", limit: self.concurrent_svms },
            Entry { id: "storage", limit: self.storage },
            Entry { id: "concurrent_vms", limit: self.concurrent_vms },
        ];
        json!(entries)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ApiData, ApiResponse, NewUser, QuotaLimits};
    use crate::SkytapError;

    #[test]
    fn into_json_on_other_variant_is_decode_error() {
        let data = ApiData::Raw(ApiResponse {
            status: 200,
            body: String::new(),
        });
        let err = data.into_json().expect_err("must fail");
        assert!(matches!(err, SkytapError::Decode(_)));
    }

    #[test]
    fn new_user_defaults() {
        let user = NewUser::new("Ada", "Lovelace", "ada", "ada@example.com");
        assert_eq!(user.account_role, "standard_user");
        assert_eq!(user.time_zone, "Pacific Time (US & Canada)");
        assert!(!user.can_export);
        assert!(user.sso_enabled);
    }

    #[test]
    fn new_user_query_covers_every_field() {
        let query = NewUser::new("Ada", "Lovelace", "ada", "ada@example.com").to_query();
        assert_eq!(query.len(), 11);
        assert!(query.contains(&("login_name".to_owned(), "ada".to_owned())));
        assert!(query.contains(&("sso_enabled".to_owned(), "true".to_owned())));
        assert!(query.contains(&("can_import".to_owned(), "false".to_owned())));
    }

    #[test]
    fn quota_body_keeps_unset_limits_null() {
        let body = QuotaLimits {
            svm_hours: Some(500),
            concurrent_vms: Some(10),
            ..QuotaLimits::default()
        }
        .to_body();
        assert_eq!(
            body,
            json!([
                { "id": "svm_hours", "limit": 500 },
                { "id": "concurrent_svms", "limit": null },
                { "id": "storage", "limit": null },
                { "id": "concurrent_vms", "limit": 10 },
            ])
        );
    }
}
