use std::str::FromStr;

use reqwest::Method;
use serde_json::Value as JsonValue;

use crate::SkytapError;

/// Skytap REST API version.
///
/// `V2` rewrites the request path with a `v2/` prefix and switches the
/// accept header to the versioned vendor media type.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ApiVersion {
    #[default]
    V1,
    V2,
}

impl ApiVersion {
    /// Value sent in the `accept` header for this version.
    pub fn accept_header(self) -> &'static str {
        match self {
            Self::V1 => "application/json",
            Self::V2 => "application/vnd.skytap.api.v2+json",
        }
    }

    pub(crate) fn path_prefix(self) -> &'static str {
        match self {
            Self::V1 => "",
            Self::V2 => "v2/",
        }
    }
}

impl FromStr for ApiVersion {
    type Err = SkytapError;

    /// Parses `"v1"` / `"v2"`; anything else is a configuration error,
    /// surfaced before any request is built.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v1" => Ok(Self::V1),
            "v2" => Ok(Self::V2),
            other => Err(SkytapError::UnsupportedApiVersion(other.to_owned())),
        }
    }
}

/// How a successful response body is interpreted.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ResponseMode {
    /// Parse the body as JSON.
    #[default]
    Json,
    /// Return the raw body bytes.
    Bytes,
    /// Decode the body as text.
    Text,
    /// Return the status code together with the undecoded body text.
    Raw,
    /// Discard the body. Delete-style operations answer with no content.
    Empty,
}

/// Multipart file payload attached to a request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileUpload {
    /// Multipart field name.
    pub field: String,
    /// File name reported to the server.
    pub file_name: String,
    /// File contents.
    pub contents: Vec<u8>,
}

impl FileUpload {
    pub fn new(
        field: impl Into<String>,
        file_name: impl Into<String>,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            contents: contents.into(),
        }
    }
}

/// One API request: the method, the resource-relative path, and everything
/// else the dispatcher needs to send it. Built per call, never reused.
#[derive(Clone, Debug)]
pub struct RequestSpec {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<JsonValue>,
    pub(crate) file: Option<FileUpload>,
    pub(crate) acceptable: Option<Vec<u16>>,
    pub(crate) mode: ResponseMode,
    pub(crate) api_version: ApiVersion,
}

impl RequestSpec {
    /// Creates a request with the given method and resource path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            file: None,
            acceptable: None,
            mode: ResponseMode::default(),
            api_version: ApiVersion::default(),
        }
    }

    /// Creates a `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a `POST` request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Creates a `PUT` request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Creates a `DELETE` request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Appends query parameters.
    pub fn query<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets the JSON body. Absent bodies put no bytes on the wire.
    pub fn body(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Attaches a multipart file payload.
    pub fn file(mut self, file: FileUpload) -> Self {
        self.file = Some(file);
        self
    }

    /// Overrides the acceptable status codes (default `{200}`).
    pub fn accept(mut self, codes: impl Into<Vec<u16>>) -> Self {
        self.acceptable = Some(codes.into());
        self
    }

    /// Sets the response interpretation mode (default [`ResponseMode::Json`]).
    pub fn mode(mut self, mode: ResponseMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the API version (default [`ApiVersion::V1`]).
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = version;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiVersion, RequestSpec, ResponseMode};
    use crate::SkytapError;

    #[test]
    fn api_version_parses_known_versions() {
        assert_eq!("v1".parse::<ApiVersion>().unwrap(), ApiVersion::V1);
        assert_eq!("v2".parse::<ApiVersion>().unwrap(), ApiVersion::V2);
    }

    #[test]
    fn api_version_rejects_unknown_version() {
        let err = "v3".parse::<ApiVersion>().expect_err("must fail");
        match err {
            SkytapError::UnsupportedApiVersion(version) => assert_eq!(version, "v3"),
            other => panic!("expected unsupported version error, got {other:?}"),
        }
    }

    #[test]
    fn accept_header_varies_by_version() {
        assert_eq!(ApiVersion::V1.accept_header(), "application/json");
        assert_eq!(
            ApiVersion::V2.accept_header(),
            "application/vnd.skytap.api.v2+json"
        );
    }

    #[test]
    fn spec_defaults() {
        let spec = RequestSpec::get("configurations/1");
        assert!(spec.query.is_empty());
        assert!(spec.body.is_none());
        assert!(spec.file.is_none());
        assert!(spec.acceptable.is_none());
        assert_eq!(spec.mode, ResponseMode::Json);
        assert_eq!(spec.api_version, ApiVersion::V1);
    }

    #[test]
    fn builder_sets_fields() {
        let spec = RequestSpec::delete("configurations/1")
            .query([("runstate", "stopped")])
            .accept([200, 409, 423])
            .mode(ResponseMode::Raw)
            .api_version(ApiVersion::V2);
        assert_eq!(spec.query, vec![("runstate".to_owned(), "stopped".to_owned())]);
        assert_eq!(spec.acceptable.as_deref(), Some(&[200, 409, 423][..]));
        assert_eq!(spec.mode, ResponseMode::Raw);
        assert_eq!(spec.api_version, ApiVersion::V2);
    }
}
