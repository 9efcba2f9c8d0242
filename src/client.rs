use std::fmt;
use std::time::Duration;

use reqwest::{header, multipart};

use crate::{
    ApiData, ApiResponse, ClientOptions, RequestSpec, ResponseMode, Result, SkytapError,
};

#[derive(Clone)]
/// HTTP client for the Skytap REST API.
///
/// Credentials are fixed for the lifetime of the client. Each
/// [`request`](SkytapClient::request) performs exactly one network round
/// trip; retry behavior belongs to [`poll`](crate::poll()).
pub struct SkytapClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    secret: String,
    options: ClientOptions,
}

impl fmt::Debug for SkytapClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkytapClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .field("options", &self.options)
            .finish()
    }
}

impl SkytapClient {
    /// Creates a client for the API at `base_url`, authenticating every
    /// request with HTTP Basic auth from `username` and `secret`.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
            username: username.into(),
            secret: secret.into(),
            options: ClientOptions::default(),
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `SKYTAP_URL` — base API URL (e.g. `https://cloud.skytap.com`)
    /// - `SKYTAP_USER` — account login name
    /// - `SKYTAP_ACCESS_KEY` — API security token
    ///
    /// Returns an error if any variable is missing or empty.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use skytap_http::SkytapClient;
    ///
    /// let skytap = SkytapClient::from_env().expect("missing SKYTAP_* env vars");
    /// ```
    pub fn from_env() -> std::result::Result<Self, String> {
        let base_url = std::env::var("SKYTAP_URL")
            .map_err(|_| "missing SKYTAP_URL environment variable".to_owned())?;
        let username = std::env::var("SKYTAP_USER")
            .map_err(|_| "missing SKYTAP_USER environment variable".to_owned())?;
        let secret = std::env::var("SKYTAP_ACCESS_KEY")
            .map_err(|_| "missing SKYTAP_ACCESS_KEY environment variable".to_owned())?;
        if base_url.trim().is_empty() {
            return Err("SKYTAP_URL is set but empty".to_owned());
        }
        if username.trim().is_empty() {
            return Err("SKYTAP_USER is set but empty".to_owned());
        }
        if secret.trim().is_empty() {
            return Err("SKYTAP_ACCESS_KEY is set but empty".to_owned());
        }
        Ok(Self::new(base_url, username, secret))
    }

    /// Applies client options such as the per-request timeout.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Sends one request described by `spec` and decodes the response
    /// according to its [`ResponseMode`].
    ///
    /// A status outside the spec's acceptable set (default `{200}`) fails
    /// with [`SkytapError::UnexpectedStatus`] carrying the status and body.
    /// This method never retries.
    pub async fn request(&self, spec: RequestSpec) -> Result<ApiData> {
        let RequestSpec {
            method,
            path,
            query,
            body,
            file,
            acceptable,
            mode,
            api_version,
        } = spec;

        let path = path.trim_matches('/');
        let url = format!("{}/{}{}", self.base_url, api_version.path_prefix(), path);

        let mut request = self
            .http
            .request(method, &url)
            .basic_auth(&self.username, Some(&self.secret))
            .header(header::ACCEPT, api_version.accept_header())
            .timeout(Duration::from_millis(self.options.timeout_ms));

        if !query.is_empty() {
            request = request.query(&query);
        }

        if let Some(file) = file {
            // multipart sets its own boundary content type.
            let part = multipart::Part::bytes(file.contents).file_name(file.file_name);
            request = request.multipart(multipart::Form::new().part(file.field, part));
        } else {
            request = request.header(header::CONTENT_TYPE, "application/json");
            if let Some(body) = body {
                let serialized = serde_json::to_string(&body).map_err(|err| {
                    SkytapError::Decode(format!("request body is not serializable: {err}"))
                })?;
                request = request.body(serialized);
            }
        }

        let response = request.send().await.map_err(SkytapError::Transport)?;
        let status = response.status().as_u16();

        let acceptable = acceptable.unwrap_or_else(|| vec![200]);
        if !acceptable.contains(&status) {
            let body = response.text().await.map_err(SkytapError::Transport)?;
            return Err(SkytapError::UnexpectedStatus { status, body });
        }

        match mode {
            ResponseMode::Json => {
                let body = response.text().await.map_err(SkytapError::Transport)?;
                serde_json::from_str(&body).map(ApiData::Json).map_err(|err| {
                    SkytapError::Decode(format!("invalid response JSON: {err}; body: {body}"))
                })
            }
            ResponseMode::Bytes => {
                let bytes = response.bytes().await.map_err(SkytapError::Transport)?;
                Ok(ApiData::Bytes(bytes.to_vec()))
            }
            ResponseMode::Text => {
                let text = response.text().await.map_err(SkytapError::Transport)?;
                Ok(ApiData::Text(text))
            }
            ResponseMode::Raw => {
                let body = response.text().await.map_err(SkytapError::Transport)?;
                Ok(ApiData::Raw(ApiResponse { status, body }))
            }
            ResponseMode::Empty => Ok(ApiData::Empty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SkytapClient;

    #[test]
    fn new_trims_trailing_slashes_off_base_url() {
        let client = SkytapClient::new("https://cloud.skytap.com//", "user", "key");
        let debug = format!("{client:?}");
        assert!(debug.contains("\"https://cloud.skytap.com\""));
    }

    #[test]
    fn debug_redacts_secret() {
        let client = SkytapClient::new("https://cloud.skytap.com", "user", "api-key");
        let debug = format!("{client:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("api-key"));
    }
}
