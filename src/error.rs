/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum SkytapError {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// HTTP status outside the caller's acceptable set, with raw body.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    /// API version string that is not one of the supported versions.
    #[error("unsupported API version '{0}'")]
    UnsupportedApiVersion(String),
    /// Backoff poll exhausted its try budget without a non-retryable status.
    #[error("polling '{operation}' exceeded {tries} tries (last status {})", display_status(.last_status))]
    RetriesExceeded {
        /// Human-readable description of the polled operation.
        operation: String,
        /// Number of attempts made.
        tries: usize,
        /// Status code of the final attempt, if any attempt was made.
        last_status: Option<u16>,
    },
    /// Response decoding or response-shape validation error.
    #[error("decode error: {0}")]
    Decode(String),
}

fn display_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "none".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::SkytapError;

    #[test]
    fn retries_exceeded_message_names_operation_and_status() {
        let err = SkytapError::RetriesExceeded {
            operation: "delete published service".to_owned(),
            tries: 10,
            last_status: Some(423),
        };
        let message = err.to_string();
        assert!(message.contains("delete published service"));
        assert!(message.contains("10 tries"));
        assert!(message.contains("423"));
    }

    #[test]
    fn retries_exceeded_without_attempts_prints_none() {
        let err = SkytapError::RetriesExceeded {
            operation: "noop".to_owned(),
            tries: 0,
            last_status: None,
        };
        assert!(err.to_string().contains("last status none"));
    }
}
