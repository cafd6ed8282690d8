//! Error type shared by the validator, the request encoder and the fetch pipeline.

/// An error from query validation, the HTTP transport or the upstream API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A currency code is not exactly three characters long.
    #[error("Invalid currency code")]
    InvalidCode,

    /// A date does not match `YYYY-MM-DD`.
    #[error("Date format must be YYYY-MM-DD (got {date:?})")]
    InvalidDateFormat { date: String },

    /// A date is older than the oldest date the service knows about.
    #[error("Oldest possible date is 1999-01-04")]
    InvalidDate,

    /// The end of a time frame precedes its start.
    #[error("From date must be older than To date")]
    InvalidTimeFrame,

    /// A time frame spans more than the allowed maximum.
    #[error("Maximum allowed timeframe is 365 days")]
    TimeframeExceeded,

    /// The API answered with `"success": false`.
    #[error("Unknown API error: {body}")]
    InvalidApiResponse { body: String },

    /// The HTTP client failed to issue the request or read the response.
    ///
    /// The request URL is stripped, it carries the access key.
    #[error("http error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The response body is not a JSON object.
    #[error("failed to decode response {body:?}: {source}")]
    Decode {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// The response decoded fine but does not have the shape the endpoint expects.
    #[error("unexpected response shape from {endpoint}: {reason}")]
    UnexpectedShape { endpoint: String, reason: String },

    /// An endpoint URL could not be parsed.
    #[error("invalid endpoint url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.without_url())
    }
}

impl Error {
    /// Whether the error was raised before any network I/O because the query itself is invalid.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidCode
                | Error::InvalidDateFormat { .. }
                | Error::InvalidDate
                | Error::InvalidTimeFrame
                | Error::TimeframeExceeded
        )
    }

    pub(crate) fn unexpected_shape(endpoint: &str, reason: impl ToString) -> Self {
        Error::UnexpectedShape {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_flagged() {
        assert!(Error::InvalidCode.is_validation());
        assert!(Error::TimeframeExceeded.is_validation());
        assert!(
            Error::InvalidDateFormat {
                date: "99-1-4".to_string()
            }
            .is_validation()
        );
        assert!(
            !Error::InvalidApiResponse {
                body: "{}".to_string()
            }
            .is_validation()
        );
    }

    #[test]
    fn test_api_error_message_embeds_body() {
        let body = r#"{"success": false, "error": {"code": 101}}"#;
        let err = Error::InvalidApiResponse {
            body: body.to_string(),
        };
        assert!(err.to_string().contains(body));
    }
}
