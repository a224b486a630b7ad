use reqwest::StatusCode;
use serde_json::{Map, Value};

/// A user as exchanged with the remote resource. The server owns the shape.
pub type UserRecord = Map<String, Value>;

/// Server-assigned user identifier.
pub type UserId = u64;

/// Result of a single resource operation.
///
/// `NotFound` is kept apart from `Failed` so callers can tell an empty
/// result from an error. [`Outcome::unwrap_or_empty`] collapses both into
/// the empty value when the cause does not matter.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    NotFound,
    Failed(Failure),
}

/// Why an operation did not succeed.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// The server answered with a status the operation does not accept.
    Status(StatusCode),
    /// No response was received.
    Transport(String),
    /// The request could not be built, so nothing was sent.
    Request(String),
    /// The response body was not the expected JSON.
    Decode(String),
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Failure::Status(status) => write!(f, "unexpected status {}", status),
            Failure::Transport(msg) => write!(f, "request error: {}", msg),
            Failure::Request(msg) => write!(f, "invalid request: {}", msg),
            Failure::Decode(msg) => write!(f, "invalid response body: {}", msg),
        }
    }
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            _ => None,
        }
    }
}

impl<T: Default> Outcome<T> {
    /// The success value, or `T::default()` (empty list, empty record) otherwise.
    pub fn unwrap_or_empty(self) -> T {
        self.ok().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_or_empty() {
        let found: Outcome<Vec<UserRecord>> = Outcome::Success(vec![UserRecord::new()]);
        assert_eq!(found.unwrap_or_empty().len(), 1);

        let missing: Outcome<Vec<UserRecord>> = Outcome::NotFound;
        assert!(missing.unwrap_or_empty().is_empty());

        let failed: Outcome<UserRecord> = Outcome::Failed(Failure::Status(StatusCode::BAD_GATEWAY));
        assert!(failed.unwrap_or_empty().is_empty());
    }

    #[test]
    fn test_failure_display() {
        assert_eq!(
            Failure::Status(StatusCode::INTERNAL_SERVER_ERROR).to_string(),
            "unexpected status 500 Internal Server Error"
        );
        assert!(Failure::Transport("refused".into()).to_string().contains("refused"));
        assert!(Failure::Decode("eof".into()).to_string().starts_with("invalid response body"));
    }

    #[test]
    fn test_is_success() {
        assert!(Outcome::Success(()).is_success());
        assert!(!Outcome::<()>::NotFound.is_success());
    }
}
