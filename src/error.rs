//! Error taxonomy shared by every layer of `ght`.

use thiserror::Error;

/// Errors surfaced by a sync run.
///
/// Everything except [`GhtError::MalformedMarker`] is fatal: the command
/// prints the message and exits non-zero.
#[derive(Debug, Error)]
pub enum GhtError {
    /// Credentials are missing, empty, or rejected by a remote API.
    #[error("{0}")]
    Authentication(String),

    /// The configuration file is missing, unparsable, or names something
    /// that does not exist remotely.
    #[error("{0}")]
    Config(String),

    /// A transport or API failure from GitHub or Todoist.
    #[error("{0}")]
    Upstream(String),

    /// A marker note could not be parsed.
    #[error("Malformed marker note: {0}")]
    MalformedMarker(String),

    /// Command-line parsing failed, or help/version output was requested.
    #[error(transparent)]
    Cli(#[from] clap::Error),

    /// Local I/O failure (cassette files and the like).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GhtError {
    /// Maps an HTTP failure status to the matching error kind.
    ///
    /// 401 and 403 mean the token was rejected; anything else is an
    /// upstream failure.
    #[must_use]
    pub fn from_status(service: &str, status: reqwest::StatusCode, body: &str) -> Self {
        let message = format!("{service} API error ({}): {body}", status.as_u16());
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            Self::Authentication(message)
        } else {
            Self::Upstream(message)
        }
    }

    /// Variant name, stored alongside the message in cassettes.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "Authentication",
            Self::Config(_) => "Config",
            Self::Upstream(_) => "Upstream",
            Self::MalformedMarker(_) => "MalformedMarker",
            Self::Cli(_) => "Cli",
            Self::Io(_) => "Io",
        }
    }

    /// The variant's payload text, without the display prefix.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Authentication(msg)
            | Self::Config(msg)
            | Self::Upstream(msg)
            | Self::MalformedMarker(msg) => msg.clone(),
            Self::Cli(err) => err.to_string(),
            Self::Io(err) => err.to_string(),
        }
    }

    /// Rebuilds an error from [`GhtError::kind`] and [`GhtError::detail`].
    ///
    /// Argument errors cannot be rebuilt and come back as
    /// [`GhtError::Upstream`].
    #[must_use]
    pub fn from_kind(kind: &str, detail: String) -> Self {
        match kind {
            "Authentication" => Self::Authentication(detail),
            "Config" => Self::Config(detail),
            "MalformedMarker" => Self::MalformedMarker(detail),
            "Io" => Self::Io(std::io::Error::other(detail)),
            _ => Self::Upstream(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_status_is_authentication_error() {
        let err = GhtError::from_status("GitHub", reqwest::StatusCode::UNAUTHORIZED, "Bad creds");
        assert!(matches!(err, GhtError::Authentication(_)));
        assert_eq!(err.to_string(), "GitHub API error (401): Bad creds");
    }

    #[test]
    fn kind_and_detail_rebuild_the_same_variant() {
        let original = GhtError::MalformedMarker("line \"x\" has no '='".into());
        let rebuilt = GhtError::from_kind(original.kind(), original.detail());
        assert!(matches!(rebuilt, GhtError::MalformedMarker(_)));
        assert_eq!(rebuilt.to_string(), original.to_string());
    }

    #[test]
    fn server_error_is_upstream_error() {
        let err =
            GhtError::from_status("Todoist", reqwest::StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(matches!(err, GhtError::Upstream(_)));
    }
}
