//! Errors surfaced by the `curlflags` binary and their exit codes.
//!
//! Exit codes follow curl's numbering where a counterpart exists, so
//! scripts written against curl keep working.

use curlflags_core::Error as CoreError;

use crate::transport::TransportError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Writing the response failed.
    #[error("failed writing output: {0}")]
    Output(#[from] std::io::Error),

    /// `--fail` and the server answered with an error status.
    #[error("the requested URL returned error: {0}")]
    HttpStatus(u16),
}

impl CliError {
    /// Curl-compatible process exit code.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Core(err) | CliError::Transport(TransportError::Request(err)) => match err {
                CoreError::MissingRequiredFields => 2,
                CoreError::InvalidUrl { .. } | CoreError::InvalidUri { .. } => 3,
                CoreError::InvalidProxy { .. } => 5,
                CoreError::InvalidHeader { .. } | CoreError::InvalidMethod(_) => 43,
            },
            CliError::Transport(TransportError::Http(err)) => match err {
                ureq::Error::Timeout(_) => 28,
                ureq::Error::HostNotFound => 6,
                _ => 7,
            },
            CliError::Output(_) => 23,
            CliError::HttpStatus(_) => 22,
        }
    }

    /// Extra line printed under the error message, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            CliError::Core(CoreError::MissingRequiredFields) => {
                Some("specify --request and --url (or pass the URL as an argument)")
            }
            _ => None,
        }
    }
}
