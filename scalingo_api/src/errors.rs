use std::fmt;

use thiserror::Error;

pub type ScalingoResult<T> = Result<T, ScalingoError>;

#[derive(Debug, Error)]
pub enum ScalingoError {
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    #[error("invalid request url")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http transport failed")]
    Http(#[from] reqwest::Error),
    #[error("response decoding failed")]
    Decode(#[from] serde_json::Error),
    #[error("requesting {method} {url} was rejected as unauthorized")]
    Unauthorized { method: String, url: String },
    #[error("requesting {method} {url} has failed with status={status}: {body}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },
    #[error("invalid application name `{0}`")]
    InvalidAppName(String),
}

impl ScalingoError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Status { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    pub fn display_chain(&self) -> DisplayChainedError<'_> {
        DisplayChainedError { inner: self }
    }
}

pub struct DisplayChainedError<'a> {
    inner: &'a (dyn std::error::Error + 'static),
}

impl fmt::Debug for DisplayChainedError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut current: Option<&(dyn std::error::Error + 'static)> = Some(self.inner);

        while let Some(err) = current {
            if first {
                first = false;
            } else {
                write!(f, " -> ")?;
            }

            write!(f, "{err}")?;
            current = err.source();
        }

        Ok(())
    }
}

impl fmt::Display for DisplayChainedError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
