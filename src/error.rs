use std::error::Error;

use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    Missing(&'static str),
    InvalidUrl {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            ConfigError::Missing(var) => write!(f, "environment variable {} is not set", var),
            ConfigError::InvalidUrl {
                var,
                ref value,
                ref reason,
            } => write!(f, "{} value {} is not a valid URL: {}", var, value, reason),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq)]
pub enum CloudAuthError {
    InvalidPath { path: String, reason: String },
    Unauthorized(String),
    Upstream { context: String, reason: String },
}

impl CloudAuthError {
    pub fn upstream(context: &str, error: impl Display) -> Self {
        CloudAuthError::Upstream {
            context: context.to_string(),
            reason: error.to_string(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match *self {
            CloudAuthError::InvalidPath { .. } => 400,
            CloudAuthError::Unauthorized(_) => 401,
            CloudAuthError::Upstream { .. } => 500,
        }
    }
}

impl Display for CloudAuthError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            CloudAuthError::InvalidPath {
                ref path,
                ref reason,
            } => write!(f, "parse {:?}: {}", path, reason),
            CloudAuthError::Unauthorized(ref path) => {
                write!(f, "{} is not an authorized path", path)
            }
            CloudAuthError::Upstream {
                ref context,
                ref reason,
            } => write!(f, "{}: {}", context, reason),
        }
    }
}

impl Error for CloudAuthError {}

#[derive(Debug)]
pub enum NotifyError {
    Serialize(serde_json::Error),
    Transport(reqwest::Error),
    UnexpectedStatus(u16),
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            NotifyError::Serialize(ref error) => write!(f, "failed to encode payload: {}", error),
            NotifyError::Transport(ref error) => write!(f, "failed to reach webhook: {}", error),
            NotifyError::UnexpectedStatus(status) => write!(f, "received status code {}", status),
        }
    }
}

impl Error for NotifyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            NotifyError::Serialize(ref error) => Some(error),
            NotifyError::Transport(ref error) => Some(error),
            NotifyError::UnexpectedStatus(_) => None,
        }
    }
}

impl From<serde_json::Error> for NotifyError {
    fn from(e: serde_json::Error) -> NotifyError {
        NotifyError::Serialize(e)
    }
}

impl From<reqwest::Error> for NotifyError {
    fn from(e: reqwest::Error) -> NotifyError {
        NotifyError::Transport(e)
    }
}
