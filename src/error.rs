use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    InvalidEncoding(std::str::Utf8Error),
    UnknownPreset(String),
    InvalidSeparator(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::InvalidEncoding(err) => write!(f, "invalid UTF-8 input: {err}"),
            Self::UnknownPreset(name) => write!(f, "unknown preset `{name}`"),
            Self::InvalidSeparator(raw) => {
                write!(f, "separator must be exactly one character, got `{raw}`")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::InvalidEncoding(err) => Some(err),
            Self::UnknownPreset(_) | Self::InvalidSeparator(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(value: std::str::Utf8Error) -> Self {
        Self::InvalidEncoding(value)
    }
}
