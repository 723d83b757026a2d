use std::{error::Error as StdError, fmt, io};
use thiserror::Error;

pub type HookError = Box<dyn StdError + Send + Sync>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot set secure cookie '{name}' when request scheme is not https")]
#[non_exhaustive]
pub struct ConfigurationError {
    pub name: String,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("unknown charset")]
#[non_exhaustive]
pub struct UnknownCharsetError;

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum HeaderError {
    #[error("bad header name: {0}")]
    BadName(String),
    #[error("bad header value for '{0}'")]
    BadValue(String),
    #[error("'{0}' is set by the response itself")]
    Reserved(String),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("io error: {0}")]
    Transport(#[from] io::Error),
    #[error("fmt error: {0}")]
    Fmt(#[from] fmt::Error),
    #[error(transparent)]
    Header(#[from] HeaderError),
    #[error("unknown charset: {0}")]
    UnknownCharset(String),
    #[error("'{charset}' cannot encode character at byte {position}")]
    Encode {
        charset: &'static str,
        position: usize,
    },
    #[error("streamed chunk kind differs from the first chunk")]
    ChunkKindMismatch,
    #[error("response end hook failed: {0}")]
    Hook(#[source] HookError),
}
