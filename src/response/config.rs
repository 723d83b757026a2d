use crate::{
    observer::{NoopObserver, ResponseObserver},
    response::ResponseCfgBuilder,
};
use std::{fmt, sync::Arc};

/// How chunks of a streamed body are turned into bytes when a charset is set.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum StreamEncoding {
    /// Every chunk is encoded according to its own kind.
    #[default]
    PerChunk,
    /// The first chunk's kind applies to the whole stream; a chunk of the
    /// other kind fails with [`Error::ChunkKindMismatch`](crate::Error::ChunkKindMismatch).
    FirstChunk,
}

/// Settings shared by every response of an application.
#[derive(Clone)]
#[non_exhaustive]
pub struct ResponseCfg {
    pub version: http::Version,
    pub default_charset: Option<String>,
    pub stream_encoding: StreamEncoding,
    pub observer: Arc<dyn ResponseObserver>,
}

impl ResponseCfg {
    #[inline]
    pub fn builder() -> ResponseCfgBuilder {
        ResponseCfgBuilder::default()
    }
}

impl Default for ResponseCfg {
    fn default() -> Self {
        Self {
            version: http::Version::HTTP_11,
            default_charset: None,
            stream_encoding: StreamEncoding::default(),
            observer: Arc::new(NoopObserver),
        }
    }
}

impl fmt::Debug for ResponseCfg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseCfg")
            .field("version", &self.version)
            .field("default_charset", &self.default_charset)
            .field("stream_encoding", &self.stream_encoding)
            .finish_non_exhaustive()
    }
}
