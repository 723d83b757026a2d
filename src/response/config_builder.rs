use crate::{
    observer::ResponseObserver,
    response::{ResponseCfg, StreamEncoding},
};
use std::sync::Arc;

#[derive(Debug, Default)]
#[non_exhaustive]
pub struct ResponseCfgBuilder {
    cfg: ResponseCfg,
}

impl ResponseCfgBuilder {
    /// HTTP version written in the status line of committed heads.
    #[inline]
    pub fn version(mut self, version: http::Version) -> Self {
        self.cfg.version = version;
        self
    }

    #[inline]
    pub fn default_charset(mut self, charset: impl Into<String>) -> Self {
        self.cfg.default_charset = Some(charset.into());
        self
    }

    #[inline]
    pub fn stream_encoding(mut self, stream_encoding: StreamEncoding) -> Self {
        self.cfg.stream_encoding = stream_encoding;
        self
    }

    #[inline]
    pub fn observer<O>(mut self, observer: O) -> Self
    where
        O: ResponseObserver + 'static,
    {
        self.cfg.observer = Arc::new(observer);
        self
    }

    #[inline]
    pub fn build(self) -> Arc<ResponseCfg> {
        Arc::new(self.cfg)
    }
}
