use crate::{
    common::{BodyStream, Chunk},
    errors::Error,
    response::{Response, ResponseState, StreamEncoding, TextEncoding},
};
use bytes::{Bytes, BytesMut};
use std::{fmt, iter::FusedIterator, vec};
use tracing::{debug, error, trace};

/// Body returned by [`Response::start`], to be written out in order.
#[derive(Debug)]
pub enum ResponseBody {
    Buffered {
        chunks: vec::IntoIter<Bytes>,
        content_length: u64,
    },
    Streamed(ChunkStream),
}

impl ResponseBody {
    #[inline]
    pub fn is_streamed(&self) -> bool {
        matches!(self, Self::Streamed(_))
    }

    /// The value sent as `Content-Length`, if one was sent.
    #[inline]
    pub fn content_length(&self) -> Option<u64> {
        match self {
            Self::Buffered { content_length, .. } => Some(*content_length),
            Self::Streamed(s) => s.res.length(),
        }
    }

    /// Drains the body into one buffer.
    pub fn collect_bytes(self) -> Result<Bytes, Error> {
        let mut buf = BytesMut::new();
        for chunk in self {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }
}

impl Iterator for ResponseBody {
    type Item = Result<Bytes, Error>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Buffered { chunks, .. } => chunks.next().map(Ok),
            Self::Streamed(s) => s.next(),
        }
    }
}

impl FusedIterator for ResponseBody {}

/// Lazily encodes a streamed body.
///
/// The response end hook runs when the underlying stream is exhausted, so it
/// never runs for a stream dropped before its end. After an error the stream
/// yields nothing more.
pub struct ChunkStream {
    res: Response,
    text: TextEncoding,
    first: Option<Bytes>,
    rest: Option<BodyStream>,
    first_is_text: bool,
    sent: u64,
}

impl ChunkStream {
    pub(crate) fn new(
        res: Response,
        text: TextEncoding,
        first: Bytes,
        rest: BodyStream,
        first_is_text: bool,
    ) -> Self {
        Self {
            res,
            text,
            first: Some(first),
            rest: Some(rest),
            first_is_text,
            sent: 0,
        }
    }

    /// The response this stream belongs to.
    #[inline]
    pub fn response(&self) -> &Response {
        &self.res
    }

    fn encode(&self, chunk: Chunk) -> Result<Bytes, Error> {
        if self.res.cfg().stream_encoding == StreamEncoding::FirstChunk
            && chunk.is_text() != self.first_is_text
        {
            return Err(Error::ChunkKindMismatch);
        }
        self.text.encode(chunk)
    }

    fn finish(&mut self) -> Option<Result<Bytes, Error>> {
        self.res.state = ResponseState::Concluded;
        debug!(id = %self.res.id(), sent = self.sent, "stream exhausted");
        match self.res.cfg().observer.on_response_end(&self.res) {
            Ok(()) => None,
            Err(e) => {
                error!(id = %self.res.id(), err = %e, "response end hook failed");
                Some(Err(Error::Hook(e)))
            }
        }
    }
}

impl fmt::Debug for ChunkStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkStream")
            .field("id", &self.res.id())
            .field("first", &self.first)
            .field("finished", &self.rest.is_none())
            .field("sent", &self.sent)
            .finish()
    }
}

impl Iterator for ChunkStream {
    type Item = Result<Bytes, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(first) = self.first.take() {
            self.sent += first.len() as u64;
            return Some(Ok(first));
        }

        let chunk = self.rest.as_mut()?.next();
        match chunk {
            Some(chunk) => match self.encode(chunk) {
                Ok(bytes) => {
                    trace!(len = bytes.len(), "next chunk");
                    self.sent += bytes.len() as u64;
                    Some(Ok(bytes))
                }
                Err(e) => {
                    error!(id = %self.res.id(), err = %e, "failed to encode chunk");
                    self.rest = None;
                    Some(Err(e))
                }
            },
            None => {
                self.rest = None;
                self.finish()
            }
        }
    }
}

impl FusedIterator for ChunkStream {}

impl Drop for ChunkStream {
    fn drop(&mut self) {
        if self.rest.is_some() {
            debug!(id = %self.res.id(), sent = self.sent, "stream dropped before its end");
        }
    }
}
