use crate::{header::HeaderSet, transport::Transport};
use bytes::BytesMut;
use http::Version;
use std::io::{self, ErrorKind};
use tracing::trace;

const CRLF: &[u8] = b"\r\n";

/// How the receiver finds the end of the body.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BodyFraming {
    ContentLength(u64),
    Chunked,
    CloseDelimited,
}

impl BodyFraming {
    fn detect(headers: &HeaderSet, version: Version) -> io::Result<Self> {
        if let Some(value) = headers.get("content-length") {
            let n = value
                .trim()
                .parse()
                .map_err(|e| io::Error::new(ErrorKind::InvalidInput, e))?;
            return Ok(Self::ContentLength(n));
        }

        if version == Version::HTTP_11 {
            return Ok(Self::Chunked);
        }

        Ok(Self::CloseDelimited)
    }
}

/// Renders an HTTP/1.x response head into a buffer.
///
/// A head without `Content-Length` gets `Transfer-Encoding: chunked` on
/// HTTP/1.1 and is close-delimited on HTTP/1.0.
#[derive(Debug)]
pub struct HeadBuffer {
    version: Version,
    wbuf: BytesMut,
    framing: Option<BodyFraming>,
}

impl HeadBuffer {
    pub fn new(version: Version) -> Self {
        Self {
            version,
            wbuf: BytesMut::with_capacity(512),
            framing: None,
        }
    }

    #[inline]
    pub fn is_committed(&self) -> bool {
        self.framing.is_some()
    }

    /// `None` until a head was committed.
    #[inline]
    pub fn framing(&self) -> Option<BodyFraming> {
        self.framing
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.wbuf
    }

    #[inline]
    pub fn into_inner(self) -> BytesMut {
        self.wbuf
    }
}

impl Transport for HeadBuffer {
    fn commit(&mut self, status: &str, headers: &HeaderSet) -> io::Result<()> {
        if self.is_committed() {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                "response head already committed",
            ));
        }

        let version: &[u8] = match self.version {
            Version::HTTP_10 => b"HTTP/1.0",
            Version::HTTP_11 => b"HTTP/1.1",
            _ => return Err(io::Error::new(ErrorKind::InvalidInput, "unimplemented")),
        };

        let framing = BodyFraming::detect(headers, self.version)?;

        self.wbuf.clear();
        self.wbuf.extend_from_slice(version);
        self.wbuf.extend_from_slice(b" ");
        self.wbuf.extend_from_slice(status.as_bytes());
        self.wbuf.extend_from_slice(CRLF);
        write_headers(&mut self.wbuf, headers);
        if framing == BodyFraming::Chunked {
            self.wbuf.extend_from_slice(b"Transfer-Encoding: chunked\r\n");
        }
        self.wbuf.extend_from_slice(CRLF);

        trace!(len = self.wbuf.len(), framing = ?framing, "rendered response head");
        self.framing = Some(framing);
        Ok(())
    }
}

fn write_headers(buf: &mut BytesMut, headers: &HeaderSet) {
    for (k, v) in headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(CRLF);
    }
}
