use crate::{
    errors::Error,
    response::Response,
    transport::{BodyFraming, HeadBuffer},
};
use bytes::BytesMut;
use std::fmt::Write;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, instrument, trace, warn};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Outcome {
    /// The body was delimited; the connection can carry another response.
    KeepAlive,
    /// The body ends with the connection, which must be shut down.
    Shutdown,
}

/// Writes responses to a client socket.
///
/// Each body chunk is written as soon as it is produced, so a streamed body
/// is never read ahead of the socket by more than its first chunk.
#[derive(Debug)]
pub struct Connection<W> {
    sock: W,
    wbuf: BytesMut,
}

impl<W> Connection<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(sock: W) -> Self {
        Connection {
            sock,
            wbuf: BytesMut::with_capacity(32),
        }
    }

    #[inline]
    pub fn get_ref(&self) -> &W {
        &self.sock
    }

    #[inline]
    pub fn into_inner(self) -> W {
        self.sock
    }

    #[instrument(name = "send", skip_all, fields(id = %res.id()), err)]
    pub async fn send(&mut self, res: Response) -> Result<Outcome, Error> {
        let mut head = HeadBuffer::new(res.cfg().version);
        let body = res.start(&mut head)?;
        let framing = head.framing().unwrap_or(BodyFraming::CloseDelimited);

        self.sock.write_all(head.as_bytes()).await?;
        trace!(len = head.as_bytes().len(), "head written");

        let mut written = 0u64;
        for chunk in body {
            let chunk = match chunk {
                Ok(c) => c,
                Err(e) => {
                    error!(err = %e, written, "failed to produce body chunk");
                    return Err(e);
                }
            };
            // an empty chunk would read as the last one
            if chunk.is_empty() {
                continue;
            }
            if framing == BodyFraming::Chunked {
                self.wbuf.clear();
                write!(self.wbuf, "{:X}\r\n", chunk.len())?;
                self.sock.write_all(&self.wbuf).await?;
                self.sock.write_all(&chunk).await?;
                self.sock.write_all(b"\r\n").await?;
            } else {
                self.sock.write_all(&chunk).await?;
            }
            written += chunk.len() as u64;
        }

        if framing == BodyFraming::Chunked {
            self.sock.write_all(b"0\r\n\r\n").await?;
        }
        self.sock.flush().await?;

        match framing {
            BodyFraming::ContentLength(n) if n != written => {
                warn!(content_length = n, written, "body size differs from Content-Length");
                Ok(Outcome::Shutdown)
            }
            BodyFraming::CloseDelimited => {
                debug!(written, "close-delimited body sent");
                Ok(Outcome::Shutdown)
            }
            _ => {
                debug!(written, "response sent");
                Ok(Outcome::KeepAlive)
            }
        }
    }

    /// Sends `res`, shutting the socket down when its body needs it.
    pub async fn send_and_settle(&mut self, res: Response) -> Result<Outcome, Error> {
        let outcome = self.send(res).await?;
        if outcome == Outcome::Shutdown {
            trace!("shutting down connection");
            if let Err(e) = self.sock.shutdown().await {
                warn!(err = %e, "socket.shutdown failed");
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Body, ResponseCfg, Scheme};
    use bytes::Bytes;
    use tracing_test::traced_test;

    #[tokio::test]
    async fn test_send_buffered() {
        let mut res = Response::new(ResponseCfg::builder().build(), Scheme::Http);
        res.set_content_type("text/plain");
        res.set_body("hello");

        let mut conn = Connection::new(Vec::new());
        assert_eq!(conn.send(res).await.unwrap(), Outcome::KeepAlive);
        assert_eq!(
            conn.get_ref().as_slice(),
            b"HTTP/1.1 200 Ok\r\nContent-Type: text/plain\r\nContent-Length: 5\r\n\r\nhello"
        );
    }

    #[tokio::test]
    async fn test_send_chunked_stream() {
        let mut res = Response::new(ResponseCfg::builder().build(), Scheme::Http);
        res.set_body(Body::stream(vec!["ab", "", "cde"]));

        let mut conn = Connection::new(Vec::new());
        assert_eq!(conn.send(res).await.unwrap(), Outcome::KeepAlive);
        assert_eq!(
            conn.into_inner(),
            b"HTTP/1.1 200 Ok\r\nTransfer-Encoding: chunked\r\n\r\n2\r\nab\r\n3\r\ncde\r\n0\r\n\r\n"
                .to_vec()
        );
    }

    #[tokio::test]
    async fn test_send_close_delimited() {
        let cfg = ResponseCfg::builder()
            .version(http::Version::HTTP_10)
            .build();
        let mut res = Response::new(cfg, Scheme::Http);
        res.set_body(Body::binary_stream(vec![Bytes::from_static(b"xyz")]));

        let mut conn = Connection::new(Vec::new());
        assert_eq!(conn.send_and_settle(res).await.unwrap(), Outcome::Shutdown);
        assert_eq!(conn.into_inner(), b"HTTP/1.0 200 Ok\r\n\r\nxyz".to_vec());
    }

    #[tokio::test]
    async fn test_send_stream_with_length() {
        let mut res = Response::new(ResponseCfg::builder().build(), Scheme::Http);
        res.set_length(Some(4));
        res.set_body(Body::stream(vec!["ab", "cd"]));

        let mut conn = Connection::new(Vec::new());
        assert_eq!(conn.send(res).await.unwrap(), Outcome::KeepAlive);
        assert_eq!(
            conn.into_inner(),
            b"HTTP/1.1 200 Ok\r\nContent-Length: 4\r\n\r\nabcd".to_vec()
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn test_send_length_mismatch() {
        let mut res = Response::new(ResponseCfg::builder().build(), Scheme::Http);
        res.set_length(Some(10));
        res.set_body("short");

        let mut conn = Connection::new(Vec::new());
        assert_eq!(conn.send(res).await.unwrap(), Outcome::Shutdown);
        assert!(logs_contain("body size differs from Content-Length"));
    }

    #[tokio::test]
    async fn test_send_keeps_framing_single() {
        let mut res = Response::new(ResponseCfg::builder().build(), Scheme::Http);
        assert!(res.headers_mut().add("Transfer-Encoding", "chunked").is_err());
        res.set_body("abc");

        let mut conn = Connection::new(Vec::new());
        assert_eq!(conn.send(res).await.unwrap(), Outcome::KeepAlive);
        assert_eq!(
            conn.into_inner(),
            b"HTTP/1.1 200 Ok\r\nContent-Length: 3\r\n\r\nabc".to_vec()
        );
    }

    #[tokio::test]
    async fn test_send_encode_error() {
        let mut res = Response::new(ResponseCfg::builder().build(), Scheme::Http);
        res.set_charset("us-ascii");
        res.set_body(Body::stream(vec!["ok", "näh"]));

        let mut conn = Connection::new(Vec::new());
        match conn.send(res).await {
            Err(Error::Encode { charset, .. }) => assert_eq!(charset, "us-ascii"),
            r => panic!("unexpected result: {:?}", r),
        }
    }
}
