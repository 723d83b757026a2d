use crate::{
    common::{Body, BodyStream, Charset, Chunk, Id, SchemeResolver, RESPONSE_ID},
    errors::{ConfigurationError, Error, HeaderError},
    header::HeaderSet,
    transport::Transport,
};
use bytes::Bytes;
use cds::aformat;
use cookie::Cookie;
use http::StatusCode;
use std::{collections::BTreeMap, fmt, sync::Arc};
use tracing::{debug, error, instrument, trace};

mod config;
mod config_builder;
mod cookie_options;
mod stream;

pub use config::*;
pub use config_builder::*;
pub use cookie_options::*;
pub use stream::*;

pub const DEFAULT_STATUS: &str = "200 Ok";

const CONTENT_TYPE_NAME: &str = "Content-Type";
const CONTENT_LENGTH_NAME: &str = "Content-Length";
const SET_COOKIE_NAME: &str = "Set-Cookie";

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub enum ResponseState {
    #[default]
    Unstarted,
    HeadersCommitted,
    Concluded,
}

/// Outgoing response of a single request.
///
/// Handlers set the status, headers, cookies and body, then the server calls
/// [`start`](Self::start), which commits the head through a [`Transport`]
/// and returns the body to write. A [`Body::Stream`] is delivered lazily, any
/// other body is buffered and sent with a computed `Content-Length`.
pub struct Response {
    id: Id,
    cfg: Arc<ResponseCfg>,
    request: Box<dyn SchemeResolver>,
    status: String,
    charset: Option<String>,
    length: Option<u64>,
    body: Body,
    content_type: Option<String>,
    headers: HeaderSet,
    cookies: BTreeMap<String, Cookie<'static>>,
    state: ResponseState,
}

impl Response {
    pub fn new<R>(cfg: Arc<ResponseCfg>, request: R) -> Self
    where
        R: SchemeResolver + 'static,
    {
        let id = RESPONSE_ID.next();
        trace!(id = %id, "new response");
        Self {
            id,
            charset: cfg.default_charset.clone(),
            cfg,
            request: Box::new(request),
            status: DEFAULT_STATUS.to_owned(),
            length: None,
            body: Body::Empty,
            content_type: None,
            headers: HeaderSet::new(),
            cookies: BTreeMap::new(),
            state: ResponseState::Unstarted,
        }
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub fn cfg(&self) -> &ResponseCfg {
        &self.cfg
    }

    #[inline]
    pub fn state(&self) -> ResponseState {
        self.state
    }

    #[inline]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Sets the status line from a code and its canonical reason phrase.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = match status.canonical_reason() {
            Some(reason) => format!("{} {}", status.as_str(), reason),
            None => status.as_str().to_owned(),
        };
    }

    #[inline]
    pub fn set_status_line(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    #[inline]
    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    #[inline]
    pub fn set_charset(&mut self, charset: impl Into<String>) {
        self.charset = Some(charset.into());
    }

    /// Marks the body as binary: text is no longer encoded with a charset.
    #[inline]
    pub fn set_binary(&mut self) {
        self.charset = None;
    }

    #[inline]
    pub fn length(&self) -> Option<u64> {
        self.length
    }

    /// Overrides the `Content-Length` value. It is never recomputed from the
    /// body once set.
    #[inline]
    pub fn set_length(&mut self, length: Option<u64>) {
        self.length = length;
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    #[inline]
    pub fn set_body(&mut self, body: impl Into<Body>) {
        self.body = body.into();
    }

    /// MIME type without the charset parameter.
    #[inline]
    pub fn mime_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    #[inline]
    pub fn set_content_type(&mut self, mime_type: impl Into<String>) {
        self.content_type = Some(mime_type.into());
    }

    /// `Content-Type` value including the charset parameter, if a MIME type is set.
    pub fn content_type(&self) -> Option<String> {
        let mime_type = self.content_type.as_deref()?;
        match self.charset.as_deref() {
            Some(charset) => Some(format!("{}; charset={}", mime_type, charset)),
            None => Some(mime_type.to_owned()),
        }
    }

    #[inline]
    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    #[inline]
    pub fn headers_mut(&mut self) -> &mut HeaderSet {
        &mut self.headers
    }

    #[inline]
    pub fn cookie(&self, name: &str) -> Option<&Cookie<'static>> {
        self.cookies.get(name)
    }

    #[inline]
    pub fn cookies(&self) -> impl Iterator<Item = &Cookie<'static>> {
        self.cookies.values()
    }

    /// Creates or replaces the cookie `name`.
    ///
    /// A secure cookie requires the request to resolve to https; otherwise the
    /// jar is left untouched and a [`ConfigurationError`] is returned.
    pub fn set_cookie(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        options: CookieOptions,
    ) -> Result<&Cookie<'static>, ConfigurationError> {
        let name = name.into();
        if options.is_secure() {
            let scheme = self.request.resolve_scheme();
            if !scheme.is_https() {
                error!(
                    id = %self.id,
                    name = %name,
                    scheme = %scheme,
                    "secure cookie over insecure request"
                );
                return Err(ConfigurationError { name });
            }
        }

        let mut cookie = Cookie::new(name.clone(), value.into());
        options.apply(&mut cookie);
        trace!(id = %self.id, cookie = %cookie, "set cookie");

        if self.cookies.insert(name.clone(), cookie).is_some() {
            trace!(id = %self.id, name = %name, "replaced cookie");
        }
        Ok(&self.cookies[&name])
    }

    #[inline]
    pub fn remove_cookie(&mut self, name: &str) -> Option<Cookie<'static>> {
        self.cookies.remove(name)
    }

    /// Commits the head and returns the body to transfer.
    ///
    /// The committed headers are the caller's, in insertion order, followed by
    /// `Content-Type`, one `Set-Cookie` per cookie and `Content-Length`.
    #[instrument(name = "response", skip_all, fields(id = %self.id), err)]
    pub fn start<T>(mut self, transport: &mut T) -> Result<ResponseBody, Error>
    where
        T: Transport + ?Sized,
    {
        if let Some(content_type) = self.content_type() {
            check_value(CONTENT_TYPE_NAME, &content_type)?;
            self.headers.push(CONTENT_TYPE_NAME, content_type);
        }

        let lines: Vec<String> = self.cookies.values().map(|c| c.to_string()).collect();
        for line in lines {
            check_value(SET_COOKIE_NAME, &line)?;
            self.headers.push(SET_COOKIE_NAME, line);
        }

        match std::mem::take(&mut self.body) {
            Body::Stream(mut stream) => match stream.next() {
                Some(first) => {
                    debug!(first_is_text = first.is_text(), "streaming response");
                    self.start_stream(first, stream, transport)
                }
                None => {
                    debug!("empty stream, concluding");
                    self.conclude(Body::Empty, transport)
                }
            },
            body => {
                debug!(body = ?body, "buffered response");
                self.conclude(body, transport)
            }
        }
    }

    fn conclude<T>(mut self, body: Body, transport: &mut T) -> Result<ResponseBody, Error>
    where
        T: Transport + ?Sized,
    {
        let chunks: Vec<Chunk> = match body {
            Body::Empty => Vec::new(),
            Body::Text(s) => vec![Chunk::Text(s)],
            Body::Binary(b) => vec![Chunk::Binary(b)],
            Body::Stream(s) => s.collect(),
        };

        let text = TextEncoding::resolve(self.charset.as_deref());
        let chunks = chunks
            .into_iter()
            .map(|c| text.encode(c))
            .collect::<Result<Vec<_>, _>>()?;

        let content_length = match self.length {
            Some(length) => length,
            None => chunks.iter().map(|c| c.len() as u64).sum(),
        };
        trace!(chunks = chunks.len(), content_length, "concluding");
        self.headers
            .push(CONTENT_LENGTH_NAME, aformat!(24, "{}", content_length)?.as_str());

        self.commit(transport)?;
        self.state = ResponseState::Concluded;
        if let Err(e) = self.cfg.observer.on_response_end(&self) {
            error!(err = %e, "response end hook failed");
            return Err(Error::Hook(e));
        }

        Ok(ResponseBody::Buffered {
            chunks: chunks.into_iter(),
            content_length,
        })
    }

    fn start_stream<T>(
        mut self,
        first: Chunk,
        rest: BodyStream,
        transport: &mut T,
    ) -> Result<ResponseBody, Error>
    where
        T: Transport + ?Sized,
    {
        if let Some(length) = self.length {
            self.headers
                .push(CONTENT_LENGTH_NAME, aformat!(24, "{}", length)?.as_str());
        }

        let text = TextEncoding::resolve(self.charset.as_deref());
        let first_is_text = first.is_text();
        let first = text.encode(first)?;

        self.commit(transport)?;
        Ok(ResponseBody::Streamed(ChunkStream::new(
            self,
            text,
            first,
            rest,
            first_is_text,
        )))
    }

    fn commit<T>(&mut self, transport: &mut T) -> Result<(), Error>
    where
        T: Transport + ?Sized,
    {
        debug_assert_eq!(self.state, ResponseState::Unstarted);
        if let Err(e) = transport.commit(&self.status, &self.headers) {
            error!(err = %e, "failed to commit response head");
            return Err(e.into());
        }
        self.state = ResponseState::HeadersCommitted;
        debug!(status = %self.status, headers = self.headers.len(), "head committed");
        Ok(())
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("id", &self.id)
            .field("status", &self.status)
            .field("charset", &self.charset)
            .field("length", &self.length)
            .field("body", &self.body)
            .field("content_type", &self.content_type)
            .field("headers", &self.headers)
            .field("cookies", &self.cookies)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Text encoding of a response, resolved from its charset name once.
///
/// Text is encoded with the charset when one is set and sent as UTF-8
/// otherwise; binary chunks pass through. An unknown name only fails once a
/// text chunk needs it.
#[derive(Debug, Clone)]
pub(crate) enum TextEncoding {
    Utf8,
    Charset(Charset),
    Unknown(String),
}

impl TextEncoding {
    pub(crate) fn resolve(charset: Option<&str>) -> Self {
        match charset {
            None => Self::Utf8,
            Some(name) => match name.parse::<Charset>() {
                Ok(charset) => Self::Charset(charset),
                Err(_) => Self::Unknown(name.to_owned()),
            },
        }
    }

    pub(crate) fn encode(&self, chunk: Chunk) -> Result<Bytes, Error> {
        match (chunk, self) {
            (Chunk::Binary(b), _) => Ok(b),
            (Chunk::Text(s), Self::Utf8) => Ok(Bytes::from(s)),
            (Chunk::Text(s), Self::Charset(charset)) => charset.encode(&s),
            (Chunk::Text(_), Self::Unknown(name)) => Err(Error::UnknownCharset(name.clone())),
        }
    }
}

fn check_value(name: &str, value: &str) -> Result<(), HeaderError> {
    http::HeaderValue::from_str(value)
        .map(|_| ())
        .map_err(|_| HeaderError::BadValue(name.to_owned()))
}
