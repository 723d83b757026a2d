use std::fmt::{Display, Formatter};

static SCHEME_NAME: [&str; 2] = ["http", "https"];

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Default)]
pub enum Scheme {
    #[default]
    Http = 0,
    Https = 1,
}

impl Scheme {
    #[inline]
    pub fn as_str(self) -> &'static str {
        SCHEME_NAME[self as usize]
    }

    #[inline]
    pub fn is_https(self) -> bool {
        self == Self::Https
    }
}

impl Display for Scheme {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Decides whether the client's original connection was secured.
pub trait SchemeResolver: Send {
    fn resolve_scheme(&self) -> Scheme;
}

/// What the transport knows about the incoming request's connection.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct RequestContext {
    /// Scheme of the connection the server accepted.
    pub url_scheme: Scheme,
    /// Value of the `HTTPS` flag set by the front server, if any.
    pub https: Option<String>,
    /// Raw `X-Forwarded-Proto` header, if any.
    pub forwarded_proto: Option<String>,
}

impl RequestContext {
    #[inline]
    pub fn new(url_scheme: Scheme) -> Self {
        Self {
            url_scheme,
            ..Default::default()
        }
    }

    #[inline]
    pub fn with_https_flag(mut self, flag: impl Into<String>) -> Self {
        self.https = Some(flag.into());
        self
    }

    #[inline]
    pub fn with_forwarded_proto(mut self, proto: impl Into<String>) -> Self {
        self.forwarded_proto = Some(proto.into());
        self
    }
}

impl SchemeResolver for RequestContext {
    fn resolve_scheme(&self) -> Scheme {
        // the proxy closest to the client is listed first
        if let Some(proto) = self
            .forwarded_proto
            .as_deref()
            .and_then(|p| p.split(',').next())
            .map(str::trim)
            .filter(|p| !p.is_empty())
        {
            return if proto.eq_ignore_ascii_case("https") {
                Scheme::Https
            } else {
                Scheme::Http
            };
        }

        if let Some(flag) = self.https.as_deref().map(str::trim) {
            if ["on", "yes", "1"].iter().any(|v| flag.eq_ignore_ascii_case(v)) {
                return Scheme::Https;
            }
        }

        self.url_scheme
    }
}

impl SchemeResolver for Scheme {
    #[inline]
    fn resolve_scheme(&self) -> Scheme {
        *self
    }
}
