use cookie::{time::OffsetDateTime, Cookie, SameSite};

/// Attributes applied to a cookie by [`Response::set_cookie`](crate::Response::set_cookie).
///
/// Unset fields leave the attribute out of the `Set-Cookie` line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct CookieOptions {
    pub secure: Option<bool>,
    /// Seconds; written as the `Max-Age` attribute.
    pub max_age: Option<i64>,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub http_only: Option<bool>,
    pub same_site: Option<SameSite>,
    pub expires: Option<OffsetDateTime>,
    pub partitioned: Option<bool>,
}

impl CookieOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    #[inline]
    pub fn max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    #[inline]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[inline]
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[inline]
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = Some(http_only);
        self
    }

    #[inline]
    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    #[inline]
    pub fn expires(mut self, expires: OffsetDateTime) -> Self {
        self.expires = Some(expires);
        self
    }

    #[inline]
    pub fn partitioned(mut self, partitioned: bool) -> Self {
        self.partitioned = Some(partitioned);
        self
    }

    #[inline]
    pub fn is_secure(&self) -> bool {
        self.secure == Some(true)
    }

    pub(crate) fn apply(self, cookie: &mut Cookie<'static>) {
        if let Some(secure) = self.secure {
            cookie.set_secure(secure);
        }
        if let Some(seconds) = self.max_age {
            cookie.set_max_age(cookie::time::Duration::seconds(seconds));
        }
        if let Some(path) = self.path {
            cookie.set_path(path);
        }
        if let Some(domain) = self.domain {
            cookie.set_domain(domain);
        }
        if let Some(http_only) = self.http_only {
            cookie.set_http_only(http_only);
        }
        if let Some(same_site) = self.same_site {
            cookie.set_same_site(same_site);
        }
        if let Some(expires) = self.expires {
            cookie.set_expires(expires);
        }
        if let Some(partitioned) = self.partitioned {
            cookie.set_partitioned(partitioned);
        }
    }
}
