use crate::{
    errors::HeaderError,
    header::{Header, HeaderIterator},
};
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, TRANSFER_ENCODING};

/// Ordered header multimap.
///
/// Names keep the case they were inserted with and may repeat; lookups are
/// case-insensitive. `Content-Type`, `Content-Length` and
/// `Transfer-Encoding` decide how the body is framed; the response and its
/// transport own them and they cannot be added here.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct HeaderSet {
    pub(crate) vec: Vec<Header>,
}

impl HeaderSet {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), HeaderError> {
        let (name, value) = (name.into(), value.into());
        validate(&name, &value)?;
        if is_reserved(&name) {
            return Err(HeaderError::Reserved(name));
        }
        self.vec.push(Header { name, value });
        Ok(())
    }

    /// Removes every `name` entry, then adds one.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), HeaderError> {
        let (name, value) = (name.into(), value.into());
        validate(&name, &value)?;
        if is_reserved(&name) {
            return Err(HeaderError::Reserved(name));
        }
        self.remove(&name);
        self.vec.push(Header { name, value });
        Ok(())
    }

    /// Appends without the reserved-name check. Used by the response itself.
    #[inline]
    pub(crate) fn push(&mut self, name: &str, value: impl Into<String>) {
        self.vec.push(Header {
            name: name.to_owned(),
            value: value.into(),
        });
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vec
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    pub fn get_all<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s str> + 's {
        self.vec
            .iter()
            .filter(move |h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns how many entries were removed.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.vec.len();
        self.vec.retain(|h| !h.name.eq_ignore_ascii_case(name));
        before - self.vec.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vec.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> HeaderIterator<'_> {
        HeaderIterator {
            iter: self.vec.iter(),
        }
    }
}

impl<'a> IntoIterator for &'a HeaderSet {
    type Item = (&'a str, &'a str);
    type IntoIter = HeaderIterator<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn validate(name: &str, value: &str) -> Result<(), HeaderError> {
    if http::HeaderName::from_bytes(name.as_bytes()).is_err() {
        return Err(HeaderError::BadName(name.to_owned()));
    }
    if http::HeaderValue::from_str(value).is_err() {
        return Err(HeaderError::BadValue(name.to_owned()));
    }
    Ok(())
}

#[inline]
fn is_reserved(name: &str) -> bool {
    name.eq_ignore_ascii_case(CONTENT_TYPE.as_str())
        || name.eq_ignore_ascii_case(CONTENT_LENGTH.as_str())
        || name.eq_ignore_ascii_case(TRANSFER_ENCODING.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_and_duplicates() {
        let mut hs = HeaderSet::new();
        hs.add("X-Foo", "1").unwrap();
        hs.add("Vary", "Accept").unwrap();
        hs.add("x-foo", "2").unwrap();

        let all: Vec<_> = hs.iter().collect();
        assert_eq!(all, vec![("X-Foo", "1"), ("Vary", "Accept"), ("x-foo", "2")]);
        assert_eq!(hs.get("X-FOO"), Some("1"));
        assert_eq!(hs.get_all("x-foo").collect::<Vec<_>>(), vec!["1", "2"]);
        assert_eq!(hs.len(), 3);
    }

    #[test]
    fn test_set_replaces() {
        let mut hs = HeaderSet::new();
        hs.add("Cache-Control", "no-cache").unwrap();
        hs.add("Cache-Control", "no-store").unwrap();
        hs.set("cache-control", "max-age=60").unwrap();
        assert_eq!(
            hs.iter().collect::<Vec<_>>(),
            vec![("cache-control", "max-age=60")]
        );
        assert_eq!(hs.remove("Cache-Control"), 1);
        assert!(hs.is_empty());
    }

    #[test]
    fn test_rejects() {
        let mut hs = HeaderSet::new();
        assert_eq!(
            hs.add("content-length", "5"),
            Err(HeaderError::Reserved("content-length".into()))
        );
        assert_eq!(
            hs.set("Content-Type", "text/plain"),
            Err(HeaderError::Reserved("Content-Type".into()))
        );
        assert_eq!(
            hs.add("Transfer-Encoding", "chunked"),
            Err(HeaderError::Reserved("Transfer-Encoding".into()))
        );
        assert_eq!(
            hs.set("transfer-encoding", "gzip, chunked"),
            Err(HeaderError::Reserved("transfer-encoding".into()))
        );
        assert_eq!(
            hs.add("bad name", "v"),
            Err(HeaderError::BadName("bad name".into()))
        );
        assert_eq!(
            hs.add("X-Foo", "a\r\nb"),
            Err(HeaderError::BadValue("X-Foo".into()))
        );
        assert!(hs.is_empty());
    }
}
