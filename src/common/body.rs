use bytes::Bytes;
use std::fmt;

/// A lazily produced, single-pass sequence of body chunks.
pub type BodyStream = Box<dyn Iterator<Item = Chunk> + Send>;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Chunk {
    /// Text, encoded with the response charset before it is sent.
    Text(String),
    /// Bytes that are already encoded.
    Binary(Bytes),
}

impl Chunk {
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    #[inline]
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary(_))
    }
}

impl From<String> for Chunk {
    #[inline]
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&'static str> for Chunk {
    #[inline]
    fn from(s: &'static str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<Bytes> for Chunk {
    #[inline]
    fn from(b: Bytes) -> Self {
        Self::Binary(b)
    }
}

impl From<Vec<u8>> for Chunk {
    #[inline]
    fn from(b: Vec<u8>) -> Self {
        Self::Binary(Bytes::from(b))
    }
}

/// Response body. A `Stream` is delivered incrementally even when it holds a
/// single chunk; every other variant is buffered.
#[derive(Default)]
pub enum Body {
    #[default]
    Empty,
    Text(String),
    Binary(Bytes),
    Stream(BodyStream),
}

impl Body {
    pub fn stream<I>(iter: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Chunk> + 'static,
        I::IntoIter: Send + 'static,
    {
        Self::Stream(Box::new(iter.into_iter().map(Into::into)))
    }

    pub fn text_stream<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = String>,
        I::IntoIter: Send + 'static,
    {
        Self::Stream(Box::new(iter.into_iter().map(Chunk::Text)))
    }

    pub fn binary_stream<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Bytes>,
        I::IntoIter: Send + 'static,
    {
        Self::Stream(Box::new(iter.into_iter().map(Chunk::Binary)))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[inline]
    pub fn is_stream(&self) -> bool {
        matches!(self, Self::Stream(_))
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::Binary(b) => f.debug_tuple("Binary").field(b).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<String> for Body {
    #[inline]
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&'static str> for Body {
    #[inline]
    fn from(s: &'static str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<Bytes> for Body {
    #[inline]
    fn from(b: Bytes) -> Self {
        Self::Binary(b)
    }
}

impl From<Vec<u8>> for Body {
    #[inline]
    fn from(b: Vec<u8>) -> Self {
        Self::Binary(Bytes::from(b))
    }
}
