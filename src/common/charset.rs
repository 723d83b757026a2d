use crate::errors::{Error, UnknownCharsetError};
use bytes::Bytes;
use encoding_rs::{EncoderResult, Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};
use std::fmt::{Display, Formatter};

const US_ASCII_NAME: &str = "us-ascii";

/// Charset a textual body is encoded with.
///
/// Labels resolve through the WHATWG encoding registry, so `cp1252`,
/// `koi8-r` or `shift_jis` all work. `us-ascii` is kept strict instead of
/// being folded into windows-1252.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Charset {
    encoding: &'static Encoding,
    ascii: bool,
}

impl Charset {
    #[inline]
    pub fn utf8() -> Self {
        Self {
            encoding: UTF_8,
            ascii: false,
        }
    }

    #[inline]
    pub fn us_ascii() -> Self {
        Self {
            encoding: WINDOWS_1252,
            ascii: true,
        }
    }

    #[inline]
    pub fn as_str(self) -> &'static str {
        if self.ascii {
            US_ASCII_NAME
        } else {
            self.encoding.name()
        }
    }

    #[inline]
    pub fn encoding(self) -> &'static Encoding {
        self.encoding
    }

    /// Strictly encodes `s`; a character outside the charset is an error.
    pub fn encode(self, s: &str) -> Result<Bytes, Error> {
        if self.ascii {
            return match s.bytes().position(|b| !b.is_ascii()) {
                Some(position) => Err(self.unmappable(position)),
                None => Ok(Bytes::copy_from_slice(s.as_bytes())),
            };
        }

        if self.encoding == UTF_8 {
            return Ok(Bytes::copy_from_slice(s.as_bytes()));
        }
        // encoding_rs only decodes UTF-16; its encoder would emit UTF-8
        if self.encoding == UTF_16LE {
            return Ok(s.encode_utf16().flat_map(u16::to_le_bytes).collect());
        }
        if self.encoding == UTF_16BE {
            return Ok(s.encode_utf16().flat_map(u16::to_be_bytes).collect());
        }

        let mut encoder = self.encoding.new_encoder();
        let mut out = Vec::new();
        let mut read = 0;
        loop {
            let rest = &s[read..];
            let additional = encoder
                .max_buffer_length_from_utf8_without_replacement(rest.len())
                .unwrap_or(rest.len());
            out.reserve(additional);

            let (result, n) =
                encoder.encode_from_utf8_to_vec_without_replacement(rest, &mut out, true);
            read += n;
            match result {
                EncoderResult::InputEmpty => return Ok(Bytes::from(out)),
                EncoderResult::OutputFull => continue,
                EncoderResult::Unmappable(c) => {
                    return Err(self.unmappable(read - c.len_utf8()))
                }
            }
        }
    }

    fn unmappable(self, position: usize) -> Error {
        Error::Encode {
            charset: self.as_str(),
            position,
        }
    }
}

impl Default for Charset {
    #[inline]
    fn default() -> Self {
        Self::utf8()
    }
}

impl std::str::FromStr for Charset {
    type Err = UnknownCharsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        if label.eq_ignore_ascii_case(US_ASCII_NAME) || label.eq_ignore_ascii_case("ascii") {
            return Ok(Self::us_ascii());
        }

        // codec spellings such as `latin_1` or `utf_8`
        let encoding = Encoding::for_label(label.as_bytes())
            .or_else(|| Encoding::for_label(label.replace('_', "-").as_bytes()))
            .or_else(|| Encoding::for_label(label.replace(['_', '-'], "").as_bytes()))
            .ok_or(UnknownCharsetError)?;

        // `replacement` swallows labels of encodings that must not be used
        if encoding == encoding_rs::REPLACEMENT {
            return Err(UnknownCharsetError);
        }
        Ok(Self {
            encoding,
            ascii: false,
        })
    }
}

impl Display for Charset {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cs(label: &str) -> Charset {
        label.parse().unwrap()
    }

    #[test]
    fn test_from_str() {
        assert_eq!(cs("UTF-8"), Charset::utf8());
        assert_eq!(cs("utf8"), Charset::utf8());
        assert_eq!(cs("utf_8"), Charset::utf8());
        assert_eq!(cs("ascii"), Charset::us_ascii());
        assert_eq!(cs("cp1252").as_str(), "windows-1252");
        assert_eq!(cs("Latin-1").as_str(), "windows-1252");
        assert_eq!(cs("koi8_r").as_str(), "KOI8-R");
        assert_eq!(cs(" Shift_JIS ").as_str(), "Shift_JIS");
        assert_eq!(cs("utf-16").as_str(), "UTF-16LE");
        assert!("klingon".parse::<Charset>().is_err());
        assert!("iso-2022-kr".parse::<Charset>().is_err());
    }

    #[test]
    fn test_encode() {
        assert_eq!(Charset::utf8().encode("héllo").unwrap().len(), 6);
        assert_eq!(&cs("iso-8859-1").encode("héllo").unwrap()[..], b"h\xe9llo");
        assert_eq!(&cs("windows-1252").encode("café €").unwrap()[..], b"caf\xe9 \x80");
        assert_eq!(&cs("koi8-r").encode("мир").unwrap()[..], b"\xcd\xc9\xd2");
        assert_eq!(&cs("utf-16").encode("hé").unwrap()[..], b"h\x00\xe9\x00");
        assert_eq!(&cs("utf-16be").encode("hé").unwrap()[..], b"\x00h\x00\xe9");
        assert_eq!(&Charset::us_ascii().encode("hello").unwrap()[..], b"hello");
    }

    #[test]
    fn test_encode_is_strict() {
        match Charset::us_ascii().encode("abé") {
            Err(Error::Encode { charset, position }) => {
                assert_eq!(charset, "us-ascii");
                assert_eq!(position, 2);
            }
            r => panic!("unexpected result: {:?}", r),
        }

        match cs("koi8-r").encode("мир€") {
            Err(Error::Encode { charset, position }) => {
                assert_eq!(charset, "KOI8-R");
                assert_eq!(position, 6);
            }
            r => panic!("unexpected result: {:?}", r),
        }
        assert!(cs("windows-1252").encode("ж").is_err());
    }
}
