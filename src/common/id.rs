use cds::aformat;
use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

/// Process-unique response identifier, used to correlate log records.
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Id(pub(crate) u64);

impl Id {
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(aformat!(32, "res-{:X}", self.0)?.as_str())
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(aformat!(32, "Id({:#X})", self.0)?.as_str())
    }
}

#[derive(Debug)]
pub struct IdGenerator {
    gen: AtomicU64,
}

impl IdGenerator {
    #[inline]
    pub const fn new() -> Self {
        Self::with_seed(1)
    }

    #[inline]
    pub const fn with_seed(s: u64) -> Self {
        Self {
            gen: AtomicU64::new(s),
        }
    }

    #[inline]
    pub fn next(&self) -> Id {
        Id(self.gen.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for IdGenerator {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) static RESPONSE_ID: IdGenerator = IdGenerator::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Id(0x2F).to_string(), "res-2F");
        assert_eq!(format!("{:?}", Id(0xABA)), "Id(0xABA)");
    }

    #[test]
    fn test_generator() {
        let g = IdGenerator::with_seed(41);
        assert_eq!(g.next().get(), 41);
        assert_eq!(g.next().get(), 42);

        let a = RESPONSE_ID.next();
        let b = RESPONSE_ID.next();
        assert!(b > a);
    }
}
