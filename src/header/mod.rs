mod header_iterator;
mod header_set;

pub use header_iterator::*;
pub use header_set::*;

#[derive(Debug, Clone, Eq, PartialEq)]
#[non_exhaustive]
pub struct Header {
    pub name: String,
    pub value: String,
}
