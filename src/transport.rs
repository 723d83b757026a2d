use crate::header::HeaderSet;
use std::io;

mod connection;
mod head_buffer;

pub use connection::*;
pub use head_buffer::*;

/// Header-commit primitive of the layer below the response.
///
/// Called exactly once per response, before any body byte is produced.
pub trait Transport {
    fn commit(&mut self, status: &str, headers: &HeaderSet) -> io::Result<()>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    #[inline]
    fn commit(&mut self, status: &str, headers: &HeaderSet) -> io::Result<()> {
        (**self).commit(status, headers)
    }
}
