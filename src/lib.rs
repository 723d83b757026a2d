pub(crate) mod common;
pub(crate) mod errors;
pub mod header;
pub mod observer;
pub mod response;
pub mod transport;

pub use common::*;
pub use cookie::{self, Cookie, SameSite};
pub use errors::*;
pub use observer::{observer_fn, ResponseObserver};
pub use response::{
    CookieOptions, Response, ResponseBody, ResponseCfg, ResponseState, StreamEncoding,
};
pub use transport::{Connection, HeadBuffer, Transport};
