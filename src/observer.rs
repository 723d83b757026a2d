use crate::{errors::HookError, response::Response};

mod observer_fn;
pub use observer_fn::*;

pub type HookResult = Result<(), HookError>;

/// Application-wide observer of completed responses.
///
/// A buffered response notifies the observer right after its head is
/// committed. A streamed response notifies it only once the returned body has
/// been drained to the end; a body dropped early never notifies.
pub trait ResponseObserver: Send + Sync {
    fn on_response_end(&self, res: &Response) -> HookResult;
}

#[derive(Debug, Copy, Clone, Default)]
pub struct NoopObserver;

impl ResponseObserver for NoopObserver {
    #[inline]
    fn on_response_end(&self, _res: &Response) -> HookResult {
        Ok(())
    }
}
