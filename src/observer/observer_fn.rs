use crate::{
    observer::{HookResult, ResponseObserver},
    response::Response,
};
use std::fmt;

pub struct ObserverFn<F>
where
    F: Fn(&Response) -> HookResult + Send + Sync,
{
    on_response_end: F,
}

impl<F> ResponseObserver for ObserverFn<F>
where
    F: Fn(&Response) -> HookResult + Send + Sync,
{
    #[inline]
    fn on_response_end(&self, res: &Response) -> HookResult {
        (self.on_response_end)(res)
    }
}

impl<F> fmt::Debug for ObserverFn<F>
where
    F: Fn(&Response) -> HookResult + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverFn").finish_non_exhaustive()
    }
}

#[inline]
pub fn observer_fn<F>(on_response_end: F) -> ObserverFn<F>
where
    F: Fn(&Response) -> HookResult + Send + Sync,
{
    ObserverFn { on_response_end }
}
