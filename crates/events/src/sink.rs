//! Small sink adapters: closures and a discard sink.

use core::convert::Infallible;
use core::marker::PhantomData;

use crate::bus::EventSink;

/// Wraps a closure as a sink.
///
/// Useful for wiring the ledger into an existing dispatcher without a bus.
pub struct CallbackSink<M, F> {
    callback: F,
    _message: PhantomData<fn(M)>,
}

impl<M, F> CallbackSink<M, F>
where
    F: Fn(M) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self {
            callback,
            _message: PhantomData,
        }
    }
}

impl<M, F> core::fmt::Debug for CallbackSink<M, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CallbackSink").finish_non_exhaustive()
    }
}

impl<M, F> EventSink<M> for CallbackSink<M, F>
where
    F: Fn(M) + Send + Sync,
{
    type Error = Infallible;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (self.callback)(message);
        Ok(())
    }
}

/// Discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl<M> EventSink<M> for NullSink {
    type Error = Infallible;

    fn publish(&self, _message: M) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn callback_sink_invokes_closure_per_message() {
        let seen = Mutex::new(Vec::new());
        let sink = CallbackSink::new(|m: &'static str| seen.lock().unwrap().push(m));

        sink.publish("a").unwrap();
        sink.publish("b").unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["a", "b"]);
    }
}
