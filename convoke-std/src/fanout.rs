//! Fan-out and aggregation.
//!
//! Every handler is invoked synchronously, back to back, before anything is
//! awaited. Empty replies are dropped at that point; the remaining replies
//! are then awaited concurrently and collected in invocation order.

use convoke_core::{DispatchError, DispatchFuture, Handler, Payload, Reply, Response, Token};
use futures::future::{self, BoxFuture, FutureExt};
use std::sync::Arc;

type Slot = BoxFuture<'static, Result<Vec<Response>, DispatchError>>;

/// Invoke `handlers` with `payload` and aggregate their replies.
///
/// The returned future waits for every kept reply to settle. If any of them
/// failed, the dispatch fails with the first failure in invocation order.
pub fn fan_out<I>(payload: &Payload, handlers: I) -> DispatchFuture
where
    I: IntoIterator<Item = (Token, Arc<dyn Handler>)>,
{
    let mut invoked = 0usize;
    let slots: Vec<Slot> = handlers
        .into_iter()
        .filter_map(|(token, handler)| {
            invoked += 1;
            slot(token, handler.call(payload))
        })
        .collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(invoked, kept = slots.len(), "fanned out payload");
    #[cfg(not(feature = "tracing"))]
    let _ = invoked;

    async move {
        let mut results = Vec::with_capacity(slots.len());
        for settled in future::join_all(slots).await {
            match settled {
                Ok(batch) => results.extend(batch),
                Err(err) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(error = %err, "dispatch failed");
                    return Err(err);
                }
            }
        }
        Ok(results)
    }
    .boxed()
}

fn slot(token: Token, reply: Reply) -> Option<Slot> {
    let slot = match reply {
        Reply::Empty => return None,
        Reply::Ready(response) => future::ready(Ok(vec![response])).boxed(),
        Reply::Pending(pending) => pending
            .map(move |res| {
                res.map(|response| vec![response])
                    .map_err(|err| DispatchError::from_handler(token, err))
            })
            .boxed(),
        Reply::Batch(batch) => batch
            .map(move |res| res.map_err(|err| DispatchError::from_handler(token, err)))
            .boxed(),
    };
    Some(slot)
}
