//! Background polling of the cart slot for out-of-process writers.

use std::time::Duration;

use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::debug;

use crate::domain::carts::{errors::CartSyncError, store::CartStore};

/// Shortest polling period; shorter requests are raised to it.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Handle to a running slot poller.
///
/// Other processes share the slot but not the in-process change channel, so
/// the poller re-announces their writes as [`ViewId::EXTERNAL`] changes.
/// The task stops on [`SlotWatcher::stop`] or when the handle is dropped.
///
/// [`ViewId::EXTERNAL`]: super::ViewId::EXTERNAL
#[derive(Debug)]
pub struct SlotWatcher {
    handle: JoinHandle<()>,
}

impl SlotWatcher {
    pub(crate) fn spawn(store: CartStore, period: Duration) -> Result<Self, CartSyncError> {
        let runtime = Handle::try_current()?;
        let period = period.max(MIN_PERIOD);

        let handle = runtime.spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                store.poll_external_change();
            }
        });

        debug!(?period, "watching cart slot");

        Ok(Self { handle })
    }

    pub fn stop(self) {
        debug!("stopped watching cart slot");
    }
}

impl Drop for SlotWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
