//! Cart store and the views attached to it.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    num::NonZeroU32,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use rust_decimal::Decimal;
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tracing::{debug, trace, warn};

use crate::domain::{
    carts::{
        errors::CartSyncError,
        models::{Cart, CartLine},
        slot::CartSlot,
        watcher::SlotWatcher,
    },
    products::models::{Product, Sku},
};

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Identifies the view a change notification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(u64);

impl ViewId {
    /// Origin used for changes written by something outside this process.
    pub const EXTERNAL: Self = Self(0);
}

impl Display for ViewId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if *self == Self::EXTERNAL {
            f.write_str("external")
        } else {
            write!(f, "view-{}", self.0)
        }
    }
}

/// "Cart changed" notification. Receivers re-read the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartChanged {
    pub origin: ViewId,
}

/// Process-wide owner of the cart slot and the change channel.
///
/// Cloning is cheap and every clone refers to the same store.
#[derive(Debug, Clone)]
pub struct CartStore {
    inner: Arc<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    slot: Arc<dyn CartSlot>,
    sender: broadcast::Sender<CartChanged>,
    next_view: AtomicU64,

    /// Raw snapshot this process last wrote or observed.
    last_seen: Mutex<Option<String>>,
}

impl CartStore {
    pub fn new(slot: impl CartSlot + 'static) -> Self {
        Self::from_slot(Arc::new(slot))
    }

    #[must_use]
    pub fn from_slot(slot: Arc<dyn CartSlot>) -> Self {
        let (sender, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        let last_seen = slot.read().ok().flatten();

        Self {
            inner: Arc::new(StoreInner {
                slot,
                sender,
                next_view: AtomicU64::new(1),
                last_seen: Mutex::new(last_seen),
            }),
        }
    }

    /// Register a new view, restored from the slot.
    #[must_use]
    pub fn attach(&self) -> CartView {
        let id = ViewId(self.inner.next_view.fetch_add(1, Ordering::Relaxed));

        // Subscribe before restoring so no write slips between the two.
        let receiver = self.inner.sender.subscribe();
        let cart = self.restore();

        debug!(view = %id, lines = cart.len(), "attached cart view");

        CartView {
            id,
            store: self.clone(),
            cart,
            receiver,
        }
    }

    /// Number of currently attached views.
    #[must_use]
    pub fn view_count(&self) -> usize {
        self.inner.sender.receiver_count()
    }

    /// Read the persisted cart.
    ///
    /// A missing, unreadable or malformed slot yields an empty cart.
    #[must_use]
    pub fn restore(&self) -> Cart {
        let snapshot = match self.inner.slot.read() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return Cart::new(),
            Err(error) => {
                warn!(slot = self.inner.slot.name(), %error, "failed to read cart slot");

                return Cart::new();
            }
        };

        match Cart::decode(&snapshot) {
            Ok(cart) => cart,
            Err(error) => {
                warn!(slot = self.inner.slot.name(), %error, "discarding malformed cart snapshot");

                Cart::new()
            }
        }
    }

    /// Start polling the slot for writes made outside this process.
    ///
    /// # Errors
    ///
    /// Returns [`CartSyncError::NoRuntime`] when called outside a Tokio
    /// runtime.
    pub fn watch_slot(&self, period: Duration) -> Result<SlotWatcher, CartSyncError> {
        SlotWatcher::spawn(self.clone(), period)
    }

    /// Persist `cart` and announce the change. Failures are logged only.
    fn commit(&self, cart: &Cart, origin: ViewId) {
        let snapshot = match cart.encode() {
            Ok(snapshot) => snapshot,
            Err(error) => {
                warn!(view = %origin, %error, "failed to encode cart snapshot");

                return;
            }
        };

        if let Err(error) = self.inner.slot.write(&snapshot) {
            warn!(view = %origin, slot = self.inner.slot.name(), %error, "failed to persist cart");

            return;
        }

        *self.last_seen() = Some(snapshot);

        self.notify(origin);
    }

    fn notify(&self, origin: ViewId) {
        match self.inner.sender.send(CartChanged { origin }) {
            Ok(receivers) => trace!(view = %origin, receivers, "broadcast cart change"),
            Err(_) => trace!(view = %origin, "no views attached"),
        }
    }

    /// Broadcast an external change if the slot differs from what this
    /// process last wrote or observed. Returns whether it did.
    pub(crate) fn poll_external_change(&self) -> bool {
        let current = match self.inner.slot.read() {
            Ok(current) => current,
            Err(error) => {
                warn!(slot = self.inner.slot.name(), %error, "failed to poll cart slot");

                return false;
            }
        };

        {
            let mut last_seen = self.last_seen();

            if *last_seen == current {
                return false;
            }

            *last_seen = current;
        }

        debug!(slot = self.inner.slot.name(), "cart slot changed externally");

        self.notify(ViewId::EXTERNAL);

        true
    }

    fn last_seen(&self) -> MutexGuard<'_, Option<String>> {
        self.inner
            .last_seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// One observer of the shared cart with its own local copy.
///
/// Mutations apply to the local copy, then the full snapshot is written to
/// the slot and announced. Incoming notifications are only applied by
/// [`CartView::sync`] or [`CartView::changed`], which replace the local copy
/// with whatever the slot holds (last writer wins).
#[derive(Debug)]
pub struct CartView {
    id: ViewId,
    store: CartStore,
    cart: Cart,
    receiver: broadcast::Receiver<CartChanged>,
}

impl CartView {
    #[must_use]
    pub fn id(&self) -> ViewId {
        self.id
    }

    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cart.total()
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.cart.item_count()
    }

    /// Add one unit of `product`, then persist and notify.
    ///
    /// Returns `None` without persisting when the cart total would overflow.
    pub fn add_item(&mut self, product: &Product) -> Option<NonZeroU32> {
        let Some(quantity) = self.cart.add(product) else {
            warn!(view = %self.id, sku = %product.sku, "cart total would overflow, item not added");

            return None;
        };

        debug!(view = %self.id, sku = %product.sku, quantity = quantity.get(), "added item to cart");

        self.store.commit(&self.cart, self.id);

        Some(quantity)
    }

    /// Remove the line for `sku`. Absent SKUs leave everything untouched.
    pub fn remove_item(&mut self, sku: &Sku) -> bool {
        if !self.cart.remove(sku) {
            trace!(view = %self.id, %sku, "sku not in cart");

            return false;
        }

        debug!(view = %self.id, %sku, "removed item from cart");

        self.store.commit(&self.cart, self.id);

        true
    }

    /// Empty the cart, then persist and notify.
    pub fn clear(&mut self) {
        self.cart.clear();

        debug!(view = %self.id, "cleared cart");

        self.store.commit(&self.cart, self.id);
    }

    /// Replace the local copy with the persisted cart.
    pub fn restore(&mut self) {
        self.cart = self.store.restore();
    }

    /// Apply pending notifications from other views.
    ///
    /// Returns `true` when the local copy was replaced.
    pub fn sync(&mut self) -> bool {
        let mut stale = false;

        loop {
            match self.receiver.try_recv() {
                Ok(CartChanged { origin }) => stale |= origin != self.id,
                Err(TryRecvError::Lagged(skipped)) => {
                    trace!(view = %self.id, skipped, "cart view lagged");

                    stale = true;
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }

        if stale {
            self.restore();
        }

        stale
    }

    /// Wait for the next change made by another view, then restore.
    ///
    /// # Errors
    ///
    /// Returns [`CartSyncError::Closed`] if the change channel is gone.
    pub async fn changed(&mut self) -> Result<CartChanged, CartSyncError> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.origin == self.id => {}
                Ok(event) => {
                    self.restore();

                    return Ok(event);
                }
                Err(RecvError::Lagged(skipped)) => {
                    trace!(view = %self.id, skipped, "cart view lagged");

                    self.restore();

                    return Ok(CartChanged {
                        origin: ViewId::EXTERNAL,
                    });
                }
                Err(RecvError::Closed) => return Err(CartSyncError::Closed),
            }
        }
    }

    /// Unregister from the store.
    pub fn detach(self) {
        debug!(view = %self.id, "detached cart view");
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::{
        domain::carts::slot::{FileCartSlot, MemoryCartSlot},
        test::fixtures::product,
    };

    fn skus(view: &CartView) -> Vec<&str> {
        view.lines().iter().map(|line| line.sku().as_str()).collect()
    }

    #[test]
    fn attach_restores_empty_cart_from_empty_slot() {
        let store = CartStore::new(MemoryCartSlot::default());
        let view = store.attach();

        assert!(view.is_empty());
        assert_eq!(view.total(), Decimal::ZERO);
    }

    #[test]
    fn attach_restores_empty_cart_from_malformed_slot() -> TestResult {
        let slot = MemoryCartSlot::default();
        slot.write("{definitely not a cart")?;

        let store = CartStore::new(slot);
        let view = store.attach();

        assert!(view.is_empty());

        Ok(())
    }

    #[test]
    fn attach_restores_empty_cart_when_total_overflows() -> TestResult {
        let slot = MemoryCartSlot::default();
        slot.write(
            r#"[{"sku":"A","item_name":"Alpha","price":1e28,"stock":1,"image_url":"a.png","quantity":10}]"#,
        )?;

        let store = CartStore::new(slot);
        let view = store.attach();

        assert!(view.is_empty());
        assert_eq!(view.total(), Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn overflowing_add_is_not_persisted_or_announced() -> TestResult {
        let slot = MemoryCartSlot::default();
        let store = CartStore::new(slot.clone());
        let mut writer = store.attach();
        let mut observer = store.attach();
        let costly = product("A", "Alpha", Decimal::from_scientific("4e28")?);

        assert!(writer.add_item(&costly).is_some());
        assert!(observer.sync());

        let persisted = slot.read()?;

        assert_eq!(writer.add_item(&costly), None);
        assert_eq!(slot.read()?, persisted);
        assert!(!observer.sync());
        assert_eq!(writer.total(), Decimal::from_scientific("4e28")?);

        Ok(())
    }

    #[test]
    fn adding_same_sku_again_increments_quantity() {
        let store = CartStore::new(MemoryCartSlot::default());
        let mut view = store.attach();
        let a = product("A", "Alpha", Decimal::from(10));

        view.add_item(&a);
        view.add_item(&a);

        assert_eq!(view.lines().len(), 1);
        assert_eq!(view.lines().first().map(|line| line.quantity.get()), Some(2));
        assert_eq!(view.total(), Decimal::from(20));
    }

    #[test]
    fn every_mutation_is_persisted() -> TestResult {
        let slot = MemoryCartSlot::default();
        let store = CartStore::new(slot.clone());
        let mut view = store.attach();
        let a = product("A", "Alpha", Decimal::from(10));
        let b = product("B", "Beta", Decimal::from(5));

        view.add_item(&a);
        view.add_item(&b);
        assert_eq!(Cart::decode(&slot.read()?.ok_or("slot empty")?)?, *view.cart());

        view.remove_item(&a.sku);
        assert_eq!(Cart::decode(&slot.read()?.ok_or("slot empty")?)?, *view.cart());

        view.clear();
        assert_eq!(slot.read()?.as_deref(), Some("[]"));

        Ok(())
    }

    #[test]
    fn removing_absent_sku_does_not_write_or_notify() -> TestResult {
        let slot = MemoryCartSlot::default();
        let store = CartStore::new(slot.clone());
        let mut writer = store.attach();
        let mut observer = store.attach();

        assert!(!writer.remove_item(&Sku::from("missing")));
        assert_eq!(slot.read()?, None);
        assert!(!observer.sync());

        Ok(())
    }

    #[test]
    fn other_views_converge_after_sync() {
        let store = CartStore::new(MemoryCartSlot::default());
        let mut catalog = store.attach();
        let mut panel = store.attach();

        catalog.add_item(&product("A", "Alpha", Decimal::from(10)));

        assert!(panel.is_empty());
        assert!(panel.sync());
        assert_eq!(skus(&panel), vec!["A"]);
        assert_eq!(panel.cart(), catalog.cart());
    }

    #[test]
    fn view_ignores_its_own_notifications() {
        let store = CartStore::new(MemoryCartSlot::default());
        let mut view = store.attach();

        view.add_item(&product("A", "Alpha", Decimal::from(10)));

        assert!(!view.sync());
        assert_eq!(skus(&view), vec!["A"]);
    }

    #[test]
    fn concurrent_writers_lose_updates_last_writer_wins() {
        let store = CartStore::new(MemoryCartSlot::default());
        let mut first = store.attach();
        let mut second = store.attach();

        first.add_item(&product("A", "Alpha", Decimal::from(10)));
        second.sync();

        first.add_item(&product("B", "Beta", Decimal::from(1)));
        second.add_item(&product("C", "Gamma", Decimal::from(2)));

        let persisted: Vec<_> = store
            .restore()
            .lines()
            .iter()
            .map(|line| line.sku().to_string())
            .collect();

        assert_eq!(persisted, vec!["A", "C"]);

        // The first view keeps its optimistic copy until it syncs.
        assert_eq!(skus(&first), vec!["A", "B"]);
        assert!(first.sync());
        assert_eq!(skus(&first), vec!["A", "C"]);
    }

    #[test]
    fn detaching_unregisters_the_view() {
        let store = CartStore::new(MemoryCartSlot::default());
        let first = store.attach();
        let second = store.attach();

        assert_eq!(store.view_count(), 2);

        first.detach();
        assert_eq!(store.view_count(), 1);

        drop(second);
        assert_eq!(store.view_count(), 0);
    }

    #[test]
    fn mutations_without_views_still_persist() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = CartStore::new(FileCartSlot::new(dir.path(), "cart"));

        let mut view = store.attach();
        view.add_item(&product("A", "Alpha", Decimal::from(3)));
        view.detach();

        let reopened = CartStore::new(FileCartSlot::new(dir.path(), "cart"));

        assert_eq!(reopened.restore().total(), Decimal::from(3));

        Ok(())
    }

    #[test]
    fn lagged_view_restores_once() {
        let store = CartStore::new(MemoryCartSlot::default());
        let mut writer = store.attach();
        let mut reader = store.attach();
        let a = product("A", "Alpha", Decimal::from(1));

        for _ in 0..(CHANGE_CHANNEL_CAPACITY * 2) {
            writer.add_item(&a);
        }

        assert!(reader.sync());
        assert_eq!(reader.cart(), writer.cart());
    }

    #[tokio::test]
    async fn changed_resolves_on_foreign_write() -> TestResult {
        let store = CartStore::new(MemoryCartSlot::default());
        let mut writer = store.attach();
        let mut watcher = store.attach();

        writer.add_item(&product("A", "Alpha", Decimal::from(1)));
        writer.add_item(&product("B", "Beta", Decimal::from(1)));

        let event = watcher.changed().await?;

        assert_eq!(event.origin, writer.id());
        assert_eq!(skus(&watcher), vec!["A", "B"]);

        Ok(())
    }

    #[tokio::test]
    async fn changed_skips_own_writes() -> TestResult {
        let store = CartStore::new(MemoryCartSlot::default());
        let mut view = store.attach();
        let mut other = store.attach();

        view.add_item(&product("A", "Alpha", Decimal::from(1)));
        other.add_item(&product("B", "Beta", Decimal::from(1)));

        let event = view.changed().await?;

        assert_eq!(event.origin, other.id());
        assert_eq!(skus(&view), vec!["B"]);

        Ok(())
    }

    #[test]
    fn poll_external_change_ignores_own_writes() -> TestResult {
        let slot = MemoryCartSlot::default();
        let store = CartStore::new(slot.clone());
        let mut view = store.attach();
        let mut observer = store.attach();

        view.add_item(&product("A", "Alpha", Decimal::from(1)));
        observer.sync();

        assert!(!store.poll_external_change());

        let mut outside = Cart::new();
        outside.add(&product("Z", "Zeta", Decimal::from(9)));
        slot.write(&outside.encode()?)?;

        assert!(store.poll_external_change());
        assert!(!store.poll_external_change());
        assert!(view.sync());
        assert_eq!(skus(&view), vec!["Z"]);

        Ok(())
    }

    #[test]
    fn view_ids_render_readably() {
        assert_eq!(ViewId::EXTERNAL.to_string(), "external");
        assert_eq!(ViewId(3).to_string(), "view-3");
    }
}
