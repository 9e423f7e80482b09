//! Manual checkout of the current cart.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use jiff::Timestamp;
use rand::Rng;
use tracing::{error, info, warn};

use crate::domain::{
    carts::{models::Cart, store::CartView},
    orders::{
        errors::CheckoutError,
        models::{OrderDraft, OrderLine},
        notice::Notice,
        service::OrdersService,
    },
};

/// Exclusive upper bound of client-generated order ids.
const ORDER_ID_RANGE: u32 = 10_000;

/// Customer details entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub email: String,
    pub is_priority: bool,
}

impl CheckoutForm {
    /// Client-side checks only: no email format validation.
    ///
    /// # Errors
    ///
    /// Returns the first unmet requirement.
    pub fn validate(&self, cart: &Cart) -> Result<(), CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        if self.customer_name.trim().is_empty() {
            return Err(CheckoutError::MissingCustomerName);
        }

        if self.email.trim().is_empty() {
            return Err(CheckoutError::MissingEmail);
        }

        Ok(())
    }

    /// Whether submission should be enabled for `cart`.
    #[must_use]
    pub fn can_submit(&self, cart: &Cart) -> bool {
        self.validate(cart).is_ok()
    }
}

impl OrderDraft {
    /// Flatten `cart` into an order draft.
    #[must_use]
    pub fn from_cart(cart: &Cart, form: &CheckoutForm, order_id: u32) -> Self {
        Self {
            order_id,
            customer_name: form.customer_name.clone(),
            email: form.email.clone(),
            price: cart.total(),
            is_priority: form.is_priority,
            items: cart.lines().iter().map(OrderLine::from).collect(),
        }
    }
}

/// Random, non-durable order id. Collisions are possible and accepted.
#[must_use]
pub fn random_order_id() -> u32 {
    rand::thread_rng().gen_range(0..ORDER_ID_RANGE)
}

/// Checkout flow with its "in progress" indicator.
#[derive(Clone)]
pub struct Checkout {
    orders: Arc<dyn OrdersService>,
    in_progress: Arc<AtomicBool>,
}

impl std::fmt::Debug for Checkout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checkout")
            .field("in_progress", &self.is_in_progress())
            .finish_non_exhaustive()
    }
}

impl Checkout {
    #[must_use]
    pub fn new(orders: Arc<dyn OrdersService>) -> Self {
        Self {
            orders,
            in_progress: Arc::default(),
        }
    }

    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    /// Submit the cart held by `view`.
    ///
    /// On an accepted order the cart is cleared (which persists and announces
    /// the empty cart) and a success notice is returned.
    ///
    /// # Errors
    ///
    /// Returns an error when validation fails, another submission is still
    /// outstanding, the backend cannot be reached or it does not accept the
    /// order. The cart is left untouched in all of these cases.
    pub async fn submit(
        &self,
        view: &mut CartView,
        form: &CheckoutForm,
    ) -> Result<Notice, CheckoutError> {
        let _guard = InProgress::acquire(&self.in_progress)?;

        form.validate(view.cart())?;

        let draft = OrderDraft::from_cart(view.cart(), form, random_order_id());

        let ack = self.orders.submit_order(&draft).await.map_err(|source| {
            error!(order_id = draft.order_id, error = %source, "checkout failed");

            CheckoutError::from(source)
        })?;

        if !ack.is_success() {
            warn!(order_id = draft.order_id, status = %ack.status, "order not accepted");

            return Err(CheckoutError::Rejected(ack.message));
        }

        view.clear();

        info!(order_id = draft.order_id, total = %draft.price, "checkout complete");

        Ok(Notice::new(ack.message, Timestamp::now()))
    }
}

/// Holds the in-progress flag for the lifetime of one submission.
struct InProgress<'a>(&'a AtomicBool);

impl<'a> InProgress<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, CheckoutError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_already_running| CheckoutError::InProgress)?;

        Ok(Self(flag))
    }
}

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
