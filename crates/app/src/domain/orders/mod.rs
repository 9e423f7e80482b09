//! Orders
//!
//! Manual checkout turns the current cart into an order draft and hands it to
//! the backend's order-acceptance endpoint.

pub mod checkout;
pub mod errors;
pub mod models;
pub mod notice;
pub mod service;

pub use checkout::{Checkout, CheckoutForm};
pub use errors::{CheckoutError, OrdersServiceError};
pub use notice::{NOTICE_WINDOW, Notice};
pub use service::*;
