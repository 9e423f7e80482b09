//! Storefront Domain Concerns

pub mod carts;
pub mod intake;
pub mod orders;
pub mod products;
pub mod recommendations;
