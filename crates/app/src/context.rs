//! App Context

use std::sync::Arc;

use crate::{
    backend::{BackendClient, BackendConfig},
    config::StorefrontConfig,
    domain::{
        carts::{slot::FileCartSlot, store::CartStore},
        intake::{ExtractionService, HttpExtractionService, Intake},
        orders::{Checkout, HttpOrdersService, OrdersService},
        products::{HttpProductsService, ProductsService},
        recommendations::{HttpRecommendationsService, RecommendationsService},
    },
};

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub orders: Arc<dyn OrdersService>,
    pub extraction: Arc<dyn ExtractionService>,
    pub recommendations: Arc<dyn RecommendationsService>,
    pub carts: CartStore,
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// The cart slot is read once here, as the baseline for detecting writes
    /// from other processes; views re-read it when they attach. The backend
    /// is not contacted until the first request.
    #[must_use]
    pub fn from_config(config: &StorefrontConfig) -> Self {
        let client = BackendClient::new(BackendConfig::from(&config.api));
        let slot = FileCartSlot::new(&config.cart.cart_dir, &config.cart.cart_slot);

        Self {
            products: Arc::new(HttpProductsService::new(client.clone())),
            orders: Arc::new(HttpOrdersService::new(client.clone())),
            extraction: Arc::new(HttpExtractionService::new(client.clone())),
            recommendations: Arc::new(HttpRecommendationsService::new(client)),
            carts: CartStore::new(slot),
        }
    }

    #[must_use]
    pub fn checkout(&self) -> Checkout {
        Checkout::new(Arc::clone(&self.orders))
    }

    #[must_use]
    pub fn intake(&self) -> Intake {
        Intake::new(Arc::clone(&self.extraction), Arc::clone(&self.orders))
    }
}
