//! Products service.

use async_trait::async_trait;
use mockall::automock;
use tracing::debug;

use crate::{
    backend::BackendClient,
    domain::products::{
        errors::ProductsServiceError,
        models::{Product, Sku},
    },
};

#[derive(Debug, Clone)]
pub struct HttpProductsService {
    client: BackendClient,
}

impl HttpProductsService {
    #[must_use]
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProductsService for HttpProductsService {
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError> {
        let products: Vec<Product> = self.client.get_json("products").await?;

        debug!(count = products.len(), "fetched catalog");

        Ok(products)
    }

    async fn get_product(&self, sku: &Sku) -> Result<Product, ProductsServiceError> {
        self.client
            .get_json(&format!("products/{sku}"))
            .await
            .map_err(Into::into)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves the whole catalog.
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError>;

    /// Retrieve a single product, including its description.
    async fn get_product(&self, sku: &Sku) -> Result<Product, ProductsServiceError>;
}
