//! Product Models

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stock-keeping unit, the unique and stable key of a product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    /// Wrap a raw SKU string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw SKU string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Sku {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for Sku {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Sku {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Product Model
///
/// Catalog entries are owned by the backend; the client never mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub sku: Sku,
    pub item_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Advisory only, never checked against cart quantities.
    pub stock: u32,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Product {
    /// Case-insensitive match of `query` against the name or SKU.
    ///
    /// A blank query matches every product.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim();

        if query.is_empty() {
            return true;
        }

        let query = query.to_lowercase();

        self.item_name.to_lowercase().contains(&query)
            || self.sku.as_str().to_lowercase().contains(&query)
    }
}

/// Apply the catalog search filter, keeping catalog order.
pub fn filter_products<'a>(
    products: &'a [Product],
    query: &'a str,
) -> impl Iterator<Item = &'a Product> + 'a {
    products
        .iter()
        .filter(move |product| product.matches_query(query))
}
