//! Adding a proposal's items to the cart.

use tracing::warn;

use crate::domain::{
    carts::store::CartView,
    products::service::ProductsService,
    recommendations::models::Proposal,
};

/// Add one unit of every recommended SKU to `view`.
///
/// The current product record is fetched for each SKU so the cart never holds
/// the proposal's copy of a price. SKUs that cannot be fetched are logged and
/// skipped. Returns how many items were added.
pub async fn add_recommended(
    products: &dyn ProductsService,
    view: &mut CartView,
    proposal: &Proposal,
) -> usize {
    let mut added = 0;

    for sku in proposal.skus() {
        match products.get_product(sku).await {
            Ok(product) => {
                if view.add_item(&product).is_some() {
                    added += 1;
                }
            }
            Err(error) => {
                warn!(%sku, %error, "skipping recommended item");
            }
        }
    }

    added
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::{
        domain::{
            carts::{slot::MemoryCartSlot, store::CartStore},
            products::{errors::ProductsServiceError, models::Sku, service::MockProductsService},
            recommendations::models::RecommendedItem,
        },
        test::fixtures::product,
    };

    fn recommended(sku: &str) -> RecommendedItem {
        RecommendedItem {
            sku: Sku::from(sku),
            item_name: format!("Item {sku}"),
            price: Decimal::from(1),
            rationale: String::new(),
        }
    }

    #[tokio::test]
    async fn adds_fetched_products_and_skips_missing_ones() {
        let mut products = MockProductsService::new();
        products.expect_get_product().returning(|sku| match sku.as_str() {
            "CS-001" => Ok(product("CS-001", "Support Bot", Decimal::from(499))),
            _ => Err(ProductsServiceError::NotFound),
        });

        let store = CartStore::new(MemoryCartSlot::default());
        let mut view = store.attach();

        let proposal = Proposal {
            summary: "Try these.".to_string(),
            recommended_items: vec![recommended("CS-001"), recommended("GONE-001")],
            estimated_cost: Decimal::from(2),
        };

        let added = add_recommended(&products, &mut view, &proposal).await;

        assert_eq!(added, 1);
        assert_eq!(view.lines().len(), 1);
        assert_eq!(view.total(), Decimal::from(499));
    }
}
