//! Intake flow: extract, then forward verbatim.

use std::sync::Arc;

use jiff::Timestamp;
use tracing::{error, info, warn};

use crate::domain::{
    intake::{
        errors::IntakeError,
        models::{IntakeOutcome, extracted_item_count, success_message},
        service::ExtractionService,
    },
    orders::{notice::Notice, service::OrdersService},
};

/// Orchestrates extraction and forwarding. Never touches the cart.
#[derive(Clone)]
pub struct Intake {
    extraction: Arc<dyn ExtractionService>,
    orders: Arc<dyn OrdersService>,
}

impl std::fmt::Debug for Intake {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Intake").finish_non_exhaustive()
    }
}

impl Intake {
    #[must_use]
    pub fn new(extraction: Arc<dyn ExtractionService>, orders: Arc<dyn OrdersService>) -> Self {
        Self { extraction, orders }
    }

    /// Submit free text for extraction and forward a recognized result.
    ///
    /// Returns `Ok(None)` when the extraction has no `items` list; nothing
    /// is forwarded in that case.
    ///
    /// # Errors
    ///
    /// Returns an error for blank text or when either backend call fails.
    pub async fn submit(&self, text: &str) -> Result<Option<IntakeOutcome>, IntakeError> {
        if text.trim().is_empty() {
            return Err(IntakeError::BlankText);
        }

        let extraction = self.extraction.extract_order(text).await.map_err(|source| {
            error!(error = %source, "order extraction failed");

            IntakeError::from(source)
        })?;

        let Some(item_count) = extracted_item_count(&extraction) else {
            warn!("extraction did not contain an items list, dropping it");

            return Ok(None);
        };

        let ack = self.orders.submit_raw(&extraction).await.map_err(|source| {
            error!(error = %source, "forwarding extracted order failed");

            IntakeError::from(source)
        })?;

        info!(items = item_count, status = %ack.status, "forwarded extracted order");

        Ok(Some(IntakeOutcome {
            item_count,
            ack,
            notice: Notice::new(success_message(item_count), Timestamp::now()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;
    use crate::{
        backend::BackendError,
        domain::{
            intake::{errors::IntakeServiceError, service::MockExtractionService},
            orders::{models::OrderAck, service::MockOrdersService},
        },
    };

    fn saved() -> OrderAck {
        OrderAck {
            status: "success".to_string(),
            message: "saved".to_string(),
        }
    }

    #[tokio::test]
    async fn forwards_extraction_verbatim_when_items_present() -> TestResult {
        let extraction = json!({
            "customer_name": "Grace",
            "items": [{"sku": "CS-001", "quantity": 2}, {"sku": "HR-001", "quantity": 1}],
            "unexpected": {"kept": true}
        });
        let expected = extraction.clone();

        let mut extractor = MockExtractionService::new();
        extractor
            .expect_extract_order()
            .withf(|text| text == "two support bots and one onboarding copilot")
            .times(1)
            .returning(move |_| Ok(extraction.clone()));

        let mut orders = MockOrdersService::new();
        orders
            .expect_submit_raw()
            .withf(move |document| *document == expected)
            .times(1)
            .returning(|_| Ok(saved()));
        orders.expect_submit_order().never();

        let intake = Intake::new(Arc::new(extractor), Arc::new(orders));

        let outcome = intake
            .submit("two support bots and one onboarding copilot")
            .await?
            .ok_or("expected an outcome")?;

        assert_eq!(outcome.item_count, 2);
        assert_eq!(
            outcome.notice.message,
            "AI successfully processed your order! (2 items)"
        );
        assert!(outcome.ack.is_success());

        Ok(())
    }

    #[tokio::test]
    async fn extraction_without_items_is_dropped() -> TestResult {
        let mut extractor = MockExtractionService::new();
        extractor
            .expect_extract_order()
            .returning(|_| Ok(json!({"error": "could not understand"})));

        let mut orders = MockOrdersService::new();
        orders.expect_submit_raw().never();

        let intake = Intake::new(Arc::new(extractor), Arc::new(orders));

        assert!(intake.submit("hello").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn blank_text_is_not_submitted() {
        let mut extractor = MockExtractionService::new();
        extractor.expect_extract_order().never();

        let intake = Intake::new(Arc::new(extractor), Arc::new(MockOrdersService::new()));

        assert!(matches!(
            intake.submit("  \n").await,
            Err(IntakeError::BlankText)
        ));
    }

    #[tokio::test]
    async fn extraction_failure_is_reported_without_forwarding() {
        let mut extractor = MockExtractionService::new();
        extractor.expect_extract_order().returning(|_| {
            Err(IntakeServiceError::Backend(BackendError::UnexpectedResponse(
                "POST /extract-order failed with status 500".to_string(),
            )))
        });

        let mut orders = MockOrdersService::new();
        orders.expect_submit_raw().never();

        let intake = Intake::new(Arc::new(extractor), Arc::new(orders));

        assert!(matches!(
            intake.submit("one bot").await,
            Err(IntakeError::Extraction(_))
        ));
    }
}
