//! Recommendations service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    backend::BackendClient,
    domain::recommendations::{
        errors::RecommendationsServiceError,
        models::{Problem, Proposal},
    },
};

#[derive(Debug, Clone)]
pub struct HttpRecommendationsService {
    client: BackendClient,
}

impl HttpRecommendationsService {
    #[must_use]
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RecommendationsService for HttpRecommendationsService {
    async fn recommend(&self, problem: &str) -> Result<Proposal, RecommendationsServiceError> {
        if problem.trim().is_empty() {
            return Err(RecommendationsServiceError::BlankProblem);
        }

        let body = Problem {
            problem: problem.to_string(),
        };

        let proposal: Proposal = self.client.post_json("recommend-solutions", &body).await?;

        info!(
            items = proposal.recommended_items.len(),
            estimated_cost = %proposal.estimated_cost,
            "received recommendation"
        );

        Ok(proposal)
    }
}

#[automock]
#[async_trait]
pub trait RecommendationsService: Send + Sync {
    /// Ask the backend for a proposal addressing `problem`.
    async fn recommend(&self, problem: &str) -> Result<Proposal, RecommendationsServiceError>;
}
