//! Battle pipeline orchestration
//!
//! Three strict stages: fetch all four parents, generate both children,
//! judge the battle. Work inside a stage runs concurrently; stages never
//! overlap because each consumes the previous stage's output. The first
//! failure in a stage cancels its siblings and aborts the pipeline, so a
//! bad parent identifier never costs a generative call.

use pokefusion_catalog::CatalogClient;
use pokefusion_llm::GenerativeClient;
use pokefusion_utils::error::{BattleError, BattleStage};
use pokefusion_utils::types::{
    BattleRequest, BattleResponse, Children, ParentPair, ParentPairs,
};
use tracing::{debug, info};

/// Drives one battle request through fetch, generation and judgment.
pub struct BattleOrchestrator {
    catalog: CatalogClient,
    generative: GenerativeClient,
}

impl BattleOrchestrator {
    #[must_use]
    pub fn new(catalog: CatalogClient, generative: GenerativeClient) -> Self {
        Self { catalog, generative }
    }

    /// Run the full pipeline for one request.
    ///
    /// # Errors
    ///
    /// Returns a [`BattleError`] naming the stage that failed. Parent
    /// fetch failures are immediate; generative failures surface only
    /// after the per-call retry budget inside the generative client is
    /// exhausted.
    pub async fn run(&self, request: BattleRequest) -> Result<BattleResponse, BattleError> {
        info!(
            pair_a_parent1 = request.pair_a.parent1_id,
            pair_a_parent2 = request.pair_a.parent2_id,
            pair_b_parent1 = request.pair_b.parent1_id,
            pair_b_parent2 = request.pair_b.parent2_id,
            "starting battle pipeline"
        );

        let (a1, a2, b1, b2) = tokio::try_join!(
            self.catalog.fetch_pokemon(request.pair_a.parent1_id),
            self.catalog.fetch_pokemon(request.pair_a.parent2_id),
            self.catalog.fetch_pokemon(request.pair_b.parent1_id),
            self.catalog.fetch_pokemon(request.pair_b.parent2_id),
        )
        .map_err(|e| BattleError::new(BattleStage::FetchParents, e))?;
        debug!("all four parents fetched");

        let (child1, child2) = tokio::try_join!(
            self.generative.generate_child(&a1, &a2),
            self.generative.generate_child(&b1, &b2),
        )
        .map_err(|e| BattleError::new(BattleStage::Generation, e))?;
        debug!(child1 = %child1.name, child2 = %child2.name, "both children generated");

        let battle = self
            .generative
            .judge_battle(&child1, &child2)
            .await
            .map_err(|e| BattleError::new(BattleStage::Judgment, e))?;
        info!(winner = %battle.winner, confidence = battle.confidence, "battle judged");

        Ok(BattleResponse {
            parents: ParentPairs {
                pair_a: ParentPair { parent1: a1, parent2: a2 },
                pair_b: ParentPair { parent1: b1, parent2: b2 },
            },
            children: Children { child1, child2 },
            battle,
        })
    }
}
