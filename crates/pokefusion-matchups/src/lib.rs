//! Deterministic type-effectiveness engine
//!
//! Pure multiplier and summary computations over a [`TypeChart`] loaded
//! once from the catalog service. The chart is a single-assignment cache:
//! written exactly once during initialization, read concurrently
//! thereafter. Callers that query before initialization (or after a
//! fully failed load) get neutral results rather than errors.

use futures::future::join_all;
use once_cell::sync::OnceCell;
use pokefusion_catalog::{CatalogClient, TypeRelations};
use pokefusion_utils::types::{EffectivenessSummary, TypeTag};
use std::collections::HashMap;
use tracing::{info, warn};

/// Relation sets for every successfully loaded attacking type.
///
/// Tags whose fetch failed are simply absent; queries against them are
/// neutral.
#[derive(Debug, Default, Clone)]
pub struct TypeChart {
    relations: HashMap<TypeTag, TypeRelations>,
}

impl TypeChart {
    #[must_use]
    pub fn new(relations: HashMap<TypeTag, TypeRelations>) -> Self {
        Self { relations }
    }

    #[must_use]
    pub fn get(&self, tag: TypeTag) -> Option<&TypeRelations> {
        self.relations.get(&tag)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Effectiveness multiplier for `attack` against `defense_types`.
    ///
    /// Starts at 1 and, per defense type, multiplies by 0 (immune),
    /// 2 (super-effective) or 0.5 (resisted), in that priority order.
    /// Unknown attack tags are neutral. With 1-2 defense types the result
    /// is always one of {0, 0.25, 0.5, 1, 2, 4}.
    #[must_use]
    pub fn effectiveness(&self, attack: TypeTag, defense_types: &[TypeTag]) -> f64 {
        let Some(relations) = self.relations.get(&attack) else {
            return 1.0;
        };

        let mut multiplier = 1.0;
        for defense in defense_types {
            if relations.no_damage_to.contains(defense) {
                multiplier *= 0.0;
            } else if relations.double_damage_to.contains(defense) {
                multiplier *= 2.0;
            } else if relations.half_damage_to.contains(defense) {
                multiplier *= 0.5;
            }
        }
        multiplier
    }

    /// Weakness/resistance/immunity classification for a defensive typing.
    ///
    /// Every one of the 18 tags is evaluated as a hypothetical attacker:
    /// immune (=0), weak (>=2), resistant (<=0.5 and >0). Exactly-neutral
    /// attackers appear in none of the sets.
    #[must_use]
    pub fn summary(&self, defense_types: &[TypeTag]) -> EffectivenessSummary {
        let mut summary = EffectivenessSummary::default();
        for attack in TypeTag::ALL {
            let effectiveness = self.effectiveness(attack, defense_types);
            if effectiveness == 0.0 {
                summary.immune_to.push(attack);
            } else if effectiveness >= 2.0 {
                summary.weak_to.push(attack);
            } else if effectiveness <= 0.5 {
                summary.resistant_to.push(attack);
            }
        }
        summary
    }
}

/// Injectable handle around the process-wide chart cache.
///
/// Construct one at startup, call [`load`](Self::load) once, and share
/// the handle; tests construct fresh handles (optionally pre-seeded with
/// [`with_chart`](Self::with_chart)) instead of resetting global state.
#[derive(Debug, Default)]
pub struct Matchups {
    chart: OnceCell<TypeChart>,
}

impl Matchups {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle whose chart is already initialized. Test seam.
    #[must_use]
    pub fn with_chart(chart: TypeChart) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(chart);
        Self { chart: cell }
    }

    /// The loaded chart, or `None` before initialization.
    #[must_use]
    pub fn chart(&self) -> Option<&TypeChart> {
        self.chart.get()
    }

    /// Fetch all 18 type relation records in parallel and cache the result.
    ///
    /// Individual fetch failures drop that tag from the chart; a fully
    /// failed load caches an empty chart and the engine stays neutral.
    /// Subsequent calls return the cached chart without re-fetching.
    pub async fn load(&self, catalog: &CatalogClient) -> &TypeChart {
        if let Some(chart) = self.chart.get() {
            return chart;
        }

        let fetches = TypeTag::ALL.map(|tag| async move {
            let result = catalog.fetch_type(tag).await;
            (tag, result)
        });
        let results = join_all(fetches).await;

        let mut relations = HashMap::new();
        for (tag, result) in results {
            match result {
                Ok(r) => {
                    relations.insert(tag, r);
                }
                Err(e) => {
                    warn!(%tag, error = %e, "failed to load type relations, omitting");
                }
            }
        }
        info!(loaded = relations.len(), "type chart loaded");

        // A concurrent load may have won the race; either way the cell is
        // set exactly once and every caller sees the same chart.
        self.chart.get_or_init(|| TypeChart::new(relations))
    }

    /// Multiplier for `attack` against `defense_types`; neutral (1.0)
    /// before the chart is loaded.
    #[must_use]
    pub fn effectiveness(&self, attack: TypeTag, defense_types: &[TypeTag]) -> f64 {
        match self.chart.get() {
            Some(chart) => chart.effectiveness(attack, defense_types),
            None => 1.0,
        }
    }

    /// Summary for `defense_types`; empty before the chart is loaded.
    #[must_use]
    pub fn summary(&self, defense_types: &[TypeTag]) -> EffectivenessSummary {
        match self.chart.get() {
            Some(chart) => chart.summary(defense_types),
            None => EffectivenessSummary::default(),
        }
    }
}
