//! Catalog client for the external PokeAPI service
//!
//! Fetches raw attribute records, species taxonomy, list pages, and type
//! damage relations, and transforms the external representation into the
//! internal shapes. Catalog failures are fatal for the fetch that raised
//! them; only the secondary species lookup is best-effort.

mod transform;

pub use transform::{RawPokemon, RawSpecies, RawTypeResponse};

use pokefusion_utils::error::CatalogError;
use pokefusion_utils::types::{ParentRecord, PokemonListItem, PokemonListResponse, TypeTag};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Default per-request timeout for catalog fetches.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Connect timeout for the underlying client.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Damage relation sets for one attacking type, internal representation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeRelations {
    pub double_damage_to: Vec<TypeTag>,
    pub half_damage_to: Vec<TypeTag>,
    pub no_damage_to: Vec<TypeTag>,
    pub double_damage_from: Vec<TypeTag>,
    pub half_damage_from: Vec<TypeTag>,
    pub no_damage_from: Vec<TypeTag>,
}

/// HTTP client for the catalog service.
///
/// Holds one shared `reqwest::Client`; every request is bounded by the
/// configured deadline ([`FETCH_TIMEOUT`] by default) and aborted when
/// exceeded.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct RawListResponse {
    count: u32,
    results: Vec<RawListEntry>,
}

#[derive(Debug, Deserialize)]
struct RawListEntry {
    name: String,
}

impl CatalogClient {
    /// Create a client for the catalog at `base_url` (no trailing slash),
    /// bounding every request by [`FETCH_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Transport` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        Self::with_timeout(base_url, FETCH_TIMEOUT)
    }

    /// Create a client with an explicit per-request deadline.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Transport` if the HTTP client cannot be built.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| CatalogError::Transport {
                resource: "client".to_string(),
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout,
        })
    }

    /// Fetch a single parent record by numeric id.
    ///
    /// The primary attribute fetch is fatal on any failure. The secondary
    /// species lookup is best-effort: its failure leaves the taxonomy
    /// fields unset and never fails the record.
    pub async fn fetch_pokemon(&self, id: u32) -> Result<ParentRecord, CatalogError> {
        let raw: RawPokemon = self.get_json(&format!("pokemon/{id}")).await?;
        let mut record = transform::transform_pokemon(raw);

        match self.get_json::<RawSpecies>(&format!("pokemon-species/{id}")).await {
            Ok(species) => transform::apply_species(&mut record, species),
            Err(e) => {
                debug!(id, error = %e, "species lookup failed, continuing without taxonomy");
            }
        }

        Ok(record)
    }

    /// Fetch a page of `{id, name}` summaries.
    ///
    /// Identifiers are derived from the page position (`offset + index + 1`),
    /// matching the catalog's sequential numbering.
    pub async fn fetch_pokemon_list(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<PokemonListResponse, CatalogError> {
        let raw: RawListResponse = self
            .get_json(&format!("pokemon?limit={limit}&offset={offset}"))
            .await?;

        let pokemon = raw
            .results
            .into_iter()
            .enumerate()
            .map(|(index, entry)| PokemonListItem {
                id: offset + index as u32 + 1,
                name: entry.name,
            })
            .collect();

        Ok(PokemonListResponse {
            pokemon,
            total: raw.count,
            limit,
            offset,
        })
    }

    /// Fetch the damage relation sets for one attacking type.
    pub async fn fetch_type(&self, tag: TypeTag) -> Result<TypeRelations, CatalogError> {
        let raw: RawTypeResponse = self.get_json(&format!("type/{tag}")).await?;
        Ok(transform::transform_type_relations(raw))
    }

    async fn get_json<T: DeserializeOwned>(&self, resource: &str) -> Result<T, CatalogError> {
        let url = format!("{}/{}", self.base_url, resource);
        debug!(%url, "catalog fetch");

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CatalogError::Timeout {
                        resource: resource.to_string(),
                        duration: self.timeout,
                    }
                } else {
                    CatalogError::Transport {
                        resource: resource.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(resource, status = status.as_u16(), "catalog returned non-success");
            return Err(CatalogError::Status {
                resource: resource.to_string(),
                status: status.to_string(),
            });
        }

        response.json().await.map_err(|e| CatalogError::Decode {
            resource: resource.to_string(),
            message: e.to_string(),
        })
    }
}
