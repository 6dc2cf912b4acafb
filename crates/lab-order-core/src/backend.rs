//! Boundary contracts for external collaborators.
//!
//! The core performs no I/O: fetching, submission, and reference-data lookups
//! happen around it. Transports implement these traits elsewhere; failure
//! causes are opaque to the core, hence `anyhow::Result`.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::diff::UpdatePayload;
use crate::payload::CreationPayload;

/// Acknowledgement for a successful create.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatedOrder {
    pub guid: String,
}

/// Order submission and retrieval.
pub trait OrdersApi {
    /// Fetch the raw order record; the caller normalizes it into a draft via
    /// [`crate::normalize::load_existing_order`].
    fn get_order(&self, guid: &str) -> Result<Value>;

    fn create_order(&self, payload: &CreationPayload) -> Result<CreatedOrder>;

    fn update_order(&self, guid: &str, payload: &UpdatePayload) -> Result<()>;
}

/// A reference-data row for dropdown population. Read-only to the core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LookupEntry {
    pub guid: String,
    pub label: String,
}

/// City/state resolved from a zip code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CityState {
    pub city: String,
    pub state: String,
}

/// Reference-data lookups feeding the intake forms.
pub trait LookupApi {
    fn tests(&self) -> Result<Vec<LookupEntry>>;

    fn partners(&self) -> Result<Vec<LookupEntry>>;

    fn physicians_by_partner(&self, partner_guid: &str) -> Result<Vec<LookupEntry>>;

    fn insurers_by_name(&self, query: &str) -> Result<Vec<LookupEntry>>;

    fn icd_codes(&self, query: &str) -> Result<Vec<LookupEntry>>;

    fn city_state_by_zip(&self, zip: &str) -> Result<Option<CityState>>;
}
