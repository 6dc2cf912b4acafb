//! Mutable order draft: four sections, an immutable original snapshot, and
//! identity metadata.
//!
//! All field writes go through [`OrderDraft::apply`] so that every cascade
//! (digit truncation, facility→physician clear, SELF copy, test projection
//! upkeep) happens inside the same transition as the triggering write.

mod intent;

pub use intent::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::{
    CaseInfoSection, InsuranceSection, OrderInfoSection, PersonalSection, Section,
};

/// Draft-level errors.
#[derive(Error, Debug)]
pub enum DraftError {
    /// The original snapshot is written once per edit session.
    #[error("original snapshot already set for this session")]
    SnapshotAlreadySet,

    /// An update payload is meaningless without an order identity.
    #[error("order GUID is required to build an update")]
    MissingOrderGuid,

    /// Diffing requires a recorded baseline.
    #[error("no original snapshot recorded for this session")]
    MissingSnapshot,
}

pub type DraftResult<T> = Result<T, DraftError>;

/// How the draft session was opened.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum DraftMode {
    /// Empty draft, submits through the create path
    #[default]
    Create,
    /// Loaded from an existing order, submits a partial-update diff
    Edit,
    /// Loaded from an existing order but submits through the create path
    Reorder,
}

/// Immutable copy of the four sections taken at load time; the diff baseline.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderSnapshot {
    pub personal: PersonalSection,
    pub case_info: CaseInfoSection,
    pub order_info: OrderInfoSection,
    pub insurance: InsuranceSection,
}

/// The in-memory, unsaved representation of an order being created or edited.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderDraft {
    pub personal: PersonalSection,
    pub case_info: CaseInfoSection,
    pub order_info: OrderInfoSection,
    pub insurance: InsuranceSection,

    snapshot: Option<OrderSnapshot>,
    pub order_guid: Option<String>,
    pub patient_guid: Option<String>,
    pub mode: DraftMode,
}

impl OrderDraft {
    /// An empty draft for the create flow.
    pub fn new() -> Self {
        Self::default()
    }

    /// The diff baseline, if one was recorded for this session.
    pub fn original_snapshot(&self) -> Option<&OrderSnapshot> {
        self.snapshot.as_ref()
    }

    /// Record the baseline for an edit/reorder session. Called exactly once,
    /// immediately after the fetched order has been normalized.
    pub fn set_original_snapshot(
        &mut self,
        snapshot: OrderSnapshot,
        order_guid: Option<String>,
        patient_guid: Option<String>,
        mode: DraftMode,
    ) -> DraftResult<()> {
        if self.snapshot.is_some() {
            return Err(DraftError::SnapshotAlreadySet);
        }
        debug!(?mode, order_guid = order_guid.as_deref(), "recording original snapshot");
        self.personal = snapshot.personal.clone();
        self.case_info = snapshot.case_info.clone();
        self.order_info = snapshot.order_info.clone();
        self.insurance = snapshot.insurance.clone();
        self.snapshot = Some(snapshot);
        self.order_guid = order_guid;
        self.patient_guid = patient_guid;
        self.mode = mode;
        Ok(())
    }

    /// A draft reconstructed from the baseline, for like-for-like payload
    /// comparison in the diff builder.
    pub fn baseline_draft(&self) -> Option<OrderDraft> {
        self.snapshot.as_ref().map(|snap| OrderDraft {
            personal: snap.personal.clone(),
            case_info: snap.case_info.clone(),
            order_info: snap.order_info.clone(),
            insurance: snap.insurance.clone(),
            snapshot: None,
            order_guid: self.order_guid.clone(),
            patient_guid: self.patient_guid.clone(),
            mode: self.mode,
        })
    }

    /// Clear every field in one section. The snapshot is untouched.
    pub fn reset_section(&mut self, section: Section) {
        match section {
            Section::Personal => self.personal = PersonalSection::default(),
            Section::CaseInfo => self.case_info = CaseInfoSection::default(),
            Section::OrderInfo => self.order_info = OrderInfoSection::default(),
            Section::Insurance => self.insurance = InsuranceSection::default(),
        }
    }

    /// Discard everything: sections, snapshot, identity metadata.
    pub fn reset(&mut self) {
        debug!("resetting order draft");
        *self = OrderDraft::default();
    }
}
