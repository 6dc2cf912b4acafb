//! Lab-Order Intake Core Library
//!
//! In-memory model of a clinical lab order being created or edited, with the
//! validation and payload machinery around it.
//!
//! # Architecture
//!
//! ```text
//!   getOrder(guid) ──► Normalization ──► [DRAFT: four sections + snapshot]
//!                                                   │
//!                                        DraftIntent reducer (UI edits,
//!                                        cascades applied atomically)
//!                                                   │
//!                                          Validation Engine
//!                                       (per-section FieldErrors)
//!                                                   │
//!                           ┌───────────────────────┴──────────────────────┐
//!                           ▼                                              ▼
//!                    Payload Builder                                 Diff Builder
//!                 (create: full payload,                     (edit: changed fields only,
//!                  derived fields, case                       vs. the original snapshot)
//!                  transform)                                        │
//!                           │                                        │
//!                           ▼                                        ▼
//!                   createOrder(payload)                 updateOrder(guid, diff)
//! ```
//!
//! # Core principle
//!
//! The draft is the single source of truth for a session. Every derived
//! value (test projections, tube counts, service address) is recomputed from
//! it, never edited independently; the original snapshot, once recorded, is
//! the immutable diff baseline.
//!
//! # Modules
//!
//! - [`models`]: section data model (personal, case, order, insurance)
//! - [`draft`]: the mutable draft, its reducer intents, and the snapshot
//! - [`validate`]: section-scoped validation returning field-keyed errors
//! - [`payload`]: creation payload builder and case-normalization transform
//! - [`diff`]: minimal partial-update payload against the snapshot
//! - [`normalize`]: fetched-record → draft mapping with candidate-key tables
//! - [`backend`]: collaborator traits (transport implementations live elsewhere)

pub mod backend;
pub mod diff;
pub mod draft;
pub mod models;
pub mod normalize;
pub mod payload;
pub mod validate;

// Re-export commonly used types
pub use diff::{build_update, build_update_from_snapshot, UpdatePayload};
pub use draft::{DraftError, DraftIntent, DraftMode, DraftResult, FieldWrite, OrderDraft, OrderSnapshot};
pub use models::{
    BillingType, CaseInfoSection, DocumentMeta, InsurancePlan, InsuranceSection, InsuranceSide,
    InsuredParty, LabTest, OrderInfoSection, OrderType, PersonalSection, Relationship, Section,
};
pub use normalize::load_existing_order;
pub use payload::{build, build_value, CreationPayload, MAX_TUBE_COUNT};
pub use validate::{is_blank, is_submittable, validate_section, FieldErrors};
