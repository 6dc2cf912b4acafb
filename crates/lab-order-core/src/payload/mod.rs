//! Creation payload: the backend-shaped object built from a draft.

mod builder;
mod transform;

pub use builder::*;
pub use transform::*;

use serde::{Deserialize, Serialize};

/// Operational ceiling on the reported count per tube name. Raw counts above
/// this are clamped, never emitted.
pub const MAX_TUBE_COUNT: u32 = 4;

/// Patient demographic/address block sent to the backend verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientData {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub gender: String,
    pub dob: String,
    pub mobile1: String,
    pub mobile2: String,
    pub email: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub race: String,
    pub ethnicity: String,
    pub homebound: bool,
    pub hard_stick: bool,
    pub patient_notes: String,
}

/// Aggregated requirement for one tube name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TubeCount {
    pub tube_name: String,
    pub tube_count: u32,
}

/// Insured-party block on the wire; empty strings when gated out.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InsuredRecord {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub dob: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
}

/// Attached-document metadata on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocumentRecord {
    pub id: String,
    pub name: String,
    pub size: u64,
    pub locator: String,
    pub is_new_upload: bool,
}

/// The full create-order payload. Field names are the wire names; the update
/// diff is computed key-by-key over this same shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CreationPayload {
    pub patient_data: PatientData,

    pub test_info: Vec<String>,
    pub test_name: String,
    pub tube_data: Vec<TubeCount>,
    pub icd_codes: Vec<String>,
    pub services: Vec<String>,
    pub ordering_facility: String,
    pub ordering_facility_name: String,
    pub ordering_physician: String,
    pub ordering_physician_name: String,

    pub order_type: String,
    pub date_of_service: String,
    pub appointment_window: String,
    pub start_date: String,
    pub end_date: String,
    pub frequency: String,
    pub urgency: String,
    pub fasting: Option<bool>,
    pub warning_notes: String,

    pub billing_type: String,
    pub primary_insurance: String,
    pub primary_carrier_code: String,
    pub primary_policy_number: String,
    pub primary_group_number: String,
    pub primary_relationship: String,
    pub primary_insured: InsuredRecord,
    pub secondary_insurance: String,
    pub secondary_carrier_code: String,
    pub secondary_policy_number: String,
    pub secondary_group_number: String,
    pub secondary_relationship: String,
    pub secondary_insured: InsuredRecord,

    pub service_address_line1: String,
    pub service_address_line2: String,
    pub service_address_city: String,
    pub service_address_state: String,
    pub service_address_zipcode: String,
    /// Legacy single-string form for older consumers: parts joined by single
    /// spaces, empty parts dropped.
    pub service_address: String,

    pub documents: Vec<DocumentRecord>,
}
