//! Insurance section: primary/secondary plans and insured-party sub-records.

use serde::{Deserialize, Serialize};

use super::PersonalSection;

/// Primary or secondary insurance slot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InsuranceSide {
    Primary,
    Secondary,
}

/// Relationship of the ordering patient to the insured party.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Relationship {
    /// The patient is the insured party; selecting this copies the personal
    /// section into the insured sub-record once (no live binding).
    #[serde(rename = "SELF")]
    SelfCovered,
    #[serde(rename = "SPOUSE")]
    Spouse,
    #[serde(rename = "CHILD")]
    Child,
    #[serde(rename = "OTHER")]
    Other,
}

impl Relationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relationship::SelfCovered => "SELF",
            Relationship::Spouse => "SPOUSE",
            Relationship::Child => "CHILD",
            Relationship::Other => "OTHER",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "SELF" => Some(Relationship::SelfCovered),
            "SPOUSE" => Some(Relationship::Spouse),
            "CHILD" => Some(Relationship::Child),
            "OTHER" => Some(Relationship::Other),
            _ => None,
        }
    }
}

/// The person covered by a policy; may differ from the ordering patient.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InsuredParty {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub dob: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

impl InsuredParty {
    /// Snapshot of the personal section's identity/address block, used when
    /// relationship is set to SELF. A one-time copy, not a live binding.
    pub fn from_personal(personal: &PersonalSection) -> Self {
        Self {
            first_name: personal.first_name.clone(),
            last_name: personal.last_name.clone(),
            gender: personal.gender.clone(),
            dob: personal.dob.clone(),
            address1: personal.address1.clone(),
            address2: personal.address2.clone(),
            city: personal.city.clone(),
            state: personal.state.clone(),
            zip: personal.zip.clone(),
        }
    }
}

/// One insurance slot: insurer reference, policy identifiers, insured party.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InsurancePlan {
    /// Insurer reference (name or GUID as the backend supplies it)
    pub insurer: Option<String>,
    pub carrier_code: Option<String>,
    pub policy_number: Option<String>,
    pub group_number: Option<String>,
    pub relationship: Option<Relationship>,
    pub insured: InsuredParty,
}

/// The `insurance` section of an order draft.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InsuranceSection {
    pub primary: InsurancePlan,
    pub secondary: InsurancePlan,
}

impl InsuranceSection {
    pub fn plan(&self, side: InsuranceSide) -> &InsurancePlan {
        match side {
            InsuranceSide::Primary => &self.primary,
            InsuranceSide::Secondary => &self.secondary,
        }
    }

    pub fn plan_mut(&mut self, side: InsuranceSide) -> &mut InsurancePlan {
        match side {
            InsuranceSide::Primary => &mut self.primary,
            InsuranceSide::Secondary => &mut self.secondary,
        }
    }
}
