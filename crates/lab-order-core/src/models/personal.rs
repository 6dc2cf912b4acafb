//! Patient-facing personal section: identity, contact, addresses, flags.

use serde::{Deserialize, Serialize};

/// The `personal` section of an order draft.
///
/// Text fields are `Option<String>`: `None` is the cleared/null sentinel
/// written by an explicit clear, distinct from `Some("")` (present but
/// empty). Both count as blank for validation and diffing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PersonalSection {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    /// Date of birth, `YYYY-MM-DD`
    pub dob: Option<String>,
    /// Primary contact number, stored as up to 10 digits
    pub mobile1: Option<String>,
    /// Secondary contact number, stored as up to 10 digits
    pub mobile2: Option<String>,
    pub email: Option<String>,

    // Home address
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,

    /// When `Some(true)`, the pickup address mirrors the home address and
    /// the discrete pickup fields below are ignored.
    pub add_pickup_address: Option<bool>,
    pub pickup_address1: Option<String>,
    pub pickup_address2: Option<String>,
    pub pickup_city: Option<String>,
    pub pickup_state: Option<String>,
    pub pickup_zip: Option<String>,

    // Demographics (normalized uppercase on load)
    pub race: Option<String>,
    pub ethnicity: Option<String>,

    pub homebound: Option<bool>,
    pub hard_stick: Option<bool>,
    pub notes: Option<String>,
}

impl PersonalSection {
    /// True when any of the four discrete pickup fields holds a value.
    pub fn any_pickup_field_set(&self) -> bool {
        [
            &self.pickup_address1,
            &self.pickup_city,
            &self.pickup_state,
            &self.pickup_zip,
        ]
        .iter()
        .any(|f| f.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }
}
