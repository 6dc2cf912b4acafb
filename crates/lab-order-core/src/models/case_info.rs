//! Case section: selected lab tests, diagnosis codes, ordering references.

use serde::{Deserialize, Serialize};

/// A lab test selected for the order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LabTest {
    /// Catalog row id (selection identity)
    pub id: i64,
    /// Backend GUID; tests without one are dropped from the wire projection
    pub guid: Option<String>,
    /// Short test code (e.g. "CBC")
    pub code: String,
    /// Display name
    pub name: String,
    /// Tube names this test requires, one entry per tube
    pub tube_requirements: Vec<String>,
}

/// The `caseInfo` section of an order draft.
///
/// `test_info` and `test_name` are projections of `selected_tests` and are
/// re-derived on every test mutation, never edited directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CaseInfoSection {
    pub selected_tests: Vec<LabTest>,
    /// GUIDs of the selected tests (entries without a GUID dropped)
    pub test_info: Vec<String>,
    /// Display label: selected test names joined with ", "
    pub test_name: String,
    /// ICD diagnosis codes; insertion-ordered, duplicate-free
    pub icd_codes: Vec<String>,
    /// Ordering facility reference (partner GUID)
    pub ordering_facility: Option<String>,
    pub ordering_facility_name: Option<String>,
    /// Ordering physician reference; cleared whenever the facility changes
    pub ordering_physician: Option<String>,
    pub ordering_physician_name: Option<String>,
    /// Selected service tags; insertion-ordered, duplicate-free
    pub services: Vec<String>,
}

impl CaseInfoSection {
    /// Recompute `test_info` and `test_name` from `selected_tests`.
    pub fn rederive_test_projections(&mut self) {
        self.test_info = self
            .selected_tests
            .iter()
            .filter_map(|t| t.guid.clone())
            .collect();
        self.test_name = self
            .selected_tests
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
    }
}
