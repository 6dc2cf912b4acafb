//! Case section rules: test selection, ordering references, services, ICD.

use super::FieldErrors;
use crate::draft::OrderDraft;

pub fn validate_case_info(draft: &OrderDraft) -> FieldErrors {
    let case = &draft.case_info;
    let mut errors = FieldErrors::new();

    // Selection is checked through the derived display label, which is kept
    // in lockstep with `selected_tests` by the reducer.
    if case.test_name.trim().is_empty() {
        errors.insert("test_name", "Select at least one test");
    }

    errors.require(
        "ordering_facility",
        &case.ordering_facility,
        "Ordering facility is required",
    );
    errors.require(
        "ordering_physician",
        &case.ordering_physician,
        "Ordering physician is required",
    );

    if case.services.is_empty() {
        errors.insert("services", "Select at least one service");
    }
    if case.icd_codes.is_empty() {
        errors.insert("icd_codes", "Add at least one ICD code");
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LabTest;

    fn filled_case() -> OrderDraft {
        let mut draft = OrderDraft::new();
        draft.case_info.selected_tests.push(LabTest {
            id: 1,
            guid: Some("g-1".into()),
            code: "CBC".into(),
            name: "CBC".into(),
            tube_requirements: vec!["EDTA".into()],
        });
        draft.case_info.rederive_test_projections();
        draft.case_info.ordering_facility = Some("fac-1".into());
        draft.case_info.ordering_physician = Some("phy-1".into());
        draft.case_info.services.push("BLOOD DRAW".into());
        draft.case_info.icd_codes.push("E11.9".into());
        draft
    }

    #[test]
    fn test_clean_case_section() {
        assert!(validate_case_info(&filled_case()).is_valid());
    }

    #[test]
    fn test_empty_case_reports_everything() {
        let errors = validate_case_info(&OrderDraft::new());
        for field in ["test_name", "ordering_facility", "ordering_physician", "services", "icd_codes"] {
            assert!(errors.get(field).is_some(), "missing error for {field}");
        }
    }

    #[test]
    fn test_physician_cleared_by_facility_change_fails_validation() {
        let mut draft = filled_case();
        draft.apply(crate::draft::DraftIntent::SetCaseInfo(
            crate::draft::CaseField::OrderingFacility,
            crate::draft::FieldWrite::Text("fac-2".into()),
        ));
        let errors = validate_case_info(&draft);
        assert!(errors.get("ordering_physician").is_some());
    }
}
