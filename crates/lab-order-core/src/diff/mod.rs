//! Partial-update payload: the minimal diff of a draft against its original
//! snapshot.
//!
//! Both sides run through the payload builder so derived fields are diffed
//! like-for-like, then the two top-level JSON maps are walked key by key.

use serde_json::{Map, Value};
use tracing::debug;

use crate::draft::{DraftError, DraftResult, OrderDraft};
use crate::payload::build_value;

/// Only changed top-level fields, keyed by wire name.
pub type UpdatePayload = Map<String, Value>;

/// Keys whose presence in the diff marks the order's billing as updated.
const BILLING_KEYS: [&str; 13] = [
    "billing_type",
    "primary_insurance",
    "primary_carrier_code",
    "primary_policy_number",
    "primary_group_number",
    "primary_relationship",
    "primary_insured",
    "secondary_insurance",
    "secondary_carrier_code",
    "secondary_policy_number",
    "secondary_group_number",
    "secondary_relationship",
    "secondary_insured",
];

/// JSON-level blank: null, or a string that is empty after trimming. The
/// value-shaped twin of `validate::is_blank`.
fn value_is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Field-level change rule: both-blank values are equivalent (null vs "");
/// arrays differ on length or any index (reordering counts as a change).
fn changed(old: &Value, new: &Value) -> bool {
    if value_is_empty(old) && value_is_empty(new) {
        return false;
    }
    match (old, new) {
        (Value::Array(a), Value::Array(b)) => {
            a.len() != b.len() || a.iter().zip(b.iter()).any(|(x, y)| x != y)
        }
        _ => old != new,
    }
}

/// Shallow object comparison: scalar inequality per key, no recursion.
fn object_changed(old: &Value, new: &Value) -> bool {
    match (old.as_object(), new.as_object()) {
        (Some(a), Some(b)) => {
            a.len() != b.len()
                || a.iter().any(|(key, value)| b.get(key) != Some(value))
        }
        _ => old != new,
    }
}

/// Build the partial update for an edit session.
///
/// `baseline` is a draft reconstructed from the original snapshot; both it
/// and `current` are run through the payload builder before comparison.
/// Fails fast when the draft carries no order GUID.
pub fn build_update(
    current: &OrderDraft,
    baseline: &OrderDraft,
    patient_guid: Option<&str>,
) -> DraftResult<UpdatePayload> {
    if current.order_guid.is_none() {
        return Err(DraftError::MissingOrderGuid);
    }

    let new_value = build_value(current);
    let old_value = build_value(baseline);
    let (Some(new_map), Some(old_map)) = (new_value.as_object(), old_value.as_object()) else {
        return Ok(UpdatePayload::new());
    };

    let mut diff = UpdatePayload::new();
    let empty = Value::Null;

    // Patient block: replaced whole or referenced by GUID, never sub-diffed
    let new_patient = new_map.get("patient_data").unwrap_or(&empty);
    let old_patient = old_map.get("patient_data").unwrap_or(&empty);
    if object_changed(old_patient, new_patient) {
        diff.insert("patient_data".into(), new_patient.clone());
        if let Some(guid) = patient_guid {
            diff.insert("patient_guid".into(), Value::String(guid.to_string()));
        }
    } else if let Some(guid) = patient_guid {
        diff.insert("patient_guid".into(), Value::String(guid.to_string()));
    }

    // Insured sub-records are substituted whole on any difference
    for key in ["primary_insured", "secondary_insured"] {
        let new_record = new_map.get(key).unwrap_or(&empty);
        let old_record = old_map.get(key).unwrap_or(&empty);
        if object_changed(old_record, new_record) {
            diff.insert(key.into(), new_record.clone());
        }
    }

    // Tube data follows the test selection; it is not independently diffable
    let tests_changed = changed(
        old_map.get("test_info").unwrap_or(&empty),
        new_map.get("test_info").unwrap_or(&empty),
    );
    if tests_changed {
        diff.insert(
            "tube_data".into(),
            new_map.get("tube_data").cloned().unwrap_or(Value::Null),
        );
    }

    for (key, new_field) in new_map {
        if matches!(
            key.as_str(),
            "patient_data" | "primary_insured" | "secondary_insured" | "tube_data"
        ) {
            continue;
        }
        let old_field = old_map.get(key).unwrap_or(&empty);
        if changed(old_field, new_field) {
            diff.insert(key.clone(), new_field.clone());
        }
    }

    if BILLING_KEYS.iter().any(|key| diff.contains_key(*key)) {
        diff.insert("has_billing_updated".into(), Value::Bool(true));
    }

    debug!(changed_fields = diff.len(), "built update payload");
    Ok(diff)
}

/// Diff the draft against its own recorded snapshot.
pub fn build_update_from_snapshot(draft: &OrderDraft) -> DraftResult<UpdatePayload> {
    let baseline = draft.baseline_draft().ok_or(DraftError::MissingSnapshot)?;
    build_update(draft, &baseline, draft.patient_guid.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BillingType, LabTest, OrderType};

    fn base_draft() -> OrderDraft {
        let mut draft = OrderDraft::new();
        draft.order_guid = Some("order-1".into());
        draft.patient_guid = Some("patient-1".into());
        draft.personal.first_name = Some("ANA".into());
        draft.personal.last_name = Some("REYES".into());
        draft.order_info.order_type = Some(OrderType::OneVisit);
        draft.order_info.urgency = Some("ROUTINE".into());
        draft.case_info.selected_tests.push(LabTest {
            id: 1,
            guid: Some("g-1".into()),
            code: "CBC".into(),
            name: "CBC".into(),
            tube_requirements: vec!["EDTA".into()],
        });
        draft.case_info.rederive_test_projections();
        draft
    }

    #[test]
    fn test_missing_order_guid_fails_fast() {
        let mut draft = base_draft();
        draft.order_guid = None;
        let err = build_update(&draft, &base_draft(), None).unwrap_err();
        assert!(matches!(err, DraftError::MissingOrderGuid));
    }

    #[test]
    fn test_round_trip_is_identity_reference_only() {
        let draft = base_draft();
        let diff = build_update(&draft, &draft, Some("patient-1")).unwrap();
        assert_eq!(diff.len(), 1);
        assert_eq!(diff["patient_guid"], "patient-1");

        let diff = build_update(&draft, &draft, None).unwrap();
        assert!(diff.is_empty());
    }

    #[test]
    fn test_scalar_change_included_alone() {
        let baseline = base_draft();
        let mut current = base_draft();
        current.order_info.urgency = Some("STAT".into());

        let diff = build_update(&current, &baseline, None).unwrap();
        assert_eq!(diff.len(), 1);
        assert_eq!(diff["urgency"], "STAT");
    }

    #[test]
    fn test_patient_change_sends_whole_block() {
        let baseline = base_draft();
        let mut current = base_draft();
        current.personal.last_name = Some("ORTIZ".into());

        let diff = build_update(&current, &baseline, Some("patient-1")).unwrap();
        assert_eq!(diff["patient_guid"], "patient-1");
        let block = diff["patient_data"].as_object().unwrap();
        assert_eq!(block["last_name"], "ORTIZ");
        assert_eq!(block["first_name"], "ANA"); // unchanged fields ride along
    }

    #[test]
    fn test_null_and_empty_string_are_equivalent() {
        let mut baseline = base_draft();
        baseline.order_info.warning_notes = None;
        let mut current = base_draft();
        current.order_info.warning_notes = Some("".into());

        let diff = build_update(&current, &baseline, None).unwrap();
        assert!(!diff.contains_key("warning_notes"));
    }

    #[test]
    fn test_array_reorder_counts_as_change() {
        let mut baseline = base_draft();
        baseline.case_info.icd_codes = vec!["E11.9".into(), "I10".into()];
        let mut current = base_draft();
        current.case_info.icd_codes = vec!["I10".into(), "E11.9".into()];

        let diff = build_update(&current, &baseline, None).unwrap();
        assert_eq!(diff["icd_codes"], serde_json::json!(["I10", "E11.9"]));
    }

    #[test]
    fn test_tube_data_only_with_test_change() {
        let baseline = base_draft();
        let mut current = base_draft();
        current.order_info.urgency = Some("STAT".into());
        let diff = build_update(&current, &baseline, None).unwrap();
        assert!(!diff.contains_key("tube_data"));

        let mut current = base_draft();
        current.case_info.selected_tests.push(LabTest {
            id: 2,
            guid: Some("g-2".into()),
            code: "BMP".into(),
            name: "BMP".into(),
            tube_requirements: vec!["SST".into()],
        });
        current.case_info.rederive_test_projections();
        let diff = build_update(&current, &baseline, None).unwrap();
        assert!(diff.contains_key("tube_data"));
        assert!(diff.contains_key("test_info"));
    }

    #[test]
    fn test_billing_flag_derived_from_diff_membership() {
        let mut baseline = base_draft();
        baseline.order_info.billing_type = Some(BillingType::Client);
        let mut current = base_draft();
        current.order_info.billing_type = Some(BillingType::SelfPay);

        let diff = build_update(&current, &baseline, None).unwrap();
        assert_eq!(diff["has_billing_updated"], true);

        let mut current = base_draft();
        current.order_info.billing_type = Some(BillingType::Client);
        current.order_info.urgency = Some("STAT".into());
        let diff = build_update(&current, &baseline, None).unwrap();
        assert!(!diff.contains_key("has_billing_updated"));
    }

    #[test]
    fn test_snapshot_convenience_path() {
        let draft = base_draft();
        let snapshot = crate::draft::OrderSnapshot {
            personal: draft.personal.clone(),
            case_info: draft.case_info.clone(),
            order_info: draft.order_info.clone(),
            insurance: draft.insurance.clone(),
        };
        let mut session = OrderDraft::new();
        session
            .set_original_snapshot(
                snapshot,
                Some("order-1".into()),
                Some("patient-1".into()),
                crate::draft::DraftMode::Edit,
            )
            .unwrap();
        session.apply(crate::draft::DraftIntent::SetOrderInfo(
            crate::draft::OrderField::Urgency,
            crate::draft::FieldWrite::Text("STAT".into()),
        ));

        let diff = build_update_from_snapshot(&session).unwrap();
        assert_eq!(diff["urgency"], "STAT");
        assert_eq!(diff["patient_guid"], "patient-1");

        let bare = OrderDraft::new();
        assert!(matches!(
            build_update_from_snapshot(&bare),
            Err(DraftError::MissingSnapshot)
        ));
    }
}
