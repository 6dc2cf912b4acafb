//! Normalization of a fetched order record into a draft.
//!
//! Backend records are loosely shaped: the same concept can arrive under
//! several key names and nesting levels. Every canonical field therefore maps
//! from an explicit candidate list, tried in order, first present-and-non-null
//! value wins. Missing or odd shapes default to empty; loading never fails.

use serde_json::Value;
use tracing::warn;

use crate::draft::{DraftMode, DraftResult, OrderDraft, OrderSnapshot};
use crate::models::{
    BillingType, CaseInfoSection, DocumentMeta, InsurancePlan, InsuranceSection, InsuredParty,
    LabTest, OrderInfoSection, OrderType, PersonalSection, Relationship,
};

/// Walk a dotted path ("patient_data.city") through nested objects.
fn at_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// First candidate path holding a non-null value.
fn pick<'a>(record: &'a Value, candidates: &[&str]) -> Option<&'a Value> {
    candidates.iter().find_map(|path| at_path(record, path))
}

/// Text field: strings pass through, numbers are stringified, everything
/// else is treated as absent.
fn text(record: &Value, candidates: &[&str]) -> Option<String> {
    match pick(record, candidates)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        other => {
            warn!(?candidates, shape = ?other, "unexpected shape for text field");
            None
        }
    }
}

/// Text field upper-cased on load (race, ethnicity, frequency, services,
/// appointment window arrive in mixed casings).
fn upper_text(record: &Value, candidates: &[&str]) -> Option<String> {
    text(record, candidates).map(|s| s.to_uppercase())
}

/// Flag field: booleans pass through, "true"/"false" strings are tolerated.
fn flag(record: &Value, candidates: &[&str]) -> Option<bool> {
    match pick(record, candidates)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.to_lowercase().as_str() {
            "true" | "y" | "yes" => Some(true),
            "false" | "n" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn personal_from_record(record: &Value) -> PersonalSection {
    PersonalSection {
        first_name: text(record, &["patient_data.first_name", "first_name"]),
        middle_name: text(record, &["patient_data.middle_name", "middle_name"]),
        last_name: text(record, &["patient_data.last_name", "last_name"]),
        gender: upper_text(record, &["patient_data.gender", "gender"]),
        dob: text(record, &["patient_data.dob", "dob"]),
        mobile1: text(record, &["patient_data.mobile1", "mobile1", "patient_data.phone"]),
        mobile2: text(record, &["patient_data.mobile2", "mobile2"]),
        email: text(record, &["patient_data.email", "email"]),
        address1: text(record, &["patient_data.address1", "address1"]),
        address2: text(record, &["patient_data.address2", "address2"]),
        city: text(record, &["patient_data.city", "patient_data.City", "city"]),
        state: text(record, &["patient_data.state", "patient_data.State", "state"]),
        zip: text(record, &["patient_data.zipcode", "patient_data.zip", "zipcode", "zip"]),
        add_pickup_address: flag(record, &["add_pickup_address", "use_home_address"]),
        pickup_address1: text(record, &["service_address_line1", "pickup_address1"]),
        pickup_address2: text(record, &["service_address_line2", "pickup_address2"]),
        pickup_city: text(record, &["service_address_city", "pickup_city"]),
        pickup_state: text(record, &["service_address_state", "pickup_state"]),
        pickup_zip: text(record, &["service_address_zipcode", "pickup_zip"]),
        race: upper_text(record, &["patient_data.race", "race"]),
        ethnicity: upper_text(record, &["patient_data.ethnicity", "ethnicity"]),
        homebound: flag(record, &["patient_data.homebound", "homebound"]),
        hard_stick: flag(record, &["patient_data.hard_stick", "hard_stick"]),
        notes: text(record, &["patient_data.patient_notes", "patient_notes", "notes"]),
    }
}

fn tests_from_record(record: &Value) -> Vec<LabTest> {
    let Some(items) = pick(record, &["test_data", "tests", "selected_tests"]).and_then(Value::as_array)
    else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let id = pick(item, &["id", "test_id"])?.as_i64()?;
            Some(LabTest {
                id,
                guid: text(item, &["guid", "test_guid"]),
                code: text(item, &["code", "test_code"]).unwrap_or_default(),
                name: text(item, &["name", "test_name"]).unwrap_or_default(),
                tube_requirements: pick(item, &["tube_data", "tubes", "tube_requirements"])
                    .and_then(Value::as_array)
                    .map(|tubes| {
                        tubes
                            .iter()
                            .filter_map(|t| match t {
                                Value::String(s) => Some(s.clone()),
                                Value::Object(_) => text(t, &["tube_name", "name"]),
                                _ => None,
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            })
        })
        .collect()
}

fn string_list(record: &Value, candidates: &[&str], uppercase: bool) -> Vec<String> {
    pick(record, candidates)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(|s| if uppercase { s.to_uppercase() } else { s.to_string() })
                .collect()
        })
        .unwrap_or_default()
}

fn case_info_from_record(record: &Value) -> CaseInfoSection {
    let mut case = CaseInfoSection {
        selected_tests: tests_from_record(record),
        icd_codes: string_list(record, &["icd_codes", "icd"], false),
        ordering_facility: text(record, &["ordering_facility", "facility_guid"]),
        ordering_facility_name: text(record, &["ordering_facility_name", "facility_name"]),
        ordering_physician: text(record, &["ordering_physician", "physician_guid"]),
        ordering_physician_name: text(record, &["ordering_physician_name", "physician_name"]),
        services: string_list(record, &["services", "service_tags"], true),
        ..CaseInfoSection::default()
    };
    case.rederive_test_projections();
    case
}

/// Project one attachment entry to document metadata. Bare URL strings carry
/// no id or size; the name is the last path segment.
fn document_from_entry(entry: &Value) -> Option<DocumentMeta> {
    match entry {
        Value::String(url) => Some(DocumentMeta {
            id: uuid::Uuid::new_v4().to_string(),
            name: url
                .rsplit('/')
                .next()
                .unwrap_or(url.as_str())
                .to_string(),
            size: 0,
            locator: url.clone(),
            is_new_upload: false,
            uploaded_at: None,
        }),
        Value::Object(_) => Some(DocumentMeta {
            id: text(entry, &["id", "document_id"])
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: text(entry, &["name", "file_name"]).unwrap_or_default(),
            size: pick(entry, &["size"]).and_then(Value::as_u64).unwrap_or(0),
            locator: text(entry, &["locator", "url", "file_url"]).unwrap_or_default(),
            is_new_upload: false,
            uploaded_at: None,
        }),
        _ => None,
    }
}

fn order_info_from_record(record: &Value) -> OrderInfoSection {
    OrderInfoSection {
        order_type: text(record, &["order_type"]).and_then(|s| OrderType::parse(&s)),
        date_of_service: text(record, &["date_of_service", "dos"]),
        appointment_window: upper_text(record, &["appointment_window", "appointment_time"]),
        start_date: text(record, &["start_date"]),
        end_date: text(record, &["end_date"]),
        frequency: upper_text(record, &["frequency"]),
        urgency: upper_text(record, &["urgency"]),
        fasting: flag(record, &["fasting"]),
        warning_notes: text(record, &["warning_notes", "warnings"]),
        billing_type: text(record, &["billing_type"]).and_then(|s| BillingType::parse(&s)),
        documents: pick(record, &["documents", "attachments"])
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(document_from_entry).collect())
            .unwrap_or_default(),
    }
}

fn insured_from_record(record: &Value, prefix: &str) -> InsuredParty {
    let base = format!("{prefix}_insured");
    let field = |name: &str| {
        text(
            record,
            &[format!("{base}.{name}").as_str(), format!("{base}_{name}").as_str()],
        )
    };
    InsuredParty {
        first_name: field("first_name"),
        last_name: field("last_name"),
        gender: field("gender"),
        dob: field("dob"),
        address1: field("address1"),
        address2: field("address2"),
        city: field("city"),
        state: field("state"),
        zip: field("zipcode").or_else(|| field("zip")),
    }
}

fn plan_from_record(record: &Value, prefix: &str) -> InsurancePlan {
    let field = |name: &str| text(record, &[format!("{prefix}_{name}").as_str()]);
    InsurancePlan {
        insurer: field("insurance"),
        carrier_code: field("carrier_code"),
        policy_number: field("policy_number"),
        group_number: field("group_number"),
        relationship: field("relationship").and_then(|s| Relationship::parse(&s)),
        insured: insured_from_record(record, prefix),
    }
}

fn insurance_from_record(record: &Value) -> InsuranceSection {
    InsuranceSection {
        primary: plan_from_record(record, "primary"),
        secondary: plan_from_record(record, "secondary"),
    }
}

/// Map a raw order record into the four sections.
pub fn sections_from_record(record: &Value) -> OrderSnapshot {
    OrderSnapshot {
        personal: personal_from_record(record),
        case_info: case_info_from_record(record),
        order_info: order_info_from_record(record),
        insurance: insurance_from_record(record),
    }
}

/// Build an edit/reorder draft from a fetched order: normalize the record
/// into the four sections and record them as the original snapshot.
pub fn load_existing_order(record: &Value, mode: DraftMode) -> DraftResult<OrderDraft> {
    let snapshot = sections_from_record(record);
    let order_guid = text(record, &["guid", "order_guid", "id"]);
    let patient_guid = text(record, &["patient_guid", "patient_data.guid", "patient_data.patient_guid"]);

    let mut draft = OrderDraft::new();
    draft.set_original_snapshot(snapshot, order_guid, patient_guid, mode)?;
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_record() -> Value {
        json!({
            "guid": "order-77",
            "patient_guid": "patient-9",
            "patient_data": {
                "first_name": "Ana",
                "last_name": "Reyes",
                "gender": "female",
                "City": "Austin",
                "state": "TX",
                "zipcode": "78701",
                "race": "white",
                "homebound": "Y",
            },
            "test_data": [
                {"id": 4, "guid": "g-4", "code": "CBC", "name": "CBC",
                 "tube_data": [{"tube_name": "EDTA"}, "SST"]},
                {"id": 5, "name": "No Guid Panel"},
            ],
            "icd_codes": ["E11.9"],
            "services": ["blood draw"],
            "order_type": "standing",
            "frequency": "weekly",
            "appointment_time": "8am - 10am",
            "billing_type": "insurance",
            "primary_insurance": "ACME HEALTH",
            "primary_relationship": "self",
            "primary_insured": {"first_name": "Ana", "zipcode": "78701"},
            "attachments": ["https://files.example.com/orders/77/requisition.pdf"],
        })
    }

    #[test]
    fn test_candidate_key_fallback_order() {
        let record = sample_record();
        let sections = sections_from_record(&record);
        // `city` arrives as `patient_data.City`, second candidate
        assert_eq!(sections.personal.city.as_deref(), Some("Austin"));
        assert_eq!(sections.personal.zip.as_deref(), Some("78701"));
    }

    #[test]
    fn test_enum_casing_normalized_on_load() {
        let sections = sections_from_record(&sample_record());
        assert_eq!(sections.personal.race.as_deref(), Some("WHITE"));
        assert_eq!(sections.order_info.frequency.as_deref(), Some("WEEKLY"));
        assert_eq!(sections.order_info.appointment_window.as_deref(), Some("8AM - 10AM"));
        assert_eq!(sections.case_info.services, vec!["BLOOD DRAW"]);
        assert_eq!(sections.order_info.order_type, Some(OrderType::Standing));
        assert_eq!(sections.order_info.billing_type, Some(BillingType::Insurance));
    }

    #[test]
    fn test_tests_and_tube_shapes() {
        let sections = sections_from_record(&sample_record());
        assert_eq!(sections.case_info.selected_tests.len(), 2);
        assert_eq!(
            sections.case_info.selected_tests[0].tube_requirements,
            vec!["EDTA", "SST"]
        );
        // projections derived at load: the guid-less test is dropped from test_info
        assert_eq!(sections.case_info.test_info, vec!["g-4"]);
        assert_eq!(sections.case_info.test_name, "CBC, No Guid Panel");
    }

    #[test]
    fn test_attachment_url_projection() {
        let sections = sections_from_record(&sample_record());
        let doc = &sections.order_info.documents[0];
        assert_eq!(doc.name, "requisition.pdf");
        assert_eq!(doc.locator, "https://files.example.com/orders/77/requisition.pdf");
        assert!(!doc.is_new_upload);
    }

    #[test]
    fn test_flag_string_tolerance() {
        let sections = sections_from_record(&sample_record());
        assert_eq!(sections.personal.homebound, Some(true));
    }

    #[test]
    fn test_missing_shapes_default_empty() {
        let sections = sections_from_record(&json!({}));
        assert!(sections.personal.first_name.is_none());
        assert!(sections.case_info.selected_tests.is_empty());
        assert!(sections.order_info.documents.is_empty());
    }

    #[test]
    fn test_load_existing_order_sets_snapshot_and_identity() {
        let draft = load_existing_order(&sample_record(), DraftMode::Edit).unwrap();
        assert_eq!(draft.order_guid.as_deref(), Some("order-77"));
        assert_eq!(draft.patient_guid.as_deref(), Some("patient-9"));
        assert!(draft.original_snapshot().is_some());
        assert_eq!(draft.insurance.primary.relationship, Some(Relationship::SelfCovered));
    }
}
