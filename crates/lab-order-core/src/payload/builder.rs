//! Assembles a [`CreationPayload`] from a draft.
//!
//! Build steps, in order: patient block, test GUID projection, tube
//! aggregation, insurance gating, standing-schedule gating, service address
//! derivation, case-normalization transform.

use tracing::warn;

use super::{
    normalize_case, CreationPayload, DocumentRecord, InsuredRecord, PatientData, TubeCount,
    MAX_TUBE_COUNT,
};
use crate::draft::OrderDraft;
use crate::models::{InsurancePlan, LabTest};

/// Wire form of an optional text field: missing becomes the empty string.
fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Count tube requirements across the selected tests, clamping each count at
/// [`MAX_TUBE_COUNT`]. Output is sorted by tube name so the same test set
/// yields the same aggregation regardless of selection order.
pub fn aggregate_tubes(tests: &[LabTest]) -> Vec<TubeCount> {
    let mut counts: Vec<TubeCount> = Vec::new();
    for test in tests {
        for tube in &test.tube_requirements {
            match counts.iter_mut().find(|c| c.tube_name == *tube) {
                Some(entry) => entry.tube_count = (entry.tube_count + 1).min(MAX_TUBE_COUNT),
                None => counts.push(TubeCount {
                    tube_name: tube.clone(),
                    tube_count: 1,
                }),
            }
        }
    }
    counts.sort_by(|a, b| a.tube_name.cmp(&b.tube_name));
    counts
}

fn insured_record(plan: &InsurancePlan) -> InsuredRecord {
    InsuredRecord {
        first_name: text(&plan.insured.first_name),
        last_name: text(&plan.insured.last_name),
        gender: text(&plan.insured.gender),
        dob: text(&plan.insured.dob),
        address1: text(&plan.insured.address1),
        address2: text(&plan.insured.address2),
        city: text(&plan.insured.city),
        state: text(&plan.insured.state),
        zipcode: text(&plan.insured.zip),
    }
}

/// Join non-empty address parts with single spaces (legacy consumers).
fn join_address(parts: [&str; 5]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn assemble(draft: &OrderDraft) -> CreationPayload {
    let personal = &draft.personal;
    let case = &draft.case_info;
    let order = &draft.order_info;

    let mut payload = CreationPayload {
        patient_data: PatientData {
            first_name: text(&personal.first_name),
            middle_name: text(&personal.middle_name),
            last_name: text(&personal.last_name),
            gender: text(&personal.gender),
            dob: text(&personal.dob),
            mobile1: text(&personal.mobile1),
            mobile2: text(&personal.mobile2),
            email: text(&personal.email),
            address1: text(&personal.address1),
            address2: text(&personal.address2),
            city: text(&personal.city),
            state: text(&personal.state),
            zipcode: text(&personal.zip),
            race: text(&personal.race),
            ethnicity: text(&personal.ethnicity),
            homebound: personal.homebound.unwrap_or(false),
            hard_stick: personal.hard_stick.unwrap_or(false),
            patient_notes: text(&personal.notes),
        },
        test_info: case
            .selected_tests
            .iter()
            .filter_map(|t| t.guid.clone())
            .collect(),
        test_name: case.test_name.clone(),
        tube_data: aggregate_tubes(&case.selected_tests),
        icd_codes: case.icd_codes.clone(),
        services: case.services.clone(),
        ordering_facility: text(&case.ordering_facility),
        ordering_facility_name: text(&case.ordering_facility_name),
        ordering_physician: text(&case.ordering_physician),
        ordering_physician_name: text(&case.ordering_physician_name),

        order_type: order.order_type.map(|t| t.as_str().to_string()).unwrap_or_default(),
        date_of_service: text(&order.date_of_service),
        appointment_window: text(&order.appointment_window),
        start_date: String::new(),
        end_date: String::new(),
        frequency: String::new(),
        urgency: text(&order.urgency),
        fasting: order.fasting,
        warning_notes: text(&order.warning_notes),

        billing_type: order
            .billing_type
            .map(|b| b.as_str().to_string())
            .unwrap_or_default(),
        ..CreationPayload::default()
    };

    // Standing schedule travels only on standing orders
    if order.is_standing() {
        payload.start_date = text(&order.start_date);
        payload.end_date = text(&order.end_date);
        payload.frequency = text(&order.frequency);
    }

    // Hard zeroing: anything other than insurance billing sends an empty
    // insurance block, stale draft values notwithstanding
    if order.bills_insurance() {
        let primary = &draft.insurance.primary;
        let secondary = &draft.insurance.secondary;
        payload.primary_insurance = text(&primary.insurer);
        payload.primary_carrier_code = text(&primary.carrier_code);
        payload.primary_policy_number = text(&primary.policy_number);
        payload.primary_group_number = text(&primary.group_number);
        payload.primary_relationship = primary
            .relationship
            .map(|r| r.as_str().to_string())
            .unwrap_or_default();
        payload.primary_insured = insured_record(primary);
        payload.secondary_insurance = text(&secondary.insurer);
        payload.secondary_carrier_code = text(&secondary.carrier_code);
        payload.secondary_policy_number = text(&secondary.policy_number);
        payload.secondary_group_number = text(&secondary.group_number);
        payload.secondary_relationship = secondary
            .relationship
            .map(|r| r.as_str().to_string())
            .unwrap_or_default();
        payload.secondary_insured = insured_record(secondary);
    }

    // Service address mirrors the home address when requested, otherwise the
    // explicit pickup fields are used
    let (line1, line2, city, state, zip) = if personal.add_pickup_address == Some(true) {
        (
            text(&personal.address1),
            text(&personal.address2),
            text(&personal.city),
            text(&personal.state),
            text(&personal.zip),
        )
    } else {
        (
            text(&personal.pickup_address1),
            text(&personal.pickup_address2),
            text(&personal.pickup_city),
            text(&personal.pickup_state),
            text(&personal.pickup_zip),
        )
    };
    payload.service_address = join_address([&line1, &line2, &city, &state, &zip]);
    payload.service_address_line1 = line1;
    payload.service_address_line2 = line2;
    payload.service_address_city = city;
    payload.service_address_state = state;
    payload.service_address_zipcode = zip;

    payload.documents = order
        .documents
        .iter()
        .map(|d| DocumentRecord {
            id: d.id.clone(),
            name: d.name.clone(),
            size: d.size,
            locator: d.locator.clone(),
            is_new_upload: d.is_new_upload,
        })
        .collect();

    payload
}

/// Build the create payload for a draft. Deterministic, no I/O. If the
/// case-normalization transform fails the untransformed payload is returned
/// rather than blocking submission.
pub fn build(draft: &OrderDraft) -> CreationPayload {
    let assembled = assemble(draft);

    let value = match serde_json::to_value(&assembled) {
        Ok(value) => value,
        Err(error) => {
            warn!(%error, "payload serialization failed, skipping case transform");
            return assembled;
        }
    };
    match normalize_case(&value) {
        Ok(transformed) => serde_json::from_value(transformed).unwrap_or_else(|error| {
            warn!(%error, "transformed payload did not round-trip, using untransformed");
            assembled
        }),
        Err(error) => {
            warn!(%error, "case transform failed, using untransformed payload");
            assembled
        }
    }
}

/// The payload as a JSON value, the shape the diff builder walks.
pub fn build_value(draft: &OrderDraft) -> serde_json::Value {
    serde_json::to_value(build(draft)).unwrap_or(serde_json::Value::Null)
}
