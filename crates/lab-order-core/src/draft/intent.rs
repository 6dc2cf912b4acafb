//! Reducer intents for draft mutation.
//!
//! Every UI edit maps to one [`DraftIntent`]; [`OrderDraft::apply`] performs
//! the write and any cascade in a single transition so the validation engine
//! never observes a half-applied state.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::OrderDraft;
use crate::models::{
    BillingType, DocumentMeta, InsuranceSection, InsuranceSide, InsuredParty, LabTest, OrderType,
    Relationship,
};

/// Value written to a single field.
///
/// `Clear` is the null sentinel: it intentionally blanks an optional value on
/// edit and is distinct from `Text(String::new())`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum FieldWrite {
    Text(String),
    Flag(bool),
    Clear,
}

/// Fields of the personal section addressable by intent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PersonalField {
    FirstName,
    MiddleName,
    LastName,
    Gender,
    Dob,
    Mobile1,
    Mobile2,
    Email,
    Address1,
    Address2,
    City,
    State,
    Zip,
    AddPickupAddress,
    PickupAddress1,
    PickupAddress2,
    PickupCity,
    PickupState,
    PickupZip,
    Race,
    Ethnicity,
    Homebound,
    HardStick,
    Notes,
}

/// Scalar fields of the case section. Test/ICD/service collections have
/// dedicated intents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CaseField {
    OrderingFacility,
    OrderingFacilityName,
    OrderingPhysician,
    OrderingPhysicianName,
}

/// Scalar fields of the order-info section.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderField {
    OrderType,
    DateOfService,
    AppointmentWindow,
    StartDate,
    EndDate,
    Frequency,
    Urgency,
    Fasting,
    WarningNotes,
    BillingType,
}

/// Fields of one insurance plan (side chosen by the intent).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InsuranceField {
    Insurer,
    CarrierCode,
    PolicyNumber,
    GroupNumber,
    Relationship,
    InsuredFirstName,
    InsuredLastName,
    InsuredGender,
    InsuredDob,
    InsuredAddress1,
    InsuredAddress2,
    InsuredCity,
    InsuredState,
    InsuredZip,
}

/// One draft state transition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum DraftIntent {
    SetPersonal(PersonalField, FieldWrite),
    SetCaseInfo(CaseField, FieldWrite),
    SetOrderInfo(OrderField, FieldWrite),
    SetInsurance(InsuranceSide, InsuranceField, FieldWrite),

    /// Idempotent by test id; re-derives the test projections.
    AddTest(LabTest),
    /// No-op when the id is not selected; re-derives the test projections.
    RemoveTest(i64),
    AddIcdCode(String),
    RemoveIcdCode(String),
    /// Adds the tag if absent, removes it if present.
    ToggleService(String),
    AttachDocument(DocumentMeta),
    RemoveDocument(String),
}

/// Keep only the first ten numeric digits of a phone write.
fn first_ten_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).take(10).collect()
}

/// Resolve a write against an optional text field.
fn write_text(slot: &mut Option<String>, write: FieldWrite) {
    match write {
        FieldWrite::Text(value) => *slot = Some(value),
        FieldWrite::Clear => *slot = None,
        FieldWrite::Flag(_) => warn!("flag write against text field ignored"),
    }
}

/// Resolve a write against an optional flag field.
fn write_flag(slot: &mut Option<bool>, write: FieldWrite) {
    match write {
        FieldWrite::Flag(value) => *slot = Some(value),
        FieldWrite::Clear => *slot = None,
        FieldWrite::Text(_) => warn!("text write against flag field ignored"),
    }
}

impl OrderDraft {
    /// Apply one intent, including its cascades, atomically.
    pub fn apply(&mut self, intent: DraftIntent) {
        match intent {
            DraftIntent::SetPersonal(field, write) => self.apply_personal(field, write),
            DraftIntent::SetCaseInfo(field, write) => self.apply_case_info(field, write),
            DraftIntent::SetOrderInfo(field, write) => self.apply_order_info(field, write),
            DraftIntent::SetInsurance(side, field, write) => {
                self.apply_insurance(side, field, write)
            }
            DraftIntent::AddTest(test) => {
                if !self.case_info.selected_tests.iter().any(|t| t.id == test.id) {
                    self.case_info.selected_tests.push(test);
                }
                self.case_info.rederive_test_projections();
            }
            DraftIntent::RemoveTest(id) => {
                self.case_info.selected_tests.retain(|t| t.id != id);
                self.case_info.rederive_test_projections();
            }
            DraftIntent::AddIcdCode(code) => {
                if !self.case_info.icd_codes.contains(&code) {
                    self.case_info.icd_codes.push(code);
                }
            }
            DraftIntent::RemoveIcdCode(code) => {
                self.case_info.icd_codes.retain(|c| c != &code);
            }
            DraftIntent::ToggleService(tag) => {
                if let Some(pos) = self.case_info.services.iter().position(|s| s == &tag) {
                    self.case_info.services.remove(pos);
                } else {
                    self.case_info.services.push(tag);
                }
            }
            DraftIntent::AttachDocument(doc) => self.order_info.documents.push(doc),
            DraftIntent::RemoveDocument(id) => {
                self.order_info.documents.retain(|d| d.id != id);
            }
        }
    }

    fn apply_personal(&mut self, field: PersonalField, write: FieldWrite) {
        let personal = &mut self.personal;
        match field {
            // Phone writes keep only the first ten digits
            PersonalField::Mobile1 | PersonalField::Mobile2 => {
                let write = match write {
                    FieldWrite::Text(raw) => FieldWrite::Text(first_ten_digits(&raw)),
                    other => other,
                };
                let slot = if field == PersonalField::Mobile1 {
                    &mut personal.mobile1
                } else {
                    &mut personal.mobile2
                };
                write_text(slot, write);
            }
            PersonalField::FirstName => write_text(&mut personal.first_name, write),
            PersonalField::MiddleName => write_text(&mut personal.middle_name, write),
            PersonalField::LastName => write_text(&mut personal.last_name, write),
            PersonalField::Gender => write_text(&mut personal.gender, write),
            PersonalField::Dob => write_text(&mut personal.dob, write),
            PersonalField::Email => write_text(&mut personal.email, write),
            PersonalField::Address1 => write_text(&mut personal.address1, write),
            PersonalField::Address2 => write_text(&mut personal.address2, write),
            PersonalField::City => write_text(&mut personal.city, write),
            PersonalField::State => write_text(&mut personal.state, write),
            PersonalField::Zip => write_text(&mut personal.zip, write),
            PersonalField::AddPickupAddress => write_flag(&mut personal.add_pickup_address, write),
            PersonalField::PickupAddress1 => write_text(&mut personal.pickup_address1, write),
            PersonalField::PickupAddress2 => write_text(&mut personal.pickup_address2, write),
            PersonalField::PickupCity => write_text(&mut personal.pickup_city, write),
            PersonalField::PickupState => write_text(&mut personal.pickup_state, write),
            PersonalField::PickupZip => write_text(&mut personal.pickup_zip, write),
            PersonalField::Race => write_text(&mut personal.race, write),
            PersonalField::Ethnicity => write_text(&mut personal.ethnicity, write),
            PersonalField::Homebound => write_flag(&mut personal.homebound, write),
            PersonalField::HardStick => write_flag(&mut personal.hard_stick, write),
            PersonalField::Notes => write_text(&mut personal.notes, write),
        }
    }

    fn apply_case_info(&mut self, field: CaseField, write: FieldWrite) {
        let case = &mut self.case_info;
        match field {
            // A facility change invalidates the physician selection
            CaseField::OrderingFacility => {
                write_text(&mut case.ordering_facility, write);
                case.ordering_physician = None;
                case.ordering_physician_name = None;
            }
            CaseField::OrderingFacilityName => write_text(&mut case.ordering_facility_name, write),
            CaseField::OrderingPhysician => write_text(&mut case.ordering_physician, write),
            CaseField::OrderingPhysicianName => {
                write_text(&mut case.ordering_physician_name, write)
            }
        }
    }

    fn apply_order_info(&mut self, field: OrderField, write: FieldWrite) {
        let order = &mut self.order_info;
        match field {
            OrderField::OrderType => {
                order.order_type = match write {
                    FieldWrite::Text(label) => {
                        let parsed = OrderType::parse(&label);
                        if parsed.is_none() {
                            warn!(%label, "unrecognized order type");
                        }
                        parsed
                    }
                    _ => None,
                };
            }
            OrderField::BillingType => {
                order.billing_type = match write {
                    FieldWrite::Text(label) => {
                        let parsed = BillingType::parse(&label);
                        if parsed.is_none() {
                            warn!(%label, "unrecognized billing type");
                        }
                        parsed
                    }
                    _ => None,
                };
                // Leaving insurance billing clears the whole insurance block
                if order.billing_type != Some(BillingType::Insurance) {
                    self.insurance = InsuranceSection::default();
                }
            }
            OrderField::DateOfService => write_text(&mut order.date_of_service, write),
            OrderField::AppointmentWindow => write_text(&mut order.appointment_window, write),
            OrderField::StartDate => write_text(&mut order.start_date, write),
            OrderField::EndDate => write_text(&mut order.end_date, write),
            OrderField::Frequency => write_text(&mut order.frequency, write),
            OrderField::Urgency => write_text(&mut order.urgency, write),
            OrderField::Fasting => write_flag(&mut order.fasting, write),
            OrderField::WarningNotes => write_text(&mut order.warning_notes, write),
        }
    }

    fn apply_insurance(&mut self, side: InsuranceSide, field: InsuranceField, write: FieldWrite) {
        if field == InsuranceField::Relationship {
            let relationship = match write {
                FieldWrite::Text(label) => Relationship::parse(&label),
                _ => None,
            };
            // Selecting SELF copies the personal block once, overwriting the
            // sub-record; later personal edits do not flow through.
            if relationship == Some(Relationship::SelfCovered) {
                self.insurance.plan_mut(side).insured = InsuredParty::from_personal(&self.personal);
            }
            self.insurance.plan_mut(side).relationship = relationship;
            return;
        }

        let plan = self.insurance.plan_mut(side);
        match field {
            InsuranceField::Insurer => write_text(&mut plan.insurer, write),
            InsuranceField::CarrierCode => write_text(&mut plan.carrier_code, write),
            InsuranceField::PolicyNumber => write_text(&mut plan.policy_number, write),
            InsuranceField::GroupNumber => write_text(&mut plan.group_number, write),
            InsuranceField::InsuredFirstName => write_text(&mut plan.insured.first_name, write),
            InsuranceField::InsuredLastName => write_text(&mut plan.insured.last_name, write),
            InsuranceField::InsuredGender => write_text(&mut plan.insured.gender, write),
            InsuranceField::InsuredDob => write_text(&mut plan.insured.dob, write),
            InsuranceField::InsuredAddress1 => write_text(&mut plan.insured.address1, write),
            InsuranceField::InsuredAddress2 => write_text(&mut plan.insured.address2, write),
            InsuranceField::InsuredCity => write_text(&mut plan.insured.city, write),
            InsuranceField::InsuredState => write_text(&mut plan.insured.state, write),
            InsuranceField::InsuredZip => write_text(&mut plan.insured.zip, write),
            InsuranceField::Relationship => unreachable!("handled above"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test(id: i64, name: &str, guid: &str) -> LabTest {
        LabTest {
            id,
            guid: Some(guid.into()),
            code: name.into(),
            name: name.into(),
            tube_requirements: vec![],
        }
    }

    #[test]
    fn test_mobile_truncates_to_ten_digits() {
        let mut draft = OrderDraft::new();
        draft.apply(DraftIntent::SetPersonal(
            PersonalField::Mobile1,
            FieldWrite::Text("(512) 555-0134 ext 22".into()),
        ));
        assert_eq!(draft.personal.mobile1.as_deref(), Some("5125550134"));
    }

    #[test]
    fn test_clear_is_distinct_from_empty_text() {
        let mut draft = OrderDraft::new();
        draft.apply(DraftIntent::SetPersonal(
            PersonalField::Email,
            FieldWrite::Text(String::new()),
        ));
        assert_eq!(draft.personal.email.as_deref(), Some(""));

        draft.apply(DraftIntent::SetPersonal(PersonalField::Email, FieldWrite::Clear));
        assert!(draft.personal.email.is_none());
    }

    #[test]
    fn test_facility_change_clears_physician() {
        let mut draft = OrderDraft::new();
        draft.apply(DraftIntent::SetCaseInfo(
            CaseField::OrderingPhysician,
            FieldWrite::Text("dr-guid".into()),
        ));
        draft.apply(DraftIntent::SetCaseInfo(
            CaseField::OrderingPhysicianName,
            FieldWrite::Text("DR. LIN".into()),
        ));
        draft.apply(DraftIntent::SetCaseInfo(
            CaseField::OrderingFacility,
            FieldWrite::Text("facility-2".into()),
        ));

        assert_eq!(draft.case_info.ordering_facility.as_deref(), Some("facility-2"));
        assert!(draft.case_info.ordering_physician.is_none());
        assert!(draft.case_info.ordering_physician_name.is_none());
    }

    #[test]
    fn test_add_test_idempotent_and_projections_track() {
        let mut draft = OrderDraft::new();
        draft.apply(DraftIntent::AddTest(test(1, "CBC", "g-1")));
        draft.apply(DraftIntent::AddTest(test(1, "CBC", "g-1")));
        draft.apply(DraftIntent::AddTest(test(2, "BMP", "g-2")));

        assert_eq!(draft.case_info.selected_tests.len(), 2);
        assert_eq!(draft.case_info.test_info, vec!["g-1", "g-2"]);
        assert_eq!(draft.case_info.test_name, "CBC, BMP");

        // Removing a non-selected test is a no-op
        draft.apply(DraftIntent::RemoveTest(99));
        assert_eq!(draft.case_info.selected_tests.len(), 2);

        draft.apply(DraftIntent::RemoveTest(1));
        assert_eq!(draft.case_info.test_info, vec!["g-2"]);
        assert_eq!(draft.case_info.test_name, "BMP");
    }

    #[test]
    fn test_billing_change_clears_insurance_block() {
        let mut draft = OrderDraft::new();
        draft.apply(DraftIntent::SetOrderInfo(
            OrderField::BillingType,
            FieldWrite::Text("INSURANCE".into()),
        ));
        draft.apply(DraftIntent::SetInsurance(
            InsuranceSide::Primary,
            InsuranceField::PolicyNumber,
            FieldWrite::Text("POL-77".into()),
        ));

        draft.apply(DraftIntent::SetOrderInfo(
            OrderField::BillingType,
            FieldWrite::Text("CLIENT".into()),
        ));
        assert!(draft.insurance.primary.policy_number.is_none());
    }

    #[test]
    fn test_self_relationship_copies_once() {
        let mut draft = OrderDraft::new();
        draft.apply(DraftIntent::SetPersonal(
            PersonalField::FirstName,
            FieldWrite::Text("MARIA".into()),
        ));
        draft.apply(DraftIntent::SetInsurance(
            InsuranceSide::Primary,
            InsuranceField::Relationship,
            FieldWrite::Text("SELF".into()),
        ));
        assert_eq!(
            draft.insurance.primary.insured.first_name.as_deref(),
            Some("MARIA")
        );

        // Not a live binding: later personal edits do not retrofit the copy
        draft.apply(DraftIntent::SetPersonal(
            PersonalField::FirstName,
            FieldWrite::Text("MARIANA".into()),
        ));
        assert_eq!(
            draft.insurance.primary.insured.first_name.as_deref(),
            Some("MARIA")
        );
    }

    #[test]
    fn test_toggle_service() {
        let mut draft = OrderDraft::new();
        draft.apply(DraftIntent::ToggleService("BLOOD DRAW".into()));
        assert_eq!(draft.case_info.services, vec!["BLOOD DRAW"]);
        draft.apply(DraftIntent::ToggleService("BLOOD DRAW".into()));
        assert!(draft.case_info.services.is_empty());
    }
}
