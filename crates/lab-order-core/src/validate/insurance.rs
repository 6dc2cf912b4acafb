//! Insurance section rules, gated by the billing type.

use super::{is_blank, FieldErrors, LETTERS_RE};
use crate::draft::OrderDraft;
use crate::models::{InsurancePlan, InsuredParty};

/// Primary insured names carry a letters-only, 3-character minimum rule that
/// the secondary side does not. Kept asymmetric to match accepted inputs
/// upstream; see DESIGN.md.
fn check_strict_name(errors: &mut FieldErrors, field: &str, value: &Option<String>, label: &str) {
    match value.as_deref().map(str::trim) {
        None | Some("") => errors.insert(field, format!("{label} is required")),
        Some(name) if !LETTERS_RE.is_match(name) => {
            errors.insert(field, format!("{label} may contain letters only"))
        }
        Some(name) if name.len() < 3 => {
            errors.insert(field, format!("{label} must be at least 3 characters"))
        }
        _ => {}
    }
}

fn check_insured(errors: &mut FieldErrors, prefix: &str, insured: &InsuredParty, strict_names: bool) {
    if strict_names {
        check_strict_name(
            errors,
            &format!("{prefix}_insured_first_name"),
            &insured.first_name,
            "Insured first name",
        );
        check_strict_name(
            errors,
            &format!("{prefix}_insured_last_name"),
            &insured.last_name,
            "Insured last name",
        );
    } else {
        errors.require(
            &format!("{prefix}_insured_first_name"),
            &insured.first_name,
            "Insured first name is required",
        );
        errors.require(
            &format!("{prefix}_insured_last_name"),
            &insured.last_name,
            "Insured last name is required",
        );
    }

    errors.require(
        &format!("{prefix}_insured_gender"),
        &insured.gender,
        "Insured gender is required",
    );
    errors.require(
        &format!("{prefix}_insured_dob"),
        &insured.dob,
        "Insured date of birth is required",
    );
    errors.require(
        &format!("{prefix}_insured_address1"),
        &insured.address1,
        "Insured address is required",
    );
    errors.require(
        &format!("{prefix}_insured_city"),
        &insured.city,
        "Insured city is required",
    );
    errors.require(
        &format!("{prefix}_insured_state"),
        &insured.state,
        "Insured state is required",
    );
    errors.require(
        &format!("{prefix}_insured_zip"),
        &insured.zip,
        "Insured zip code is required",
    );
}

fn check_plan(errors: &mut FieldErrors, prefix: &str, plan: &InsurancePlan, strict_names: bool) {
    errors.require(
        &format!("{prefix}_insurer"),
        &plan.insurer,
        "Insurance carrier is required",
    );
    errors.require(
        &format!("{prefix}_carrier_code"),
        &plan.carrier_code,
        "Carrier code is required",
    );
    if plan.relationship.is_none() {
        errors.insert(&format!("{prefix}_relationship"), "Relationship is required");
    }
    errors.require(
        &format!("{prefix}_policy_number"),
        &plan.policy_number,
        "Policy number is required",
    );

    check_insured(errors, prefix, &plan.insured, strict_names);
}

pub fn validate_insurance(draft: &OrderDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();

    // Evaluated only under insurance billing; every other billing type makes
    // this section trivially valid.
    if !draft.order_info.bills_insurance() {
        return errors;
    }

    check_plan(&mut errors, "primary", &draft.insurance.primary, true);

    if !is_blank(&draft.insurance.secondary.insurer) {
        check_plan(&mut errors, "secondary", &draft.insurance.secondary, false);
    }

    errors
}
