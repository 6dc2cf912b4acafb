//! Personal section rules: identity, contact formats, home and pickup address.

use super::{FieldErrors, EMAIL_RE, TEN_DIGITS_RE, ZIP_RE};
use crate::draft::OrderDraft;

pub fn validate_personal(draft: &OrderDraft) -> FieldErrors {
    let personal = &draft.personal;
    let mut errors = FieldErrors::new();

    errors.require("first_name", &personal.first_name, "First name is required");
    errors.require("last_name", &personal.last_name, "Last name is required");
    errors.require("gender", &personal.gender, "Gender is required");
    errors.require("dob", &personal.dob, "Date of birth is required");
    errors.require("mobile1", &personal.mobile1, "Mobile number is required");

    for (field, value) in [("mobile1", &personal.mobile1), ("mobile2", &personal.mobile2)] {
        if let Some(number) = value.as_deref() {
            if !number.trim().is_empty() && !TEN_DIGITS_RE.is_match(number.trim()) {
                errors.insert(field, "Mobile number must be exactly 10 digits");
            }
        }
    }

    if let Some(email) = personal.email.as_deref() {
        if !email.trim().is_empty() && !EMAIL_RE.is_match(email.trim()) {
            errors.insert("email", "Enter a valid email address");
        }
    }

    errors.require("address1", &personal.address1, "Address is required");
    errors.require("city", &personal.city, "City is required");
    errors.require("state", &personal.state, "State is required");
    errors.require("zip", &personal.zip, "Zip code is required");

    if let Some(zip) = personal.zip.as_deref() {
        if !zip.trim().is_empty() && !ZIP_RE.is_match(zip.trim()) {
            errors.insert("zip", "Enter a valid zip code");
        }
    }

    // Pickup address applies only when not mirroring the home address. Any
    // one filled field makes each of the four individually required; none
    // filled raises one combined error on both gating fields.
    if personal.add_pickup_address != Some(true) {
        if personal.any_pickup_field_set() {
            errors.require(
                "pickup_address1",
                &personal.pickup_address1,
                "Pickup address is required",
            );
            errors.require("pickup_city", &personal.pickup_city, "Pickup city is required");
            errors.require("pickup_state", &personal.pickup_state, "Pickup state is required");
            errors.require("pickup_zip", &personal.pickup_zip, "Pickup zip code is required");
            if let Some(zip) = personal.pickup_zip.as_deref() {
                if !zip.trim().is_empty() && !ZIP_RE.is_match(zip.trim()) {
                    errors.insert("pickup_zip", "Enter a valid zip code");
                }
            }
        } else {
            let message = "Provide a pickup address or use the home address";
            errors.insert("pickup_address1", message);
            errors.insert("add_pickup_address", message);
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_personal() -> OrderDraft {
        let mut draft = OrderDraft::new();
        draft.personal.first_name = Some("ANA".into());
        draft.personal.last_name = Some("REYES".into());
        draft.personal.gender = Some("FEMALE".into());
        draft.personal.dob = Some("1975-02-11".into());
        draft.personal.mobile1 = Some("5125550134".into());
        draft.personal.address1 = Some("12 OAK ST".into());
        draft.personal.city = Some("AUSTIN".into());
        draft.personal.state = Some("TX".into());
        draft.personal.zip = Some("78701".into());
        draft.personal.add_pickup_address = Some(true);
        draft
    }

    #[test]
    fn test_clean_personal_section() {
        assert!(validate_personal(&filled_personal()).is_valid());
    }

    #[test]
    fn test_required_fields_reported() {
        let errors = validate_personal(&OrderDraft::new());
        assert!(errors.get("first_name").is_some());
        assert!(errors.get("mobile1").is_some());
        assert!(errors.get("zip").is_some());
    }

    #[test]
    fn test_mobile_format() {
        let mut draft = filled_personal();
        draft.personal.mobile2 = Some("512555".into());
        let errors = validate_personal(&draft);
        assert_eq!(errors.get("mobile2"), Some("Mobile number must be exactly 10 digits"));
    }

    #[test]
    fn test_email_format_only_when_present() {
        let mut draft = filled_personal();
        draft.personal.email = Some("".into());
        assert!(validate_personal(&draft).is_valid());

        draft.personal.email = Some("nope".into());
        assert!(validate_personal(&draft).get("email").is_some());
    }

    #[test]
    fn test_pickup_combined_error_when_none_filled() {
        let mut draft = filled_personal();
        draft.personal.add_pickup_address = Some(false);
        let errors = validate_personal(&draft);
        assert_eq!(errors.get("pickup_address1"), errors.get("add_pickup_address"));
        assert!(errors.get("pickup_address1").is_some());
    }

    #[test]
    fn test_partial_pickup_requires_each_field() {
        let mut draft = filled_personal();
        draft.personal.add_pickup_address = None;
        draft.personal.pickup_city = Some("AUSTIN".into());
        let errors = validate_personal(&draft);
        assert!(errors.get("pickup_address1").is_some());
        assert!(errors.get("pickup_state").is_some());
        assert!(errors.get("pickup_zip").is_some());
        assert!(errors.get("pickup_city").is_none());
        assert!(errors.get("add_pickup_address").is_none());
    }

    #[test]
    fn test_mirroring_disables_pickup_rules() {
        let mut draft = filled_personal();
        draft.personal.add_pickup_address = Some(true);
        assert!(validate_personal(&draft).is_valid());
    }
}
