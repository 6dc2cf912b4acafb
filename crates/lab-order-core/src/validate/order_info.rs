//! Order section rules: scheduling, urgency, fasting, standing windows.

use chrono::NaiveDate;

use super::{is_blank, FieldErrors};
use crate::draft::OrderDraft;

fn parse_date(value: &Option<String>) -> Option<NaiveDate> {
    value
        .as_deref()
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
}

pub fn validate_order_info(draft: &OrderDraft) -> FieldErrors {
    let order = &draft.order_info;
    let mut errors = FieldErrors::new();

    if order.order_type.is_none() {
        errors.insert("order_type", "Order type is required");
    }
    errors.require(
        "date_of_service",
        &order.date_of_service,
        "Date of service is required",
    );
    errors.require("urgency", &order.urgency, "Urgency is required");

    // Tri-state on purpose: an explicit "not fasting" is valid, unset is not.
    if order.fasting.is_none() {
        errors.insert("fasting", "Select whether the patient is fasting");
    }

    if order.is_standing() {
        errors.require("start_date", &order.start_date, "Start date is required");
        errors.require("end_date", &order.end_date, "End date is required");
        errors.require("frequency", &order.frequency, "Frequency is required");

        // Window check only when both ends parse; blanks are already covered
        // by the required rules above.
        if !is_blank(&order.start_date) && !is_blank(&order.end_date) {
            if let (Some(start), Some(end)) =
                (parse_date(&order.start_date), parse_date(&order.end_date))
            {
                if end < start {
                    errors.insert("end_date", "End date cannot precede the start date");
                }
            }
        }
    }

    errors
}
