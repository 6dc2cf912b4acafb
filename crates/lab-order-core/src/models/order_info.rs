//! Order section: scheduling, urgency, billing, attached documents.

use serde::{Deserialize, Serialize};

/// Visit pattern for the order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderType {
    #[serde(rename = "ONE VISIT")]
    OneVisit,
    #[serde(rename = "STANDING")]
    Standing,
    #[serde(rename = "RETURN VISIT")]
    ReturnVisit,
}

impl OrderType {
    /// Wire label for the backend payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::OneVisit => "ONE VISIT",
            OrderType::Standing => "STANDING",
            OrderType::ReturnVisit => "RETURN VISIT",
        }
    }

    /// Parse a backend label, tolerating case differences.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "ONE VISIT" => Some(OrderType::OneVisit),
            "STANDING" => Some(OrderType::Standing),
            "RETURN VISIT" => Some(OrderType::ReturnVisit),
            _ => None,
        }
    }
}

/// Who pays for the order. Anything other than `Insurance` logically clears
/// the insurance section.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BillingType {
    #[serde(rename = "INSURANCE")]
    Insurance,
    #[serde(rename = "CLIENT")]
    Client,
    #[serde(rename = "SELF PAY")]
    SelfPay,
}

impl BillingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingType::Insurance => "INSURANCE",
            BillingType::Client => "CLIENT",
            BillingType::SelfPay => "SELF PAY",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "INSURANCE" => Some(BillingType::Insurance),
            "CLIENT" => Some(BillingType::Client),
            "SELF PAY" | "SELFPAY" | "SELF-PAY" => Some(BillingType::SelfPay),
            _ => None,
        }
    }
}

/// Metadata for an attached document. The core never holds file bytes;
/// uploads are tracked by an external keyed store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocumentMeta {
    pub id: String,
    pub name: String,
    pub size: u64,
    /// Storage locator (URL or store key)
    pub locator: String,
    /// True for documents attached this session and not yet uploaded
    pub is_new_upload: bool,
    /// RFC 3339 timestamp, set for new uploads
    pub uploaded_at: Option<String>,
}

impl DocumentMeta {
    /// Metadata for a file attached this session. Bytes stay with the
    /// external store; the id is minted locally.
    pub fn new_upload(name: String, size: u64, locator: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            size,
            locator,
            is_new_upload: true,
            uploaded_at: Some(chrono::Utc::now().to_rfc3339()),
        }
    }
}

/// The `orderInfo` section of an order draft.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderInfoSection {
    pub order_type: Option<OrderType>,
    /// `YYYY-MM-DD`
    pub date_of_service: Option<String>,
    /// Appointment window label (e.g. "8AM - 10AM"), uppercased on load
    pub appointment_window: Option<String>,

    // Standing-order schedule; only meaningful when `order_type` is Standing
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub frequency: Option<String>,

    pub urgency: Option<String>,
    /// Tri-state: unset is a validation error, `Some(false)` is valid
    pub fasting: Option<bool>,
    pub warning_notes: Option<String>,

    pub billing_type: Option<BillingType>,
    pub documents: Vec<DocumentMeta>,
}

impl OrderInfoSection {
    pub fn is_standing(&self) -> bool {
        self.order_type == Some(OrderType::Standing)
    }

    pub fn bills_insurance(&self) -> bool {
        self.billing_type == Some(BillingType::Insurance)
    }
}
