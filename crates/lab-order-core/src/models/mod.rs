//! Domain models for the lab-order intake core.

mod case_info;
mod insurance;
mod order_info;
mod personal;

pub use case_info::*;
pub use insurance::*;
pub use order_info::*;
pub use personal::*;

use serde::{Deserialize, Serialize};

/// One of the four named groups of draft fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Section {
    Personal,
    CaseInfo,
    OrderInfo,
    Insurance,
}
