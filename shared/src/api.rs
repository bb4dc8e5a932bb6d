use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::parse_date_str;

/// Form body submitted by the edit page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditDatesForm {
    #[serde(default)]
    pub last_reserved: Option<String>,
    #[serde(default)]
    pub available_again: Option<String>,
}

impl EditDatesForm {
    /// Parsed last-reserved date; blank or unparseable input clears the cell.
    pub fn last_reserved(&self) -> Option<NaiveDate> {
        self.last_reserved.as_deref().and_then(parse_date_str)
    }

    /// Parsed available-again date; blank or unparseable input clears the cell.
    pub fn available_again(&self) -> Option<NaiveDate> {
        self.available_again.as_deref().and_then(parse_date_str)
    }
}
