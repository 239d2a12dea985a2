//! Output module for writing extracted listings
//!
//! This module handles:
//! - The `ListingRecord` row written for every listing
//! - The `RecordSink` contract used by the orchestrator
//! - The pipe-delimited, fully quoted dump file

mod delimited;
mod traits;

pub use delimited::{open_output_file, DelimitedWriter, DELIMITER, HEADER};
pub use traits::{OutputError, OutputResult, RecordSink};

/// One row of the dump file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRecord {
    pub business_name: String,
    pub location: String,
    /// Comma-joined phone numbers, empty when none were found
    pub phone: String,
}

impl ListingRecord {
    pub fn new(business_name: String, location: String, phones: &[String]) -> Self {
        Self {
            business_name,
            location,
            phone: phones.join(","),
        }
    }

    /// Field values in header order
    pub fn fields(&self) -> [&str; 3] {
        [
            self.business_name.as_str(),
            self.location.as_str(),
            self.phone.as_str(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phones_are_comma_joined() {
        let record = ListingRecord::new(
            "Acme".to_string(),
            "Pune".to_string(),
            &["+91-2012345678".to_string(), "+91-9876543210".to_string()],
        );
        assert_eq!(record.phone, "+91-2012345678,+91-9876543210");
    }

    #[test]
    fn test_no_phones() {
        let record = ListingRecord::new("Acme".to_string(), "Pune".to_string(), &[]);
        assert_eq!(record.phone, "");
        assert_eq!(record.fields(), ["Acme", "Pune", ""]);
    }
}
