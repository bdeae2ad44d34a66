use serde::{Deserialize, Serialize};

/// One staff member, as written to the output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffRecord {
    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,
    pub img: String,
    /// Index into `parser::degree::DEGREE_LABELS`, or `DEGREE_UNKNOWN`.
    pub degree: u8,
}
