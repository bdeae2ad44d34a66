use crate::error::{Result, ScrapeError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName {
    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,
}

/// "Last First [Middle…]" → parts. Anything past the second token becomes the
/// middle name, space-joined.
pub fn normalize_name(full_name: &str) -> Result<PersonName> {
    let tokens: Vec<&str> = full_name.split_whitespace().collect();

    match tokens.as_slice() {
        [last, first, rest @ ..] => Ok(PersonName {
            last_name: last.to_string(),
            first_name: first.to_string(),
            middle_name: rest.join(" "),
        }),
        _ => Err(ScrapeError::validation(format!(
            "full name {:?} has {} token(s), need at least 2",
            full_name.trim(),
            tokens.len()
        ))),
    }
}
