//! Input validation
//!
//! Pure checks run before any store access. Both functions return the typed
//! value on success so callers cannot skip validation and still build a
//! [`ContactRecord`](crate::ContactRecord).

use crate::error::ContactError;
use crate::model::{Address, Phone};

/// Required number of digits in a phone number
pub const PHONE_DIGITS: usize = 11;

/// Accepts exactly 11 ASCII digits with no separators or padding.
pub fn validate_phone(s: &str) -> Result<Phone, ContactError> {
    if s.len() == PHONE_DIGITS && s.bytes().all(|b| b.is_ascii_digit()) {
        Ok(Phone::new_unchecked(s.to_string()))
    } else {
        Err(ContactError::invalid_format(s))
    }
}

/// Rejects addresses that are empty after trimming whitespace.
pub fn validate_address(s: &str) -> Result<Address, ContactError> {
    if s.trim().is_empty() {
        Err(ContactError::EmptyValue)
    } else {
        Ok(Address::new_unchecked(s.to_string()))
    }
}
