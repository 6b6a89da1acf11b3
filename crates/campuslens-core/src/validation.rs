use validator::ValidationError;

/// Rejects strings that are empty after trimming.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Registration numbers are 1-20 ASCII letters or digits.
pub fn registration_number(value: &str) -> Result<(), ValidationError> {
    let ok = !value.is_empty()
        && value.len() <= 20
        && value.chars().all(|c| c.is_ascii_alphanumeric());
    if !ok {
        let mut err = ValidationError::new("registration_number");
        err.message = Some("must be 1-20 letters or digits".into());
        return Err(err);
    }
    Ok(())
}
