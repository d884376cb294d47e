// src/common/validation.rs

use rust_decimal::Decimal;
use validator::ValidationError;

// Validação compartilhada pelos payloads monetários.
pub fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_not_negative;
    use rust_decimal::Decimal;

    #[test]
    fn rejects_negative_values() {
        assert!(validate_not_negative(&Decimal::new(-1, 2)).is_err());
        assert!(validate_not_negative(&Decimal::ZERO).is_ok());
        assert!(validate_not_negative(&Decimal::new(1050, 2)).is_ok());
    }
}
