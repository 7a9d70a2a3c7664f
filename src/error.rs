use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoanError {
    #[error("invalid argument: {field} {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    #[error("elapsed years {elapsed_years} outside 0..={term_years}")]
    OutOfRange { elapsed_years: i32, term_years: u32 },
}

impl LoanError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        LoanError::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LoanError;
    use test_log::test;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            LoanError::invalid("principal", "must be positive, got 0").to_string(),
            "invalid argument: principal must be positive, got 0"
        );
        assert_eq!(
            LoanError::OutOfRange {
                elapsed_years: 31,
                term_years: 30
            }
            .to_string(),
            "elapsed years 31 outside 0..=30"
        );
    }
}
