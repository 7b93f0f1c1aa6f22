use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty {
        field: &'static str,
    },
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    WrongLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    InvalidPhoneNumber {
        input: String,
    },
    InvalidHost {
        input: String,
    },
    UnknownCode {
        field: &'static str,
        value: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::TooLong { field, max, actual } => {
                write!(f, "{field} is too long: {actual} characters (max {max})")
            }
            Self::WrongLength {
                field,
                expected,
                actual,
            } => write!(
                f,
                "{field} must be {expected} characters long (got {actual})"
            ),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidHost { input } => write!(f, "invalid API host: {input}"),
            Self::UnknownCode { field, value } => write!(f, "unknown {field} code: {value:?}"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty { field: "sender" };
        assert_eq!(err.to_string(), "sender must not be empty");

        let err = ValidationError::TooLong {
            field: "sender",
            max: 11,
            actual: 12,
        };
        assert_eq!(
            err.to_string(),
            "sender is too long: 12 characters (max 11)"
        );

        let err = ValidationError::WrongLength {
            field: "voucher",
            expected: 14,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "voucher must be 14 characters long (got 3)"
        );

        let err = ValidationError::InvalidPhoneNumber {
            input: "bad".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid phone number: bad");

        let err = ValidationError::UnknownCode {
            field: "status",
            value: "X".to_owned(),
        };
        assert_eq!(err.to_string(), "unknown status code: \"X\"");
    }
}
