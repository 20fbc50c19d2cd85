use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    InvalidRadius {
        inner: f32,
        outer: f32,
    },
    InvalidColor(String),
    InvalidDeceleration {
        min: f32,
        max: f32,
    },
    InvalidSpinParameter {
        name: &'static str,
        value: f32,
    },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch {
                what,
                expected,
                actual,
            } => write!(
                f,
                "{what} and segments must have the same length (expected {expected}, got {actual})"
            ),
            Self::InvalidRadius { inner, outer } => write!(
                f,
                "inner radius ({inner}) must be in 0..{outer} (the outer radius)"
            ),
            Self::InvalidColor(color) => write!(f, "cannot parse `{color}` as a color"),
            Self::InvalidDeceleration { min, max } => write!(
                f,
                "deceleration range is invalid: min ({min}) must be <= max ({max}) and both in (0, 1)"
            ),
            Self::InvalidSpinParameter { name, value } => {
                write!(f, "spin parameter `{name}` cannot be {value}")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}
