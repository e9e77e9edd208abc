use thiserror::Error;

/// Errors produced while building or serializing a MIDI document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MidiError {
    /// An argument was outside of its legal range. The document is left untouched.
    #[error("Invalid parameter `{name}` = {value} (expected {expected})..!")]
    InvalidParameter {
        name: &'static str,
        value: String,
        expected: &'static str,
    },

    /// A value does not fit in the fixed or variable width field it is written to.
    #[error("Encoding overflow for {field}: {value} exceeds the maximum of {max}..!")]
    EncodingOverflow {
        field: &'static str,
        value: u64,
        max: u64,
    },
}

impl MidiError {
    pub(crate) fn invalid(
        name: &'static str,
        value: impl ToString,
        expected: &'static str,
    ) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
            expected,
        }
    }

    pub(crate) const fn overflow(field: &'static str, value: u64, max: u64) -> Self {
        Self::EncodingOverflow { field, value, max }
    }

    pub const fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }

    pub const fn is_encoding_overflow(&self) -> bool {
        matches!(self, Self::EncodingOverflow { .. })
    }
}

pub type Result<T> = std::result::Result<T, MidiError>;
