//! Stable machine-readable codes for spec diagnostics.

use serde::Serialize;

/// What kind of problem a diagnostic reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// `v` is not a supported spec version
    UnsupportedVersion,
    /// `preset` names no known preset
    UnknownPreset,
    /// A value is out of range or otherwise unusable
    InvalidValue,
    /// A required value is missing or empty
    MissingValue,
    /// A category name is not one the analyzer emits
    UnknownCategory,
    /// A field the schema does not define
    UnknownField,
}

impl ErrorCode {
    /// Returns the snake_case name used in JSON and messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedVersion => "unsupported_version",
            Self::UnknownPreset => "unknown_preset",
            Self::InvalidValue => "invalid_value",
            Self::MissingValue => "missing_value",
            Self::UnknownCategory => "unknown_category",
            Self::UnknownField => "unknown_field",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
