use serde::{Deserialize, Serialize};

/// Validation outcome for a single range field.
///
/// A field is either valid or carries exactly one error kind; the message
/// is derived from the kind so the two can never drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FieldStatus {
    Valid,

    /// Neither an absolute timestamp nor a valid relative expression.
    Format,

    /// Both sides parsed, but this side puts the range out of order.
    RangeOrder,

    /// Resolves outside the accepted wall-clock window.
    Implausible {
        window_start: String,
        window_end: String,
    },
}

impl FieldStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, FieldStatus::Valid)
    }

    /// Human-facing message for inline field errors.
    pub fn message(&self) -> Option<String> {
        match self {
            FieldStatus::Valid => None,
            FieldStatus::Format => Some("Unsupported time format".to_string()),
            FieldStatus::RangeOrder => Some("\"From\" can't be after \"To\"".to_string()),
            FieldStatus::Implausible {
                window_start,
                window_end,
            } => Some(format!(
                "Enter a time between {} and {}",
                window_start, window_end
            )),
        }
    }
}

/// State of one input field after validation.
///
/// Recomputed on every edit and whenever the external range changes;
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    /// Normalized string form of the field value.
    pub value: String,
    pub status: FieldStatus,
}

impl InputState {
    pub fn new(value: impl Into<String>, status: FieldStatus) -> Self {
        Self {
            value: value.into(),
            status,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status.is_valid()
    }
}

/// Validation result for both fields. Always fully populated so the caller
/// can render inline errors per field without exception handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeValidation {
    pub from: InputState,
    pub to: InputState,
}

impl RangeValidation {
    pub fn is_valid(&self) -> bool {
        self.from.is_valid() && self.to.is_valid()
    }
}
