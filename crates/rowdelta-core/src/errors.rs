use rowdelta_core_types::RequestId;
use thiserror::Error;

/// Result type alias using the canonical structured error
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// in rowdelta. Each kind maps to a stable error code that can be
/// used for programmatic error handling, testing, and CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Usage
    InvalidInput,
    /// A case conversion or comparison policy name was not recognized
    UnknownPolicy,
    /// The two snapshots of a diff do not declare the same primary key
    PrimaryKeyMismatch,
    /// A row does not carry exactly one value per column
    RowShapeMismatch,

    // Navigation
    ColumnNotFound,
    TableNotFound,
    IndexOutOfBounds,

    // Integration/IO
    Io,
    Serialization,
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::UnknownPolicy => "ERR_UNKNOWN_POLICY",
            ExErrorKind::PrimaryKeyMismatch => "ERR_PRIMARY_KEY_MISMATCH",
            ExErrorKind::RowShapeMismatch => "ERR_ROW_SHAPE_MISMATCH",
            ExErrorKind::ColumnNotFound => "ERR_COLUMN_NOT_FOUND",
            ExErrorKind::TableNotFound => "ERR_TABLE_NOT_FOUND",
            ExErrorKind::IndexOutOfBounds => "ERR_INDEX_OUT_OF_BOUNDS",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether this kind signals caller misuse rather than an environment failure
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            ExErrorKind::InvalidInput
                | ExErrorKind::UnknownPolicy
                | ExErrorKind::PrimaryKeyMismatch
                | ExErrorKind::RowShapeMismatch
        )
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling and context
/// (operation, data name, column, index) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    column: Option<String>,
    index: Option<usize>,
    request_id: Option<RequestId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            column: None,
            index: None,
            request_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context (table name or request SQL)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add column context
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Add index context
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the column context, if any
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Get the index context, if any
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity: {})", entity_id)?;
        }
        if let Some(column) = &self.column {
            write!(f, " (column: {})", column)?;
        }
        if let Some(index) = self.index {
            write!(f, " (index: {})", index)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain failures raised while building snapshots and computing changes
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowDeltaError {
    /// The two snapshots being diffed disagree on their primary key
    #[error("Primary key mismatch between snapshots of {data_name}: before={before:?}, after={after:?}")]
    PrimaryKeyMismatch {
        data_name: String,
        before: Vec<String>,
        after: Vec<String>,
    },

    /// A declared primary-key column does not exist in the snapshot
    #[error("Primary key column {column} not found in {data_name}")]
    UnknownPrimaryKeyColumn { data_name: String, column: String },

    /// A row does not have one value per column
    #[error("Row {row_index} of {data_name} has {actual} values, expected {expected}")]
    RowShape {
        data_name: String,
        row_index: usize,
        expected: usize,
        actual: usize,
    },

    /// A case conversion or comparison name was not recognized
    #[error("Unknown {policy} policy: {name:?}")]
    UnknownPolicy { policy: String, name: String },

    /// Column lookup by name failed
    #[error("Column {column} not found in {data_name}")]
    ColumnNotFound { data_name: String, column: String },

    /// Positional navigation went past the end
    #[error("Index {index} out of bounds for {what} of size {size}")]
    IndexOutOfBounds {
        what: String,
        index: usize,
        size: usize,
    },

    /// Serialization error (JSON/TOML encoding or decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Conversion from RowDeltaError to ExError
impl From<RowDeltaError> for ExError {
    fn from(err: RowDeltaError) -> Self {
        match err {
            RowDeltaError::PrimaryKeyMismatch {
                data_name,
                before,
                after,
            } => ExError::new(ExErrorKind::PrimaryKeyMismatch)
                .with_entity_id(data_name)
                .with_message(format!(
                    "before declares {:?} but after declares {:?}",
                    before, after
                )),

            RowDeltaError::UnknownPrimaryKeyColumn { data_name, column } => {
                ExError::new(ExErrorKind::ColumnNotFound)
                    .with_entity_id(data_name)
                    .with_column(column)
                    .with_message("Primary key column not found")
            }

            RowDeltaError::RowShape {
                data_name,
                row_index,
                expected,
                actual,
            } => ExError::new(ExErrorKind::RowShapeMismatch)
                .with_entity_id(data_name)
                .with_index(row_index)
                .with_message(format!("expected {} values, got {}", expected, actual)),

            RowDeltaError::UnknownPolicy { policy, name } => {
                ExError::new(ExErrorKind::UnknownPolicy)
                    .with_message(format!("Unknown {} policy: {:?}", policy, name))
            }

            RowDeltaError::ColumnNotFound { data_name, column } => {
                ExError::new(ExErrorKind::ColumnNotFound)
                    .with_entity_id(data_name)
                    .with_column(column)
                    .with_message("Column not found")
            }

            RowDeltaError::IndexOutOfBounds { what, index, size } => {
                ExError::new(ExErrorKind::IndexOutOfBounds)
                    .with_index(index)
                    .with_message(format!("{} has {} entries", what, size))
            }

            RowDeltaError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to RowDeltaError
impl From<serde_json::Error> for RowDeltaError {
    fn from(err: serde_json::Error) -> Self {
        RowDeltaError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from toml::de::Error to RowDeltaError
impl From<toml::de::Error> for RowDeltaError {
    fn from(err: toml::de::Error) -> Self {
        RowDeltaError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ExErrorKind::PrimaryKeyMismatch, "ERR_PRIMARY_KEY_MISMATCH"),
            (ExErrorKind::UnknownPolicy, "ERR_UNKNOWN_POLICY"),
            (ExErrorKind::RowShapeMismatch, "ERR_ROW_SHAPE_MISMATCH"),
            (ExErrorKind::ColumnNotFound, "ERR_COLUMN_NOT_FOUND"),
            (ExErrorKind::TableNotFound, "ERR_TABLE_NOT_FOUND"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_usage_error_classification() {
        assert!(ExErrorKind::PrimaryKeyMismatch.is_usage_error());
        assert!(ExErrorKind::UnknownPolicy.is_usage_error());
        assert!(!ExErrorKind::Persistence.is_usage_error());
        assert!(!ExErrorKind::ColumnNotFound.is_usage_error());
    }

    #[test]
    fn test_display_includes_context() {
        let err = ExError::new(ExErrorKind::ColumnNotFound)
            .with_op("value_of")
            .with_entity_id("users")
            .with_column("EMAIL")
            .with_message("Column not found");
        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_COLUMN_NOT_FOUND] in operation 'value_of'"));
        assert!(rendered.contains("(entity: users)"));
        assert!(rendered.contains("(column: EMAIL)"));
    }

    #[test]
    fn test_pk_mismatch_maps_to_kind() {
        let err: ExError = RowDeltaError::PrimaryKeyMismatch {
            data_name: "users".into(),
            before: vec!["ID".into()],
            after: vec!["CODE".into()],
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::PrimaryKeyMismatch);
        assert_eq!(err.entity_id(), Some("users"));
    }
}
