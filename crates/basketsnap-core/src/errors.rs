use basketsnap_core_types::RunId;
use thiserror::Error;

use crate::source::SourceError;

/// Result type alias using HarnessError
pub type Result<T> = std::result::Result<T, HarnessError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (test runners, the
/// CLI, log consumers) can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Capture
    /// A balance query against the ledger failed during snapshot capture
    BalanceQuery,
    /// Reading the basket's own configuration (governance, tokens) failed
    Introspection,

    // Diff
    /// Two snapshots with different entity/asset configurations were compared
    ShapeMismatch,
    /// A snapshot violates its own structural invariants
    InvalidSnapshot,

    // Operation
    /// The bracketed operation reverted or failed
    OperationRevert,
    /// A before/after snapshot required for the request does not exist
    NoSnapshot,

    // Scenario/configuration
    InvalidScenario,
    InvalidInput,

    // Integration/IO
    Io,
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::BalanceQuery => "ERR_BALANCE_QUERY",
            ExErrorKind::Introspection => "ERR_INTROSPECTION",
            ExErrorKind::ShapeMismatch => "ERR_SHAPE_MISMATCH",
            ExErrorKind::InvalidSnapshot => "ERR_INVALID_SNAPSHOT",
            ExErrorKind::OperationRevert => "ERR_OPERATION_REVERT",
            ExErrorKind::NoSnapshot => "ERR_NO_SNAPSHOT",
            ExErrorKind::InvalidScenario => "ERR_INVALID_SCENARIO",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus the metric coordinates (entity, asset)
/// and run correlation needed to report a failing step.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity: Option<String>,
    asset: Option<String>,
    run_id: Option<RunId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity: None,
            asset: None,
            run_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity name context
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Add asset name context
    pub fn with_asset(mut self, asset: impl Into<String>) -> Self {
        self.asset = Some(asset.into());
        self
    }

    /// Add run correlation
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    pub fn asset(&self) -> Option<&str> {
        self.asset.as_deref()
    }

    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

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
        if let Some(entity) = &self.entity {
            write!(f, " (entity: {})", entity)?;
        }
        if let Some(asset) = &self.asset {
            write!(f, " (asset: {})", asset)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for harness operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HarnessError {
    /// A balance query failed while capturing a snapshot; no partial snapshot exists
    #[error("balance query failed for {entity} balance of {asset}: {source}")]
    BalanceQuery {
        entity: String,
        asset: String,
        #[source]
        source: SourceError,
    },

    /// Reading the basket configuration failed
    #[error("failed to read basket {field}: {source}")]
    Introspection {
        field: String,
        #[source]
        source: SourceError,
    },

    /// The two snapshots were not produced by the same registrations
    #[error("snapshot shape mismatch at position {position}: expected {expected}, found {found}")]
    ShapeMismatch {
        position: usize,
        expected: String,
        found: String,
    },

    /// A snapshot violates its structural invariants
    #[error("invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    /// The bracketed operation failed; carries the revert reason verbatim
    #[error("operation reverted: {reason}")]
    OperationRevert { reason: String },

    /// A required snapshot has not been captured
    #[error("no {which} snapshot available")]
    NoSnapshot { which: String },

    /// A scenario file failed validation
    #[error("invalid scenario: {reason}")]
    InvalidScenario { reason: String },

    /// An amount or address literal could not be parsed
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("serialization error: {message}")]
    Serialization { message: String },

    #[error("io error: {message}")]
    Io { message: String },
}

/// Conversion from HarnessError to the canonical ExError
impl From<HarnessError> for ExError {
    fn from(err: HarnessError) -> Self {
        match err {
            HarnessError::BalanceQuery {
                entity,
                asset,
                source,
            } => ExError::new(ExErrorKind::BalanceQuery)
                .with_op("capture")
                .with_entity(entity)
                .with_asset(asset)
                .with_message(source.to_string()),

            HarnessError::Introspection { field, source } => {
                ExError::new(ExErrorKind::Introspection)
                    .with_op("discover_basket")
                    .with_message(format!("{}: {}", field, source))
            }

            HarnessError::ShapeMismatch {
                position,
                expected,
                found,
            } => ExError::new(ExErrorKind::ShapeMismatch)
                .with_op("diff")
                .with_message(format!(
                    "position {}: expected {}, found {}",
                    position, expected, found
                )),

            HarnessError::InvalidSnapshot { reason } => {
                ExError::new(ExErrorKind::InvalidSnapshot).with_message(reason)
            }

            HarnessError::OperationRevert { reason } => {
                ExError::new(ExErrorKind::OperationRevert)
                    .with_op("run_operation")
                    .with_message(reason)
            }

            HarnessError::NoSnapshot { which } => ExError::new(ExErrorKind::NoSnapshot)
                .with_message(format!("no {} snapshot available", which)),

            HarnessError::InvalidScenario { reason } => {
                ExError::new(ExErrorKind::InvalidScenario).with_message(reason)
            }

            HarnessError::InvalidInput { reason } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(reason)
            }

            HarnessError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            HarnessError::Io { message } => ExError::new(ExErrorKind::Io).with_message(message),
        }
    }
}

/// Conversion from serde_json::Error to HarnessError
impl From<serde_json::Error> for HarnessError {
    fn from(err: serde_json::Error) -> Self {
        HarnessError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for HarnessError {
    fn from(err: std::io::Error) -> Self {
        HarnessError::Io {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes_are_unique() {
        let kinds = [
            ExErrorKind::BalanceQuery,
            ExErrorKind::Introspection,
            ExErrorKind::ShapeMismatch,
            ExErrorKind::InvalidSnapshot,
            ExErrorKind::OperationRevert,
            ExErrorKind::NoSnapshot,
            ExErrorKind::InvalidScenario,
            ExErrorKind::InvalidInput,
            ExErrorKind::Io,
            ExErrorKind::Serialization,
        ];
        let mut codes: Vec<&str> = kinds.iter().map(|k| k.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_balance_query_carries_metric_coordinates() {
        let err = HarnessError::BalanceQuery {
            entity: "randomUser".to_string(),
            asset: "DAI".to_string(),
            source: SourceError::Network("connection refused".to_string()),
        };
        let ex: ExError = err.into();
        assert_eq!(ex.kind(), ExErrorKind::BalanceQuery);
        assert_eq!(ex.entity(), Some("randomUser"));
        assert_eq!(ex.asset(), Some("DAI"));
        assert!(ex.message().contains("connection refused"));
    }

    #[test]
    fn test_revert_reason_is_verbatim() {
        let err = HarnessError::OperationRevert {
            reason: "Pausable: paused".to_string(),
        };
        assert_eq!(err.to_string(), "operation reverted: Pausable: paused");
        let ex: ExError = err.into();
        assert_eq!(ex.code(), "ERR_OPERATION_REVERT");
        assert_eq!(ex.message(), "Pausable: paused");
    }

    #[test]
    fn test_display_includes_code_and_context() {
        let ex = ExError::new(ExErrorKind::ShapeMismatch)
            .with_op("diff")
            .with_message("position 3");
        let rendered = ex.to_string();
        assert!(rendered.starts_with("[ERR_SHAPE_MISMATCH]"));
        assert!(rendered.contains("in operation 'diff'"));
    }
}
