//! Generation preconditions.
//!
//! Checks run in a fixed order and the first failure aborts the request.

use crate::types::Operation;
use thiserror::Error;

/// How a reported problem affects the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The request was aborted and nothing was published.
    Blocking,
    /// Reported alongside a successful result.
    Warning,
}

/// Reasons a program could not be generated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("there are no operations; create an operation first")]
    NoOperations,

    /// `index` is the position of the offending operation in the full list.
    #[error(
        "operation {index} is missing toolpaths; generate toolpaths for every enabled operation"
    )]
    MissingToolpaths { index: usize },

    #[error("no operations are enabled; enable the operations you wish to convert")]
    NoVisibleOperations,

    #[error("pass depth {pass_depth} is not greater than 0")]
    InvalidPassDepth { pass_depth: f64 },

    /// `index` counts emitted operations only.
    #[error("operation {index} has a cut depth ({cut_depth}) which is not greater than 0")]
    InvalidCutDepth { index: usize, cut_depth: f64 },
}

impl ValidationError {
    pub fn severity(&self) -> Severity {
        match self {
            Self::NoOperations
            | Self::MissingToolpaths { .. }
            | Self::NoVisibleOperations
            | Self::InvalidPassDepth { .. }
            | Self::InvalidCutDepth { .. } => Severity::Blocking,
        }
    }
}

/// Select the operations eligible for emission, preserving their order.
///
/// `pass_depth` must already be resolved into the output unit system.
pub fn validate_operations(
    operations: &[Operation],
    pass_depth: f64,
) -> Result<Vec<&Operation>, ValidationError> {
    if operations.is_empty() {
        return Err(ValidationError::NoOperations);
    }

    let mut selected = Vec::new();
    for (index, op) in operations.iter().enumerate() {
        if !op.enabled {
            continue;
        }
        if !op.has_toolpaths() {
            return Err(ValidationError::MissingToolpaths { index });
        }
        selected.push(op);
    }

    if selected.is_empty() {
        return Err(ValidationError::NoVisibleOperations);
    }

    // Also rejects NaN.
    if !(pass_depth > 0.0) {
        return Err(ValidationError::InvalidPassDepth { pass_depth });
    }

    Ok(selected)
}
