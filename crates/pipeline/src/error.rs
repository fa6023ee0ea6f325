//! Error types for layer hooks
//!
//! Hooks report faults as [`LayerError`]. The pipeline never inspects,
//! wraps, retries or recovers from them: the first fault stops the execution
//! and is returned to the caller of `exec` exactly as the hook produced it.

use crate::layer::Layer;
use crate::operation::Operation;
use thiserror::Error;

/// Boxed error source carried by [`LayerError::Failed`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for layer hooks
pub type LayerResult<T = ()> = std::result::Result<T, LayerError>;

/// Fault raised by a layer hook
#[derive(Debug, Error)]
pub enum LayerError {
    /// The layer refused to let the operation proceed (validation, policy)
    #[error("{layer} rejected {operation}: {reason}")]
    Rejected {
        /// Layer that raised the fault
        layer: &'static str,
        /// Operation being executed
        operation: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// The layer itself failed while running its hook
    #[error("{layer} failed during {operation}: {source}")]
    Failed {
        /// Layer that raised the fault
        layer: &'static str,
        /// Operation being executed
        operation: &'static str,
        /// Underlying error
        #[source]
        source: BoxError,
    },
}

impl LayerError {
    /// Rejection raised by layer `L` while executing `Op`
    pub fn rejected<L: Layer, Op: Operation>(reason: impl Into<String>) -> Self {
        LayerError::Rejected {
            layer: L::name(),
            operation: Op::name(),
            reason: reason.into(),
        }
    }

    /// Failure of layer `L` while executing `Op`
    pub fn failed<L: Layer, Op: Operation>(source: impl Into<BoxError>) -> Self {
        LayerError::Failed {
            layer: L::name(),
            operation: Op::name(),
            source: source.into(),
        }
    }

    /// Name of the layer that raised the fault
    pub fn layer(&self) -> &'static str {
        match self {
            LayerError::Rejected { layer, .. } | LayerError::Failed { layer, .. } => *layer,
        }
    }

    /// Name of the operation that was executing
    pub fn operation(&self) -> &'static str {
        match self {
            LayerError::Rejected { operation, .. } | LayerError::Failed { operation, .. } => {
                *operation
            }
        }
    }

    /// Whether this is a deliberate rejection rather than a layer failure
    pub fn is_rejection(&self) -> bool {
        matches!(self, LayerError::Rejected { .. })
    }
}
