//! Error types for the external array bridge

use subset_array_vm::DispatchError;
use thiserror::Error;

use crate::class::MxClassId;

/// Error surfaced by an `MxArray` accessor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MexError {
    /// The accessor does not apply to this kind of array
    #[error("{class}: invalid type for mxArray::{accessor}")]
    InvalidType {
        accessor: &'static str,
        class: &'static str,
    },

    /// A representation asked to be replaced before it can serve
    /// `accessor`. The handle resolves this itself; it only escapes when a
    /// representation is driven directly.
    #[error("mxArray::{0}: representation must be mutated first")]
    MutationPending(&'static str),

    /// A representation asked for mutation twice in a row, or asked for it
    /// without being able to provide a replacement
    #[error("mxArray::{accessor}: representation invariant violated ({reason})")]
    RepresentationInvariant {
        accessor: &'static str,
        reason: &'static str,
    },

    /// Element, cell or field index outside the array
    #[error("mxArray::{accessor}: index ({index}) out of bound {extent}")]
    IndexOutOfBound {
        accessor: &'static str,
        index: usize,
        extent: usize,
    },

    /// Raw storage that does not describe a valid array
    #[error("mxArray::{accessor}: {message}")]
    InvalidData {
        accessor: &'static str,
        message: String,
    },

    /// Failure from the dispatch engine while operating on converted values
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl MexError {
    /// Create an invalid-type error for an array of class `class`
    pub fn invalid_type(accessor: &'static str, class: MxClassId) -> Self {
        MexError::InvalidType {
            accessor,
            class: class.name(),
        }
    }

    /// Create an out-of-bound index error (`index` is 0-based)
    pub fn out_of_bound(accessor: &'static str, index: usize, extent: usize) -> Self {
        MexError::IndexOutOfBound {
            accessor,
            index,
            extent,
        }
    }

    /// Create an invalid-data error
    pub fn invalid_data<S: Into<String>>(accessor: &'static str, message: S) -> Self {
        MexError::InvalidData {
            accessor,
            message: message.into(),
        }
    }

    /// True for invariant violations, which indicate a bug in a
    /// representation rather than a caller mistake
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, MexError::RepresentationInvariant { .. })
    }
}

/// Result type alias for bridge accessors
pub type MexResult<T> = Result<T, MexError>;
