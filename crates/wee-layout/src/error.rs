//! Error types for the layout engine.
//!
//! Only container editing can fail. Everything that happens during a
//! resolution pass degrades instead of erroring: malformed lengths become
//! [`SizeMode::Undefined`](crate::style::SizeMode::Undefined) and unknown
//! measurements contribute zero.

use crate::cell::ChildId;

/// Errors reported to the owner of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayoutError {
    /// Alignment was set for a child that is not in the container.
    #[error("{0} must be added to the layout before its alignment can be set")]
    InvalidAlignmentTarget(ChildId),

    /// A length string could not be parsed.
    ///
    /// Returned by [`SizeMode::parse`](crate::style::SizeMode::parse) only;
    /// the lossy parser used by the container maps this to `Undefined`.
    #[error("malformed length")]
    MalformedLength,

    /// The child is already present in the container.
    #[error("{0} is already part of the layout")]
    DuplicateChild(ChildId),

    /// The container already holds [`MAX_CHILDREN`](crate::config::MAX_CHILDREN) children.
    #[error("layout is full")]
    CapacityExceeded,

    /// An insertion index was past the end of the child list.
    #[error("index {index} is out of bounds for a layout of {len} children")]
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Number of children at the time of the call.
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    extern crate std;
    use std::string::ToString;

    #[test]
    fn test_invalid_alignment_target_message() {
        let err = LayoutError::InvalidAlignmentTarget(ChildId(7));
        assert_eq!(
            err.to_string(),
            "child #7 must be added to the layout before its alignment can be set"
        );
    }

    #[test]
    fn test_index_out_of_bounds_message() {
        let err = LayoutError::IndexOutOfBounds { index: 4, len: 2 };
        assert_eq!(
            err.to_string(),
            "index 4 is out of bounds for a layout of 2 children"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(LayoutError::CapacityExceeded, LayoutError::CapacityExceeded);
        assert_ne!(
            LayoutError::DuplicateChild(ChildId(1)),
            LayoutError::DuplicateChild(ChildId(2))
        );
    }
}
