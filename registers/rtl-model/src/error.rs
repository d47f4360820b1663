// Licensed under the Apache-2.0 license

use thiserror::Error;

use crate::types::NodeKind;
use crate::value::Property;

/// Errors that abort a model build. No partial model is returned.
#[derive(Error, Debug)]
pub enum BuildError {
    /// The top-level addrmap is instantiated as an array.
    #[error("top-level node `{path}` is an array; the root must be a single addrmap")]
    ArrayedRoot { path: String },

    /// The top-level node is not an addrmap.
    #[error("top-level node `{path}` is a {kind}; the root must be an addrmap")]
    RootNotAddrMap { path: String, kind: NodeKind },

    /// A child of the top-level node is neither an addrmap, a reg, nor a mem.
    #[error("unsupported {kind} `{path}` at the top level; only addrmap, reg and mem are allowed")]
    UnsupportedTopLevel { path: String, kind: NodeKind },

    /// Input that violates the layout invariants of the model.
    #[error("malformed input at `{path}`: {reason}")]
    Malformed { path: String, reason: String },

    /// A property holds a value of the wrong type.
    #[error("invalid value for property `{property}` on `{path}`: {cause}")]
    Property {
        path: String,
        property: Property,
        cause: anyhow::Error,
    },
}

impl BuildError {
    /// True for errors caused by the shape of the tree rather than by one
    /// node's data.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            BuildError::ArrayedRoot { .. }
                | BuildError::RootNotAddrMap { .. }
                | BuildError::UnsupportedTopLevel { .. }
        )
    }
}

/// Result type for model builds.
pub type BuildResult<T> = std::result::Result<T, BuildError>;

/// Non-fatal findings collected while building.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum Warning {
    /// A node the model cannot represent; it was skipped.
    #[error("unsupported {kind} `{path}` ({reason}), skipping")]
    Unsupported {
        path: String,
        kind: NodeKind,
        reason: &'static str,
    },

    /// Malformed data passed through because the build tolerates it.
    #[error("malformed input at `{path}`: {reason}")]
    Malformed { path: String, reason: String },

    /// An interface ended up with nothing to address.
    #[error("interface `{path}` has no registers or windows")]
    EmptyInterface { path: String },
}
