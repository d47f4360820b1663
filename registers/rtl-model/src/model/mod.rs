// Licensed under the Apache-2.0 license

//! Model builder: turns an [`ElaboratedTree`] into a [`Model`].
//!
//! The walk is a single top-down pass:
//!
//! ```text
//! ModelBuilder::build            top addrmap
//! └── assemble_interface         once per child block (+ root registers)
//!     ├── derive_register        per reg child, expands arrays
//!     │   └── derive_field       per field (+ its swwe source)
//!     └── derive_window          per mem child
//! ```
//!
//! The implementation is split across submodules:
//! - `interface`: per-block assembly and address decoding
//! - `register`: register derivation and array expansion
//! - `field`: field derivation
//! - `window`: memory window derivation

mod field;
mod interface;
mod register;
mod window;

use log::{info, warn};

use crate::config::{BuildConfig, MalformedPolicy};
use crate::error::{BuildError, BuildResult, Warning};
use crate::output::{Model, Parameter, ParameterValue};
use crate::types::{ElaboratedTree, NodeIdx, NodeKind};
use crate::value::Value;

use interface::Scope;

/// A built model together with the warnings raised while building it.
#[derive(Clone, Debug)]
pub struct BuildOutcome {
    pub model: Model,
    pub warnings: Vec<Warning>,
}

/// Walks an elaborated tree and derives the register model.
///
/// The builder only borrows its inputs; all per-interface state lives in the
/// stack frame of the call that assembles that interface.
pub struct ModelBuilder<'a> {
    tree: &'a ElaboratedTree,
    config: &'a BuildConfig,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(tree: &'a ElaboratedTree, config: &'a BuildConfig) -> Self {
        Self { tree, config }
    }

    /// Build the model for the tree's top-level addrmap.
    pub fn build(&self) -> BuildResult<BuildOutcome> {
        let top = self.tree.top;
        let root = self.tree.node(top);
        if root.is_array() {
            return Err(BuildError::ArrayedRoot {
                path: self.tree.path(top),
            });
        }
        if root.kind != NodeKind::AddrMap {
            return Err(BuildError::RootNotAddrMap {
                path: self.tree.path(top),
                kind: root.kind,
            });
        }

        let mut warnings = vec![];
        let parameters = self.parameters(top, &mut warnings)?;

        let mut interfaces = vec![];
        for (idx, child) in self.tree.children(top) {
            match child.kind {
                NodeKind::AddrMap => {
                    if child.is_array() {
                        self.unsupported(
                            idx,
                            "arrayed blocks are not supported",
                            &mut warnings,
                        );
                        continue;
                    }
                    let name = if child.inst_name.is_empty() {
                        self.config.default_interface_name.clone()
                    } else {
                        child.inst_name.clone()
                    };
                    interfaces.push(self.assemble_interface(
                        idx,
                        Some(name),
                        Scope::Block,
                        &mut warnings,
                    )?);
                }
                // Collected into the root interface below.
                NodeKind::Reg | NodeKind::Mem => continue,
                kind => {
                    return Err(BuildError::UnsupportedTopLevel {
                        path: self.tree.path(idx),
                        kind,
                    })
                }
            }
        }

        // Registers placed directly on the root form their own, unnamed interface.
        if self.tree.registers(top).next().is_some() {
            interfaces.push(self.assemble_interface(top, None, Scope::Root, &mut warnings)?);
        }

        info!(
            "Built register model for {}: {} interface(s), {} warning(s)",
            root.inst_name,
            interfaces.len(),
            warnings.len()
        );

        Ok(BuildOutcome {
            model: Model {
                ip_name: root.inst_name.clone(),
                offset: root.address_offset,
                parameters,
                interfaces,
            },
            warnings,
        })
    }

    /// Parameters declared on `idx`, in declaration order.
    fn parameters(
        &self,
        idx: NodeIdx,
        warnings: &mut Vec<Warning>,
    ) -> BuildResult<Vec<Parameter>> {
        let mut params = vec![];
        for (name, value) in self.tree.node(idx).parameters.iter() {
            let value = match value {
                Value::U64(v) => ParameterValue::Int(*v),
                Value::Bool(v) => ParameterValue::Bit(*v),
                Value::String(v) => ParameterValue::String(v.clone()),
                other => {
                    self.malformed(
                        idx,
                        format!("parameter `{name}` is not a literal: {other:?}"),
                        warnings,
                    )?;
                    continue;
                }
            };
            params.push(Parameter {
                name: name.clone(),
                type_name: value.type_name().to_string(),
                value,
            });
        }
        Ok(params)
    }

    /// Record a node that the model cannot represent.
    fn unsupported(&self, idx: NodeIdx, reason: &'static str, warnings: &mut Vec<Warning>) {
        let warning = Warning::Unsupported {
            path: self.tree.path(idx),
            kind: self.tree.node(idx).kind,
            reason,
        };
        warn!("{warning}");
        warnings.push(warning);
    }

    /// Reject or tolerate malformed input, depending on the configured policy.
    fn malformed(
        &self,
        idx: NodeIdx,
        reason: String,
        warnings: &mut Vec<Warning>,
    ) -> BuildResult<()> {
        let path = self.tree.path(idx);
        match self.config.malformed {
            MalformedPolicy::Reject => Err(BuildError::Malformed { path, reason }),
            MalformedPolicy::Warn => {
                let warning = Warning::Malformed { path, reason };
                warn!("{warning}");
                warnings.push(warning);
                Ok(())
            }
        }
    }

    /// Malformed input that cannot be carried into the model at all.
    fn reject(&self, idx: NodeIdx, reason: String) -> BuildError {
        BuildError::Malformed {
            path: self.tree.path(idx),
            reason,
        }
    }
}

/// Build the model of `tree` with the default configuration.
pub fn build_model(tree: &ElaboratedTree) -> BuildResult<Model> {
    let config = BuildConfig::with_defaults();
    Ok(ModelBuilder::new(tree, &config).build()?.model)
}

/// Build the model of `tree`, returning the collected warnings as well.
pub fn build_model_with_config(
    tree: &ElaboratedTree,
    config: &BuildConfig,
) -> BuildResult<BuildOutcome> {
    ModelBuilder::new(tree, config).build()
}
