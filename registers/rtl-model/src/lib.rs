// Licensed under the Apache-2.0 license

//! Register model builder for SystemRDL address maps.
//!
//! This crate turns an already elaborated address-map tree into the flat,
//! fully derived [`Model`] that RTL templates render: one [`Interface`] per
//! addressable block, with expanded register offsets, byte-lane permissions
//! and the read/write/q-enable signals each register needs.
//!
//! ## Usage
//!
//! ```
//! use registers_rtl_model::{
//!     build_model_with_config, BuildConfig, ElaboratedTree, MalformedPolicy, Node, Property,
//! };
//!
//! let mut tree = ElaboratedTree::new(Node::addrmap("uart"));
//! let ctrl = tree.add_child(tree.top, Node::reg("ctrl").at(0x10));
//! tree.add_child(ctrl, Node::field("tx", 0, 0).with_property(Property::Reset, 1u64));
//!
//! let config = BuildConfig::with_defaults().with_malformed_policy(MalformedPolicy::Warn);
//! let outcome = build_model_with_config(&tree, &config).unwrap();
//! let model = outcome.model;
//! assert_eq!(model.interfaces[0].registers[0].reset, 1);
//! assert_eq!(model.package_file_name(&config), "uart_reg_pkg.sv");
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: The elaborated input tree ([`ElaboratedTree`], [`Node`])
//! - [`value`]: Property keys and typed property values
//! - [`output`]: The derived model handed to the renderer
//! - [`signals`]: Enable-signal and permission-mask rules
//! - [`config`]: Build configuration ([`BuildConfig`])
//! - [`error`]: Build errors and warnings
//! - [`util`]: Numeric helpers

pub mod config;
pub mod error;
mod model;
pub mod output;
pub mod signals;
pub mod types;
pub mod util;
pub mod value;

pub use config::{BuildConfig, MalformedPolicy};
pub use error::{BuildError, BuildResult, Warning};
pub use model::{build_model, build_model_with_config, BuildOutcome, ModelBuilder};
pub use output::{Field, Interface, Model, Parameter, ParameterValue, Register, SwAccess, Window};
pub use types::{ArrayInfo, BitRange, ElaboratedTree, Node, NodeIdx, NodeKind};
pub use value::{AccessType, OnReadType, OnWriteType, Property, Value};
