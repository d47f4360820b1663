// Licensed under the Apache-2.0 license

//! The register model handed to the renderer.
//!
//! Everything here is plain data, fully derived by [`crate::ModelBuilder`].
//! Templates bind to the serialized key names, so the `serde` renames below
//! are part of the output contract and must stay stable.
//!
//! ```text
//! Model
//! ├── parameters: Vec<Parameter>
//! └── interfaces: Vec<Interface>      # one per addressable block
//!     ├── regs: Vec<Register>
//!     │   └── fields: Vec<Field>
//!     └── windows: Vec<Window>
//! ```

use serde::Serialize;
use strum_macros::{AsRefStr, Display};

use crate::config::BuildConfig;

//=============================================================================
// Field
//=============================================================================

/// Software access class of a field, named after the reggen `SwAccess` enum.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display, AsRefStr, Serialize)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum SwAccess {
    Ro,
    Wo,
    Rw,
    W1c,
    W1s,
    W0c,
    Rc,
    None,
}

/// A bit field within a register.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    /// Name of the register the field belongs to.
    pub parent_name: String,
    pub desc: String,
    pub lsb: u32,
    pub msb: u32,
    /// `msb - lsb + 1`.
    pub width: u32,
    /// Bits of the register covered by this field.
    pub bitmask: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset: Option<u64>,
    pub hw_readable: bool,
    pub hw_writable: bool,
    pub sw_readable: bool,
    pub sw_writable: bool,
    /// Software writes are gated by an enable (`swwe`).
    pub sw_write_en: bool,
    /// The field supplying the write enable, when it is not a constant.
    pub write_en_signal: Option<Box<Field>>,
    /// Hardware write enable (`we`).
    pub hw_write_en: bool,
    pub swmod: bool,
    #[serde(rename = "clear_onread")]
    pub clear_on_read: bool,
    #[serde(rename = "set_onread")]
    pub set_on_read: bool,
    pub mubi: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encode: Option<String>,
    #[serde(rename = "async")]
    pub async_domain: Option<String>,
    #[serde(rename = "sync")]
    pub sync_domain: Option<String>,
    #[serde(rename = "reggen_sw_access")]
    pub sw_access: SwAccess,
}

//=============================================================================
// Register
//=============================================================================

/// A register, or a register array ("multireg") expanded into its offsets.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Register {
    pub name: String,
    pub desc: String,
    /// Register width in bits.
    pub width: u64,
    pub hw_readable: bool,
    pub hw_writable: bool,
    pub sw_readable: bool,
    pub sw_writable: bool,
    pub swmod: bool,
    pub external: bool,
    pub shadowed: bool,
    pub hwre: bool,
    #[serde(rename = "async_clk")]
    pub async_clock: bool,
    /// Byte offset of each instance, relative to the interface.
    pub offsets: Vec<u64>,
    pub is_multireg: bool,
    pub fields: Vec<Field>,
    pub is_multifields: bool,
    /// Highest bit used by any field.
    pub msb: u32,
    /// Byte lanes that carry field data, one bit per lane.
    pub permit: u8,
    pub bitmask: u64,
    pub reset: u64,
    pub sw_write_en: bool,
    pub fields_no_write_en: usize,
    pub is_homogeneous: bool,
    pub needs_write_en: bool,
    pub needs_read_en: bool,
    pub needs_qe: bool,
    pub needs_int_qe: bool,
}

//=============================================================================
// Window
//=============================================================================

/// A memory window mapped into the interface address space.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Window {
    pub name: String,
    pub entries: u64,
    /// Bits per entry.
    pub width: u64,
    /// Total size in bytes.
    pub size: u64,
    pub offset: u64,
    pub sw_readable: bool,
    pub sw_writable: bool,
    pub integrity_bypass: bool,
}

//=============================================================================
// Interface
//=============================================================================

/// One addressable register block.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Interface {
    /// Absent only for the implicit interface of registers placed on the root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub offset: u64,
    #[serde(rename = "regs")]
    pub registers: Vec<Register>,
    pub windows: Vec<Window>,
    /// Register instances, counting every element of an array.
    #[serde(rename = "num_regs")]
    pub num_registers: u64,
    pub num_windows: u64,
    #[serde(rename = "addr_width")]
    pub address_width: u32,
    /// `(register index, instance name)` for each register on an async clock.
    pub async_registers: Vec<(u64, String)>,
    #[serde(rename = "needs_aw")]
    pub needs_address_width_decode: bool,
    #[serde(rename = "any_async_clk")]
    pub any_async_clock: bool,
    #[serde(rename = "all_async_clk")]
    pub all_async_clock: bool,
    #[serde(rename = "any_shadowed_reg")]
    pub any_shadowed: bool,
    pub any_integrity_bypass: bool,
}

//=============================================================================
// Model
//=============================================================================

/// Literal value of a block parameter.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Int(u64),
    Bit(bool),
    String(String),
}

impl ParameterValue {
    /// Type tag exposed to templates.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParameterValue::Int(_) => "int",
            ParameterValue::Bit(_) => "bit",
            ParameterValue::String(_) => "string",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub value: ParameterValue,
}

/// The complete register model of one top-level block.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Model {
    /// Top-level block name.
    pub ip_name: String,
    pub offset: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    pub interfaces: Vec<Interface>,
}

impl Model {
    /// Serialize the model with the key names templates bind to.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// File name of the package-level artifact, e.g. `uart_reg_pkg.sv`.
    pub fn package_file_name(&self, config: &BuildConfig) -> String {
        format!("{}{}", self.ip_name, config.package_file_suffix)
    }

    /// File name of the top-level artifact for `interface`.
    ///
    /// Named interfaces get their lower-cased name spliced in, e.g.
    /// `lc_ctrl_dmi_reg_top.sv`; the unnamed root interface does not.
    pub fn top_file_name(&self, interface: &Interface, config: &BuildConfig) -> String {
        match &interface.name {
            Some(name) => format!(
                "{}_{}{}",
                self.ip_name,
                name.to_lowercase(),
                config.top_file_suffix
            ),
            None => format!("{}{}", self.ip_name, config.top_file_suffix),
        }
    }

    /// Every artifact file name, package first, then interfaces in order.
    pub fn artifact_file_names(&self, config: &BuildConfig) -> Vec<String> {
        std::iter::once(self.package_file_name(config))
            .chain(
                self.interfaces
                    .iter()
                    .map(|interface| self.top_file_name(interface, config)),
            )
            .collect()
    }

    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces
            .iter()
            .find(|i| i.name.as_deref() == Some(name))
    }
}

impl Interface {
    pub fn register(&self, name: &str) -> Option<&Register> {
        self.registers.iter().find(|r| r.name == name)
    }

    pub fn window(&self, name: &str) -> Option<&Window> {
        self.windows.iter().find(|w| w.name == name)
    }
}

impl Register {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Bytes occupied by one instance.
    pub fn byte_width(&self) -> u64 {
        crate::util::byte_width(self.width)
    }
}
