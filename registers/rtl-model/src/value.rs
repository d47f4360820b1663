// Licensed under the Apache-2.0 license

//! Typed property keys and values of the elaborated tree.
//!
//! The upstream elaborator resolves every property before the tree reaches
//! this crate, so a [`Value`] is always a literal (or a reference to another
//! node for `swwe`). Lookups go through the closed [`Property`] enumeration;
//! each key knows its own default, see [`Property::default_value`].

use anyhow::bail;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::types::NodeIdx;

/// Software or hardware access permission (`sw = ...`, `hw = ...`).
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    Na,
    R,
    W,
    Rw,
    W1,
    Rw1,
}

impl AccessType {
    pub fn is_readable(&self) -> bool {
        matches!(self, AccessType::R | AccessType::Rw | AccessType::Rw1)
    }

    pub fn is_writable(&self) -> bool {
        matches!(
            self,
            AccessType::W | AccessType::Rw | AccessType::W1 | AccessType::Rw1
        )
    }
}

/// Side effect of a software read (`onread = ...`).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum OnReadType {
    Rclr,
    Rset,
    Ruser,
}

/// Side effect of a software write (`onwrite = ...`).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum OnWriteType {
    Woset,
    Woclr,
    Wot,
    Wzs,
    Wzc,
    Wzt,
    Wclr,
    Wset,
    Wuser,
}

/// The property keys the model builder understands.
///
/// Names parse from their SystemRDL spelling, e.g.
/// `"async_clk".parse::<Property>()`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Property {
    Regwidth,
    Mementries,
    Memwidth,
    Swwe,
    We,
    Swmod,
    Onread,
    Onwrite,
    Sw,
    Hw,
    Async,
    Sync,
    AsyncClk,
    Shadowed,
    Hwre,
    Desc,
    Encode,
    Mubi,
    IntegrityBypass,
    Reset,
}

impl Property {
    /// Value used when the node does not assign this property.
    ///
    /// `None` means the property is absent unless explicitly set.
    pub fn default_value(&self) -> Option<Value> {
        match self {
            Property::Regwidth | Property::Memwidth => Some(Value::U64(32)),
            Property::Sw | Property::Hw => Some(Value::AccessType(AccessType::Rw)),
            Property::We
            | Property::Swmod
            | Property::AsyncClk
            | Property::Shadowed
            | Property::Hwre
            | Property::Mubi
            | Property::IntegrityBypass => Some(Value::Bool(false)),
            Property::Mementries
            | Property::Swwe
            | Property::Onread
            | Property::Onwrite
            | Property::Async
            | Property::Sync
            | Property::Desc
            | Property::Encode
            | Property::Reset => None,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    U64(u64),
    Bool(bool),
    String(String),
    AccessType(AccessType),
    OnReadType(OnReadType),
    OnWriteType(OnWriteType),
    /// Name of the enum type a field is encoded with.
    EnumReference(String),
    /// Another node of the same tree, e.g. the field gating `swwe`.
    Reference(NodeIdx),
}

impl Value {
    pub fn property_type(&self) -> PropertyType {
        match self {
            Value::U64(_) => PropertyType::U64,
            Value::Bool(_) => PropertyType::Boolean,
            Value::String(_) => PropertyType::String,
            Value::AccessType(_) => PropertyType::AccessType,
            Value::OnReadType(_) => PropertyType::OnReadType,
            Value::OnWriteType(_) => PropertyType::OnWriteType,
            Value::EnumReference(_) => PropertyType::EnumReference,
            Value::Reference(_) => PropertyType::Reference,
        }
    }

    /// Truthiness of a flag-like value. Flags such as `async_clk` may name a
    /// clock or point at a signal instead of holding a boolean; both count
    /// as set.
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Bool(v) => *v,
            Value::U64(v) => *v != 0,
            Value::String(s) => !s.is_empty(),
            Value::Reference(_) => true,
            _ => false,
        }
    }
}

impl From<u64> for Value {
    fn from(val: u64) -> Self {
        Value::U64(val)
    }
}
impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Value::Bool(val)
    }
}
impl From<String> for Value {
    fn from(val: String) -> Self {
        Value::String(val)
    }
}
impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::String(val.into())
    }
}
impl From<AccessType> for Value {
    fn from(val: AccessType) -> Self {
        Value::AccessType(val)
    }
}
impl From<OnReadType> for Value {
    fn from(val: OnReadType) -> Self {
        Value::OnReadType(val)
    }
}
impl From<OnWriteType> for Value {
    fn from(val: OnWriteType) -> Self {
        Value::OnWriteType(val)
    }
}
impl TryFrom<Value> for u64 {
    type Error = anyhow::Error;
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::U64(value) => Ok(value),
            _ => bail!(
                "Unexpected property type. Expected {:?} but got {:?}",
                PropertyType::U64,
                value,
            ),
        }
    }
}
impl TryFrom<Value> for bool {
    type Error = anyhow::Error;
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(value) => Ok(value),
            // 1-bit literals are commonly used for flags
            Value::U64(v) if v <= 1 => Ok(v == 1),
            _ => bail!(
                "Unexpected property type. Expected {:?} but got {:?}",
                PropertyType::Boolean,
                value,
            ),
        }
    }
}
impl TryFrom<Value> for String {
    type Error = anyhow::Error;
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(value) | Value::EnumReference(value) => Ok(value),
            _ => bail!(
                "Unexpected property type. Expected {:?} but got {:?}",
                PropertyType::String,
                value,
            ),
        }
    }
}
impl TryFrom<Value> for AccessType {
    type Error = anyhow::Error;
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::AccessType(value) => Ok(value),
            _ => bail!(
                "Unexpected property type. Expected {:?} but got {:?}",
                PropertyType::AccessType,
                value,
            ),
        }
    }
}
impl TryFrom<Value> for OnReadType {
    type Error = anyhow::Error;
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::OnReadType(value) => Ok(value),
            _ => bail!(
                "Unexpected property type. Expected {:?} but got {:?}",
                PropertyType::OnReadType,
                value,
            ),
        }
    }
}
impl TryFrom<Value> for OnWriteType {
    type Error = anyhow::Error;
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::OnWriteType(value) => Ok(value),
            _ => bail!(
                "Unexpected property type. Expected {:?} but got {:?}",
                PropertyType::OnWriteType,
                value,
            ),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PropertyType {
    U64,
    Boolean,
    String,
    AccessType,
    OnReadType,
    OnWriteType,
    EnumReference,
    Reference,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_property_names_round_trip() {
        for prop in Property::iter() {
            assert_eq!(prop.as_ref().parse::<Property>().unwrap(), prop);
        }
        assert_eq!("async_clk".parse::<Property>().unwrap(), Property::AsyncClk);
        assert_eq!(
            "integrity_bypass".parse::<Property>().unwrap(),
            Property::IntegrityBypass
        );
        assert!("next".parse::<Property>().is_err());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Property::Regwidth.default_value(), Some(Value::U64(32)));
        assert_eq!(
            Property::Sw.default_value(),
            Some(Value::AccessType(AccessType::Rw))
        );
        assert_eq!(Property::Shadowed.default_value(), Some(Value::Bool(false)));
        assert_eq!(Property::Reset.default_value(), None);
        assert_eq!(Property::Mementries.default_value(), None);
    }

    #[test]
    fn test_access_type() {
        assert!(AccessType::R.is_readable());
        assert!(!AccessType::R.is_writable());
        assert!(AccessType::W1.is_writable());
        assert!(!AccessType::Na.is_readable());
        assert_eq!("rw".parse::<AccessType>().unwrap(), AccessType::Rw);
    }

    #[test]
    fn test_conversions() {
        assert_eq!(u64::try_from(Value::U64(7)).unwrap(), 7);
        assert!(u64::try_from(Value::Bool(true)).is_err());
        assert!(bool::try_from(Value::U64(1)).unwrap());
        assert!(bool::try_from(Value::U64(2)).is_err());
        assert_eq!(
            String::try_from(Value::EnumReference("lc_state_e".into())).unwrap(),
            "lc_state_e"
        );
        let err = AccessType::try_from(Value::U64(3)).unwrap_err();
        assert!(err.to_string().contains("AccessType"));
    }
}
