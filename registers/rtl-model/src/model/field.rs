// Licensed under the Apache-2.0 license

use crate::error::{BuildResult, Warning};
use crate::output::Field;
use crate::signals;
use crate::types::{NodeIdx, NodeKind};
use crate::value::{AccessType, OnReadType, OnWriteType, Property, Value};

use super::register::MAX_REGISTER_WIDTH;
use super::ModelBuilder;

impl ModelBuilder<'_> {
    /// Derive the model of the field at `idx`.
    ///
    /// When `follow_enable` is set and the field's `swwe` names another field,
    /// that field is derived as well and attached as the write-enable source.
    /// The source itself is never followed further.
    pub(super) fn derive_field(
        &self,
        idx: NodeIdx,
        follow_enable: bool,
        warnings: &mut Vec<Warning>,
    ) -> BuildResult<Field> {
        let tree = self.tree;
        let node = tree.node(idx);
        let range = node
            .bit_range
            .ok_or_else(|| self.reject(idx, "field has no bit range".into()))?;
        if range.lsb > range.msb {
            return Err(self.reject(
                idx,
                format!("lsb {} is above msb {}", range.lsb, range.msb),
            ));
        }
        if range.msb >= MAX_REGISTER_WIDTH {
            return Err(self.reject(
                idx,
                format!(
                    "msb {} is beyond the {MAX_REGISTER_WIDTH}-bit register limit",
                    range.msb
                ),
            ));
        }

        let sw = tree
            .property::<AccessType>(idx, Property::Sw)?
            .unwrap_or(AccessType::Rw);
        let hw = tree
            .property::<AccessType>(idx, Property::Hw)?
            .unwrap_or(AccessType::Rw);
        let onread = tree.property::<OnReadType>(idx, Property::Onread)?;
        let onwrite = tree.property::<OnWriteType>(idx, Property::Onwrite)?;

        let (sw_write_en, write_en_signal) = match tree.get_property(idx, Property::Swwe) {
            None => (false, None),
            Some(Value::Reference(source)) => {
                match tree.node_arena.get(source).map(|n| n.kind) {
                    Some(NodeKind::Field) if follow_enable => (
                        true,
                        Some(Box::new(self.derive_field(source, false, warnings)?)),
                    ),
                    Some(NodeKind::Field) => (true, None),
                    other => {
                        let target = match other {
                            Some(kind) => format!("{kind} `{}`", tree.path(source)),
                            None => format!("missing node {source}"),
                        };
                        self.malformed(idx, format!("swwe refers to {target}"), warnings)?;
                        (true, None)
                    }
                }
            }
            Some(value) => (value.as_bool(), None),
        };

        let parent_name = node
            .parent
            .map(|parent| tree.node(parent).inst_name.clone())
            .unwrap_or_default();

        Ok(Field {
            name: node.inst_name.clone(),
            parent_name,
            desc: tree
                .property::<String>(idx, Property::Desc)?
                .unwrap_or_default(),
            lsb: range.lsb,
            msb: range.msb,
            width: range.msb - range.lsb + 1,
            bitmask: signals::field_bitmask(range.lsb, range.msb),
            // Resets driven by a signal have no constant value.
            reset: match tree.get_property(idx, Property::Reset) {
                Some(Value::U64(reset)) => Some(reset),
                _ => None,
            },
            hw_readable: hw.is_readable(),
            hw_writable: hw.is_writable(),
            sw_readable: sw.is_readable(),
            sw_writable: sw.is_writable(),
            sw_write_en,
            write_en_signal,
            hw_write_en: tree.property_flag(idx, Property::We),
            swmod: tree.property_bool(idx, Property::Swmod)?,
            clear_on_read: onread == Some(OnReadType::Rclr),
            set_on_read: onread == Some(OnReadType::Rset),
            mubi: tree.property_bool(idx, Property::Mubi)?,
            encode: tree.property::<String>(idx, Property::Encode)?,
            async_domain: self.domain(idx, Property::Async),
            sync_domain: self.domain(idx, Property::Sync),
            sw_access: signals::sw_access(sw, onread, onwrite),
        })
    }

    /// Name of the clock domain a field crosses into, if any.
    fn domain(&self, idx: NodeIdx, property: Property) -> Option<String> {
        match self.tree.get_property(idx, property)? {
            Value::String(name) | Value::EnumReference(name) => Some(name),
            Value::Reference(target) => self
                .tree
                .node_arena
                .get(target)
                .map(|n| n.inst_name.clone()),
            Value::Bool(true) => Some(property.to_string()),
            _ => None,
        }
    }
}
