// Licensed under the Apache-2.0 license

use crate::error::{BuildResult, Warning};
use crate::output::{Field, Register};
use crate::signals;
use crate::types::{NodeIdx, NodeKind};
use crate::util::byte_width;
use crate::value::Property;

use super::interface::InterfaceTotals;
use super::ModelBuilder;

/// Widest register the model can carry; masks and resets are `u64`.
pub(super) const MAX_REGISTER_WIDTH: u32 = 64;

/// Upper bound on the instances of one register array.
const MAX_ARRAY_ELEMENTS: u64 = 1 << 20;

impl ModelBuilder<'_> {
    /// Derive the register at `idx` and fold it into the interface totals.
    pub(super) fn derive_register(
        &self,
        idx: NodeIdx,
        totals: &mut InterfaceTotals,
        warnings: &mut Vec<Warning>,
    ) -> BuildResult<Register> {
        let tree = self.tree;
        let node = tree.node(idx);
        let width = tree
            .property::<u64>(idx, Property::Regwidth)?
            .unwrap_or(32);
        if width == 0 || width > u64::from(MAX_REGISTER_WIDTH) {
            return Err(self.reject(
                idx,
                format!("regwidth {width} is outside 1..={MAX_REGISTER_WIDTH}"),
            ));
        }
        let offsets = self.expand_offsets(idx, width, warnings)?;

        let mut fields = vec![];
        for (field_idx, child) in tree.children(idx) {
            if child.kind != NodeKind::Field {
                self.unsupported(field_idx, "only fields may appear in a register", warnings);
                continue;
            }
            fields.push(self.derive_field(field_idx, true, warnings)?);
        }
        self.check_field_layout(idx, width, &fields, warnings)?;

        let mut reset = 0;
        let mut bitmask = 0;
        for field in fields.iter() {
            let value = field.reset.unwrap_or(0);
            reset |= value.checked_shl(field.lsb).unwrap_or(0) & field.bitmask;
            bitmask |= field.bitmask;
        }

        let async_clock = tree.property_flag(idx, Property::AsyncClk);
        let mut reg = Register {
            name: node.inst_name.clone(),
            desc: tree
                .property::<String>(idx, Property::Desc)?
                .unwrap_or_default(),
            width,
            hw_readable: fields.iter().any(|f| f.hw_readable),
            hw_writable: fields.iter().any(|f| f.hw_writable),
            sw_readable: fields.iter().any(|f| f.sw_readable),
            sw_writable: fields.iter().any(|f| f.sw_writable),
            swmod: tree.property_bool(idx, Property::Swmod)? || fields.iter().any(|f| f.swmod),
            external: node.external,
            shadowed: tree.property_bool(idx, Property::Shadowed)?,
            hwre: tree.property_bool(idx, Property::Hwre)?,
            async_clock,
            is_multireg: offsets.len() > 1,
            offsets,
            is_multifields: fields.len() > 1,
            msb: fields.iter().map(|f| f.msb).max().unwrap_or(0),
            permit: signals::register_permit_mask(&fields),
            bitmask,
            reset,
            sw_write_en: fields.iter().any(|f| f.sw_write_en),
            fields_no_write_en: signals::fields_no_write_en(&fields),
            is_homogeneous: signals::is_homogeneous(&fields),
            needs_write_en: false,
            needs_read_en: false,
            needs_qe: false,
            needs_int_qe: false,
            fields,
        };
        reg.needs_write_en = signals::needs_write_en(&reg);
        reg.needs_read_en = signals::needs_read_en(&reg);
        reg.needs_qe = signals::needs_qe(&reg);
        reg.needs_int_qe = signals::needs_int_qe(&reg);

        let count = reg.offsets.len() as u64;
        if reg.async_clock {
            for i in 0..count {
                let name = if reg.is_multireg {
                    format!("{}_{i}", reg.name)
                } else {
                    reg.name.clone()
                };
                totals.async_registers.push((totals.num_registers + i, name));
            }
        }
        totals.num_registers += count;
        totals.any_async_clock |= reg.async_clock;
        totals.all_async_clock &= reg.async_clock;
        totals.any_shadowed |= reg.shadowed;

        Ok(reg)
    }

    /// Byte offset of every instance of the register at `idx`.
    ///
    /// Multi-dimensional arrays are flattened in row-major order. Every
    /// instance, including its last byte, must fit in the 64-bit address
    /// space.
    fn expand_offsets(
        &self,
        idx: NodeIdx,
        width: u64,
        warnings: &mut Vec<Warning>,
    ) -> BuildResult<Vec<u64>> {
        let node = self.tree.node(idx);
        let bytes = byte_width(width);
        let Some(array) = &node.array else {
            if node.address_offset.checked_add(bytes).is_none() {
                return Err(self.reject(idx, "register overflows the address space".into()));
            }
            return Ok(vec![node.address_offset]);
        };

        let count = array.element_count().ok_or_else(|| {
            self.reject(
                idx,
                format!("{:?} elements overflow a 64-bit count", array.dimensions),
            )
        })?;
        if count > MAX_ARRAY_ELEMENTS {
            return Err(self.reject(
                idx,
                format!("{count} elements exceed the limit of {MAX_ARRAY_ELEMENTS}"),
            ));
        }
        if count == 0 {
            self.malformed(idx, "register array has no elements".into(), warnings)?;
            return Ok(vec![]);
        }
        if count > 1 {
            if array.stride == 0 {
                self.malformed(
                    idx,
                    format!("{count} elements share one address (stride 0)"),
                    warnings,
                )?;
            } else if array.stride < bytes {
                self.malformed(
                    idx,
                    format!(
                        "stride {} is smaller than the {bytes}-byte register",
                        array.stride
                    ),
                    warnings,
                )?;
            }
        }

        // Offsets grow with the index, so checking the last element covers all.
        (count - 1)
            .checked_mul(array.stride)
            .and_then(|delta| node.raw_address_offset.checked_add(delta))
            .and_then(|last| last.checked_add(bytes))
            .ok_or_else(|| {
                self.reject(
                    idx,
                    format!("element {} overflows the address space", count - 1),
                )
            })?;

        Ok((0..count)
            .map(|i| node.raw_address_offset + i * array.stride)
            .collect())
    }

    /// Check that every field fits the register and no two fields overlap.
    fn check_field_layout(
        &self,
        idx: NodeIdx,
        width: u64,
        fields: &[Field],
        warnings: &mut Vec<Warning>,
    ) -> BuildResult<()> {
        for field in fields.iter() {
            if u64::from(field.msb) >= width {
                self.malformed(
                    idx,
                    format!(
                        "field `{}` [{}:{}] does not fit a {width}-bit register",
                        field.name, field.msb, field.lsb
                    ),
                    warnings,
                )?;
            }
        }

        let mut by_lsb: Vec<&Field> = fields.iter().collect();
        by_lsb.sort_by_key(|f| f.lsb);
        for pair in by_lsb.windows(2) {
            if pair[0].msb >= pair[1].lsb {
                self.malformed(
                    idx,
                    format!("fields `{}` and `{}` overlap", pair[0].name, pair[1].name),
                    warnings,
                )?;
            }
        }
        Ok(())
    }
}
