// Licensed under the Apache-2.0 license

use crate::error::{BuildResult, Warning};
use crate::output::Window;
use crate::types::NodeIdx;
use crate::value::{AccessType, Property};

use super::interface::InterfaceTotals;
use super::ModelBuilder;

impl ModelBuilder<'_> {
    /// Derive the memory window at `idx`.
    pub(super) fn derive_window(
        &self,
        idx: NodeIdx,
        totals: &mut InterfaceTotals,
        warnings: &mut Vec<Warning>,
    ) -> BuildResult<Window> {
        let tree = self.tree;
        let node = tree.node(idx);

        let entries = match tree.property::<u64>(idx, Property::Mementries)? {
            Some(entries) => entries,
            None => {
                self.malformed(idx, "memory does not declare mementries".into(), warnings)?;
                0
            }
        };
        let width = tree
            .property::<u64>(idx, Property::Memwidth)?
            .unwrap_or(32);
        let size = width
            .checked_mul(entries)
            .map(|bits| bits / 8)
            .ok_or_else(|| self.reject(idx, format!("{entries} x {width} bits overflows")))?;
        if node.address_offset.checked_add(size).is_none() {
            return Err(self.reject(
                idx,
                format!("{size}-byte window overflows the address space"),
            ));
        }
        let sw = tree
            .property::<AccessType>(idx, Property::Sw)?
            .unwrap_or(AccessType::Rw);

        let async_clock = tree.property_flag(idx, Property::AsyncClk);
        totals.num_windows += 1;
        totals.any_async_clock |= async_clock;
        totals.all_async_clock &= async_clock;

        Ok(Window {
            name: node.inst_name.clone(),
            entries,
            width,
            size,
            offset: node.address_offset,
            sw_readable: sw.is_readable(),
            sw_writable: sw.is_writable(),
            integrity_bypass: tree.property_bool(idx, Property::IntegrityBypass)?,
        })
    }
}
