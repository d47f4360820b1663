// Licensed under the Apache-2.0 license

use log::{debug, warn};

use crate::error::{BuildResult, Warning};
use crate::output::Interface;
use crate::types::{NodeIdx, NodeKind};
use crate::util::address_width;

use super::ModelBuilder;

/// Where an interface's registers come from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum Scope {
    /// A named child block of the root.
    Block,
    /// Registers placed directly on the root.
    Root,
}

/// Per-interface aggregates, filled in while its registers and windows are
/// derived. Every interface gets a fresh instance.
#[derive(Debug)]
pub(super) struct InterfaceTotals {
    /// Register instances seen so far; doubles as the running instance index.
    pub num_registers: u64,
    pub num_windows: u64,
    pub any_async_clock: bool,
    pub all_async_clock: bool,
    pub any_shadowed: bool,
    pub async_registers: Vec<(u64, String)>,
}

impl InterfaceTotals {
    pub fn new() -> Self {
        Self {
            num_registers: 0,
            num_windows: 0,
            any_async_clock: false,
            all_async_clock: true,
            any_shadowed: false,
            async_registers: vec![],
        }
    }
}

impl ModelBuilder<'_> {
    /// Derive one interface from the registers and memories directly below
    /// `block`.
    pub(super) fn assemble_interface(
        &self,
        block: NodeIdx,
        name: Option<String>,
        scope: Scope,
        warnings: &mut Vec<Warning>,
    ) -> BuildResult<Interface> {
        let node = self.tree.node(block);
        let mut totals = InterfaceTotals::new();
        let mut registers = vec![];
        let mut windows = vec![];

        for (idx, child) in self.tree.children(block) {
            match child.kind {
                NodeKind::Reg => {
                    registers.push(self.derive_register(idx, &mut totals, warnings)?);
                }
                NodeKind::Mem if child.is_array() => {
                    self.unsupported(idx, "arrayed memories are not supported", warnings);
                }
                NodeKind::Mem => {
                    windows.push(self.derive_window(idx, &mut totals, warnings)?);
                }
                // Child blocks of the root are interfaces of their own.
                NodeKind::AddrMap if scope == Scope::Root => {}
                NodeKind::AddrMap => {
                    self.unsupported(idx, "nested blocks are not supported", warnings);
                }
                NodeKind::RegFile => {
                    self.unsupported(idx, "register files are not supported", warnings);
                }
                NodeKind::Field | NodeKind::Signal => {
                    self.unsupported(idx, "not a register or memory", warnings);
                }
            }
        }

        // The derivers reject anything ending past the address space.
        let end = registers
            .iter()
            .filter_map(|r| r.offsets.last().map(|offset| offset + r.byte_width()))
            .chain(windows.iter().map(|w| w.offset + w.size))
            .max()
            .unwrap_or(0);
        let address_width = address_width(end);

        let needs_address_width_decode = match (registers.is_empty(), windows.as_slice()) {
            (true, []) => false,
            // A lone window spanning the whole space decodes without address bits.
            (true, [window]) => {
                window.offset != 0 || 1u64.checked_shl(address_width) != Some(window.size)
            }
            _ => true,
        };

        let has_content = !registers.is_empty() || !windows.is_empty();
        if !has_content {
            let warning = Warning::EmptyInterface {
                path: self.tree.path(block),
            };
            warn!("{warning}");
            warnings.push(warning);
        }

        let interface = Interface {
            name,
            offset: node.address_offset,
            num_registers: totals.num_registers,
            num_windows: totals.num_windows,
            address_width,
            async_registers: totals.async_registers,
            needs_address_width_decode,
            any_async_clock: totals.any_async_clock,
            all_async_clock: totals.all_async_clock && has_content,
            any_shadowed: totals.any_shadowed,
            any_integrity_bypass: windows.iter().any(|w| w.integrity_bypass),
            registers,
            windows,
        };

        debug!(
            "Interface {} at {:#x}: {} register(s), {} window(s), addr_width {}, needs_aw {}",
            interface.name.as_deref().unwrap_or("<root>"),
            interface.offset,
            interface.num_registers,
            interface.num_windows,
            interface.address_width,
            interface.needs_address_width_decode
        );

        Ok(interface)
    }
}
