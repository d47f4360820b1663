// Licensed under the Apache-2.0 license

//! Hardware signal rules.
//!
//! Pure functions deciding which enable signals and byte-lane permissions the
//! register logic needs. They only look at already derived [`Field`] and
//! [`Register`] data and cannot fail.

use crate::output::{Field, Register, SwAccess};
use crate::value::{AccessType, OnReadType, OnWriteType};

/// Byte lanes touched by the bit range `lsb..=msb`, one mask bit per lane.
pub fn field_permit_mask(lsb: u32, msb: u32) -> u8 {
    let first = lsb / 8;
    let last = msb / 8;
    (first..=last)
        .filter(|lane| *lane < 8)
        .fold(0, |mask, lane| mask | (1 << lane))
}

/// Byte lanes covered by any field of the register.
pub fn register_permit_mask(fields: &[Field]) -> u8 {
    fields
        .iter()
        .fold(0, |mask, f| mask | field_permit_mask(f.lsb, f.msb))
}

/// Bits `lsb..=msb` set.
pub fn field_bitmask(lsb: u32, msb: u32) -> u64 {
    let upper = if msb >= 63 {
        u64::MAX
    } else {
        (1u64 << (msb + 1)) - 1
    };
    upper & !((1u64 << lsb.min(63)) - 1)
}

/// Whether the register needs a read-enable signal.
///
/// A shadowed register resets its phase tracking on read, a clear-on-read
/// field hooks the read enable to its write port, and an external register
/// needs the read strobe whenever software can read any of its fields.
pub fn needs_read_en(reg: &Register) -> bool {
    reg.shadowed
        || reg
            .fields
            .iter()
            .any(|f| f.clear_on_read || (reg.external && f.sw_readable))
}

/// Whether the register needs a write-enable signal.
///
/// Clear-on-read fields take the read-enable path instead.
pub fn needs_write_en(reg: &Register) -> bool {
    reg.fields
        .iter()
        .any(|f| !f.clear_on_read && f.sw_writable)
}

/// Whether any field exposes a q-enable.
pub fn needs_qe(reg: &Register) -> bool {
    reg.fields.iter().any(|f| f.swmod)
}

/// Whether the register logic needs an internal q-enable.
///
/// The internal q-enable is consumed by other register logic but is not
/// exported in the package.
pub fn needs_int_qe(reg: &Register) -> bool {
    (reg.async_clock && reg.hw_writable) || needs_qe(reg)
}

/// Number of fields whose software writes are not gated by an enable.
pub fn fields_no_write_en(fields: &[Field]) -> usize {
    fields.iter().filter(|f| !f.sw_write_en).count()
}

/// True when every field has the same width, access class and signals, so
/// the register can be described by replicating one field.
pub fn is_homogeneous(fields: &[Field]) -> bool {
    let Some((first, rest)) = fields.split_first() else {
        return true;
    };
    rest.iter().all(|f| {
        f.width == first.width
            && f.sw_access == first.sw_access
            && f.hw_readable == first.hw_readable
            && f.hw_writable == first.hw_writable
            && f.hw_write_en == first.hw_write_en
            && f.sw_write_en == first.sw_write_en
            && f.swmod == first.swmod
            && f.reset == first.reset
    })
}

/// Resolve the software access class.
///
/// Write side effects win over read side effects, which win over the plain
/// `sw` permission: `woclr > woset > wzc > rclr > sw`.
pub fn sw_access(
    sw: AccessType,
    onread: Option<OnReadType>,
    onwrite: Option<OnWriteType>,
) -> SwAccess {
    match (onwrite, onread) {
        (Some(OnWriteType::Woclr), _) => SwAccess::W1c,
        (Some(OnWriteType::Woset), _) => SwAccess::W1s,
        (Some(OnWriteType::Wzc), _) => SwAccess::W0c,
        (_, Some(OnReadType::Rclr)) => SwAccess::Rc,
        _ => match sw {
            AccessType::R => SwAccess::Ro,
            AccessType::W => SwAccess::Wo,
            AccessType::Rw => SwAccess::Rw,
            _ => SwAccess::None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, lsb: u32, msb: u32) -> Field {
        Field {
            name: name.to_string(),
            parent_name: "reg".to_string(),
            desc: String::new(),
            lsb,
            msb,
            width: msb - lsb + 1,
            bitmask: field_bitmask(lsb, msb),
            reset: None,
            hw_readable: true,
            hw_writable: false,
            sw_readable: true,
            sw_writable: true,
            sw_write_en: false,
            write_en_signal: None,
            hw_write_en: false,
            swmod: false,
            clear_on_read: false,
            set_on_read: false,
            mubi: false,
            encode: None,
            async_domain: None,
            sync_domain: None,
            sw_access: SwAccess::Rw,
        }
    }

    fn register(fields: Vec<Field>) -> Register {
        Register {
            name: "reg".to_string(),
            desc: String::new(),
            width: 32,
            hw_readable: true,
            hw_writable: false,
            sw_readable: true,
            sw_writable: true,
            swmod: false,
            external: false,
            shadowed: false,
            hwre: false,
            async_clock: false,
            offsets: vec![0],
            is_multireg: false,
            is_multifields: fields.len() > 1,
            msb: fields.iter().map(|f| f.msb).max().unwrap_or(0),
            permit: register_permit_mask(&fields),
            bitmask: 0,
            reset: 0,
            sw_write_en: false,
            fields_no_write_en: 0,
            is_homogeneous: true,
            needs_write_en: false,
            needs_read_en: false,
            needs_qe: false,
            needs_int_qe: false,
            fields,
        }
    }

    /// Mask derived from the register msb alone, as older exporters did.
    fn width_threshold_permit_mask(msb: u32) -> u8 {
        match msb + 1 {
            w if w > 24 => 0b1111,
            w if w > 16 => 0b0111,
            w if w > 8 => 0b0011,
            _ => 0b0001,
        }
    }

    #[test]
    fn test_field_permit_mask() {
        assert_eq!(field_permit_mask(0, 7), 0b0001);
        assert_eq!(field_permit_mask(6, 17), 0b0111);
        assert_eq!(field_permit_mask(8, 15), 0b0010);
        assert_eq!(field_permit_mask(0, 31), 0b1111);
        assert_eq!(field_permit_mask(0, 63), 0xff);
    }

    #[test]
    fn test_register_permit_mask_sparse_layout() {
        // Byte lanes 0 and 3 only; lanes 1 and 2 carry no field data.
        let fields = vec![field("lo", 0, 3), field("hi", 24, 31)];
        assert_eq!(register_permit_mask(&fields), 0b1001);
    }

    #[test]
    fn test_permit_mask_diverges_from_width_thresholds() {
        // Dense layouts starting at bit 0 agree with the threshold rule.
        for msb in [0u32, 7, 8, 15, 16, 23, 24, 31] {
            assert_eq!(
                register_permit_mask(&[field("f", 0, msb)]),
                width_threshold_permit_mask(msb),
                "msb {msb}"
            );
        }
        // Sparse layouts do not.
        let sparse = vec![field("lo", 0, 0), field("hi", 31, 31)];
        assert_eq!(register_permit_mask(&sparse), 0b1001);
        assert_eq!(width_threshold_permit_mask(31), 0b1111);
        let high_only = vec![field("hi", 16, 23)];
        assert_eq!(register_permit_mask(&high_only), 0b0100);
        assert_eq!(width_threshold_permit_mask(23), 0b0111);
    }

    #[test]
    fn test_field_bitmask() {
        assert_eq!(field_bitmask(0, 0), 0x1);
        assert_eq!(field_bitmask(1, 8), 0x1fe);
        assert_eq!(field_bitmask(0, 31), 0xffff_ffff);
        assert_eq!(field_bitmask(32, 63), 0xffff_ffff_0000_0000);
        assert_eq!(field_bitmask(0, 63), u64::MAX);
    }

    #[test]
    fn test_read_write_enables() {
        let mut rc = field("rc", 0, 7);
        rc.clear_on_read = true;
        let reg = register(vec![rc]);
        assert!(needs_read_en(&reg));
        assert!(!needs_write_en(&reg));

        let reg = register(vec![field("rw", 0, 7)]);
        assert!(!needs_read_en(&reg));
        assert!(needs_write_en(&reg));
    }

    #[test]
    fn test_read_en_shadowed_and_external() {
        let mut reg = register(vec![field("rw", 0, 7)]);
        reg.shadowed = true;
        assert!(needs_read_en(&reg));

        let mut reg = register(vec![field("rw", 0, 7)]);
        reg.external = true;
        assert!(needs_read_en(&reg));

        let mut wo = field("wo", 0, 7);
        wo.sw_readable = false;
        let mut reg = register(vec![wo]);
        reg.external = true;
        assert!(!needs_read_en(&reg));
    }

    #[test]
    fn test_qe() {
        let mut swmod = field("swmod", 0, 0);
        swmod.swmod = true;
        let reg = register(vec![swmod, field("plain", 1, 1)]);
        assert!(needs_qe(&reg));
        assert!(needs_int_qe(&reg));

        let mut reg = register(vec![field("plain", 0, 0)]);
        assert!(!needs_qe(&reg));
        assert!(!needs_int_qe(&reg));
        reg.async_clock = true;
        assert!(!needs_int_qe(&reg));
        reg.hw_writable = true;
        assert!(needs_int_qe(&reg));
    }

    #[test]
    fn test_sw_access_precedence() {
        use AccessType::*;
        assert_eq!(
            sw_access(Rw, Some(OnReadType::Rclr), Some(OnWriteType::Woclr)),
            SwAccess::W1c
        );
        assert_eq!(
            sw_access(Rw, Some(OnReadType::Rclr), Some(OnWriteType::Woset)),
            SwAccess::W1s
        );
        assert_eq!(sw_access(Rw, None, Some(OnWriteType::Wzc)), SwAccess::W0c);
        assert_eq!(sw_access(Rw, Some(OnReadType::Rclr), None), SwAccess::Rc);
        assert_eq!(sw_access(R, Some(OnReadType::Rset), None), SwAccess::Ro);
        assert_eq!(sw_access(W, None, Some(OnWriteType::Wot)), SwAccess::Wo);
        assert_eq!(sw_access(Rw, None, None), SwAccess::Rw);
        assert_eq!(sw_access(Na, None, None), SwAccess::None);
        assert_eq!(sw_access(W1, None, None), SwAccess::None);
        assert_eq!(SwAccess::W1c.to_string(), "W1C");
    }

    #[test]
    fn test_homogeneous_and_write_en_counts() {
        let fields = vec![field("a", 0, 3), field("b", 4, 7)];
        assert!(is_homogeneous(&fields));
        assert_eq!(fields_no_write_en(&fields), 2);

        let mut gated = field("c", 8, 9);
        gated.sw_write_en = true;
        let fields = vec![field("a", 0, 1), gated];
        assert!(!is_homogeneous(&fields));
        assert_eq!(fields_no_write_en(&fields), 1);
        assert!(is_homogeneous(&[]));
    }
}
