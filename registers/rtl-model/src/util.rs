// Licensed under the Apache-2.0 license

//! Small numeric helpers shared by the derivers.

/// Number of bits needed to represent `val`; zero for zero.
///
/// # Examples
/// ```
/// use registers_rtl_model::util::bit_length;
/// assert_eq!(bit_length(0), 0);
/// assert_eq!(bit_length(1023), 10);
/// assert_eq!(bit_length(1024), 11);
/// ```
pub fn bit_length(val: u64) -> u32 {
    u64::BITS - val.leading_zeros()
}

/// Bits needed to address every byte below `end` (exclusive).
///
/// # Examples
/// ```
/// use registers_rtl_model::util::address_width;
/// assert_eq!(address_width(1024), 10);
/// assert_eq!(address_width(0x2c), 6);
/// assert_eq!(address_width(0), 0);
/// ```
pub fn address_width(end: u64) -> u32 {
    bit_length(end.saturating_sub(1))
}

/// Bytes occupied by a word of `bits` bits.
pub fn byte_width(bits: u64) -> u64 {
    bits.div_ceil(8)
}
