//! Packed binary-coded decimal helpers.

/// Low nibble: the units digit of every packed field.
pub const UNITS_MASK: u8 = 0x0F;

/// Packs `n` (0..=99) as `(tens << 4) | units`.
///
/// Values above 99 are a caller bug; clamp before calling.
pub const fn to_bcd(mut n: u8) -> u8 {
    debug_assert!(n <= 99);
    let mut tens = 0;
    while n >= 10 {
        n -= 10;
        tens += 1;
    }
    (tens << 4) | n
}

/// Units digit of a packed field.
#[inline]
pub const fn units(byte: u8) -> u8 {
    byte & UNITS_MASK
}

/// Tens digit of a packed field, keeping only the bits `tens_mask` allows.
#[inline]
pub const fn tens(byte: u8, tens_mask: u8) -> u8 {
    (byte & tens_mask) >> 4
}
