//! Periodic 32-bit templates, one per odd multiplier.
//!
//! Each template approximates the repeating binary expansion tied to its
//! multiplier. The forced-pattern transform copies the top P bits of the
//! template into the low P bits of a value before scaling.

pub static PATTERN_TABLE: [(u32, u32); 15] = [
    (3, 0b01010101010101010101010101010101),
    (5, 0b11001100110011001100110011001100),
    (7, 0b00100100100100100100100100100100),
    (9, 0b00011100011100011100011100011100),
    (11, 0b00010111010001011101000101110100),
    (13, 0b00010011101100010011101100010011),
    (15, 0b00010001000100010001000100010001),
    // 17, 19, 25 and 27 mostly produce trailing ones.
    (17, 0b00001111000011110000111100001111),
    (19, 0b00001101011110010100001101011110),
    (21, 0b00001100001100001100001100001100),
    (23, 0b00001011001000010110010000101100),
    (25, 0b00001010001111010111000010100011),
    (27, 0b00001001011110110100001001011110),
    (29, 0b00001000110100111101110010110000),
    (31, 0b00001000010000100001000010000100),
];

/// Template for `multiplier`, if the table has one.
pub fn template_for(multiplier: u32) -> Option<u32> {
    PATTERN_TABLE
        .binary_search_by_key(&multiplier, |&(m, _)| m)
        .ok()
        .map(|idx| PATTERN_TABLE[idx].1)
}

/// Multipliers with a template, ascending.
pub fn multipliers() -> impl Iterator<Item = u32> {
    PATTERN_TABLE.iter().map(|&(m, _)| m)
}
