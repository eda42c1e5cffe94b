//! Field layout of a 16-bit Chip-8 word, in both directions.
//!
//! ```text
//! [g x y n]   g: group, x/y: registers, n: 4-bit immediate
//! [g x k k]   kk: 8-bit immediate
//! [g a a a]   aaa: 12-bit address
//! ```
//!
//! The group nibble picks the broad category; the low nibble or byte narrows
//! it down inside groups 0, 5, 8, 9, E and F. Fields not used for selection
//! carry operands.

/// Operand extraction for a fetched word
pub trait Opcode {
    /// `(g, x, y, n)`, the word split into nibbles
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// `[g___]`
    fn group(&self) -> u8;

    /// `[_x__]`
    fn x(&self) -> u8;

    /// `[__y_]`
    fn y(&self) -> u8;

    /// `[___n]`
    fn n(&self) -> u8;

    /// `[__kk]`
    fn kk(&self) -> u8;

    /// `[_aaa]`
    fn addr(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (self.group(), self.x(), self.y(), self.n())
    }

    fn group(&self) -> u8 {
        (self >> 12) as u8
    }

    fn x(&self) -> u8 {
        (self >> 8 & 0xF) as u8
    }

    fn y(&self) -> u8 {
        (self >> 4 & 0xF) as u8
    }

    fn n(&self) -> u8 {
        (self & 0xF) as u8
    }

    fn kk(&self) -> u8 {
        *self as u8
    }

    fn addr(&self) -> u16 {
        self & 0x0FFF
    }
}

/// `[g x y n]`
pub fn xyn(group: u8, x: u8, y: u8, n: u8) -> u16 {
    u16::from(group & 0xF) << 12
        | u16::from(x & 0xF) << 8
        | u16::from(y & 0xF) << 4
        | u16::from(n & 0xF)
}

/// `[g x k k]`
pub fn xkk(group: u8, x: u8, kk: u8) -> u16 {
    u16::from(group & 0xF) << 12 | u16::from(x & 0xF) << 8 | u16::from(kk)
}

/// `[g a a a]`
pub fn nnn(group: u8, addr: u16) -> u16 {
    u16::from(group & 0xF) << 12 | addr & 0x0FFF
}
