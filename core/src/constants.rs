use std::time::Duration;

/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 4096;
/// Addressed accesses are taken modulo the memory size
pub const ADDRESS_MASK: u16 = 0x0FFF;

/// Where ROMs are loaded and where execution begins
pub const PROGRAM_START: u16 = 0x200;
/// The largest ROM that fits between `PROGRAM_START` and the end of memory
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

pub const STACK_SIZE: usize = 16;
pub const REGISTER_COUNT: usize = 16;
pub const KEY_COUNT: usize = 16;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Default instruction rate in Hz
pub const CLOCK_SPEED: u32 = 500;
/// The delay and sound timers always count down at 60Hz
pub const TIMER_SPEED: u32 = 60;
/// Fastest accepted instruction rate in Hz
pub const MAX_CLOCK_SPEED: u32 = 1_000_000;
/// Wall-clock time a single `Chip8::update` call will catch up on; anything
/// beyond it is dropped
pub const MAX_CATCH_UP: Duration = Duration::from_secs(1);

/// Number of past states kept for rewinding unless configured otherwise
pub const MAX_SAVED_STATES: usize = 64;

/// Start of the reserved low-memory region holding the hex digit font
pub const FONT_START: u16 = 0x050;
/// Each glyph is 5 rows tall
pub const FONT_GLYPH_SIZE: u16 = 5;

/// # Sprite sheet
/// Built-in 4x5 glyphs for the hexadecimal digits 0..F.
/// Each byte is a row; only the high nibble is lit.
/// ```text
/// 0xF0  ####
/// 0x90  #  #
/// 0x90  #  #
/// 0x90  #  #
/// 0xF0  ####
/// ```
#[rustfmt::skip]
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
