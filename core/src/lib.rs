//! A headless Chip-8 virtual machine.
//!
//! The host loads a ROM, feeds in key presses and elapsed time, and reads
//! back the frame buffer and sound status; everything else happens here.

pub use chip8::Chip8;
pub use config::{Config, Quirks};
pub use constants::CLOCK_SPEED;
pub use error::{Chip8Error, Fault};
pub use instruction::Instruction;

mod chip8;
pub mod clock;
mod config;
pub mod constants;
mod error;
pub mod instruction;
mod opcode;
pub mod operations;
pub mod state;
