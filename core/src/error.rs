use thiserror::Error;

/// A fatal condition raised while executing an instruction.
///
/// Faults are detected before the instruction touches any state, so the
/// machine can be inspected exactly as it was when it stopped.
/// Every variant carries the `address` of the instruction that faulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("unknown opcode {opcode:#06X} at {address:#05X}")]
    Decode { opcode: u16, address: u16 },

    #[error("stack overflow: call at {address:#05X} with a full stack")]
    StackOverflow { address: u16 },

    #[error("stack underflow: return at {address:#05X} with an empty stack")]
    StackUnderflow { address: u16 },
}

impl Fault {
    /// Address of the instruction that raised the fault
    pub fn address(&self) -> u16 {
        match *self {
            Fault::Decode { address, .. }
            | Fault::StackOverflow { address }
            | Fault::StackUnderflow { address } => address,
        }
    }
}

/// Errors surfaced to whoever is driving a `Chip8`
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error(transparent)]
    Fault(#[from] Fault),

    /// The machine already faulted; it stays stopped until reset or rewound
    #[error("machine is halted: {0}")]
    Halted(Fault),

    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    #[error("unable to read ROM: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
