use std::fmt;

use crate::error::Fault;
use crate::opcode::{nnn, xkk, xyn, Opcode};

/// A decoded Chip-8 instruction.
///
/// Register operands (`x`, `y`) are register numbers 0x0..=0xF, `kk` is an
/// 8-bit immediate, `n` a 4-bit immediate and `addr` a 12-bit address.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 0nnn: call a machine code routine; ignored
    Sys { addr: u16 },
    /// 00E0
    Cls,
    /// 00EE
    Ret,
    /// 1nnn
    Jump { addr: u16 },
    /// 2nnn
    Call { addr: u16 },
    /// 3xkk
    SkipEqByte { x: u8, kk: u8 },
    /// 4xkk
    SkipNeByte { x: u8, kk: u8 },
    /// 5xy0
    SkipEqReg { x: u8, y: u8 },
    /// 6xkk
    LoadByte { x: u8, kk: u8 },
    /// 7xkk
    AddByte { x: u8, kk: u8 },
    /// 8xy0
    Move { x: u8, y: u8 },
    /// 8xy1
    Or { x: u8, y: u8 },
    /// 8xy2
    And { x: u8, y: u8 },
    /// 8xy3
    Xor { x: u8, y: u8 },
    /// 8xy4
    AddReg { x: u8, y: u8 },
    /// 8xy5
    Sub { x: u8, y: u8 },
    /// 8xy6
    ShiftRight { x: u8, y: u8 },
    /// 8xy7
    SubN { x: u8, y: u8 },
    /// 8xyE
    ShiftLeft { x: u8, y: u8 },
    /// 9xy0
    SkipNeReg { x: u8, y: u8 },
    /// Annn
    LoadIndex { addr: u16 },
    /// Bnnn
    JumpOffset { addr: u16 },
    /// Cxkk
    Random { x: u8, kk: u8 },
    /// Dxyn
    Draw { x: u8, y: u8, n: u8 },
    /// Ex9E
    SkipKeyPressed { x: u8 },
    /// ExA1
    SkipKeyReleased { x: u8 },
    /// Fx07
    LoadDelay { x: u8 },
    /// Fx0A
    AwaitKey { x: u8 },
    /// Fx15
    SetDelay { x: u8 },
    /// Fx18
    SetSound { x: u8 },
    /// Fx1E
    AddIndex { x: u8 },
    /// Fx29
    LoadDigit { x: u8 },
    /// Fx33
    StoreBcd { x: u8 },
    /// Fx55
    StoreRegisters { x: u8 },
    /// Fx65
    LoadRegisters { x: u8 },
}

impl Instruction {
    /// Selects the Instruction for a given Opcode.
    ///
    /// `address` is only used to locate the word if it can't be decoded.
    pub fn decode(op: u16, address: u16) -> Result<Instruction, Fault> {
        use Instruction::*;

        let (x, y, n, kk, addr) = (op.x(), op.y(), op.n(), op.kk(), op.addr());
        let instruction = match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Cls,
            (0x0, 0x0, 0xE, 0xE) => Ret,
            (0x0, ..) => Sys { addr },
            (0x1, ..) => Jump { addr },
            (0x2, ..) => Call { addr },
            (0x3, ..) => SkipEqByte { x, kk },
            (0x4, ..) => SkipNeByte { x, kk },
            (0x5, .., 0x0) => SkipEqReg { x, y },
            (0x6, ..) => LoadByte { x, kk },
            (0x7, ..) => AddByte { x, kk },
            (0x8, .., 0x0) => Move { x, y },
            (0x8, .., 0x1) => Or { x, y },
            (0x8, .., 0x2) => And { x, y },
            (0x8, .., 0x3) => Xor { x, y },
            (0x8, .., 0x4) => AddReg { x, y },
            (0x8, .., 0x5) => Sub { x, y },
            (0x8, .., 0x6) => ShiftRight { x, y },
            (0x8, .., 0x7) => SubN { x, y },
            (0x8, .., 0xE) => ShiftLeft { x, y },
            (0x9, .., 0x0) => SkipNeReg { x, y },
            (0xA, ..) => LoadIndex { addr },
            (0xB, ..) => JumpOffset { addr },
            (0xC, ..) => Random { x, kk },
            (0xD, ..) => Draw { x, y, n },
            (0xE, .., 0x9, 0xE) => SkipKeyPressed { x },
            (0xE, .., 0xA, 0x1) => SkipKeyReleased { x },
            (0xF, .., 0x0, 0x7) => LoadDelay { x },
            (0xF, .., 0x0, 0xA) => AwaitKey { x },
            (0xF, .., 0x1, 0x5) => SetDelay { x },
            (0xF, .., 0x1, 0x8) => SetSound { x },
            (0xF, .., 0x1, 0xE) => AddIndex { x },
            (0xF, .., 0x2, 0x9) => LoadDigit { x },
            (0xF, .., 0x3, 0x3) => StoreBcd { x },
            (0xF, .., 0x5, 0x5) => StoreRegisters { x },
            (0xF, .., 0x6, 0x5) => LoadRegisters { x },
            _ => return Err(Fault::Decode { opcode: op, address }),
        };
        Ok(instruction)
    }

    /// The canonical opcode for this instruction
    pub fn encode(&self) -> u16 {
        use Instruction::*;

        match *self {
            Sys { addr } => nnn(0x0, addr),
            Cls => 0x00E0,
            Ret => 0x00EE,
            Jump { addr } => nnn(0x1, addr),
            Call { addr } => nnn(0x2, addr),
            SkipEqByte { x, kk } => xkk(0x3, x, kk),
            SkipNeByte { x, kk } => xkk(0x4, x, kk),
            SkipEqReg { x, y } => xyn(0x5, x, y, 0x0),
            LoadByte { x, kk } => xkk(0x6, x, kk),
            AddByte { x, kk } => xkk(0x7, x, kk),
            Move { x, y } => xyn(0x8, x, y, 0x0),
            Or { x, y } => xyn(0x8, x, y, 0x1),
            And { x, y } => xyn(0x8, x, y, 0x2),
            Xor { x, y } => xyn(0x8, x, y, 0x3),
            AddReg { x, y } => xyn(0x8, x, y, 0x4),
            Sub { x, y } => xyn(0x8, x, y, 0x5),
            ShiftRight { x, y } => xyn(0x8, x, y, 0x6),
            SubN { x, y } => xyn(0x8, x, y, 0x7),
            ShiftLeft { x, y } => xyn(0x8, x, y, 0xE),
            SkipNeReg { x, y } => xyn(0x9, x, y, 0x0),
            LoadIndex { addr } => nnn(0xA, addr),
            JumpOffset { addr } => nnn(0xB, addr),
            Random { x, kk } => xkk(0xC, x, kk),
            Draw { x, y, n } => xyn(0xD, x, y, n),
            SkipKeyPressed { x } => xkk(0xE, x, 0x9E),
            SkipKeyReleased { x } => xkk(0xE, x, 0xA1),
            LoadDelay { x } => xkk(0xF, x, 0x07),
            AwaitKey { x } => xkk(0xF, x, 0x0A),
            SetDelay { x } => xkk(0xF, x, 0x15),
            SetSound { x } => xkk(0xF, x, 0x18),
            AddIndex { x } => xkk(0xF, x, 0x1E),
            LoadDigit { x } => xkk(0xF, x, 0x29),
            StoreBcd { x } => xkk(0xF, x, 0x33),
            StoreRegisters { x } => xkk(0xF, x, 0x55),
            LoadRegisters { x } => xkk(0xF, x, 0x65),
        }
    }
}

/// Mnemonics follow the conventional Chip-8 assembly syntax
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Instruction::*;

        match *self {
            Sys { addr } => write!(f, "SYS {:#05X}", addr),
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jump { addr } => write!(f, "JP {:#05X}", addr),
            Call { addr } => write!(f, "CALL {:#05X}", addr),
            SkipEqByte { x, kk } => write!(f, "SE V{:X}, {:#04X}", x, kk),
            SkipNeByte { x, kk } => write!(f, "SNE V{:X}, {:#04X}", x, kk),
            SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadByte { x, kk } => write!(f, "LD V{:X}, {:#04X}", x, kk),
            AddByte { x, kk } => write!(f, "ADD V{:X}, {:#04X}", x, kk),
            Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            SubN { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            SkipNeReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadIndex { addr } => write!(f, "LD I, {:#05X}", addr),
            JumpOffset { addr } => write!(f, "JP V0, {:#05X}", addr),
            Random { x, kk } => write!(f, "RND V{:X}, {:#04X}", x, kk),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipKeyPressed { x } => write!(f, "SKP V{:X}", x),
            SkipKeyReleased { x } => write!(f, "SKNP V{:X}", x),
            LoadDelay { x } => write!(f, "LD V{:X}, DT", x),
            AwaitKey { x } => write!(f, "LD V{:X}, K", x),
            SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            SetSound { x } => write!(f, "LD ST, V{:X}", x),
            AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            LoadDigit { x } => write!(f, "LD F, V{:X}", x),
            StoreBcd { x } => write!(f, "LD B, V{:X}", x),
            StoreRegisters { x } => write!(f, "LD [I], V{:X}", x),
            LoadRegisters { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

#[cfg(test)]
mod test_instruction {
    use super::Instruction::*;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decodes_every_instruction() {
        let cases = [
            (0x0123, Sys { addr: 0x123 }),
            (0x00E0, Cls),
            (0x00EE, Ret),
            (0x1234, Jump { addr: 0x234 }),
            (0x2456, Call { addr: 0x456 }),
            (0x342A, SkipEqByte { x: 0x4, kk: 0x2A }),
            (0x4A75, SkipNeByte { x: 0xA, kk: 0x75 }),
            (0x5AE0, SkipEqReg { x: 0xA, y: 0xE }),
            (0x63F5, LoadByte { x: 0x3, kk: 0xF5 }),
            (0x7B12, AddByte { x: 0xB, kk: 0x12 }),
            (0x8590, Move { x: 0x5, y: 0x9 }),
            (0x8101, Or { x: 0x1, y: 0x0 }),
            (0x8642, And { x: 0x6, y: 0x4 }),
            (0x87F3, Xor { x: 0x7, y: 0xF }),
            (0x8264, AddReg { x: 0x2, y: 0x6 }),
            (0x8C45, Sub { x: 0xC, y: 0x4 }),
            (0x8126, ShiftRight { x: 0x1, y: 0x2 }),
            (0x86D7, SubN { x: 0x6, y: 0xD }),
            (0x8E0E, ShiftLeft { x: 0xE, y: 0x0 }),
            (0x9990, SkipNeReg { x: 0x9, y: 0x9 }),
            (0xA568, LoadIndex { addr: 0x568 }),
            (0xBABC, JumpOffset { addr: 0xABC }),
            (0xC5AF, Random { x: 0x5, kk: 0xAF }),
            (0xD7B0, Draw { x: 0x7, y: 0xB, n: 0x0 }),
            (0xE49E, SkipKeyPressed { x: 0x4 }),
            (0xECA1, SkipKeyReleased { x: 0xC }),
            (0xF907, LoadDelay { x: 0x9 }),
            (0xFD0A, AwaitKey { x: 0xD }),
            (0xF315, SetDelay { x: 0x3 }),
            (0xF718, SetSound { x: 0x7 }),
            (0xF91E, AddIndex { x: 0x9 }),
            (0xFF29, LoadDigit { x: 0xF }),
            (0xF533, StoreBcd { x: 0x5 }),
            (0xF655, StoreRegisters { x: 0x6 }),
            (0xF065, LoadRegisters { x: 0x0 }),
        ];
        assert_eq!(cases.len(), 35);
        for (op, expected) in cases.iter() {
            assert_eq!(Instruction::decode(*op, 0x200), Ok(*expected), "{:#06X}", op);
            assert_eq!(expected.encode(), *op);
        }
    }

    #[test]
    fn test_unknown_sub_selectors_fail() {
        for op in [0x5121u16, 0x8128, 0x812F, 0x9121, 0xE19F, 0xE1A2, 0xF0FF, 0xF130] {
            assert_eq!(
                Instruction::decode(op, 0x2F0),
                Err(Fault::Decode {
                    opcode: op,
                    address: 0x2F0
                })
            );
        }
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(LoadByte { x: 0x1, kk: 0x22 }.to_string(), "LD V1, 0x22");
        assert_eq!(Draw { x: 0x0, y: 0x1, n: 5 }.to_string(), "DRW V0, V1, 5");
        assert_eq!(Call { addr: 0x300 }.to_string(), "CALL 0x300");
        assert_eq!(StoreRegisters { x: 0xA }.to_string(), "LD [I], VA");
    }

    proptest! {
        #[test]
        fn decoded_words_reencode_exactly(op in any::<u16>()) {
            match Instruction::decode(op, 0x200) {
                Ok(instruction) => prop_assert_eq!(instruction.encode(), op),
                Err(fault) => prop_assert_eq!(fault, Fault::Decode { opcode: op, address: 0x200 }),
            }
        }
    }
}
