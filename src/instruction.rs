use std::fmt;

use crate::opcode::Instruction;

/// Every operation the interpreter knows, with its operands pulled out of the word.
///
/// `x` and `y` are register indices, `kk` an 8-bit immediate, `n` a 4-bit
/// immediate and `nnn` a 12-bit address.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// 001N: stop with exit code N
    Exit(u8),
    /// 00CN: scroll down N rows
    ScrollDown(u8),
    /// 00E0
    Clear,
    /// 00EE
    Return,
    /// 00FB: scroll right 4 columns
    ScrollRight,
    /// 00FC: scroll left 4 columns
    ScrollLeft,
    /// 00FD: stop with exit code 0
    Halt,
    /// 00FE
    LowRes,
    /// 00FF
    HighRes,
    /// 0NNN: machine code routine, ignored along with the instruction after it
    System(u16),
    /// 1NNN
    Jump(u16),
    /// 2NNN
    Call(u16),
    /// 3XKK
    SkipEqualByte { x: usize, kk: u8 },
    /// 4XKK
    SkipNotEqualByte { x: usize, kk: u8 },
    /// 5XY0
    SkipEqualRegister { x: usize, y: usize },
    /// 6XKK
    LoadByte { x: usize, kk: u8 },
    /// 7XKK
    AddByte { x: usize, kk: u8 },
    /// 8XY0
    Move { x: usize, y: usize },
    /// 8XY1
    Or { x: usize, y: usize },
    /// 8XY2
    And { x: usize, y: usize },
    /// 8XY3
    Xor { x: usize, y: usize },
    /// 8XY4
    Add { x: usize, y: usize },
    /// 8XY5
    Sub { x: usize, y: usize },
    /// 8XY6
    ShiftRight { x: usize },
    /// 8XY7
    SubNegated { x: usize, y: usize },
    /// 8XYE
    ShiftLeft { x: usize },
    /// 9XY0
    SkipNotEqualRegister { x: usize, y: usize },
    /// ANNN
    LoadIndex(u16),
    /// BNNN
    JumpOffset(u16),
    /// CXKK
    Random { x: usize, kk: u8 },
    /// DXYN
    Draw { x: usize, y: usize, n: u8 },
    /// EX9E
    SkipPressed { x: usize },
    /// EXA1
    SkipNotPressed { x: usize },
    /// FX07
    LoadDelay { x: usize },
    /// FX0A
    WaitKey { x: usize },
    /// FX15
    SetDelay { x: usize },
    /// FX18
    SetSound { x: usize },
    /// FX1E
    AddIndex { x: usize },
    /// FX29
    SmallGlyph { x: usize },
    /// FX30
    LargeGlyph { x: usize },
    /// FX33
    Bcd { x: usize },
    /// FX55
    StoreRegisters { x: usize },
    /// FX65
    LoadRegisters { x: usize },
    /// FX75
    StoreRpl { x: usize },
    /// FX85
    LoadRpl { x: usize },
    /// Any word no operation is bound to
    Unknown(u16),
}

impl Operation {
    /// Selects the Operation for a decoded Instruction.
    ///
    /// The family nibble picks a category; families 0, 8, E and F are
    /// narrowed further by their low nibble or low byte. Anything left over
    /// lands on `Unknown`.
    pub fn decode(instruction: &Instruction) -> Self {
        use Operation::*;

        let Instruction {
            word,
            family,
            n,
            kk,
            nnn,
            ..
        } = *instruction;
        let (x, y) = (instruction.vx(), instruction.vy());

        match (family, instruction.x, instruction.y, n) {
            (0x0, 0x0, 0x1, _) => Exit(n),
            (0x0, 0x0, 0xC, _) => ScrollDown(n),
            (0x0, 0x0, 0xE, 0x0) => Clear,
            (0x0, 0x0, 0xE, 0xE) => Return,
            (0x0, 0x0, 0xF, 0xB) => ScrollRight,
            (0x0, 0x0, 0xF, 0xC) => ScrollLeft,
            (0x0, 0x0, 0xF, 0xD) => Halt,
            (0x0, 0x0, 0xF, 0xE) => LowRes,
            (0x0, 0x0, 0xF, 0xF) => HighRes,
            (0x0, ..) => System(nnn),
            (0x1, ..) => Jump(nnn),
            (0x2, ..) => Call(nnn),
            (0x3, ..) => SkipEqualByte { x, kk },
            (0x4, ..) => SkipNotEqualByte { x, kk },
            (0x5, ..) => SkipEqualRegister { x, y },
            (0x6, ..) => LoadByte { x, kk },
            (0x7, ..) => AddByte { x, kk },
            (0x8, .., 0x0) => Move { x, y },
            (0x8, .., 0x1) => Or { x, y },
            (0x8, .., 0x2) => And { x, y },
            (0x8, .., 0x3) => Xor { x, y },
            (0x8, .., 0x4) => Add { x, y },
            (0x8, .., 0x5) => Sub { x, y },
            (0x8, .., 0x6) => ShiftRight { x },
            (0x8, .., 0x7) => SubNegated { x, y },
            (0x8, .., 0xE) => ShiftLeft { x },
            (0x9, ..) => SkipNotEqualRegister { x, y },
            (0xA, ..) => LoadIndex(nnn),
            (0xB, ..) => JumpOffset(nnn),
            (0xC, ..) => Random { x, kk },
            (0xD, ..) => Draw { x, y, n },
            (0xE, _, 0x9, 0xE) => SkipPressed { x },
            (0xE, _, 0xA, 0x1) => SkipNotPressed { x },
            (0xF, _, 0x0, 0x7) => LoadDelay { x },
            (0xF, _, 0x0, 0xA) => WaitKey { x },
            (0xF, _, 0x1, 0x5) => SetDelay { x },
            (0xF, _, 0x1, 0x8) => SetSound { x },
            (0xF, _, 0x1, 0xE) => AddIndex { x },
            (0xF, _, 0x2, 0x9) => SmallGlyph { x },
            (0xF, _, 0x3, 0x0) => LargeGlyph { x },
            (0xF, _, 0x3, 0x3) => Bcd { x },
            (0xF, _, 0x5, 0x5) => StoreRegisters { x },
            (0xF, _, 0x6, 0x5) => LoadRegisters { x },
            (0xF, _, 0x7, 0x5) => StoreRpl { x },
            (0xF, _, 0x8, 0x5) => LoadRpl { x },
            _ => Unknown(word),
        }
    }
}

impl From<u16> for Operation {
    fn from(word: u16) -> Self {
        Operation::decode(&Instruction::decode(word))
    }
}

/// Conventional assembler mnemonics
impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Operation::*;

        match *self {
            Exit(n) => write!(f, "EXIT {}", n),
            ScrollDown(n) => write!(f, "SCD {}", n),
            Clear => write!(f, "CLS"),
            Return => write!(f, "RET"),
            ScrollRight => write!(f, "SCR"),
            ScrollLeft => write!(f, "SCL"),
            Halt => write!(f, "EXIT"),
            LowRes => write!(f, "LOW"),
            HighRes => write!(f, "HIGH"),
            System(nnn) => write!(f, "SYS {:#05X}", nnn),
            Jump(nnn) => write!(f, "JP {:#05X}", nnn),
            Call(nnn) => write!(f, "CALL {:#05X}", nnn),
            SkipEqualByte { x, kk } => write!(f, "SE V{:X}, {:#04X}", x, kk),
            SkipNotEqualByte { x, kk } => write!(f, "SNE V{:X}, {:#04X}", x, kk),
            SkipEqualRegister { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadByte { x, kk } => write!(f, "LD V{:X}, {:#04X}", x, kk),
            AddByte { x, kk } => write!(f, "ADD V{:X}, {:#04X}", x, kk),
            Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            Add { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight { x } => write!(f, "SHR V{:X}", x),
            SubNegated { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft { x } => write!(f, "SHL V{:X}", x),
            SkipNotEqualRegister { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadIndex(nnn) => write!(f, "LD I, {:#05X}", nnn),
            JumpOffset(nnn) => write!(f, "JP V0, {:#05X}", nnn),
            Random { x, kk } => write!(f, "RND V{:X}, {:#04X}", x, kk),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipPressed { x } => write!(f, "SKP V{:X}", x),
            SkipNotPressed { x } => write!(f, "SKNP V{:X}", x),
            LoadDelay { x } => write!(f, "LD V{:X}, DT", x),
            WaitKey { x } => write!(f, "LD V{:X}, K", x),
            SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            SetSound { x } => write!(f, "LD ST, V{:X}", x),
            AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            SmallGlyph { x } => write!(f, "LD F, V{:X}", x),
            LargeGlyph { x } => write!(f, "LD HF, V{:X}", x),
            Bcd { x } => write!(f, "LD B, V{:X}", x),
            StoreRegisters { x } => write!(f, "LD [I], V{:X}", x),
            LoadRegisters { x } => write!(f, "LD V{:X}, [I]", x),
            StoreRpl { x } => write!(f, "LD R, V{:X}", x),
            LoadRpl { x } => write!(f, "LD V{:X}, R", x),
            Unknown(word) => write!(f, "DW {:#06X}", word),
        }
    }
}

#[cfg(test)]
mod test_instruction {
    use super::Operation::*;
    use super::*;

    fn op(word: u16) -> Operation {
        Operation::from(word)
    }

    #[test]
    fn test_control_family() {
        assert_eq!(op(0x0013), Exit(3));
        assert_eq!(op(0x0010), Exit(0));
        assert_eq!(op(0x00C5), ScrollDown(5));
        assert_eq!(op(0x00E0), Clear);
        assert_eq!(op(0x00EE), Return);
        assert_eq!(op(0x00FB), ScrollRight);
        assert_eq!(op(0x00FC), ScrollLeft);
        assert_eq!(op(0x00FD), Halt);
        assert_eq!(op(0x00FE), LowRes);
        assert_eq!(op(0x00FF), HighRes);
        assert_eq!(op(0x0ABC), System(0xABC));
        assert_eq!(op(0x00E1), System(0x0E1));
    }

    #[test]
    fn test_flow_family() {
        assert_eq!(op(0x1ABC), Jump(0xABC));
        assert_eq!(op(0x2123), Call(0x123));
        assert_eq!(op(0xBABC), JumpOffset(0xABC));
        assert_eq!(op(0x3111), SkipEqualByte { x: 1, kk: 0x11 });
        assert_eq!(op(0x4111), SkipNotEqualByte { x: 1, kk: 0x11 });
        assert_eq!(op(0x5120), SkipEqualRegister { x: 1, y: 2 });
        assert_eq!(op(0x9120), SkipNotEqualRegister { x: 1, y: 2 });
        assert_eq!(op(0x5121), SkipEqualRegister { x: 1, y: 2 });
        assert_eq!(op(0x912F), SkipNotEqualRegister { x: 1, y: 2 });
    }

    #[test]
    fn test_alu_family() {
        assert_eq!(op(0x6122), LoadByte { x: 1, kk: 0x22 });
        assert_eq!(op(0x7122), AddByte { x: 1, kk: 0x22 });
        assert_eq!(op(0x8120), Move { x: 1, y: 2 });
        assert_eq!(op(0x8121), Or { x: 1, y: 2 });
        assert_eq!(op(0x8122), And { x: 1, y: 2 });
        assert_eq!(op(0x8123), Xor { x: 1, y: 2 });
        assert_eq!(op(0x8124), Add { x: 1, y: 2 });
        assert_eq!(op(0x8125), Sub { x: 1, y: 2 });
        assert_eq!(op(0x8126), ShiftRight { x: 1 });
        assert_eq!(op(0x8127), SubNegated { x: 1, y: 2 });
        assert_eq!(op(0x812E), ShiftLeft { x: 1 });
    }

    #[test]
    fn test_misc_family() {
        assert_eq!(op(0xAABC), LoadIndex(0xABC));
        assert_eq!(op(0xC10F), Random { x: 1, kk: 0x0F });
        assert_eq!(op(0xD125), Draw { x: 1, y: 2, n: 5 });
        assert_eq!(op(0xE19E), SkipPressed { x: 1 });
        assert_eq!(op(0xE1A1), SkipNotPressed { x: 1 });
        assert_eq!(op(0xF107), LoadDelay { x: 1 });
        assert_eq!(op(0xF10A), WaitKey { x: 1 });
        assert_eq!(op(0xF115), SetDelay { x: 1 });
        assert_eq!(op(0xF118), SetSound { x: 1 });
        assert_eq!(op(0xF11E), AddIndex { x: 1 });
        assert_eq!(op(0xF129), SmallGlyph { x: 1 });
        assert_eq!(op(0xF130), LargeGlyph { x: 1 });
        assert_eq!(op(0xF133), Bcd { x: 1 });
        assert_eq!(op(0xF155), StoreRegisters { x: 1 });
        assert_eq!(op(0xF165), LoadRegisters { x: 1 });
        assert_eq!(op(0xF175), StoreRpl { x: 1 });
        assert_eq!(op(0xF185), LoadRpl { x: 1 });
    }

    #[test]
    fn test_unmapped_words() {
        for word in &[0x812F, 0x8128, 0xE1FF, 0xF1FF, 0xF100] {
            assert_eq!(op(*word), Unknown(*word));
        }
    }

    #[test]
    fn test_decode_is_deterministic() {
        for word in 0..=u16::MAX {
            assert_eq!(op(word), op(word));
        }
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(op(0x00E0).to_string(), "CLS");
        assert_eq!(op(0x1ABC).to_string(), "JP 0xABC");
        assert_eq!(op(0x6A05).to_string(), "LD VA, 0x05");
        assert_eq!(op(0xD125).to_string(), "DRW V1, V2, 5");
        assert_eq!(op(0xF20A).to_string(), "LD V2, K");
        assert_eq!(op(0xFFFF).to_string(), "DW 0xFFFF");
    }
}
