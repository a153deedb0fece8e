/// # Opcodes
///
/// Instructions are 16-bit words fetched high byte first. Their fields are:
/// - `[f___]` the family, selecting a broad category of operation
/// - `[_x__]` a register index Vx, or the upper bound of a range V0..=Vx
/// - `[__y_]` a second register index Vy
/// - `[___n]` a 4-bit immediate; sprite height or a sub-operation selector
/// - `[__kk]` an 8-bit immediate; compared with or assigned to Vx, or a sub-operation selector
/// - `[_nnn]` a 12-bit address
///
/// Every word yields every field, whether or not any operation is bound to it.
pub trait Opcode {
    /// The four nibbles, most significant first.
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// `[f___]`
    fn family(&self) -> u8;

    /// `[_x__]`
    fn x(&self) -> u8;

    /// `[__y_]`
    fn y(&self) -> u8;

    /// `[___n]`
    fn n(&self) -> u8;

    /// `[__kk]`
    fn kk(&self) -> u8;

    /// `[_nnn]`
    fn nnn(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (self.family(), self.x(), self.y(), self.n())
    }

    fn family(&self) -> u8 {
        ((self & 0xF000) >> 12) as u8
    }

    fn x(&self) -> u8 {
        ((self & 0x0F00) >> 8) as u8
    }

    fn y(&self) -> u8 {
        ((self & 0x00F0) >> 4) as u8
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn kk(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn nnn(&self) -> u16 {
        self & 0x0FFF
    }
}

/// A decoded instruction word with its addressing fields split out.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub word: u16,
    pub family: u8,
    pub x: u8,
    pub y: u8,
    pub n: u8,
    pub kk: u8,
    pub nnn: u16,
}

impl Instruction {
    pub fn decode(word: u16) -> Self {
        Instruction {
            word,
            family: word.family(),
            x: word.x(),
            y: word.y(),
            n: word.n(),
            kk: word.kk(),
            nnn: word.nnn(),
        }
    }

    /// Register index Vx
    pub fn vx(&self) -> usize {
        self.x as usize
    }

    /// Register index Vy
    pub fn vy(&self) -> usize {
        self.y as usize
    }
}

impl From<u16> for Instruction {
    fn from(word: u16) -> Self {
        Instruction::decode(word)
    }
}

#[cfg(test)]
mod test_opcode {
    use super::*;

    #[test]
    fn test_nibbles() {
        let op: u16 = 0xABCD;
        assert_eq!(op.nibbles(), (0xA, 0xB, 0xC, 0xD));
    }

    #[test]
    fn test_fields() {
        let op: u16 = 0xABCD;
        assert_eq!(op.family(), 0xA);
        assert_eq!(op.x(), 0xB);
        assert_eq!(op.y(), 0xC);
        assert_eq!(op.n(), 0xD);
        assert_eq!(op.kk(), 0xCD);
        assert_eq!(op.nnn(), 0xBCD);
    }

    #[test]
    fn test_decode() {
        let instruction = Instruction::decode(0xD12F);
        assert_eq!(
            instruction,
            Instruction {
                word: 0xD12F,
                family: 0xD,
                x: 0x1,
                y: 0x2,
                n: 0xF,
                kk: 0x2F,
                nnn: 0x12F,
            }
        );
        assert_eq!(instruction.vx(), 1);
        assert_eq!(instruction.vy(), 2);
    }

    #[test]
    fn test_decode_is_total_and_deterministic() {
        for word in 0..=u16::MAX {
            let first = Instruction::from(word);
            let second = Instruction::from(word);
            assert_eq!(first, second);
            // the fields reassemble into the original word
            assert_eq!(
                (u16::from(first.family) << 12) | (u16::from(first.x) << 8) | u16::from(first.kk),
                word
            );
            assert_eq!(first.nnn, word & 0x0FFF);
            assert_eq!(first.kk, (first.y << 4) | first.n);
        }
    }
}
