//! # instruction set
//!
//! Each instruction word is four nibbles, N1 N2 N3 N4. N1 picks the family;
//! families 0, 8, E and F pick the operation from the low byte or N4. There
//! is no generic operand field: each opcode pulls its own operands out.
//!
//! Family 0 only looks at the low byte, and 5XYN/9XYN ignore N, so e.g.
//! 0x01E0 still clears the screen and 0x5121 still compares V1 with V2.
//!
//! Decoding is a single match on a normalised key, so anything the machine
//! doesn't know about falls into one arm and becomes `Unknown`.

/// V register index, 0x0-0xf
pub type Reg = usize;

/// A decoded instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump(u16),
    /// 2NNN
    Call(u16),
    /// 3XNN
    SkipIfEqConst(Reg, u8),
    /// 4XNN
    SkipIfNeConst(Reg, u8),
    /// 5XY0
    SkipIfEqReg(Reg, Reg),
    /// 6XNN
    LoadConst(Reg, u8),
    /// 7XNN
    AddConst(Reg, u8),
    /// 8XY0
    Move(Reg, Reg),
    /// 8XY1
    Or(Reg, Reg),
    /// 8XY2
    And(Reg, Reg),
    /// 8XY3
    Xor(Reg, Reg),
    /// 8XY4
    AddReg(Reg, Reg),
    /// 8XY5
    Sub(Reg, Reg),
    /// 8XY6
    ShiftRight(Reg),
    /// 8XY7
    SubReversed(Reg, Reg),
    /// 8XYE
    ShiftLeft(Reg),
    /// 9XY0
    SkipIfNeReg(Reg, Reg),
    /// ANNN
    LoadIndex(u16),
    /// BNNN
    JumpOffset(u16),
    /// CXNN
    Random(Reg, u8),
    /// DXYN
    Draw(Reg, Reg, u8),
    /// FX1E
    AddIndex(Reg),
    /// FX29
    LoadGlyph(Reg),
    /// FX33
    StoreBcd(Reg),
    /// FX55
    StoreRegisters(Reg),
    /// FX65
    LoadRegisters(Reg),
    /// timer and keypad instructions, serviced by the host
    Peripheral(PeripheralOp),
    /// anything else; executes as a no-op
    Unknown(u16),
}

/// Instructions that need something outside the machine state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeripheralOp {
    /// EX9E
    SkipIfKeyDown(Reg),
    /// EXA1
    SkipIfKeyUp(Reg),
    /// FX07
    ReadDelayTimer(Reg),
    /// FX0A
    WaitForKey(Reg),
    /// FX15
    SetDelayTimer(Reg),
    /// FX18
    SetSoundTimer(Reg),
}

impl Instruction {
    pub fn decode(word: u16) -> Instruction {
        use Instruction::*;
        use PeripheralOp::*;

        let x = ((word & 0x0f00) >> 8) as Reg;
        let y = ((word & 0x00f0) >> 4) as Reg;
        let n = (word & 0x000f) as u8;
        let nn = (word & 0x00ff) as u8;
        let nnn = word & 0x0fff;

        match ((word & 0xf000) >> 12, n, nn) {
            (0x0, _, 0xe0) => ClearScreen,
            (0x0, _, 0xee) => Return,
            (0x1, _, _) => Jump(nnn),
            (0x2, _, _) => Call(nnn),
            (0x3, _, _) => SkipIfEqConst(x, nn),
            (0x4, _, _) => SkipIfNeConst(x, nn),
            (0x5, _, _) => SkipIfEqReg(x, y),
            (0x6, _, _) => LoadConst(x, nn),
            (0x7, _, _) => AddConst(x, nn),
            (0x8, 0x0, _) => Move(x, y),
            (0x8, 0x1, _) => Or(x, y),
            (0x8, 0x2, _) => And(x, y),
            (0x8, 0x3, _) => Xor(x, y),
            (0x8, 0x4, _) => AddReg(x, y),
            (0x8, 0x5, _) => Sub(x, y),
            (0x8, 0x6, _) => ShiftRight(x),
            (0x8, 0x7, _) => SubReversed(x, y),
            (0x8, 0xe, _) => ShiftLeft(x),
            (0x9, _, _) => SkipIfNeReg(x, y),
            (0xa, _, _) => LoadIndex(nnn),
            (0xb, _, _) => JumpOffset(nnn),
            (0xc, _, _) => Random(x, nn),
            (0xd, _, _) => Draw(x, y, n),
            (0xe, _, 0x9e) => Peripheral(SkipIfKeyDown(x)),
            (0xe, _, 0xa1) => Peripheral(SkipIfKeyUp(x)),
            (0xf, _, 0x07) => Peripheral(ReadDelayTimer(x)),
            (0xf, _, 0x0a) => Peripheral(WaitForKey(x)),
            (0xf, _, 0x15) => Peripheral(SetDelayTimer(x)),
            (0xf, _, 0x18) => Peripheral(SetSoundTimer(x)),
            (0xf, _, 0x1e) => AddIndex(x),
            (0xf, _, 0x29) => LoadGlyph(x),
            (0xf, _, 0x33) => StoreBcd(x),
            (0xf, _, 0x55) => StoreRegisters(x),
            (0xf, _, 0x65) => LoadRegisters(x),
            _ => Unknown(word),
        }
    }
}

impl From<u16> for Instruction {
    fn from(word: u16) -> Self {
        Instruction::decode(word)
    }
}

#[cfg(test)]
mod tests {
    use super::Instruction::*;
    use super::PeripheralOp::*;
    use super::*;

    #[test]
    fn test_decode_system() {
        assert_eq!(Instruction::decode(0x00e0), ClearScreen);
        assert_eq!(Instruction::decode(0x00ee), Return);
        // 0NNN machine code calls aren't supported
        assert_eq!(Instruction::decode(0x0123), Unknown(0x0123));
        assert_eq!(Instruction::decode(0x01e0), ClearScreen);
        assert_eq!(Instruction::decode(0x0fee), Return);
    }

    #[test]
    fn test_decode_operands() {
        assert_eq!(Instruction::decode(0x1abc), Jump(0xabc));
        assert_eq!(Instruction::decode(0x2def), Call(0xdef));
        assert_eq!(Instruction::decode(0x3a42), SkipIfEqConst(0xa, 0x42));
        assert_eq!(Instruction::decode(0x4b42), SkipIfNeConst(0xb, 0x42));
        assert_eq!(Instruction::decode(0x5120), SkipIfEqReg(1, 2));
        assert_eq!(Instruction::decode(0x6cff), LoadConst(0xc, 0xff));
        assert_eq!(Instruction::decode(0x7d01), AddConst(0xd, 0x01));
        assert_eq!(Instruction::decode(0x9ef0), SkipIfNeReg(0xe, 0xf));
        assert_eq!(Instruction::decode(0xa123), LoadIndex(0x123));
        assert_eq!(Instruction::decode(0xbfff), JumpOffset(0xfff));
        assert_eq!(Instruction::decode(0xc30f), Random(3, 0x0f));
        assert_eq!(Instruction::decode(0xd12f), Draw(1, 2, 0xf));
    }

    #[test]
    fn test_decode_alu() {
        assert_eq!(Instruction::decode(0x8120), Move(1, 2));
        assert_eq!(Instruction::decode(0x8121), Or(1, 2));
        assert_eq!(Instruction::decode(0x8122), And(1, 2));
        assert_eq!(Instruction::decode(0x8123), Xor(1, 2));
        assert_eq!(Instruction::decode(0x8124), AddReg(1, 2));
        assert_eq!(Instruction::decode(0x8125), Sub(1, 2));
        assert_eq!(Instruction::decode(0x8126), ShiftRight(1));
        assert_eq!(Instruction::decode(0x8127), SubReversed(1, 2));
        assert_eq!(Instruction::decode(0x812e), ShiftLeft(1));
        assert_eq!(Instruction::decode(0x8128), Unknown(0x8128));
        assert_eq!(Instruction::decode(0x812f), Unknown(0x812f));
    }

    #[test]
    fn test_decode_misc() {
        assert_eq!(Instruction::decode(0xe59e), Peripheral(SkipIfKeyDown(5)));
        assert_eq!(Instruction::decode(0xe5a1), Peripheral(SkipIfKeyUp(5)));
        assert_eq!(Instruction::decode(0xf607), Peripheral(ReadDelayTimer(6)));
        assert_eq!(Instruction::decode(0xf60a), Peripheral(WaitForKey(6)));
        assert_eq!(Instruction::decode(0xf615), Peripheral(SetDelayTimer(6)));
        assert_eq!(Instruction::decode(0xf618), Peripheral(SetSoundTimer(6)));
        assert_eq!(Instruction::decode(0xf71e), AddIndex(7));
        assert_eq!(Instruction::decode(0xf729), LoadGlyph(7));
        assert_eq!(Instruction::decode(0xf733), StoreBcd(7));
        assert_eq!(Instruction::decode(0xf755), StoreRegisters(7));
        assert_eq!(Instruction::decode(0xf765), LoadRegisters(7));
        assert_eq!(Instruction::decode(0xf7ff), Unknown(0xf7ff));
        assert_eq!(Instruction::decode(0xe500), Unknown(0xe500));
    }

    #[test]
    fn test_decode_ignores_low_nibble_of_register_compares() {
        assert_eq!(Instruction::decode(0x5121), SkipIfEqReg(1, 2));
        assert_eq!(Instruction::decode(0x912f), SkipIfNeReg(1, 2));
        // ...but the F family wants an exact low byte
        assert_eq!(Instruction::decode(0xf734), Unknown(0xf734));
    }
}
