use std::io;
use thiserror::Error;

/// Everything that can go wrong loading or running a CHIP-8 program.
///
/// Load errors are fatal to the host; the rest are raised by a single step
/// and leave the machine state exactly as it was before the failing
/// instruction touched it.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("can't read program image: {0}")]
    Io(#[from] io::Error),

    #[error("program image is {size} bytes, only {max_size} fit above 0x200")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("call stack overflow calling 0x{address:03x}")]
    StackOverflow { address: u16 },

    #[error("call stack underflow: return with no active call")]
    StackUnderflow,

    #[error("program counter 0x{address:04x} is outside memory")]
    ProgramCounterOutOfBounds { address: u16 },

    #[error("memory access at 0x{address:04x} is outside memory")]
    MemoryOutOfBounds { address: usize },

    #[error("display error: {0}")]
    Display(String),

    #[error("sound error: {0}")]
    Sound(String),
}
