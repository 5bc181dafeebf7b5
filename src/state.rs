use crate::display::{Framebuffer, BLANK_FRAME};
use crate::error::Chip8Error;
use crate::memory::{Chip8MemoryMap, CHIP8_PROGRAM_ADDR};
use std::io;

/// number of V registers
pub const REGISTER_COUNT: usize = 16;

/// how many return addresses the call stack holds
pub const STACK_DEPTH: usize = 16;

/// VF, the flag register
pub const FLAG: usize = 0xf;

/// How to build a fresh machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MachineConfig {
    /// bake the hex font into the reserved area so FX29 has something to
    /// point at
    pub load_font: bool,
    /// fixed seed for CXNN; `None` seeds from the OS
    pub seed: Option<u64>,
}

/// Everything a CHIP-8 program can see. No behaviour lives here beyond
/// construction; the interpreter owns one of these and threads it through
/// every instruction.
pub struct MachineState {
    pub memory: Chip8MemoryMap,
    pub registers: [u8; REGISTER_COUNT],
    pub index: u16,
    pub program_counter: u16,
    pub call_stack: [u16; STACK_DEPTH],
    /// next free slot in `call_stack`; 0 when empty
    pub stack_pointer: usize,
    pub display: Framebuffer,
}

impl MachineState {
    /// zeroed machine with nothing loaded; PC already points at 0x200
    pub fn new(config: &MachineConfig) -> Result<Self, Chip8Error> {
        let memory = if config.load_font {
            Chip8MemoryMap::with_font()?
        } else {
            Chip8MemoryMap::new()
        };
        Ok(MachineState {
            memory,
            registers: [0; REGISTER_COUNT],
            index: 0,
            program_counter: CHIP8_PROGRAM_ADDR,
            call_stack: [0; STACK_DEPTH],
            stack_pointer: 0,
            display: BLANK_FRAME,
        })
    }

    /// machine with `image` copied in at 0x200
    pub fn with_program(image: &[u8], config: &MachineConfig) -> Result<Self, Chip8Error> {
        let mut state = Self::new(config)?;
        state.memory.load_bytes(image)?;
        Ok(state)
    }

    /// machine with the whole of `reader` copied in at 0x200
    pub fn from_reader(reader: &mut impl io::Read, config: &MachineConfig) -> Result<Self, Chip8Error> {
        let mut state = Self::new(config)?;
        state.memory.load_program(reader)?;
        Ok(state)
    }
}
