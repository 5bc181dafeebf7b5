//! # interpreter
//!
//! One call to [`Chip8Interpreter::step`] is one fetch/decode/execute cycle:
//!
//!  1. fetch the big-endian word at PC
//!  2. PC += 2, before anything else happens; jumps overwrite this value
//!  3. decode into an [`Instruction`]
//!  4. run the matching handler against the [`MachineState`]
//!
//! Handlers are plain functions over `&mut MachineState`. A handler that
//! fails does so before touching anything, and `step` then winds PC back, so
//! a failed step leaves the machine as it found it.
//!
//! Flags, for the record:
//!  * 8XY4/8XY5/8XY7 compute VF from the operands as they were before the
//!    instruction and write it after the result, so VF wins when X is F
//!  * 8XY6/8XYE write VF first and then shift VX, so shifting VF itself
//!    shifts the flag
//!  * DXYN clears VF before drawing anything
use crate::display::{Framebuffer, BLANK_FRAME, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::error::Chip8Error;
use crate::instruction::{Instruction, PeripheralOp, Reg};
use crate::memory::MemoryMap;
use crate::peripherals::{Peripherals, Unwired};
use crate::state::{MachineConfig, MachineState, FLAG, STACK_DEPTH};
use log::{debug, trace};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub struct Chip8Interpreter<P: Peripherals = Unwired> {
    state: MachineState,
    rng: SmallRng,
    peripherals: Option<P>,
    cycles: u64,
}

impl Chip8Interpreter<Unwired> {
    /// an interpreter with no timers or keypad; those instructions are no-ops
    pub fn new(state: MachineState, config: &MachineConfig) -> Self {
        Chip8Interpreter::build(state, config, None)
    }

    /// fresh machine running `image`
    pub fn load(image: &[u8], config: &MachineConfig) -> Result<Self, Chip8Error> {
        Ok(Chip8Interpreter::new(
            MachineState::with_program(image, config)?,
            config,
        ))
    }
}

impl<P: Peripherals> Chip8Interpreter<P> {
    pub fn with_peripherals(state: MachineState, config: &MachineConfig, peripherals: P) -> Self {
        Chip8Interpreter::build(state, config, Some(peripherals))
    }

    fn build(state: MachineState, config: &MachineConfig, peripherals: Option<P>) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Chip8Interpreter {
            state,
            rng,
            peripherals,
            cycles: 0,
        }
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MachineState {
        &mut self.state
    }

    /// what's on the screen right now
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.state.display
    }

    pub fn peripherals_mut(&mut self) -> Option<&mut P> {
        self.peripherals.as_mut()
    }

    /// how many steps have completed successfully
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// run one fetch/decode/execute cycle, returning what was executed
    pub fn step(&mut self) -> Result<Instruction, Chip8Error> {
        let pc = self.state.program_counter;
        let word = self
            .state
            .memory
            .get_word(pc)
            .map_err(|_| Chip8Error::ProgramCounterOutOfBounds { address: pc })?;
        self.state.program_counter = pc.wrapping_add(2);

        let instruction = Instruction::decode(word);
        trace!("0x{:03x}: {:04x} {:?}", pc, word, instruction);
        if let Err(e) = self.execute(instruction) {
            self.state.program_counter = pc;
            return Err(e);
        }
        self.cycles += 1;
        Ok(instruction)
    }

    /// run until `max_steps` have executed or a step fails
    pub fn run(&mut self, max_steps: u64) -> Result<(), Chip8Error> {
        for _ in 0..max_steps {
            self.step()?;
        }
        Ok(())
    }

    /// execute a single instruction against the current state, as if it had
    /// just been fetched
    pub fn execute(&mut self, instruction: Instruction) -> Result<(), Chip8Error> {
        use Instruction::*;

        let state = &mut self.state;
        match instruction {
            ClearScreen => clear_screen(state),
            Return => return_from(state)?,
            Jump(addr) => state.program_counter = addr,
            Call(addr) => call(state, addr)?,
            SkipIfEqConst(x, nn) => skip_if(&mut state.program_counter, state.registers[x] == nn),
            SkipIfNeConst(x, nn) => skip_if(&mut state.program_counter, state.registers[x] != nn),
            SkipIfEqReg(x, y) => {
                skip_if(&mut state.program_counter, state.registers[x] == state.registers[y])
            }
            LoadConst(x, nn) => state.registers[x] = nn,
            AddConst(x, nn) => state.registers[x] = state.registers[x].wrapping_add(nn),
            Move(x, y) => state.registers[x] = state.registers[y],
            Or(x, y) => state.registers[x] |= state.registers[y],
            And(x, y) => state.registers[x] &= state.registers[y],
            Xor(x, y) => state.registers[x] ^= state.registers[y],
            AddReg(x, y) => add_with_carry(state, x, y),
            Sub(x, y) => subtract(state, x, x, y),
            ShiftRight(x) => shift_right(state, x),
            SubReversed(x, y) => subtract(state, x, y, x),
            ShiftLeft(x) => shift_left(state, x),
            SkipIfNeReg(x, y) => {
                skip_if(&mut state.program_counter, state.registers[x] != state.registers[y])
            }
            LoadIndex(addr) => state.index = addr,
            JumpOffset(addr) => state.program_counter = addr + state.registers[0] as u16,
            Random(x, nn) => state.registers[x] = self.rng.gen::<u8>() & nn,
            Draw(x, y, n) => draw(state, x, y, n)?,
            AddIndex(x) => state.index = state.index.wrapping_add(state.registers[x] as u16),
            LoadGlyph(x) => load_glyph(state, x),
            StoreBcd(x) => store_bcd(state, x)?,
            StoreRegisters(x) => store_registers(state, x)?,
            LoadRegisters(x) => load_registers(state, x)?,
            Peripheral(op) => self.service(op)?,
            Unknown(word) => trace!("ignoring unknown instruction {:04x}", word),
        }
        Ok(())
    }

    /// the one place timer and keypad instructions go
    fn service(&mut self, op: PeripheralOp) -> Result<(), Chip8Error> {
        use PeripheralOp::*;

        let p = match self.peripherals.as_mut() {
            Some(p) => p,
            None => {
                debug!("no peripherals attached, ignoring {:?}", op);
                return Ok(());
            }
        };
        let state = &mut self.state;
        match op {
            SkipIfKeyDown(x) => {
                let down = p.is_key_down(state.registers[x] & 0xf)?;
                skip_if(&mut state.program_counter, down);
            }
            SkipIfKeyUp(x) => {
                let down = p.is_key_down(state.registers[x] & 0xf)?;
                skip_if(&mut state.program_counter, !down);
            }
            ReadDelayTimer(x) => state.registers[x] = p.delay_timer(),
            WaitForKey(x) => match p.take_key_press()? {
                Some(key) => state.registers[x] = key,
                // go round again until something is pressed
                None => state.program_counter = state.program_counter.wrapping_sub(2),
            },
            SetDelayTimer(x) => p.set_delay_timer(state.registers[x]),
            SetSoundTimer(x) => p.set_sound_timer(state.registers[x]),
        }
        Ok(())
    }
}

fn clear_screen(state: &mut MachineState) {
    state.display = BLANK_FRAME;
}

fn return_from(state: &mut MachineState) -> Result<(), Chip8Error> {
    if state.stack_pointer == 0 {
        return Err(Chip8Error::StackUnderflow);
    }
    state.stack_pointer -= 1;
    state.program_counter = state.call_stack[state.stack_pointer];
    Ok(())
}

fn call(state: &mut MachineState, addr: u16) -> Result<(), Chip8Error> {
    if state.stack_pointer >= STACK_DEPTH {
        return Err(Chip8Error::StackOverflow { address: addr });
    }
    state.call_stack[state.stack_pointer] = state.program_counter;
    state.stack_pointer += 1;
    state.program_counter = addr;
    Ok(())
}

fn skip_if(program_counter: &mut u16, condition: bool) {
    if condition {
        *program_counter = program_counter.wrapping_add(2);
    }
}

fn add_with_carry(state: &mut MachineState, x: Reg, y: Reg) {
    let sum = state.registers[x] as u16 + state.registers[y] as u16;
    state.registers[x] = sum as u8;
    state.registers[FLAG] = (sum > 0xff) as u8;
}

/// VX = VA - VB; VF = 1 when VA > VB, both read before VX is written
fn subtract(state: &mut MachineState, x: Reg, a: Reg, b: Reg) {
    let (va, vb) = (state.registers[a], state.registers[b]);
    state.registers[x] = va.wrapping_sub(vb);
    state.registers[FLAG] = (va > vb) as u8;
}

fn shift_right(state: &mut MachineState, x: Reg) {
    state.registers[FLAG] = state.registers[x] & 0x01;
    state.registers[x] >>= 1;
}

fn shift_left(state: &mut MachineState, x: Reg) {
    state.registers[FLAG] = state.registers[x] >> 7;
    state.registers[x] <<= 1;
}

/// XOR an 8xN sprite from memory[I] onto the screen at (VX, VY), clipping
/// at the right and bottom edges. Whenever a pixel comes out unlit, whether
/// a set bit hit a lit pixel or a clear bit landed on an unlit one, VF is
/// set.
fn draw(state: &mut MachineState, x: Reg, y: Reg, n: u8) -> Result<(), Chip8Error> {
    let start_x = state.registers[x] as usize % DISPLAY_WIDTH;
    let start_y = state.registers[y] as usize % DISPLAY_HEIGHT;
    let rows = (n as usize).min(DISPLAY_HEIGHT - start_y);
    let columns = 8usize.min(DISPLAY_WIDTH - start_x);

    let sprite = state.memory.get_ro_slice(state.index, rows)?;
    state.registers[FLAG] = 0;
    for (r, &byte) in sprite.iter().enumerate() {
        let row = &mut state.display[start_y + r];
        for c in 0..columns {
            let bit = (byte >> (7 - c)) & 1 == 1;
            let pixel = &mut row[start_x + c];
            if bit ^ *pixel {
                *pixel = true;
            } else {
                *pixel = false;
                state.registers[FLAG] = 1;
            }
        }
    }
    Ok(())
}

fn load_glyph(state: &mut MachineState, x: Reg) {
    match state.memory.font_glyph_addr(state.registers[x]) {
        Some(addr) => state.index = addr,
        None => trace!("no font loaded, ignoring glyph lookup"),
    }
}

fn store_bcd(state: &mut MachineState, x: Reg) -> Result<(), Chip8Error> {
    let v = state.registers[x];
    state
        .memory
        .write(&[v / 100, (v / 10) % 10, v % 10], state.index)
}

fn store_registers(state: &mut MachineState, x: Reg) -> Result<(), Chip8Error> {
    let len = x + 1;
    state.memory.write(&state.registers[..len], state.index)?;
    state.index = state.index.wrapping_add(len as u16);
    Ok(())
}

fn load_registers(state: &mut MachineState, x: Reg) -> Result<(), Chip8Error> {
    let len = x + 1;
    let bytes = state.memory.get_ro_slice(state.index, len)?;
    state.registers[..len].copy_from_slice(bytes);
    state.index = state.index.wrapping_add(len as u16);
    Ok(())
}
