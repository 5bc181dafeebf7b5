//! A CHIP-8 virtual machine.
//!
//! ## Design
//!
//! * the interpreter is the whole story: one `step()` is one
//!   fetch/decode/execute cycle, and every instruction's arithmetic, flag and
//!   edge-case behaviour is reproduced exactly
//! * machine state is plain data with a single owner (the interpreter),
//!   passed by `&mut` into every instruction handler
//! * decoding produces a tagged `Instruction`; unknown words are a single
//!   variant that executes as a no-op
//! * the host drives everything else: how fast to step, the 60Hz timer tick,
//!   the keyboard, the beeper and putting the framebuffer on a screen. The
//!   timer and keypad instructions reach the host through one trait,
//!   `Peripherals`; without one attached they do nothing
//!
//! Model
//!
//! Host (main.rs)
//!  |-- display, input, sound
//!  |-- peripherals(input, sound, timers)
//!  |-- interpreter(state(config), peripherals, rng(config))
//!  |    |-- instruction set
//!  |    `-- machine state: memory, registers, stack, framebuffer
//!  `-- main loop
//!       |-- interpreter.step() at --hz per second
//!       |-- peripherals.tick() at 60Hz
//!       `-- display.draw(interpreter.framebuffer()) at 60Hz
//!
//! ```
//! use chip8::interpreter::Chip8Interpreter;
//! use chip8::state::MachineConfig;
//!
//! // V1 = 0x2a; skip next if V1 == 0x2a
//! let program = [0x61, 0x2a, 0x31, 0x2a];
//! let mut vm = Chip8Interpreter::load(&program, &MachineConfig::default()).unwrap();
//! vm.run(2).unwrap();
//! assert_eq!(vm.state().registers[1], 0x2a);
//! assert_eq!(vm.state().program_counter, 0x206);
//! ```
pub mod display;
pub mod error;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod memory;
pub mod peripherals;
pub mod sound;
pub mod state;
pub mod timers;

pub use error::Chip8Error;
