use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chip8::display::{Display, DummyDisplay, MonoTermDisplay};
use chip8::input::{DummyInput, Input, StdinInput};
use chip8::interpreter::Chip8Interpreter;
use chip8::peripherals::HostPeripherals;
use chip8::sound::{Mute, SimpleBeep, Sound};
use chip8::state::{MachineConfig, MachineState};
use chip8::timers::TIMER_HZ;
use clap::Parser;
use log::{error, info};

#[derive(Parser)]
#[command(name = "chip8-vm", about = "Run a CHIP-8 program in the terminal")]
struct Cli {
    /// Program image to load at 0x200.
    rom: PathBuf,

    /// Instructions per second.
    #[arg(long, default_value_t = 700)]
    hz: u32,

    /// Stop after this many instructions.
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Seed for the random number instruction.
    #[arg(long)]
    seed: Option<u64>,

    /// Put the hex font in the reserved area so FX29 works.
    #[arg(long)]
    font: bool,

    /// No beeping.
    #[arg(long)]
    mute: bool,

    /// No terminal: no keyboard, no screen, no pacing. Needs --max-cycles.
    #[arg(long, requires = "max_cycles")]
    headless: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    // logs go to stderr, which fights with the TUI; redirect it when using RUST_LOG
    env_logger::init();
    let cli = Cli::parse();

    let config = MachineConfig {
        load_font: cli.font,
        seed: cli.seed,
    };

    // load before touching the terminal so load errors come out readable
    let mut f = File::open(&cli.rom)?;
    let state = MachineState::from_reader(&mut f, &config)?;
    info!("loaded {}", cli.rom.display());

    let (mut display, mut input): (Box<dyn Display>, Box<dyn Input>) = if cli.headless {
        (Box::new(DummyDisplay::new()), Box::new(DummyInput::new(&[])))
    } else {
        (Box::new(MonoTermDisplay::new()?), Box::new(StdinInput::new()?))
    };
    let mut sound: Box<dyn Sound> = if cli.mute || cli.headless {
        Box::new(Mute::new())
    } else {
        Box::new(SimpleBeep::new())
    };

    let peripherals = HostPeripherals::new(input.as_mut(), sound.as_mut());
    let mut vm = Chip8Interpreter::with_peripherals(state, &config, peripherals);

    let step_period = Duration::from_secs_f64(1.0 / cli.hz.max(1) as f64);
    let tick_period = Duration::from_secs_f64(1.0 / TIMER_HZ as f64);
    let mut next_step = Instant::now();
    let mut next_tick = next_step;

    loop {
        if cli.max_cycles.map_or(false, |max| vm.cycles() >= max) {
            break;
        }

        let now = Instant::now();
        if cli.headless || now >= next_tick {
            if let Some(p) = vm.peripherals_mut() {
                p.tick()?;
                if p.quit_requested() {
                    info!("quit requested");
                    break;
                }
            }
            display.draw(vm.framebuffer())?;
            next_tick += tick_period;
        }
        if cli.headless || now >= next_step {
            if let Err(e) = vm.step() {
                error!("stopped at 0x{:03x}: {}", vm.state().program_counter, e);
                return Err(e.into());
            }
            next_step += step_period;
        }

        if !cli.headless {
            spin_sleep::sleep(next_step.min(next_tick).saturating_duration_since(Instant::now()));
        }
    }

    info!("ran {} instructions", vm.cycles());
    if cli.headless {
        let s = vm.state();
        println!("cycles {}", vm.cycles());
        println!("pc     0x{:03x}", s.program_counter);
        println!("i      0x{:03x}", s.index);
        println!("v      {:02x?}", s.registers);
    } else {
        // shove some junk on stdout to stop the cli messing up the last frame
        for _ in 0..2 {
            println!();
        }
    }
    Ok(())
}
