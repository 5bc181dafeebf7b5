use crate::error::Chip8Error;
use beep::beep;
use log::debug;

/// Something that can make the machine's single tone.
pub trait Sound {
    fn beep(&mut self) -> Result<(), Chip8Error>;
    fn stop(&mut self) -> Result<(), Chip8Error>;
}

const SIMPLEBEEP_PITCH: u16 = 2093; // C

/// PC speaker tone via the `beep` crate. Only talks to the device when the
/// state actually changes, since the host asks every tick.
#[derive(Default)]
pub struct SimpleBeep {
    is_beeping: bool,
}

impl SimpleBeep {
    pub fn new() -> Self {
        SimpleBeep::default()
    }
}

impl Sound for SimpleBeep {
    fn beep(&mut self) -> Result<(), Chip8Error> {
        if !self.is_beeping {
            debug!("beep on");
            beep(SIMPLEBEEP_PITCH).map_err(|e| Chip8Error::Sound(e.to_string()))?;
            self.is_beeping = true;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Chip8Error> {
        if self.is_beeping {
            debug!("beep off");
            beep(0).map_err(|e| Chip8Error::Sound(e.to_string()))?;
            self.is_beeping = false;
        }
        Ok(())
    }
}

/// silence; counts what it was asked to do so tests can check
#[derive(Default)]
pub struct Mute {
    pub beeping: bool,
    pub beeps: usize,
}

impl Mute {
    pub fn new() -> Self {
        Mute::default()
    }
}

impl Sound for Mute {
    fn beep(&mut self) -> Result<(), Chip8Error> {
        if !self.beeping {
            self.beeps += 1;
        }
        self.beeping = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Chip8Error> {
        self.beeping = false;
        Ok(())
    }
}
