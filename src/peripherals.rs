use crate::error::Chip8Error;
use crate::input::Input;
use crate::sound::Sound;
use crate::timers::Timers;
use log::trace;

/// The host side of the timer and keypad instructions. The interpreter routes
/// EX9E, EXA1, FX07, FX0A, FX15 and FX18 through here and nowhere else; with
/// nothing attached those instructions do nothing at all.
pub trait Peripherals {
    fn delay_timer(&self) -> u8;
    fn set_delay_timer(&mut self, value: u8);
    fn set_sound_timer(&mut self, value: u8);

    /// is keypad key `key` (0x0-0xf) held
    fn is_key_down(&mut self, key: u8) -> Result<bool, Chip8Error>;

    /// consume a key press, if there is one waiting
    fn take_key_press(&mut self) -> Result<Option<u8>, Chip8Error>;
}

/// The peripherals of a machine that has none. Can't be constructed; it only
/// exists so an interpreter without peripherals has a type to name.
pub enum Unwired {}

impl Peripherals for Unwired {
    fn delay_timer(&self) -> u8 {
        match *self {}
    }
    fn set_delay_timer(&mut self, _value: u8) {
        match *self {}
    }
    fn set_sound_timer(&mut self, _value: u8) {
        match *self {}
    }
    fn is_key_down(&mut self, _key: u8) -> Result<bool, Chip8Error> {
        match *self {}
    }
    fn take_key_press(&mut self) -> Result<Option<u8>, Chip8Error> {
        match *self {}
    }
}

/// how many timer ticks a key press stays visible to EX9E/EXA1; terminals
/// don't report key releases
const KEY_HOLD_TICKS: u32 = 6;

/// Timers, keyboard and beeper wired together for a real host.
pub struct HostPeripherals<'a> {
    timers: Timers,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
    ticks_since_flush: u32,
}

impl<'a> HostPeripherals<'a> {
    pub fn new(input: &'a mut dyn Input, sound: &'a mut dyn Sound) -> Self {
        HostPeripherals {
            timers: Timers::new(),
            input,
            sound,
            ticks_since_flush: 0,
        }
    }

    pub fn timers(&self) -> Timers {
        self.timers
    }

    /// call at [`crate::timers::TIMER_HZ`]: counts the timers down, drives
    /// the tone, and forgets stale key presses
    pub fn tick(&mut self) -> Result<(), Chip8Error> {
        if self.timers.tick() {
            self.sound.beep()?;
        } else {
            self.sound.stop()?;
        }
        self.ticks_since_flush += 1;
        if self.ticks_since_flush >= KEY_HOLD_TICKS {
            self.input.flush_keys()?;
            self.ticks_since_flush = 0;
        }
        Ok(())
    }

    pub fn quit_requested(&self) -> bool {
        self.input.quit_requested()
    }
}

impl<'a> Peripherals for HostPeripherals<'a> {
    fn delay_timer(&self) -> u8 {
        self.timers.delay
    }

    fn set_delay_timer(&mut self, value: u8) {
        self.timers.delay = value;
    }

    fn set_sound_timer(&mut self, value: u8) {
        self.timers.sound = value;
    }

    fn is_key_down(&mut self, key: u8) -> Result<bool, Chip8Error> {
        Ok(self.input.peek_keys()?.contains(&key))
    }

    fn take_key_press(&mut self) -> Result<Option<u8>, Chip8Error> {
        let key = self.input.peek_keys()?.first().copied();
        if let Some(k) = key {
            trace!("key press 0x{:x}", k);
            self.input.flush_keys()?;
            self.ticks_since_flush = 0;
        }
        Ok(key)
    }
}
