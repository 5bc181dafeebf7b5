use crate::error::Chip8Error;
use crossterm::event::{poll, read, Event, KeyCode};
use crossterm::terminal;
use log::warn;
use std::collections::HashMap;
use std::time::Duration;

/// map of characters read from the keyboard to the hex keypad, using the
/// left-hand side of a qwerty keyboard:
///
///   1 2 3 4      1 2 3 C
///   q w e r  =>  4 5 6 D
///   a s d f      7 8 9 E
///   z x c v      A 0 B F
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// reads keypresses
pub trait Input {
    /// get a list of all the mapped keys that have been pressed recently,
    /// without flushing them from the buffer
    fn peek_keys(&mut self) -> Result<&[u8], Chip8Error>;

    /// flush all the keypresses from the buffer
    fn flush_keys(&mut self) -> Result<(), Chip8Error>;

    /// has the user asked to stop the machine
    fn quit_requested(&self) -> bool {
        false
    }
}

/// keyboard Input via crossterm; puts the terminal into raw mode for as long
/// as it lives
pub struct StdinInput {
    buffer: Vec<u8>,
    keymap: HashMap<char, u8>,
    quit: bool,
}

impl StdinInput {
    pub fn new() -> Result<Self, Chip8Error> {
        terminal::enable_raw_mode()?;
        Ok(StdinInput {
            buffer: Vec::new(),
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            quit: false,
        })
    }

    fn read_stdin(&mut self) -> Result<(), Chip8Error> {
        while poll(Duration::from_millis(0))? {
            if let Event::Key(evt) = read()? {
                match evt.code {
                    KeyCode::Char(key) => match self.keymap.get(&key.to_ascii_lowercase()) {
                        Some(mapped_key) => {
                            if !self.buffer.contains(mapped_key) {
                                self.buffer.push(*mapped_key);
                            }
                        }
                        None => warn!("can't map {:?} to a keypad key", key),
                    },
                    KeyCode::Esc => self.quit = true,
                    other => warn!("ignoring key {:?}", other),
                }
            }
        }
        Ok(())
    }
}

impl Drop for StdinInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for StdinInput {
    fn peek_keys(&mut self) -> Result<&[u8], Chip8Error> {
        self.read_stdin()?;
        Ok(self.buffer.as_slice())
    }

    fn flush_keys(&mut self) -> Result<(), Chip8Error> {
        self.read_stdin()?;
        self.buffer.clear();
        Ok(())
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

/// dummy Input implementation for testing
pub struct DummyInput {
    bytes: Vec<u8>,
}

impl DummyInput {
    pub fn new(keys: &[u8]) -> Self {
        DummyInput {
            bytes: Vec::from(keys),
        }
    }

    /// press some more keys
    pub fn press(&mut self, key: u8) {
        self.bytes.push(key);
    }
}

impl Input for DummyInput {
    fn peek_keys(&mut self) -> Result<&[u8], Chip8Error> {
        Ok(self.bytes.as_slice())
    }

    fn flush_keys(&mut self) -> Result<(), Chip8Error> {
        self.bytes.clear();
        Ok(())
    }
}
