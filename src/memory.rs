use crate::error::Chip8Error;
use log::debug;
use std::io;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// Represents the flat address space. Every access is bounds-checked so a
/// misbehaving program turns into an error rather than a panic.
pub trait MemoryMap {
    /// write a chunk of bytes into "RAM"
    fn write(&mut self, data: &[u8], addr: u16) -> Result<(), Chip8Error> {
        self.get_rw_slice(addr, data.len())?.copy_from_slice(data);
        Ok(())
    }

    /// get a single byte
    fn get_byte(&self, addr: u16) -> Result<u8, Chip8Error> {
        Ok(self.get_ro_slice(addr, 1)?[0])
    }

    /// get a big-endian two-byte word (instructions)
    fn get_word(&self, addr: u16) -> Result<u16, Chip8Error> {
        let word = self.get_ro_slice(addr, 2)?;
        Ok(u16::from_be_bytes([word[0], word[1]]))
    }

    /// get a r/w slice of the underlying memory
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8], Chip8Error>;

    /// get a r/o slice of the underlying memory
    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8], Chip8Error>;
}

/// Defines the CHIP-8 memory map, 4K configuration:
///   0x0000-0x01ff  reserved (interpreter area; optionally holds the font)
///   0x0200-0x0fff  program
///
/// The call stack and the display live outside addressable memory, in
/// [`crate::state::MachineState`].
pub struct Chip8MemoryMap {
    bytes: Box<[u8]>,
    pub program_addr: u16,
    font_loaded: bool,
}

impl MemoryMap for Chip8MemoryMap {
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8], Chip8Error> {
        let a = addr as usize;
        let size = self.bytes.len();
        self.bytes
            .get_mut(a..a + len)
            .ok_or(Chip8Error::MemoryOutOfBounds {
                address: a.max(size),
            })
    }

    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8], Chip8Error> {
        let a = addr as usize;
        self.bytes
            .get(a..a + len)
            .ok_or(Chip8Error::MemoryOutOfBounds {
                address: a.max(self.bytes.len()),
            })
    }
}

/// how much RAM we have
pub const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// where the program is loaded
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// the largest program image that fits above the reserved area
pub const CHIP8_MAX_PROGRAM_BYTES: usize = CHIP8_RAM_SIZE_BYTES - CHIP8_PROGRAM_ADDR as usize;

/// where the hex font goes, if it is loaded at all
pub const CHIP8_FONT_ADDR: u16 = 0x050;

/// bytes per font glyph
pub const CHIP8_FONT_GLYPH_BYTES: u16 = 5;

impl Chip8MemoryMap {
    /// zeroed memory; the reserved area below 0x200 is left empty
    pub fn new() -> Self {
        Chip8MemoryMap {
            bytes: vec![0u8; CHIP8_RAM_SIZE_BYTES].into_boxed_slice(),
            program_addr: CHIP8_PROGRAM_ADDR,
            font_loaded: false,
        }
    }

    /// zeroed memory with the hex font baked into the reserved area
    pub fn with_font() -> Result<Self, Chip8Error> {
        let mut mm = Self::new();
        mm.write(&CHIP8_FONT, CHIP8_FONT_ADDR)?;
        mm.font_loaded = true;
        Ok(mm)
    }

    pub fn font_loaded(&self) -> bool {
        self.font_loaded
    }

    /// address of the glyph for the low nibble of `digit`, if there is a font
    pub fn font_glyph_addr(&self, digit: u8) -> Option<u16> {
        self.font_loaded
            .then(|| CHIP8_FONT_ADDR + CHIP8_FONT_GLYPH_BYTES * (digit & 0xf) as u16)
    }

    /// load a CHIP-8 program at 0x200; oversized images are rejected whole
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize, Chip8Error> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        self.load_bytes(&buf)
    }

    /// load a program image that is already in memory
    pub fn load_bytes(&mut self, image: &[u8]) -> Result<usize, Chip8Error> {
        if image.len() > CHIP8_MAX_PROGRAM_BYTES {
            return Err(Chip8Error::RomTooLarge {
                size: image.len(),
                max_size: CHIP8_MAX_PROGRAM_BYTES,
            });
        }
        self.write(image, self.program_addr)?;
        debug!(
            "loaded {} byte program at 0x{:03x}",
            image.len(),
            self.program_addr
        );
        Ok(image.len())
    }
}

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
