use chip8::display::{BLANK_FRAME, DISPLAY_WIDTH};
use chip8::interpreter::Chip8Interpreter;
use chip8::memory::{MemoryMap, CHIP8_MAX_PROGRAM_BYTES};
use chip8::state::{MachineConfig, MachineState, FLAG};
use chip8::Chip8Error;
use proptest::prelude::*;

fn config() -> MachineConfig {
    MachineConfig {
        seed: Some(1),
        ..MachineConfig::default()
    }
}

fn assemble(program: &[u16]) -> Vec<u8> {
    program.iter().flat_map(|w| w.to_be_bytes()).collect()
}

fn vm(program: &[u16]) -> Chip8Interpreter {
    Chip8Interpreter::load(&assemble(program), &config()).unwrap()
}

#[test]
fn counts_down_in_a_subroutine() -> Result<(), Chip8Error> {
    // 0x200: V0 = 5
    // 0x202: call 0x20a
    // 0x204: skip if V0 == 0
    // 0x206: jump 0x202
    // 0x208: jump 0x208
    // 0x20a: V0 += 0xff (i.e. -1)
    // 0x20c: return
    let mut m = vm(&[0x6005, 0x220a, 0x3000, 0x1202, 0x1208, 0x70ff, 0x00ee]);
    m.run(40)?;
    assert_eq!(m.state().registers[0], 0);
    assert_eq!(m.state().program_counter, 0x208);
    assert_eq!(m.state().stack_pointer, 0);
    Ok(())
}

#[test]
fn draws_a_score_with_the_font() -> Result<(), Chip8Error> {
    // BCD 137 into 0x300, read the digits back, draw the tens digit
    let program = [
        0x6a89, // VA = 137
        0xa300, // I = 0x300
        0xfa33, // BCD VA
        0xf265, // V0..V2 = memory[0x300..0x303]
        0xf129, // I = glyph(V1)
        0x6300, // V3 = 0
        0xd335, // draw 5 rows at (0, 0)
    ];
    let config = MachineConfig {
        load_font: true,
        ..config()
    };
    let mut m = Chip8Interpreter::load(&assemble(&program), &config)?;
    m.run(program.len() as u64)?;
    assert_eq!(m.state().registers[..3], [1, 3, 7]);
    // glyph 3 is F0 10 F0 10 F0
    let rows: Vec<Vec<bool>> = m.framebuffer()[..5]
        .iter()
        .map(|row| row[..4].to_vec())
        .collect();
    assert_eq!(
        rows,
        vec![
            vec![true; 4],
            vec![false, false, false, true],
            vec![true; 4],
            vec![false, false, false, true],
            vec![true; 4],
        ]
    );
    // right half of each glyph row was 0 over 0
    assert_eq!(m.state().registers[FLAG], 1);
    Ok(())
}

#[test]
fn clear_screen_after_drawing() -> Result<(), Chip8Error> {
    let mut m = vm(&[0xa206, 0xd00f, 0x00e0, 0xffff]);
    m.run(2)?;
    assert_ne!(*m.framebuffer(), BLANK_FRAME);
    m.step()?;
    assert_eq!(*m.framebuffer(), BLANK_FRAME);
    Ok(())
}

#[test]
fn full_width_sprite_clips_at_right_edge() -> Result<(), Chip8Error> {
    let mut m = vm(&[0x603e, 0x6100, 0xa208, 0xd011, 0xff00]);
    m.run(4)?;
    let row = m.framebuffer()[0];
    assert_eq!(row[62..], [true, true]);
    assert!(row[..62].iter().all(|p| !p));
    assert!(m.framebuffer()[1].iter().all(|p| !p));
    assert_eq!(row.len(), DISPLAY_WIDTH);
    Ok(())
}

#[test]
fn oversized_image_is_rejected() {
    let image = vec![0u8; CHIP8_MAX_PROGRAM_BYTES + 1];
    assert!(matches!(
        Chip8Interpreter::load(&image, &config()),
        Err(Chip8Error::RomTooLarge { .. })
    ));
}

proptest! {
    #[test]
    fn image_lands_at_0x200(image in prop::collection::vec(any::<u8>(), 0..CHIP8_MAX_PROGRAM_BYTES)) {
        let s = MachineState::with_program(&image, &config()).unwrap();
        prop_assert_eq!(s.memory.get_ro_slice(0x200, image.len()).unwrap(), &image[..]);
        prop_assert_eq!(s.program_counter, 0x200);
    }

    #[test]
    fn random_programs_never_panic(image in prop::collection::vec(any::<u8>(), 0..512)) {
        let mut m = Chip8Interpreter::load(&image, &config()).unwrap();
        for _ in 0..500 {
            let before = m.state().program_counter;
            if m.step().is_err() {
                // failed steps don't move the program counter
                prop_assert_eq!(m.state().program_counter, before);
                break;
            }
        }
        prop_assert!(m.state().stack_pointer <= 16);
    }

    #[test]
    fn add_with_carry(a in any::<u8>(), b in any::<u8>()) {
        let mut m = vm(&[0x6100 | a as u16, 0x6200 | b as u16, 0x8124]);
        m.run(3).unwrap();
        let sum = a as u16 + b as u16;
        prop_assert_eq!(m.state().registers[1], (sum & 0xff) as u8);
        prop_assert_eq!(m.state().registers[FLAG], (sum > 255) as u8);
    }

    #[test]
    fn subtract_with_borrow(a in any::<u8>(), b in any::<u8>()) {
        let mut m = vm(&[0x6100 | a as u16, 0x6200 | b as u16, 0x8125]);
        m.run(3).unwrap();
        prop_assert_eq!(m.state().registers[1], a.wrapping_sub(b));
        prop_assert_eq!(m.state().registers[FLAG], (a > b) as u8);

        let mut m = vm(&[0x6100 | a as u16, 0x6200 | b as u16, 0x8127]);
        m.run(3).unwrap();
        prop_assert_eq!(m.state().registers[1], b.wrapping_sub(a));
        prop_assert_eq!(m.state().registers[FLAG], (b > a) as u8);
    }

    #[test]
    fn spill_and_fill_round_trip(
        regs in prop::array::uniform16(any::<u8>()),
        x in 0u16..16,
        index in 0x300u16..0xf00,
    ) {
        let mut m = vm(&[0xf055 | x << 8, 0xf065 | x << 8]);
        m.state_mut().registers = regs;
        m.state_mut().index = index;
        m.step().unwrap();
        prop_assert_eq!(m.state().index, index + x + 1);

        let mut cleared = regs;
        for r in cleared.iter_mut().take(x as usize + 1) {
            *r = 0;
        }
        m.state_mut().registers = cleared;
        m.state_mut().index = index;
        m.step().unwrap();
        prop_assert_eq!(m.state().registers, regs);
        prop_assert_eq!(m.state().index, index + x + 1);
    }
}
