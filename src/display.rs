use crate::error::Chip8Error;
use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// The machine's framebuffer: 32 rows of 64 pixels, row-major, `true` is lit.
pub type Framebuffer = [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// An unlit framebuffer.
pub const BLANK_FRAME: Framebuffer = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// Display is used by the host to put the framebuffer on a screen. It should
/// abstract the implementation details, so a variety of kinds of screen would
/// work; the interpreter itself never calls it.
pub trait Display {
    /// draw a whole frame
    fn draw(&mut self, frame: &Framebuffer) -> Result<(), Chip8Error>;
}

fn display_err(e: io::Error) -> Chip8Error {
    Chip8Error::Display(e.to_string())
}

/// expand one colour of a frame into x, y float coords, suitable for
/// rendering with TUI. y runs downward from 0, so it is negated
fn points_from_frame(frame: &Framebuffer, lit: bool) -> Vec<(f64, f64)> {
    frame
        .iter()
        .enumerate()
        .flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(move |(_, px)| **px == lit)
                .map(move |(x, _)| (x as f64, -(y as f64)))
        })
        .collect()
}

/// monochrome display in a terminal, rendered using TUI and crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl MonoTermDisplay {
    pub fn new() -> Result<MonoTermDisplay, Chip8Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend).map_err(display_err)?;
        terminal.clear().map_err(display_err)?;
        terminal.hide_cursor().map_err(display_err)?;
        Ok(MonoTermDisplay { terminal })
    }
}

impl Drop for MonoTermDisplay {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, frame: &Framebuffer) -> Result<(), Chip8Error> {
        let unlit = points_from_frame(frame, false);
        let lit = points_from_frame(frame, true);

        // for now this assumes a 1:1 ratio between terminal, chip8 and the
        // internal TUI canvas
        self.terminal
            .draw(|f| {
                let size = Rect::new(0, 0, 2 + DISPLAY_WIDTH as u16, 2 + DISPLAY_HEIGHT as u16);

                let canvas = Canvas::default()
                    .block(
                        Block::default()
                            .title("CHIP-8")
                            .borders(Borders::ALL)
                            .style(Style::default().bg(Color::Black)),
                    )
                    .x_bounds([0.0, (DISPLAY_WIDTH - 1) as f64])
                    .y_bounds([-((DISPLAY_HEIGHT - 1) as f64), 0.0])
                    .marker(Marker::Block)
                    .paint(|ctx| {
                        ctx.draw(&Points {
                            coords: &unlit,
                            color: Color::Black,
                        });
                        ctx.draw(&Points {
                            coords: &lit,
                            color: Color::White,
                        });
                    });
                f.render_widget(canvas, size);
            })
            .map_err(display_err)?;
        Ok(())
    }
}

/// useful for testing non-display routines; remembers the last frame
#[derive(Default)]
pub struct DummyDisplay {
    pub frames: usize,
    pub last_frame: Option<Framebuffer>,
}

impl DummyDisplay {
    pub fn new() -> DummyDisplay {
        DummyDisplay::default()
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, frame: &Framebuffer) -> Result<(), Chip8Error> {
        self.frames += 1;
        self.last_frame = Some(*frame);
        Ok(())
    }
}
