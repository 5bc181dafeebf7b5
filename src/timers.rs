/// how often the host is expected to call [`Timers::tick`]
pub const TIMER_HZ: u32 = 60;

/// The delay and sound counters. Both count down to zero, one per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Timers::default()
    }

    /// count both timers down by one; returns whether the tone should be
    /// sounding afterwards
    pub fn tick(&mut self) -> bool {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
        self.sound > 0
    }
}
