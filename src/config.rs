use crate::constants::{HIGH_RES_RATE, LOW_RES_RATE, TIMER_HZ};

/// # Config
/// Timing knobs handed to a `Chip8` at construction.
///
/// The instruction rates are hints for the host driver: the core never sleeps,
/// it only reports how many `step` calls belong in one timer period.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Instructions per second while in 64x32 mode
    pub low_res_rate: u16,
    /// Instructions per second while in 128x64 mode
    pub high_res_rate: u16,
    /// Timer decrements per second
    pub timer_hz: u16,
}

impl Config {
    /// Instructions per second for the given resolution mode
    pub fn rate(&self, high_res: bool) -> u16 {
        if high_res {
            self.high_res_rate
        } else {
            self.low_res_rate
        }
    }

    /// Number of `step` calls between two timer ticks, never less than one
    pub fn cycles_per_tick(&self, high_res: bool) -> u16 {
        (self.rate(high_res) / self.timer_hz.max(1)).max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            low_res_rate: LOW_RES_RATE,
            high_res_rate: HIGH_RES_RATE,
            timer_hz: TIMER_HZ,
        }
    }
}
