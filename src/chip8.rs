use std::io;

use log::{info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::display::{Display, FrameBuffer};
use crate::error::Result;
use crate::instruction::Operation;
use crate::keypad::{Input, Keypad};
use crate::operations;
use crate::state::State;

/// The outcome of a single `step`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    /// The instruction executed normally
    Running,
    /// A key wait found nothing held; the same instruction runs again next step
    WaitingForKey,
    /// The word matched no operation and was skipped
    Unmapped(u16),
    /// The host paused the machine; nothing was executed
    Stopped,
    /// The program exited; nothing more will execute until a reset
    Halted { code: u8 },
}

impl Status {
    pub fn is_halted(&self) -> bool {
        matches!(self, Status::Halted { .. })
    }
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language; this
/// one also understands the SCHIP extensions.
///
/// Tracks:
///  - the machine `state`
///  - the `display` it draws onto and the `keypad` it polls
///  - a random number source for CXKK
///
/// Supplies interfaces for:
/// - resetting and loading roms
/// - pressing and releasing keys
/// - advancing the CPU one instruction, or one frame's worth of instructions
/// - advancing its timers
/// - inspecting its display for rendering, and its sound timer for audio
pub struct Chip8<D: Display = FrameBuffer, K: Input = Keypad> {
    state: State,
    display: D,
    keypad: K,
    rng: StdRng,
    config: Config,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Chip8::with_peripherals(FrameBuffer::new(), Keypad::new(), config)
    }

    /// A machine whose random numbers repeat from run to run
    pub fn with_seed(seed: u64) -> Self {
        let mut chip8 = Self::new();
        chip8.rng = StdRng::seed_from_u64(seed);
        chip8
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Display> Chip8<D, Keypad> {
    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the keypad index of the key that was pressed
    pub fn key_press(&mut self, key: u8) {
        self.keypad.press(key);
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the keypad index of the key that was released
    pub fn key_release(&mut self, key: u8) {
        self.keypad.release(key);
    }
}

impl<D: Display, K: Input> Chip8<D, K> {
    /// A freshly reset machine driving the given display and keypad
    pub fn with_peripherals(display: D, keypad: K, config: Config) -> Self {
        let mut chip8 = Chip8 {
            state: State::new(),
            display,
            keypad,
            rng: StdRng::from_entropy(),
            config,
        };
        chip8.reset();
        chip8
    }

    /// Return to power-on state: memory, registers, stack, timers, mode,
    /// display and keys are all cleared and the fonts are reloaded.
    pub fn reset(&mut self) {
        self.state.reset();
        self.display.clear();
        self.keypad.reset();
        info!("machine reset");
    }

    /// Load a rom into memory at 0x200
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        self.state.load_rom(rom)?;
        info!("loaded {} byte ROM", rom.len());
        Ok(())
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `reader` a reader that yields the whole ROM
    pub fn read_rom(&mut self, reader: &mut dyn io::Read) -> Result<()> {
        let mut rom = Vec::new();
        reader.read_to_end(&mut rom)?;
        self.load_rom(&rom)
    }

    /// Advances the CPU by a single instruction
    /// - does nothing once halted or while paused
    /// - gets, decodes and executes the next opcode
    pub fn step(&mut self) -> Status {
        if let Some(code) = self.state.exit_code {
            return Status::Halted { code };
        }
        if !self.state.running {
            return Status::Stopped;
        }

        let pc = self.state.pc;
        let word = self.state.fetch();
        let op = Operation::from(word);
        trace!(
            "{:03X}: {:04X} {:<16} v{:02X?} i{:03X}",
            pc,
            word,
            op.to_string(),
            self.state.v,
            self.state.i
        );
        operations::execute(
            op,
            &mut self.state,
            &mut self.display,
            &self.keypad,
            &mut self.rng,
        )
    }

    /// Decrements the delay and sound timers; call at `Config::timer_hz`
    pub fn tick(&mut self) {
        self.state.tick_timers();
    }

    /// Runs one timer period: `cycles_per_frame` steps followed by a tick.
    ///
    /// Stops early when the machine halts or is paused (without ticking), or
    /// when it starts waiting for a key (still ticking).
    pub fn run_frame(&mut self) -> Status {
        let mut status = Status::Running;
        for _ in 0..self.cycles_per_frame() {
            status = self.step();
            match status {
                Status::Halted { .. } | Status::Stopped => return status,
                Status::WaitingForKey => break,
                Status::Running | Status::Unmapped(_) => {}
            }
        }
        self.tick();
        status
    }

    /// Instructions per second the host should aim for in the current mode
    pub fn rate(&self) -> u16 {
        self.config.rate(self.state.high_res)
    }

    /// Steps per timer tick in the current mode
    pub fn cycles_per_frame(&self) -> u16 {
        self.config.cycles_per_tick(self.state.high_res)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the display if it should be redrawn
    pub fn get_frame(&self) -> Option<&D> {
        if self.state.draw_flag {
            Some(&self.display)
        } else {
            None
        }
    }

    /// Acknowledge that the current frame has been rendered
    pub fn frame_rendered(&mut self) {
        self.state.draw_flag = false;
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Logical (width, height) of the display in the current mode
    pub fn resolution(&self) -> (usize, usize) {
        self.state.resolution()
    }

    pub fn is_high_res(&self) -> bool {
        self.state.high_res
    }

    pub fn keypad(&self) -> &K {
        &self.keypad
    }

    pub fn keypad_mut(&mut self) -> &mut K {
        &mut self.keypad
    }

    /// Release every key
    pub fn reset_keys(&mut self) {
        self.keypad.reset();
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Pause or resume; a halted machine stays halted until reset
    pub fn set_running(&mut self, running: bool) {
        self.state.running = running;
    }

    pub fn toggle_running(&mut self) -> bool {
        self.state.running = !self.state.running;
        self.state.running
    }

    /// The code passed to the exit opcode, once the program has exited
    pub fn exit_code(&self) -> Option<u8> {
        self.state.exit_code
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }

    /// Whether the host should be playing a tone
    pub fn is_sound_on(&self) -> bool {
        self.state.sound_timer > 0
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// A copy of the machine state, excluding the display and keypad
    pub fn snapshot(&self) -> State {
        self.state
    }

    /// Put back a state taken with `snapshot`
    pub fn restore(&mut self, state: State) {
        self.state = state;
    }
}
