use crate::constants::{
    ADDRESS_MASK, FLAG, HIGH_RES_HEIGHT, HIGH_RES_WIDTH, LARGE_FONT, LARGE_FONT_BASE,
    LOW_RES_HEIGHT, LOW_RES_WIDTH, MEMORY_SIZE, REGISTER_COUNT, SMALL_FONT, SMALL_FONT_BASE,
    STACK_DEPTH, START_ADDRESS,
};
use crate::error::{Error, Result};

/// A snapshot of the machine's internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry/borrow/collision flag
/// - (i) a 12-bit memory address register
/// - (rpl) 16 8-bit SCHIP flag registers, only touched by Fx75/Fx85
///
/// Counter
/// - (pc) a 12-bit program counter
///
/// Stack
/// - 16 return addresses with an explicit depth
///
/// Timers
/// - 2 8-bit timers (delay & sound), decremented by `tick_timers`
/// - while the sound timer is nonzero the host should play a tone
///
/// ## Memory
/// - 4096 bytes of addressable memory
///     - 0x050..0x0A0 small font
///     - 0x0A0..0x140 large font
///     - 0x200.. program
///
/// ## Signals
/// - (high_res) whether the 128x64 SCHIP mode is active
/// - (draw_flag) set whenever the display was touched, cleared by the host
/// - (running) cleared by the host to pause, or by the exit opcodes
/// - (exit_code) set by the exit opcodes
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub memory: [u8; MEMORY_SIZE],
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub stack: Stack,
    pub rpl: [u8; REGISTER_COUNT],
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub high_res: bool,
    pub draw_flag: bool,
    pub running: bool,
    pub exit_code: Option<u8>,
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let small = SMALL_FONT_BASE as usize;
        memory[small..small + SMALL_FONT.len()].copy_from_slice(&SMALL_FONT);
        let large = LARGE_FONT_BASE as usize;
        memory[large..large + LARGE_FONT.len()].copy_from_slice(&LARGE_FONT);

        State {
            memory,
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: START_ADDRESS,
            stack: Stack::new(),
            rpl: [0; REGISTER_COUNT],
            delay_timer: 0,
            sound_timer: 0,
            high_res: false,
            draw_flag: false,
            running: true,
            exit_code: None,
        }
    }

    /// Put every register, timer and memory cell back to its power-on value
    pub fn reset(&mut self) {
        *self = State::new();
    }

    /// Copy a ROM into memory starting at 0x200.
    /// Memory is left untouched when the ROM does not fit.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        let start = START_ADDRESS as usize;
        let capacity = MEMORY_SIZE - start;
        if rom.len() > capacity {
            return Err(Error::RomTooLarge {
                size: rom.len(),
                capacity,
            });
        }
        self.memory[start..start + rom.len()].copy_from_slice(rom);
        Ok(())
    }

    /// Read the byte at a 12-bit address
    pub fn read(&self, address: u16) -> u8 {
        self.memory[(address & ADDRESS_MASK) as usize]
    }

    /// Write the byte at a 12-bit address
    pub fn write(&mut self, address: u16, value: u8) {
        self.memory[(address & ADDRESS_MASK) as usize] = value;
    }

    /// Gets the opcode currently pointed at by the pc and moves past it.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    pub fn fetch(&mut self) -> u16 {
        let left = u16::from(self.read(self.pc));
        let right = u16::from(self.read(self.pc.wrapping_add(1)));
        self.advance();
        left << 8 | right
    }

    /// Move the pc forward one instruction
    pub fn advance(&mut self) {
        self.pc = self.pc.wrapping_add(2) & ADDRESS_MASK;
    }

    /// Move the pc back one instruction
    pub fn rewind(&mut self) {
        self.pc = self.pc.wrapping_sub(2) & ADDRESS_MASK;
    }

    /// Skip the next instruction when `condition` holds
    pub fn skip_if(&mut self, condition: bool) {
        if condition {
            self.advance();
        }
    }

    /// Point the pc at a 12-bit address
    pub fn jump(&mut self, address: u16) {
        self.pc = address & ADDRESS_MASK;
    }

    /// VF = 1 if set else 0
    pub fn set_flag(&mut self, set: bool) {
        self.v[FLAG] = u8::from(set);
    }

    /// Logical (width, height) of the display in the current mode
    pub fn resolution(&self) -> (usize, usize) {
        if self.high_res {
            (HIGH_RES_WIDTH, HIGH_RES_HEIGHT)
        } else {
            (LOW_RES_WIDTH, LOW_RES_HEIGHT)
        }
    }

    /// Decrement both timers, stopping at zero
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// # Stack
/// Return addresses for nested subroutine calls, at most `STACK_DEPTH` deep.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Stack {
    addresses: [u16; STACK_DEPTH],
    depth: usize,
}

impl Stack {
    pub fn new() -> Self {
        Stack {
            addresses: [0; STACK_DEPTH],
            depth: 0,
        }
    }

    /// Save a return address; gives it back if the stack is already full
    pub fn push(&mut self, address: u16) -> std::result::Result<(), u16> {
        if self.depth == STACK_DEPTH {
            return Err(address);
        }
        self.addresses[self.depth] = address;
        self.depth += 1;
        Ok(())
    }

    /// Take the most recently saved return address
    pub fn pop(&mut self) -> Option<u16> {
        if self.depth == 0 {
            return None;
        }
        self.depth -= 1;
        Some(self.addresses[self.depth])
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_empty(&self) -> bool {
        self.depth == 0
    }

    /// Saved addresses, oldest first
    pub fn as_slice(&self) -> &[u16] {
        &self.addresses[..self.depth]
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_has_fonts() {
        let state = State::new();
        assert_eq!(state.memory[0x050..0x0A0], SMALL_FONT[..]);
        assert_eq!(state.memory[0x0A0..0x140], LARGE_FONT[..]);
        // glyph 0 of each table
        assert_eq!(state.memory[0x050..0x055], [0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert_eq!(state.memory[0x0A0], 0x3C);
        assert!(state.memory[..0x050].iter().all(|&b| b == 0));
        assert!(state.memory[0x140..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_reset_is_total() {
        let mut state = State::new();
        state.v = [0xAA; REGISTER_COUNT];
        state.rpl = [0xBB; REGISTER_COUNT];
        state.i = 0x123;
        state.pc = 0x456;
        state.stack.push(0x300).unwrap();
        state.delay_timer = 9;
        state.sound_timer = 9;
        state.high_res = true;
        state.running = false;
        state.exit_code = Some(3);
        state.memory[0x000] = 0xFF;
        state.memory[0x050] = 0x00;
        state.memory[0xFFF] = 0xFF;

        state.reset();

        assert_eq!(state.v, [0; REGISTER_COUNT]);
        assert_eq!(state.rpl, [0; REGISTER_COUNT]);
        assert_eq!(state.i, 0);
        assert_eq!(state.pc, 0x200);
        assert!(state.stack.is_empty());
        assert_eq!(state.delay_timer, 0);
        assert_eq!(state.sound_timer, 0);
        assert!(!state.high_res);
        assert!(state.running);
        assert_eq!(state.exit_code, None);
        assert_eq!(state, State::new());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut state = State::new();
        state.v[0x3] = 7;
        state.reset();
        let once = state;
        state.reset();
        assert_eq!(state, once);
    }

    #[test]
    fn test_load_rom() {
        let mut state = State::new();
        state.load_rom(&[0x00, 0xE0, 0x12, 0x00]).unwrap();
        assert_eq!(state.memory[0x200..0x204], [0x00, 0xE0, 0x12, 0x00]);
        assert_eq!(state.memory[0x204], 0x00);
    }

    #[test]
    fn test_load_rom_fills_memory_exactly() {
        let mut state = State::new();
        let rom = vec![0xAB; MEMORY_SIZE - 0x200];
        assert!(state.load_rom(&rom).is_ok());
        assert_eq!(state.memory[0xFFF], 0xAB);
    }

    #[test]
    fn test_load_rom_too_large_leaves_memory_alone() {
        let mut state = State::new();
        let rom = vec![0xAB; MEMORY_SIZE - 0x200 + 1];
        match state.load_rom(&rom) {
            Err(Error::RomTooLarge { size, capacity }) => {
                assert_eq!(size, 0xE01);
                assert_eq!(capacity, 0xE00);
            }
            other => panic!("expected RomTooLarge, got {:?}", other),
        }
        assert_eq!(state, State::new());
    }

    #[test]
    fn test_fetch() {
        let mut state = State::new();
        state.memory[0x200..0x202].copy_from_slice(&[0xAA, 0xBB]);
        assert_eq!(state.fetch(), 0xAABB);
        assert_eq!(state.pc, 0x202);
    }

    #[test]
    fn test_fetch_wraps_at_end_of_memory() {
        let mut state = State::new();
        state.pc = 0xFFF;
        state.memory[0xFFF] = 0x12;
        state.memory[0x000] = 0x34;
        assert_eq!(state.fetch(), 0x1234);
        assert_eq!(state.pc, 0x001);
    }

    #[test]
    fn test_addresses_are_masked() {
        let mut state = State::new();
        state.write(0x1234, 0x56);
        assert_eq!(state.memory[0x234], 0x56);
        assert_eq!(state.read(0xF234), 0x56);
        state.jump(0xFABC);
        assert_eq!(state.pc, 0xABC);
    }

    #[test]
    fn test_resolution_follows_mode() {
        let mut state = State::new();
        assert_eq!(state.resolution(), (64, 32));
        state.high_res = true;
        assert_eq!(state.resolution(), (128, 64));
    }

    #[test]
    fn test_tick_timers_floors_at_zero() {
        let mut state = State::new();
        state.delay_timer = 2;
        state.sound_timer = 1;
        state.tick_timers();
        assert_eq!((state.delay_timer, state.sound_timer), (1, 0));
        state.tick_timers();
        state.tick_timers();
        assert_eq!((state.delay_timer, state.sound_timer), (0, 0));
    }

    #[test]
    fn test_stack_push_pop() {
        let mut stack = Stack::new();
        stack.push(0x202).unwrap();
        stack.push(0x404).unwrap();
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.as_slice(), &[0x202, 0x404]);
        assert_eq!(stack.pop(), Some(0x404));
        assert_eq!(stack.pop(), Some(0x202));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn test_stack_overflow_is_refused() {
        let mut stack = Stack::new();
        for address in 0..STACK_DEPTH as u16 {
            assert!(stack.push(address).is_ok());
        }
        assert_eq!(stack.push(0xABC), Err(0xABC));
        assert_eq!(stack.depth(), STACK_DEPTH);
        assert_eq!(stack.pop(), Some(STACK_DEPTH as u16 - 1));
    }
}
