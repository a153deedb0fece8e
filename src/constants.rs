/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 4096;

/// Every address is masked into 12 bits before it touches memory
pub const ADDRESS_MASK: u16 = 0x0FFF;

/// ROMs are loaded here and the program counter starts here
pub const START_ADDRESS: u16 = 0x200;

/// Number of general purpose (and RPL) registers
pub const REGISTER_COUNT: usize = 16;

/// Index of the carry/borrow/collision flag register
pub const FLAG: usize = 0xF;

/// Number of keys on the hexadecimal keypad
pub const KEY_COUNT: usize = 16;

/// Classical CHIP-8 nesting limit for subroutine calls
pub const STACK_DEPTH: usize = 16;

/// Low resolution logical display size
pub const LOW_RES_WIDTH: usize = 64;
pub const LOW_RES_HEIGHT: usize = 32;

/// High resolution (SCHIP) logical display size; also the size of the backing surface
pub const HIGH_RES_WIDTH: usize = 128;
pub const HIGH_RES_HEIGHT: usize = 64;

/// Instructions per second in each resolution mode
pub const LOW_RES_RATE: u16 = 480;
pub const HIGH_RES_RATE: u16 = 700;

/// Timers are decremented at 60Hz regardless of the instruction rate
pub const TIMER_HZ: u16 = 60;

/// Columns shifted by the horizontal scroll opcodes
pub const SCROLL_COLUMNS: usize = 4;

/// Glyphs 0..F, 8x5 pixels each
pub const SMALL_FONT_BASE: u16 = 0x050;
pub const SMALL_GLYPH_SIZE: u16 = 5;
pub const SMALL_FONT: [u8; 80] = [
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

/// Glyphs 0..F, 8x10 pixels each, directly after the small font
pub const LARGE_FONT_BASE: u16 = SMALL_FONT_BASE + SMALL_FONT.len() as u16;
pub const LARGE_GLYPH_SIZE: u16 = 10;
pub const LARGE_FONT: [u8; 160] = [
    0x3C, 0x7E, 0xE7, 0xC3, 0xC3, 0xC3, 0xC3, 0xE7, 0x7E, 0x3C, // 0
    0x18, 0x38, 0x58, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x3C, // 1
    0x3E, 0x7F, 0xC3, 0x06, 0x0C, 0x18, 0x30, 0x60, 0xFF, 0xFF, // 2
    0x3C, 0x7E, 0xC3, 0x03, 0x0E, 0x0E, 0x03, 0xC3, 0x7E, 0x3C, // 3
    0x06, 0x0E, 0x1E, 0x36, 0x66, 0xC6, 0xFF, 0xFF, 0x06, 0x06, // 4
    0xFF, 0xFF, 0xC0, 0xC0, 0xFC, 0xFE, 0x03, 0xC3, 0x7E, 0x3C, // 5
    0x3E, 0x7C, 0xC0, 0xC0, 0xFC, 0xFE, 0xC3, 0xC3, 0x7E, 0x3C, // 6
    0xFF, 0xFF, 0x03, 0x06, 0x0C, 0x18, 0x30, 0x60, 0x60, 0x60, // 7
    0x3C, 0x7E, 0xC3, 0xC3, 0x7E, 0x7E, 0xC3, 0xC3, 0x7E, 0x3C, // 8
    0x3C, 0x7E, 0xC3, 0xC3, 0x7F, 0x3F, 0x03, 0x03, 0x3E, 0x7C, // 9
    0x7E, 0xFF, 0xC3, 0xC3, 0xC3, 0xFF, 0xFF, 0xC3, 0xC3, 0xC3, // A
    0xFC, 0xFC, 0xC3, 0xC3, 0xFC, 0xFC, 0xC3, 0xC3, 0xFC, 0xFC, // B
    0x3C, 0xFF, 0xC3, 0xC0, 0xC0, 0xC0, 0xC0, 0xC3, 0xFF, 0x3C, // C
    0xFC, 0xFE, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xFE, 0xFC, // D
    0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, // E
    0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, 0xC0, 0xC0, 0xC0, 0xC0, // F
];
