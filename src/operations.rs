use log::{debug, info, warn};
use rand::RngCore;

use crate::chip8::Status;
use crate::constants::{
    ADDRESS_MASK, FLAG, KEY_COUNT, LARGE_FONT_BASE, LARGE_GLYPH_SIZE, SCROLL_COLUMNS,
    SMALL_FONT_BASE, SMALL_GLYPH_SIZE,
};
use crate::display::Display;
use crate::instruction::Operation;
use crate::keypad::Input;
use crate::state::State;

/// Apply one Operation to the machine.
///
/// The pc has already been moved past the instruction, so skips add 2 and the
/// key wait subtracts 2.
pub fn execute(
    op: Operation,
    state: &mut State,
    display: &mut dyn Display,
    input: &dyn Input,
    rng: &mut dyn RngCore,
) -> Status {
    use Operation::*;

    match op {
        Exit(code) => return exit(state, code),
        ScrollDown(n) => scroll_down(state, display, n),
        Clear => clear(state, display),
        Return => ret(state),
        ScrollRight => scroll_right(state, display),
        ScrollLeft => scroll_left(state, display),
        Halt => return exit(state, 0),
        LowRes => set_mode(state, false),
        HighRes => set_mode(state, true),
        System(_) => state.advance(),
        Jump(nnn) => state.jump(nnn),
        Call(nnn) => call(state, nnn),
        SkipEqualByte { x, kk } => state.skip_if(state.v[x] == kk),
        SkipNotEqualByte { x, kk } => state.skip_if(state.v[x] != kk),
        SkipEqualRegister { x, y } => state.skip_if(state.v[x] == state.v[y]),
        LoadByte { x, kk } => state.v[x] = kk,
        AddByte { x, kk } => state.v[x] = state.v[x].wrapping_add(kk),
        Move { x, y } => state.v[x] = state.v[y],
        Or { x, y } => state.v[x] |= state.v[y],
        And { x, y } => state.v[x] &= state.v[y],
        Xor { x, y } => state.v[x] ^= state.v[y],
        Add { x, y } => add(state, x, y),
        Sub { x, y } => sub(state, x, y),
        ShiftRight { x } => shr(state, x),
        SubNegated { x, y } => subn(state, x, y),
        ShiftLeft { x } => shl(state, x),
        SkipNotEqualRegister { x, y } => state.skip_if(state.v[x] != state.v[y]),
        LoadIndex(nnn) => state.i = nnn,
        JumpOffset(nnn) => state.jump(nnn + u16::from(state.v[0x0])),
        Random { x, kk } => random(state, rng, x, kk),
        Draw { x, y, n } => draw(state, display, x, y, n),
        SkipPressed { x } => state.skip_if(held(input, state.v[x])),
        SkipNotPressed { x } => state.skip_if(!held(input, state.v[x])),
        LoadDelay { x } => state.v[x] = state.delay_timer,
        WaitKey { x } => return wait_key(state, input, x),
        SetDelay { x } => state.delay_timer = state.v[x],
        SetSound { x } => state.sound_timer = state.v[x],
        AddIndex { x } => add_index(state, x),
        SmallGlyph { x } => {
            state.i = (SMALL_FONT_BASE + u16::from(state.v[x]) * SMALL_GLYPH_SIZE) & ADDRESS_MASK
        }
        LargeGlyph { x } => {
            state.i = (LARGE_FONT_BASE + u16::from(state.v[x]) * LARGE_GLYPH_SIZE) & ADDRESS_MASK
        }
        Bcd { x } => bcd(state, x),
        StoreRegisters { x } => store(state, x),
        LoadRegisters { x } => load(state, x),
        StoreRpl { x } => state.rpl[..=x].copy_from_slice(&state.v[..=x]),
        LoadRpl { x } => state.v[..=x].copy_from_slice(&state.rpl[..=x]),
        Unknown(word) => {
            debug!("unmapped opcode {:#06X} at {:#05X}", word, state.pc.wrapping_sub(2));
            return Status::Unmapped(word);
        }
    }

    Status::Running
}

/// stop and report `code` to the host
fn exit(state: &mut State, code: u8) -> Status {
    info!("program exited with code {}", code);
    state.running = false;
    state.exit_code = Some(code);
    Status::Halted { code }
}

/// display = 0
fn clear(state: &mut State, display: &mut dyn Display) {
    display.clear();
    state.draw_flag = true;
}

/// PC = STACK.pop()
/// An empty stack leaves the pc on the next instruction
fn ret(state: &mut State) {
    match state.stack.pop() {
        Some(address) => state.jump(address),
        None => warn!("return with an empty stack at {:#05X}", state.pc.wrapping_sub(2)),
    }
}

/// STACK.push(PC); PC = addr
/// A call past the maximum depth is dropped
fn call(state: &mut State, address: u16) {
    if state.stack.push(state.pc).is_ok() {
        state.jump(address);
    } else {
        warn!(
            "stack overflow calling {:#05X} from {:#05X}",
            address,
            state.pc.wrapping_sub(2)
        );
    }
}

fn set_mode(state: &mut State, high_res: bool) {
    if state.high_res != high_res {
        info!("switching to {} resolution", if high_res { "high" } else { "low" });
    }
    state.high_res = high_res;
}

/// Vx += Vy; VF = overflow
fn add(state: &mut State, x: usize, y: usize) {
    let (res, over) = state.v[x].overflowing_add(state.v[y]);
    state.v[x] = res;
    state.set_flag(over);
}

/// Vx -= Vy; VF = !underflow
fn sub(state: &mut State, x: usize, y: usize) {
    let (res, under) = state.v[x].overflowing_sub(state.v[y]);
    state.v[x] = res;
    state.set_flag(!under);
}

/// Vx = Vy - Vx; VF = !underflow
fn subn(state: &mut State, x: usize, y: usize) {
    let (res, under) = state.v[y].overflowing_sub(state.v[x]);
    state.v[x] = res;
    state.set_flag(!under);
}

/// Vx >>= 1; VF = lsb
fn shr(state: &mut State, x: usize) {
    let lsb = state.v[x] & 0x1;
    state.v[x] >>= 1;
    state.v[FLAG] = lsb;
}

/// Vx <<= 1; VF = msb
fn shl(state: &mut State, x: usize) {
    let msb = state.v[x] >> 7;
    state.v[x] <<= 1;
    state.v[FLAG] = msb;
}

/// Vx = rand_byte & kk
fn random(state: &mut State, rng: &mut dyn RngCore, x: usize, kk: u8) {
    let mut byte = [0u8; 1];
    rng.fill_bytes(&mut byte);
    state.v[x] = byte[0] & kk;
}

/// I += Vx; VF = I overflowed 12 bits
fn add_index(state: &mut State, x: usize) {
    let sum = state.i + u16::from(state.v[x]);
    state.set_flag(sum > ADDRESS_MASK);
    state.i = sum & ADDRESS_MASK;
}

/// Values past the last key are never held
fn held(input: &dyn Input, key: u8) -> bool {
    (key as usize) < KEY_COUNT && input.is_pressed(key)
}

/// Poll the keypad for the lowest held key.
/// Nothing held puts the pc back on this instruction so it runs again next step.
fn wait_key(state: &mut State, input: &dyn Input, x: usize) -> Status {
    match (0..KEY_COUNT as u8).find(|&key| input.is_pressed(key)) {
        Some(key) => {
            state.v[x] = key;
            Status::Running
        }
        None => {
            state.rewind();
            Status::WaitingForKey
        }
    }
}

/// mem[I..I+3] = bcd(Vx)
fn bcd(state: &mut State, x: usize) {
    let value = state.v[x];
    let i = state.i;
    state.write(i, value / 100);
    state.write(i.wrapping_add(1), value / 10 % 10);
    state.write(i.wrapping_add(2), value % 10);
}

/// mem[I..=I+x] = V0..=Vx
fn store(state: &mut State, x: usize) {
    for offset in 0..=x {
        let address = state.i.wrapping_add(offset as u16);
        state.write(address, state.v[offset]);
    }
}

/// V0..=Vx = mem[I..=I+x]
fn load(state: &mut State, x: usize) {
    for offset in 0..=x {
        state.v[offset] = state.read(state.i.wrapping_add(offset as u16));
    }
}

/// draw_sprite(x=Vx y=Vy size=n)
///
/// XORs an 8 pixel wide, n row sprite from memory at I onto the display.
/// In high resolution a height of 0 selects a 16x16 sprite of 2 bytes per row.
/// Pixels past the right or bottom edge are clipped.
/// Sets VF if any lit pixel was erased.
fn draw(state: &mut State, display: &mut dyn Display, x: usize, y: usize, n: u8) {
    let (width, height) = state.resolution();
    let origin_x = state.v[x] as usize;
    let origin_y = state.v[y] as usize;
    let (rows, bytes_per_row) = if state.high_res && n == 0 {
        (16, 2)
    } else {
        (n as usize, 1)
    };

    let mut collision = false;
    for row in 0..rows {
        let py = origin_y + row;
        if py >= height {
            break;
        }
        for column_byte in 0..bytes_per_row {
            let offset = (row * bytes_per_row + column_byte) as u16;
            let sprite = state.read(state.i.wrapping_add(offset));
            for bit in 0..8 {
                let px = origin_x + column_byte * 8 + bit;
                if px >= width {
                    break;
                }
                if (sprite >> (7 - bit)) & 1 == 0 {
                    continue;
                }
                let lit = display.get(px, py);
                collision |= lit;
                display.set(px, py, !lit);
            }
        }
    }

    state.set_flag(collision);
    state.draw_flag = true;
}

/// Shift every row down n rows, blanking the top n
fn scroll_down(state: &mut State, display: &mut dyn Display, n: u8) {
    let (width, height) = state.resolution();
    let n = (n as usize).min(height);
    for y in (0..height).rev() {
        for x in 0..width {
            let pixel = y >= n && display.get(x, y - n);
            display.set(x, y, pixel);
        }
    }
    state.draw_flag = true;
}

/// Shift every column right 4 columns, blanking the leftmost 4
fn scroll_right(state: &mut State, display: &mut dyn Display) {
    if !state.high_res {
        debug!("ignoring scroll right in low resolution");
        return;
    }
    let (width, height) = state.resolution();
    for y in 0..height {
        for x in (0..width).rev() {
            let pixel = x >= SCROLL_COLUMNS && display.get(x - SCROLL_COLUMNS, y);
            display.set(x, y, pixel);
        }
    }
    state.draw_flag = true;
}

/// Shift every column left 4 columns, blanking the rightmost 4
fn scroll_left(state: &mut State, display: &mut dyn Display) {
    if !state.high_res {
        debug!("ignoring scroll left in low resolution");
        return;
    }
    let (width, height) = state.resolution();
    for y in 0..height {
        for x in 0..width {
            let pixel = x + SCROLL_COLUMNS < width && display.get(x + SCROLL_COLUMNS, y);
            display.set(x, y, pixel);
        }
    }
    state.draw_flag = true;
}
