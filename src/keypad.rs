use crate::constants::KEY_COUNT;

/// # Input
/// The held/released state of the 16 key hexadecimal keypad.
///
/// ```text
/// |1|2|3|C|
/// |4|5|6|D|
/// |7|8|9|E|
/// |A|0|B|F|
/// ```
/// Mapping physical keys onto these indices is left to the host.
pub trait Input {
    /// Whether key `0x0..=0xF` is currently held
    fn is_pressed(&self, key: u8) -> bool;

    /// Release every key
    fn reset(&mut self);
}

/// # Keypad
/// Key state driven by the host through `press` and `release`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Keypad {
            keys: [false; KEY_COUNT],
        }
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the keypad index; only the low nibble is used
    pub fn press(&mut self, key: u8) {
        self.keys[(key & 0xF) as usize] = true;
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the keypad index; only the low nibble is used
    pub fn release(&mut self, key: u8) {
        self.keys[(key & 0xF) as usize] = false;
    }
}

impl Input for Keypad {
    fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0xF) as usize]
    }

    fn reset(&mut self) {
        self.keys = [false; KEY_COUNT];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut keypad = Keypad::new();
        keypad.press(0xE);
        assert!(keypad.is_pressed(0xE));
        assert!(!keypad.is_pressed(0x1));
        keypad.release(0xE);
        assert!(!keypad.is_pressed(0xE));
    }

    #[test]
    fn test_only_low_nibble_is_used() {
        let mut keypad = Keypad::new();
        keypad.press(0x1A);
        assert!(keypad.is_pressed(0xA));
        assert!(keypad.is_pressed(0xFA));
    }

    #[test]
    fn test_reset_releases_everything() {
        let mut keypad = Keypad::new();
        for key in 0..16 {
            keypad.press(key);
        }
        keypad.reset();
        assert_eq!(keypad, Keypad::new());
    }
}
