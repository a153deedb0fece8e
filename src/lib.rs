pub use chip8::{Chip8, Status};
pub use config::Config;
pub use display::{Display, FrameBuffer};
pub use error::{Error, Result};
pub use instruction::Operation;
pub use keypad::{Input, Keypad};
pub use opcode::{Instruction, Opcode};
pub use state::{Stack, State};

mod chip8;
mod config;
pub mod constants;
mod display;
mod error;
mod instruction;
mod keypad;
mod opcode;
mod operations;
mod state;
