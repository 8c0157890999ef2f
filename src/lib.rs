//! A CHIP-8 interpreter core.
//!
//! [`Chip8`] owns the whole machine (memory, registers, stack, timers,
//! framebuffer and keypad). A driver calls [`Chip8::step`] to run one
//! instruction and [`Chip8::tick`] at 60Hz for the timers; loading programs,
//! drawing and key handling are the driver's business.

pub mod config;
pub mod error;
pub mod vm;

pub use config::Config;
pub use error::VmError;
pub use vm::{Chip8, Framebuffer, Step, NUM_KEYS, SCREEN_HEIGHT, SCREEN_WIDTH};
