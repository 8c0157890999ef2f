//! SDL glue: window, keyboard and buzzer around the interpreter.

pub mod audio;
pub mod keymap;
pub mod screen;
