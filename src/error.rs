use thiserror::Error;

/// Faults raised by the interpreter. Everything except `UnknownOpcode` leaves
/// the machine unable to continue the current program.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmError {
    #[error("address {addr:#05X} is outside memory (pc {pc:#05X})")]
    AddressOutOfBounds { addr: usize, pc: u16 },

    #[error("call stack overflow at pc {pc:#05X}")]
    StackOverflow { pc: u16 },

    #[error("return with empty call stack at pc {pc:#05X}")]
    StackUnderflow { pc: u16 },

    #[error("unknown opcode {opcode:#06X} at pc {pc:#05X}")]
    UnknownOpcode { opcode: u16, pc: u16 },

    #[error("program is {len} bytes but only {max} fit above 0x200")]
    ProgramTooLarge { len: usize, max: usize },
}
