use crate::config::Config;
use crate::error::VmError;
use log::{info, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::ops::Range;

mod font;
mod ops;

pub use font::FONTSET;

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: u16 = 0x200; // programs start at 0x200
pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;
pub const STACK_DEPTH: usize = 16;
pub const NUM_KEYS: usize = 16;

/// Largest program image that fits between `PROGRAM_START` and the top of memory.
pub const MAX_PROGRAM_LEN: usize = MEMORY_SIZE - PROGRAM_START as usize;

pub type Framebuffer = [[u8; SCREEN_WIDTH]; SCREEN_HEIGHT];

type OpcodeFn = fn(&mut Chip8, u16) -> Result<(), VmError>;

/// What a single `step` did, for the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub opcode: u16,
    /// The framebuffer changed and should be presented.
    pub redraw: bool,
    /// The opcode matched nothing and was skipped over.
    pub unknown_opcode: bool,
}

pub struct Chip8 {
    // CHIP-8 VM
    memory: [u8; MEMORY_SIZE], // system memory
    v: [u8; 16],               // registers V0-VE (VF is flag for some instructions)
    i: u16,                    // address register
    pc: u16,                   // program counter
    gfx: Framebuffer,          // pixel state, indexed [row][column]
    delay_timer: u8,
    sound_timer: u8, // timers count down at 60Hz
    stack: [u16; STACK_DEPTH],
    sp: u16,              // next free stack slot
    key: [bool; NUM_KEYS], // hex keypad state

    // emulator resources
    draw_flag: bool,
    rng: StdRng,
    config: Config,
    opcode_fns: [OpcodeFn; 16],
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let mut chip8 = Self {
            memory: [0; MEMORY_SIZE],
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            gfx: [[0; SCREEN_WIDTH]; SCREEN_HEIGHT],
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_DEPTH],
            sp: 0,
            key: [false; NUM_KEYS],

            draw_flag: false,
            rng: seed_rng(&config),
            config,
            opcode_fns: [
                Self::cls_ret, // 00**
                Self::jmp,     // 1NNN
                Self::call,    // 2NNN
                Self::eb,      // 3XNN
                Self::neb,     // 4XNN
                Self::er,      // 5XY0
                Self::ld,      // 6XNN
                Self::addb,    // 7XNN
                Self::alu,     // 8XY*
                Self::ner,     // 9XY0
                Self::si,      // ANNN
                Self::jmpo,    // BNNN
                Self::rng,     // CXNN
                Self::draw,    // DXYN
                Self::key,     // EX**
                Self::ex,      // FX**
            ],
        };
        chip8.reset();
        chip8
    }

    /// Return the machine to power-on state: everything zeroed, font in low
    /// memory, pc at 0x200 and a freshly seeded random source.
    pub fn reset(&mut self) {
        self.memory = [0; MEMORY_SIZE];
        self.memory[..FONTSET.len()].copy_from_slice(&FONTSET);
        self.v = [0; 16];
        self.i = 0;
        self.pc = PROGRAM_START;
        self.gfx = [[0; SCREEN_WIDTH]; SCREEN_HEIGHT];
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.stack = [0; STACK_DEPTH];
        self.sp = 0;
        self.key = [false; NUM_KEYS];
        self.draw_flag = false;
        self.rng = seed_rng(&self.config);
        info!("machine reset");
    }

    /// Copy a program image into memory at 0x200.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), VmError> {
        if program.len() > MAX_PROGRAM_LEN {
            return Err(VmError::ProgramTooLarge {
                len: program.len(),
                max: MAX_PROGRAM_LEN,
            });
        }
        let start = PROGRAM_START as usize;
        self.memory[start..start + program.len()].copy_from_slice(program);
        info!(
            "loaded {} byte program at {:#05X}",
            program.len(),
            PROGRAM_START
        );
        Ok(())
    }

    /// Fetch, decode and execute one instruction.
    ///
    /// The redraw flag is cleared on entry, so the driver has to look at
    /// `Step::redraw` (or `draw_flag()`) before calling this again. A returned
    /// error leaves registers, memory, stack and screen as they were.
    pub fn step(&mut self) -> Result<Step, VmError> {
        self.draw_flag = false;

        // two-byte opcodes
        let opcode = self.fetch()?;

        let f = self.opcode_fns[((opcode & 0xF000) >> 12) as usize];
        let unknown_opcode = match f(self, opcode) {
            Ok(()) => false,
            Err(VmError::UnknownOpcode { pc, .. }) if !self.config.strict_opcodes => {
                warn!("skipping unknown opcode {:04X} at {:03X}", opcode, pc);
                self.pc += 2;
                true
            }
            Err(e) => return Err(e),
        };

        trace!(
            "{:04X} -> pc={:03X} i={:03X} sp={} v={:02X?}",
            opcode,
            self.pc,
            self.i,
            self.sp,
            self.v
        );

        Ok(Step {
            opcode,
            redraw: self.draw_flag,
            unknown_opcode,
        })
    }

    /// One 60Hz timer tick. Returns true when the sound timer runs out on this
    /// tick, which is when the driver should sound the buzzer.
    pub fn tick(&mut self) -> bool {
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }
        let beep = self.sound_timer == 1;
        if self.sound_timer > 0 {
            self.sound_timer -= 1;
        }
        beep
    }

    /// Record a press or release of keypad key `key` (0x0-0xF). Other values
    /// are ignored.
    pub fn set_key(&mut self, key: usize, pressed: bool) {
        if let Some(state) = self.key.get_mut(key) {
            *state = pressed;
        }
    }

    pub fn draw_flag(&self) -> bool {
        self.draw_flag
    }

    pub fn gfx(&self) -> &Framebuffer {
        &self.gfx
    }

    pub fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    pub fn sp(&self) -> u16 {
        self.sp
    }

    pub fn v(&self) -> &[u8; 16] {
        &self.v
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    fn fetch(&self) -> Result<u16, VmError> {
        let word = self.mem_range(self.pc, 2)?;
        Ok(u16::from_be_bytes([
            self.memory[word.start],
            self.memory[word.start + 1],
        ]))
    }

    /// Bounds-checked span of `len` bytes starting at `addr`.
    fn mem_range(&self, addr: u16, len: usize) -> Result<Range<usize>, VmError> {
        let start = addr as usize;
        let end = start + len;
        if end > MEMORY_SIZE {
            return Err(VmError::AddressOutOfBounds {
                addr: start.max(MEMORY_SIZE),
                pc: self.pc,
            });
        }
        Ok(start..end)
    }
}

fn seed_rng(config: &Config) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
