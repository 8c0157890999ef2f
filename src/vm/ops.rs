//! Per-instruction semantics. Each handler either applies the whole
//! instruction (including the pc update) or returns an error having touched
//! nothing.

use super::font::GLYPH_BYTES;
use super::{Chip8, SCREEN_HEIGHT, SCREEN_WIDTH, STACK_DEPTH};
use crate::error::VmError;
use log::debug;
use rand::Rng;

fn x(opcode: u16) -> usize {
    ((opcode & 0xF00) >> 8) as usize
}

fn y(opcode: u16) -> usize {
    ((opcode & 0xF0) >> 4) as usize
}

fn nn(opcode: u16) -> u8 {
    (opcode & 0xFF) as u8
}

fn nnn(opcode: u16) -> u16 {
    opcode & 0xFFF
}

impl Chip8 {
    fn unknown(&self, opcode: u16) -> VmError {
        VmError::UnknownOpcode {
            opcode,
            pc: self.pc,
        }
    }

    pub(super) fn cls_ret(&mut self, opcode: u16) -> Result<(), VmError> {
        match opcode {
            0x00E0 => {
                // clear screen
                self.gfx = [[0; SCREEN_WIDTH]; SCREEN_HEIGHT];
                self.draw_flag = true;
                self.pc += 2;
            }
            0x00EE => {
                // return from subroutine
                if self.sp == 0 {
                    debug!("return at {:03X} with empty stack", self.pc);
                    return Err(VmError::StackUnderflow { pc: self.pc });
                }
                self.sp -= 1;
                let sp = self.sp as usize;
                self.pc = self.stack[sp] + 2;
                self.stack[sp] = 0;
            }
            // 0NNN calls native code on the original hardware
            _ => return Err(self.unknown(opcode)),
        }
        Ok(())
    }

    pub(super) fn jmp(&mut self, opcode: u16) -> Result<(), VmError> {
        // 1NNN
        self.pc = nnn(opcode);
        Ok(())
    }

    pub(super) fn call(&mut self, opcode: u16) -> Result<(), VmError> {
        // 2NNN
        let sp = self.sp as usize;
        if sp >= STACK_DEPTH {
            debug!("call to {:03X} with full stack", nnn(opcode));
            return Err(VmError::StackOverflow { pc: self.pc });
        }
        self.stack[sp] = self.pc;
        self.sp += 1;
        self.pc = nnn(opcode);
        Ok(())
    }

    pub(super) fn eb(&mut self, opcode: u16) -> Result<(), VmError> {
        // 3XNN
        self.pc += if self.v[x(opcode)] == nn(opcode) { 4 } else { 2 };
        Ok(())
    }

    pub(super) fn neb(&mut self, opcode: u16) -> Result<(), VmError> {
        // 4XNN
        self.pc += if self.v[x(opcode)] != nn(opcode) { 4 } else { 2 };
        Ok(())
    }

    pub(super) fn er(&mut self, opcode: u16) -> Result<(), VmError> {
        // 5XY0
        if opcode & 0xF != 0 {
            return Err(self.unknown(opcode));
        }
        self.pc += if self.v[x(opcode)] == self.v[y(opcode)] { 4 } else { 2 };
        Ok(())
    }

    pub(super) fn ld(&mut self, opcode: u16) -> Result<(), VmError> {
        // 6XNN
        self.v[x(opcode)] = nn(opcode);
        self.pc += 2;
        Ok(())
    }

    pub(super) fn addb(&mut self, opcode: u16) -> Result<(), VmError> {
        // 7XNN, VF untouched
        let x = x(opcode);
        self.v[x] = self.v[x].wrapping_add(nn(opcode));
        self.pc += 2;
        Ok(())
    }

    pub(super) fn alu(&mut self, opcode: u16) -> Result<(), VmError> {
        let x = x(opcode);
        let vx = self.v[x];
        let vy = self.v[y(opcode)];
        // flag is written after the result so VF as a destination ends up
        // holding the flag
        let (result, flag) = match opcode & 0xF {
            0x0 => (vy, None),
            0x1 => (vx | vy, None),
            0x2 => (vx & vy, None),
            0x3 => (vx ^ vy, None),
            0x4 => {
                let (sum, carry) = vx.overflowing_add(vy);
                (sum, Some(carry as u8))
            }
            // VF = 1 when there is no borrow
            0x5 => (vx.wrapping_sub(vy), Some((vx >= vy) as u8)),
            0x6 => (vx >> 1, Some(vx & 0x1)),
            0x7 => (vy.wrapping_sub(vx), Some((vy >= vx) as u8)),
            0xE => (vx << 1, Some(vx >> 7)),
            _ => return Err(self.unknown(opcode)),
        };
        self.v[x] = result;
        if let Some(flag) = flag {
            self.v[0xF] = flag;
        }
        self.pc += 2;
        Ok(())
    }

    pub(super) fn ner(&mut self, opcode: u16) -> Result<(), VmError> {
        // 9XY0
        if opcode & 0xF != 0 {
            return Err(self.unknown(opcode));
        }
        self.pc += if self.v[x(opcode)] != self.v[y(opcode)] { 4 } else { 2 };
        Ok(())
    }

    pub(super) fn si(&mut self, opcode: u16) -> Result<(), VmError> {
        // ANNN
        self.i = nnn(opcode);
        self.pc += 2;
        Ok(())
    }

    pub(super) fn jmpo(&mut self, opcode: u16) -> Result<(), VmError> {
        // BNNN, may land past the end of memory; the next fetch faults
        self.pc = nnn(opcode) + self.v[0] as u16;
        Ok(())
    }

    pub(super) fn rng(&mut self, opcode: u16) -> Result<(), VmError> {
        // CXNN
        let byte: u8 = self.rng.gen();
        self.v[x(opcode)] = nn(opcode) & byte;
        self.pc += 2;
        Ok(())
    }

    pub(super) fn draw(&mut self, opcode: u16) -> Result<(), VmError> {
        // DXYN
        // XOR an 8xN sprite read from I onto the screen at (VX, VY), wrapping
        // at the edges. VF = 1 if any lit pixel gets switched off.
        let col = self.v[x(opcode)] as usize;
        let row = self.v[y(opcode)] as usize;
        let sprite = self.mem_range(self.i, (opcode & 0xF) as usize)?;

        let mut collision = 0;
        for (dy, addr) in sprite.enumerate() {
            let bits = self.memory[addr];
            for dx in 0..8 {
                if bits & (0x80 >> dx) == 0 {
                    continue;
                }
                let pixel =
                    &mut self.gfx[(row + dy) % SCREEN_HEIGHT][(col + dx) % SCREEN_WIDTH];
                if *pixel == 1 {
                    collision = 1;
                }
                *pixel ^= 1;
            }
        }
        self.v[0xF] = collision;

        self.draw_flag = true;
        self.pc += 2;
        Ok(())
    }

    pub(super) fn key(&mut self, opcode: u16) -> Result<(), VmError> {
        // keys above 0xF don't exist and are never pressed
        let vx = self.v[x(opcode)] as usize;
        let pressed = self.key.get(vx).copied().unwrap_or(false);
        let skip = match opcode & 0xFF {
            0x9E => pressed,  // EX9E
            0xA1 => !pressed, // EXA1
            _ => return Err(self.unknown(opcode)),
        };
        self.pc += if skip { 4 } else { 2 };
        Ok(())
    }

    pub(super) fn ex(&mut self, opcode: u16) -> Result<(), VmError> {
        let x = x(opcode);
        match opcode & 0xFF {
            0x07 => self.v[x] = self.delay_timer,
            0x0A => {
                // hold pc on this instruction until a key is down
                match self.key.iter().position(|&pressed| pressed) {
                    Some(k) => self.v[x] = k as u8,
                    None => return Ok(()),
                }
            }
            0x15 => self.delay_timer = self.v[x],
            0x18 => self.sound_timer = self.v[x],
            0x1E => {
                // I is 16 bits and wraps; anything past 0xFFF faults on the
                // next memory access
                let sum = self.i as u32 + self.v[x] as u32;
                self.i = sum as u16;
                self.v[0xF] = (sum > 0xFFF) as u8;
            }
            0x29 => self.i = GLYPH_BYTES * (self.v[x] & 0xF) as u16,
            0x33 => {
                // 193 becomes [1, 9, 3] at I
                let digits = self.mem_range(self.i, 3)?;
                let vx = self.v[x];
                self.memory[digits].copy_from_slice(&[vx / 100, (vx / 10) % 10, vx % 10]);
            }
            0x55 => {
                // V0..=VX to memory at I
                let span = self.mem_range(self.i, x + 1)?;
                self.memory[span].copy_from_slice(&self.v[..=x]);
            }
            0x65 => {
                // memory at I to V0..=VX
                let span = self.mem_range(self.i, x + 1)?;
                self.v[..=x].copy_from_slice(&self.memory[span]);
            }
            _ => return Err(self.unknown(opcode)),
        }
        self.pc += 2;
        Ok(())
    }
}
