extern crate sdl2;

mod frontend;

use anyhow::{anyhow, Context, Result};
use chip8::{Chip8, Config};
use clap::Parser;
use frontend::audio::Beeper;
use frontend::keymap::keypad_index;
use frontend::screen::{Screen, MAX_SCALE};
use log::{error, info};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const TIMER_HZ: u32 = 60;

#[derive(Parser)]
struct Args {
    /// CHIP-8 program image to run
    rom: PathBuf,

    /// Window pixels per CHIP-8 pixel
    #[arg(
        long,
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..=MAX_SCALE as i64)
    )]
    scale: u32,

    /// Instructions executed per second
    #[arg(long, default_value_t = 500)]
    cpu_hz: u32,

    /// Fixed seed for the random number instruction
    #[arg(long)]
    seed: Option<u64>,

    /// Halt on unknown opcodes instead of skipping them
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Don't sound the buzzer
    #[arg(long, default_value_t = false)]
    mute: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let program = std::fs::read(&args.rom)
        .with_context(|| format!("reading {}", args.rom.display()))?;
    let mut emu = Chip8::with_config(Config {
        seed: args.seed,
        strict_opcodes: args.strict,
    });
    emu.load_program(&program)?;

    let sdl_ctx = sdl2::init().map_err(|e| anyhow!("{}", e))?;
    let video = sdl_ctx.video().map_err(|e| anyhow!("{}", e))?;
    let rom_name = args
        .rom
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut screen = Screen::new(&video, &format!("CHIP-8 - {}", rom_name), args.scale)?;
    let mut beeper = if args.mute {
        None
    } else {
        let audio = sdl_ctx.audio().map_err(|e| anyhow!("{}", e))?;
        Some(Beeper::new(&audio)?)
    };
    let mut event_pump = sdl_ctx.event_pump().map_err(|e| anyhow!("{}", e))?;

    let frame = Duration::from_secs(1) / TIMER_HZ;
    let steps_per_frame = (args.cpu_hz / TIMER_HZ).max(1);
    info!(
        "running {} at {} instructions per frame",
        rom_name, steps_per_frame
    );

    'main: loop {
        let frame_start = Instant::now();

        for e in event_pump.poll_iter() {
            match e {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'main,
                Event::KeyDown {
                    keycode: Some(k),
                    repeat: false,
                    ..
                } => {
                    if let Some(key) = keypad_index(k) {
                        emu.set_key(key, true);
                    }
                }
                Event::KeyUp {
                    keycode: Some(k), ..
                } => {
                    if let Some(key) = keypad_index(k) {
                        emu.set_key(key, false);
                    }
                }
                _ => {}
            }
        }

        let mut redraw = false;
        for _ in 0..steps_per_frame {
            match emu.step() {
                Ok(step) => redraw |= step.redraw,
                Err(e) => {
                    error!("halting: {}", e);
                    return Err(e.into());
                }
            }
        }
        if redraw {
            screen.draw(emu.gfx())?;
        }

        let beep = emu.tick();
        if let Some(beeper) = beeper.as_mut() {
            if beep {
                beeper.beep();
            }
            beeper.frame();
        }

        if let Some(rest) = frame.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_range() {
        let args = Args::try_parse_from(["chip8", "pong.ch8", "--scale", "512"]).unwrap();
        assert_eq!(args.scale, MAX_SCALE);
        assert!(Args::try_parse_from(["chip8", "pong.ch8", "--scale", "513"]).is_err());
        assert!(Args::try_parse_from(["chip8", "pong.ch8", "--scale", "0"]).is_err());
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["chip8", "pong.ch8"]).unwrap();
        assert_eq!(args.scale, 10);
        assert_eq!(args.cpu_hz, 500);
        assert_eq!(args.seed, None);
        assert!(!args.strict);
    }
}
