use anyhow::{anyhow, Result};
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};
use sdl2::AudioSubsystem;

const TONE_HZ: f32 = 440.0;
const VOLUME: f32 = 0.2;
/// How many 60Hz frames a beep lasts.
const BEEP_FRAMES: u32 = 6;

struct SquareWave {
    phase_inc: f32,
    phase: f32,
}

impl AudioCallback for SquareWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = if self.phase < 0.5 { VOLUME } else { -VOLUME };
            self.phase = (self.phase + self.phase_inc) % 1.0;
        }
    }
}

/// Short square-wave tone played when the sound timer runs out.
pub struct Beeper {
    device: AudioDevice<SquareWave>,
    frames_left: u32,
}

impl Beeper {
    pub fn new(audio: &AudioSubsystem) -> Result<Self> {
        let desired = AudioSpecDesired {
            freq: Some(44_100),
            channels: Some(1),
            samples: None,
        };
        let device = audio
            .open_playback(None, &desired, |spec| SquareWave {
                phase_inc: TONE_HZ / spec.freq as f32,
                phase: 0.0,
            })
            .map_err(|e| anyhow!("{}", e))?;
        Ok(Self {
            device,
            frames_left: 0,
        })
    }

    pub fn beep(&mut self) {
        self.frames_left = BEEP_FRAMES;
        self.device.resume();
    }

    /// Call once per 60Hz frame; silences the tone once it has run its length.
    pub fn frame(&mut self) {
        if self.frames_left == 0 {
            return;
        }
        self.frames_left -= 1;
        if self.frames_left == 0 {
            self.device.pause();
        }
    }
}
