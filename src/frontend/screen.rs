use anyhow::{anyhow, Result};
use chip8::{Framebuffer, SCREEN_HEIGHT, SCREEN_WIDTH};
use sdl2::gfx::primitives::DrawRenderer;
use sdl2::pixels::Color;
use sdl2::render::Canvas;
use sdl2::video::Window;
use sdl2::VideoSubsystem;

const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 0xFF };
const WHITE: Color = Color { r: 0xFF, g: 0xFF, b: 0xFF, a: 0xFF };

/// Largest scale whose cell corners still fit the `i16` coordinates taken by
/// the gfx primitives.
pub const MAX_SCALE: u32 = 512;

/// Window showing the framebuffer, each CHIP-8 pixel as a `scale`-sized square.
pub struct Screen {
    canvas: Canvas<Window>,
    scale: u32,
}

impl Screen {
    pub fn new(video: &VideoSubsystem, title: &str, scale: u32) -> Result<Self> {
        let window = video
            .window(
                title,
                SCREEN_WIDTH as u32 * scale,
                SCREEN_HEIGHT as u32 * scale,
            )
            .position_centered()
            .build()
            .map_err(|e| anyhow!("{}", e))?;
        let mut canvas = window
            .into_canvas()
            .build()
            .map_err(|e| anyhow!("{}", e))?;

        canvas.set_draw_color(BLACK);
        canvas.clear();
        canvas.present();

        Ok(Self { canvas, scale })
    }

    pub fn draw(&mut self, gfx: &Framebuffer) -> Result<()> {
        self.canvas.set_draw_color(BLACK);
        self.canvas.clear();
        for (row, line) in gfx.iter().enumerate() {
            for (col, &p) in line.iter().enumerate() {
                if p == 0 {
                    continue;
                }
                let (x1, y1, x2, y2) = cell_bounds(row, col, self.scale);
                self.canvas
                    .box_(x1, y1, x2, y2, WHITE)
                    .map_err(|e| anyhow!("{}", e))?;
            }
        }
        self.canvas.present();
        Ok(())
    }
}

/// Inclusive window-space corners of the cell at (`row`, `col`). `scale` is
/// clamped to 1..=`MAX_SCALE`.
fn cell_bounds(row: usize, col: usize, scale: u32) -> (i16, i16, i16, i16) {
    let s = scale.max(1).min(MAX_SCALE) as i32;
    let x = col as i32 * s;
    let y = row as i32 * s;
    (x as i16, y as i16, (x + s - 1) as i16, (y + s - 1) as i16)
}
