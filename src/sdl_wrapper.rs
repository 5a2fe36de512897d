//! Thin wrapper over SDL2: window, event pump, frame clock and presentation.
//! The game itself only sees the `GraphicsLoop` and `Painter` traits.

use std::time::Duration;

use sdl2::event::Event;
use sdl2::pixels::PixelFormatEnum;
use tracing::{debug, info};

use crate::RGB;

/// What to do after each frame, to avoid hogging the CPU.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SleepKind {
    NONE,
    YIELD,
    /// Sleep for this many milliseconds.
    SLEEP(u64),
}

#[derive(Clone, Debug)]
pub struct SdlConfiguration {
    pub title: String,
    pub width: i32,
    pub height: i32,
    /// Each frame pixel is shown as a square of `pixel_size` x `pixel_size` window pixels.
    pub pixel_size: i32,
    pub sleep_kind: SleepKind,
}

impl SdlConfiguration {
    pub fn new(title: &str, width: i32, height: i32, pixel_size: i32, sleep_kind: SleepKind) -> Self {
        assert!(width > 0 && height > 0 && pixel_size > 0);
        Self {
            title: title.to_string(),
            width,
            height,
            pixel_size,
            sleep_kind,
        }
    }
}

/// Receives the finished frame, one pixel at a time.
pub trait Painter {
    fn draw_pixel(&mut self, x: i32, y: i32, color: RGB);
}

/// The game side of the main loop.
pub trait GraphicsLoop {
    /// Handle one SDL event. Returns false to quit.
    fn handle_event(&mut self, event: &Event) -> bool;
    /// Advance the game by `elapsed_time` seconds. Returns false to quit.
    fn update_state(&mut self, elapsed_time: f64) -> bool;
    fn paint(&self, painter: &mut dyn Painter);
}

/// Run the main loop until the window is closed or the game wants to quit.
pub fn run_game_loop(cfg: &SdlConfiguration, gfx_loop: &mut dyn GraphicsLoop) -> Result<(), String> {
    let sdl_context = sdl2::init()?;
    let video = sdl_context.video()?;
    let timer = sdl_context.timer()?;

    let win_w = (cfg.width * cfg.pixel_size) as u32;
    let win_h = (cfg.height * cfg.pixel_size) as u32;
    let window = video
        .window(&cfg.title, win_w, win_h)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;
    let mut canvas = window.into_canvas().accelerated().build().map_err(|e| e.to_string())?;
    let texture_creator = canvas.texture_creator();
    let mut texture = texture_creator
        .create_texture_streaming(PixelFormatEnum::RGB24, cfg.width as u32, cfg.height as u32)
        .map_err(|e| e.to_string())?;
    let mut event_pump = sdl_context.event_pump()?;
    info!("window open: {win_w} x {win_h}, frame {} x {}", cfg.width, cfg.height);

    let mut painter = FramePainter::new(cfg.width, cfg.height);
    let freq = timer.performance_frequency() as f64;
    let mut last_time = timer.performance_counter();

    'running: loop {
        for event in event_pump.poll_iter() {
            if let Event::Quit { .. } = event {
                debug!("quit requested");
                break 'running;
            }
            if !gfx_loop.handle_event(&event) {
                break 'running;
            }
        }

        // monotonic frame clock
        let now = timer.performance_counter();
        let elapsed_time = (now.saturating_sub(last_time) as f64) / freq;
        last_time = now;
        if !gfx_loop.update_state(elapsed_time) {
            break 'running;
        }

        // present
        gfx_loop.paint(&mut painter);
        texture
            .update(None, &painter.pixels, painter.pitch())
            .map_err(|e| e.to_string())?;
        canvas.copy(&texture, None, None)?;
        canvas.present();

        match cfg.sleep_kind {
            SleepKind::NONE => {}
            SleepKind::YIELD => std::thread::yield_now(),
            SleepKind::SLEEP(ms) => std::thread::sleep(Duration::from_millis(ms)),
        }
    }

    Ok(())
}

//----------------------
//  Internal stuff

/// Collects the frame as RGB24 bytes, ready to be uploaded in a streaming texture.
struct FramePainter {
    width: i32,
    height: i32,
    pixels: Vec<u8>,
}

impl FramePainter {
    fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize) * 3],
        }
    }

    #[inline]
    fn pitch(&self) -> usize {
        (self.width as usize) * 3
    }
}

impl Painter for FramePainter {
    #[inline]
    fn draw_pixel(&mut self, x: i32, y: i32, color: RGB) {
        if x >= 0 && y >= 0 && x < self.width && y < self.height {
            let idx = ((y * self.width + x) as usize) * 3;
            self.pixels[idx] = color.r;
            self.pixels[idx + 1] = color.g;
            self.pixels[idx + 2] = color.b;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_painter_layout() {
        let mut fp = FramePainter::new(3, 2);
        fp.draw_pixel(2, 1, RGB::new(1, 2, 3));
        fp.draw_pixel(5, 5, RGB::new(9, 9, 9));
        assert_eq!(9, fp.pitch());
        assert_eq!(&[1, 2, 3], &fp.pixels[15..18]);
        assert_eq!(15, fp.pixels.iter().filter(|b| **b == 0).count());
    }
}
