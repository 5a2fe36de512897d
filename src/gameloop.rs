//! Main game loop.
//! Also acts as a facade, to hold and manage all game objects
//! (grid, player, textures, renderer, inputs etc)

use crate::*;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use tracing::info;

/// Longest frame time used for movement, in seconds (e.g. after the window was dragged).
const MAX_ELAPSED_TIME: f64 = 0.1;

pub struct GameLoop {
    scrbuf: ScreenBuffer,
    grid: GridMap,
    player: Player,
    atlas: TextureAtlas,
    renderer: ThreeDRenderer,
    inputs: InputManager,
    fps: FpsCounter,
}

impl GameLoop {
    pub fn new(width: i32, height: i32, grid: GridMap, atlas: TextureAtlas) -> Self {
        let player = Player::spawn(&grid);
        Self {
            scrbuf: ScreenBuffer::new(width, height),
            grid,
            player,
            atlas,
            renderer: ThreeDRenderer::new(NUM_RAYS, FOV),
            inputs: InputManager::new(),
            fps: FpsCounter::default(),
        }
    }

    #[inline]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[inline]
    pub fn screen(&self) -> &ScreenBuffer {
        &self.scrbuf
    }

    /// One frame: move the player first, then render what it sees.
    pub fn step(&mut self, input: InputSnapshot, elapsed_time: f64) {
        let dt = elapsed_time.clamp(0.0, MAX_ELAPSED_TIME);
        advance(&mut self.player, &self.grid, input, dt);
        self.renderer
            .paint(&self.player, &self.grid, &self.atlas, &mut self.scrbuf);
    }
}

impl GraphicsLoop for GameLoop {
    fn handle_event(&mut self, event: &Event) -> bool {
        self.inputs.handle_event(event);

        if self.inputs.consume_key(Keycode::Escape) {
            return false;
        }
        if self.inputs.consume_key(Keycode::T) {
            let mode = self.renderer.mode().next();
            self.renderer.set_mode(mode);
            info!("shading mode: {mode}");
        }

        true
    }

    fn update_state(&mut self, elapsed_time: f64) -> bool {
        let input = self.inputs.snapshot();
        self.step(input, elapsed_time);
        self.fps.tick(elapsed_time);
        true
    }

    fn paint(&self, painter: &mut dyn Painter) {
        self.scrbuf.paint(painter);
    }
}

//----------------------
//  Internal stuff

/// Logs the frame rate, about once per second.
#[derive(Default)]
struct FpsCounter {
    frames: u32,
    time: f64,
}

impl FpsCounter {
    fn tick(&mut self, elapsed_time: f64) {
        self.frames += 1;
        self.time += elapsed_time.max(0.0);
        if self.time >= 1.0 {
            info!("FPS: {:.1}", self.frames as f64 / self.time);
            self.frames = 0;
            self.time = 0.0;
        }
    }
}
