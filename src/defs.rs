//!  Various constants and small definitions.

use std::f64::consts::PI;

// grid dimensions (in cells) and cell size (in map units)
pub const GRID_WIDTH: usize = 8;
pub const GRID_HEIGHT: usize = 8;
pub const CELL_WIDTH: f64 = 30.0;
pub const CELL_HEIGHT: f64 = 30.0;

// screen and view
pub const SCREEN_WIDTH: i32 = 1200;
pub const SCREEN_HEIGHT: i32 = 800;
pub const NUM_RAYS: usize = 120;
pub const FOV: f64 = 60.0 * PI / 180.0;

// movement speeds: map units per second, radians per second
pub const MOVE_SPEED: f64 = 150.0;
pub const ROTATION_SPEED: f64 = 2.5;

// the player's bounding box is 1/25 of the (240 x 240) map
pub const PLAYER_SIZE: f64 = 9.0;

// projection: wall height = SCREEN_HEIGHT * WALL_HEIGHT_SCALE / distance
pub const WALL_HEIGHT_SCALE: f64 = 25.0;
pub const MAX_WALL_HEIGHT: i32 = SCREEN_HEIGHT * 3;
pub const MIN_DISTANCE: f64 = 0.1;

// directional lighting
pub const SHADE_X_SIDE: f64 = 1.0;
pub const SHADE_Y_SIDE: f64 = 0.7;

// texture atlas
pub const TEXTURE_SIZE: usize = 32;
pub const TEXTURE_COUNT: usize = 20;

/// Direction components smaller than this are treated as zero.
pub const EPSILON: f64 = 1e-6;
