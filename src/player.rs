//! The player - position, facing angle and collision box.

use std::f64::consts::TAU;

use crate::{GridMap, PLAYER_SIZE};

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    /// Position, in map units (not cell indices).
    pub x: f64,
    pub y: f64,
    /// Facing angle, always in `[0, 2*PI)`.
    pub angle: f64,
    /// Collision box size.
    pub w: f64,
    pub h: f64,
}

impl Player {
    pub fn new(x: f64, y: f64, angle: f64) -> Self {
        Self {
            x,
            y,
            angle: normalize_angle(angle),
            w: PLAYER_SIZE,
            h: PLAYER_SIZE,
        }
    }

    /// Start pose: the center of the grid, facing east.
    pub fn spawn(grid: &GridMap) -> Self {
        Self::new(grid.world_width() / 2.0, grid.world_height() / 2.0, 0.0)
    }

    /// Unit direction vector, derived from the angle.
    #[inline]
    pub fn direction(&self) -> (f64, f64) {
        let (sin, cos) = self.angle.sin_cos();
        (cos, sin)
    }

    /// Returns (left, top, right, bottom), in map units.
    #[inline]
    pub fn bounding_box(&self) -> (f64, f64, f64, f64) {
        bounding_box_at(self.x, self.y, self.w, self.h)
    }
}

/// Wrap an angle into `[0, 2*PI)`. Infinite or NaN angles become 0.
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a.is_finite() && a < TAU {
        a
    } else {
        0.0
    }
}

#[inline]
pub(crate) fn bounding_box_at(x: f64, y: f64, w: f64, h: f64) -> (f64, f64, f64, f64) {
    (x - w / 2.0, y - h / 2.0, x + w / 2.0, y + h / 2.0)
}
