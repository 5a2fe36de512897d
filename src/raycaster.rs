//! Contains the ray casting algorithm (DDA grid traversal).
//!
//! Each ray starts in the player's cell and keeps two running distances:
//! to the next vertical grid line (the "X ray") and to the next horizontal
//! grid line (the "Y ray"). The shorter one is advanced, one cell at a time,
//! until a wall is entered or the ray leaves the grid.

use crate::player::normalize_angle;
use crate::{GridMap, MapCell, Player, EPSILON, MIN_DISTANCE};

/// Which kind of grid line the ray crossed, to enter the wall cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Side {
    /// A vertical grid line (the ray was stepping along X).
    X,
    /// A horizontal grid line (the ray was stepping along Y).
    Y,
}

/// Where and how a ray hit a wall.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Euclidean length of the ray, in map units.
    pub distance: f64,
    /// Distance projected on the player's facing direction (no fisheye).
    /// Never smaller than `MIN_DISTANCE`.
    pub perp_distance: f64,
    pub side: Side,
    pub material: u16,
    /// Horizontal texture coordinate, in `[0, 1)`.
    pub texture_u: f64,
}

/// Cast the ray for one screen column.
/// Returns `None` if the ray leaves the grid without hitting anything.
pub fn cast(player: &Player, grid: &GridMap, column: usize, num_columns: usize, fov: f64) -> Option<RayHit> {
    let mut rc = RayCaster::new(player, grid);
    rc.cast_ray(column_angle(player.angle, column, num_columns, fov))
}

/// Cast the rays for all the screen columns, from left to right.
pub fn cast_all(player: &Player, grid: &GridMap, num_columns: usize, fov: f64) -> Vec<Option<RayHit>> {
    let mut rc = RayCaster::new(player, grid);
    (0..num_columns)
        .map(|col| rc.cast_ray(column_angle(player.angle, col, num_columns, fov)))
        .collect()
}

/// The angle of the ray for a screen column, in `[0, 2*PI)`.
#[inline]
pub fn column_angle(player_angle: f64, column: usize, num_columns: usize, fov: f64) -> f64 {
    let rel = if num_columns == 0 {
        0.0
    } else {
        (column as f64) / (num_columns as f64)
    };
    normalize_angle(player_angle - fov / 2.0 + rel * fov)
}

pub struct RayCaster<'a> {
    grid: &'a GridMap,
    player_x: f64,
    player_y: f64,
    player_angle: f64,
    cell_w: f64,
    cell_h: f64,
    sin: f64,
    cos: f64,
    map_x: i32,
    map_y: i32,
    ray_x: Ray,
    ray_y: Ray,
}

impl<'a> RayCaster<'a> {
    /// Set up the ray caster, for casting multiple rays (at different angles) from the same origin.
    pub fn new(player: &Player, grid: &'a GridMap) -> Self {
        let (cell_w, cell_h) = grid.cell_size();
        Self {
            grid,
            player_x: player.x,
            player_y: player.y,
            player_angle: player.angle,
            cell_w,
            cell_h,
            sin: 0.0,
            cos: 0.0,
            map_x: 0,
            map_y: 0,
            ray_x: Default::default(),
            ray_y: Default::default(),
        }
    }

    pub fn cast_ray(&mut self, angle: f64) -> Option<RayHit> {
        self.prepare(angle);

        // a ray cannot cross more grid lines than this before leaving the grid
        let mut max_steps = 2 * (self.grid.width() + self.grid.height()) + 4;
        while max_steps > 0 {
            max_steps -= 1;

            // advance the shorter of the 2 rays
            let (side, dist) = if self.ray_x.dist < self.ray_y.dist {
                let dist = self.ray_x.dist;
                self.map_x += self.ray_x.dir;
                self.ray_x.dist += self.ray_x.scale;
                (Side::X, dist)
            } else {
                let dist = self.ray_y.dist;
                self.map_y += self.ray_y.dir;
                self.ray_y.dist += self.ray_y.scale;
                (Side::Y, dist)
            };

            match self.grid.cell(self.map_x, self.map_y) {
                // left the grid => miss
                None => return None,
                Some(MapCell::Empty) => {}
                Some(MapCell::Wall(material)) => return Some(self.make_hit(angle, side, dist, material)),
            }
        }

        None
    }

    //----------------

    fn prepare(&mut self, angle: f64) {
        (self.sin, self.cos) = angle.sin_cos();
        let (map_x, map_y) = self.grid.cell_at(self.player_x, self.player_y);
        self.map_x = map_x;
        self.map_y = map_y;
        self.ray_x = Ray::init(self.player_x, self.cos, map_x, self.cell_w);
        self.ray_y = Ray::init(self.player_y, self.sin, map_y, self.cell_h);
    }

    fn make_hit(&self, angle: f64, side: Side, distance: f64, material: u16) -> RayHit {
        // remove the fisheye effect
        let perp_distance = (distance * (angle - self.player_angle).cos()).max(MIN_DISTANCE);

        // find the texture relative position, mirrored so that
        // textures read left-to-right from whichever side they are seen
        let texture_u = match side {
            Side::X => {
                let y_spot = self.player_y + distance * self.sin;
                let ofs = y_spot.rem_euclid(self.cell_h) / self.cell_h;
                if self.ray_x.dir > 0 {
                    ofs
                } else {
                    1.0 - ofs
                }
            }
            Side::Y => {
                let x_spot = self.player_x + distance * self.cos;
                let ofs = x_spot.rem_euclid(self.cell_w) / self.cell_w;
                if self.ray_y.dir < 0 {
                    ofs
                } else {
                    1.0 - ofs
                }
            }
        };
        // exactly on a cell boundary => wrap back to the start of the texture
        let texture_u = if texture_u >= 1.0 { 0.0 } else { texture_u.max(0.0) };

        RayHit {
            distance,
            perp_distance,
            side,
            material,
            texture_u,
        }
    }
}

//--------------------------
// Internal stuff

/// One of the two axis-aligned rays.
#[derive(Default)]
struct Ray {
    /// distance (along the real ray) to the next grid line on this axis
    dist: f64,
    /// distance (along the real ray) between two consecutive grid lines
    scale: f64,
    dir: i32,
}

impl Ray {
    /// Compute direction, scale and initial distance along one axis.
    /// `pos` is the player's coordinate and `dir` the ray's direction component, on that axis.
    fn init(pos: f64, dir: f64, cell_idx: i32, cell_size: f64) -> Self {
        if dir > EPSILON {
            // moving forward on this axis => next line is at the end of the cell
            let delta = (cell_idx + 1) as f64 * cell_size - pos;
            Self {
                dist: delta / dir,
                scale: cell_size / dir,
                dir: 1,
            }
        } else if dir < -EPSILON {
            // moving backward => next line is at the start of the cell
            let delta = cell_idx as f64 * cell_size - pos;
            Self {
                dist: delta / dir,
                scale: -cell_size / dir,
                dir: -1,
            }
        } else {
            // parallel to the grid lines of this axis => never crosses them;
            // same as dividing by EPSILON, without the risk of overflow
            Self {
                dist: cell_size / EPSILON,
                scale: cell_size / EPSILON,
                dir: 0,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FOV;
    use std::f64::consts::{FRAC_PI_2, PI};

    const N: usize = 120;

    #[test]
    fn test_center_ray_hits_east_wall() {
        let grid = GridMap::reference();
        let player = Player::spawn(&grid);
        let hit = cast(&player, &grid, N / 2, N, FOV).unwrap();
        // the east wall starts at x = 7 * 30 = 210
        assert!((hit.perp_distance - 90.0).abs() < 1e-6);
        assert!((hit.distance - 90.0).abs() < 1e-6);
        assert_eq!(Side::X, hit.side);
        assert_eq!(20, hit.material);
        assert!((hit.texture_u - 0.0).abs() < 1e-6 || (hit.texture_u - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_facing_each_direction() {
        let grid = GridMap::reference();
        for (angle, side, dist) in [
            (0.0, Side::X, 90.0),
            (FRAC_PI_2, Side::Y, 90.0),
            (PI, Side::X, 90.0),
            (1.5 * PI, Side::Y, 90.0),
        ] {
            let player = Player::new(120.0, 120.0, angle);
            let mut rc = RayCaster::new(&player, &grid);
            let hit = rc.cast_ray(angle).unwrap();
            assert_eq!(side, hit.side, "angle {angle}");
            assert!((hit.perp_distance - dist).abs() < 1e-6, "angle {angle}");
        }
    }

    #[test]
    fn test_cast_is_deterministic() {
        let grid = GridMap::reference();
        let player = Player::new(77.3, 141.9, 2.2);
        for col in 0..N {
            let a = cast(&player, &grid, col, N, FOV);
            let b = cast(&player, &grid, col, N, FOV);
            assert_eq!(a, b);
            let a = a.unwrap();
            let b = b.unwrap();
            assert_eq!(a.perp_distance.to_bits(), b.perp_distance.to_bits());
            assert_eq!(a.texture_u.to_bits(), b.texture_u.to_bits());
        }
        // casting all at once gives the same results
        let all = cast_all(&player, &grid, N, FOV);
        for (col, hit) in all.iter().enumerate() {
            assert_eq!(cast(&player, &grid, col, N, FOV), *hit);
        }
    }

    #[test]
    fn test_flat_wall_has_no_fisheye() {
        let grid = GridMap::reference();
        let player = Player::spawn(&grid);
        let hits = cast_all(&player, &grid, N, FOV);
        let center = hits[N / 2].unwrap();
        let mut prev_dist = center.distance;
        // walking from the center to the right edge of the view
        for hit in hits[N / 2..].iter() {
            let hit = hit.unwrap();
            assert_eq!(Side::X, hit.side);
            assert!((hit.perp_distance - 90.0).abs() < 1e-6);
            assert!(hit.distance >= prev_dist);
            prev_dist = hit.distance;
        }
        // the leftmost ray is at -30 degrees
        let left = hits[0].unwrap();
        assert!((left.distance - 90.0 / (FOV / 2.0).cos()).abs() < 1e-6);
    }

    #[test]
    fn test_miss_when_leaving_grid() {
        // open grid: no walls at all
        let grid = GridMap::parse("...\n...\n...").unwrap();
        let player = Player::new(80.0, 45.0, 0.0);
        assert_eq!(None, cast(&player, &grid, N / 2, N, FOV));
        let all = cast_all(&player, &grid, N, FOV);
        assert!(all.iter().all(|h| h.is_none()));
    }

    #[test]
    fn test_hit_next_to_player_is_clamped() {
        let grid = GridMap::parse("....\n..#.\n....").unwrap();
        // standing right against the west face of the wall at (2,1)
        let player = Player::new(60.0 - 1e-9, 45.0, 0.0);
        let hit = cast(&player, &grid, N / 2, N, FOV).unwrap();
        assert_eq!(MIN_DISTANCE, hit.perp_distance);
        assert!(hit.perp_distance.is_finite());
    }

    #[test]
    fn test_texture_u_is_continuous_on_a_face() {
        let grid = GridMap::reference();
        let player = Player::new(120.0, 100.0, 0.0);
        let mut rc = RayCaster::new(&player, &grid);
        let a = rc.cast_ray(0.10).unwrap();
        let b = rc.cast_ray(0.11).unwrap();
        assert_eq!(Side::X, a.side);
        assert_eq!(Side::X, b.side);
        // both hit the plane x = 210; u follows the hit point's Y
        let ya = 100.0 + a.distance * 0.10_f64.sin();
        let yb = 100.0 + b.distance * 0.11_f64.sin();
        let expected = (yb - ya) / 30.0;
        assert!(((b.texture_u - a.texture_u) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_texture_u_is_mirrored_on_opposite_faces() {
        // a single wall cell at (2,1), seen from the west and from the east
        let grid = GridMap::parse(".....\n..#..\n.....").unwrap();
        let from_west = Player::new(15.0, 40.0, 0.0);
        let from_east = Player::new(135.0, 40.0, PI);
        let w = cast(&from_west, &grid, N / 2, N, FOV).unwrap();
        let e = cast(&from_east, &grid, N / 2, N, FOV).unwrap();
        assert_eq!(Side::X, w.side);
        assert_eq!(Side::X, e.side);
        // y = 40 is 1/3 into the cell
        assert!((w.texture_u - 1.0 / 3.0).abs() < 1e-6);
        assert!((e.texture_u - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_texture_u_range() {
        let grid = GridMap::reference();
        let player = Player::new(61.0, 170.0, 4.0);
        for hit in cast_all(&player, &grid, 360, 2.0 * PI).into_iter().flatten() {
            assert!(hit.texture_u >= 0.0 && hit.texture_u < 1.0);
            assert!(hit.perp_distance >= MIN_DISTANCE);
        }
    }

    #[test]
    fn test_column_angle() {
        assert!((column_angle(1.0, 0, 4, 0.4) - 0.8).abs() < 1e-12);
        assert!((column_angle(1.0, 2, 4, 0.4) - 1.0).abs() < 1e-12);
        assert!((column_angle(0.0, 0, 4, 0.4) - (2.0 * PI - 0.2)).abs() < 1e-12);
    }
}
