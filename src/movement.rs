//! Player movement: rotation, walking and collision against the grid.

use crate::player::{bounding_box_at, normalize_angle};
use crate::{GridMap, Player, MOVE_SPEED, ROTATION_SPEED};

/// The held movement keys, sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub forward: bool,
    pub backward: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
}

/// Advance the player by `dt` seconds, according to the held keys.
///
/// Collisions are resolved per axis: if the full move is blocked, the player
/// slides along X only, then Y only, and stays put if both are blocked.
/// The whole bounding box never ends up in a solid cell or outside the grid.
pub fn advance(player: &mut Player, grid: &GridMap, input: InputSnapshot, dt: f64) {
    let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

    // rotate
    if input.rotate_left {
        player.angle -= ROTATION_SPEED * dt;
    }
    if input.rotate_right {
        player.angle += ROTATION_SPEED * dt;
    }
    player.angle = normalize_angle(player.angle);

    // walk along the (updated) facing direction,
    // but never further than the world's diagonal in one frame
    let (dx, dy) = player.direction();
    let diagonal = grid.world_width().hypot(grid.world_height());
    let dir = input.forward as i32 - input.backward as i32;
    let walk = dir as f64 * (MOVE_SPEED * dt).min(diagonal);
    let move_x = dx * walk;
    let move_y = dy * walk;

    // split long moves, so a single step can never jump over a wall
    let (cw, ch) = grid.cell_size();
    let max_step = (cw.min(ch).min(player.w).min(player.h) / 2.0).max(0.5);
    let len = walk.abs();
    let steps = (len / max_step).ceil().max(1.0) as usize;
    let step_x = move_x / steps as f64;
    let step_y = move_y / steps as f64;
    for _ in 0..steps {
        if !try_move(player, grid, step_x, step_y) {
            break;
        }
    }

    clamp_to_grid(player, grid);
}

//----------------------
//  Internal stuff

/// Returns false when the player is stuck and further steps are pointless.
fn try_move(player: &mut Player, grid: &GridMap, step_x: f64, step_y: f64) -> bool {
    if step_x == 0.0 && step_y == 0.0 {
        return false;
    }
    let new_x = player.x + step_x;
    let new_y = player.y + step_y;

    if fits(grid, new_x, new_y, player.w, player.h) {
        player.x = new_x;
        player.y = new_y;
    } else if step_x != 0.0 && fits(grid, new_x, player.y, player.w, player.h) {
        player.x = new_x;
    } else if step_y != 0.0 && fits(grid, player.x, new_y, player.w, player.h) {
        player.y = new_y;
    } else {
        return false;
    }
    true
}

/// Check that all 4 corners of the bounding box are in walkable cells.
/// Corners outside the grid do not fit.
fn fits(grid: &GridMap, x: f64, y: f64, w: f64, h: f64) -> bool {
    let (left, top, right, bottom) = bounding_box_at(x, y, w, h);
    [(left, top), (right, top), (left, bottom), (right, bottom)]
        .iter()
        .all(|&(cx, cy)| !grid.is_solid_at(cx, cy))
}

fn clamp_to_grid(player: &mut Player, grid: &GridMap) {
    let half_w = player.w / 2.0;
    let half_h = player.h / 2.0;
    let max_x = grid.world_width() - half_w;
    let max_y = grid.world_height() - half_h;
    if half_w <= max_x {
        player.x = player.x.clamp(half_w, max_x);
    }
    if half_h <= max_y {
        player.y = player.y.clamp(half_h, max_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_4, PI, TAU};

    const FORWARD: InputSnapshot = InputSnapshot {
        forward: true,
        backward: false,
        rotate_left: false,
        rotate_right: false,
    };

    #[test]
    fn test_no_input_no_change() {
        let grid = GridMap::reference();
        let mut player = Player::spawn(&grid);
        let before = player.clone();
        advance(&mut player, &grid, InputSnapshot::default(), 0.5);
        assert_eq!(before, player);
    }

    #[test]
    fn test_rotation_wraps() {
        let grid = GridMap::reference();
        let mut player = Player::spawn(&grid);
        let left = InputSnapshot {
            rotate_left: true,
            ..Default::default()
        };
        advance(&mut player, &grid, left, 0.1);
        assert!((player.angle - (2.0 * PI - 0.25)).abs() < 1e-9);

        let right = InputSnapshot {
            rotate_right: true,
            ..Default::default()
        };
        advance(&mut player, &grid, right, 0.2);
        assert!((player.angle - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_walk_forward_and_backward() {
        let grid = GridMap::reference();
        let mut player = Player::spawn(&grid);
        advance(&mut player, &grid, FORWARD, 0.1);
        assert!((player.x - 135.0).abs() < 1e-9);
        assert!((player.y - 120.0).abs() < 1e-9);

        let back = InputSnapshot {
            backward: true,
            ..Default::default()
        };
        advance(&mut player, &grid, back, 0.1);
        assert!((player.x - 120.0).abs() < 1e-9);

        // both keys cancel out
        let both = InputSnapshot {
            forward: true,
            backward: true,
            ..Default::default()
        };
        advance(&mut player, &grid, both, 0.1);
        assert!((player.x - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_stops_at_wall() {
        let grid = GridMap::reference();
        let mut player = Player::spawn(&grid);
        for _ in 0..100 {
            advance(&mut player, &grid, FORWARD, 0.05);
        }
        // interior ends at x = 210, the box is 9 wide
        let (_, _, right, _) = player.bounding_box();
        assert!(right < 210.0);
        assert!(right > 205.0);
    }

    #[test]
    fn test_slides_along_wall() {
        let grid = GridMap::reference();
        // close to the east wall, heading north-east (south-east in screen coords)
        let mut player = Player::new(204.0, 100.0, FRAC_PI_4);
        advance(&mut player, &grid, FORWARD, 0.1);
        // X is blocked by the wall, Y keeps moving
        assert!(player.x + player.w / 2.0 < 210.0);
        assert!(player.y > 100.0 + 5.0);
    }

    #[test]
    fn test_slides_past_wall_corner() {
        // a single pillar at (2,1); moving diagonally into its corner
        let grid = GridMap::parse("#####\n#.#.#\n#...#\n#...#\n#####").unwrap();
        let mut player = Player::new(55.0, 64.0, -FRAC_PI_4);
        let start = player.clone();
        advance(&mut player, &grid, FORWARD, 0.05);
        // X is blocked by the pillar, but the player still slides along Y
        assert_eq!(start.x, player.x);
        assert!(player.y < start.y - 1.0);
        assert!(fits(&grid, player.x, player.y, player.w, player.h));
    }

    #[test]
    fn test_huge_dt_does_not_tunnel() {
        let grid = GridMap::parse("#######\n#..#..#\n#######").unwrap();
        let mut player = Player::new(45.0, 45.0, 0.0);
        advance(&mut player, &grid, FORWARD, 10.0);
        assert!(player.x + player.w / 2.0 < 90.0);
    }

    #[test]
    fn test_bad_dt_is_ignored() {
        let grid = GridMap::reference();
        let mut player = Player::spawn(&grid);
        let before = player.clone();
        advance(&mut player, &grid, FORWARD, -1.0);
        advance(&mut player, &grid, FORWARD, f64::NAN);
        assert_eq!(before, player);
    }

    fn assert_box_inside(grid: &GridMap, player: &Player) {
        let (left, top, right, bottom) = player.bounding_box();
        assert!(left >= 0.0 && top >= 0.0, "{player:?}");
        assert!(right <= grid.world_width() && bottom <= grid.world_height(), "{player:?}");
        assert!(fits(grid, player.x, player.y, player.w, player.h), "{player:?}");
    }

    #[test]
    fn test_enormous_dt_terminates_in_bounds() {
        let grid = GridMap::reference();
        let spinning = InputSnapshot {
            rotate_right: true,
            ..FORWARD
        };
        for dt in [1e6, 1e300, f64::MAX] {
            for input in [FORWARD, spinning] {
                let mut player = Player::new(120.0, 120.0, 0.3);
                advance(&mut player, &grid, input, dt);
                assert_box_inside(&grid, &player);
                assert!(player.angle >= 0.0 && player.angle < TAU, "{player:?}");
            }
        }
    }

    #[test]
    fn test_open_grid_keeps_player_inside() {
        // no border wall: the grid edge itself stops the player
        let grid = GridMap::parse("...\n...\n...").unwrap();
        for k in 0..6 {
            let angle = k as f64 * PI / 3.0 + 0.1;
            let mut player = Player::new(45.0, 45.0, angle);
            for _ in 0..200 {
                advance(&mut player, &grid, FORWARD, 0.05);
                assert_box_inside(&grid, &player);
            }
            // pressed against the edge, still inside [0, 90)
            let (left, top, right, bottom) = player.bounding_box();
            assert!(left >= 0.0 && top >= 0.0 && right < 90.0 && bottom < 90.0, "{player:?}");
        }
    }
}
