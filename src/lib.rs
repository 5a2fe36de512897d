//! GRIDCASTER - a minimal first-person raycasting renderer, over a fixed tile grid.
//! Main library.

mod defs;
mod gameloop;
mod gridmap;
mod input;
mod movement;
mod player;
mod raycaster;
mod render3d;
mod scrbuf;
mod sdl_wrapper;
mod texture;

pub use defs::*;
pub use gameloop::*;
pub use gridmap::*;
pub use input::*;
pub use movement::*;
pub use player::*;
pub use raycaster::*;
pub use render3d::*;
pub use scrbuf::*;
pub use sdl_wrapper::*;
pub use texture::*;
