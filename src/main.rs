//! GRIDCASTER - a minimal first-person raycasting renderer.
//! Main starting point.

use anyhow::{Context, Result};
use gridcaster::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const PIXEL_SIZE: i32 = 1;
const SLEEP_KIND: SleepKind = SleepKind::SLEEP(1);
const TEXTURE_FILE: &str = "textures.rgb";
const TEXTURE_SEED: u64 = 0x5EED;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // load the wall textures, or make some up
    let atlas = match TextureAtlas::load(TEXTURE_FILE) {
        Ok(atlas) => atlas,
        Err(msg) => {
            warn!("{msg} => using generated textures");
            TextureAtlas::generate(TEXTURE_COUNT, TEXTURE_SIZE, TEXTURE_SEED)
        }
    };
    info!("{} wall textures of {}x{}", atlas.count(), atlas.tex_size(), atlas.tex_size());

    // main game loop
    let sdl_config = SdlConfiguration::new("GRIDCASTER", SCREEN_WIDTH, SCREEN_HEIGHT, PIXEL_SIZE, SLEEP_KIND);
    let mut gameloop = GameLoop::new(SCREEN_WIDTH, SCREEN_HEIGHT, GridMap::reference(), atlas);
    run_game_loop(&sdl_config, &mut gameloop)
        .map_err(anyhow::Error::msg)
        .context("game loop failed")?;

    info!("GRIDCASTER finished OK :)");
    Ok(())
}
