//! ThreeDRenderer - renders the 3D world.
//! Turns each column's ray hit into a vertical wall strip, textured or flat shaded.

use strum::IntoEnumIterator;

use crate::*;

const SKY_COLOR: RGB = RGB::new(50, 50, 120);
const FLOOR_COLOR: RGB = RGB::new(120, 120, 50);
const FLAT_X_COLOR: RGB = RGB::new(150, 150, 150);
const FLAT_Y_COLOR: RGB = RGB::new(200, 200, 200);

/// How the wall strips are colored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display, strum_macros::EnumIter)]
pub enum ShadingMode {
    Textured,
    Flat,
}

impl ShadingMode {
    /// The next mode, wrapping around.
    pub fn next(self) -> Self {
        ShadingMode::iter()
            .cycle()
            .skip_while(|m| *m != self)
            .nth(1)
            .unwrap_or(self)
    }
}

/// Where the colors of a wall strip come from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColorSource {
    Textured { material: u16, texture_u: f64, shade: f64 },
    Flat(RGB),
}

/// The on-screen wall strip for one column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallProjection {
    pub screen_height: i32,
    /// Top of the strip; negative when the strip is taller than the screen.
    pub y_offset: i32,
    pub color: ColorSource,
}

/// Directional lighting: walls hit on a Y side are darker.
#[inline]
pub fn shade_factor(side: Side) -> f64 {
    match side {
        Side::X => SHADE_X_SIDE,
        Side::Y => SHADE_Y_SIDE,
    }
}

/// Project a ray hit on the screen, as a vertically centered strip.
#[inline]
pub fn project(hit: &RayHit, mode: ShadingMode) -> WallProjection {
    project_on(hit, mode, SCREEN_HEIGHT)
}

/// Same as `project`, for a screen that is `screen_total` pixels high.
pub fn project_on(hit: &RayHit, mode: ShadingMode, screen_total: i32) -> WallProjection {
    let dist = hit.perp_distance.max(MIN_DISTANCE);
    let height = (screen_total as f64) * WALL_HEIGHT_SCALE / dist;
    // MAX_WALL_HEIGHT is 3 screens high
    let max_height = (screen_total * MAX_WALL_HEIGHT / SCREEN_HEIGHT) as f64;
    let screen_height = height.clamp(0.0, max_height) as i32;
    let y_offset = (screen_total - screen_height) / 2;

    let shade = shade_factor(hit.side);
    let color = match mode {
        ShadingMode::Textured => ColorSource::Textured {
            material: hit.material,
            texture_u: hit.texture_u,
            shade,
        },
        ShadingMode::Flat => ColorSource::Flat(match hit.side {
            Side::X => FLAT_X_COLOR,
            Side::Y => FLAT_Y_COLOR,
        }),
    };

    WallProjection {
        screen_height,
        y_offset,
        color,
    }
}

/// The color of one pixel of a wall strip, `pixel_offset` rows below the strip's top.
pub fn strip_texel(atlas: &TextureAtlas, proj: &WallProjection, pixel_offset: i32) -> RGB {
    match proj.color {
        ColorSource::Flat(color) => color,
        ColorSource::Textured {
            material,
            texture_u,
            shade,
        } => {
            let ts = atlas.tex_size();
            if ts == 0 || proj.screen_height <= 0 {
                return MISSING_TEXEL;
            }
            let row = ((pixel_offset.max(0) as usize) * ts / (proj.screen_height as usize)) % ts;
            let col = ((texture_u * ts as f64) as usize).min(ts - 1);
            atlas
                .texel(material, row, col)
                .map_or(MISSING_TEXEL, |c| c.scaled(shade))
        }
    }
}

pub struct ThreeDRenderer {
    num_rays: usize,
    fov: f64,
    mode: ShadingMode,
}

impl ThreeDRenderer {
    pub fn new(num_rays: usize, fov: f64) -> Self {
        assert!(num_rays > 0, "Need at least one ray");
        Self {
            num_rays,
            fov,
            mode: ShadingMode::Textured,
        }
    }

    #[inline]
    pub fn mode(&self) -> ShadingMode {
        self.mode
    }

    #[inline]
    pub fn set_mode(&mut self, mode: ShadingMode) {
        self.mode = mode;
    }

    pub fn paint(&self, player: &Player, grid: &GridMap, atlas: &TextureAtlas, surface: &mut dyn Surface) {
        let w = surface.width();
        let h = surface.height();

        // paint sky and floor first
        surface.fill_rect(Rect::new(0, 0, w, h / 2), SKY_COLOR);
        surface.fill_rect(Rect::new(0, h / 2, w, h - h / 2), FLOOR_COLOR);

        let strip_width = (w / self.num_rays as i32).max(1);
        let hits = cast_all(player, grid, self.num_rays, self.fov);
        for (col, hit) in hits.iter().enumerate() {
            // a miss leaves only the background
            let Some(hit) = hit else {
                continue;
            };
            let proj = project_on(hit, self.mode, h);
            let x0 = (col as i32) * strip_width;
            match proj.color {
                ColorSource::Flat(color) => {
                    surface.fill_rect(Rect::new(x0, proj.y_offset, strip_width, proj.screen_height), color);
                }
                ColorSource::Textured { .. } => {
                    self.paint_textured_strip(&proj, x0, strip_width, atlas, surface);
                }
            }
        }
    }

    //----------------

    /// Paint a textured strip as square points, only over the visible rows.
    fn paint_textured_strip(
        &self,
        proj: &WallProjection,
        x0: i32,
        strip_width: i32,
        atlas: &TextureAtlas,
        surface: &mut dyn Surface,
    ) {
        let top = proj.y_offset;
        let bottom = proj.y_offset + proj.screen_height;
        // skip the rows above the screen, keeping the strip's row grid
        let first = if top < 0 {
            top + ((-top) / strip_width) * strip_width
        } else {
            top
        };
        let last = bottom.min(surface.height());
        let cx = x0 + strip_width / 2;
        let mut y = first;
        while y < last {
            let color = strip_texel(atlas, proj, y - top);
            surface.draw_point((cx, y + strip_width / 2), color, strip_width);
            y += strip_width;
        }
    }
}

//----------------------
//  Internal stuff

// painted when a material has no texture
const MISSING_TEXEL: RGB = RGB::new(255, 0, 255);
