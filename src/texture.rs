//! TextureAtlas - the wall textures, as one flat RGB buffer.
//! Texture `m - 1` is used for material `m`; each texture is stored row by row.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::debug;

use crate::{RGB, TEXTURE_SIZE};

pub struct TextureAtlas {
    tex_size: usize,
    count: usize,
    texels: Bytes,
}

impl TextureAtlas {
    /// Wrap a raw RGB buffer holding square textures of `tex_size` x `tex_size`.
    pub fn from_bytes(tex_size: usize, texels: Bytes) -> Result<Self, String> {
        let tex_len = tex_size * tex_size * 3;
        if tex_len == 0 {
            return Err(String::from("Texture size cannot be zero"));
        }
        if texels.is_empty() || texels.len() % tex_len != 0 {
            return Err(format!(
                "Texture atlas size ({} bytes) is not a multiple of {tex_len}",
                texels.len()
            ));
        }
        let count = texels.len() / tex_len;
        Ok(Self {
            tex_size,
            count,
            texels,
        })
    }

    /// Load a raw RGB atlas file, made of 32x32 textures.
    pub fn load(filename: &str) -> Result<Self, String> {
        let data = std::fs::read(filename).map_err(|e| format!("Cannot read texture atlas {filename}: {e}"))?;
        let atlas = Self::from_bytes(TEXTURE_SIZE, Bytes::from(data))?;
        debug!("loaded {} textures from {filename}", atlas.count);
        Ok(atlas)
    }

    /// Build a procedural atlas: bricks, stones and planks in random tints.
    /// The same seed always produces the same atlas.
    pub fn generate(count: usize, tex_size: usize, seed: u64) -> Self {
        let rng = fastrand::Rng::with_seed(seed);
        let mut buf = BytesMut::with_capacity(count * tex_size * tex_size * 3);
        for idx in 0..count {
            let base = RGB::new(rng.u8(90..=230), rng.u8(60..=200), rng.u8(40..=180));
            for row in 0..tex_size {
                for col in 0..tex_size {
                    let factor = match idx % 3 {
                        0 => brick_shade(row, col, tex_size),
                        1 => stone_shade(row, col, tex_size),
                        _ => plank_shade(col, tex_size),
                    };
                    // a bit of noise, so it does not look too flat
                    let noise = 0.9 + 0.1 * rng.f64();
                    let c = base.scaled(factor * noise);
                    buf.put_u8(c.r);
                    buf.put_u8(c.g);
                    buf.put_u8(c.b);
                }
            }
        }
        Self {
            tex_size,
            count,
            texels: buf.freeze(),
        }
    }

    #[inline]
    pub fn tex_size(&self) -> usize {
        self.tex_size
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Get one texel of the texture used by a material.
    /// Returns `None` for material 0, unknown materials or out of range coordinates.
    #[inline]
    pub fn texel(&self, material: u16, row: usize, col: usize) -> Option<RGB> {
        let m = material as usize;
        if m == 0 || m > self.count || row >= self.tex_size || col >= self.tex_size {
            return None;
        }
        let idx = (((m - 1) * self.tex_size + row) * self.tex_size + col) * 3;
        let rgb = self.texels.get(idx..idx + 3)?;
        Some(RGB::new(rgb[0], rgb[1], rgb[2]))
    }
}

//----------------------
//  Internal stuff

fn brick_shade(row: usize, col: usize, size: usize) -> f64 {
    let brick_h = (size / 4).max(1);
    let brick_w = (size / 2).max(1);
    // every other brick row is shifted by half a brick
    let shift = if (row / brick_h) % 2 == 0 { 0 } else { brick_w / 2 };
    if row % brick_h == 0 || (col + shift) % brick_w == 0 {
        0.45
    } else {
        1.0
    }
}

fn stone_shade(row: usize, col: usize, size: usize) -> f64 {
    let cell = (size / 3).max(1);
    let edge = row % cell == 0 || col % cell == 0;
    let checker = ((row / cell) + (col / cell)) % 2 == 0;
    match (edge, checker) {
        (true, _) => 0.5,
        (false, true) => 1.0,
        (false, false) => 0.8,
    }
}

fn plank_shade(col: usize, size: usize) -> f64 {
    let plank = (size / 4).max(1);
    if col % plank == 0 {
        0.55
    } else {
        0.85 + 0.15 * ((col % plank) as f64 / plank as f64)
    }
}
