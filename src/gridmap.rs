//! The tile grid - a fixed-size 2D array of map cells.
//! Every lookup is bounds-checked: anything outside the grid counts as solid.

use crate::{CELL_HEIGHT, CELL_WIDTH, GRID_HEIGHT, GRID_WIDTH, TEXTURE_COUNT};

/// The contents of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapCell {
    Empty,
    /// A wall, with its material id (1-based, indexes the texture atlas).
    Wall(u16),
}

impl MapCell {
    #[inline]
    pub fn from_material(material: u16) -> Self {
        if material == 0 {
            MapCell::Empty
        } else {
            MapCell::Wall(material)
        }
    }

    #[inline]
    pub fn is_solid(&self) -> bool {
        matches!(self, MapCell::Wall(_))
    }
}

/// The grid itself. Immutable once built.
#[derive(Clone, Debug)]
pub struct GridMap {
    width: usize,
    height: usize,
    cell_width: f64,
    cell_height: f64,
    cells: Vec<MapCell>,
}

impl GridMap {
    /// Build a grid from raw material ids, stored row by row.
    pub fn new(width: usize, height: usize, materials: &[u16]) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!("Invalid grid size: {width} x {height}"));
        }
        if materials.len() != width * height {
            return Err(format!(
                "Grid of {width} x {height} needs {} cells, got {}",
                width * height,
                materials.len()
            ));
        }
        let cells = materials.iter().map(|m| MapCell::from_material(*m)).collect();
        Ok(Self {
            width,
            height,
            cell_width: CELL_WIDTH,
            cell_height: CELL_HEIGHT,
            cells,
        })
    }

    /// Parse a grid from text rows.
    /// `.` or space = empty, `#` = material 1, `1`..`9` = that material.
    pub fn parse(text: &str) -> Result<Self, String> {
        let rows: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).filter(|l| !l.is_empty()).collect();
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);

        let mut materials = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(format!("Map row {y} has {} cells, expected {width}", row.chars().count()));
            }
            for (x, ch) in row.chars().enumerate() {
                let material = match ch {
                    '.' | ' ' => 0,
                    '#' => 1,
                    '1'..='9' => ch as u16 - '0' as u16,
                    _ => return Err(format!("Unknown map cell '{ch}' at ({x},{y})")),
                };
                materials.push(material);
            }
        }

        Self::new(width, height, &materials)
    }

    /// The reference map: solid border around an empty interior.
    /// Border walls cycle through all the available materials.
    pub fn reference() -> Self {
        let (w, h) = (GRID_WIDTH, GRID_HEIGHT);
        let mut materials = vec![0_u16; w * h];
        for y in 0..h {
            for x in 0..w {
                if y == 0 || x == 0 || x == w - 1 || y == h - 1 {
                    let idx = y * w + x;
                    materials[idx] = (idx % TEXTURE_COUNT) as u16 + 1;
                }
            }
        }
        Self {
            width: w,
            height: h,
            cell_width: CELL_WIDTH,
            cell_height: CELL_HEIGHT,
            cells: materials.into_iter().map(MapCell::from_material).collect(),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn cell_size(&self) -> (f64, f64) {
        (self.cell_width, self.cell_height)
    }

    /// Width of the whole grid, in map units.
    #[inline]
    pub fn world_width(&self) -> f64 {
        self.width as f64 * self.cell_width
    }

    /// Height of the whole grid, in map units.
    #[inline]
    pub fn world_height(&self) -> f64 {
        self.height as f64 * self.cell_height
    }

    /// Get a cell by its indices, or `None` if outside the grid.
    #[inline]
    pub fn cell(&self, x: i32, y: i32) -> Option<MapCell> {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            let idx = (y as usize) * self.width + (x as usize);
            self.cells.get(idx).copied()
        } else {
            None
        }
    }

    /// Solid = a wall, or anything outside the grid.
    #[inline]
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.cell(x, y).map_or(true, |c| c.is_solid())
    }

    /// Convert a point in map units to the indices of the cell containing it.
    #[inline]
    pub fn cell_at(&self, px: f64, py: f64) -> (i32, i32) {
        let x = (px / self.cell_width).floor();
        let y = (py / self.cell_height).floor();
        (x as i32, y as i32)
    }

    /// Check if the cell containing a point (in map units) is solid.
    #[inline]
    pub fn is_solid_at(&self, px: f64, py: f64) -> bool {
        let (x, y) = self.cell_at(px, py);
        self.is_solid(x, y)
    }
}
