use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{MAP_DEFAULT_HEIGHT, MAP_DEFAULT_WIDTH};

/// Linear index of a tile: `y * width + x` in native coordinates.
pub type TileIndex = usize;

// =============================================================================
// Directions
// =============================================================================

/// The eight compass directions, in their saved numeric order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction8 {
    NorthWest,
    North,
    NorthEast,
    West,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl Direction8 {
    pub const ALL: [Direction8; 8] = [
        Direction8::NorthWest,
        Direction8::North,
        Direction8::NorthEast,
        Direction8::West,
        Direction8::East,
        Direction8::SouthWest,
        Direction8::South,
        Direction8::SouthEast,
    ];

    pub fn index(self) -> u8 {
        match self {
            Direction8::NorthWest => 0,
            Direction8::North => 1,
            Direction8::NorthEast => 2,
            Direction8::West => 3,
            Direction8::East => 4,
            Direction8::SouthWest => 5,
            Direction8::South => 6,
            Direction8::SouthEast => 7,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// The opposite direction. The numbering is symmetric, so this is `7 - index`.
    pub fn reverse(self) -> Self {
        Self::ALL[7 - self.index() as usize]
    }

    /// `(dx, dy)` of one step in this direction, with y growing southwards.
    pub fn offset(self) -> (i64, i64) {
        match self {
            Direction8::NorthWest => (-1, -1),
            Direction8::North => (0, -1),
            Direction8::NorthEast => (1, -1),
            Direction8::West => (-1, 0),
            Direction8::East => (1, 0),
            Direction8::SouthWest => (-1, 1),
            Direction8::South => (0, 1),
            Direction8::SouthEast => (1, 1),
        }
    }

    /// Saved order direction character: `'0'..='7'`.
    pub fn to_char(self) -> char {
        char::from(b'0' + self.index())
    }

    pub fn from_char(c: char) -> Option<Self> {
        c.to_digit(10)
            .and_then(|d| u8::try_from(d).ok())
            .and_then(Self::from_index)
    }
}

// =============================================================================
// Topology
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Topology {
    pub iso: bool,
    pub hex: bool,
}

impl Topology {
    /// Parse the `topology` setting value, e.g. `"ISO|HEX"`. Unknown names are ignored.
    pub fn from_setting(value: &str) -> Self {
        let mut topo = Topology::default();
        for flag in setting_flags(value) {
            if flag.eq_ignore_ascii_case("ISO") {
                topo.iso = true;
            } else if flag.eq_ignore_ascii_case("HEX") {
                topo.hex = true;
            }
        }
        topo
    }

    pub fn to_setting(self) -> String {
        let mut names = Vec::new();
        if self.iso {
            names.push("ISO");
        }
        if self.hex {
            names.push("HEX");
        }
        names.join("|")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Wrap {
    pub wrap_x: bool,
    pub wrap_y: bool,
}

impl Wrap {
    /// Parse the `wrap` setting value, e.g. `"WrapX|WrapY"`.
    pub fn from_setting(value: &str) -> Self {
        let mut wrap = Wrap::default();
        for flag in setting_flags(value) {
            if flag.eq_ignore_ascii_case("WrapX") {
                wrap.wrap_x = true;
            } else if flag.eq_ignore_ascii_case("WrapY") {
                wrap.wrap_y = true;
            }
        }
        wrap
    }

    pub fn to_setting(self) -> String {
        let mut names = Vec::new();
        if self.wrap_x {
            names.push("WrapX");
        }
        if self.wrap_y {
            names.push("WrapY");
        }
        names.join("|")
    }
}

fn setting_flags(value: &str) -> impl Iterator<Item = &str> {
    value.split('|').map(str::trim).filter(|s| !s.is_empty())
}

// =============================================================================
// Game map
// =============================================================================

/// Map geometry needed to walk unit orders tile by tile.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameMap {
    pub width: usize,
    pub height: usize,
    pub topology: Topology,
    pub wrap: Wrap,
}

impl Default for GameMap {
    fn default() -> Self {
        Self::new(MAP_DEFAULT_WIDTH, MAP_DEFAULT_HEIGHT)
    }
}

impl GameMap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            topology: Topology::default(),
            wrap: Wrap::default(),
        }
    }

    pub fn tile_count(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    pub fn tile_index(&self, x: usize, y: usize) -> Option<TileIndex> {
        if x < self.width && y < self.height {
            y.checked_mul(self.width)?.checked_add(x)
        } else {
            None
        }
    }

    pub fn tile_xy(&self, tile: TileIndex) -> Option<(usize, usize)> {
        (self.width > 0 && tile < self.tile_count()).then(|| (tile % self.width, tile / self.width))
    }

    /// Hex topologies drop one diagonal pair.
    pub fn is_valid_dir(&self, dir: Direction8) -> bool {
        match dir {
            Direction8::SouthEast | Direction8::NorthWest => {
                !(self.topology.hex && !self.topology.iso)
            }
            Direction8::NorthEast | Direction8::SouthWest => {
                !(self.topology.hex && self.topology.iso)
            }
            _ => true,
        }
    }

    /// The tile one step from `tile` in `dir`, or `None` when that step
    /// leaves a non-wrapping edge of the map.
    pub fn mapstep(&self, tile: TileIndex, dir: Direction8) -> Option<TileIndex> {
        if !self.is_valid_dir(dir) {
            return None;
        }
        let (x, y) = self.tile_xy(tile)?;
        let (dx, dy) = dir.offset();
        let nx = step_axis(x, dx, self.width, self.wrap.wrap_x)?;
        let ny = step_axis(y, dy, self.height, self.wrap.wrap_y)?;
        self.tile_index(nx, ny)
    }
}

fn step_axis(pos: usize, delta: i64, size: usize, wraps: bool) -> Option<usize> {
    let size = i64::try_from(size).ok()?;
    let next = i64::try_from(pos).ok()? + delta;
    let next = if wraps { next.rem_euclid(size) } else { next };
    if (0..size).contains(&next) {
        usize::try_from(next).ok()
    } else {
        None
    }
}
