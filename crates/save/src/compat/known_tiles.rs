// ---------------------------------------------------------------------------
// Known tiles: per-player "tile seen" bits stored as hex rows
// ---------------------------------------------------------------------------
//
// Player slots are grouped in 32-bit words, each word split in 8 groups of
// 4 slots. Row `map.kNN_YYYY` holds group NN of row y, one hex digit per x.
// Group NN of word j, nibble l is `j * 8 + l`.
//
// Saves from 2.3.0/2.3.1 wrote group (j, l) under `l * words + j` instead.
// The two layouts only differ once more than 32 slots are in use.

use crate::doc_path;
use crate::document::Document;
use crate::load_session::has_capability;
use crate::save_error::SaveError;

const SLOTS_PER_WORD: usize = 32;
const GROUPS_PER_WORD: usize = 8;
const SLOTS_PER_GROUP: usize = 4;

/// Group number of word `j`, nibble `l` in the current layout.
pub(crate) fn current_group(j: usize, l: usize) -> usize {
    j * GROUPS_PER_WORD + l
}

/// Known bits of every tile: `words_per_tile` words per tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KnownGrid {
    pub width: usize,
    pub height: usize,
    pub words_per_tile: usize,
    bits: Vec<u32>,
}

impl KnownGrid {
    pub(crate) fn new(
        width: usize,
        height: usize,
        words_per_tile: usize,
    ) -> Result<Self, SaveError> {
        let len = width
            .checked_mul(height)
            .and_then(|tiles| tiles.checked_mul(words_per_tile))
            .ok_or_else(|| {
                SaveError::Structural(format!(
                    "known tiles of a {width}x{height} map with {words_per_tile} words overflow"
                ))
            })?;
        Ok(Self {
            width,
            height,
            words_per_tile,
            bits: vec![0; len],
        })
    }

    pub(crate) fn set_known(&mut self, tile: usize, slot: usize) {
        let j = slot / SLOTS_PER_WORD;
        if tile < self.width * self.height && j < self.words_per_tile {
            self.bits[tile * self.words_per_tile + j] |= 1u32 << (slot % SLOTS_PER_WORD);
        }
    }

    pub(crate) fn is_known(&self, tile: usize, slot: usize) -> bool {
        let j = slot / SLOTS_PER_WORD;
        tile < self.width * self.height
            && j < self.words_per_tile
            && self.bits[tile * self.words_per_tile + j] & (1u32 << (slot % SLOTS_PER_WORD)) != 0
    }

    /// Number of tiles `slot` knows.
    pub(crate) fn known_count(&self, slot: usize) -> usize {
        (0..self.width * self.height)
            .filter(|&tile| self.is_known(tile, slot))
            .count()
    }

    /// Read rows laid out by `group_of(j, l)`.
    pub(crate) fn read(
        doc: &Document,
        width: usize,
        height: usize,
        words_per_tile: usize,
        group_of: impl Fn(usize, usize) -> usize,
    ) -> Result<Self, SaveError> {
        let mut grid = Self::new(width, height, words_per_tile)?;
        for j in 0..words_per_tile {
            for l in 0..GROUPS_PER_WORD {
                let group = group_of(j, l);
                for y in 0..height {
                    let path = doc_path::known_row(group, y);
                    let row = doc.lookup_str(&path)?;
                    let mut digits = row.chars();
                    for x in 0..width {
                        let nibble = digits
                            .next()
                            .and_then(|c| c.to_digit(16))
                            .ok_or_else(|| {
                                SaveError::Structural(format!("{path}: bad known digit at x={x}"))
                            })?;
                        let tile = y * width + x;
                        grid.bits[tile * words_per_tile + j] |= nibble << (SLOTS_PER_GROUP * l);
                    }
                }
            }
        }
        Ok(grid)
    }

    /// Write all rows in the current layout.
    pub(crate) fn write(&self, doc: &mut Document) {
        for j in 0..self.words_per_tile {
            for l in 0..GROUPS_PER_WORD {
                for y in 0..self.height {
                    let row: String = (0..self.width)
                        .map(|x| {
                            let word = self.bits[(y * self.width + x) * self.words_per_tile + j];
                            let nibble = (word >> (SLOTS_PER_GROUP * l)) & 0xF;
                            char::from_digit(nibble, 16).unwrap_or('0')
                        })
                        .collect();
                    doc.replace(&doc_path::known_row(current_group(j, l), y), row);
                }
            }
        }
    }
}

/// Number of 32-slot words with rows present in the current layout.
pub(crate) fn words_present(doc: &Document) -> usize {
    let groups = (0..)
        .take_while(|&group| doc.contains(&doc_path::known_row(group, 0)))
        .count();
    groups.div_ceil(GROUPS_PER_WORD)
}

/// Bring known-tile rows to the current layout.
///
/// `knownv2` saves only use different row names. Older saves are re-read
/// with the transposed group numbering and written back.
pub(crate) fn upgrade_known_rows(doc: &mut Document) -> Result<(), SaveError> {
    // Limits of the release that wrote the transposed rows.
    const HISTORICAL_MAX_SLOTS: usize = 128;
    const HISTORICAL_MAX_MAP_DIMENSION: usize = 512;

    if has_capability(doc, "knownv2") {
        for name in doc.entry_names("map") {
            if let Some(rest) = name.strip_prefix("kvb") {
                doc.rename(&doc_path::map(&name), &doc_path::map(&format!("k{rest}")));
            }
        }
        return Ok(());
    }

    if !doc.contains(&doc_path::known_row(0, 0)) {
        return Ok(());
    }

    let max_slot = doc.player_slots().last().copied().unwrap_or(0);
    if max_slot >= HISTORICAL_MAX_SLOTS {
        return Err(SaveError::Structural(format!(
            "player slot {max_slot} beyond the {HISTORICAL_MAX_SLOTS} slots of a 2.3 save"
        )));
    }
    let words = max_slot / SLOTS_PER_WORD + 1;
    if words == 1 {
        return Ok(());
    }

    let dimension = |key: &str| -> Result<usize, SaveError> {
        let path = doc_path::map(key);
        let value = doc.lookup_int(&path)?;
        usize::try_from(value)
            .ok()
            .filter(|v| (1..=HISTORICAL_MAX_MAP_DIMENSION).contains(v))
            .ok_or_else(|| SaveError::Structural(format!("{path} = {value} is out of range")))
    };
    let width = dimension("width")?;
    let height = dimension("height")?;

    let grid = KnownGrid::read(doc, width, height, words, |j, l| l * words + j)?;
    grid.write(doc);
    Ok(())
}
