//! Sprite-sheet layout table, pose resolution and sequence building.
//!
//! The layout maps named poses (`"walkDown"`, `"axe_chopLeft"`, ...) to a row
//! of the sheet and an ordered run of columns. It is authored as rows of
//! entries ([`LayoutData`]), either the stock Memao layout or a JSON override
//! of the same shape, and flattened once into the [`SheetLayout`] resource.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "rows": [
//!     { "r": 1, "entries": [
//!       { "name": "idleDown", "start": 1, "end": 4 },
//!       { "name": "idleUp",   "start": 5, "end": 8 }
//!     ]}
//!   ]
//! }
//! ```
//!
//! Rows and columns are 1-based and `end` is inclusive. An entry with
//! `start > end` plays its columns in descending order.
//!
//! # Resolution
//!
//! A pose name is a base (`"walk"`) plus a direction label (`"Up"`). When the
//! layout splits a pose across two rows as `walkUp_a` / `walkUp_b`, both halves
//! are played a then b. Without a complete pair the plain `walkUp` entry is
//! used, and without that the idle pose for the same direction.

use std::path::Path;

use bevy_ecs::prelude::Resource;
use log::{debug, info, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::components::animationstate::ActionName;
use crate::components::facing::Direction;

/// Extra copies of the first idle frame inserted by [`build_sequence`].
pub const IDLE_HOLD_EXTRA: usize = 4;

/// One named run of columns within a row.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LayoutEntry {
    pub name: String,
    pub start: u32,
    pub end: u32,
}

/// One sheet row and the entries it holds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LayoutRow {
    pub r: u32,
    #[serde(default)]
    pub entries: Vec<LayoutEntry>,
}

/// Declarative layout, as authored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LayoutData {
    #[serde(default)]
    pub rows: Vec<LayoutRow>,
}

type StockRow = (u32, &'static [(&'static str, u32, u32)]);

/// Stock Memao sheet: 8 columns, 24 rows.
const STOCK_ROWS: &[StockRow] = &[
    (1, &[("idleDown", 1, 4), ("idleUp", 5, 8)]),
    (2, &[("idleLeft", 1, 4), ("idleRight", 5, 8)]),
    (3, &[("walkDown", 1, 6), ("walkUp_a", 7, 8)]),
    (4, &[("walkUp_b", 1, 4), ("walkLeft_a", 5, 8)]),
    (5, &[("walkLeft_b", 1, 2), ("walkRight", 3, 8)]),
    (6, &[("runDown", 1, 6), ("runUp_a", 7, 8)]),
    (7, &[("runUp_b", 1, 4), ("runLeft_a", 5, 8)]),
    (8, &[("runLeft_b", 1, 2), ("runRight", 3, 8)]),
    (9, &[("pickupDown", 1, 4), ("pickupUp", 5, 8)]),
    (10, &[("pickupLeft", 1, 4), ("pickupRight", 5, 8)]),
    (11, &[("pickaxeDown", 1, 4), ("pickaxeUp", 5, 8)]),
    (12, &[("pickaxeLeft", 1, 4), ("pickaxeRight", 5, 8)]),
    (13, &[("axe_chopDown", 1, 4), ("axe_chopUp", 5, 8)]),
    (14, &[("axe_chopLeft", 1, 4), ("axe_chopRight", 5, 8)]),
    (
        15,
        &[("plantDown", 1, 3), ("plantUp", 4, 6), ("plantLeft_a", 7, 8)],
    ),
    (
        16,
        &[("plantLeft_b", 1, 1), ("plantRight", 2, 4), ("waterDown", 5, 8)],
    ),
    (17, &[("waterUp", 1, 4), ("waterLeft", 5, 8)]),
    (18, &[("waterRight", 1, 4), ("reapDown", 5, 8)]),
    (19, &[("reapUp", 1, 4), ("reapLeft", 5, 8)]),
    (20, &[("reapRight", 1, 4), ("unused", 5, 8)]),
    (21, &[("hoeDown", 1, 4), ("hoeUp", 5, 8)]),
    (22, &[("hoeLeft", 1, 4), ("hoeRight", 5, 8)]),
    (23, &[("axe_strikeDown", 1, 4), ("axe_strikeUp", 5, 8)]),
    (24, &[("axe_strikeLeft", 1, 4), ("axe_strikeRight", 5, 8)]),
];

impl LayoutData {
    /// The stock Memao layout.
    pub fn stock() -> Self {
        let rows = STOCK_ROWS
            .iter()
            .map(|(r, entries)| LayoutRow {
                r: *r,
                entries: entries
                    .iter()
                    .map(|(name, start, end)| LayoutEntry {
                        name: (*name).to_string(),
                        start: *start,
                        end: *end,
                    })
                    .collect(),
            })
            .collect();
        Self { rows }
    }

    /// Loads layout data from a JSON file at the specified path.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let file_content = std::fs::read_to_string(path)?;
        let layout_data: LayoutData = serde_json::from_str(&file_content)?;
        Ok(layout_data)
    }
}

impl Default for LayoutData {
    fn default() -> Self {
        Self::stock()
    }
}

/// A single sheet cell, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
}

impl Cell {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// Resolved row and ordered columns for one layout entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSegment {
    pub row: u32,
    pub columns: SmallVec<[u32; 8]>,
}

impl FrameSegment {
    pub fn new(row: u32, columns: impl IntoIterator<Item = u32>) -> Self {
        Self {
            row,
            columns: columns.into_iter().collect(),
        }
    }

    fn from_entry(row: u32, entry: &LayoutEntry) -> Self {
        let columns: SmallVec<[u32; 8]> = if entry.start <= entry.end {
            (entry.start..=entry.end).collect()
        } else {
            (entry.end..=entry.start).rev().collect()
        };
        Self { row, columns }
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.columns.iter().map(move |&col| Cell::new(self.row, col))
    }
}

/// Resolution result; the stock layout never needs more than two segments.
pub type Segments<'a> = SmallVec<[&'a FrameSegment; 2]>;

/// Flattened, validated layout shared by every animated character.
#[derive(Resource, Debug, Clone)]
pub struct SheetLayout {
    segments: FxHashMap<String, FrameSegment>,
    duplicates: Vec<String>,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self::from_data(&LayoutData::stock())
    }
}

impl SheetLayout {
    /// Flatten `data` into a name lookup.
    ///
    /// Duplicate names are reported and the last definition wins.
    pub fn from_data(data: &LayoutData) -> Self {
        let mut segments = FxHashMap::default();
        let mut duplicates = Vec::new();
        for row in &data.rows {
            for entry in &row.entries {
                let segment = FrameSegment::from_entry(row.r, entry);
                if segments.insert(entry.name.clone(), segment).is_some() {
                    warn!(
                        "Layout entry '{}' is defined more than once, row {} wins",
                        entry.name, row.r
                    );
                    duplicates.push(entry.name.clone());
                }
            }
        }
        Self {
            segments,
            duplicates,
        }
    }

    /// Read a JSON layout override from disk.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        let data = LayoutData::load_from_file(path)?;
        let layout = Self::from_data(&data);
        info!(
            "Loaded sheet layout from {} ({} entries)",
            path.display(),
            layout.len()
        );
        Ok(layout)
    }

    pub fn get(&self, name: &str) -> Option<&FrameSegment> {
        self.segments.get(name)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Names that were defined more than once.
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    /// Look up `base` + direction without any idle fallback.
    pub fn lookup(&self, base: &str, direction: Direction) -> Segments<'_> {
        let name = format!("{}{}", base, direction.label());
        let mut out = Segments::new();
        let a = self.get(&format!("{name}_a"));
        let b = self.get(&format!("{name}_b"));
        if let (Some(a), Some(b)) = (a, b) {
            out.push(a);
            out.push(b);
        } else if let Some(single) = self.get(&name) {
            out.push(single);
        }
        out
    }

    /// Idle pose for `direction`; empty when the layout has none.
    pub fn resolve_idle(&self, direction: Direction) -> Segments<'_> {
        self.lookup(ActionName::IDLE, direction)
    }

    /// Resolve a pose, falling back to the idle pose for the same direction.
    pub fn resolve(&self, base: &str, direction: Direction) -> Segments<'_> {
        let found = self.lookup(base, direction);
        if !found.is_empty() || base == ActionName::IDLE {
            return found;
        }
        debug!(
            "No layout entry for '{}{}', using idle",
            base,
            direction.label()
        );
        self.resolve_idle(direction)
    }
}

/// Flatten `segments` into the played cell list.
///
/// `idle_hold` repeats the first cell [`IDLE_HOLD_EXTRA`] extra times;
/// `pingpong` then walks back through the interior so the cycle never
/// repeats an endpoint.
pub fn build_sequence(segments: &[&FrameSegment], pingpong: bool, idle_hold: bool) -> Vec<Cell> {
    build_sequence_with_hold(segments, pingpong, idle_hold, IDLE_HOLD_EXTRA)
}

/// [`build_sequence`] with a configurable number of extra idle-hold copies.
pub fn build_sequence_with_hold(
    segments: &[&FrameSegment],
    pingpong: bool,
    idle_hold: bool,
    hold_extra: usize,
) -> Vec<Cell> {
    let mut seq: Vec<Cell> = segments.iter().flat_map(|seg| seg.cells()).collect();

    if idle_hold {
        if let Some(&first) = seq.first() {
            seq.splice(0..0, std::iter::repeat_n(first, hold_extra));
        }
    }

    if pingpong && seq.len() >= 2 {
        let back: Vec<Cell> = seq[1..seq.len() - 1].iter().rev().copied().collect();
        seq.extend(back);
    }

    seq
}
