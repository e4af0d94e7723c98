use sha2::{Digest, Sha256};

use super::common::{Movement, Position};
use crate::game::{LayerId, ObjectId};

/// Object resident in one layer slot of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Occupant {
    pub object: ObjectId,
    /// Intent for the current turn; always `None` between turns.
    pub movement: Option<Movement>,
}

impl Occupant {
    pub fn still(object: ObjectId) -> Self {
        Self {
            object,
            movement: None,
        }
    }
}

/// One grid position: at most one occupant per collision layer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    layers: Vec<Option<Occupant>>,
}

impl Cell {
    pub fn empty(layer_count: usize) -> Self {
        Self {
            layers: vec![None; layer_count],
        }
    }

    #[inline]
    pub fn layer(&self, layer: LayerId) -> Option<&Occupant> {
        self.layers.get(layer.index()).and_then(Option::as_ref)
    }

    #[inline]
    pub fn layer_mut(&mut self, layer: LayerId) -> Option<&mut Occupant> {
        self.layers.get_mut(layer.index()).and_then(Option::as_mut)
    }

    /// Places `occupant` on `layer`, returning whatever was there before.
    pub fn replace(&mut self, layer: LayerId, occupant: Occupant) -> Option<Occupant> {
        self.layers
            .get_mut(layer.index())
            .and_then(|slot| slot.replace(occupant))
    }

    pub fn take(&mut self, layer: LayerId) -> Option<Occupant> {
        self.layers.get_mut(layer.index()).and_then(Option::take)
    }

    /// Occupants from the bottom layer up, with their layer.
    pub fn occupants(&self) -> impl Iterator<Item = (LayerId, &Occupant)> {
        self.layers
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|occ| (LayerId(index as u16), occ)))
    }

    pub fn objects(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.occupants().map(|(_, occ)| occ.object)
    }

    pub fn contains(&self, object: ObjectId) -> bool {
        self.objects().any(|id| id == object)
    }

    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(Option::is_none)
    }

    pub(crate) fn occupants_mut(&mut self) -> impl Iterator<Item = &mut Occupant> {
        self.layers.iter_mut().flatten()
    }

    pub(crate) fn clear_movements(&mut self) {
        for occupant in self.occupants_mut() {
            occupant.movement = None;
        }
    }
}

/// Mutable board of one level.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Level {
    pub level_idx: usize,
    pub width: usize,
    pub height: usize,
    cells: Vec<Cell>,
}

impl Level {
    pub fn new(level_idx: usize, width: usize, height: usize, layer_count: usize) -> Self {
        Self {
            level_idx,
            width,
            height,
            cells: vec![Cell::empty(layer_count); width * height],
        }
    }

    #[inline]
    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as usize) < self.width
            && (position.y as usize) < self.height
    }

    #[inline]
    fn index_of(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.y as usize * self.width + position.x as usize)
    }

    pub fn cell(&self, position: Position) -> Option<&Cell> {
        self.index_of(position).map(|index| &self.cells[index])
    }

    pub fn cell_mut(&mut self, position: Position) -> Option<&mut Cell> {
        self.index_of(position).map(move |index| &mut self.cells[index])
    }

    /// Positions in raster order: row-major, then column.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let (width, height) = (self.width as i32, self.height as i32);
        (0..height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    /// Cells paired with their positions, in raster order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, &Cell)> {
        self.positions().zip(self.cells.iter())
    }

    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    pub(crate) fn clear_movements(&mut self) {
        for cell in &mut self.cells {
            cell.clear_movements();
        }
    }

    /// Number of cells holding `object`.
    pub fn count(&self, object: ObjectId) -> usize {
        self.cells.iter().filter(|cell| cell.contains(object)).count()
    }

    /// SHA-256 digest of dimensions and per-layer contents.
    ///
    /// Movement intents are excluded; they never outlive a turn.
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update((self.width as u64).to_le_bytes());
        hasher.update((self.height as u64).to_le_bytes());
        for cell in &self.cells {
            for slot in &cell.layers {
                let word = slot.map_or(u16::MAX, |occ| occ.object.0);
                hasher.update(word.to_le_bytes());
            }
        }
        hasher.finalize().into()
    }
}
