use std::fmt;

use super::graphics::ObjectGraphics;

/// Stable index of an object template inside a [`CompiledGame`](super::CompiledGame).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId(pub u16);

impl ObjectId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of a collision layer; lower layers are drawn first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerId(pub u16);

impl LayerId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Object template, defined once per compiled game.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectDef {
    pub id: ObjectId,
    /// Declared spelling, reported to hosts.
    pub identifier: String,
    pub layer: LayerId,
    /// Legend symbols that denote exactly this object.
    pub aliases: Vec<String>,
    pub graphics: ObjectGraphics,
}

/// Sorted, duplicate-free set of objects used by patterns and win conditions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectSet(Vec<ObjectId>);

impl ObjectSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn single(id: ObjectId) -> Self {
        Self(vec![id])
    }

    pub fn insert(&mut self, id: ObjectId) {
        if let Err(at) = self.0.binary_search(&id) {
            self.0.insert(at, id);
        }
    }

    pub fn extend_from(&mut self, other: &ObjectSet) {
        for id in other.iter() {
            self.insert(id);
        }
    }

    #[inline]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.0.binary_search(&id).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The member when the set has exactly one.
    pub fn as_single(&self) -> Option<ObjectId> {
        match self.0.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}

impl FromIterator<ObjectId> for ObjectSet {
    fn from_iter<I: IntoIterator<Item = ObjectId>>(iter: I) -> Self {
        let mut ids: Vec<ObjectId> = iter.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self(ids)
    }
}
