// Licensed under MIT. See LICENSE for details.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::Ident;

/// Which program of a relational pair a name belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Left,
    Right,
    Global,
}

impl Side {
    // #L, #R
    pub fn from_marker(marker: &str) -> Self {
        match marker {
            "#L" => Side::Left,
            "#R" => Side::Right,
            _ => Side::Global,
        }
    }
}

/// Identifier buckets of a relational program, one set per side.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SideIdentifiers {
    sides: BTreeMap<Side, BTreeSet<Ident>>,
}

impl SideIdentifiers {
    pub fn new() -> Self {
        let sides = [Side::Left, Side::Right, Side::Global]
            .iter()
            .map(|side| (*side, BTreeSet::new()))
            .collect();
        Self { sides }
    }

    pub fn insert(&mut self, side: Side, id: &str) -> bool {
        self.sides
            .entry(side)
            .or_insert_with(BTreeSet::new)
            .insert(String::from(id))
    }

    pub fn get(&self, side: Side) -> Option<&BTreeSet<Ident>> {
        self.sides.get(&side)
    }

    pub fn contains(&self, side: Side, id: &str) -> bool {
        self.get(side).map_or(false, |ids| ids.contains(id))
    }

    /// Names of the given side, empty if the side was never populated.
    pub fn iter(&self, side: Side) -> impl Iterator<Item = &Ident> {
        self.sides.get(&side).into_iter().flatten()
    }

    /// Union of the given sides.
    pub fn merge(&self, sides: &[Side]) -> BTreeSet<Ident> {
        sides
            .iter()
            .flat_map(|side| self.iter(*side))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sides.values().map(|ids| ids.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_marker() {
        assert_eq!(Side::from_marker("#L"), Side::Left);
        assert_eq!(Side::from_marker("#R"), Side::Right);
        assert_eq!(Side::from_marker("#X"), Side::Global);
    }

    #[test]
    fn test_buckets() {
        let mut ids = SideIdentifiers::new();
        assert!(ids.is_empty());
        assert!(ids.get(Side::Right).is_some());

        assert!(ids.insert(Side::Left, "x"));
        assert!(!ids.insert(Side::Left, "x"));
        ids.insert(Side::Right, "x");
        ids.insert(Side::Global, "t");

        assert_eq!(ids.len(), 3);
        assert!(ids.contains(Side::Right, "x"));
        assert!(!ids.contains(Side::Global, "x"));

        let merged: Vec<_> = ids.merge(&[Side::Left, Side::Global]).into_iter().collect();
        assert_eq!(merged, vec!["t", "x"]);
    }
}
