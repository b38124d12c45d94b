// Licensed under MIT. See LICENSE for details.

//! Lowers a relational AST to a plain DL AST.
//!
//! Identifiers of the right-hand program are renamed to fresh names so both
//! programs can live in one DL state, and the relational tokens are replaced
//! by their DL counterparts (`,#` becomes `;`, the rest disappears).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use once_cell::sync::Lazy;

use crate::state::{Side, SideIdentifiers};
use crate::types::{AstNode, Ident};
use crate::visitor::REL_TERM;

static RELATIONAL_LITERALS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [(",#", ";"), ("(#", ""), (")#", ""), ("#L", ""), ("#R", "")]
        .iter()
        .cloned()
        .collect()
});

const RIGHT_MARKER: &str = "#R";

#[derive(Clone, Debug)]
pub struct RelDlToDlLowering {
    rename_map: BTreeMap<Ident, Ident>,
    identifiers: BTreeSet<Ident>,
}

// Smallest n >= 1 with `name + n` free.
fn fresh_name(name: &str, taken: &BTreeSet<Ident>, chosen: &BTreeSet<Ident>) -> Ident {
    let mut n = 1u64;
    loop {
        let candidate = format!("{}{}", name, n);
        if !taken.contains(&candidate) && !chosen.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

impl RelDlToDlLowering {
    pub fn new(ids: &SideIdentifiers) -> Self {
        let taken = ids.merge(&[Side::Left, Side::Global]);
        let mut chosen = BTreeSet::new();
        let mut rename_map = BTreeMap::new();

        for name in ids.iter(Side::Right) {
            let fresh = fresh_name(name, &taken, &chosen);
            tracing::debug!("Right-side identifier '{}' becomes '{}'", name, fresh);
            chosen.insert(fresh.clone());
            rename_map.insert(name.clone(), fresh);
        }

        let identifiers = taken.union(&chosen).cloned().collect();
        tracing::info!(
            "Lowering renames {} right-side identifier(s)",
            rename_map.len()
        );

        RelDlToDlLowering {
            rename_map,
            identifiers,
        }
    }

    pub fn rename_map(&self) -> &BTreeMap<Ident, Ident> {
        &self.rename_map
    }

    /// Identifiers of the lowered program: left and global names plus every
    /// fresh right-side name.
    pub fn identifiers(&self) -> &BTreeSet<Ident> {
        &self.identifiers
    }

    pub fn lower(&self, root: &mut AstNode) {
        let mut right = false;
        self.rewrite(root, &mut right);
    }

    // Pre-order. The side flag is updated before the node's own value is
    // rewritten, so a marker governs itself and everything after it.
    fn rewrite(&self, node: &mut AstNode, right: &mut bool) {
        if node.value == REL_TERM
            && node.children.last().map_or(false, |c| c.value == RIGHT_MARKER)
        {
            *right = true;
        }
        if node.value == ",#" {
            *right = true;
        }
        if node.value == RIGHT_MARKER || node.value == ")#" {
            *right = false;
        }

        let value = self.rewrite_value(&node.value, *right);
        if value != node.value {
            tracing::debug!("Rewriting '{}' to '{}'", node.value, value);
            node.value = value;
        }

        for child in &mut node.children {
            self.rewrite(child, right);
        }
    }

    fn rewrite_value(&self, value: &str, right: bool) -> String {
        let value = match RELATIONAL_LITERALS.get(value) {
            Some(literal) => String::from(*literal),
            None => value.replace('#', ""),
        };
        if !right {
            return value;
        }

        if let Some(mapped) = self.rename_map.get(&value) {
            return mapped.clone();
        }
        match value.strip_suffix('\'') {
            Some(base) => match self.rename_map.get(base) {
                Some(mapped) => format!("{}'", mapped),
                None => value,
            },
            None => value,
        }
    }
}
