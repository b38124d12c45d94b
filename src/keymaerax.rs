// Licensed under MIT. See LICENSE for details.

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use uuid::Uuid;

use crate::tree::EOF_TEXT;
use crate::types::{AstNode, Ident};

// DL spelling -> KeYmaeraX spelling. No value is also a key, so applying
// the table twice changes nothing.
static KEYMAERAX_SYMBOLS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("==", "="),
        ("&&", "&"),
        ("||", "|"),
        ("<<", "<"),
        (">>", ">"),
        ("**", "*"),
        (EOF_TEXT, ""),
    ]
    .iter()
    .cloned()
    .collect()
});

pub fn translate_symbol(value: &str) -> Option<&'static str> {
    KEYMAERAX_SYMBOLS.get(value).cloned()
}

/// Rewrites operator tokens to their KeYmaeraX spelling, pre-order.
pub fn translate_symbols(node: &mut AstNode) {
    if let Some(symbol) = translate_symbol(&node.value) {
        tracing::debug!("Translating '{}' to '{}'", node.value, symbol);
        node.value = String::from(symbol);
    }
    for child in &mut node.children {
        translate_symbols(child);
    }
}

/// Leaf values in document order, separated by single spaces. Blank leaves
/// contribute nothing.
pub fn linearize(node: &AstNode) -> String {
    fn push(node: &AstNode, out: &mut String) {
        if node.is_leaf() {
            if !node.value.trim().is_empty() {
                out.push_str(&node.value);
                out.push(' ');
            }
            return;
        }
        for child in &node.children {
            push(child, out);
        }
    }

    let mut out = String::new();
    push(node, &mut out);
    out.trim_end().to_string()
}

/// Translates and linearizes a DL AST into KeYmaeraX problem text.
pub fn serialize(root: &mut AstNode) -> String {
    translate_symbols(root);
    let problem = linearize(root);
    tracing::info!("Serialized AST to KeYmaeraX problem '{}'", problem);
    problem
}

/// Source of the id stamped into every archive entry.
pub trait IdGenerator {
    fn generate(&self) -> String;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ArchiveFormatter<G = UuidGenerator> {
    ids: G,
}

impl ArchiveFormatter<UuidGenerator> {
    pub fn new() -> Self {
        ArchiveFormatter { ids: UuidGenerator }
    }
}

impl<G: IdGenerator> ArchiveFormatter<G> {
    pub fn with_generator(ids: G) -> Self {
        ArchiveFormatter { ids }
    }

    pub fn format(&self, subject: &str, identifiers: &BTreeSet<Ident>, problem: &str) -> String {
        let id = self.ids.generate();
        tracing::info!("Generating KeYmaeraX archive with the unique id {}", id);
        let title = format!("Converted {} to KeYmaeraX format with Id as {}", subject, id);

        let mut out = format!(
            "ArchiveEntry \"{0}\"\n\tDescription \"{0}\".\n \tTitle \"{0}\".\n\n",
            title
        );

        out.push_str("ProgramVariables\n");
        for name in identifiers {
            if name.trim().is_empty() {
                tracing::warn!("Skipping an empty identifier in ProgramVariables");
                continue;
            }
            out.push_str(&format!("\tReal {};\n", name));
        }
        out.push_str("End.\n\n");

        out.push_str(&format!("Problem\n\t{}\nEnd.\n\n", problem));
        out.push_str("End.");
        out
    }
}
