// Licensed under MIT. See LICENSE for details.

use std::fmt;

pub type Ident = String;

/// The two input languages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dialect {
    Dl,
    RelDl,
}

impl Dialect {
    pub fn name(&self) -> &'static str {
        match *self {
            Dialect::Dl => "Dynamic Logic",
            Dialect::RelDl => "Relational Dynamic Logic",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

// AST node: a label (significant rule) or token text (leaf), plus ordered
// owned children. Rewrite passes mutate nodes in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AstNode {
    pub value: String,
    pub children: Vec<AstNode>,
}

impl AstNode {
    pub fn new<S: Into<String>>(value: S) -> Self {
        AstNode {
            value: value.into(),
            children: vec![],
        }
    }

    pub fn with_children<S: Into<String>>(value: S, children: Vec<AstNode>) -> Self {
        AstNode {
            value: value.into(),
            children,
        }
    }

    pub fn add_children(&mut self, children: Vec<AstNode>) {
        tracing::debug!("Added '{}' children to the node '{}'", children.len(), self.value);
        self.children.extend(children);
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Appends this subtree to `out`, one node per line, using box-drawing
    /// connectors. `indent` is the prefix inherited from the parent.
    pub fn generate_ast_tree(&self, indent: &str, is_last: bool, out: &mut String) {
        let connector = if is_last { "└── " } else { "├── " };
        out.push_str(indent);
        out.push_str(connector);
        out.push_str(&self.value);
        out.push('\n');

        let child_indent = format!("{}{}", indent, if is_last { "    " } else { "│   " });
        let last = self.children.len().saturating_sub(1);
        for (i, child) in self.children.iter().enumerate() {
            child.generate_ast_tree(&child_indent, i == last, out);
        }
    }

    /// The rendering returned by AST generation jobs.
    pub fn to_tree_string(&self) -> String {
        let mut out = String::from("Generated AST is:\n");
        self.generate_ast_tree("", true, &mut out);
        out
    }
}
