// Licensed under MIT. See LICENSE for details.

//! Language policies on top of the AST builder. Besides building the tree
//! they collect the identifiers a program declares.

use std::collections::BTreeSet;

use crate::builder::{AstBuilder, RulePolicy};
use crate::error::AstError;
use crate::state::{Side, SideIdentifiers};
use crate::tree::{ParseTreeListener, Rule, RuleNode, Token, TokenKind};
use crate::types::{AstNode, Ident};

pub const DL_PROGRAM: &str = "DL Program";
pub const FORMULA: &str = "Formula";
pub const PROGRAM: &str = "Program";
pub const BINARY_EXPRESSION: &str = "BinaryExpression";
pub const PARENTHESES_TERM: &str = "Parentheses Term";
pub const UNARY_EXPRESSION: &str = "UnaryExpression";
pub const REL_DL_PROGRAM: &str = "Relational DL Program";
pub const REL_PROGRAM: &str = "Relational Program";
pub const REL_FORMULA: &str = "Relational Formula";
pub const REL_TERM: &str = "Relational Term";

#[derive(Clone, Copy, Debug, Default)]
pub struct DlPolicy;

impl RulePolicy for DlPolicy {
    fn label(&self, rule: Rule) -> Option<&'static str> {
        match rule {
            Rule::DlProgram => Some(DL_PROGRAM),
            Rule::Formula => Some(FORMULA),
            Rule::Program => Some(PROGRAM),
            Rule::BinaryExpr => Some(BINARY_EXPRESSION),
            Rule::ParenthesesTerm => Some(PARENTHESES_TERM),
            Rule::UnaryExpr => Some(UNARY_EXPRESSION),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RelDlPolicy;

impl RulePolicy for RelDlPolicy {
    fn label(&self, rule: Rule) -> Option<&'static str> {
        match rule {
            Rule::RelDlProgram => Some(REL_DL_PROGRAM),
            Rule::RelProgram => Some(REL_PROGRAM),
            Rule::RelFormula => Some(REL_FORMULA),
            Rule::RelTerm => Some(REL_TERM),
            _ => DlPolicy.label(rule),
        }
    }
}

// The name a rule declares, if any: `x := *` and `x' = ...` declare it on
// the program itself, `x := e` through its assignment target.
fn declared_identifier(ctx: &RuleNode) -> Option<Ident> {
    match ctx.rule {
        Rule::Program => {
            if let Some(tok) = ctx.token(TokenKind::Identifier) {
                return Some(tok.text.clone());
            }
            ctx.token(TokenKind::IdentifierPrime).map(|tok| match tok.text.strip_suffix('\'') {
                Some(base) => String::from(base),
                None => {
                    tracing::warn!(
                        "Identifier prime '{}' does not end with a prime, keeping the full text",
                        tok.text
                    );
                    tok.text.clone()
                }
            })
        }
        Rule::AssignmentIdentifier => ctx.token(TokenKind::Identifier).map(|tok| tok.text.clone()),
        _ => None,
    }
}

fn is_blank(id: &str) -> bool {
    if id.trim().is_empty() {
        tracing::warn!("Ignoring an empty identifier");
        return true;
    }
    false
}

/// Builds a DL AST and the flat set of identifiers it declares.
#[derive(Debug)]
pub struct DlTreeVisitor {
    builder: AstBuilder<DlPolicy>,
    identifiers: BTreeSet<Ident>,
}

impl DlTreeVisitor {
    pub fn new() -> Self {
        DlTreeVisitor {
            builder: AstBuilder::new(DlPolicy),
            identifiers: BTreeSet::new(),
        }
    }

    pub fn identifiers(&self) -> &BTreeSet<Ident> {
        &self.identifiers
    }

    pub fn finish(self) -> (Option<AstNode>, BTreeSet<Ident>) {
        (self.builder.finish(), self.identifiers)
    }
}

impl Default for DlTreeVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseTreeListener for DlTreeVisitor {
    type Error = AstError;

    fn enter_rule(&mut self, ctx: &RuleNode) -> Result<(), AstError> {
        self.builder.enter_rule(ctx.rule);
        if let Some(id) = declared_identifier(ctx) {
            if !is_blank(&id) {
                tracing::debug!("Found identifier '{}' in {:?}", id, ctx.rule);
                self.identifiers.insert(id);
            }
        }
        Ok(())
    }

    fn exit_rule(&mut self, ctx: &RuleNode) -> Result<(), AstError> {
        tracing::debug!("Exiting {:?} rule '{}'", ctx.rule, ctx.text());
        self.builder.exit_rule(ctx.rule, ctx.child_count())
    }

    fn visit_terminal(&mut self, tok: &Token) -> Result<(), AstError> {
        self.builder.visit_terminal(&tok.text);
        Ok(())
    }
}

/// Builds a RelDL AST and sorts declared identifiers into the side they
/// were found under.
///
/// With `keymaerax` set, relational statements are prepared for DL output:
/// a pair `(# p ,# q )#` gets a terminating `;`, and `x :=# e` is expanded
/// into `[ x := e ; , x := e ; ]`.
#[derive(Debug)]
pub struct RelDlTreeVisitor {
    builder: AstBuilder<RelDlPolicy>,
    identifiers: SideIdentifiers,
    side: Side,
    keymaerax: bool,
}

impl RelDlTreeVisitor {
    pub fn new(keymaerax: bool) -> Self {
        tracing::debug!("RelDL visitor starts on the Global side, KeYmaeraX output: {}", keymaerax);
        RelDlTreeVisitor {
            builder: AstBuilder::new(RelDlPolicy),
            identifiers: SideIdentifiers::new(),
            side: Side::Global,
            keymaerax,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn identifiers(&self) -> &SideIdentifiers {
        &self.identifiers
    }

    pub fn finish(self) -> (Option<AstNode>, SideIdentifiers) {
        (self.builder.finish(), self.identifiers)
    }

    fn set_side(&mut self, side: Side) {
        if self.side != side {
            tracing::debug!("Switching from the {:?} side to the {:?} side", self.side, side);
        }
        self.side = side;
    }

    // Runs on the node the rule just built, which is on top of the stack.
    fn prepare_for_keymaerax(&mut self, ctx: &RuleNode) {
        let node = match self.builder.top_mut() {
            Some(node) => node,
            None => return,
        };

        if ctx.token(TokenKind::RelComma).is_some() {
            tracing::info!("Relational pair '{}' is terminated with ';'", ctx.text());
            node.children.push(AstNode::new(";"));
        } else if ctx.token(TokenKind::RelAssign).is_some() {
            expand_relational_assignment(node);
        }
    }
}

/// Replaces `[x, :=#, e]` by `[ "[", Program(x := e ;), ",", Program(x := e ;), "]" ]`.
/// Each copy owns its own clone of `e`. Any other shape is left unchanged.
pub fn expand_relational_assignment(node: &mut AstNode) {
    if node.children.len() != 3 || node.children[1].value != ":=#" {
        tracing::warn!(
            "Cannot expand relational assignment with {} children: {:?}",
            node.children.len(),
            node.children.iter().map(|c| c.value.as_str()).collect::<Vec<_>>()
        );
        return;
    }

    let target = node.children[0].value.clone();
    let value = &node.children[2];
    let assignment = || {
        AstNode::with_children(
            PROGRAM,
            vec![
                AstNode::new(target.as_str()),
                AstNode::new(":="),
                value.clone(),
                AstNode::new(";"),
            ],
        )
    };

    let expanded = vec![
        AstNode::new("["),
        assignment(),
        AstNode::new(","),
        assignment(),
        AstNode::new("]"),
    ];
    tracing::debug!("Expanded relational assignment to '{}'", target);
    node.children = expanded;
}

impl ParseTreeListener for RelDlTreeVisitor {
    type Error = AstError;

    fn enter_rule(&mut self, ctx: &RuleNode) -> Result<(), AstError> {
        self.builder.enter_rule(ctx.rule);

        if ctx.rule == Rule::RelTerm {
            let side = ctx
                .token(TokenKind::ProgramConsidered)
                .map_or(Side::Global, |tok| Side::from_marker(&tok.text));
            self.set_side(side);
        }

        if let Some(id) = declared_identifier(ctx) {
            if !is_blank(&id) {
                tracing::debug!("Found identifier '{}' on the {:?} side", id, self.side);
                self.identifiers.insert(self.side, &id);
            }
        }
        Ok(())
    }

    fn exit_rule(&mut self, ctx: &RuleNode) -> Result<(), AstError> {
        tracing::debug!("Exiting {:?} rule '{}'", ctx.rule, ctx.text());
        self.builder.exit_rule(ctx.rule, ctx.child_count())?;

        match ctx.rule {
            Rule::RelTerm => self.set_side(Side::Global),
            Rule::RelProgram if self.keymaerax => self.prepare_for_keymaerax(ctx),
            _ => {}
        }
        Ok(())
    }

    fn visit_terminal(&mut self, tok: &Token) -> Result<(), AstError> {
        match tok.kind {
            TokenKind::RelOpen => self.set_side(Side::Left),
            TokenKind::RelComma => self.set_side(Side::Right),
            TokenKind::RelClose => self.set_side(Side::Global),
            _ => {}
        }
        self.builder.visit_terminal(&tok.text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::tree::walk;
    use crate::types::Dialect;
    use pretty_assertions::assert_eq;

    fn _leaf(value: &str) -> AstNode {
        AstNode::new(value)
    }

    fn _ids(names: &[&str]) -> BTreeSet<Ident> {
        names.iter().map(|s| String::from(*s)).collect()
    }

    fn visit_dl(src: &str) -> (Option<AstNode>, BTreeSet<Ident>) {
        let tree = parse(Dialect::Dl, src).tree.expect("parse failed");
        let mut visitor = DlTreeVisitor::new();
        walk(&mut visitor, &tree).expect("walk failed");
        visitor.finish()
    }

    fn visit_reldl(src: &str, keymaerax: bool) -> (Option<AstNode>, SideIdentifiers) {
        let tree = parse(Dialect::RelDl, src).tree.expect("parse failed");
        let mut visitor = RelDlTreeVisitor::new(keymaerax);
        walk(&mut visitor, &tree).expect("walk failed");
        assert_eq!(visitor.side(), Side::Global);
        visitor.finish()
    }

    #[test]
    fn test_dl_tree() {
        let (root, ids) = visit_dl("x := 1; ?x > 0;");
        let assign = AstNode::with_children(PROGRAM, vec![_leaf("x"), _leaf(":="), _leaf("1")]);
        let test = AstNode::with_children(
            PROGRAM,
            vec![
                _leaf("?"),
                AstNode::with_children(FORMULA, vec![_leaf("x"), _leaf(">"), _leaf("0")]),
            ],
        );
        let expected = AstNode::with_children(
            DL_PROGRAM,
            vec![
                AstNode::with_children(
                    PROGRAM,
                    vec![
                        AstNode::with_children(PROGRAM, vec![assign, _leaf(";"), test]),
                        _leaf(";"),
                    ],
                ),
                _leaf("<EOF>"),
            ],
        );
        assert_eq!(root, Some(expected));
        assert_eq!(ids, _ids(&["x"]));
    }

    #[test]
    fn test_dl_identifiers() {
        let (_, ids) = visit_dl("{x' = v, v' = -g & x >= 0}; t := *; a := b + c");
        // b and c are only read, never declared.
        assert_eq!(ids, _ids(&["a", "t", "v", "x"]));
    }

    #[test]
    fn test_dl_unary_and_parentheses() {
        let (root, _) = visit_dl("y := -(a + 1)");
        let program = &root.expect("root").children[0];
        let unary = &program.children[2];
        assert_eq!(unary.value, UNARY_EXPRESSION);
        assert_eq!(unary.children[0].value, "-");
        assert_eq!(unary.children[1].value, PARENTHESES_TERM);
        assert_eq!(unary.children[1].children[1].value, BINARY_EXPRESSION);
    }

    #[test]
    fn test_reldl_sides() {
        let (_, ids) = visit_reldl("[(# x := 1; ,# x := 2; y := x; )#] x#L == x#R", false);
        assert_eq!(ids.get(Side::Left), Some(&_ids(&["x"])));
        assert_eq!(ids.get(Side::Right), Some(&_ids(&["x", "y"])));
        assert_eq!(ids.get(Side::Global), Some(&_ids(&[])));

        let (_, ids) = visit_reldl("[t :=# 0] t#L == t#R", false);
        assert_eq!(ids.get(Side::Global), Some(&_ids(&["t"])));
    }

    #[test]
    fn test_pair_terminator_depends_on_flag() {
        let src = "[(# ?true ,# ?true )#] true";

        let (root, _) = visit_reldl(src, true);
        let pair = &root.expect("root").children[0].children[1];
        assert_eq!(pair.value, REL_PROGRAM);
        assert_eq!(pair.children.len(), 6);
        assert_eq!(pair.children[5], _leaf(";"));

        let (root, _) = visit_reldl(src, false);
        let pair = &root.expect("root").children[0].children[1];
        assert_eq!(pair.children.len(), 5);
        assert_eq!(pair.children[4], _leaf(")#"));
    }

    #[test]
    fn test_relational_assignment_expansion() {
        let (root, _) = visit_reldl("[x :=# y + 1] true", true);
        let statement = &root.expect("root").children[0].children[1];

        let sum = AstNode::with_children(BINARY_EXPRESSION, vec![_leaf("y"), _leaf("+"), _leaf("1")]);
        let copy = AstNode::with_children(
            PROGRAM,
            vec![_leaf("x"), _leaf(":="), sum, _leaf(";")],
        );
        assert_eq!(
            statement.children,
            vec![_leaf("["), copy.clone(), _leaf(","), copy, _leaf("]")]
        );

        let (root, _) = visit_reldl("[x :=# y + 1] true", false);
        let statement = &root.expect("root").children[0].children[1];
        assert_eq!(statement.children.len(), 3);
        assert_eq!(statement.children[1], _leaf(":=#"));
    }

    #[test]
    fn test_expansion_rejects_other_shapes() {
        let mut node = AstNode::with_children(REL_PROGRAM, vec![_leaf("x"), _leaf(":="), _leaf("1")]);
        let before = node.clone();
        expand_relational_assignment(&mut node);
        assert_eq!(node, before);

        let mut node = AstNode::with_children(REL_PROGRAM, vec![_leaf("x"), _leaf(":=#")]);
        let before = node.clone();
        expand_relational_assignment(&mut node);
        assert_eq!(node, before);
    }

    #[test]
    fn test_expansion_copies_are_independent() {
        let mut node = AstNode::with_children(
            REL_PROGRAM,
            vec![_leaf("x"), _leaf(":=#"), _leaf("2")],
        );
        expand_relational_assignment(&mut node);
        node.children[1].children[2].value = String::from("3");
        assert_eq!(node.children[3].children[2].value, "2");
    }
}
