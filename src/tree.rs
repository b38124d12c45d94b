// Licensed under MIT. See LICENSE for details.

//! Concrete parse trees and the depth-first walk that turns them into
//! enter/exit/terminal callbacks.

use std::fmt;

use itertools::Itertools;

// Grammar rules of both dialects. RelDL embeds the DL rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rule {
    DlProgram,
    Formula,
    Program,
    AssignmentIdentifier,
    BinaryExpr,
    UnaryExpr,
    ParenthesesTerm,
    Atom,
    RelDlProgram,
    RelFormula,
    RelProgram,
    RelTerm,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    IdentifierPrime,
    Number,
    Keyword,
    Operator,
    // (#  ,#  )#
    RelOpen,
    RelComma,
    RelClose,
    // :=#
    RelAssign,
    // #L  #R
    ProgramConsidered,
    Eof,
}

pub const EOF_TEXT: &str = "<EOF>";

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    // Byte offset into the source.
    pub offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: &str, offset: usize) -> Self {
        Token {
            kind,
            text: String::from(text),
            offset,
        }
    }

    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ParseTree {
    Rule(RuleNode),
    Terminal(Token),
}

/// A rule invocation and its direct children, in source order. This is what
/// listeners see as the "context" of a rule.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleNode {
    pub rule: Rule,
    pub children: Vec<ParseTree>,
}

impl RuleNode {
    pub fn new(rule: Rule, children: Vec<ParseTree>) -> Self {
        RuleNode { rule, children }
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// First direct terminal child of the given kind.
    pub fn token(&self, kind: TokenKind) -> Option<&Token> {
        self.children.iter().find_map(|child| match *child {
            ParseTree::Terminal(ref tok) if tok.kind == kind => Some(tok),
            _ => None,
        })
    }

    /// True if a direct terminal child has exactly this kind and text.
    pub fn has_token(&self, kind: TokenKind, text: &str) -> bool {
        self.children.iter().any(|child| match *child {
            ParseTree::Terminal(ref tok) => tok.is(kind, text),
            _ => false,
        })
    }

    /// Concatenated source text without blanks, for log messages.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match *child {
                ParseTree::Rule(ref node) => node.collect_text(out),
                ParseTree::Terminal(ref tok) if tok.kind != TokenKind::Eof => {
                    out.push_str(&tok.text)
                }
                ParseTree::Terminal(_) => {}
            }
        }
    }
}

impl ParseTree {
    pub fn rule(rule: Rule, children: Vec<ParseTree>) -> Self {
        ParseTree::Rule(RuleNode::new(rule, children))
    }

    pub fn terminal(tok: &Token) -> Self {
        ParseTree::Terminal(tok.clone())
    }
}

impl fmt::Display for ParseTree {
    // ANTLR-style LISP rendering, handy in test failures.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ParseTree::Terminal(ref tok) => write!(f, "{}", tok.text),
            ParseTree::Rule(ref node) => write!(
                f,
                "({:?} {})",
                node.rule,
                node.children.iter().map(|c| c.to_string()).join(" ")
            ),
        }
    }
}

/// Callbacks fired while walking a parse tree: `enter_rule` in pre-order,
/// `exit_rule` in post-order, `visit_terminal` for every token.
pub trait ParseTreeListener {
    type Error;

    fn enter_rule(&mut self, ctx: &RuleNode) -> Result<(), Self::Error>;
    fn exit_rule(&mut self, ctx: &RuleNode) -> Result<(), Self::Error>;
    fn visit_terminal(&mut self, tok: &Token) -> Result<(), Self::Error>;
}

pub fn walk<L: ParseTreeListener>(listener: &mut L, tree: &ParseTree) -> Result<(), L::Error> {
    match *tree {
        ParseTree::Terminal(ref tok) => listener.visit_terminal(tok),
        ParseTree::Rule(ref node) => {
            listener.enter_rule(node)?;
            for child in &node.children {
                walk(listener, child)?;
            }
            listener.exit_rule(node)
        }
    }
}

/// One step of a walk, flattened. `ExitRule` carries the number of direct
/// parse-tree children of the rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseEvent<'a> {
    EnterRule(Rule),
    ExitRule(Rule, usize),
    VisitTerminal(&'a str),
}

/// The event sequence a walk over `tree` produces.
pub fn events(tree: &ParseTree) -> Vec<ParseEvent> {
    fn push<'a>(tree: &'a ParseTree, out: &mut Vec<ParseEvent<'a>>) {
        match *tree {
            ParseTree::Terminal(ref tok) => out.push(ParseEvent::VisitTerminal(&tok.text)),
            ParseTree::Rule(ref node) => {
                out.push(ParseEvent::EnterRule(node.rule));
                for child in &node.children {
                    push(child, out);
                }
                out.push(ParseEvent::ExitRule(node.rule, node.child_count()));
            }
        }
    }

    let mut out = vec![];
    push(tree, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn _t(kind: TokenKind, text: &str) -> ParseTree {
        ParseTree::Terminal(Token::new(kind, text, 0))
    }
    fn _op(text: &str) -> ParseTree {
        _t(TokenKind::Operator, text)
    }
    fn _atom(text: &str) -> ParseTree {
        ParseTree::rule(Rule::Atom, vec![_t(TokenKind::Identifier, text)])
    }

    // x := y + 1
    fn assignment() -> ParseTree {
        let target = ParseTree::rule(
            Rule::AssignmentIdentifier,
            vec![_t(TokenKind::Identifier, "x")],
        );
        let sum = ParseTree::rule(
            Rule::BinaryExpr,
            vec![_atom("y"), _op("+"), _t(TokenKind::Number, "1")],
        );
        ParseTree::rule(Rule::Program, vec![target, _op(":="), sum])
    }

    struct Recorder(Vec<String>);

    impl ParseTreeListener for Recorder {
        type Error = ();

        fn enter_rule(&mut self, ctx: &RuleNode) -> Result<(), ()> {
            self.0.push(format!("enter {:?}", ctx.rule));
            Ok(())
        }

        fn exit_rule(&mut self, ctx: &RuleNode) -> Result<(), ()> {
            self.0.push(format!("exit {:?}", ctx.rule));
            if ctx.rule == Rule::BinaryExpr {
                return Err(());
            }
            Ok(())
        }

        fn visit_terminal(&mut self, tok: &Token) -> Result<(), ()> {
            self.0.push(tok.text.clone());
            Ok(())
        }
    }

    #[test]
    fn test_events_order() {
        use self::ParseEvent::*;

        let tree = assignment();
        assert_eq!(
            events(&tree),
            vec![
                EnterRule(Rule::Program),
                EnterRule(Rule::AssignmentIdentifier),
                VisitTerminal("x"),
                ExitRule(Rule::AssignmentIdentifier, 1),
                VisitTerminal(":="),
                EnterRule(Rule::BinaryExpr),
                EnterRule(Rule::Atom),
                VisitTerminal("y"),
                ExitRule(Rule::Atom, 1),
                VisitTerminal("+"),
                VisitTerminal("1"),
                ExitRule(Rule::BinaryExpr, 3),
                ExitRule(Rule::Program, 3),
            ]
        );
    }

    #[test]
    fn test_walk_stops_on_error() {
        let mut rec = Recorder(vec![]);
        assert_eq!(walk(&mut rec, &assignment()), Err(()));
        assert_eq!(rec.0.last().map(|s| s.as_str()), Some("exit BinaryExpr"));
        assert!(!rec.0.contains(&String::from("exit Program")));
    }

    #[test]
    fn test_rule_node_helpers() {
        let tree = assignment();
        let node = match tree {
            ParseTree::Rule(ref node) => node,
            _ => unreachable!(),
        };
        assert_eq!(node.child_count(), 3);
        assert!(node.has_token(TokenKind::Operator, ":="));
        assert!(node.token(TokenKind::Identifier).is_none());
        assert_eq!(node.text(), "x:=y+1");
        assert_eq!(tree.to_string(), "(Program (AssignmentIdentifier x) := (BinaryExpr (Atom y) + 1))");
    }
}
