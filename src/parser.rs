// Licensed under MIT. See LICENSE for details.

//! nom grammar over the token stream. Every rule invocation becomes a
//! `RuleNode` holding its direct children, so the tree has exactly the shape a
//! listener walk expects.

use nom::branch::alt;
use nom::combinator::{map, opt};
use nom::error::{Error, ErrorKind};
use nom::multi::many0;
use nom::sequence::{pair, tuple};
use nom::{Err, IResult};

use crate::error::{LexError, Position, SyntaxError};
use crate::lexer::tokenize;
use crate::tree::{ParseTree, Rule, Token, TokenKind};
use crate::types::Dialect;

type Tokens<'a> = &'a [Token];
type PResult<'a, O> = IResult<Tokens<'a>, O>;
type SubParser = for<'a> fn(Tokens<'a>) -> PResult<'a, ParseTree>;

const COMPARISONS: &[&str] = &["==", "!=", "<=", ">=", "<<", ">>", "<", ">", "="];

fn mismatch<'a, O>(input: Tokens<'a>) -> PResult<'a, O> {
    Err(Err::Error(Error::new(input, ErrorKind::Tag)))
}

// Any token of the given kind.
fn kind<'a>(k: TokenKind) -> impl Fn(Tokens<'a>) -> PResult<'a, ParseTree> {
    move |input: Tokens<'a>| match input.split_first() {
        Some((tok, rest)) if tok.kind == k => Ok((rest, ParseTree::terminal(tok))),
        _ => mismatch(input),
    }
}

// An operator token spelled as one of `texts`.
fn op<'a>(texts: &'static [&'static str]) -> impl Fn(Tokens<'a>) -> PResult<'a, ParseTree> {
    move |input: Tokens<'a>| match input.split_first() {
        Some((tok, rest))
            if tok.kind == TokenKind::Operator && texts.contains(&tok.text.as_str()) =>
        {
            Ok((rest, ParseTree::terminal(tok)))
        }
        _ => mismatch(input),
    }
}

// Left-associative chains: ((a op b) op c) ...
fn fold_left(rule: Rule, init: ParseTree, rest: Vec<(ParseTree, ParseTree)>) -> ParseTree {
    rest.into_iter()
        .fold(init, |acc, (oper, rhs)| ParseTree::rule(rule, vec![acc, oper, rhs]))
}

fn additive<'a>(primary: SubParser, input: Tokens<'a>) -> PResult<'a, ParseTree> {
    let operand = |i: Tokens<'a>| multiplicative(primary, i);
    map(
        pair(operand, many0(pair(op(&["+", "-"]), operand))),
        |(init, rest)| fold_left(Rule::BinaryExpr, init, rest),
    )(input)
}

fn multiplicative<'a>(primary: SubParser, input: Tokens<'a>) -> PResult<'a, ParseTree> {
    let operand = |i: Tokens<'a>| unary(primary, i);
    map(
        pair(operand, many0(pair(op(&["*", "**", "/"]), operand))),
        |(init, rest)| fold_left(Rule::BinaryExpr, init, rest),
    )(input)
}

fn unary<'a>(primary: SubParser, input: Tokens<'a>) -> PResult<'a, ParseTree> {
    alt((
        map(
            pair(op(&["-"]), |i: Tokens<'a>| unary(primary, i)),
            |(minus, operand)| ParseTree::rule(Rule::UnaryExpr, vec![minus, operand]),
        ),
        |i: Tokens<'a>| power(primary, i),
    ))(input)
}

// a ^ b ^ c == a ^ (b ^ c)
fn power<'a>(primary: SubParser, input: Tokens<'a>) -> PResult<'a, ParseTree> {
    map(
        pair(primary, opt(pair(op(&["^"]), |i: Tokens<'a>| unary(primary, i)))),
        |(base, exponent)| match exponent {
            Some((caret, exp)) => ParseTree::rule(Rule::BinaryExpr, vec![base, caret, exp]),
            None => base,
        },
    )(input)
}

fn atom<'a>(input: Tokens<'a>) -> PResult<'a, ParseTree> {
    map(
        alt((
            kind(TokenKind::Number),
            kind(TokenKind::Identifier),
            kind(TokenKind::IdentifierPrime),
        )),
        |tok| ParseTree::rule(Rule::Atom, vec![tok]),
    )(input)
}

fn parenthesized<'a>(term: SubParser, input: Tokens<'a>) -> PResult<'a, ParseTree> {
    map(tuple((op(&["("]), term, op(&[")"]))), |(open, inner, close)| {
        ParseTree::rule(Rule::ParenthesesTerm, vec![open, inner, close])
    })(input)
}

fn dl_primary<'a>(input: Tokens<'a>) -> PResult<'a, ParseTree> {
    alt((|i: Tokens<'a>| parenthesized(dl_term, i), atom))(input)
}

// x#L, x#R
fn rel_term<'a>(input: Tokens<'a>) -> PResult<'a, ParseTree> {
    map(
        pair(
            kind(TokenKind::Identifier),
            kind(TokenKind::ProgramConsidered),
        ),
        |(id, side)| ParseTree::rule(Rule::RelTerm, vec![id, side]),
    )(input)
}

fn rel_primary<'a>(input: Tokens<'a>) -> PResult<'a, ParseTree> {
    alt((
        |i: Tokens<'a>| parenthesized(rel_expression, i),
        rel_term,
        atom,
    ))(input)
}

pub fn dl_term<'a>(input: Tokens<'a>) -> PResult<'a, ParseTree> {
    additive(dl_primary, input)
}

fn rel_expression<'a>(input: Tokens<'a>) -> PResult<'a, ParseTree> {
    additive(rel_primary, input)
}

// Formulas of both dialects share one shape; only the rule, the embedded
// program and the term language differ.
struct FormulaGrammar {
    rule: Rule,
    program: SubParser,
    term: SubParser,
}

static DL_FORMULA: FormulaGrammar = FormulaGrammar {
    rule: Rule::Formula,
    program,
    term: dl_term,
};

static REL_FORMULA: FormulaGrammar = FormulaGrammar {
    rule: Rule::RelFormula,
    program: rel_program,
    term: rel_expression,
};

fn equivalence<'a>(g: &FormulaGrammar, input: Tokens<'a>) -> PResult<'a, ParseTree> {
    let operand = |i: Tokens<'a>| implication(g, i);
    map(
        pair(operand, many0(pair(op(&["<->"]), operand))),
        |(init, rest)| fold_left(g.rule, init, rest),
    )(input)
}

fn implication<'a>(g: &FormulaGrammar, input: Tokens<'a>) -> PResult<'a, ParseTree> {
    map(
        pair(
            |i: Tokens<'a>| disjunction(g, i),
            opt(pair(op(&["->"]), |i: Tokens<'a>| implication(g, i))),
        ),
        |(lhs, rhs)| match rhs {
            Some((arrow, rhs)) => ParseTree::rule(g.rule, vec![lhs, arrow, rhs]),
            None => lhs,
        },
    )(input)
}

fn disjunction<'a>(g: &FormulaGrammar, input: Tokens<'a>) -> PResult<'a, ParseTree> {
    let operand = |i: Tokens<'a>| conjunction(g, i);
    map(
        pair(operand, many0(pair(op(&["||"]), operand))),
        |(init, rest)| fold_left(g.rule, init, rest),
    )(input)
}

fn conjunction<'a>(g: &FormulaGrammar, input: Tokens<'a>) -> PResult<'a, ParseTree> {
    let operand = |i: Tokens<'a>| prefix(g, i);
    map(
        pair(operand, many0(pair(op(&["&&"]), operand))),
        |(init, rest)| fold_left(g.rule, init, rest),
    )(input)
}

// !f, [a]f, <a>f
fn prefix<'a>(g: &FormulaGrammar, input: Tokens<'a>) -> PResult<'a, ParseTree> {
    let operand = |i: Tokens<'a>| prefix(g, i);
    alt((
        map(pair(op(&["!"]), operand), |(not, f)| {
            ParseTree::rule(g.rule, vec![not, f])
        }),
        map(
            tuple((op(&["["]), g.program, op(&["]"]), operand)),
            |(open, p, close, f)| ParseTree::rule(g.rule, vec![open, p, close, f]),
        ),
        map(
            tuple((op(&["<"]), g.program, op(&[">"]), operand)),
            |(open, p, close, f)| ParseTree::rule(g.rule, vec![open, p, close, f]),
        ),
        |i: Tokens<'a>| primary_formula(g, i),
    ))(input)
}

fn primary_formula<'a>(g: &FormulaGrammar, input: Tokens<'a>) -> PResult<'a, ParseTree> {
    alt((
        map(
            tuple((op(&["("]), |i: Tokens<'a>| equivalence(g, i), op(&[")"]))),
            |(open, f, close)| ParseTree::rule(g.rule, vec![open, f, close]),
        ),
        map(kind(TokenKind::Keyword), |kw| ParseTree::rule(g.rule, vec![kw])),
        map(tuple((g.term, op(COMPARISONS), g.term)), |(lhs, cmp, rhs)| {
            ParseTree::rule(g.rule, vec![lhs, cmp, rhs])
        }),
    ))(input)
}

pub fn formula<'a>(input: Tokens<'a>) -> PResult<'a, ParseTree> {
    equivalence(&DL_FORMULA, input)
}

fn rel_formula<'a>(input: Tokens<'a>) -> PResult<'a, ParseTree> {
    equivalence(&REL_FORMULA, input)
}

// a ++ b
pub fn program<'a>(input: Tokens<'a>) -> PResult<'a, ParseTree> {
    map(
        pair(sequence, many0(pair(op(&["++"]), sequence))),
        |(init, rest)| fold_left(Rule::Program, init, rest),
    )(input)
}

// a; b; with an optional trailing ";"
fn sequence<'a>(input: Tokens<'a>) -> PResult<'a, ParseTree> {
    map(
        tuple((
            composition,
            many0(pair(op(&[";"]), composition)),
            opt(op(&[";"])),
        )),
        |(init, rest, trailing)| {
            let seq = fold_left(Rule::Program, init, rest);
            match trailing {
                Some(semi) => ParseTree::rule(Rule::Program, vec![seq, semi]),
                None => seq,
            }
        },
    )(input)
}

// x' = v, v' = a
fn composition<'a>(input: Tokens<'a>) -> PResult<'a, ParseTree> {
    map(
        pair(statement, many0(pair(op(&[","]), statement))),
        |(init, rest)| fold_left(Rule::Program, init, rest),
    )(input)
}

fn assignment_identifier<'a>(input: Tokens<'a>) -> PResult<'a, ParseTree> {
    map(kind(TokenKind::Identifier), |id| {
        ParseTree::rule(Rule::AssignmentIdentifier, vec![id])
    })(input)
}

fn statement<'a>(input: Tokens<'a>) -> PResult<'a, ParseTree> {
    alt((
        braced,
        map(pair(op(&["?"]), formula), |(test, f)| {
            ParseTree::rule(Rule::Program, vec![test, f])
        }),
        map(
            tuple((kind(TokenKind::Identifier), op(&[":="]), op(&["*"]))),
            |(id, assign, star)| ParseTree::rule(Rule::Program, vec![id, assign, star]),
        ),
        map(
            tuple((assignment_identifier, op(&[":="]), dl_term)),
            |(target, assign, value)| ParseTree::rule(Rule::Program, vec![target, assign, value]),
        ),
        map(
            tuple((kind(TokenKind::IdentifierPrime), op(&["="]), dl_term)),
            |(primed, eq, rhs)| ParseTree::rule(Rule::Program, vec![primed, eq, rhs]),
        ),
    ))(input)
}

// {a}*, {a}, {x' = v & f}
fn braced<'a>(input: Tokens<'a>) -> PResult<'a, ParseTree> {
    let (rest, open) = op(&["{"])(input)?;
    let (rest, body) = program(rest)?;

    if let Ok((rest, (close, star))) = pair(op(&["}"]), op(&["*"]))(rest) {
        let children = vec![open, body, close, star];
        return Ok((rest, ParseTree::rule(Rule::Program, children)));
    }
    if let Ok((rest, close)) = op(&["}"])(rest) {
        return Ok((rest, ParseTree::rule(Rule::Program, vec![open, body, close])));
    }

    let (rest, (amp, domain, close)) = tuple((op(&["&"]), formula, op(&["}"])))(rest)?;
    let children = vec![open, body, amp, domain, close];
    Ok((rest, ParseTree::rule(Rule::Program, children)))
}

fn rel_program<'a>(input: Tokens<'a>) -> PResult<'a, ParseTree> {
    map(
        pair(rel_sequence, many0(pair(op(&["++"]), rel_sequence))),
        |(init, rest)| fold_left(Rule::RelProgram, init, rest),
    )(input)
}

// Relational statements compose by juxtaposition; each one is terminated
// when it is lowered.
fn rel_sequence<'a>(input: Tokens<'a>) -> PResult<'a, ParseTree> {
    map(pair(rel_statement, many0(rel_statement)), |(init, rest)| {
        rest.into_iter()
            .fold(init, |acc, next| ParseTree::rule(Rule::RelProgram, vec![acc, next]))
    })(input)
}

fn rel_statement<'a>(input: Tokens<'a>) -> PResult<'a, ParseTree> {
    alt((
        map(
            tuple((
                kind(TokenKind::RelOpen),
                program,
                kind(TokenKind::RelComma),
                program,
                kind(TokenKind::RelClose),
            )),
            |(open, left, comma, right, close)| {
                ParseTree::rule(Rule::RelProgram, vec![open, left, comma, right, close])
            },
        ),
        map(
            tuple((assignment_identifier, kind(TokenKind::RelAssign), dl_term)),
            |(target, assign, value)| {
                ParseTree::rule(Rule::RelProgram, vec![target, assign, value])
            },
        ),
        rel_braced,
    ))(input)
}

fn rel_braced<'a>(input: Tokens<'a>) -> PResult<'a, ParseTree> {
    let (rest, open) = op(&["{"])(input)?;
    let (rest, body) = rel_program(rest)?;
    let (rest, close) = op(&["}"])(rest)?;

    match op(&["*"])(rest) {
        Ok((rest, star)) => {
            let children = vec![open, body, close, star];
            Ok((rest, ParseTree::rule(Rule::RelProgram, children)))
        }
        Err(_) => Ok((rest, ParseTree::rule(Rule::RelProgram, vec![open, body, close]))),
    }
}

/// Outcome of parsing one input: the tree (if the grammar accepted it) and
/// every lexical and syntactic error found.
#[derive(Clone, Debug, PartialEq)]
pub struct Parsed {
    pub tree: Option<ParseTree>,
    pub lexer_errors: Vec<LexError>,
    pub parser_errors: Vec<SyntaxError>,
}

impl Parsed {
    pub fn has_errors(&self) -> bool {
        !self.lexer_errors.is_empty() || !self.parser_errors.is_empty()
    }
}

// Where a failed attempt stopped; the attempt that got furthest is reported.
struct Failure<'a> {
    rest: Tokens<'a>,
    trailing: bool,
}

fn root<'a>(rule: Rule, bodies: &[SubParser], input: Tokens<'a>) -> Result<ParseTree, Failure<'a>> {
    let mut furthest = Failure {
        rest: input,
        trailing: false,
    };
    let mut record = |rest: Tokens<'a>, trailing: bool| {
        if rest.len() < furthest.rest.len() {
            furthest = Failure { rest, trailing };
        }
    };

    for body in bodies {
        match body(input) {
            Ok((rest, tree)) => match kind(TokenKind::Eof)(rest) {
                Ok((_, eof)) => return Ok(ParseTree::rule(rule, vec![tree, eof])),
                Err(_) => record(rest, true),
            },
            Err(Err::Error(e)) | Err(Err::Failure(e)) => record(e.input, false),
            Err(Err::Incomplete(_)) => {}
        }
    }

    Err(furthest)
}

fn syntax_error(source: &str, failure: &Failure) -> SyntaxError {
    match failure.rest.first() {
        Some(tok) if failure.trailing => SyntaxError::Trailing {
            position: Position::of_offset(source, tok.offset),
            found: tok.text.clone(),
        },
        Some(tok) => SyntaxError::Mismatched {
            position: Position::of_offset(source, tok.offset),
            found: tok.text.clone(),
        },
        None => SyntaxError::UnexpectedEnd,
    }
}

pub fn parse(dialect: Dialect, source: &str) -> Parsed {
    let lexed = tokenize(source);

    let result = match dialect {
        Dialect::Dl => {
            let bodies: [SubParser; 2] = [formula, program];
            root(Rule::DlProgram, &bodies, &lexed.tokens)
        }
        Dialect::RelDl => {
            let bodies: [SubParser; 1] = [rel_formula];
            root(Rule::RelDlProgram, &bodies, &lexed.tokens)
        }
    };

    let (tree, parser_errors) = match result {
        Ok(tree) => (Some(tree), vec![]),
        Err(failure) => {
            let err = syntax_error(source, &failure);
            tracing::error!("{}", err);
            (None, vec![err])
        }
    };

    tracing::info!("Lexing completed with {} lexer error(s).", lexed.errors.len());
    tracing::info!("Parsing completed with {} parser error(s).", parser_errors.len());

    Parsed {
        tree,
        lexer_errors: lexed.errors,
        parser_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // Parses all of `src` (up to <EOF>) with `f` and renders the tree.
    fn render(f: SubParser, src: &str) -> String {
        let lexed = tokenize(src);
        assert!(lexed.errors.is_empty(), "lexer errors in {:?}", src);
        match f(&lexed.tokens) {
            Ok((rest, tree)) => {
                assert_eq!(rest.len(), 1, "unconsumed input in {:?}", src);
                tree.to_string()
            }
            Err(e) => panic!("parsing {:?} failed: {:?}", src, e),
        }
    }

    fn parse_ok(f: SubParser, src: &str, expected: &str) {
        assert_eq!(render(f, src), expected);
    }

    fn parse_err(f: SubParser, src: &str) {
        let lexed = tokenize(src);
        match f(&lexed.tokens) {
            Ok((rest, _)) => assert!(rest.len() > 1, "{:?} should not parse", src),
            Err(_) => {}
        }
    }

    #[test]
    fn test_term() {
        let parse_ok = |i, r| parse_ok(dl_term, i, r);
        parse_ok("x", "(Atom x)");
        parse_ok("42", "(Atom 42)");
        parse_ok(
            "x + 2 * y",
            "(BinaryExpr (Atom x) + (BinaryExpr (Atom 2) * (Atom y)))",
        );
        parse_ok(
            "a - b - c",
            "(BinaryExpr (BinaryExpr (Atom a) - (Atom b)) - (Atom c))",
        );
        parse_ok(
            "(a - b) ** c",
            "(BinaryExpr (ParenthesesTerm ( (BinaryExpr (Atom a) - (Atom b)) )) ** (Atom c))",
        );
        parse_ok(
            "-x ^ 2",
            "(UnaryExpr - (BinaryExpr (Atom x) ^ (Atom 2)))",
        );
        parse_ok(
            "a ^ b ^ c",
            "(BinaryExpr (Atom a) ^ (BinaryExpr (Atom b) ^ (Atom c)))",
        );

        parse_err(dl_term, "+ x");
        parse_err(dl_term, "(x");
        parse_err(dl_term, "x#R");
    }

    #[test]
    fn test_formula() {
        let parse_ok = |i, r| parse_ok(formula, i, r);
        parse_ok("true", "(Formula true)");
        parse_ok("x == 1", "(Formula (Atom x) == (Atom 1))");
        parse_ok(
            "x > 0 && y << 1 -> true",
            "(Formula (Formula (Formula (Atom x) > (Atom 0)) && (Formula (Atom y) << (Atom 1))) -> (Formula true))",
        );
        parse_ok(
            "!(x >= 0)",
            "(Formula ! (Formula ( (Formula (Atom x) >= (Atom 0)) )))",
        );
        parse_ok(
            "(x + 1) > 0",
            "(Formula (ParenthesesTerm ( (BinaryExpr (Atom x) + (Atom 1)) )) > (Atom 0))",
        );
        parse_ok(
            "a > 0 || b > 0 || c > 0",
            "(Formula (Formula (Formula (Atom a) > (Atom 0)) || (Formula (Atom b) > (Atom 0))) || (Formula (Atom c) > (Atom 0)))",
        );
        parse_ok(
            "[x := 1;] x >= 1",
            "(Formula [ (Program (Program (AssignmentIdentifier x) := (Atom 1)) ;) ] (Formula (Atom x) >= (Atom 1)))",
        );
        parse_ok(
            "<?x > 0;> true",
            "(Formula < (Program (Program ? (Formula (Atom x) > (Atom 0))) ;) > (Formula true))",
        );

        parse_err(formula, "x");
        parse_err(formula, "x > ");
        parse_err(formula, "[x := 1 x > 0");
    }

    #[test]
    fn test_program() {
        let parse_ok = |i, r| parse_ok(program, i, r);
        parse_ok(
            "x := 1; ?x > 0;",
            "(Program (Program (Program (AssignmentIdentifier x) := (Atom 1)) ; (Program ? (Formula (Atom x) > (Atom 0)))) ;)",
        );
        parse_ok("x := *", "(Program x := *)");
        parse_ok(
            "{x' = v, v' = -g & x >= 0}",
            "(Program { (Program (Program x' = (Atom v)) , (Program v' = (UnaryExpr - (Atom g)))) & (Formula (Atom x) >= (Atom 0)) })",
        );
        parse_ok(
            "{x := x + 1;}* ++ ?true",
            "(Program (Program { (Program (Program (AssignmentIdentifier x) := (BinaryExpr (Atom x) + (Atom 1))) ;) } *) ++ (Program ? (Formula true)))",
        );
        parse_ok(
            "{a := 1}",
            "(Program { (Program (AssignmentIdentifier a) := (Atom 1)) })",
        );

        parse_err(program, "x := ;");
        parse_err(program, "{x := 1");
        parse_err(program, "x = 1");
    }

    #[test]
    fn test_rel_program() {
        let parse_ok = |i, r| parse_ok(rel_program, i, r);
        parse_ok(
            "(# x := 1 ,# y := 2 )#",
            "(RelProgram (# (Program (AssignmentIdentifier x) := (Atom 1)) ,# (Program (AssignmentIdentifier y) := (Atom 2)) )#)",
        );
        parse_ok(
            "x :=# 0",
            "(RelProgram (AssignmentIdentifier x) :=# (Atom 0))",
        );
        parse_ok(
            "x :=# 0 (# ?true ,# ?true )#",
            "(RelProgram (RelProgram (AssignmentIdentifier x) :=# (Atom 0)) (RelProgram (# (Program ? (Formula true)) ,# (Program ? (Formula true)) )#))",
        );
        parse_ok(
            "{x :=# 1}*",
            "(RelProgram { (RelProgram (AssignmentIdentifier x) :=# (Atom 1)) } *)",
        );

        parse_err(rel_program, "(# x := 1 )#");
        parse_err(rel_program, "x := 1");
    }

    #[test]
    fn test_rel_formula() {
        let parse_ok = |i, r| parse_ok(rel_formula, i, r);
        parse_ok(
            "x#L == x#R",
            "(RelFormula (RelTerm x #L) == (RelTerm x #R))",
        );
        parse_ok(
            "[x :=# 1] (x#L + 1 > y)",
            "(RelFormula [ (RelProgram (AssignmentIdentifier x) :=# (Atom 1)) ] (RelFormula ( (RelFormula (BinaryExpr (RelTerm x #L) + (Atom 1)) > (Atom y)) )))",
        );
    }

    #[test]
    fn test_parse() {
        let parsed = parse(Dialect::Dl, "x := 1; ?x > 0;");
        assert!(!parsed.has_errors());
        let tree = parsed.tree.expect("tree");
        assert!(tree.to_string().starts_with("(DlProgram (Program"));
        assert!(tree.to_string().ends_with(" <EOF>)"));

        let parsed = parse(Dialect::Dl, "[x := 1;] x > 0");
        assert!(parsed.tree.is_some());

        let parsed = parse(
            Dialect::RelDl,
            "[(# x := 1 ,# x := 2 )#] x#L << x#R",
        );
        assert!(!parsed.has_errors());
        assert!(parsed
            .tree
            .expect("tree")
            .to_string()
            .starts_with("(RelDlProgram (RelFormula ["));
    }

    #[test]
    fn test_parse_errors() {
        let parsed = parse(Dialect::Dl, "x > 0 )");
        assert_eq!(parsed.tree, None);
        assert_eq!(
            parsed.parser_errors,
            vec![SyntaxError::Trailing {
                position: Position { line: 1, column: 7 },
                found: String::from(")"),
            }]
        );

        let parsed = parse(Dialect::Dl, "");
        assert_eq!(parsed.tree, None);
        assert_eq!(parsed.parser_errors.len(), 1);

        // DL does not know relational terms.
        let parsed = parse(Dialect::Dl, "x#L > 0");
        assert_eq!(parsed.tree, None);

        // A stray character is a lexer error; the rest still parses.
        let parsed = parse(Dialect::Dl, "x := 1 $;");
        assert_eq!(parsed.lexer_errors.len(), 1);
        assert!(parsed.parser_errors.is_empty());
        assert!(parsed.has_errors());
    }
}
