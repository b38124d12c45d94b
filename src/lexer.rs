// Licensed under MIT. See LICENSE for details.

use nom::branch::alt;
use nom::bytes::complete::{tag, take_until};
use nom::character::complete::{alpha1, alphanumeric1, char, digit1, multispace1, not_line_ending};
use nom::combinator::{map, opt, recognize, value};
use nom::multi::{many0_count, many1};
use nom::sequence::{pair, terminated, tuple};
use nom::IResult;

use crate::error::{LexError, Position};
use crate::tree::{Token, TokenKind, EOF_TEXT};

const KEYWORDS: [&str; 2] = ["true", "false"];

/// Token stream plus the lexical errors hit on the way. Unrecognised
/// characters are reported and skipped, so the stream is always complete.
#[derive(Clone, Debug, PartialEq)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

// "//" to comment out the rest of the line.
fn comment_line(input: &str) -> IResult<&str, &str> {
    recognize(pair(tag("//"), not_line_ending))(input)
}

// Block comments wrapped in /* ... */.
fn comment_block(input: &str) -> IResult<&str, &str> {
    recognize(tuple((tag("/*"), take_until("*/"), tag("*/"))))(input)
}

// Spaces, newlines, and comments.
fn blanks(input: &str) -> IResult<&str, ()> {
    value((), many1(alt((multispace1, comment_line, comment_block))))(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))(input)
}

// x' as used on the left of an ODE.
fn identifier_prime(input: &str) -> IResult<&str, &str> {
    recognize(terminated(identifier, char('\'')))(input)
}

fn number(input: &str) -> IResult<&str, &str> {
    recognize(pair(digit1, opt(pair(char('.'), digit1))))(input)
}

fn relational(input: &str) -> IResult<&str, (TokenKind, &str)> {
    alt((
        map(tag(":=#"), |t| (TokenKind::RelAssign, t)),
        map(tag("(#"), |t| (TokenKind::RelOpen, t)),
        map(tag(",#"), |t| (TokenKind::RelComma, t)),
        map(tag(")#"), |t| (TokenKind::RelClose, t)),
        map(alt((tag("#L"), tag("#R"))), |t| (TokenKind::ProgramConsidered, t)),
    ))(input)
}

// Longest operators first.
fn operator(input: &str) -> IResult<&str, &str> {
    alt((
        alt((
            tag("<->"),
            tag(":="),
            tag("++"),
            tag("**"),
            tag("<="),
            tag(">="),
            tag("<<"),
            tag(">>"),
            tag("=="),
            tag("!="),
            tag("&&"),
            tag("||"),
            tag("->"),
        )),
        alt((
            tag(";"),
            tag("*"),
            tag("+"),
            tag("-"),
            tag("/"),
            tag("^"),
            tag("("),
            tag(")"),
            tag("["),
            tag("]"),
            tag("{"),
            tag("}"),
            tag("<"),
            tag(">"),
            tag("="),
            tag("!"),
            tag("&"),
            tag(","),
            tag("?"),
        )),
    ))(input)
}

fn token(input: &str) -> IResult<&str, (TokenKind, &str)> {
    alt((
        relational,
        map(identifier_prime, |t| (TokenKind::IdentifierPrime, t)),
        map(identifier, |t| {
            if KEYWORDS.contains(&t) {
                (TokenKind::Keyword, t)
            } else {
                (TokenKind::Identifier, t)
            }
        }),
        map(number, |t| (TokenKind::Number, t)),
        map(operator, |t| (TokenKind::Operator, t)),
    ))(input)
}

pub fn tokenize(source: &str) -> Lexed {
    let mut tokens = vec![];
    let mut errors = vec![];
    let mut rest = source;

    loop {
        if let Ok((after, _)) = blanks(rest) {
            rest = after;
        }

        let offset = source.len() - rest.len();
        match token(rest) {
            Ok((after, (kind, text))) => {
                tokens.push(Token::new(kind, text, offset));
                rest = after;
            }
            Err(_) => match rest.chars().next() {
                Some(bad) => {
                    let err = LexError {
                        position: Position::of_offset(source, offset),
                        text: bad.to_string(),
                    };
                    tracing::error!("{}", err);
                    errors.push(err);
                    rest = &rest[bad.len_utf8()..];
                }
                None => break,
            },
        }
    }

    tokens.push(Token::new(TokenKind::Eof, EOF_TEXT, source.len()));
    tracing::debug!(
        "Lexing completed with {} token(s) and {} lexer error(s).",
        tokens.len(),
        errors.len()
    );
    Lexed { tokens, errors }
}
