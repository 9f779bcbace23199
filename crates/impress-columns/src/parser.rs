//! Textual selector grammar using nom
//!
//! Accepts the composer surface written out as text:
//!
//! ```text
//! expr      := or_expr
//! or_expr   := and_expr ('|' and_expr)*
//! and_expr  := unary ('&' unary)*
//! unary     := '~' unary | atom
//! atom      := '(' expr ')' | '...' | composer | scalar
//! composer  := 'C' '[' labels ']'
//!            | 'C' '.' strmethod '(' string ')'
//!            | 'C' '.' 'dtype' '==' dtype
//!            | 'C' '.' 'dtype' '.' 'isin' '(' dtypes ')'
//!            | 'C' '.' 'levels' '[' (integer | string) ']' ('[' labels ']' | '.' strmethod '(' string ')')
//! strmethod := 'startswith' | 'endswith' | 'contains' | 'match'
//! label     := scalar | '(' scalar (',' scalar)+ ')'
//! scalar    := string | integer | 'True' | 'False'
//! ```
//!
//! Bare scalars are promoted to label selectors. `...` is only accepted as
//! an operand of `|`.

use crate::ast::Selector;
use crate::composer::C;
use crate::error::{SelectError, SelectResult};
use crate::label::{Dtype, Label, LevelRef, Scalar};
use crate::matcher::{Matcher, Pattern};
use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, tag, take_while, take_while1},
    character::complete::{char, digit0, digit1, multispace0, satisfy},
    combinator::{map, map_res, not, opt, recognize, value},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use thiserror::Error;

/// Parse errors
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Empty selector expression")]
    Empty,

    #[error("Parse error: {0}")]
    Syntax(String),

    #[error(transparent)]
    Select(#[from] SelectError),
}

/// Parse a selector expression from a string
pub fn parse_selector(input: &str) -> Result<Selector, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseError::Empty);
    }

    match expr(input) {
        Ok(("", term)) => Ok(build(term)?),
        Ok((remaining, _)) => Err(ParseError::Syntax(format!(
            "Unexpected characters at end: '{}'",
            remaining
        ))),
        Err(e) => Err(ParseError::Syntax(format!("{:?}", e))),
    }
}

/// Parsed operand before structural checks
#[derive(Debug, Clone)]
enum Term {
    Node(Selector),
    Regex {
        level: Option<LevelRef>,
        pattern: String,
    },
    Rest,
    Invalid(String),
    Or(Box<Term>, Box<Term>),
    And(Box<Term>, Box<Term>),
    Not(Box<Term>),
}

fn build(term: Term) -> SelectResult<Selector> {
    match term {
        Term::Node(selector) => Ok(selector),
        Term::Regex { level, pattern } => Ok(Selector::ByPredicate {
            level,
            matcher: Matcher::Regex(Pattern::new(&pattern)?),
        }),
        Term::Rest => Err(SelectError::InvalidComposition(
            "'...' is only valid as an operand of '|'".to_string(),
        )),
        Term::Invalid(text) => Err(SelectError::InvalidOperand(format!(
            "'{}' is not a selector",
            text
        ))),
        Term::Or(left, right) => Selector::or_else(build_or_operand(*left)?, build_or_operand(*right)?),
        Term::And(left, right) => Selector::and_also(build(*left)?, build(*right)?),
        Term::Not(inner) => Selector::negate(build(*inner)?),
    }
}

fn build_or_operand(term: Term) -> SelectResult<Selector> {
    match term {
        Term::Rest => Ok(Selector::AllRemaining),
        other => build(other),
    }
}

/// Parse whitespace
fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A word not followed by more identifier characters
fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag(word), not(satisfy(is_ident_char)))
}

/// Parse an expression (entry point)
fn expr(input: &str) -> IResult<&str, Term> {
    or_expr(input)
}

/// Parse OR expressions
fn or_expr(input: &str) -> IResult<&str, Term> {
    let (input, first) = and_expr(input)?;
    let (input, rest) = many0(preceded(ws(char('|')), and_expr))(input)?;

    let result = rest
        .into_iter()
        .fold(first, |acc, t| Term::Or(Box::new(acc), Box::new(t)));
    Ok((input, result))
}

/// Parse AND expressions
fn and_expr(input: &str) -> IResult<&str, Term> {
    let (input, first) = unary(input)?;
    let (input, rest) = many0(preceded(ws(char('&')), unary))(input)?;

    let result = rest
        .into_iter()
        .fold(first, |acc, t| Term::And(Box::new(acc), Box::new(t)));
    Ok((input, result))
}

/// Parse NOT expressions
fn unary(input: &str) -> IResult<&str, Term> {
    alt((
        map(preceded(ws(char('~')), unary), |t| Term::Not(Box::new(t))),
        atom,
    ))(input)
}

/// Parse atomic operands
fn atom(input: &str) -> IResult<&str, Term> {
    ws(alt((
        // Parenthesized expression
        delimited(char('('), expr, char(')')),
        // Ellipsis
        value(Term::Rest, tag("...")),
        // Composer facade
        composer,
        // Floats are never column labels
        map(float_literal, |s| Term::Invalid(s.to_string())),
        // Bare scalar, promoted to a label selector
        map(scalar, |s| Term::Node(Selector::by_label([Label::Scalar(s)]))),
        // Anything else that looks like a name
        map(invalid_path, |s| Term::Invalid(s.to_string())),
    )))(input)
}

/// Parse `C[...]` or `C.<method>`
fn composer(input: &str) -> IResult<&str, Term> {
    let (input, _) = keyword("C")(input)?;
    alt((
        map(label_list, |labels| Term::Node(Selector::by_label(labels))),
        preceded(ws(char('.')), method),
    ))(input)
}

fn method(input: &str) -> IResult<&str, Term> {
    alt((
        dtype_method,
        levels_method,
        map(string_method, |(name, arg)| string_term(None, name, arg)),
    ))(input)
}

/// Parse `dtype == T` or `dtype.isin((T, ...))`
fn dtype_method(input: &str) -> IResult<&str, Term> {
    let (input, _) = keyword("dtype")(input)?;
    alt((
        map(preceded(ws(tag("==")), ws(dtype_name)), |dtype| {
            Term::Node(C::dtype().eq(dtype))
        }),
        map(
            preceded(
                pair(ws(char('.')), keyword("isin")),
                delimited(ws(char('(')), dtype_collection, ws(char(')'))),
            ),
            |dtypes| Term::Node(C::dtype().is_in(dtypes)),
        ),
    ))(input)
}

/// Parse `levels[k][...]` or `levels[k].<strmethod>(...)`
fn levels_method(input: &str) -> IResult<&str, Term> {
    let (input, _) = keyword("levels")(input)?;
    let (input, level) = delimited(ws(char('[')), ws(level_ref), ws(char(']')))(input)?;
    let by_label = level.clone();
    alt((
        map(label_list, move |labels| {
            Term::Node(Selector::by_level_label(by_label.clone(), labels))
        }),
        map(preceded(ws(char('.')), string_method), move |(name, arg)| {
            string_term(Some(level.clone()), name, arg)
        }),
    ))(input)
}

fn string_method(input: &str) -> IResult<&str, (&str, String)> {
    pair(
        alt((
            keyword("startswith"),
            keyword("endswith"),
            keyword("contains"),
            keyword("match"),
        )),
        delimited(ws(char('(')), string_literal, ws(char(')'))),
    )(input)
}

fn string_term(level: Option<LevelRef>, name: &str, arg: String) -> Term {
    let matcher = match name {
        "startswith" => Matcher::StartsWith(arg),
        "endswith" => Matcher::EndsWith(arg),
        "contains" => Matcher::Contains(arg),
        _ => {
            return Term::Regex {
                level,
                pattern: arg,
            }
        }
    };
    Term::Node(Selector::ByPredicate { level, matcher })
}

fn level_ref(input: &str) -> IResult<&str, LevelRef> {
    alt((
        map_res(digit1, |s: &str| s.parse::<usize>().map(LevelRef::Position)),
        map(string_literal, LevelRef::Name),
    ))(input)
}

/// Parse `[label, ...]`
fn label_list(input: &str) -> IResult<&str, Vec<Label>> {
    delimited(
        ws(char('[')),
        separated_list1(ws(char(',')), ws(label)),
        preceded(opt(ws(char(','))), ws(char(']'))),
    )(input)
}

fn label(input: &str) -> IResult<&str, Label> {
    alt((
        map(
            delimited(
                ws(char('(')),
                separated_list1(ws(char(',')), ws(scalar)),
                preceded(opt(ws(char(','))), ws(char(')'))),
            ),
            |mut parts| {
                if parts.len() == 1 {
                    Label::Scalar(parts.remove(0))
                } else {
                    Label::Tuple(parts)
                }
            },
        ),
        map(scalar, Label::Scalar),
    ))(input)
}

fn scalar(input: &str) -> IResult<&str, Scalar> {
    alt((
        map(string_literal, Scalar::Str),
        value(Scalar::Bool(true), keyword("True")),
        value(Scalar::Bool(false), keyword("False")),
        map_res(
            terminated(recognize(pair(opt(char('-')), digit1)), not(char('.'))),
            |s: &str| s.parse::<i64>().map(Scalar::Int),
        ),
    ))(input)
}

fn dtype_collection(input: &str) -> IResult<&str, Vec<Dtype>> {
    alt((
        delimited(
            ws(char('(')),
            separated_list1(ws(char(',')), ws(dtype_name)),
            preceded(opt(ws(char(','))), ws(char(')'))),
        ),
        delimited(
            ws(char('[')),
            separated_list1(ws(char(',')), ws(dtype_name)),
            preceded(opt(ws(char(','))), ws(char(']'))),
        ),
    ))(input)
}

/// Parse a dtype: `str`, `np.float64`, `datetime64[ns]` or a quoted name
fn dtype_name(input: &str) -> IResult<&str, Dtype> {
    alt((
        map(string_literal, |s| Dtype::from_host_name(&s)),
        map(
            recognize(pair(
                separated_list1(char('.'), identifier),
                opt(delimited(char('['), take_while(is_ident_char), char(']'))),
            )),
            |name: &str| Dtype::from_host_name(name.rsplit('.').next().unwrap_or(name)),
        ),
    ))(input)
}

/// Parse a float literal
fn float_literal(input: &str) -> IResult<&str, &str> {
    recognize(tuple((opt(char('-')), digit1, char('.'), digit0)))(input)
}

/// Parse a dotted name with an optional call, e.g. `np.nan` or `C.first(2)`
fn invalid_path(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        separated_list1(char('.'), identifier),
        opt(delimited(char('('), take_while(|c| c != ')'), char(')'))),
    )))(input)
}

/// Parse an identifier (starts with letter or underscore, followed by alphanumeric or underscore)
fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(is_ident_char),
    ))(input)
}

/// Parse a string literal, single or double quoted
fn string_literal(input: &str) -> IResult<&str, String> {
    alt((quoted('"'), quoted('\'')))(input)
}

/// Quoted text with `\\`, `\"` and `\'` escapes
fn quoted<'a>(quote: char) -> impl FnMut(&'a str) -> IResult<&'a str, String> {
    delimited(
        char(quote),
        map(
            opt(escaped_transform(
                take_while1(move |c: char| c != quote && c != '\\'),
                '\\',
                alt((
                    value("\\", char('\\')),
                    value("\"", char('"')),
                    value("'", char('\'')),
                )),
            )),
            |text| text.unwrap_or_default(),
        ),
        char(quote),
    )
}
