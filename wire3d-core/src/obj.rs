//! Statement parser for the OBJ subset understood by [`Mesh::load`]
//!
//! Only `v`, `f`, `fo` and `l` carry meaning; any other keyword line is
//! skipped. `#` starts a comment that runs to the end of the line.
//!
//! [`Mesh::load`]: crate::mesh::Mesh::load
use nom::{
    bytes::complete::{take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{map_res, opt, recognize},
    number::complete::recognize_float,
    sequence::{pair, preceded},
    IResult,
};

use crate::geometry::Point;

/// One parsed line of input.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Statement {
    /// Empty or comment-only line.
    Blank,
    /// `v x y z`, missing coordinates default to zero.
    Vertex(Point),
    /// `f`, `fo` or `l`: 1-based indices as written.
    Polygon(Vec<i64>),
    /// Any other keyword.
    Ignored,
}

/// A token the grammar does not allow, located by byte column (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Unexpected {
    pub column: usize,
    pub token: String,
}

/// Strip a trailing `#` comment.
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(at) => &line[..at],
        None => line,
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')
}

fn keyword(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_alphabetic()),
        take_while(is_word_char),
    ))(input)
}

/// A plain decimal number. Words such as `nan` or `inf` are not numbers.
fn number(input: &str) -> IResult<&str, f64> {
    map_res(recognize_float, str::parse::<f64>)(input)
}

fn coordinate(input: &str) -> IResult<&str, f64> {
    preceded(multispace0, number)(input)
}

/// `/`-prefixed sub-field such as the texture or normal slot of `f 1/2/3`.
fn sub_field(input: &str) -> IResult<&str, Option<f64>> {
    preceded(char('/'), opt(number))(input)
}

fn parse_vertex(mut rest: &str) -> Point {
    let mut xyz = [0.0; 3];
    for slot in &mut xyz {
        match coordinate(rest) {
            Ok((tail, value)) => {
                *slot = value;
                rest = tail;
            }
            Err(_) => break,
        }
    }
    Point::new(xyz[0], xyz[1], xyz[2])
}

fn parse_indices<'a>(line: &'a str, mut rest: &'a str) -> Result<Vec<i64>, Unexpected> {
    let mut indices = Vec::new();
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            return Ok(indices);
        }
        if let Ok((tail, _)) = sub_field(rest) {
            rest = tail;
            continue;
        }
        match number(rest) {
            // Indices are truncated like any integer cast of a parsed number.
            Ok((tail, value)) => {
                indices.push(value as i64);
                rest = tail;
            }
            Err(_) => return Err(unexpected(line, rest)),
        }
    }
}

fn unexpected(line: &str, rest: &str) -> Unexpected {
    let token = rest
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string();
    Unexpected {
        column: line.len() - rest.len() + 1,
        token,
    }
}

/// Parse one input line.
pub(crate) fn parse_statement(line: &str) -> Result<Statement, Unexpected> {
    let body = strip_comment(line);
    let rest = body.trim_start();
    if rest.is_empty() {
        return Ok(Statement::Blank);
    }

    let (tail, word) = keyword(rest).map_err(|_| unexpected(body, rest))?;
    match word {
        "v" => Ok(Statement::Vertex(parse_vertex(tail))),
        "f" | "fo" | "l" => parse_indices(body, tail).map(Statement::Polygon),
        _ => Ok(Statement::Ignored),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_statement() {
        assert_eq!(
            parse_statement("v 1.5 -2 3e1"),
            Ok(Statement::Vertex(Point::new(1.5, -2.0, 30.0)))
        );
    }

    #[test]
    fn test_vertex_missing_coordinates_default_to_zero() {
        assert_eq!(
            parse_statement("v 4"),
            Ok(Statement::Vertex(Point::new(4.0, 0.0, 0.0)))
        );
        assert_eq!(
            parse_statement("v"),
            Ok(Statement::Vertex(Point::new(0.0, 0.0, 0.0)))
        );
        // Anything after the first non-number is ignored.
        assert_eq!(
            parse_statement("v 1 2 w 7"),
            Ok(Statement::Vertex(Point::new(1.0, 2.0, 0.0)))
        );
    }

    #[test]
    fn test_face_with_sub_fields() {
        assert_eq!(
            parse_statement("f 1/4/7 2/5/8 3//9"),
            Ok(Statement::Polygon(vec![1, 2, 3]))
        );
        assert_eq!(
            parse_statement("fo 3 2 1"),
            Ok(Statement::Polygon(vec![3, 2, 1]))
        );
        assert_eq!(parse_statement("l 5 6"), Ok(Statement::Polygon(vec![5, 6])));
    }

    #[test]
    fn test_comments_and_other_keywords() {
        assert_eq!(parse_statement(""), Ok(Statement::Blank));
        assert_eq!(parse_statement("   # a comment"), Ok(Statement::Blank));
        assert_eq!(parse_statement("vn 0 0 1"), Ok(Statement::Ignored));
        assert_eq!(parse_statement("usemtl shiny!"), Ok(Statement::Ignored));
        assert_eq!(
            parse_statement("f 1 2 3 # trailing"),
            Ok(Statement::Polygon(vec![1, 2, 3]))
        );
    }

    #[test]
    fn test_illegal_face_token() {
        let err = parse_statement("f 1 2 x 3").unwrap_err();
        assert_eq!(err.token, "x");
        assert_eq!(err.column, 7);
    }

    #[test]
    fn test_non_finite_words_are_not_indices() {
        let err = parse_statement("f 1 nan 2").unwrap_err();
        assert_eq!((err.token.as_str(), err.column), ("nan", 5));

        let err = parse_statement("l 1 inf").unwrap_err();
        assert_eq!((err.token.as_str(), err.column), ("inf", 5));

        let err = parse_statement("l 1 Infinity").unwrap_err();
        assert_eq!((err.token.as_str(), err.column), ("Infinity", 5));

        let err = parse_statement("f 1/nan 2").unwrap_err();
        assert_eq!(err.token, "nan");
    }

    #[test]
    fn test_non_finite_words_are_not_coordinates() {
        assert_eq!(
            parse_statement("v nan 1 2"),
            Ok(Statement::Vertex(Point::new(0.0, 0.0, 0.0)))
        );
        assert_eq!(
            parse_statement("v 3 -inf 2"),
            Ok(Statement::Vertex(Point::new(3.0, 0.0, 0.0)))
        );
    }

    #[test]
    fn test_illegal_leading_token() {
        let err = parse_statement("  42 1 2").unwrap_err();
        assert_eq!(err.token, "42");
        assert_eq!(err.column, 3);
    }
}
