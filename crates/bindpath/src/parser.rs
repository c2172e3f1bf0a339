//! A `nom`-based parser for binding paths.
use crate::ast::{BindingPath, Segment, Selector};
use crate::error::PathError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{take_while, take_while_m_n},
    character::complete::{char, u64 as nom_u64},
    combinator::{map, opt, recognize},
    multi::separated_list1,
    sequence::{delimited, pair, preceded},
};

// --- Main Public Parser ---

pub fn parse_path(input: &str) -> Result<BindingPath, PathError> {
    match path(input.trim()) {
        Ok(("", parsed)) => Ok(parsed),
        Ok((rem, _)) => Err(PathError::Parse {
            path: input.to_string(),
            message: format!("unexpected input '{}'", rem),
        }),
        Err(e) => Err(PathError::Parse {
            path: input.to_string(),
            message: e.to_string(),
        }),
    }
}

// --- Combinators ---

fn path(input: &str) -> IResult<&str, BindingPath> {
    alt((
        map(char('.'), |_| BindingPath::current()),
        map(preceded(char('/'), segments), |segments| BindingPath {
            absolute: true,
            segments,
        }),
        map(segments, |segments| BindingPath {
            absolute: false,
            segments,
        }),
    ))
    .parse(input)
}

fn segments(input: &str) -> IResult<&str, Vec<Segment>> {
    separated_list1(char('/'), segment).parse(input)
}

fn segment(input: &str) -> IResult<&str, Segment> {
    map(pair(name, opt(selector)), |(name, selector)| Segment {
        name: name.to_string(),
        selector,
    })
    .parse(input)
}

fn name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while_m_n(1, 1, |c: char| c.is_ascii_alphabetic() || c == '_' || c == '@'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
    ))
    .parse(input)
}

fn selector(input: &str) -> IResult<&str, Selector> {
    delimited(
        char('['),
        alt((
            map(char('*'), |_| Selector::All),
            map(nom_u64, |i| Selector::Index(i as usize)),
        )),
        char(']'),
    )
    .parse(input)
}
