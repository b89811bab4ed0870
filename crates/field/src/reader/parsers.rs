//! Library of parser functions

// nom parser combinators
use nom::bytes::complete::{is_a, tag_no_case};
use nom::character::complete::{self, space0, space1};
use nom::combinator::all_consuming;
use nom::multi::many1;
use nom::number::complete::double;
use nom::sequence::{delimited, preceded, terminated, tuple};
use nom::IResult;

/// Characters that may appear in a numeric token
const NUMERIC_CHARACTERS: &str = "0123456789Ee.+-";

// ! Boolean checks

/// Check for the `augmentation occupancies` block that follows a grid
pub fn is_augmentation(i: &str) -> bool {
    tag_no_case::<&str, &str, ()>("augmentation")(i.trim_start()).is_ok()
}

/// Check for the optional `Selective dynamics` line
pub fn is_selective_dynamics(i: &str) -> bool {
    matches!(i.trim_start().chars().next(), Some('s' | 'S'))
}

/// Check for any a-z/A-Z character in the line
pub fn contains_alphabetic(i: &str) -> bool {
    i.chars().any(char::is_alphabetic)
}

/// Check for a line with nothing but whitespace
pub fn is_blank(i: &str) -> bool {
    i.trim().is_empty()
}

// ! Parser combinators

/// A line containing a single number, e.g. the universal scaling factor
pub fn scalar(i: &str) -> IResult<&str, f64> {
    all_consuming(delimited(space0, double, space0))(i.trim_end())
}

/// Three numbers in sequence, e.g. a lattice vector
pub fn vector3(i: &str) -> IResult<&str, [f64; 3]> {
    let (i, (a, b, c)) = tuple((
        preceded(space0, double),
        preceded(space1, double),
        preceded(space1, double),
    ))(i)?;
    Ok((i, [a, b, c]))
}

/// Any number of whitespace separated integers, e.g. the species counts
pub fn vector_of_u32(i: &str) -> IResult<&str, Vec<u32>> {
    many1(terminated(complete::u32, space0))(i.trim_start())
}

/// The `nx ny nz` grid dimension line
pub fn grid_dimensions(i: &str) -> IResult<&str, [usize; 3]> {
    let (i, (nx, ny, nz)) = tuple((
        preceded(space0, complete::u32),
        preceded(space1, complete::u32),
        preceded(space1, complete::u32),
    ))(i)?;
    Ok((i, [nx as usize, ny as usize, nz as usize]))
}

/// Every number that can be recognised in a line of grid data
///
/// Ordinary whitespace separated values take the fast path. Anything else is
/// scanned permissively, so run-on numbers such as `1.0E+00-2.0E+00` are split
/// and junk characters are skipped rather than failing the whole line.
///
/// ```rust
/// # use chgtools_field::reader::parsers::numeric_tokens;
/// assert_eq!(numeric_tokens(" 0.1E+01 -0.5E+00 3"), vec![1.0, -0.5, 3.0]);
/// assert_eq!(numeric_tokens("1.0E+00-2.0E+00"), vec![1.0, -2.0]);
/// assert_eq!(numeric_tokens("x=4.5;y=2"), vec![4.5, 2.0]);
/// assert!(numeric_tokens("NaN inf").is_empty());
/// ```
pub fn numeric_tokens(i: &str) -> Vec<f64> {
    let mut values = Vec::new();
    for token in i.split_whitespace() {
        match fast_token(token) {
            Some(v) => values.push(v),
            None => scan_token(token, &mut values),
        }
    }
    values
}

/// Plain float token made only of numeric characters
fn fast_token(token: &str) -> Option<f64> {
    if token.chars().all(|c| NUMERIC_CHARACTERS.contains(c)) {
        token.parse::<f64>().ok()
    } else {
        None
    }
}

/// Pull every parsable number out of a messy token
fn scan_token(token: &str, values: &mut Vec<f64>) {
    let mut rest = token;
    while !rest.is_empty() {
        match numeric_run(rest) {
            Ok((remaining, run)) => {
                split_run(run, values);
                rest = remaining;
            }
            Err(_) => rest = skip_one(rest),
        }
    }
}

/// Split a run of numeric characters into as many numbers as possible
fn split_run(run: &str, values: &mut Vec<f64>) {
    let mut rest = run;
    while !rest.is_empty() {
        match double::<&str, ()>(rest) {
            Ok((remaining, v)) if remaining.len() < rest.len() => {
                values.push(v);
                rest = remaining;
            }
            _ => rest = skip_one(rest),
        }
    }
}

/// Longest run of characters that could belong to a number
fn numeric_run(i: &str) -> IResult<&str, &str> {
    is_a(NUMERIC_CHARACTERS)(i)
}

/// Drop the first character of a string slice
fn skip_one(i: &str) -> &str {
    let mut chars = i.chars();
    chars.next();
    chars.as_str()
}
