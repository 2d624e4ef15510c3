//! Parsers for the comma separated lists used on the command line, such as
//! `"10, 10, 5"` for a room or `"3,3"` for a microphone grid. Whitespace
//! around the numbers is ignored.

use crate::geometry::Point3;

use nom::{
    character::complete::{char, i64, multispace0},
    combinator::all_consuming,
    multi::separated_list1,
    number::complete::double,
    sequence::delimited,
    Finish, IResult,
};

fn padded_comma(s: &str) -> IResult<&str, char> {
    delimited(multispace0, char(','), multispace0)(s)
}

fn parse_real_list(s: &str) -> IResult<&str, Vec<f64>> {
    all_consuming(delimited(
        multispace0,
        separated_list1(padded_comma, double),
        multispace0,
    ))(s)
}

fn parse_int_list(s: &str) -> IResult<&str, Vec<i64>> {
    all_consuming(delimited(
        multispace0,
        separated_list1(padded_comma, i64),
        multispace0,
    ))(s)
}

fn format_error(expected: &str, s: &str) -> String {
    format!(
        "please ensure entry fields comply with the given formats: expected {}, got \"{}\"",
        expected, s
    )
}

/// Parses any number of comma separated reals.
pub fn parse_reals(s: &str) -> Result<Vec<f64>, String> {
    match parse_real_list(s).finish() {
        Ok((_remaining, values)) => Ok(values),
        Err(_) => Err(format_error("comma separated numbers", s)),
    }
}

/// Parses exactly three comma separated reals into a point.
pub fn parse_point(s: &str) -> Result<Point3, String> {
    match parse_reals(s)?.as_slice() {
        &[x, y, z] => Ok(Point3::new(x, y, z)),
        _ => Err(format_error("three numbers (float, float, float)", s)),
    }
}

/// Parses exactly two comma separated integers. Negative values are
/// accepted here so they can be reported along with every other negative
/// parameter.
pub fn parse_int_pair(s: &str) -> Result<(i64, i64), String> {
    match parse_int_list(s).finish() {
        Ok((_remaining, values)) => match values.as_slice() {
            &[a, b] => Ok((a, b)),
            _ => Err(format_error("two integers (int, int)", s)),
        },
        Err(_) => Err(format_error("two integers (int, int)", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point() {
        assert_eq!(parse_point("10, 10, 5"), Ok(Point3::new(10.0, 10.0, 5.0)));
        assert_eq!(parse_point("6,6,2"), Ok(Point3::new(6.0, 6.0, 2.0)));
        assert_eq!(
            parse_point("  0.5 ,-1.25,  3e1 "),
            Ok(Point3::new(0.5, -1.25, 30.0))
        );
    }

    #[test]
    fn test_point_wrong_arity() {
        assert!(parse_point("10, 10").is_err());
        assert!(parse_point("1, 2, 3, 4").is_err());
    }

    #[test]
    fn test_point_garbage() {
        assert!(parse_point("").is_err());
        assert!(parse_point("a, b, c").is_err());
        assert!(parse_point("1, 2,, 3").is_err());
        assert!(parse_point("1, 2, 3,").is_err());
    }

    #[test]
    fn test_reals() {
        assert_eq!(parse_reals("3"), Ok(vec![3.0]));
        assert_eq!(parse_reals("1,2 , 3 ,4"), Ok(vec![1.0, 2.0, 3.0, 4.0]));
    }

    #[test]
    fn test_int_pair() {
        assert_eq!(parse_int_pair("3, 3"), Ok((3, 3)));
        assert_eq!(parse_int_pair("4,-2"), Ok((4, -2)));
        assert!(parse_int_pair("3").is_err());
        assert!(parse_int_pair("3.5, 2").is_err());
        assert!(parse_int_pair("1, 2, 3").is_err());
    }
}
