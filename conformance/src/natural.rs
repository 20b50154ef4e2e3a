//! Natural ordering: embedded digit runs compare numerically, so `item-2`
//! sorts before `item-10`.

use std::cmp::Ordering;

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Number(&'a str),
    Text(String),
}

fn segments(s: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_digits = None;
    for (i, c) in s.char_indices() {
        let digit = c.is_ascii_digit();
        match in_digits {
            Some(d) if d != digit => {
                out.push(segment(&s[start..i], d));
                start = i;
            }
            _ => {}
        }
        in_digits = Some(digit);
    }
    if let Some(d) = in_digits {
        out.push(segment(&s[start..], d));
    }
    out
}

fn segment(run: &str, digits: bool) -> Segment<'_> {
    if digits {
        let trimmed = run.trim_start_matches('0');
        Segment::Number(if trimmed.is_empty() { "0" } else { trimmed })
    } else {
        Segment::Text(run.to_lowercase())
    }
}

fn cmp_segment(a: &Segment<'_>, b: &Segment<'_>) -> Ordering {
    match (a, b) {
        // Leading zeros are trimmed, so a longer run is a larger number.
        (Segment::Number(x), Segment::Number(y)) => x.len().cmp(&y.len()).then_with(|| x.cmp(y)),
        (Segment::Text(x), Segment::Text(y)) => x.cmp(y),
        (Segment::Number(_), Segment::Text(_)) => Ordering::Less,
        (Segment::Text(_), Segment::Number(_)) => Ordering::Greater,
    }
}

/// Compares two names in natural order. Ties fall back to byte order so the
/// result is total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (sa, sb) = (segments(a), segments(b));
    sa.iter()
        .zip(sb.iter())
        .map(|(x, y)| cmp_segment(x, y))
        .find(|o| o.is_ne())
        .unwrap_or_else(|| sa.len().cmp(&sb.len()))
        .then_with(|| a.cmp(b))
}

/// Sorts names in place in natural order.
pub fn sort_natural<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by(|a, b| natural_cmp(a.as_ref(), b.as_ref()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_runs_sort_numerically() {
        let mut names = vec!["item-2", "item-10", "item-1"];
        sort_natural(&mut names);
        assert_eq!(names, vec!["item-1", "item-2", "item-10"]);
    }

    #[test]
    fn case_insensitive_text() {
        assert_eq!(natural_cmp("Alpha", "beta"), Ordering::Less);
        assert_eq!(natural_cmp("test-3", "Test-20"), Ordering::Less);
    }

    #[test]
    fn leading_zeros_and_long_numbers() {
        assert_eq!(natural_cmp("a007", "a8"), Ordering::Less);
        assert_eq!(
            natural_cmp("n99999999999999999999999", "n100000000000000000000000"),
            Ordering::Less
        );
    }

    #[test]
    fn prefix_sorts_first_and_order_is_total() {
        assert_eq!(natural_cmp("item", "item-1"), Ordering::Less);
        assert_eq!(natural_cmp("a01", "a1"), Ordering::Less);
        assert_eq!(natural_cmp("same", "same"), Ordering::Equal);
    }
}
