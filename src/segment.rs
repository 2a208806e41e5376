//! Expression segmentation
//!
//! Splits text holding several parenthesized S-expressions into the spans of
//! its top-level expressions. This is not a parser: content outside balanced
//! parentheses is dropped, and an unclosed trailing group is discarded.

/// Split `input` into its top-level parenthesized expressions.
///
/// Each returned slice is the exact span of one expression, including its own
/// parentheses, in left-to-right order.
///
/// ```
/// use proplog::segment::segment;
/// assert_eq!(segment("(A)(B (C))"), vec!["(A)", "(B (C))"]);
/// ```
pub fn segment(input: &str) -> Vec<&str> {
    let mut expressions = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (i, ch) in input.char_indices() {
        match ch {
            '(' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            ')' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    expressions.push(&input[start..i + 1]);
                }
            }
            // Stray closer or text outside any group
            _ => {}
        }
    }

    expressions
}

/// Remove one pair of enclosing parentheses (after trimming whitespace).
///
/// Returns the input trimmed but otherwise unchanged if it is not wrapped.
pub fn strip_outer_parens(input: &str) -> &str {
    let trimmed = input.trim();
    trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(trimmed)
}

/// Split a parenthesized group into its head word and the remaining text.
///
/// `(Move (|a|) (|b|))` → `("Move", " (|a|) (|b|)")`. The head is the run of
/// characters after `(` up to the first whitespace or parenthesis. Returns
/// `None` if the input is not a parenthesized group or the head is empty.
pub fn split_head(input: &str) -> Option<(&str, &str)> {
    let trimmed = input.trim();
    if !trimmed.starts_with('(') || !trimmed.ends_with(')') || trimmed.len() < 2 {
        return None;
    }
    let inner = &trimmed[1..trimmed.len() - 1];
    let end = inner
        .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
        .unwrap_or(inner.len());
    if end == 0 {
        return None;
    }
    Some((&inner[..end], &inner[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_between_expressions() {
        assert_eq!(segment("  (A)\n\t (B)  "), vec!["(A)", "(B)"]);
    }

    #[test]
    fn test_junk_outside_groups_is_dropped() {
        assert_eq!(segment("part_a (P) x (Q)"), vec!["(P)", "(Q)"]);
    }

    #[test]
    fn test_unclosed_tail_is_dropped() {
        assert_eq!(segment("(A) (B (C)"), vec!["(A)"]);
    }

    #[test]
    fn test_stray_close_is_ignored() {
        assert_eq!(segment(") (A)"), vec!["(A)"]);
    }

    #[test]
    fn test_strip_outer_parens() {
        assert_eq!(strip_outer_parens(" (part_a (P)) "), "part_a (P)");
        assert_eq!(strip_outer_parens("P"), "P");
    }

    #[test]
    fn test_split_head() {
        assert_eq!(split_head("(Param (|x|))"), Some(("Param", " (|x|)")));
        assert_eq!(split_head("(Move)"), Some(("Move", "")));
        assert_eq!(split_head("((P))"), None);
        assert_eq!(split_head("Move"), None);
    }
}
