use crate::traits::Scorer;

/// Bonus when a query containing `.` matches the end of the name.
const EXTENSION_BONUS: i32 = 20;
/// Bonus when an all upper-case query appears verbatim in the name.
const UPPERCASE_BONUS: i32 = 15;

/// The built-in tiered relevance scorer.
///
/// Tiers, first match wins:
///
/// | tier                                  | exact case | any case |
/// |---------------------------------------|-----------:|---------:|
/// | name equals query                     |        100 |       95 |
/// | name starts with query                |         90 |       85 |
/// | query is a whole word in name         |         80 |       75 |
/// | name contains query                   |         70 |       65 |
/// | every query token appears in the name |          - |       60 |
///
/// A matched score then gains `+20` when the query contains a `.` and the
/// name ends with it (case-insensitive), and `+15` when the query is all
/// upper-case and appears in the name exactly. Bonuses are not clamped, so an
/// extension-qualified prefix match can outrank an exact match elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelevanceScorer;

impl Scorer for RelevanceScorer {
    fn score(&self, name: &str, query: &str) -> Option<i32> {
        score(name, query)
    }
}

/// Score `name` against `query` with the built-in tiers.
///
/// Blank queries score nothing; callers show the baseline listing instead.
pub fn score(name: &str, query: &str) -> Option<i32> {
    if query.trim().is_empty() {
        return None;
    }

    let lower_name = name.to_lowercase();
    let lower_query = query.to_lowercase();

    let base = tier(name, query, &lower_name, &lower_query)?;

    let mut total = base;
    if query.contains('.') && lower_name.ends_with(&lower_query) {
        total += EXTENSION_BONUS;
    }
    if is_all_uppercase(query) && name.contains(query) {
        total += UPPERCASE_BONUS;
    }
    Some(total)
}

fn tier(name: &str, query: &str, lower_name: &str, lower_query: &str) -> Option<i32> {
    if name == query {
        Some(100)
    } else if lower_name == lower_query {
        Some(95)
    } else if name.starts_with(query) {
        Some(90)
    } else if lower_name.starts_with(lower_query) {
        Some(85)
    } else if contains_word(name, query) {
        Some(80)
    } else if contains_word(lower_name, lower_query) {
        Some(75)
    } else if name.contains(query) {
        Some(70)
    } else if lower_name.contains(lower_query) {
        Some(65)
    } else if all_tokens_present(lower_name, lower_query) {
        Some(60)
    } else {
        None
    }
}

/// `needle` occurs in `haystack` with a non-word character (or the string
/// edge) on both sides.
fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, hit)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + hit.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn all_tokens_present(lower_name: &str, lower_query: &str) -> bool {
    let mut tokens = lower_query.split_whitespace().peekable();
    tokens.peek().is_some() && tokens.all(|t| lower_name.contains(t))
}

/// At least one cased letter, and none of them lower-case.
fn is_all_uppercase(query: &str) -> bool {
    query.chars().any(char::is_alphabetic) && !query.chars().any(char::is_lowercase)
}
