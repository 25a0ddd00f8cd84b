// Fuzzy filtering of launcher candidates.
// Scores a query against a key per candidate using combinable match rules and ranks the survivors.

use std::ops::BitOr;

/// Set of match rules a query may satisfy. Rules are tried in declaration order
/// and the first one that matches determines the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOn(u8);

impl MatchOn {
    /// Value starts with the query.
    pub const STARTSWITH: Self = Self(1);
    /// Query matches the value's capital letters and digits, e.g. `of` for `OmniFocus`.
    pub const CAPITALS: Self = Self(1 << 1);
    /// Query equals one of the value's words.
    pub const ATOM: Self = Self(1 << 2);
    /// Query matches the start of the value's word initials.
    pub const INITIALS_STARTSWITH: Self = Self(1 << 3);
    /// Query appears anywhere in the value's word initials.
    pub const INITIALS_CONTAIN: Self = Self(1 << 4);
    /// Query appears anywhere in the value.
    pub const SUBSTRING: Self = Self(1 << 5);
    /// Query characters appear in order anywhere in the value.
    pub const ALLCHARS: Self = Self(1 << 6);
    pub const ALL: Self = Self(0x7f);

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for MatchOn {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Score one lowercase query word against `value`.
///
/// Returns the score and the rule that produced it, or None when no enabled rule matches.
pub fn score(value: &str, word: &str, match_on: MatchOn) -> Option<(f64, MatchOn)> {
    let query = word.to_lowercase();
    let lower = value.to_lowercase();

    // Cheap rejection before the rule checks.
    if query.is_empty() || !query.chars().all(|c| lower.contains(c)) {
        return None;
    }

    let query_len = query.chars().count() as f64;
    let value_len = value.chars().count() as f64;

    if match_on.contains(MatchOn::STARTSWITH) && lower.starts_with(&query) {
        return Some((100.0 - value_len / query_len, MatchOn::STARTSWITH));
    }

    if match_on.contains(MatchOn::CAPITALS) {
        let capitals: String = value
            .chars()
            .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            .collect();
        if capitals.to_lowercase().starts_with(&query) {
            let len = capitals.chars().count() as f64;
            return Some((100.0 - len / query_len, MatchOn::CAPITALS));
        }
    }

    let atoms: Vec<&str> = lower.split(|c: char| !c.is_ascii_alphanumeric()).collect();
    let initials: String = atoms.iter().filter_map(|atom| atom.chars().next()).collect();
    let initials_len = initials.chars().count() as f64;

    if match_on.contains(MatchOn::ATOM) && atoms.contains(&query.as_str()) {
        return Some((100.0 - value_len / query_len, MatchOn::ATOM));
    }

    if match_on.contains(MatchOn::INITIALS_STARTSWITH) && initials.starts_with(&query) {
        return Some((100.0 - initials_len / query_len, MatchOn::INITIALS_STARTSWITH));
    } else if match_on.contains(MatchOn::INITIALS_CONTAIN) && initials.contains(&query) {
        return Some((95.0 - initials_len / query_len, MatchOn::INITIALS_CONTAIN));
    }

    if match_on.contains(MatchOn::SUBSTRING) && lower.contains(&query) {
        return Some((90.0 - value_len / query_len, MatchOn::SUBSTRING));
    }

    if match_on.contains(MatchOn::ALLCHARS) {
        if let Some((start, end)) = subsequence_span(&lower, &query) {
            let spread = ((1 + start) * (end - start + 1)) as f64;
            return Some((100.0 / spread, MatchOn::ALLCHARS));
        }
    }

    None
}

/// Leftmost match of `query` as an in-order subsequence of `value`, as a
/// `(start, end)` char range with `end` exclusive.
fn subsequence_span(value: &str, query: &str) -> Option<(usize, usize)> {
    let mut wanted = query.chars().peekable();
    let mut start = None;

    for (index, c) in value.chars().enumerate() {
        if wanted.peek() == Some(&c) {
            start.get_or_insert(index);
            wanted.next();
            if wanted.peek().is_none() {
                return start.map(|start| (start, index + 1));
            }
        }
    }

    None
}

/// Rank `candidates` against `query`.
///
/// The query is split on spaces and every word must match; word scores are
/// summed. Candidates scoring at or below `min_score` are dropped. Survivors
/// are ordered by descending score, then by lowercase key. An empty query
/// returns every candidate in input order.
pub fn filter<'a, T, F>(
    query: &str,
    candidates: &'a [T],
    key: F,
    match_on: MatchOn,
    min_score: f64,
) -> Vec<&'a T>
where
    F: Fn(&T) -> &str,
{
    let words: Vec<&str> = query.split(' ').map(str::trim).filter(|w| !w.is_empty()).collect();
    if words.is_empty() {
        return candidates.iter().collect();
    }

    let mut ranked: Vec<(f64, String, &'a T)> = Vec::new();
    for item in candidates {
        let value = key(item).trim();
        if value.is_empty() {
            continue;
        }

        let total = words.iter().try_fold(0.0, |total, word| {
            score(value, word, match_on).map(|(s, _)| total + s)
        });

        if let Some(total) = total.filter(|&total| total > min_score) {
            ranked.push((total, value.to_lowercase(), item));
        }
    }

    ranked.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    tracing::debug!(query, matched = ranked.len(), of = candidates.len(), "filtered");
    ranked.into_iter().map(|(_, _, item)| item).collect()
}
