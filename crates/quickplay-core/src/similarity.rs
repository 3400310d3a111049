//! Fuzzy substring similarity used by the list filter.
//!
//! Scores how well a short pattern matches *somewhere inside* a longer
//! string, on a 0-100 scale. A score of 100 means the pattern appears
//! verbatim; lower scores tolerate typos, decorations, and the character
//! padding server operators use to dodge exact-match filters
//! ("H4xor", "Haxxor", "[EU] haxor den").
//!
//! Matching is case-sensitive by design: list entries are expected to be
//! written with the casing operators actually use.

/// Score how well `pattern` matches the best-aligned window of `text`.
///
/// Returns a similarity score in `0..=100`. The score is the length of the
/// longest common subsequence between `pattern` and its best window of
/// `text`, as a rounded percentage of the pattern length. Either input
/// being empty scores 0.
#[must_use]
pub fn partial_ratio(text: &str, pattern: &str) -> u32 {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    if text.is_empty() || pattern.is_empty() {
        return 0;
    }

    let n = pattern.len();
    // When the pattern is at least as long as the text there is only one
    // window: the whole text.
    if n >= text.len() {
        let best = lcs_len(&text, &pattern);
        return score(best, n);
    }

    let mut best = 0;
    for window in text.windows(n) {
        let len = lcs_len(window, &pattern);
        if len > best {
            best = len;
            if best == n {
                break;
            }
        }
    }
    score(best, n)
}

/// Rounded percentage of `best` over `n`. `n` is non-zero by construction
/// and `best <= n`, so the result never exceeds 100.
#[allow(clippy::cast_possible_truncation)]
const fn score(best: usize, n: usize) -> u32 {
    (((best * 100) + n / 2) / n) as u32
}

/// Longest common subsequence length, two-row dynamic programming.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
