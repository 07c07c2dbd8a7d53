/// Order-insensitive similarity of two strings on a 0..=100 scale.
///
/// Both inputs are lower-cased, split on anything that is not alphanumeric,
/// sorted token-wise and rejoined before comparison, so `"Doe, John"` and
/// `"john doe"` score 100.
pub fn token_sort_ratio(left: &str, right: &str) -> u8 {
    ratio(&sorted_tokens(left), &sorted_tokens(right))
}

/// Indel similarity: `2 * LCS / (len_a + len_b)`, rounded.
pub fn ratio(left: &str, right: &str) -> u8 {
    let left: Vec<char> = left.chars().collect();
    let right: Vec<char> = right.chars().collect();

    let total = left.len() + right.len();
    if total == 0 {
        return 100;
    }

    let common = longest_common_subsequence(&left, &right);
    let score = (200.0 * common as f64 / total as f64).round();
    score.clamp(0.0, 100.0) as u8
}

fn sorted_tokens(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() {
                ch.to_lowercase().next().unwrap_or(ch)
            } else {
                ' '
            }
        })
        .collect();

    let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn longest_common_subsequence(left: &[char], right: &[char]) -> usize {
    let mut previous = vec![0usize; right.len() + 1];
    let mut current = vec![0usize; right.len() + 1];

    for a in left {
        for (j, b) in right.iter().enumerate() {
            current[j + 1] = if a == b {
                previous[j] + 1
            } else {
                previous[j + 1].max(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[right.len()]
}
