use std::collections::HashMap;

use super::normalize::normalize_name;

/// Character-level likeness of two names in `[0, 1]`.
///
/// Both inputs are normalized first, then scored with the classic
/// Ratcliff/Obershelp ratio `2*M / T`, where `M` is the total length of the
/// longest matching contiguous blocks (found recursively) and `T` is the
/// combined length of both normalized strings. Two empty strings score 1.0,
/// matching the reference sequence-matcher semantics.
pub fn name_similarity(name_a: &str, name_b: &str) -> f64 {
    let a: Vec<char> = normalize_name(name_a).chars().collect();
    let b: Vec<char> = normalize_name(name_b).chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matched_chars(&a, &b) as f64 / total as f64
}

/// Total number of matched characters across all matching blocks.
///
/// Finds the longest common contiguous block in the current window, then
/// recurses into the regions to its left and right (iteratively, via an
/// explicit stack). Ties are broken toward the earliest block in `a`, then
/// `b`, which keeps the block decomposition deterministic.
fn matched_chars(a: &[char], b: &[char]) -> usize {
    // positions of each char in b, ascending
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &ch) in b.iter().enumerate() {
        b2j.entry(ch).or_default().push(j);
    }

    let mut total = 0usize;
    let mut stack = vec![(0usize, a.len(), 0usize, b.len())];

    while let Some((alo, ahi, blo, bhi)) = stack.pop() {
        let (i, j, size) = longest_match(a, &b2j, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        total += size;
        stack.push((alo, i, blo, j));
        stack.push((i + size, ahi, j + size, bhi));
    }

    total
}

/// Longest block of characters equal between `a[alo..ahi]` and `b[blo..bhi]`.
/// Returns `(start_in_a, start_in_b, length)`.
fn longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut best_i = alo;
    let mut best_j = blo;
    let mut best_size = 0usize;

    // j2len[j] = length of the longest match ending at a[i], b[j]
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for (i, &ch) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut new_j2len: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b2j.get(&ch) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = if j > 0 {
                    j2len.get(&(j - 1)).copied().unwrap_or(0) + 1
                } else {
                    1
                };
                new_j2len.insert(j, k);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        j2len = new_j2len;
    }

    (best_i, best_j, best_size)
}
