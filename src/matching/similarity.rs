use super::normalize;

/// Levenshtein edit distance (unit-cost insert, delete, substitute) over
/// Unicode scalar values, with the full (|a|+1) x (|b|+1) DP matrix.
///
/// Names are tens of characters long, so the quadratic cost is irrelevant
/// next to the fuzzy pass that calls it.
pub fn distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let cols = b.len() + 1;
    let mut matrix = vec![0usize; (a.len() + 1) * cols];
    for i in 0..=a.len() {
        matrix[i * cols] = i;
    }
    for j in 0..=b.len() {
        matrix[j] = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let deletion = matrix[(i - 1) * cols + j] + 1;
            let insertion = matrix[i * cols + (j - 1)] + 1;
            let substitution = matrix[(i - 1) * cols + (j - 1)] + cost;
            matrix[i * cols + j] = deletion.min(insertion).min(substitution);
        }
    }
    matrix[a.len() * cols + b.len()]
}

/// Normalized name similarity in [0, 1].
///
/// Two empty (after normalization) names score 0, not 1: a missing name on
/// both sides must never count as a match.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let longest = a.chars().count().max(b.chars().count()).max(1);
    1.0 - distance(&a, &b) as f64 / longest as f64
}
