//! Longest-common-subsequence similarity ratio.

/// Similarity of two strings as `2 * LCS / (len(a) + len(b))`.
///
/// Lengths count Unicode scalar values. The ratio is case-sensitive,
/// symmetric and lies in `[0, 1]`; two empty strings are identical (1.0).
///
/// # Examples
///
/// ```
/// use pdf_formfill::resolve::similarity_ratio;
///
/// assert_eq!(similarity_ratio("Make", "Make"), 1.0);
/// assert_eq!(similarity_ratio("DATE", "DATE OF SALE"), 0.5);
/// assert!(similarity_ratio("Buyer's Name", "Buyer Name") > 0.9);
/// ```
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    (2 * lcs_len(&a, &b)) as f64 / total as f64
}

/// Length of the longest common subsequence, two-row dynamic programming.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    // Keep the shorter string on the row axis
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut prev = vec![0usize; short.len() + 1];
    let mut curr = vec![0usize; short.len() + 1];

    for &lc in long {
        for (j, &sc) in short.iter().enumerate() {
            curr[j + 1] = if lc == sc {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}
