//! Pairwise similarity between two canonical texts.
//!
//! Both methods work on Unicode scalar values and are symmetric. Distances
//! are computed bit-parallel, so whole source files score in linear passes
//! over the longer text.

use std::collections::HashMap;

use serde::Serialize;
use treesim_core::Method;

/// Similarity and difference of one comparison, both in `[0, 100]`.
///
/// # Examples
///
/// ```
/// use treesim_compare::score::Score;
///
/// let s = Score::from_similarity(72.5);
/// assert_eq!(s.difference, 27.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub similarity: f64,
    pub difference: f64,
}

impl Score {
    /// Build a score from a similarity percentage, clamped to `[0, 100]`.
    pub fn from_similarity(similarity: f64) -> Self {
        let similarity = similarity.clamp(0.0, 100.0);
        Self {
            similarity,
            difference: 100.0 - similarity,
        }
    }
}

/// Score `a` against `b` with `method`.
///
/// - [`Method::Ratio`]: `(|a| + |b| - indel) / (|a| + |b|)`, where `indel` is
///   the insert/delete-only edit distance.
/// - [`Method::Distance`]: `1 - levenshtein / max(|a|, |b|)`.
///
/// Two empty texts are identical under both methods.
///
/// # Examples
///
/// ```
/// use treesim_compare::score::score;
/// use treesim_core::Method;
///
/// assert_eq!(score("abc", "abc", Method::Ratio).similarity, 100.0);
/// assert_eq!(score("ab", "cd", Method::Ratio).similarity, 0.0);
/// assert_eq!(score("kitten", "sitting", Method::Distance).similarity, (1.0 - 3.0 / 7.0) * 100.0);
/// ```
pub fn score(a: &str, b: &str, method: Method) -> Score {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let ratio = match method {
        Method::Ratio => indel_ratio(&a, &b),
        Method::Distance => normalized_levenshtein(&a, &b),
    };
    Score::from_similarity(ratio * 100.0)
}

fn indel_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    // indel = |a| + |b| - 2 * lcs
    let lcs = lcs_length(a, b);
    (2 * lcs) as f64 / total as f64
}

fn normalized_levenshtein(a: &[char], b: &[char]) -> f64 {
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(a, b) as f64 / max_len as f64
}

/// Per-character match masks of a pattern: bit `i` of block `i / 64` is set
/// where the pattern holds that character.
struct PatternMasks {
    blocks: usize,
    masks: HashMap<char, Vec<u64>>,
    none: Vec<u64>,
}

impl PatternMasks {
    fn new(pattern: &[char]) -> Self {
        let blocks = pattern.len().div_ceil(64);
        let mut masks: HashMap<char, Vec<u64>> = HashMap::new();
        for (i, &c) in pattern.iter().enumerate() {
            masks.entry(c).or_insert_with(|| vec![0; blocks])[i / 64] |= 1 << (i % 64);
        }
        Self {
            blocks,
            masks,
            none: vec![0; blocks],
        }
    }

    fn get(&self, c: char) -> &[u64] {
        self.masks.get(&c).map_or(self.none.as_slice(), Vec::as_slice)
    }
}

/// Levenshtein edit distance.
///
/// Myers' bit-vector algorithm in Hyyrö's formulation, over 64-bit blocks of
/// the shorter sequence: `O(⌈m/64⌉ · n)`.
pub fn levenshtein_distance(a: &[char], b: &[char]) -> usize {
    let (text, pattern) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if pattern.is_empty() {
        return text.len();
    }

    let pm = PatternMasks::new(pattern);
    let last = pm.blocks - 1;
    let last_bit = 1u64 << ((pattern.len() - 1) % 64);
    let mut vp = vec![u64::MAX; pm.blocks];
    let mut vn = vec![0u64; pm.blocks];
    let mut dist = pattern.len();

    for &c in text {
        let eq = pm.get(c);
        // Horizontal deltas entering the bottom of each block; row 0 grows by one.
        let mut hp_carry = 1u64;
        let mut hn_carry = 0u64;

        for (block, ((pv, nv), &m)) in vp.iter_mut().zip(vn.iter_mut()).zip(eq).enumerate() {
            let x = m | hn_carry;
            let d0 = ((x & *pv).wrapping_add(*pv) ^ *pv) | x | *nv;
            let hp = *nv | !(d0 | *pv);
            let hn = d0 & *pv;

            let top = if block == last { last_bit } else { 1 << 63 };
            let (hp_out, hn_out) = (u64::from(hp & top != 0), u64::from(hn & top != 0));

            let hp = (hp << 1) | hp_carry;
            let hn = (hn << 1) | hn_carry;
            *pv = hn | !(d0 | hp);
            *nv = hp & d0;

            hp_carry = hp_out;
            hn_carry = hn_out;
        }

        if hp_carry == 1 {
            dist += 1;
        } else if hn_carry == 1 {
            dist -= 1;
        }
    }

    dist
}

/// Length of the longest common subsequence.
///
/// Hyyrö's bit-parallel LCS over 64-bit blocks of the shorter sequence; zero
/// bits of the state vector count matched pattern positions.
pub fn lcs_length(a: &[char], b: &[char]) -> usize {
    let (text, pattern) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if pattern.is_empty() {
        return 0;
    }

    let pm = PatternMasks::new(pattern);
    // Bits above the pattern length stay set, so they never count.
    let mut state = vec![u64::MAX; pm.blocks];

    for &c in text {
        let mut carry = false;
        for (s, &m) in state.iter_mut().zip(pm.get(c)) {
            let u = *s & m;
            let (sum, c1) = s.overflowing_add(u);
            let (sum, c2) = sum.overflowing_add(u64::from(carry));
            carry = c1 || c2;
            *s = sum | (*s & !u);
        }
    }

    state.iter().map(|s| s.count_zeros() as usize).sum()
}
