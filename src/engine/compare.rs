//! Pairwise fingerprint comparison.
//!
//! Comparison is two-staged to keep the O(n²) pair phase cheap:
//!
//! - **Stage 1** runs on every pair: the zero-offset Hamming distance over
//!   ten 64-bit words. Anything worse than [`POSSIBLE_THRESHOLD`] is a
//!   definitive no-match and stage 2 never runs. On real collections the
//!   overwhelming majority of pairs stop here.
//! - **Stage 2** searches a small window of time-row offsets to absorb
//!   residual misalignment (e.g. slightly different trim points), scaling
//!   each overlap distance back to the full width. The best distance decides
//!   between a confirmed duplicate and a merely reportable possible match.
//!
//! Distances are always expressed out of [`FINGERPRINT_BITS`], so thresholds
//! and diagnostics stay comparable regardless of the offset tried.

use super::fingerprint::{Fingerprint, FINGERPRINT_BITS, ROW_BITS, TIME_ROWS};

/// Stage-1 cutoff: pairs farther apart than this are NoMatch outright.
pub const POSSIBLE_THRESHOLD: u32 = 160;

/// Stage-2 cutoff: best distance at or under this confirms a duplicate.
///
/// Kept independent of [`POSSIBLE_THRESHOLD`]; pairs between the two are
/// reported as possible matches but never clustered.
pub const CONFIRM_THRESHOLD: u32 = 115;

/// Maximum time-row misalignment the full check will absorb, in rows.
const MAX_OFFSET: isize = 3;

/// Classification of one fingerprint pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchClass {
    /// Rejected by the preliminary check.
    NoMatch,
    /// Survived the preliminary check but too distant to confirm.
    PossibleMatch,
    /// Close enough to cluster.
    ConfirmedDuplicate,
}

/// Outcome of comparing one unordered pair of sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairResult {
    /// Index of the first source (discovery order).
    pub a: usize,
    /// Index of the second source.
    pub b: usize,
    /// Best distance found, in bits out of [`FINGERPRINT_BITS`].
    pub distance: u32,
    /// Final classification.
    pub class: MatchClass,
}

impl PairResult {
    /// True if this pair reached the full (stage-2) check.
    #[must_use]
    pub fn reached_full_check(&self) -> bool {
        self.class != MatchClass::NoMatch
    }

    /// True if this pair is an edge for the cluster builder.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.class == MatchClass::ConfirmedDuplicate
    }
}

/// Compare two fingerprints and classify the pair.
///
/// Symmetric and deterministic: swapping `a` and `b` yields the same
/// distance and classification.
#[must_use]
pub fn compare(a: usize, b: usize, fp_a: &Fingerprint, fp_b: &Fingerprint) -> PairResult {
    let preliminary = fp_a.hamming(fp_b);
    if preliminary > POSSIBLE_THRESHOLD {
        return PairResult {
            a,
            b,
            distance: preliminary,
            class: MatchClass::NoMatch,
        };
    }

    // Full check: the zero offset equals the preliminary distance, the rest
    // of the window covers trim-induced shifts in either direction.
    let mut best = preliminary;
    for offset in 1..=MAX_OFFSET {
        best = best.min(offset_distance(fp_a, fp_b, offset));
        best = best.min(offset_distance(fp_a, fp_b, -offset));
    }

    let class = if best <= CONFIRM_THRESHOLD {
        MatchClass::ConfirmedDuplicate
    } else {
        MatchClass::PossibleMatch
    };

    PairResult {
        a,
        b,
        distance: best,
        class,
    }
}

/// Hamming distance with `a` shifted by `offset` rows against `b`, scaled to
/// the full fingerprint width.
fn offset_distance(a: &Fingerprint, b: &Fingerprint, offset: isize) -> u32 {
    debug_assert!(offset.unsigned_abs() < TIME_ROWS);
    let overlap = TIME_ROWS - offset.unsigned_abs();

    let mut raw = 0u32;
    for t in 0..overlap {
        let (ta, tb) = if offset >= 0 {
            (t + offset as usize, t)
        } else {
            (t, t + (-offset) as usize)
        };
        raw += (a.row(ta) ^ b.row(tb)).count_ones();
    }

    // Scale the overlap distance back to the full width so thresholds mean
    // the same thing at every offset.
    let overlap_bits = (overlap * ROW_BITS) as u64;
    ((raw as u64 * FINGERPRINT_BITS as u64 + overlap_bits / 2) / overlap_bits) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp_from_rows(rows: &[u16; TIME_ROWS]) -> Fingerprint {
        Fingerprint::from_rows(rows)
    }

    fn patterned(seed: u16) -> [u16; TIME_ROWS] {
        let mut rows = [0u16; TIME_ROWS];
        let mut state = seed;
        for row in rows.iter_mut() {
            // xorshift, deterministic per seed
            state ^= state << 7;
            state ^= state >> 9;
            state ^= state << 8;
            *row = state;
        }
        rows
    }

    #[test]
    fn test_identical_is_confirmed_at_zero() {
        let fp = fp_from_rows(&patterned(1));
        let r = compare(0, 1, &fp, &fp);
        assert_eq!(r.distance, 0);
        assert_eq!(r.class, MatchClass::ConfirmedDuplicate);
    }

    #[test]
    fn test_symmetry() {
        let a = fp_from_rows(&patterned(3));
        let b = fp_from_rows(&patterned(4));
        let ab = compare(0, 1, &a, &b);
        let ba = compare(1, 0, &b, &a);
        assert_eq!(ab.distance, ba.distance);
        assert_eq!(ab.class, ba.class);
    }

    #[test]
    fn test_unrelated_is_no_match() {
        // Independent xorshift streams disagree on ~half the bits.
        let a = fp_from_rows(&patterned(7));
        let b = fp_from_rows(&patterned(29_401));
        let r = compare(0, 1, &a, &b);
        assert_eq!(r.class, MatchClass::NoMatch);
        assert!(r.distance > POSSIBLE_THRESHOLD);
    }

    #[test]
    fn test_offset_shift_is_recovered() {
        // b starts two rows into a; zero-offset distance is large but
        // the offset search must find the near-perfect alignment.
        let rows_a = patterned(11);
        let mut rows_b = [0u16; TIME_ROWS];
        for t in 0..TIME_ROWS - 2 {
            rows_b[t] = rows_a[t + 2];
        }
        // Tail rows keep b's own pattern.
        rows_b[TIME_ROWS - 2] = 0xaaaa;
        rows_b[TIME_ROWS - 1] = 0x5555;

        let a = fp_from_rows(&rows_a);
        let b = fp_from_rows(&rows_b);

        let d = offset_distance(&a, &b, 2);
        assert_eq!(d, 0, "aligned overlap must be exact");
        assert_eq!(offset_distance(&a, &b, 2), offset_distance(&b, &a, -2));
    }

    #[test]
    fn test_few_flipped_bits_confirm() {
        let rows = patterned(5);
        let a = fp_from_rows(&rows);
        let mut flipped = rows;
        for row in flipped.iter_mut().take(6) {
            *row ^= 0x0101; // 2 bits per row, 12 bits total
        }
        let b = fp_from_rows(&flipped);

        let r = compare(0, 1, &a, &b);
        assert_eq!(r.distance, 12);
        assert_eq!(r.class, MatchClass::ConfirmedDuplicate);
    }

    #[test]
    fn test_between_thresholds_is_possible_match() {
        let rows = patterned(5);
        let a = fp_from_rows(&rows);
        let mut flipped = rows;
        // Flip 4 bits in every row: 160 bits at offset 0, and shifting only
        // makes rows disagree more, so the best stays between thresholds.
        for row in flipped.iter_mut() {
            *row ^= 0x1111;
        }
        let b = fp_from_rows(&flipped);

        let r = compare(0, 1, &a, &b);
        assert!(r.reached_full_check());
        assert_eq!(r.class, MatchClass::PossibleMatch);
        assert!(r.distance > CONFIRM_THRESHOLD && r.distance <= POSSIBLE_THRESHOLD);
    }

    #[test]
    fn test_distance_scaling_bounds() {
        // All-ones vs all-zeros: every offset sees a fully-disagreeing
        // overlap, so the scaled distance is always the full width.
        let a = fp_from_rows(&[0xffff; TIME_ROWS]);
        let b = fp_from_rows(&[0x0000; TIME_ROWS]);
        for offset in -3..=3 {
            assert_eq!(offset_distance(&a, &b, offset), FINGERPRINT_BITS as u32);
        }
    }
}
