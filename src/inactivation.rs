//! Stabilizer-inactivation: when plain BP fails to converge on a
//! syndrome, disable small local clusters of checks one at a time,
//! re-run BP on the reduced problem, and back-solve the residual GF(2)
//! system for the bits that were inactivated along with those checks.

use std::collections::HashSet;

use crate::bp::{self, BpMethod, BpOutcome, Schedule};
use crate::channel::ChannelModel;
use crate::gf2::{self, Gf2Matrix};
use crate::sparse::SparseMod2;

/// Insertion-order-preserving set: pushes `value` once, ignoring
/// duplicates, so the resulting order is deterministic regardless of
/// hash iteration order.
fn push_unique(order: &mut Vec<usize>, seen: &mut HashSet<usize>, value: usize) {
    if seen.insert(value) {
        order.push(value);
    }
}

/// Runs the stabilizer-inactivation loop of spec.md §4.5.
///
/// `log_prob_ratios_at_failure` is the posterior from the plain BP run
/// that failed to converge; it is used once, to rank checks by
/// reliability, and is never touched again. `decoding` and
/// `inactivated_checks` are the decoder's own buffers: SI overwrites them
/// in place and leaves them set to whatever the last attempted cluster
/// was (cleared to all-zero if every candidate failed).
#[allow(clippy::too_many_arguments)]
pub fn run(
    h: &mut SparseMod2,
    channel: &ChannelModel,
    method: BpMethod,
    schedule: Schedule,
    ms_scaling_factor: f64,
    max_iter: usize,
    original_syndrome: &[u8],
    log_prob_ratios_at_failure: &[f64],
    decoding: &mut Vec<u8>,
    inactivated_checks: &mut [u8],
) -> BpOutcome {
    let m = h.number_of_rows();

    let mut reliability: Vec<(usize, f64)> = (0..m)
        .map(|check| {
            let r: f64 = h
                .row(check)
                .map(|e| log_prob_ratios_at_failure[h.col_of(e)].abs())
                .sum();
            (check, r)
        })
        .collect();
    reliability.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut log_prob_ratios = vec![0.0; h.number_of_cols()];

    for &(candidate, _) in &reliability {
        let bits: Vec<usize> = h.row(candidate).map(|e| h.col_of(e)).collect();

        let mut checks_order = Vec::new();
        let mut checks_seen = HashSet::new();
        push_unique(&mut checks_order, &mut checks_seen, candidate);
        for &bit in &bits {
            for e in h.col(bit) {
                push_unique(&mut checks_order, &mut checks_seen, h.row_of(e));
            }
        }

        inactivated_checks.iter_mut().for_each(|slot| *slot = 0);
        for &check in &checks_order {
            inactivated_checks[check] = 1;
        }
        let mut modified_syndrome = original_syndrome.to_vec();
        for &check in &checks_order {
            modified_syndrome[check] = 0;
        }

        let outcome = bp::run(
            h,
            channel,
            &modified_syndrome,
            inactivated_checks,
            max_iter,
            method,
            schedule,
            ms_scaling_factor,
            decoding,
            &mut log_prob_ratios,
        );

        if !outcome.converged {
            inactivated_checks.iter_mut().for_each(|slot| *slot = 0);
            continue;
        }

        let bit_position: std::collections::HashMap<usize, usize> =
            bits.iter().enumerate().map(|(idx, &bit)| (bit, idx)).collect();
        let mut residual = Gf2Matrix::zeros(checks_order.len(), bits.len());
        for (row_idx, &check) in checks_order.iter().enumerate() {
            for e in h.row(check) {
                if let Some(&col_idx) = bit_position.get(&h.col_of(e)) {
                    residual.set(row_idx, col_idx, 1);
                }
            }
        }

        let mut rhs = vec![0u8; checks_order.len()];
        for (row_idx, &check) in checks_order.iter().enumerate() {
            let mut glue = 0u8;
            for e in h.row(check) {
                let bit = h.col_of(e);
                if !bit_position.contains_key(&bit) {
                    glue ^= decoding[bit];
                }
            }
            rhs[row_idx] = original_syndrome[check] ^ glue;
        }

        if let Some(x) = gf2::solve(&residual, &rhs) {
            for (idx, &bit) in bits.iter().enumerate() {
                decoding[bit] = x[idx];
            }
            return BpOutcome { iterations: outcome.iterations, converged: true };
        }

        inactivated_checks.iter_mut().for_each(|slot| *slot = 0);
    }

    BpOutcome { iterations: 0, converged: false }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::channel::ChannelModel;

    /// A 4-cycle (one check per bit-pair, wrapping around): its perfect
    /// symmetry under a uniform channel makes certain syndromes a
    /// textbook trapping set that plain BP oscillates on forever, which
    /// is exactly the failure mode SI exists to break.
    fn trapping_ring() -> SparseMod2 {
        SparseMod2::construct(
            4,
            4,
            vec![
                (0, 0), (0, 1),
                (1, 1), (1, 2),
                (2, 2), (2, 3),
                (3, 3), (3, 0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn si_recovers_a_syndrome_plain_bp_cannot_resolve() {
        let mut h = trapping_ring();
        let channel = ChannelModel::uniform(0.2, 4).unwrap();
        let syndrome = vec![1, 0, 1, 0];

        let mut decoding = Vec::new();
        let mut llrs = Vec::new();
        let plain = bp::run(
            &mut h,
            &channel,
            &syndrome,
            &[0; 4],
            20,
            BpMethod::ProdSumLog,
            Schedule::Parallel,
            0.0,
            &mut decoding,
            &mut llrs,
        );
        assert!(!plain.converged, "this syndrome is a trapping set even at 20 iterations");

        let mut inactivated = vec![0u8; 4];
        let outcome = run(
            &mut h,
            &channel,
            BpMethod::ProdSumLog,
            Schedule::Parallel,
            0.0,
            10,
            &syndrome,
            &llrs,
            &mut decoding,
            &mut inactivated,
        );

        assert!(outcome.converged, "SI should recover where plain BP left off");
        let mut recovered_syndrome = vec![0u8; 4];
        h.mulvec(&decoding, &mut recovered_syndrome);
        assert_eq!(recovered_syndrome, syndrome);
    }
}
