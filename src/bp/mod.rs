//! The belief-propagation engine: three message-update kernels
//! (`ProdSum`, `ProdSumLog`, `MinSumLog`) each available in a parallel
//! and a serial schedule, plus convergence detection.

mod kernel;
mod parallel;
mod serial;

pub use kernel::{BpMethod, InputVectorType, Schedule};

use crate::channel::ChannelModel;
use crate::sparse::SparseMod2;

/// `1e308` stands in for `+infinity` in the min-sum kernel so that the
/// subsequent `(-1)^sign * alpha * min` product stays a finite `f64`
/// instead of propagating an implementation-defined infinity.
const MS_SENTINEL: f64 = 1e308;

/// The outcome of a single BP run: how many iterations it took, and
/// whether it converged before `max_iter` was exhausted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BpOutcome {
    pub iterations: usize,
    pub converged: bool,
}

/// Runs belief propagation to decode `syndrome`.
///
/// `decoding` and `log_prob_ratios` are output buffers, resized by the
/// caller to `h.number_of_cols()`; they are fully overwritten and never
/// read on entry. `inactivated_checks` has length `h.number_of_rows()`
/// and masks rows the kernels must treat as silent (see
/// [`crate::inactivation`]).
#[allow(clippy::too_many_arguments)]
pub fn run(
    h: &mut SparseMod2,
    channel: &ChannelModel,
    syndrome: &[u8],
    inactivated_checks: &[u8],
    max_iter: usize,
    method: BpMethod,
    schedule: Schedule,
    ms_scaling_factor: f64,
    decoding: &mut Vec<u8>,
    log_prob_ratios: &mut Vec<f64>,
) -> BpOutcome {
    let n = h.number_of_cols();
    let m = h.number_of_rows();
    decoding.clear();
    decoding.resize(n, 0);
    log_prob_ratios.clear();
    log_prob_ratios.resize(n, 0.0);

    let method = method.resolved();
    h.reset_messages();
    match (schedule, method) {
        // The serial schedule's bookkeeping (`log_prob_ratios`) is always a
        // log-domain quantity (see serial::run_iteration), so every method
        // seeds edges with LLRs under Serial, even ProdSum.
        (Schedule::Serial, _) => parallel::initialize_log_domain(h, channel),
        (Schedule::Parallel, BpMethod::ProdSum) => parallel::initialize_ratio_domain(h, channel),
        (Schedule::Parallel, BpMethod::ProdSumLog | BpMethod::MinSumLog) => {
            parallel::initialize_log_domain(h, channel)
        }
        (Schedule::Parallel, BpMethod::MinSum) => unreachable!("resolved above"),
    }

    let mut candidate_syndrome = vec![0u8; m];
    let mut iterations = 0;
    let mut converged = false;

    for it in 1..=max_iter.max(1) {
        iterations = it;
        let alpha = adaptive_alpha(ms_scaling_factor, it);

        match schedule {
            Schedule::Parallel => {
                parallel::row_phase(h, method, syndrome, inactivated_checks, alpha);
                parallel::col_phase(h, channel, method, decoding, log_prob_ratios);
            }
            Schedule::Serial => {
                serial::run_iteration(
                    h,
                    channel,
                    method,
                    syndrome,
                    inactivated_checks,
                    alpha,
                    decoding,
                    log_prob_ratios,
                );
            }
        }

        h.mulvec(decoding, &mut candidate_syndrome);
        if candidate_syndrome == syndrome {
            converged = true;
            break;
        }
        if it >= max_iter {
            break;
        }
    }

    BpOutcome { iterations, converged }
}

/// `ms_scaling_factor == 0.0` selects the adaptive schedule
/// `alpha_t = 1 - 2^-t`, strictly increasing toward 1 as `t` grows.
/// Any other value is used as a constant scaling factor.
fn adaptive_alpha(ms_scaling_factor: f64, iteration: usize) -> f64 {
    if ms_scaling_factor == 0.0 {
        1.0 - 2f64.powi(-(iteration as i32))
    } else {
        ms_scaling_factor
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn repetition_code() -> SparseMod2 {
        SparseMod2::construct(2, 3, vec![(0, 0), (0, 1), (1, 1), (1, 2)]).unwrap()
    }

    fn hamming_code() -> SparseMod2 {
        SparseMod2::construct(
            3,
            7,
            vec![
                (0, 0), (0, 1), (0, 2), (0, 4),
                (1, 0), (1, 1), (1, 3), (1, 5),
                (2, 0), (2, 2), (2, 3), (2, 6),
            ],
        )
        .unwrap()
    }

    #[test]
    fn repetition_code_recovers_single_syndrome_bit() {
        let mut h = repetition_code();
        let channel = ChannelModel::uniform(0.1, 3).unwrap();
        let mut decoding = Vec::new();
        let mut llrs = Vec::new();
        let outcome = run(
            &mut h,
            &channel,
            &[1, 0],
            &[0, 0],
            10,
            BpMethod::ProdSumLog,
            Schedule::Parallel,
            0.0,
            &mut decoding,
            &mut llrs,
        );
        assert!(outcome.converged);
        assert_eq!(decoding, vec![1, 0, 0]);
    }

    #[test]
    fn repetition_code_zero_syndrome_converges_immediately() {
        let mut h = repetition_code();
        let channel = ChannelModel::uniform(0.1, 3).unwrap();
        let mut decoding = Vec::new();
        let mut llrs = Vec::new();
        let outcome = run(
            &mut h,
            &channel,
            &[0, 0],
            &[0, 0],
            10,
            BpMethod::ProdSumLog,
            Schedule::Parallel,
            0.0,
            &mut decoding,
            &mut llrs,
        );
        assert!(outcome.converged);
        assert_eq!(outcome.iterations, 1);
        assert_eq!(decoding, vec![0, 0, 0]);
    }

    #[test]
    fn hamming_code_min_sum_log_recovers_single_error() {
        let mut h = hamming_code();
        let channel = ChannelModel::uniform(0.05, 7).unwrap();
        // Syndrome equal to column 5 of H: bit 5 appears in checks 1.
        let syndrome = vec![0, 1, 0];
        let mut decoding = Vec::new();
        let mut llrs = Vec::new();
        let outcome = run(
            &mut h,
            &channel,
            &syndrome,
            &[0, 0, 0],
            7,
            BpMethod::MinSumLog,
            Schedule::Parallel,
            1.0,
            &mut decoding,
            &mut llrs,
        );
        assert!(outcome.converged);
        assert!(outcome.iterations <= 7);
        assert_eq!(decoding, vec![0, 0, 0, 0, 0, 1, 0]);
    }

    #[test]
    fn serial_and_parallel_agree_on_a_converging_instance() {
        let channel = ChannelModel::uniform(0.1, 3).unwrap();
        let mut decoding_p = Vec::new();
        let mut llrs_p = Vec::new();
        let mut hp = repetition_code();
        let outcome_p = run(
            &mut hp,
            &channel,
            &[1, 0],
            &[0, 0],
            10,
            BpMethod::ProdSumLog,
            Schedule::Parallel,
            0.0,
            &mut decoding_p,
            &mut llrs_p,
        );

        let mut decoding_s = Vec::new();
        let mut llrs_s = Vec::new();
        let mut hs = repetition_code();
        let outcome_s = run(
            &mut hs,
            &channel,
            &[1, 0],
            &[0, 0],
            10,
            BpMethod::ProdSumLog,
            Schedule::Serial,
            0.0,
            &mut decoding_s,
            &mut llrs_s,
        );

        assert!(outcome_p.converged);
        assert!(outcome_s.converged);
        assert_eq!(decoding_p, decoding_s);
    }

    #[test]
    fn prod_sum_serial_seeds_edges_in_the_log_domain() {
        // ProdSum + Serial is a spec-permitted combination the ratio-domain
        // kernel never otherwise exercises under the serial schedule:
        // serial::run_iteration's bookkeeping is always log-domain, so
        // edges must be seeded with LLRs here too, not probability ratios.
        let channel = ChannelModel::uniform(0.1, 3).unwrap();

        let mut decoding_serial = Vec::new();
        let mut llrs_serial = Vec::new();
        let mut h_serial = repetition_code();
        let outcome_serial = run(
            &mut h_serial,
            &channel,
            &[1, 0],
            &[0, 0],
            10,
            BpMethod::ProdSum,
            Schedule::Serial,
            0.0,
            &mut decoding_serial,
            &mut llrs_serial,
        );

        let mut decoding_parallel = Vec::new();
        let mut llrs_parallel = Vec::new();
        let mut h_parallel = repetition_code();
        let outcome_parallel = run(
            &mut h_parallel,
            &channel,
            &[1, 0],
            &[0, 0],
            10,
            BpMethod::ProdSum,
            Schedule::Parallel,
            0.0,
            &mut decoding_parallel,
            &mut llrs_parallel,
        );

        assert!(outcome_serial.converged);
        assert!(outcome_parallel.converged);
        assert_eq!(decoding_serial, decoding_parallel);
        assert_eq!(decoding_serial, vec![1, 0, 0]);
    }

    #[test]
    fn min_sum_alias_resolves_to_min_sum_log_behavior() {
        let mut h_alias = repetition_code();
        let mut h_direct = repetition_code();
        let channel = ChannelModel::uniform(0.1, 3).unwrap();

        let mut decoding_alias = Vec::new();
        let mut llrs_alias = Vec::new();
        run(
            &mut h_alias,
            &channel,
            &[1, 0],
            &[0, 0],
            10,
            BpMethod::MinSum,
            Schedule::Parallel,
            1.0,
            &mut decoding_alias,
            &mut llrs_alias,
        );

        let mut decoding_direct = Vec::new();
        let mut llrs_direct = Vec::new();
        run(
            &mut h_direct,
            &channel,
            &[1, 0],
            &[0, 0],
            10,
            BpMethod::MinSumLog,
            Schedule::Parallel,
            1.0,
            &mut decoding_direct,
            &mut llrs_direct,
        );

        assert_eq!(decoding_alias, decoding_direct);
    }

    #[test]
    fn adaptive_alpha_is_monotone_increasing() {
        let mut previous = 0.0;
        for t in 1..10 {
            let alpha = adaptive_alpha(0.0, t);
            assert!(alpha > previous);
            assert!(alpha < 1.0);
            previous = alpha;
        }
    }
}
