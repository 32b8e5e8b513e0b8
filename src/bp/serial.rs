//! The serial schedule: bits are updated one at a time, in ascending
//! index order, so a bit's update immediately affects the row messages
//! later bits of the same iteration will read.

use crate::channel::ChannelModel;
use crate::sparse::SparseMod2;

use super::kernel::BpMethod;

/// Runs one full pass over every bit, in ascending order, updating
/// `log_prob_ratios`, `decoding` and every edge's messages along the way.
///
/// `method` must already be resolved (`MinSum` → `MinSumLog`); the serial
/// schedule uses the log-domain formula for both `ProdSum`/`ProdSumLog`
/// and the min-sum formula for `MinSum`/`MinSumLog` alike, since its
/// bookkeeping (`log_prob_ratios`) is always a log-domain quantity.
#[allow(clippy::too_many_arguments)]
pub fn run_iteration(
    h: &mut SparseMod2,
    channel: &ChannelModel,
    method: BpMethod,
    syndrome: &[u8],
    inactivated_checks: &[u8],
    ms_scaling_factor: f64,
    decoding: &mut [u8],
    log_prob_ratios: &mut [f64],
) {
    let is_min_sum = matches!(method, BpMethod::MinSum | BpMethod::MinSumLog);

    for bit in 0..h.number_of_cols() {
        log_prob_ratios[bit] = channel.log_likelihood_ratio(bit);

        let edges: Vec<_> = h.col(bit).collect();
        for e in edges {
            let row = h.row_of(e);
            if inactivated_checks[row] != 0 {
                h.set_check_to_bit(e, 0.0);
            } else {
                let others: Vec<f64> = h
                    .row(row)
                    .filter(|&g| g != e)
                    .map(|g| h.bit_to_check(g))
                    .collect();
                let check_msg = if is_min_sum {
                    min_sum_message(syndrome[row], &others, ms_scaling_factor)
                } else {
                    prod_sum_message(syndrome[row], &others)
                };
                h.set_check_to_bit(e, check_msg);
            }

            h.set_bit_to_check(e, log_prob_ratios[bit]);
            log_prob_ratios[bit] += h.check_to_bit(e);
        }

        decoding[bit] = if log_prob_ratios[bit] <= 0.0 { 1 } else { 0 };

        let mut t = 0.0;
        let mut e = h.last_in_col(bit);
        while !h.at_end(e) {
            let updated = h.bit_to_check(e) + t;
            h.set_bit_to_check(e, updated);
            t += h.check_to_bit(e);
            e = h.prev_in_col(e);
        }
    }
}

fn prod_sum_message(syndrome_bit: u8, other_messages: &[f64]) -> f64 {
    let product: f64 = other_messages.iter().map(|msg| (msg / 2.0).tanh()).product();
    let sign = if syndrome_bit != 0 { -1.0 } else { 1.0 };
    sign * ((1.0 + product) / (1.0 - product)).ln()
}

fn min_sum_message(syndrome_bit: u8, other_messages: &[f64], ms_scaling_factor: f64) -> f64 {
    let mut sigma = syndrome_bit as i32;
    let mut min_abs = f64::MAX;
    for &msg in other_messages {
        if msg <= 0.0 {
            sigma += 1;
        }
        min_abs = min_abs.min(msg.abs());
    }
    let sign = if sigma % 2 == 0 { 1.0 } else { -1.0 };
    sign * min_abs * ms_scaling_factor
}
