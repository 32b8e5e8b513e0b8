//! The flooding (parallel) schedule: every check-to-bit message for the
//! whole iteration is computed from last iteration's bit-to-check
//! messages before any bit-to-check message is updated.

use crate::channel::ChannelModel;
use crate::sparse::SparseMod2;

use super::kernel::BpMethod;
use super::MS_SENTINEL;

pub fn initialize_ratio_domain(h: &mut SparseMod2, channel: &ChannelModel) {
    for col in 0..h.number_of_cols() {
        let ratio = channel.probability_ratio(col);
        let entries: Vec<_> = h.col(col).collect();
        for e in entries {
            h.set_bit_to_check(e, ratio);
        }
    }
}

pub fn initialize_log_domain(h: &mut SparseMod2, channel: &ChannelModel) {
    for col in 0..h.number_of_cols() {
        let llr = channel.log_likelihood_ratio(col);
        let entries: Vec<_> = h.col(col).collect();
        for e in entries {
            h.set_bit_to_check(e, llr);
        }
    }
}

/// Check-to-bit phase for a single row under [`BpMethod::ProdSum`].
fn row_prod_sum_ratio(h: &mut SparseMod2, row: usize, syndrome_bit: u8) {
    let mut t = if syndrome_bit != 0 { -1.0 } else { 1.0 };
    let mut e = h.first_in_row(row);
    while !h.at_end(e) {
        h.set_check_to_bit(e, t);
        t *= 2.0 / (1.0 + h.bit_to_check(e)) - 1.0;
        e = h.next_in_row(e);
    }
    let mut t = 1.0;
    let mut e = h.last_in_row(row);
    while !h.at_end(e) {
        let combined = h.check_to_bit(e) * t;
        h.set_check_to_bit(e, (1.0 - combined) / (1.0 + combined));
        t *= 2.0 / (1.0 + h.bit_to_check(e)) - 1.0;
        e = h.prev_in_row(e);
    }
}

/// Check-to-bit phase for a single row under [`BpMethod::ProdSumLog`].
fn row_prod_sum_log(h: &mut SparseMod2, row: usize, syndrome_bit: u8) {
    let mut t = 1.0;
    let mut e = h.first_in_row(row);
    while !h.at_end(e) {
        h.set_check_to_bit(e, t);
        t *= (h.bit_to_check(e) / 2.0).tanh();
        e = h.next_in_row(e);
    }
    let sign = if syndrome_bit != 0 { -1.0 } else { 1.0 };
    let mut t = 1.0;
    let mut e = h.last_in_row(row);
    while !h.at_end(e) {
        let combined = h.check_to_bit(e) * t;
        h.set_check_to_bit(e, sign * ((1.0 + combined) / (1.0 - combined)).ln());
        t *= (h.bit_to_check(e) / 2.0).tanh();
        e = h.prev_in_row(e);
    }
}

/// Check-to-bit phase for a single row under [`BpMethod::MinSumLog`].
fn row_min_sum_log(h: &mut SparseMod2, row: usize, syndrome_bit: u8, alpha: f64) {
    let mut running_min = MS_SENTINEL;
    let mut running_sgn = syndrome_bit as i32;
    let mut e = h.first_in_row(row);
    while !h.at_end(e) {
        h.set_check_to_bit(e, running_min);
        h.set_sign(e, running_sgn);
        let abs_msg = h.bit_to_check(e).abs();
        if abs_msg < running_min {
            running_min = abs_msg;
        }
        if h.bit_to_check(e) <= 0.0 {
            running_sgn += 1;
        }
        e = h.next_in_row(e);
    }

    let mut running_min = MS_SENTINEL;
    let mut running_sgn = 0;
    let mut e = h.last_in_row(row);
    while !h.at_end(e) {
        let combined = h.check_to_bit(e).min(running_min);
        let sgn = h.sign(e) + running_sgn;
        let sign = if sgn % 2 == 0 { 1.0 } else { -1.0 };
        h.set_check_to_bit(e, sign * alpha * combined);
        h.set_sign(e, sgn);

        let abs_msg = h.bit_to_check(e).abs();
        if abs_msg < running_min {
            running_min = abs_msg;
        }
        if h.bit_to_check(e) <= 0.0 {
            running_sgn += 1;
        }
        e = h.prev_in_row(e);
    }
}

/// Runs the row (check-to-bit) phase for every check, honoring
/// `inactivated_checks`.
pub fn row_phase(
    h: &mut SparseMod2,
    method: BpMethod,
    syndrome: &[u8],
    inactivated_checks: &[u8],
    alpha: f64,
) {
    for row in 0..h.number_of_rows() {
        if inactivated_checks[row] != 0 {
            // An inactivated check carries no information to its
            // neighbors: the neutral message is the identity element of
            // whichever domain the kernel combines messages in (product
            // of ratios vs. sum of log-likelihoods).
            let neutral = if method == BpMethod::ProdSum { 1.0 } else { 0.0 };
            let mut e = h.first_in_row(row);
            while !h.at_end(e) {
                h.set_check_to_bit(e, neutral);
                e = h.next_in_row(e);
            }
            continue;
        }
        match method {
            BpMethod::ProdSum => row_prod_sum_ratio(h, row, syndrome[row]),
            BpMethod::ProdSumLog => row_prod_sum_log(h, row, syndrome[row]),
            BpMethod::MinSumLog => row_min_sum_log(h, row, syndrome[row], alpha),
            BpMethod::MinSum => unreachable!("MinSum is always resolved to MinSumLog"),
        }
    }
}

/// Bit-to-check and posterior phase under [`BpMethod::ProdSum`].
///
/// Returns the per-bit hard decision; `log_prob_ratios[j]` receives
/// `log(1/T)` for the forward accumulator `T`.
fn col_prod_sum_ratio(
    h: &mut SparseMod2,
    channel: &ChannelModel,
    decoding: &mut [u8],
    log_prob_ratios: &mut [f64],
) {
    for col in 0..h.number_of_cols() {
        let mut t = channel.probability_ratio(col);
        let mut e = h.first_in_col(col);
        while !h.at_end(e) {
            h.set_bit_to_check(e, t);
            t *= h.check_to_bit(e);
            if t.is_nan() {
                t = 1.0;
            }
            e = h.next_in_col(e);
        }
        log_prob_ratios[col] = (1.0 / t).ln();
        decoding[col] = if t >= 1.0 { 1 } else { 0 };

        let mut t = 1.0;
        let mut e = h.last_in_col(col);
        while !h.at_end(e) {
            let updated = h.bit_to_check(e) * t;
            h.set_bit_to_check(e, updated);
            t *= h.check_to_bit(e);
            if t.is_nan() {
                t = 1.0;
            }
            e = h.prev_in_col(e);
        }
    }
}

/// Bit-to-check and posterior phase shared by [`BpMethod::ProdSumLog`]
/// and [`BpMethod::MinSumLog`].
fn col_log_domain(
    h: &mut SparseMod2,
    channel: &ChannelModel,
    decoding: &mut [u8],
    log_prob_ratios: &mut [f64],
) {
    for col in 0..h.number_of_cols() {
        let mut t = channel.log_likelihood_ratio(col);
        let mut e = h.first_in_col(col);
        while !h.at_end(e) {
            h.set_bit_to_check(e, t);
            t += h.check_to_bit(e);
            e = h.next_in_col(e);
        }
        log_prob_ratios[col] = t;
        decoding[col] = if t <= 0.0 { 1 } else { 0 };

        let mut t = 0.0;
        let mut e = h.last_in_col(col);
        while !h.at_end(e) {
            let updated = h.bit_to_check(e) + t;
            h.set_bit_to_check(e, updated);
            t += h.check_to_bit(e);
            e = h.prev_in_col(e);
        }
    }
}

pub fn col_phase(
    h: &mut SparseMod2,
    channel: &ChannelModel,
    method: BpMethod,
    decoding: &mut [u8],
    log_prob_ratios: &mut [f64],
) {
    match method {
        BpMethod::ProdSum => col_prod_sum_ratio(h, channel, decoding, log_prob_ratios),
        BpMethod::ProdSumLog | BpMethod::MinSumLog => {
            col_log_domain(h, channel, decoding, log_prob_ratios)
        }
        BpMethod::MinSum => unreachable!("MinSum is always resolved to MinSumLog"),
    }
}
