//! The public decoder facade: construction, the syndrome/received-word
//! adapter, plain BP decoding, and stabilizer-inactivation decoding.

use crate::bp::{self, BpMethod, InputVectorType, Schedule};
use crate::channel::ChannelModel;
use crate::error::Error;
use crate::inactivation;
use crate::sparse::SparseMod2;

/// Everything [`Decoder::new`] needs to build a decoder.
///
/// This is a plain struct rather than a builder: BP construction in the
/// corpus this crate follows takes its parameters as a flat argument list
/// (`BpDecoder::new(code, probability, max_iter, ...)`), and a builder
/// only earns its keep when a type has genuinely optional assembly steps
/// (`RandomRegularCode`'s random wiring). Every field here is required.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    pub parity_check_matrix: SparseMod2,
    /// A single error rate applied to every bit. Overridden by
    /// `channel_probs` when both are given.
    pub error_rate: Option<f64>,
    /// A per-bit error rate. Takes priority over `error_rate`.
    pub channel_probs: Option<Vec<f64>>,
    /// `0` means "use `n`" (the number of bits), resolved once here.
    pub max_iter: i64,
    pub bp_method: BpMethod,
    pub schedule: Schedule,
    /// `0.0` selects the adaptive schedule `alpha_t = 1 - 2^-t`.
    pub ms_scaling_factor: f64,
    pub input_vector_type: InputVectorType,
}

/// A belief-propagation decoder for a fixed parity-check matrix, with
/// stabilizer-inactivation as a fallback when plain BP does not converge.
#[derive(Debug, Clone)]
pub struct Decoder {
    h: SparseMod2,
    channel: ChannelModel,
    m: usize,
    n: usize,
    max_iter: usize,
    bp_method: BpMethod,
    schedule: Schedule,
    ms_scaling_factor: f64,
    input_vector_type: InputVectorType,
    bp_decoding: Vec<u8>,
    log_prob_ratios: Vec<f64>,
    inactivated_checks: Vec<u8>,
    iter: usize,
    converge: bool,
}

impl Decoder {
    /// Builds a decoder from `config`, validating every scalar input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMaxIter`] if `max_iter` is negative,
    /// [`Error::InvalidErrorRate`] / [`Error::ChannelLengthMismatch`] if
    /// neither or both of `error_rate`/`channel_probs` describe a valid
    /// channel for `n` bits.
    pub fn new(config: DecoderConfig) -> Result<Self, Error> {
        if config.max_iter < 0 {
            return Err(Error::InvalidMaxIter(config.max_iter));
        }
        let m = config.parity_check_matrix.number_of_rows();
        let n = config.parity_check_matrix.number_of_cols();
        let max_iter = if config.max_iter == 0 { n } else { config.max_iter as usize };

        let channel = match config.channel_probs {
            Some(probs) => ChannelModel::per_bit(probs)?,
            None => match config.error_rate {
                Some(p) => ChannelModel::uniform(p, n)?,
                None => return Err(Error::InvalidErrorRate(f64::NAN)),
            },
        };
        if channel.len() != n {
            return Err(Error::ChannelLengthMismatch { expected: n, found: channel.len() });
        }

        Ok(Self {
            h: config.parity_check_matrix,
            channel,
            m,
            n,
            max_iter,
            bp_method: config.bp_method,
            schedule: config.schedule,
            ms_scaling_factor: config.ms_scaling_factor,
            input_vector_type: config.input_vector_type,
            bp_decoding: vec![0; n],
            log_prob_ratios: vec![0.0; n],
            inactivated_checks: vec![0; m],
            iter: 0,
            converge: false,
        })
    }

    /// Decides whether `v` is a syndrome or a received word, per spec.md
    /// §4.4: an explicit (non-`Auto`) declared type is validated against
    /// its expected length; `Auto` infers the type from `v.len()` unless
    /// `m == n`, which makes the two lengths indistinguishable.
    fn resolve_kind(&self, len: usize) -> Result<InputKind, Error> {
        match self.input_vector_type {
            InputVectorType::Syndrome if len == self.m => Ok(InputKind::Syndrome),
            InputVectorType::Received if len == self.n => Ok(InputKind::Received),
            InputVectorType::Syndrome | InputVectorType::Received => Err(Error::InvalidInputLength {
                expected_m: self.m,
                expected_n: self.n,
                found: len,
            }),
            InputVectorType::Auto if self.m == self.n => Err(Error::AmbiguousInput),
            InputVectorType::Auto if len == self.n => Ok(InputKind::Received),
            InputVectorType::Auto if len == self.m => Ok(InputKind::Syndrome),
            InputVectorType::Auto => {
                Err(Error::InvalidInputLength { expected_m: self.m, expected_n: self.n, found: len })
            }
        }
    }

    fn syndrome_of(&self, kind: InputKind, v: &[u8]) -> Vec<u8> {
        match kind {
            InputKind::Syndrome => v.to_vec(),
            InputKind::Received => {
                let mut synd = vec![0u8; self.m];
                self.h.mulvec(v, &mut synd);
                synd
            }
        }
    }

    fn estimate_of(&self, kind: InputKind, received: &[u8]) -> Vec<u8> {
        match kind {
            InputKind::Syndrome => self.bp_decoding.clone(),
            InputKind::Received => {
                self.bp_decoding.iter().zip(received).map(|(&d, &r)| d ^ r).collect()
            }
        }
    }

    /// Runs plain belief propagation on `v` and returns the estimated
    /// error (if `v` is a received word) or codeword correction (if `v`
    /// is a syndrome), per spec.md §4.4.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousInput`] or [`Error::InvalidInputLength`]
    /// per the rules of spec.md §4.4.
    pub fn decode(&mut self, v: &[u8]) -> Result<Vec<u8>, Error> {
        let kind = self.resolve_kind(v.len())?;
        let syndrome = self.syndrome_of(kind, v);
        let outcome = bp::run(
            &mut self.h,
            &self.channel,
            &syndrome,
            &self.inactivated_checks,
            self.max_iter,
            self.bp_method,
            self.schedule,
            self.ms_scaling_factor,
            &mut self.bp_decoding,
            &mut self.log_prob_ratios,
        );
        self.iter = outcome.iterations;
        self.converge = outcome.converged;
        Ok(self.estimate_of(kind, v))
    }

    /// Runs plain BP on the syndrome `v`; on non-convergence, falls back
    /// to stabilizer-inactivation (spec.md §4.5). Always interprets `v`
    /// as a syndrome, regardless of `input_vector_type`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInputLength`] if `v.len() != m`.
    pub fn si_decode(&mut self, v: &[u8]) -> Result<Vec<u8>, Error> {
        if v.len() != self.m {
            return Err(Error::InvalidInputLength {
                expected_m: self.m,
                expected_n: self.n,
                found: v.len(),
            });
        }

        let plain = bp::run(
            &mut self.h,
            &self.channel,
            v,
            &self.inactivated_checks,
            self.max_iter,
            self.bp_method,
            self.schedule,
            self.ms_scaling_factor,
            &mut self.bp_decoding,
            &mut self.log_prob_ratios,
        );
        self.iter = plain.iterations;
        self.converge = plain.converged;
        if plain.converged {
            return Ok(self.bp_decoding.clone());
        }

        let outcome = inactivation::run(
            &mut self.h,
            &self.channel,
            self.bp_method,
            self.schedule,
            self.ms_scaling_factor,
            self.max_iter,
            v,
            &self.log_prob_ratios,
            &mut self.bp_decoding,
            &mut self.inactivated_checks,
        );
        self.iter = outcome.iterations;
        self.converge = outcome.converged;
        Ok(self.bp_decoding.clone())
    }

    /// Replaces the channel's per-bit error probabilities.
    pub fn update_channel_probs(&mut self, probabilities: &[f64]) -> Result<(), Error> {
        self.channel.update(probabilities)
    }

    pub fn iter(&self) -> usize {
        self.iter
    }

    pub fn converge(&self) -> bool {
        self.converge
    }

    pub fn bp_decoding(&self) -> &[u8] {
        &self.bp_decoding
    }

    pub fn log_prob_ratios(&self) -> &[f64] {
        &self.log_prob_ratios
    }

    pub fn channel_probs(&self) -> &[f64] {
        self.channel.probabilities()
    }

    pub fn bp_method(&self) -> &'static str {
        self.bp_method.as_str()
    }

    pub fn schedule(&self) -> &'static str {
        self.schedule.as_str()
    }

    pub fn ms_scaling_factor(&self) -> f64 {
        self.ms_scaling_factor
    }

    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    pub fn inactivated_checks(&self) -> &[u8] {
        &self.inactivated_checks
    }

    /// Marks every check in `indices` as inactivated for the next BP run.
    /// Does not clear checks already marked.
    pub fn set_inactivated_checks(&mut self, indices: &[usize]) {
        for &check in indices {
            self.inactivated_checks[check] = 1;
        }
    }

    pub fn reset_inactivated_checks(&mut self) {
        self.inactivated_checks.iter_mut().for_each(|slot| *slot = 0);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputKind {
    Syndrome,
    Received,
}

#[cfg(test)]
mod test {
    use super::*;

    fn repetition_code_config(input_vector_type: InputVectorType) -> DecoderConfig {
        let h = SparseMod2::construct(2, 3, vec![(0, 0), (0, 1), (1, 1), (1, 2)]).unwrap();
        DecoderConfig {
            parity_check_matrix: h,
            error_rate: Some(0.1),
            channel_probs: None,
            max_iter: 10,
            bp_method: BpMethod::ProdSumLog,
            schedule: Schedule::Parallel,
            ms_scaling_factor: 0.0,
            input_vector_type,
        }
    }

    #[test]
    fn decode_a_syndrome_input() {
        let mut decoder = Decoder::new(repetition_code_config(InputVectorType::Syndrome)).unwrap();
        let correction = decoder.decode(&[1, 0]).unwrap();
        assert!(decoder.converge());
        assert_eq!(correction, vec![1, 0, 0]);
    }

    #[test]
    fn decode_a_received_word_xors_back_the_error() {
        let mut decoder = Decoder::new(repetition_code_config(InputVectorType::Received)).unwrap();
        // bit 0 flipped: received = [1, 1, 1] XOR error [1,0,0]
        let estimate = decoder.decode(&[0, 1, 1]).unwrap();
        assert!(decoder.converge());
        assert_eq!(estimate, vec![1, 1, 1]);
    }

    #[test]
    fn auto_infers_from_length_on_a_non_square_matrix() {
        let mut decoder = Decoder::new(repetition_code_config(InputVectorType::Auto)).unwrap();
        let from_syndrome = decoder.decode(&[1, 0]).unwrap();
        assert_eq!(from_syndrome, vec![1, 0, 0]);
        let from_received = decoder.decode(&[0, 1, 1]).unwrap();
        assert_eq!(from_received, vec![1, 1, 1]);
    }

    #[test]
    fn auto_on_a_square_matrix_is_ambiguous() {
        let h = SparseMod2::construct(3, 3, vec![(0, 0), (1, 1), (2, 2)]).unwrap();
        let mut decoder = Decoder::new(DecoderConfig {
            parity_check_matrix: h,
            error_rate: Some(0.1),
            channel_probs: None,
            max_iter: 5,
            bp_method: BpMethod::ProdSumLog,
            schedule: Schedule::Parallel,
            ms_scaling_factor: 0.0,
            input_vector_type: InputVectorType::Auto,
        })
        .unwrap();
        assert_eq!(decoder.decode(&[0, 0, 0]), Err(Error::AmbiguousInput));
    }

    #[test]
    fn wrong_length_input_is_rejected() {
        let mut decoder = Decoder::new(repetition_code_config(InputVectorType::Syndrome)).unwrap();
        assert!(matches!(decoder.decode(&[0, 0, 0]), Err(Error::InvalidInputLength { .. })));
    }

    #[test]
    fn max_iter_zero_resolves_to_block_length() {
        let decoder = Decoder::new(repetition_code_config(InputVectorType::Syndrome)).unwrap();
        assert_eq!(decoder.max_iter(), 10);

        let mut config = repetition_code_config(InputVectorType::Syndrome);
        config.max_iter = 0;
        let decoder = Decoder::new(config).unwrap();
        assert_eq!(decoder.max_iter(), 3);
    }

    #[test]
    fn negative_max_iter_is_rejected() {
        let mut config = repetition_code_config(InputVectorType::Syndrome);
        config.max_iter = -1;
        assert_eq!(Decoder::new(config).unwrap_err(), Error::InvalidMaxIter(-1));
    }

    #[test]
    fn reset_inactivated_checks_undoes_a_prior_set() {
        let mut decoder = Decoder::new(repetition_code_config(InputVectorType::Syndrome)).unwrap();
        decoder.set_inactivated_checks(&[0]);
        assert_eq!(decoder.inactivated_checks(), &[1, 0]);
        decoder.reset_inactivated_checks();
        assert_eq!(decoder.inactivated_checks(), &[0, 0]);

        let cleared = decoder.decode(&[1, 0]).unwrap();
        assert_eq!(cleared, vec![1, 0, 0]);
    }
}
