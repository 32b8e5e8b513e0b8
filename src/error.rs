use std::fmt;

/// All the ways construction or a decode call can fail.
///
/// Configuration errors (everything up to and including
/// [`ChannelLengthMismatch`](Error::ChannelLengthMismatch)) only ever
/// surface from [`Decoder::new`](crate::Decoder::new): construction either
/// succeeds completely or fails completely, there is no partially built
/// decoder. The remaining variants surface from a decode call and never
/// mutate the decoder's output buffers.
#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    /// The parity check matrix is not a valid sparse binary structure:
    /// an index is out of range or the same `(row, col)` pair was given
    /// twice.
    InvalidMatrix(String),
    /// A scalar error rate was not strictly between 0 and 1.
    InvalidErrorRate(f64),
    /// `max_iter` was negative.
    InvalidMaxIter(i64),
    /// The `bp_method` string or code did not match any known alias.
    InvalidBPMethod(String),
    /// The `schedule` string or code did not match any known alias.
    InvalidSchedule(String),
    /// The `input_vector_type` string or code did not match any known alias.
    InvalidInputType(String),
    /// `channel_probs` did not have length `n`.
    ChannelLengthMismatch { expected: usize, found: usize },
    /// `H` is square and the caller asked for `Auto` input-type inference,
    /// which cannot distinguish a syndrome from a received word.
    AmbiguousInput,
    /// The vector passed to `decode`/`si_decode` has neither length `m`
    /// nor length `n`.
    InvalidInputLength { expected_m: usize, expected_n: usize, found: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMatrix(reason) => write!(f, "invalid parity check matrix: {}", reason),
            Self::InvalidErrorRate(p) => {
                write!(f, "error rate {} is not strictly between 0 and 1", p)
            }
            Self::InvalidMaxIter(iter) => write!(f, "max_iter {} is negative", iter),
            Self::InvalidBPMethod(method) => write!(f, "unrecognized bp_method: {}", method),
            Self::InvalidSchedule(schedule) => write!(f, "unrecognized schedule: {}", schedule),
            Self::InvalidInputType(kind) => write!(f, "unrecognized input_vector_type: {}", kind),
            Self::ChannelLengthMismatch { expected, found } => write!(
                f,
                "channel_probs has length {} but the code has {} bits",
                found, expected
            ),
            Self::AmbiguousInput => write!(
                f,
                "input_vector_type is Auto but the parity check matrix is square: \
                 a length-n vector could be either a syndrome or a received word"
            ),
            Self::InvalidInputLength { expected_m, expected_n, found } => write!(
                f,
                "input vector has length {} but expected {} (syndrome) or {} (received word)",
                found, expected_m, expected_n
            ),
        }
    }
}

impl std::error::Error for Error {}
