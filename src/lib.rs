//! Belief-propagation decoding for LDPC codes, with stabilizer-inactivation
//! as a fallback when plain BP does not converge.
//!
//! The entry point is [`Decoder`], built from a [`DecoderConfig`] around a
//! parity-check matrix expressed as a [`SparseMod2`]. [`Decoder::decode`]
//! runs plain belief propagation; [`Decoder::si_decode`] additionally
//! retries non-convergent syndromes with stabilizer-inactivation.
//!
//! ```
//! use ldpc_bp_decoder::{BpMethod, Decoder, DecoderConfig, InputVectorType, Schedule, SparseMod2};
//!
//! // 3-bit repetition code: H = [[1,1,0],[0,1,1]]
//! let h = SparseMod2::construct(2, 3, vec![(0, 0), (0, 1), (1, 1), (1, 2)]).unwrap();
//! let mut decoder = Decoder::new(DecoderConfig {
//!     parity_check_matrix: h,
//!     error_rate: Some(0.05),
//!     channel_probs: None,
//!     max_iter: 10,
//!     bp_method: BpMethod::MinSumLog,
//!     schedule: Schedule::Parallel,
//!     ms_scaling_factor: 1.0,
//!     input_vector_type: InputVectorType::Syndrome,
//! }).unwrap();
//!
//! let correction = decoder.decode(&[1, 0]).unwrap();
//! assert!(decoder.converge());
//! assert_eq!(correction, vec![1, 0, 0]);
//! ```

pub mod bp;
pub mod channel;
pub mod decoder;
pub mod error;
pub mod gf2;
pub mod inactivation;
pub mod sparse;

pub use bp::{BpMethod, BpOutcome, InputVectorType, Schedule};
pub use channel::ChannelModel;
pub use decoder::{Decoder, DecoderConfig};
pub use error::Error;
pub use sparse::{EntryId, SparseMod2};
