use ldpc_bp_decoder::{BpMethod, Decoder, DecoderConfig, InputVectorType, Schedule, SparseMod2};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn main() {
    let probability = 0.05;
    let trials = 1000;
    let code = hamming_code();
    let mut decoder = Decoder::new(DecoderConfig {
        parity_check_matrix: code,
        error_rate: Some(probability),
        channel_probs: None,
        max_iter: 7,
        bp_method: BpMethod::MinSumLog,
        schedule: Schedule::Parallel,
        ms_scaling_factor: 1.0,
        input_vector_type: InputVectorType::Received,
    })
    .unwrap();

    // The all-zero codeword is sent each trial, so `received` is exactly
    // the channel's error pattern, and a successful decode XORs it back
    // to all zeros.
    let mut rng = SmallRng::seed_from_u64(0);
    let mut failures = 0;
    for _ in 0..trials {
        let error: Vec<u8> = (0..7).map(|_| u8::from(rng.gen::<f64>() < probability)).collect();
        let estimate = decoder.decode(&error).unwrap();
        if estimate != vec![0u8; 7] {
            failures += 1;
        }
    }
    println!("{} failures out of {} trials", failures, trials);
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
