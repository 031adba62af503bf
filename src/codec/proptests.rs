use proptest::prelude::*;

use super::{decode, encode};

prop_compose! {
    /// Finite f64 values spread across magnitudes, including subnormals and -0.0
    fn finite_f64()(value in prop::num::f64::NORMAL
        | prop::num::f64::SUBNORMAL
        | prop::num::f64::ZERO
        | prop::num::f64::NEGATIVE
        | prop::num::f64::POSITIVE) -> f64 {
        value
    }
}

proptest! {
    /// Property: decode(encode(s)) is bit-identical for finite floats
    #[test]
    fn prop_f64_round_trip(samples in prop::collection::vec(finite_f64(), 0..64)) {
        let decoded = decode::<f64>(&encode(&samples).unwrap()).unwrap();
        prop_assert_eq!(decoded.len(), samples.len());
        for (original, restored) in samples.iter().zip(&decoded) {
            prop_assert_eq!(original.to_bits(), restored.to_bits());
        }
    }

    /// Property: f32 curves round-trip exactly
    #[test]
    fn prop_f32_round_trip(samples in prop::collection::vec(-1.0e6f32..1.0e6, 0..64)) {
        let decoded = decode::<f32>(&encode(&samples).unwrap()).unwrap();
        prop_assert_eq!(decoded, samples);
    }

    /// Property: timestamp offsets round-trip across the whole i64 range
    #[test]
    fn prop_i64_round_trip(samples in prop::collection::vec(any::<i64>(), 0..64)) {
        let decoded = decode::<i64>(&encode(&samples).unwrap()).unwrap();
        prop_assert_eq!(decoded, samples);
    }

    /// Property: encode(decode(x)) == x for any x produced by encode
    #[test]
    fn prop_encoded_form_is_stable(samples in prop::collection::vec(finite_f64(), 0..64)) {
        let text = encode(&samples).unwrap();
        let reencoded = encode(&decode::<f64>(&text).unwrap()).unwrap();
        prop_assert_eq!(reencoded, text);
    }

    /// Property: the token count equals the number of delimiters plus one
    #[test]
    fn prop_token_count(samples in prop::collection::vec(any::<i32>(), 1..64)) {
        let text = encode(&samples).unwrap();
        prop_assert_eq!(text.matches(',').count() + 1, samples.len());
        prop_assert!(!text.contains(char::is_whitespace));
    }

    /// Property: truncating an encoded series never yields a partial decode
    #[test]
    fn prop_truncated_text_is_rejected(
        samples in prop::collection::vec(any::<i64>(), 1..32),
        cut in 1usize..8,
    ) {
        let text = encode(&samples).unwrap();
        let end = text.len().saturating_sub(cut);
        prop_assert!(decode::<i64>(&text[..end]).is_err());
    }
}
