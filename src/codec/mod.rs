//! Text encoding for per-repetition sample series.
//!
//! A series is stored as one TEXT value: `[]` when empty, otherwise the
//! elements in order, separated by a single `,` and wrapped in brackets, with
//! no whitespace anywhere. Floats are rendered in their shortest round-trip
//! form so `decode(encode(s))` is bit-identical to `s`.
//!
//! Non-finite floats are rejected on both sides: `encode` refuses them with
//! [`CodecError::NonFiniteSample`] and `decode` treats tokens such as `inf` or
//! `NaN` as malformed.

mod error;
mod sample;
mod series;

#[cfg(test)]
mod proptests;

pub use error::CodecError;
pub use sample::Sample;
pub use series::SampleSeries;

const OPEN: char = '[';
const CLOSE: char = ']';
const DELIMITER: char = ',';

/// Encodes `samples` into their bracketed text form.
pub fn encode<T: Sample>(samples: &[T]) -> Result<String, CodecError> {
    if let Some(index) = samples.iter().position(|sample| !sample.is_representable()) {
        return Err(CodecError::NonFiniteSample { index });
    }

    Ok(serde_json::to_string(samples)?)
}

/// Decodes text produced by [`encode`] back into samples.
///
/// Fails with [`CodecError::MalformedInput`] if the brackets are missing or any
/// token does not parse as `T`.
pub fn decode<T: Sample>(text: &str) -> Result<Vec<T>, CodecError> {
    let interior = text
        .strip_prefix(OPEN)
        .and_then(|rest| rest.strip_suffix(CLOSE))
        .ok_or_else(|| CodecError::malformed(format!("expected `{OPEN}...{CLOSE}`, got {text:?}")))?;

    // Splitting "" would yield one empty token.
    if interior.is_empty() {
        return Ok(Vec::new());
    }

    interior
        .split(DELIMITER)
        .enumerate()
        .map(|(index, token)| {
            T::parse_token(token).ok_or_else(|| {
                CodecError::malformed(format!(
                    "token {index} ({token:?}) is not a valid {}",
                    T::KIND
                ))
            })
        })
        .collect()
}
