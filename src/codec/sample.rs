use std::fmt;

use serde::{de::DeserializeOwned, Serialize};

/// A numeric element that can live inside an encoded sample series.
///
/// Rendering goes through `serde_json`, which emits the shortest decimal
/// form that parses back to the same value (`0.0`, `-1.0`, `3.14`, `-50`).
pub trait Sample:
    Copy + PartialEq + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Type name used in error messages.
    const KIND: &'static str;

    /// Parses a single interior token. Returns `None` for anything that is
    /// not a representable value of this type.
    fn parse_token(token: &str) -> Option<Self>;

    /// Whether the value has an encoded form. Always true for integers.
    fn is_representable(self) -> bool;
}

macro_rules! float_sample {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                const KIND: &'static str = stringify!($t);

                fn parse_token(token: &str) -> Option<Self> {
                    token.parse::<$t>().ok().filter(|value| value.is_finite())
                }

                fn is_representable(self) -> bool {
                    self.is_finite()
                }
            }
        )*
    };
}

macro_rules! int_sample {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                const KIND: &'static str = stringify!($t);

                fn parse_token(token: &str) -> Option<Self> {
                    token.parse::<$t>().ok()
                }

                fn is_representable(self) -> bool {
                    true
                }
            }
        )*
    };
}

float_sample!(f32, f64);
int_sample!(i32, i64, u32, u64);
