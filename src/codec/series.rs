use std::{fmt, ops::Deref, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use super::{decode, encode, CodecError, Sample};

/// An ordered sequence of samples captured during one repetition.
///
/// Binds to a TEXT column through the series codec, and serializes to JSON
/// as a plain array.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound = "T: Sample")]
pub struct SampleSeries<T: Sample>(Vec<T>);

impl<T: Sample> SampleSeries<T> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<T> {
        self.0
    }

    pub fn encode(&self) -> Result<String, CodecError> {
        encode(&self.0)
    }

    pub fn decode(text: &str) -> Result<Self, CodecError> {
        decode(text).map(Self)
    }
}

impl<T: Sample> Deref for SampleSeries<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T: Sample> From<Vec<T>> for SampleSeries<T> {
    fn from(samples: Vec<T>) -> Self {
        Self(samples)
    }
}

impl<T: Sample> FromIterator<T> for SampleSeries<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T: Sample> FromStr for SampleSeries<T> {
    type Err = CodecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::decode(text)
    }
}

impl<T: Sample> fmt::Display for SampleSeries<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.encode().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl<T: Sample> ToSql for SampleSeries<T> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let text = self
            .encode()
            .map_err(|err| rusqlite::Error::ToSqlConversionFailure(Box::new(err)))?;
        Ok(ToSqlOutput::from(text))
    }
}

impl<T: Sample> FromSql for SampleSeries<T> {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        Self::decode(text).map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}
