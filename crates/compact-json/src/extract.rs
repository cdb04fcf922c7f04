//! Conversions between stored values and Rust values.
//!
//! Numbers convert between the three numeric representations whenever the value is preserved:
//! `2.0` extracts as `2_i64`, `-1` does not extract as `u64`, and every number extracts as `f64`.
use crate::{
    document::Value,
    error::Error,
    record::Record,
};

/// Types that can be extracted from a [`Value`] with [`Value::extract`].
pub trait FromValue<'a>: Sized {
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] if `value` can not be represented as `Self`.
    fn from_value(value: Value<'a>) -> Result<Self, Error>;
}

impl<'a> FromValue<'a> for bool {
    fn from_value(value: Value<'a>) -> Result<Self, Error> {
        match value.record() {
            Record::Boolean(b) => Ok(*b),
            record => Err(Error::type_mismatch("bool", record.kind())),
        }
    }
}

impl<'a> FromValue<'a> for &'a str {
    fn from_value(value: Value<'a>) -> Result<Self, Error> {
        value
            .as_str()
            .ok_or_else(|| Error::type_mismatch("&str", value.kind()))
    }
}

impl<'a> FromValue<'a> for () {
    fn from_value(value: Value<'a>) -> Result<Self, Error> {
        match value.record() {
            Record::Null => Ok(()),
            record => Err(Error::type_mismatch("()", record.kind())),
        }
    }
}

// 2^63 and 2^64 are exact in `f64`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
const U64_BOUND: f64 = 18_446_744_073_709_551_616.0;

#[allow(clippy::cast_possible_truncation)]
fn float_to_i64(value: f64) -> Option<i64> {
    (value.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&value)).then_some(value as i64)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn float_to_u64(value: f64) -> Option<u64> {
    (value.fract() == 0.0 && (0.0..U64_BOUND).contains(&value)).then_some(value as u64)
}

impl<'a> FromValue<'a> for i64 {
    fn from_value(value: Value<'a>) -> Result<Self, Error> {
        let converted = match value.record() {
            Record::Integer(i) => Some(*i),
            Record::UInteger(u) => i64::try_from(*u).ok(),
            Record::Float(f) => float_to_i64(*f),
            _ => None,
        };
        converted.ok_or_else(|| Error::type_mismatch("i64", value.kind()))
    }
}

impl<'a> FromValue<'a> for u64 {
    fn from_value(value: Value<'a>) -> Result<Self, Error> {
        let converted = match value.record() {
            Record::Integer(i) => u64::try_from(*i).ok(),
            Record::UInteger(u) => Some(*u),
            Record::Float(f) => float_to_u64(*f),
            _ => None,
        };
        converted.ok_or_else(|| Error::type_mismatch("u64", value.kind()))
    }
}

impl<'a> FromValue<'a> for f64 {
    #[allow(clippy::cast_precision_loss)]
    fn from_value(value: Value<'a>) -> Result<Self, Error> {
        match value.record() {
            Record::Integer(i) => Ok(*i as f64),
            Record::UInteger(u) => Ok(*u as f64),
            Record::Float(f) => Ok(*f),
            record => Err(Error::type_mismatch("f64", record.kind())),
        }
    }
}

macro_rules! narrow {
    ($($target:ty => $via:ty),* $(,)?) => {
        $(
            impl<'a> FromValue<'a> for $target {
                fn from_value(value: Value<'a>) -> Result<Self, Error> {
                    <$via>::from_value(value)
                        .ok()
                        .and_then(|wide| <$target>::try_from(wide).ok())
                        .ok_or_else(|| Error::type_mismatch(stringify!($target), value.kind()))
                }
            }
        )*
    };
}

narrow!(i32 => i64, u32 => u64, usize => u64);

/// A number widened for comparison.
#[derive(Copy, Clone)]
enum Numeric {
    Int(i128),
    Float(f64),
}

impl Numeric {
    fn of(record: &Record) -> Option<Numeric> {
        match record {
            Record::Integer(i) => Some(Numeric::Int(i128::from(*i))),
            Record::UInteger(u) => Some(Numeric::Int(i128::from(*u))),
            Record::Float(f) => Some(Numeric::Float(*f)),
            _ => None,
        }
    }

    fn from_json(number: &serde_json::Number) -> Numeric {
        if let Some(i) = number.as_i64() {
            Numeric::Int(i128::from(i))
        } else if let Some(u) = number.as_u64() {
            Numeric::Int(i128::from(u))
        } else {
            Numeric::Float(number.as_f64().unwrap_or(f64::NAN))
        }
    }

    #[allow(clippy::cast_precision_loss, clippy::float_cmp)]
    fn equals(self, other: Numeric) -> bool {
        match (self, other) {
            (Numeric::Int(a), Numeric::Int(b)) => a == b,
            (Numeric::Int(i), Numeric::Float(f)) | (Numeric::Float(f), Numeric::Int(i)) => {
                i as f64 == f
            }
            (Numeric::Float(a), Numeric::Float(b)) => a == b,
        }
    }
}

fn numeric_eq(record: &Record, other: Numeric) -> bool {
    Numeric::of(record).is_some_and(|numeric| numeric.equals(other))
}

/// Every member of `object` is what `other` finds under the same key.
fn contains_entries(object: &Value<'_>, other: &Value<'_>) -> bool {
    object
        .entries()
        .all(|(key, value)| other.find(key).is_some_and(|found| found == value))
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self.record(), other.record()) {
            (Record::Null, Record::Null) => true,
            (Record::Boolean(a), Record::Boolean(b)) => a == b,
            (Record::String(_), Record::String(_)) => self.as_str() == other.as_str(),
            (Record::Array(_), Record::Array(_)) => {
                self.size() == other.size() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
            }
            (Record::Object { .. }, Record::Object { .. }) => {
                // Checked both ways: objects may hold duplicate keys
                self.size() == other.size()
                    && contains_entries(self, other)
                    && contains_entries(other, self)
            }
            (left, right) => Numeric::of(right).is_some_and(|right| numeric_eq(left, right)),
        }
    }
}

impl PartialEq<serde_json::Value> for Value<'_> {
    fn eq(&self, other: &serde_json::Value) -> bool {
        match (self.record(), other) {
            (Record::Null, serde_json::Value::Null) => true,
            (Record::Boolean(a), serde_json::Value::Bool(b)) => a == b,
            (record, serde_json::Value::Number(number)) => {
                numeric_eq(record, Numeric::from_json(number))
            }
            (Record::String(_), serde_json::Value::String(s)) => self.as_str() == Some(s.as_str()),
            (Record::Array(_), serde_json::Value::Array(items)) => {
                self.size() == items.len() && self.iter().zip(items).all(|(a, b)| a == *b)
            }
            (Record::Object { .. }, serde_json::Value::Object(map)) => {
                self.size() == map.len()
                    && map
                        .iter()
                        .all(|(key, value)| self.find(key).is_some_and(|found| found == *value))
            }
            _ => false,
        }
    }
}

impl<'a> PartialEq<Value<'a>> for serde_json::Value {
    fn eq(&self, other: &Value<'a>) -> bool {
        other == self
    }
}

impl PartialEq<bool> for Value<'_> {
    fn eq(&self, other: &bool) -> bool {
        matches!(self.record(), Record::Boolean(b) if b == other)
    }
}

impl PartialEq<()> for Value<'_> {
    fn eq(&self, _: &()) -> bool {
        self.is_null()
    }
}

impl PartialEq<str> for Value<'_> {
    fn eq(&self, other: &str) -> bool {
        match self.record() {
            Record::String(s) => s.len() == other.len() && self.as_str() == Some(other),
            _ => false,
        }
    }
}

impl PartialEq<&str> for Value<'_> {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<i64> for Value<'_> {
    fn eq(&self, other: &i64) -> bool {
        numeric_eq(self.record(), Numeric::Int(i128::from(*other)))
    }
}

impl PartialEq<i32> for Value<'_> {
    fn eq(&self, other: &i32) -> bool {
        numeric_eq(self.record(), Numeric::Int(i128::from(*other)))
    }
}

impl PartialEq<u64> for Value<'_> {
    fn eq(&self, other: &u64) -> bool {
        numeric_eq(self.record(), Numeric::Int(i128::from(*other)))
    }
}

impl PartialEq<f64> for Value<'_> {
    fn eq(&self, other: &f64) -> bool {
        numeric_eq(self.record(), Numeric::Float(*other))
    }
}
