use core::fmt::{self, Write};

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::{document::Value, record::Record};

/// Compact JSON, members in storage order.
impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.record() {
            Record::Null => f.write_str("null"),
            Record::Boolean(b) => write!(f, "{b}"),
            Record::Integer(i) => write!(f, "{i}"),
            Record::UInteger(u) => write!(f, "{u}"),
            Record::Float(value) => write_float(f, *value),
            Record::String(_) => write_string(f, self.as_str().unwrap_or_default()),
            Record::Array(_) => {
                f.write_char('[')?;
                for (idx, item) in self.iter().enumerate() {
                    if idx > 0 {
                        f.write_char(',')?;
                    }
                    fmt::Display::fmt(&item, f)?;
                }
                f.write_char(']')
            }
            Record::Object { .. } => {
                f.write_char('{')?;
                for (idx, (key, value)) in self.entries().enumerate() {
                    if idx > 0 {
                        f.write_char(',')?;
                    }
                    write_string(f, key)?;
                    f.write_char(':')?;
                    fmt::Display::fmt(&value, f)?;
                }
                f.write_char('}')
            }
        }
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    // Non-finite floats have no JSON representation.
    match serde_json::Number::from_f64(value) {
        Some(number) => write!(f, "{number}"),
        None => f.write_str("null"),
    }
}

fn write_string(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_char('"')?;
    let mut start = 0;
    for (idx, ch) in value.char_indices() {
        let escaped = match ch {
            '"' => "\\\"",
            '\\' => "\\\\",
            '\n' => "\\n",
            '\r' => "\\r",
            '\t' => "\\t",
            '\u{08}' => "\\b",
            '\u{0C}' => "\\f",
            c if c < ' ' => {
                f.write_str(&value[start..idx])?;
                write!(f, "\\u{:04x}", u32::from(c))?;
                start = idx + 1;
                continue;
            }
            _ => continue,
        };
        f.write_str(&value[start..idx])?;
        f.write_str(escaped)?;
        start = idx + 1;
    }
    f.write_str(&value[start..])?;
    f.write_char('"')
}

impl Serialize for Value<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.record() {
            Record::Null => serializer.serialize_unit(),
            Record::Boolean(b) => serializer.serialize_bool(*b),
            Record::Integer(i) => serializer.serialize_i64(*i),
            Record::UInteger(u) => serializer.serialize_u64(*u),
            Record::Float(value) => serializer.serialize_f64(*value),
            Record::String(_) => serializer.serialize_str(self.as_str().unwrap_or_default()),
            Record::Array(_) => {
                let mut seq = serializer.serialize_seq(Some(self.size()))?;
                for item in self {
                    seq.serialize_element(&item)?;
                }
                seq.end()
            }
            Record::Object { .. } => {
                let mut map = serializer.serialize_map(Some(self.size()))?;
                for (key, value) in self.entries() {
                    map.serialize_entry(key, &value)?;
                }
                map.end()
            }
        }
    }
}
