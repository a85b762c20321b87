use std::str::FromStr;
use chrono::{DateTime, Utc};
use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Deserializer, Serialize};
use serde::de::Error as _;
use serde_json::{Map, Value};
use serde_repr::Serialize_repr;

use crate::ProtocolError;

/// Enumerations of the referee protocol. In JSON they show up either by name (`"NORMAL_START"`)
/// or by number, depending on which encoder produced the dump.
pub trait ProtoEnum: Sized + Copy + Into<i32> + 'static {
    const TYPE_NAME: &'static str;

    /// Every known value, in protocol order
    const ALL: &'static [Self];

    fn from_name(name: &str) -> Option<Self>;

    fn name(self) -> &'static str;
}

// Stage and Command are kept as raw i32s on the messages so that values from a newer protocol
// version survive decoding. This generates the closed enum used to interpret them.
macro_rules! proto_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $value:literal => $proto_name:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(::serde_repr::Serialize_repr, ::num_enum::IntoPrimitive, ::num_enum::TryFromPrimitive)]
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        #[repr(i32)]
        pub enum $name {
            $($variant = $value),+
        }

        impl $crate::ProtoEnum for $name {
            const TYPE_NAME: &'static str = stringify!($name);

            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($proto_name => Some($name::$variant),)+
                    _ => None,
                }
            }

            fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $proto_name),+
                }
            }
        }
    };
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProtoEnumValue {
    Number(i32),
    Name(String),
}

/// Deserializes a protocol enum field into its raw number. Numbers are passed through untouched,
/// names must be known.
pub fn deserialize_proto_enum<'de, T: ProtoEnum, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    proto_enum_number::<T, D>(ProtoEnumValue::deserialize(deserializer)?)
}

pub fn deserialize_optional_proto_enum<'de, T: ProtoEnum, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    Option::<ProtoEnumValue>::deserialize(deserializer)?
        .map(proto_enum_number::<T, D>)
        .transpose()
}

fn proto_enum_number<'de, T: ProtoEnum, D: Deserializer<'de>>(value: ProtoEnumValue) -> Result<i32, D::Error> {
    match value {
        ProtoEnumValue::Number(number) => Ok(number),
        ProtoEnumValue::Name(name) => T::from_name(&name)
            .map(Into::into)
            .ok_or_else(|| D::Error::custom(ProtocolError::UnknownEnumName { type_name: T::TYPE_NAME, name })),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProtoInt<T> {
    Number(T),
    Text(String),
}

/// The JSON mapping writes 64-bit integers as strings, but hand-written dumps use plain numbers.
/// Accept both.
pub fn deserialize_optional_int<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where T: FromStr + Deserialize<'de>, D: Deserializer<'de>
{
    match Option::<ProtoInt<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(ProtoInt::Number(n)) => Ok(Some(n)),
        Some(ProtoInt::Text(text)) => text.trim().parse()
            .map(Some)
            .map_err(|_| D::Error::custom(ProtocolError::MalformedInteger(text))),
    }
}

/// Converts a protocol timestamp (microseconds since the unix epoch)
pub fn timestamp_from_micros(micros: u64) -> Option<DateTime<Utc>> {
    let secs = i64::try_from(micros / 1_000_000).ok()?;
    let nanos = (micros % 1_000_000) as u32 * 1_000;
    DateTime::from_timestamp(secs, nanos)
}

/// The JSON mapping allows the proto field names (`by_team`) as well as their lowerCamelCase form
/// (`byTeam`). Rewrites every key, at any depth, to the latter.
pub fn camel_case_keys(object: Map<String, Value>) -> Map<String, Value> {
    object.into_iter()
        .map(|(key, value)| (lower_camel_case(key), camel_case_value(value)))
        .collect()
}

fn camel_case_value(value: Value) -> Value {
    match value {
        Value::Object(object) => Value::Object(camel_case_keys(object)),
        Value::Array(items) => Value::Array(items.into_iter().map(camel_case_value).collect()),
        other => other,
    }
}

fn lower_camel_case(key: String) -> String {
    if !key.contains('_') {
        return key;
    }
    let mut parts = key.split('_').filter(|part| !part.is_empty());
    let mut camel = parts.next().unwrap_or_default().to_string();
    for part in parts {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            camel.extend(first.to_uppercase());
            camel.push_str(chars.as_str());
        }
    }
    camel
}

/// Team colour. Anything the decoder doesn't recognize becomes `Unknown`, both for numbers and
/// names, since a wrong team is only ever displayed, never acted upon.
#[derive(Serialize_repr, IntoPrimitive, FromPrimitive, Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Team {
    #[default]
    Unknown = 0,
    Yellow = 1,
    Blue = 2,
}

impl Team {
    pub fn from_name(name: &str) -> Self {
        match name {
            "YELLOW" => Team::Yellow,
            "BLUE" => Team::Blue,
            _ => Team::Unknown,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Team::Unknown => "UNKNOWN",
            Team::Yellow => "YELLOW",
            Team::Blue => "BLUE",
        }
    }
}

impl<'de> Deserialize<'de> for Team {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match ProtoEnumValue::deserialize(deserializer)? {
            ProtoEnumValue::Number(number) => Team::from_primitive(number),
            ProtoEnumValue::Name(name) => Team::from_name(&name),
        })
    }
}

/// A point on the field, in metres
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}
