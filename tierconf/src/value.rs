//! Scalar value model: declared kinds, tagged values and string coercion.

use std::fmt;

use thiserror::Error;

/// Declared scalar kind of a leaf field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// UTF-8 string.
    String,
    /// Boolean.
    Bool,
    /// Signed 64-bit integer (covers all narrower signed field types).
    I64,
    /// Unsigned 64-bit integer (covers all narrower unsigned field types).
    U64,
    /// 64-bit float.
    F64,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::I64 => "i64",
            Self::U64 => "u64",
            Self::F64 => "f64",
        };
        f.write_str(name)
    }
}

/// A coerced scalar value, as produced by a source and written into a field.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// UTF-8 string.
    String(String),
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    I64(i64),
    /// Unsigned integer.
    U64(u64),
    /// Float.
    F64(f64),
}

impl ConfigValue {
    /// The kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Bool(_) => ValueKind::Bool,
            Self::I64(_) => ValueKind::I64,
            Self::U64(_) => ValueKind::U64,
            Self::F64(_) => ValueKind::F64,
        }
    }

    /// Parses a raw string into a value of the declared `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Parse`] when `raw` is not a valid rendering of
    /// `kind`.
    pub fn coerce(raw: &str, kind: ValueKind) -> Result<Self, ValueError> {
        let parse_failure = || ValueError::Parse {
            raw: raw.to_owned(),
            kind,
        };
        match kind {
            ValueKind::String => Ok(Self::String(raw.to_owned())),
            ValueKind::Bool => raw.parse().map(Self::Bool).map_err(|_| parse_failure()),
            ValueKind::I64 => raw.parse().map(Self::I64).map_err(|_| parse_failure()),
            ValueKind::U64 => raw.parse().map(Self::U64).map_err(|_| parse_failure()),
            ValueKind::F64 => raw.parse().map(Self::F64).map_err(|_| parse_failure()),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(v) => f.write_str(v),
            Self::Bool(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
        }
    }
}

/// Failures converting between raw strings, [`ConfigValue`]s and field types.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValueError {
    /// A raw string did not parse as the declared kind.
    #[error("cannot parse `{raw}` as {kind}")]
    Parse {
        /// The offending input.
        raw: String,
        /// The declared kind it was parsed against.
        kind: ValueKind,
    },

    /// A value's kind did not match the field's declared kind.
    #[error("expected a {expected} value, got {actual}")]
    KindMismatch {
        /// Kind declared by the field.
        expected: ValueKind,
        /// Kind carried by the value.
        actual: ValueKind,
    },

    /// An integer value did not fit the field's concrete type.
    #[error("value {value} does not fit in {target}")]
    OutOfRange {
        /// The resolved value.
        value: ConfigValue,
        /// The field's concrete Rust type.
        target: &'static str,
    },

    /// A descriptor was applied to an instance of a different type.
    #[error("descriptor does not belong to this instance type")]
    ForeignInstance,

    /// The field is a structure container and cannot be written directly.
    #[error("field `{path}` is not writable")]
    NotWritable {
        /// Path of the container field.
        path: String,
    },
}

/// Maps a concrete Rust field type onto the scalar value model.
///
/// Implemented for `String`, `bool`, the fixed-width integers and `f64`.
/// Narrow integers declare the widest kind of their family and narrow back
/// with a range check on write.
pub trait FieldValue: Sized {
    /// Declared kind for fields of this type.
    const KIND: ValueKind;

    /// Widens `self` into a [`ConfigValue`].
    fn into_value(self) -> ConfigValue;

    /// Converts a resolved value back into this type.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::KindMismatch`] for a value of the wrong kind and
    /// [`ValueError::OutOfRange`] when a narrowing conversion overflows.
    fn from_value(value: ConfigValue) -> Result<Self, ValueError>;
}

impl FieldValue for String {
    const KIND: ValueKind = ValueKind::String;

    fn into_value(self) -> ConfigValue {
        ConfigValue::String(self)
    }

    fn from_value(value: ConfigValue) -> Result<Self, ValueError> {
        match value {
            ConfigValue::String(v) => Ok(v),
            other => Err(ValueError::KindMismatch {
                expected: ValueKind::String,
                actual: other.kind(),
            }),
        }
    }
}

impl FieldValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn into_value(self) -> ConfigValue {
        ConfigValue::Bool(self)
    }

    fn from_value(value: ConfigValue) -> Result<Self, ValueError> {
        match value {
            ConfigValue::Bool(v) => Ok(v),
            other => Err(ValueError::KindMismatch {
                expected: ValueKind::Bool,
                actual: other.kind(),
            }),
        }
    }
}

impl FieldValue for f64 {
    const KIND: ValueKind = ValueKind::F64;

    fn into_value(self) -> ConfigValue {
        ConfigValue::F64(self)
    }

    fn from_value(value: ConfigValue) -> Result<Self, ValueError> {
        match value {
            ConfigValue::F64(v) => Ok(v),
            other => Err(ValueError::KindMismatch {
                expected: ValueKind::F64,
                actual: other.kind(),
            }),
        }
    }
}

macro_rules! signed_field_value {
    ($($ty:ty),+ $(,)?) => {
        $(impl FieldValue for $ty {
            const KIND: ValueKind = ValueKind::I64;

            fn into_value(self) -> ConfigValue {
                ConfigValue::I64(i64::from(self))
            }

            fn from_value(value: ConfigValue) -> Result<Self, ValueError> {
                match value {
                    ConfigValue::I64(v) => {
                        Self::try_from(v).map_err(|_| ValueError::OutOfRange {
                            value: ConfigValue::I64(v),
                            target: stringify!($ty),
                        })
                    }
                    other => Err(ValueError::KindMismatch {
                        expected: ValueKind::I64,
                        actual: other.kind(),
                    }),
                }
            }
        })+
    };
}

macro_rules! unsigned_field_value {
    ($($ty:ty),+ $(,)?) => {
        $(impl FieldValue for $ty {
            const KIND: ValueKind = ValueKind::U64;

            fn into_value(self) -> ConfigValue {
                ConfigValue::U64(u64::from(self))
            }

            fn from_value(value: ConfigValue) -> Result<Self, ValueError> {
                match value {
                    ConfigValue::U64(v) => {
                        Self::try_from(v).map_err(|_| ValueError::OutOfRange {
                            value: ConfigValue::U64(v),
                            target: stringify!($ty),
                        })
                    }
                    other => Err(ValueError::KindMismatch {
                        expected: ValueKind::U64,
                        actual: other.kind(),
                    }),
                }
            }
        })+
    };
}

signed_field_value!(i8, i16, i32, i64);
unsigned_field_value!(u8, u16, u32, u64);
