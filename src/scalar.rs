//! Scalar Type Registry
//!
//! Closed set of fixed-width value kinds an element may hold. Each kind has
//! a one-byte wire tag and a fixed encoded width; the mapping is bijective
//! over registered tags.
//!
//! | Kind   | Tag  | Width |
//! |--------|------|-------|
//! | `I32`  | 0x01 | 4     |
//! | `F32`  | 0x02 | 4     |
//! | `I64`  | 0x03 | 8     |
//! | `F64`  | 0x04 | 8     |
//! | `U32`  | 0x05 | 4     |
//! | `U64`  | 0x06 | 8     |
//! | `Bool` | 0x07 | 1     |

use bytes::{Buf, BufMut};

use crate::error::{Result, StoreError};

/// Supported scalar kinds, discriminant is the wire tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ScalarKind {
    I32 = 0x01,
    F32 = 0x02,
    I64 = 0x03,
    F64 = 0x04,
    U32 = 0x05,
    U64 = 0x06,
    Bool = 0x07,
}

impl ScalarKind {
    /// Every registered kind, in tag order
    pub const ALL: [ScalarKind; 7] = [
        ScalarKind::I32,
        ScalarKind::F32,
        ScalarKind::I64,
        ScalarKind::F64,
        ScalarKind::U32,
        ScalarKind::U64,
        ScalarKind::Bool,
    ];

    /// Wire tag of this kind
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Encoded width of a value of this kind, in bytes
    pub const fn width(self) -> usize {
        match self {
            ScalarKind::I32 | ScalarKind::F32 | ScalarKind::U32 => 4,
            ScalarKind::I64 | ScalarKind::F64 | ScalarKind::U64 => 8,
            ScalarKind::Bool => 1,
        }
    }

    /// Resolve a wire tag. `None` if the tag is not registered.
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x01 => Some(ScalarKind::I32),
            0x02 => Some(ScalarKind::F32),
            0x03 => Some(ScalarKind::I64),
            0x04 => Some(ScalarKind::F64),
            0x05 => Some(ScalarKind::U32),
            0x06 => Some(ScalarKind::U64),
            0x07 => Some(ScalarKind::Bool),
            _ => None,
        }
    }

    /// Zero value returned for absent fields
    pub fn default_value(self) -> Value {
        match self {
            ScalarKind::I32 => Value::I32(0),
            ScalarKind::F32 => Value::F32(0.0),
            ScalarKind::I64 => Value::I64(0),
            ScalarKind::F64 => Value::F64(0.0),
            ScalarKind::U32 => Value::U32(0),
            ScalarKind::U64 => Value::U64(0),
            ScalarKind::Bool => Value::Bool(false),
        }
    }
}

/// Encoded width for a tag read out of the buffer.
///
/// `offset` is where the tag byte was found, for error reporting.
pub fn width_of(tag: u8, offset: usize) -> Result<usize> {
    ScalarKind::from_tag(tag)
        .map(ScalarKind::width)
        .ok_or(StoreError::UnknownTypeTag { tag, offset })
}

/// A scalar value of any registered kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    I32(i32),
    F32(f32),
    I64(i64),
    F64(f64),
    U32(u32),
    U64(u64),
    Bool(bool),
}

impl Value {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Value::I32(_) => ScalarKind::I32,
            Value::F32(_) => ScalarKind::F32,
            Value::I64(_) => ScalarKind::I64,
            Value::F64(_) => ScalarKind::F64,
            Value::U32(_) => ScalarKind::U32,
            Value::U64(_) => ScalarKind::U64,
            Value::Bool(_) => ScalarKind::Bool,
        }
    }

    /// Encoded width, same as `self.kind().width()`
    pub fn width(&self) -> usize {
        self.kind().width()
    }

    /// Write the raw little-endian bytes of the value
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        match *self {
            Value::I32(v) => buf.put_i32_le(v),
            Value::F32(v) => buf.put_f32_le(v),
            Value::I64(v) => buf.put_i64_le(v),
            Value::F64(v) => buf.put_f64_le(v),
            Value::U32(v) => buf.put_u32_le(v),
            Value::U64(v) => buf.put_u64_le(v),
            Value::Bool(v) => buf.put_u8(v as u8),
        }
    }

    /// Decode a value of `kind` from the front of `bytes`.
    ///
    /// Caller guarantees `bytes.len() >= kind.width()`.
    pub fn decode(kind: ScalarKind, mut bytes: &[u8]) -> Value {
        match kind {
            ScalarKind::I32 => Value::I32(bytes.get_i32_le()),
            ScalarKind::F32 => Value::F32(bytes.get_f32_le()),
            ScalarKind::I64 => Value::I64(bytes.get_i64_le()),
            ScalarKind::F64 => Value::F64(bytes.get_f64_le()),
            ScalarKind::U32 => Value::U32(bytes.get_u32_le()),
            ScalarKind::U64 => Value::U64(bytes.get_u64_le()),
            ScalarKind::Bool => Value::Bool(bytes.get_u8() != 0),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Rust types that map onto a registered kind.
///
/// Sealed: the registry is closed, so an unregistered type is a compile
/// error rather than a runtime failure.
pub trait Scalar: sealed::Sealed + Copy + Default {
    const KIND: ScalarKind;

    fn into_value(self) -> Value;

    /// `None` if `value` is of a different kind
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Scalar for $ty {
                const KIND: ScalarKind = ScalarKind::$variant;

                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_scalar! {
    i32 => I32,
    f32 => F32,
    i64 => I64,
    f64 => F64,
    u32 => U32,
    u64 => U64,
    bool => Bool,
}

/// Wire tag for a Rust scalar type
pub const fn tag_of<T: Scalar>() -> u8 {
    T::KIND.tag()
}
