use strum::{Display, EnumIter, FromRepr, IntoStaticStr};

use crate::common::error::{Result, TableError};

/// Logical storage types supported by a table column.
///
/// These types define the value domain a column holds, independent of the
/// host-language type that produced it. The discriminants are stable numeric
/// codes shared with other bindings of the engine.
///
/// # Example
///
/// ```
/// use perspective_table::DType;
///
/// assert_eq!(DType::Float64.code(), 9);
/// assert_eq!(DType::from_code(19), Some(DType::Str));
/// assert_eq!(DType::Int64.to_string(), "int64");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, FromRepr, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum DType {
    /// No value domain. Columns of this type only ever hold nulls.
    None = 0,

    /// 64-bit signed integer.
    Int64 = 1,

    /// 32-bit signed integer.
    Int32 = 2,

    /// 16-bit signed integer.
    Int16 = 3,

    /// 8-bit signed integer.
    Int8 = 4,

    /// 64-bit unsigned integer.
    UInt64 = 5,

    /// 32-bit unsigned integer.
    UInt32 = 6,

    /// 16-bit unsigned integer.
    UInt16 = 7,

    /// 8-bit unsigned integer.
    UInt8 = 8,

    /// 64-bit floating point number.
    Float64 = 9,

    /// 32-bit floating point number.
    Float32 = 10,

    /// Boolean true/false value.
    Bool = 11,

    /// Point in time, stored as milliseconds since the Unix epoch.
    Time = 12,

    /// Calendar date without a time component.
    Date = 13,

    /// Variable-length UTF-8 text.
    Str = 19,
}

impl DType {
    /// Returns the stable numeric code of this type.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Looks a type up by its numeric code.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::from_repr(code)
    }

    /// Width in bytes of one stored element, or `None` for variable-length
    /// and placeholder types.
    pub fn elem_size(self) -> Option<usize> {
        match self {
            DType::Int64 | DType::UInt64 | DType::Float64 | DType::Time => Some(8),
            DType::Int32 | DType::UInt32 | DType::Float32 | DType::Date => Some(4),
            DType::Int16 | DType::UInt16 => Some(2),
            DType::Int8 | DType::UInt8 | DType::Bool => Some(1),
            DType::Str | DType::None => None,
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            DType::Int64
                | DType::Int32
                | DType::Int16
                | DType::Int8
                | DType::UInt64
                | DType::UInt32
                | DType::UInt16
                | DType::UInt8
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, DType::Float64 | DType::Float32)
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    pub fn is_temporal(self) -> bool {
        matches!(self, DType::Time | DType::Date)
    }

    /// The value stored in a non-nullable slot that has not been written yet.
    pub fn default_value(self) -> Value {
        match self {
            DType::None => Value::Null,
            DType::Int64 => Value::Int64(0),
            DType::Int32 => Value::Int32(0),
            DType::Int16 => Value::Int16(0),
            DType::Int8 => Value::Int8(0),
            DType::UInt64 => Value::UInt64(0),
            DType::UInt32 => Value::UInt32(0),
            DType::UInt16 => Value::UInt16(0),
            DType::UInt8 => Value::UInt8(0),
            DType::Float64 => Value::Float64(0.0),
            DType::Float32 => Value::Float32(0.0),
            DType::Bool => Value::Bool(false),
            DType::Time => Value::Time(0),
            DType::Date => Value::Date(Date::default()),
            DType::Str => Value::Str(String::new()),
        }
    }
}

/// A calendar date.
///
/// Month and day are 1-based. Construction through [`Date::new`] rejects
/// dates that do not exist in the proleptic Gregorian calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Date {
    year: i32,
    month: u8,
    day: u8,
}

impl Date {
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self> {
        if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
            return Err(TableError::InvalidDate { year, month, day });
        }

        Ok(Self { year, month, day })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }
}

impl Default for Date {
    /// The Unix epoch, 1970-01-01.
    fn default() -> Self {
        Self {
            year: 1970,
            month: 1,
            day: 1,
        }
    }
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// A value that can be stored in a table column.
///
/// Values are strongly typed and correspond to [`DType`] definitions.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum Value {
    Int64(i64),
    Int32(i32),
    Int16(i16),
    Int8(i8),
    UInt64(u64),
    UInt32(u32),
    UInt16(u16),
    UInt8(u8),
    Float64(f64),
    Float32(f32),
    Bool(bool),

    /// Milliseconds since the Unix epoch.
    Time(i64),

    Date(Date),

    /// A UTF-8 text string.
    Str(String),

    /// Represents a NULL value (absence of data).
    ///
    /// Only allowed in nullable columns.
    Null,
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int64(i) => write!(f, "{i}"),
            Value::Int32(i) => write!(f, "{i}"),
            Value::Int16(i) => write!(f, "{i}"),
            Value::Int8(i) => write!(f, "{i}"),
            Value::UInt64(u) => write!(f, "{u}"),
            Value::UInt32(u) => write!(f, "{u}"),
            Value::UInt16(u) => write!(f, "{u}"),
            Value::UInt8(u) => write!(f, "{u}"),
            Value::Float64(fl) => write!(f, "{fl}"),
            Value::Float32(fl) => write!(f, "{fl}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Time(ms) => write!(f, "{ms}"),
            Value::Date(d) => write!(f, "{d}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Null => write!(f, "NULL"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float64(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Date> for Value {
    fn from(value: Date) -> Self {
        Value::Date(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl Value {
    /// The logical type of this value. `Null` reports [`DType::None`].
    pub fn dtype(&self) -> DType {
        match self {
            Value::Int64(_) => DType::Int64,
            Value::Int32(_) => DType::Int32,
            Value::Int16(_) => DType::Int16,
            Value::Int8(_) => DType::Int8,
            Value::UInt64(_) => DType::UInt64,
            Value::UInt32(_) => DType::UInt32,
            Value::UInt16(_) => DType::UInt16,
            Value::UInt8(_) => DType::UInt8,
            Value::Float64(_) => DType::Float64,
            Value::Float32(_) => DType::Float32,
            Value::Bool(_) => DType::Bool,
            Value::Time(_) => DType::Time,
            Value::Date(_) => DType::Date,
            Value::Str(_) => DType::Str,
            Value::Null => DType::None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    fn as_i128(&self) -> Option<i128> {
        match *self {
            Value::Int64(i) => Some(i.into()),
            Value::Int32(i) => Some(i.into()),
            Value::Int16(i) => Some(i.into()),
            Value::Int8(i) => Some(i.into()),
            Value::UInt64(u) => Some(u.into()),
            Value::UInt32(u) => Some(u.into()),
            Value::UInt16(u) => Some(u.into()),
            Value::UInt8(u) => Some(u.into()),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float64(f) => Some(f),
            Value::Float32(f) => Some(f.into()),
            _ => None,
        }
    }

    /// Converts this value into the representation stored by a column of
    /// `dtype`.
    ///
    /// Integers convert into any integer type they fit in, into a float type
    /// that represents them exactly, and into `Time` as epoch milliseconds.
    /// Floats convert between float widths as long as a finite value stays
    /// finite. `Null` is returned unchanged. Returns `None` when the
    /// value cannot be represented.
    pub fn coerce_to(&self, dtype: DType) -> Option<Value> {
        if self.is_null() {
            return Some(Value::Null);
        }
        if self.dtype() == dtype {
            return Some(self.clone());
        }

        if let Some(int) = self.as_i128() {
            return match dtype {
                DType::Int64 => i64::try_from(int).ok().map(Value::Int64),
                DType::Int32 => i32::try_from(int).ok().map(Value::Int32),
                DType::Int16 => i16::try_from(int).ok().map(Value::Int16),
                DType::Int8 => i8::try_from(int).ok().map(Value::Int8),
                DType::UInt64 => u64::try_from(int).ok().map(Value::UInt64),
                DType::UInt32 => u32::try_from(int).ok().map(Value::UInt32),
                DType::UInt16 => u16::try_from(int).ok().map(Value::UInt16),
                DType::UInt8 => u8::try_from(int).ok().map(Value::UInt8),
                DType::Float64 => {
                    let float = int as f64;
                    (float as i128 == int).then_some(Value::Float64(float))
                }
                DType::Float32 => {
                    let float = int as f32;
                    (float as i128 == int).then_some(Value::Float32(float))
                }
                DType::Time => i64::try_from(int).ok().map(Value::Time),
                _ => None,
            };
        }

        if let Some(float) = self.as_f64() {
            return match dtype {
                DType::Float64 => Some(Value::Float64(float)),
                DType::Float32 => {
                    let narrowed = float as f32;
                    // A finite value out of f32 range would become infinite.
                    (narrowed.is_finite() || !float.is_finite())
                        .then_some(Value::Float32(narrowed))
                }
                _ => None,
            };
        }

        None
    }

    /// Checks if this value can be stored in a column of the given type.
    pub fn is_compatible_with(&self, dtype: DType) -> bool {
        self.coerce_to(dtype).is_some()
    }
}
