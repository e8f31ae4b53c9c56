use std::fmt::Write as _;

use crate::{
    common::error::{Result, TableError},
    core::types::{DType, Date, Value},
    db::null_bitmap::NullBitmap,
};

/// Typed backing storage of a column, one variant per [`DType`].
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// Placeholder storage; only the slot count is tracked.
    None(usize),
    Int64(Vec<i64>),
    Int32(Vec<i32>),
    Int16(Vec<i16>),
    Int8(Vec<i8>),
    UInt64(Vec<u64>),
    UInt32(Vec<u32>),
    UInt16(Vec<u16>),
    UInt8(Vec<u8>),
    Float64(Vec<f64>),
    Float32(Vec<f32>),
    Bool(Vec<bool>),
    Time(Vec<i64>),
    Date(Vec<Date>),
    Str(Vec<String>),
}

/// Applies the same expression to the vector behind every typed variant.
macro_rules! with_vec {
    ($data:expr, $vec:ident => $body:expr, none($count:ident) => $none:expr) => {
        match $data {
            ColumnData::None($count) => $none,
            ColumnData::Int64($vec) => $body,
            ColumnData::Int32($vec) => $body,
            ColumnData::Int16($vec) => $body,
            ColumnData::Int8($vec) => $body,
            ColumnData::UInt64($vec) => $body,
            ColumnData::UInt32($vec) => $body,
            ColumnData::UInt16($vec) => $body,
            ColumnData::UInt8($vec) => $body,
            ColumnData::Float64($vec) => $body,
            ColumnData::Float32($vec) => $body,
            ColumnData::Bool($vec) => $body,
            ColumnData::Time($vec) => $body,
            ColumnData::Date($vec) => $body,
            ColumnData::Str($vec) => $body,
        }
    };
}

impl ColumnData {
    /// Allocates empty storage for `dtype` with room for `capacity` slots.
    pub fn with_capacity(dtype: DType, capacity: usize) -> Self {
        match dtype {
            DType::None => ColumnData::None(0),
            DType::Int64 => ColumnData::Int64(Vec::with_capacity(capacity)),
            DType::Int32 => ColumnData::Int32(Vec::with_capacity(capacity)),
            DType::Int16 => ColumnData::Int16(Vec::with_capacity(capacity)),
            DType::Int8 => ColumnData::Int8(Vec::with_capacity(capacity)),
            DType::UInt64 => ColumnData::UInt64(Vec::with_capacity(capacity)),
            DType::UInt32 => ColumnData::UInt32(Vec::with_capacity(capacity)),
            DType::UInt16 => ColumnData::UInt16(Vec::with_capacity(capacity)),
            DType::UInt8 => ColumnData::UInt8(Vec::with_capacity(capacity)),
            DType::Float64 => ColumnData::Float64(Vec::with_capacity(capacity)),
            DType::Float32 => ColumnData::Float32(Vec::with_capacity(capacity)),
            DType::Bool => ColumnData::Bool(Vec::with_capacity(capacity)),
            DType::Time => ColumnData::Time(Vec::with_capacity(capacity)),
            DType::Date => ColumnData::Date(Vec::with_capacity(capacity)),
            DType::Str => ColumnData::Str(Vec::with_capacity(capacity)),
        }
    }

    pub fn dtype(&self) -> DType {
        match self {
            ColumnData::None(_) => DType::None,
            ColumnData::Int64(_) => DType::Int64,
            ColumnData::Int32(_) => DType::Int32,
            ColumnData::Int16(_) => DType::Int16,
            ColumnData::Int8(_) => DType::Int8,
            ColumnData::UInt64(_) => DType::UInt64,
            ColumnData::UInt32(_) => DType::UInt32,
            ColumnData::UInt16(_) => DType::UInt16,
            ColumnData::UInt8(_) => DType::UInt8,
            ColumnData::Float64(_) => DType::Float64,
            ColumnData::Float32(_) => DType::Float32,
            ColumnData::Bool(_) => DType::Bool,
            ColumnData::Time(_) => DType::Time,
            ColumnData::Date(_) => DType::Date,
            ColumnData::Str(_) => DType::Str,
        }
    }

    pub fn len(&self) -> usize {
        with_vec!(self, v => v.len(), none(count) => *count)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grows or shrinks to `len` slots, filling new slots with the type's
    /// default.
    pub fn resize(&mut self, len: usize) {
        with_vec!(self, v => v.resize(len, Default::default()), none(count) => *count = len)
    }

    pub fn clear(&mut self) {
        with_vec!(self, v => v.clear(), none(count) => *count = 0)
    }

    /// Appends `value`, which must already be coerced to this storage's
    /// type. Returns false without modifying anything on a mismatch.
    fn push_raw(&mut self, value: Value) -> bool {
        match (self, value) {
            (ColumnData::None(count), Value::Null) => *count += 1,
            (ColumnData::Int64(v), Value::Int64(x)) => v.push(x),
            (ColumnData::Int32(v), Value::Int32(x)) => v.push(x),
            (ColumnData::Int16(v), Value::Int16(x)) => v.push(x),
            (ColumnData::Int8(v), Value::Int8(x)) => v.push(x),
            (ColumnData::UInt64(v), Value::UInt64(x)) => v.push(x),
            (ColumnData::UInt32(v), Value::UInt32(x)) => v.push(x),
            (ColumnData::UInt16(v), Value::UInt16(x)) => v.push(x),
            (ColumnData::UInt8(v), Value::UInt8(x)) => v.push(x),
            (ColumnData::Float64(v), Value::Float64(x)) => v.push(x),
            (ColumnData::Float32(v), Value::Float32(x)) => v.push(x),
            (ColumnData::Bool(v), Value::Bool(x)) => v.push(x),
            (ColumnData::Time(v), Value::Time(x)) => v.push(x),
            (ColumnData::Date(v), Value::Date(x)) => v.push(x),
            (ColumnData::Str(v), Value::Str(x)) => v.push(x),
            _ => return false,
        }
        true
    }

    /// Overwrites slot `index` with an already coerced `value`.
    fn set_raw(&mut self, index: usize, value: Value) -> bool {
        match (self, value) {
            (ColumnData::None(_), Value::Null) => {}
            (ColumnData::Int64(v), Value::Int64(x)) => v[index] = x,
            (ColumnData::Int32(v), Value::Int32(x)) => v[index] = x,
            (ColumnData::Int16(v), Value::Int16(x)) => v[index] = x,
            (ColumnData::Int8(v), Value::Int8(x)) => v[index] = x,
            (ColumnData::UInt64(v), Value::UInt64(x)) => v[index] = x,
            (ColumnData::UInt32(v), Value::UInt32(x)) => v[index] = x,
            (ColumnData::UInt16(v), Value::UInt16(x)) => v[index] = x,
            (ColumnData::UInt8(v), Value::UInt8(x)) => v[index] = x,
            (ColumnData::Float64(v), Value::Float64(x)) => v[index] = x,
            (ColumnData::Float32(v), Value::Float32(x)) => v[index] = x,
            (ColumnData::Bool(v), Value::Bool(x)) => v[index] = x,
            (ColumnData::Time(v), Value::Time(x)) => v[index] = x,
            (ColumnData::Date(v), Value::Date(x)) => v[index] = x,
            (ColumnData::Str(v), Value::Str(x)) => v[index] = x,
            _ => return false,
        }
        true
    }

    /// Reads slot `index` regardless of validity.
    fn get_raw(&self, index: usize) -> Option<Value> {
        let value = match self {
            ColumnData::None(count) => return (index < *count).then_some(Value::Null),
            ColumnData::Int64(v) => Value::Int64(*v.get(index)?),
            ColumnData::Int32(v) => Value::Int32(*v.get(index)?),
            ColumnData::Int16(v) => Value::Int16(*v.get(index)?),
            ColumnData::Int8(v) => Value::Int8(*v.get(index)?),
            ColumnData::UInt64(v) => Value::UInt64(*v.get(index)?),
            ColumnData::UInt32(v) => Value::UInt32(*v.get(index)?),
            ColumnData::UInt16(v) => Value::UInt16(*v.get(index)?),
            ColumnData::UInt8(v) => Value::UInt8(*v.get(index)?),
            ColumnData::Float64(v) => Value::Float64(*v.get(index)?),
            ColumnData::Float32(v) => Value::Float32(*v.get(index)?),
            ColumnData::Bool(v) => Value::Bool(*v.get(index)?),
            ColumnData::Time(v) => Value::Time(*v.get(index)?),
            ColumnData::Date(v) => Value::Date(*v.get(index)?),
            ColumnData::Str(v) => Value::Str(v.get(index)?.clone()),
        };
        Some(value)
    }
}

/// A named, homogeneously typed sequence of values.
///
/// Every slot has a validity flag. Nullable columns track it in a
/// [`NullBitmap`]; non-nullable columns are valid everywhere and store the
/// type's default in slots that were never written. Columns are normally
/// created by [`Table::init`](crate::Table::init) or
/// [`Table::make_column`](crate::Table::make_column) and owned by that table.
///
/// # Example
///
/// ```
/// use perspective_table::{Column, DType, Value};
///
/// let mut column = Column::new("price", DType::Float64, true);
/// column.push(Value::Float64(9.5)).unwrap();
/// column.push(Value::Null).unwrap();
///
/// assert_eq!(column.len(), 2);
/// assert_eq!(column.null_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    nullable: bool,
    data: ColumnData,
    nulls: NullBitmap,
}

impl Default for Column {
    /// An unnamed, nullable placeholder column of [`DType::None`].
    fn default() -> Self {
        Self::new("", DType::None, true)
    }
}

impl Column {
    /// Creates an empty column.
    pub fn new(name: &str, dtype: DType, nullable: bool) -> Self {
        Self::with_capacity(name, dtype, nullable, 0)
    }

    /// Creates an empty column with room for `capacity` slots.
    pub fn with_capacity(name: &str, dtype: DType, nullable: bool, capacity: usize) -> Self {
        let nulls = if nullable {
            NullBitmap::with_capacity(capacity)
        } else {
            NullBitmap::new()
        };

        Self {
            name: name.to_owned(),
            nullable,
            data: ColumnData::with_capacity(dtype, capacity),
            nulls,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// The typed storage behind this column.
    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn null_count(&self) -> usize {
        match self.dtype() {
            DType::None => self.len(),
            _ if self.nullable => self.nulls.count_nulls(),
            _ => 0,
        }
    }

    /// Returns false for null slots and for indices past the end.
    pub fn is_valid(&self, index: usize) -> bool {
        index < self.len() && self.dtype() != DType::None && !self.nulls.is_null(index)
    }

    /// Coerces `value` into this column's storage type without modifying
    /// the column.
    pub(crate) fn check(&self, value: Value) -> Result<Value> {
        if value.is_null() {
            if !self.nullable {
                return Err(TableError::NullViolation {
                    column: self.name.clone(),
                });
            }
            return Ok(Value::Null);
        }

        value
            .coerce_to(self.dtype())
            .filter(|coerced| !coerced.is_null())
            .ok_or_else(|| TableError::TypeMismatch {
                column: self.name.clone(),
                expected: self.dtype(),
                found: format!("{value:?}"),
            })
    }

    /// Appends a value.
    ///
    /// Fails with [`TableError::NullViolation`] for `Null` in a non-nullable
    /// column, and with [`TableError::TypeMismatch`] if the value cannot be
    /// represented in this column's type.
    pub fn push(&mut self, value: Value) -> Result<()> {
        let value = self.check(value)?;
        self.push_prepared(value);
        Ok(())
    }

    /// Appends a value returned by [`Column::check`].
    pub(crate) fn push_prepared(&mut self, value: Value) {
        let is_null = value.is_null();
        if is_null && self.dtype() != DType::None {
            self.data.resize(self.data.len() + 1);
        } else {
            let pushed = self.data.push_raw(value);
            debug_assert!(pushed, "prepared value must match column storage");
        }
        if self.nullable {
            self.nulls.push(is_null);
        }
    }

    /// Reads slot `index`, returning `Value::Null` for null slots.
    pub fn get(&self, index: usize) -> Result<Value> {
        if index >= self.len() {
            return Err(TableError::RowOutOfBounds {
                index,
                len: self.len(),
            });
        }
        if self.nulls.is_null(index) {
            return Ok(Value::Null);
        }

        self.data
            .get_raw(index)
            .ok_or(TableError::RowOutOfBounds {
                index,
                len: self.len(),
            })
    }

    /// Overwrites slot `index`.
    pub fn set(&mut self, index: usize, value: Value) -> Result<()> {
        if index >= self.len() {
            return Err(TableError::RowOutOfBounds {
                index,
                len: self.len(),
            });
        }

        let value = self.check(value)?;
        if value.is_null() {
            self.nulls.set_null(index);
            return Ok(());
        }

        let written = self.data.set_raw(index, value);
        debug_assert!(written, "prepared value must match column storage");
        if self.nullable {
            self.nulls.set_valid(index);
        }
        Ok(())
    }

    /// Marks slot `index` as null.
    pub fn set_null(&mut self, index: usize) -> Result<()> {
        self.set(index, Value::Null)
    }

    /// Appends `count` unwritten slots: null in nullable columns, the type's
    /// default otherwise.
    pub fn extend(&mut self, count: usize) {
        let len = self.len() + count;
        self.data.resize(len);
        if self.nullable {
            self.nulls.resize(len, true);
        }
    }

    /// Drops every slot.
    pub fn clear(&mut self) {
        self.data.clear();
        self.nulls.clear();
    }

    /// Iterates over the values in slot order.
    pub fn iter(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.len()).map(|index| self.get(index).unwrap_or(Value::Null))
    }

    /// Renders the column for diagnostics.
    ///
    /// The first line describes the column, then each slot is listed as
    /// `index: value`.
    pub fn pprint(&self) -> String {
        let name = if self.name.is_empty() {
            "<unnamed>"
        } else {
            self.name.as_str()
        };
        let nullability = if self.nullable { "nullable" } else { "not null" };

        let mut out = format!(
            "Column {name} ({}, {nullability}) len={}\n",
            self.dtype(),
            self.len()
        );
        for (index, value) in self.iter().enumerate() {
            // Writing into a String cannot fail.
            let _ = writeln!(out, "{index}: {value}");
        }
        out
    }
}

/// Write access to a column owned by a [`Table`](crate::Table).
///
/// Slots can be overwritten but never added or removed, so the column keeps
/// the table's row count. Read accessors are reached through `Deref`.
#[derive(Debug)]
pub struct ColumnMut<'a> {
    column: &'a mut Column,
}

impl<'a> ColumnMut<'a> {
    pub(crate) fn new(column: &'a mut Column) -> Self {
        Self { column }
    }

    /// Overwrites slot `index`.
    pub fn set(&mut self, index: usize, value: Value) -> Result<()> {
        self.column.set(index, value)
    }

    /// Marks slot `index` as null.
    pub fn set_null(&mut self, index: usize) -> Result<()> {
        self.column.set_null(index)
    }
}

impl std::ops::Deref for ColumnMut<'_> {
    type Target = Column;

    fn deref(&self) -> &Column {
        self.column
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_default_column_pprint() {
        let column = Column::default();
        assert_eq!(column.dtype(), DType::None);
        assert!(column.is_empty());
        assert_eq!(column.pprint(), "Column <unnamed> (none, nullable) len=0\n");
    }

    #[test]
    fn test_pprint_lists_slots() {
        let mut column = Column::new("Col1", DType::Int64, true);
        column.push(Value::Int64(1)).unwrap();
        column.push(Value::Null).unwrap();
        column.push(Value::Int64(3)).unwrap();

        assert_eq!(
            column.pprint(),
            "Column Col1 (int64, nullable) len=3\n0: 1\n1: NULL\n2: 3\n"
        );
    }

    #[test]
    fn test_every_dtype_allocates_matching_storage() {
        for dtype in DType::iter() {
            let column = Column::new("c", dtype, true);
            assert_eq!(column.dtype(), dtype);
            assert!(column.is_empty());
        }
    }

    #[test]
    fn test_push_and_get() {
        let mut column = Column::new("name", DType::Str, false);
        column.push(Value::from("Alice")).unwrap();
        column.push(Value::from("Bob")).unwrap();

        assert_eq!(column.get(0).unwrap(), Value::Str("Alice".to_string()));
        assert_eq!(column.get(1).unwrap(), Value::Str("Bob".to_string()));
        assert!(matches!(
            column.get(2),
            Err(TableError::RowOutOfBounds { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_push_null_into_non_nullable() {
        let mut column = Column::new("id", DType::Int64, false);
        let result = column.push(Value::Null);

        assert!(matches!(result, Err(TableError::NullViolation { column }) if column == "id"));
        assert!(column.is_empty());
    }

    #[test]
    fn test_push_type_mismatch() {
        let mut column = Column::new("id", DType::Int64, true);
        let result = column.push(Value::from("nope"));

        assert!(matches!(
            result,
            Err(TableError::TypeMismatch {
                expected: DType::Int64,
                ..
            })
        ));
        assert!(column.is_empty());
    }

    #[test]
    fn test_push_coerces_integers() {
        let mut column = Column::new("small", DType::Int8, false);
        column.push(Value::Int64(12)).unwrap();
        assert_eq!(column.get(0).unwrap(), Value::Int8(12));

        assert!(column.push(Value::Int64(1_000)).is_err());
        assert_eq!(column.len(), 1);

        let mut floats = Column::new("f", DType::Float64, false);
        floats.push(Value::Int64(2)).unwrap();
        assert_eq!(floats.get(0).unwrap(), Value::Float64(2.0));
        assert!(matches!(
            floats.push(Value::Int64((1 << 53) + 1)),
            Err(TableError::TypeMismatch { .. })
        ));

        let mut narrow = Column::new("g", DType::Float32, true);
        assert!(matches!(
            narrow.push(Value::Float64(1e300)),
            Err(TableError::TypeMismatch { .. })
        ));
        assert!(narrow.is_empty());
    }

    #[test]
    fn test_none_column_only_accepts_nulls() {
        let mut column = Column::default();
        column.push(Value::Null).unwrap();
        assert!(column.push(Value::Int64(1)).is_err());

        assert_eq!(column.len(), 1);
        assert_eq!(column.null_count(), 1);
        assert_eq!(column.get(0).unwrap(), Value::Null);
        assert!(!column.is_valid(0));
    }

    #[test]
    fn test_set_and_set_null() {
        let mut column = Column::new("flag", DType::Bool, true);
        column.extend(3);
        assert_eq!(column.null_count(), 3);

        column.set(1, Value::Bool(true)).unwrap();
        assert!(column.is_valid(1));
        assert_eq!(column.get(1).unwrap(), Value::Bool(true));

        column.set_null(1).unwrap();
        assert_eq!(column.get(1).unwrap(), Value::Null);
        assert!(matches!(
            column.set(5, Value::Bool(false)),
            Err(TableError::RowOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_extend_non_nullable_uses_defaults() {
        let mut column = Column::new("n", DType::UInt32, false);
        column.extend(2);

        assert_eq!(column.len(), 2);
        assert_eq!(column.null_count(), 0);
        assert_eq!(column.get(1).unwrap(), Value::UInt32(0));
        assert!(matches!(
            column.set_null(0),
            Err(TableError::NullViolation { .. })
        ));
    }

    #[test]
    fn test_clear() {
        let mut column = Column::new("d", DType::Date, true);
        column.push(Value::Date(Date::new(2020, 1, 31).unwrap())).unwrap();
        column.push(Value::Null).unwrap();
        column.clear();

        assert!(column.is_empty());
        assert_eq!(column.null_count(), 0);
        column.push(Value::Date(Date::default())).unwrap();
        assert!(column.is_valid(0));
    }

    #[test]
    fn test_iter_yields_nulls() {
        let mut column = Column::new("t", DType::Time, true);
        column.push(Value::Time(1_000)).unwrap();
        column.push(Value::Null).unwrap();

        let values: Vec<Value> = column.iter().collect();
        assert_eq!(values, vec![Value::Time(1_000), Value::Null]);
    }
}
