use std::{fmt::Write as _, sync::Arc};

use super::{column_def::ColumnDef, options::TableOptions, row::Row, schema::Schema};
use crate::{
    common::error::{Result, TableError},
    core::types::DType,
    db::column::{Column, ColumnMut},
};

/// A columnar table conforming to a [`Schema`].
///
/// Creating a table only records the schema; column storage is allocated by
/// [`Table::init`], which must run before any column is read or written.
/// Until then every column operation fails with
/// [`TableError::UninitializedTable`].
///
/// After initialization the table holds exactly one column per schema entry,
/// in schema order, and all columns have the same length.
///
/// # Example
///
/// ```
/// use perspective_table::{DType, Schema, Table};
///
/// let schema = Schema::new(["id", "name"], [DType::Int64, DType::Str]).unwrap();
/// let mut table = Table::new(schema);
/// table.init();
///
/// assert_eq!(table.columns().unwrap().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    schema: Arc<Schema>,
    options: TableOptions,
    columns: Option<Vec<Column>>,
    num_rows: usize,
}

impl Table {
    /// Creates an uninitialized table over `schema` with default options.
    pub fn new(schema: impl Into<Arc<Schema>>) -> Self {
        Self::with_options(schema, TableOptions::default())
    }

    /// Creates an uninitialized table over `schema`.
    pub fn with_options(schema: impl Into<Arc<Schema>>, options: TableOptions) -> Self {
        Self {
            schema: schema.into(),
            options,
            columns: None,
            num_rows: 0,
        }
    }

    /// Allocates one empty column per schema entry.
    ///
    /// Calling `init` again re-allocates every column: existing contents are
    /// discarded and the row count resets to zero.
    pub fn init(&mut self) {
        if self.columns.is_some() && self.num_rows > 0 {
            tracing::warn!(
                table = %self.options.name,
                rows = self.num_rows,
                "re-initializing table discards existing rows"
            );
        }

        let capacity = self.options.capacity;
        let columns = self
            .schema
            .columns()
            .iter()
            .map(|def| Column::with_capacity(&def.name, def.dtype, def.nullable, capacity))
            .collect();

        self.columns = Some(columns);
        self.num_rows = 0;

        tracing::debug!(
            table = %self.options.name,
            columns = self.schema.len(),
            capacity,
            "table initialized"
        );
    }

    pub fn is_initialized(&self) -> bool {
        self.columns.is_some()
    }

    pub fn name(&self) -> &str {
        &self.options.name
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    /// The schema this table currently conforms to.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn num_columns(&self) -> usize {
        self.schema.len()
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    fn uninitialized(&self) -> TableError {
        TableError::UninitializedTable {
            table: self.options.name.clone(),
        }
    }

    fn initialized(&self) -> Result<&Vec<Column>> {
        self.columns.as_ref().ok_or_else(|| self.uninitialized())
    }

    fn initialized_mut(&mut self) -> Result<&mut Vec<Column>> {
        let table = &self.options.name;
        self.columns
            .as_mut()
            .ok_or_else(|| TableError::UninitializedTable {
                table: table.clone(),
            })
    }

    /// All columns, in schema order.
    pub fn columns(&self) -> Result<&[Column]> {
        self.initialized().map(Vec::as_slice)
    }

    /// Looks a column up by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        let columns = self.initialized()?;
        let idx = self
            .schema
            .get_column_index(name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_owned()))?;
        Ok(&columns[idx])
    }

    /// Looks a column up by name for in-place updates.
    ///
    /// The handle can overwrite slots but not change the column's length.
    pub fn column_mut(&mut self, name: &str) -> Result<ColumnMut<'_>> {
        let idx = self.schema.get_column_index(name);
        let columns = self.initialized_mut()?;
        let idx = idx.ok_or_else(|| TableError::ColumnNotFound(name.to_owned()))?;
        Ok(ColumnMut::new(&mut columns[idx]))
    }

    /// Looks a column up by position.
    pub fn column_at(&self, idx: usize) -> Result<&Column> {
        let columns = self.initialized()?;
        let len = columns.len();
        columns
            .get(idx)
            .ok_or(TableError::ColumnIndexOutOfBounds { index: idx, len })
    }

    pub fn column_at_mut(&mut self, idx: usize) -> Result<ColumnMut<'_>> {
        let columns = self.initialized_mut()?;
        let len = columns.len();
        columns
            .get_mut(idx)
            .map(ColumnMut::new)
            .ok_or(TableError::ColumnIndexOutOfBounds { index: idx, len })
    }

    /// Appends a new empty column to an initialized table.
    ///
    /// Fails with [`TableError::DuplicateColumn`] if a column called `name`
    /// already exists; existing columns are never replaced. The table moves to
    /// a new schema extended with the column, so any previously shared
    /// [`Schema`] handle is left as it was. The new column is padded to the
    /// current row count.
    pub fn make_column(
        &mut self,
        name: &str,
        dtype: DType,
        nullable: bool,
    ) -> Result<ColumnMut<'_>> {
        if self.columns.is_none() {
            return Err(self.uninitialized());
        }
        if self.schema.has_column(name) {
            return Err(TableError::DuplicateColumn {
                name: name.to_owned(),
            });
        }

        let mut column = Column::with_capacity(name, dtype, nullable, self.options.capacity);
        column.extend(self.num_rows);

        self.schema = Arc::new(self.schema.with_column(ColumnDef::new(name, dtype, nullable)));

        tracing::debug!(
            table = %self.options.name,
            column = name,
            %dtype,
            nullable,
            "column added"
        );

        let columns = self.initialized_mut()?;
        let idx = columns.len();
        columns.push(column);
        Ok(ColumnMut::new(&mut columns[idx]))
    }

    /// Appends one row.
    ///
    /// Every value is checked against its column before anything is written,
    /// so a failing row leaves the table unchanged.
    pub fn insert_row(&mut self, row: Row) -> Result<()> {
        let columns = self.initialized_mut()?;
        if row.len() != columns.len() {
            return Err(TableError::RowArity {
                expected: columns.len(),
                found: row.len(),
            });
        }

        let prepared = columns
            .iter()
            .zip(row.values)
            .map(|(column, value)| column.check(value))
            .collect::<Result<Vec<_>>>()?;

        for (column, value) in columns.iter_mut().zip(prepared) {
            column.push_prepared(value);
        }
        self.num_rows += 1;

        tracing::trace!(table = %self.options.name, rows = self.num_rows, "row inserted");
        Ok(())
    }

    /// Reads row `idx` across all columns.
    pub fn row(&self, idx: usize) -> Result<Row> {
        let columns = self.initialized()?;
        if idx >= self.num_rows {
            return Err(TableError::RowOutOfBounds {
                index: idx,
                len: self.num_rows,
            });
        }

        let values = columns
            .iter()
            .map(|column| column.get(idx))
            .collect::<Result<Vec<_>>>()?;
        Ok(Row::new(values))
    }

    /// Appends `count` unwritten rows to every column.
    pub fn extend(&mut self, count: usize) -> Result<()> {
        let columns = self.initialized_mut()?;
        for column in columns.iter_mut() {
            column.extend(count);
        }
        self.num_rows += count;
        Ok(())
    }

    /// Removes every row, keeping the columns.
    pub fn clear(&mut self) -> Result<()> {
        let columns = self.initialized_mut()?;
        for column in columns.iter_mut() {
            column.clear();
        }
        self.num_rows = 0;
        Ok(())
    }

    /// Renders the table for diagnostics: a header of column names followed
    /// by one line per row.
    pub fn pprint(&self) -> Result<String> {
        let columns = self.initialized()?;

        let mut out = format!("{: <8}", self.options.name);
        for column in columns {
            push_cell(&mut out, column.name());
        }
        out.push('\n');

        for idx in 0..self.num_rows {
            out.push_str(&format!("{idx: <8}"));
            for column in columns {
                push_cell(&mut out, &column.get(idx)?.to_string());
            }
            out.push('\n');
        }

        Ok(out)
    }
}

fn push_cell(out: &mut String, cell: &str) {
    // Writing into a String cannot fail.
    let _ = write!(out, " | {cell: <8}");
}


#[cfg(test)]
mod property_tests {
    use quickcheck::{Arbitrary, Gen, quickcheck};
    use strum::IntoEnumIterator;

    use super::*;

    #[derive(Clone, Debug)]
    struct ArbitrarySchema(Schema);

    impl Arbitrary for ArbitrarySchema {
        fn arbitrary(g: &mut Gen) -> Self {
            let all: Vec<DType> = DType::iter().collect();
            let len = usize::arbitrary(g) % 16;
            let columns = (0..len)
                .map(|idx| {
                    let dtype = *g.choose(&all).unwrap_or(&DType::Int64);
                    ColumnDef::new(&format!("c{idx}"), dtype, bool::arbitrary(g))
                })
                .collect();
            Self(Schema::from_columns(columns))
        }
    }

    quickcheck! {
        fn prop_init_matches_schema_length(schema: ArbitrarySchema) -> bool {
            let expected = schema.0.len();
            let mut table = Table::new(schema.0);
            table.init();

            table.columns().map(|columns| columns.len() == expected).unwrap_or(false)
        }

        fn prop_uninitialized_access_fails(schema: ArbitrarySchema, idx: usize) -> bool {
            let table = Table::new(schema.0);

            matches!(table.column_at(idx), Err(TableError::UninitializedTable { .. }))
                && matches!(table.row(idx), Err(TableError::UninitializedTable { .. }))
        }

        fn prop_extend_keeps_columns_aligned(schema: ArbitrarySchema, count: u8) -> bool {
            let mut table = Table::new(schema.0);
            table.init();
            if table.extend(count as usize).is_err() {
                return false;
            }

            table
                .columns()
                .map(|columns| columns.iter().all(|col| col.len() == count as usize))
                .unwrap_or(false)
        }
    }
}
