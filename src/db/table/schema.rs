use super::column_def::ColumnDef;
use crate::{
    common::error::{Result, TableError},
    core::types::DType,
};

/// A table schema defining the shape of a table.
///
/// A schema is an ordered list of column definitions and is immutable once
/// built. Names are not required to be unique; lookups by name resolve to the
/// first matching entry.
///
/// # Example
///
/// ```
/// use perspective_table::{DType, Schema};
///
/// let schema = Schema::new(["id", "name"], [DType::Int64, DType::Str]).unwrap();
/// assert_eq!(schema.len(), 2);
/// assert_eq!(schema.get_dtype("name"), Some(DType::Str));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Schema {
    columns: Vec<ColumnDef>,
}

impl Schema {
    /// Builds a schema from parallel sequences of names and types.
    ///
    /// Every entry is nullable. Fails with [`TableError::SchemaArity`] when
    /// the sequences differ in length.
    pub fn new<N, S, T>(names: N, types: T) -> Result<Self>
    where
        N: IntoIterator<Item = S>,
        S: Into<String>,
        T: IntoIterator<Item = DType>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let types: Vec<DType> = types.into_iter().collect();

        if names.len() != types.len() {
            return Err(TableError::SchemaArity {
                names: names.len(),
                types: types.len(),
            });
        }

        let columns = names
            .into_iter()
            .zip(types)
            .map(|(name, dtype)| ColumnDef {
                name,
                dtype,
                nullable: true,
            })
            .collect();

        Ok(Self { columns })
    }

    /// Creates a new schema from a vector of column definitions.
    pub fn from_columns(columns: Vec<ColumnDef>) -> Self {
        Self { columns }
    }

    /// Returns a new schema with `column` appended. `self` is left unchanged.
    pub fn with_column(&self, column: ColumnDef) -> Self {
        let mut columns = self.columns.clone();
        columns.push(column);
        Self { columns }
    }

    /// The ordered list of column definitions.
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|col| col.name.as_str()).collect()
    }

    pub fn types(&self) -> Vec<DType> {
        self.columns.iter().map(|col| col.dtype).collect()
    }

    /// Finds the index of a column by name.
    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.name == name)
    }

    pub fn get_dtype(&self, name: &str) -> Option<DType> {
        self.get_column_index(name).map(|idx| self.columns[idx].dtype)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.get_column_index(name).is_some()
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for column in &self.columns {
            writeln!(f, "{column}")?;
        }
        Ok(())
    }
}
