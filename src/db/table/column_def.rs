use crate::core::types::DType;

/// Definition of a single column in a table schema.
///
/// Specifies the column name, storage type, and whether NULL values are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnDef {
    /// The column name.
    pub name: String,

    /// The storage type for values in this column.
    pub dtype: DType,

    /// Whether this column can contain NULL values.
    pub nullable: bool,
}

impl ColumnDef {
    /// Creates a new column definition.
    pub fn new(name: &str, dtype: DType, nullable: bool) -> Self {
        Self {
            name: name.to_owned(),
            dtype,
            nullable,
        }
    }
}

impl std::fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.dtype)?;
        if !self.nullable {
            write!(f, " not null")?;
        }
        Ok(())
    }
}
