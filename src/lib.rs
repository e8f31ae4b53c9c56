//! A typed columnar data table with schema-driven column allocation.
//!
//! Host type descriptors are mapped to storage types by a [`TypeRegistry`],
//! assembled into an immutable [`Schema`], and materialized as one typed
//! [`Column`] per entry when a [`Table`] is initialized.
//!
//! ```
//! use perspective_table::{Schema, Table, TypeRegistry};
//!
//! let registry = TypeRegistry::new();
//! let types = registry.dtypes_for(["int", "str", "float"]).unwrap();
//! let schema = Schema::new(["id", "name", "price"], types).unwrap();
//!
//! let mut table = Table::new(schema);
//! table.init();
//! assert_eq!(table.columns().unwrap().len(), 3);
//! ```

pub(crate) mod common;
pub(crate) mod core;
pub(crate) mod db;

pub use common::error::{Result, TableError};
pub use crate::core::{
    host_type::{HostType, TypeRegistry},
    types::{DType, Date, Value},
};
pub use db::{
    column::{Column, ColumnData},
    null_bitmap::NullBitmap,
    table::*,
};
