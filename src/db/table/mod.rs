pub mod column_def;
pub mod data_table;
pub mod options;
pub mod row;
pub mod schema;

pub use column_def::ColumnDef;
pub use data_table::Table;
pub use options::TableOptions;
pub use row::Row;
pub use schema::Schema;
