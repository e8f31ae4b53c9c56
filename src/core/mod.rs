pub mod host_type;
pub mod types;
