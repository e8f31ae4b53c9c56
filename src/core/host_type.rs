use std::{collections::HashMap, str::FromStr};

use strum::{AsRefStr, EnumIter, EnumString};

use crate::{
    common::error::{Result, TableError},
    core::types::DType,
};

/// Host-language type descriptors recognized by the type mapper.
///
/// Descriptors are the bare type names a binding hands over, e.g. the
/// `__name__` of a Python, NumPy or pandas type. Parsing is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, AsRefStr)]
pub enum HostType {
    /// Python `int`.
    #[strum(serialize = "int")]
    Int,
    #[strum(serialize = "int8")]
    Int8,
    #[strum(serialize = "int16")]
    Int16,
    #[strum(serialize = "int32")]
    Int32,
    #[strum(serialize = "int64")]
    Int64,

    /// Python `float`.
    #[strum(serialize = "float")]
    Float,
    #[strum(serialize = "float16")]
    Float16,
    #[strum(serialize = "float32")]
    Float32,
    #[strum(serialize = "float64")]
    Float64,
    #[strum(serialize = "float128")]
    Float128,

    /// Python `str`.
    #[strum(serialize = "str")]
    Str,

    /// Python `bool`.
    #[strum(serialize = "bool")]
    Bool,
    /// NumPy `bool_`.
    #[strum(serialize = "bool_")]
    NumpyBool,
    #[strum(serialize = "bool8")]
    Bool8,

    /// Python `datetime.datetime`.
    #[strum(serialize = "datetime")]
    Datetime,
    #[strum(serialize = "datetime64")]
    Datetime64,
    /// pandas `Timestamp`.
    #[strum(serialize = "Timestamp")]
    Timestamp,

    /// Python `datetime.date`.
    #[strum(serialize = "date")]
    Date,
}

/// The standard descriptor table.
///
/// Half and quad precision floats have no storage of their own and widen or
/// narrow to the nearest supported float.
const DEFAULT_MAPPINGS: &[(HostType, DType)] = &[
    (HostType::Int, DType::Int64),
    (HostType::Int8, DType::Int8),
    (HostType::Int16, DType::Int16),
    (HostType::Int32, DType::Int32),
    (HostType::Int64, DType::Int64),
    (HostType::Float, DType::Float64),
    (HostType::Float16, DType::Float32),
    (HostType::Float32, DType::Float32),
    (HostType::Float64, DType::Float64),
    (HostType::Float128, DType::Float64),
    (HostType::Str, DType::Str),
    (HostType::Bool, DType::Bool),
    (HostType::NumpyBool, DType::Bool),
    (HostType::Bool8, DType::Bool),
    (HostType::Datetime, DType::Time),
    (HostType::Datetime64, DType::Time),
    (HostType::Timestamp, DType::Time),
    (HostType::Date, DType::Date),
];

/// Maps host type descriptors to column storage types.
///
/// The registry is an explicit lookup table owned by the caller; there is no
/// process-wide instance. [`TypeRegistry::new`] loads the standard table,
/// [`TypeRegistry::empty`] starts from nothing.
///
/// # Example
///
/// ```
/// use perspective_table::{DType, TypeRegistry};
///
/// let registry = TypeRegistry::new();
/// assert_eq!(registry.type_to_dtype("int").unwrap(), DType::Int64);
/// assert!(registry.type_to_dtype("complex").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    mappings: HashMap<HostType, DType>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates a registry holding the standard descriptor table.
    pub fn new() -> Self {
        let mappings: HashMap<_, _> = DEFAULT_MAPPINGS.iter().copied().collect();
        tracing::debug!(mappings = mappings.len(), "type registry loaded");

        Self { mappings }
    }

    /// Creates a registry that recognizes no descriptors.
    pub fn empty() -> Self {
        Self {
            mappings: HashMap::new(),
        }
    }

    /// Maps `host` to `dtype`, returning the previous mapping if any.
    pub fn register(&mut self, host: HostType, dtype: DType) -> Option<DType> {
        self.mappings.insert(host, dtype)
    }

    /// Resolves a parsed descriptor.
    pub fn resolve(&self, host: HostType) -> Result<DType> {
        self.mappings
            .get(&host)
            .copied()
            .ok_or_else(|| TableError::UnsupportedType {
                descriptor: host.as_ref().to_owned(),
            })
    }

    /// Resolves a descriptor given by name, such as `"int"` or `"float64"`.
    pub fn type_to_dtype(&self, descriptor: &str) -> Result<DType> {
        let host = HostType::from_str(descriptor).map_err(|_| TableError::UnsupportedType {
            descriptor: descriptor.to_owned(),
        })?;

        self.resolve(host)
    }

    /// Resolves every descriptor in order, failing on the first unsupported
    /// one.
    pub fn dtypes_for<I, S>(&self, descriptors: I) -> Result<Vec<DType>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        descriptors
            .into_iter()
            .map(|descriptor| self.type_to_dtype(descriptor.as_ref()))
            .collect()
    }

    /// Returns true if `descriptor` resolves in this registry.
    pub fn supports(&self, descriptor: &str) -> bool {
        self.type_to_dtype(descriptor).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use strum::IntoEnumIterator;

    use super::*;

    #[rstest]
    #[case("int", DType::Int64)]
    #[case("int8", DType::Int8)]
    #[case("int16", DType::Int16)]
    #[case("int32", DType::Int32)]
    #[case("int64", DType::Int64)]
    #[case("float", DType::Float64)]
    #[case("float16", DType::Float32)]
    #[case("float32", DType::Float32)]
    #[case("float64", DType::Float64)]
    #[case("float128", DType::Float64)]
    #[case("str", DType::Str)]
    #[case("bool", DType::Bool)]
    #[case("bool_", DType::Bool)]
    #[case("bool8", DType::Bool)]
    #[case("datetime", DType::Time)]
    #[case("datetime64", DType::Time)]
    #[case("Timestamp", DType::Time)]
    #[case("date", DType::Date)]
    fn test_standard_mapping(#[case] descriptor: &str, #[case] expected: DType) {
        let registry = TypeRegistry::new();
        assert_eq!(registry.type_to_dtype(descriptor).unwrap(), expected);
    }

    #[rstest]
    #[case("complex")]
    #[case("object")]
    #[case("INT")]
    #[case("timestamp")]
    #[case("")]
    fn test_unsupported_descriptor(#[case] descriptor: &str) {
        let registry = TypeRegistry::new();
        assert_eq!(
            registry.type_to_dtype(descriptor),
            Err(TableError::UnsupportedType {
                descriptor: descriptor.to_owned()
            })
        );
    }

    #[test]
    fn test_every_host_type_has_a_default_mapping() {
        let registry = TypeRegistry::new();
        for host in HostType::iter() {
            assert!(registry.resolve(host).is_ok(), "{host:?} is unmapped");
        }
    }

    #[test]
    fn test_empty_registry_rejects_known_descriptor() {
        let registry = TypeRegistry::empty();
        assert!(matches!(
            registry.type_to_dtype("int"),
            Err(TableError::UnsupportedType { descriptor }) if descriptor == "int"
        ));
    }

    #[test]
    fn test_register_overrides_mapping() {
        let mut registry = TypeRegistry::new();
        let previous = registry.register(HostType::Int, DType::Int32);

        assert_eq!(previous, Some(DType::Int64));
        assert_eq!(registry.type_to_dtype("int").unwrap(), DType::Int32);
        assert_eq!(registry.type_to_dtype("int64").unwrap(), DType::Int64);
    }

    #[test]
    fn test_dtypes_for_reference_columns() {
        let registry = TypeRegistry::new();
        let dtypes = registry
            .dtypes_for(["int", "str", "float", "int64", "float64"])
            .unwrap();

        assert_eq!(
            dtypes,
            vec![
                DType::Int64,
                DType::Str,
                DType::Float64,
                DType::Int64,
                DType::Float64
            ]
        );
    }

    #[test]
    fn test_dtypes_for_stops_at_first_unsupported() {
        let registry = TypeRegistry::new();
        let result = registry.dtypes_for(["int", "decimal", "list"]);

        assert!(matches!(
            result,
            Err(TableError::UnsupportedType { descriptor }) if descriptor == "decimal"
        ));
    }
}
