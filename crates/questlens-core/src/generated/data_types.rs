//! QuestDB column data types.
//!
//! Generated from data_types.toml

/// A column type name accepted at data-type positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataTypeInfo {
    pub name: &'static str,
    pub description: Option<&'static str>,
}

/// Data types (22 total), in data file order.
pub static DATA_TYPES: &[DataTypeInfo] = &[
    DataTypeInfo {
        name: "array",
        description: Some("N-dimensional array, e.g. double[]"),
    },
    DataTypeInfo {
        name: "binary",
        description: Some("Variable-length bytes"),
    },
    DataTypeInfo {
        name: "boolean",
        description: Some("true or false"),
    },
    DataTypeInfo {
        name: "byte",
        description: Some("8-bit signed integer"),
    },
    DataTypeInfo {
        name: "char",
        description: Some("16-bit unicode character"),
    },
    DataTypeInfo {
        name: "date",
        description: Some("Milliseconds since epoch"),
    },
    DataTypeInfo {
        name: "decimal",
        description: Some("Fixed-point decimal"),
    },
    DataTypeInfo {
        name: "double",
        description: Some("64-bit floating point"),
    },
    DataTypeInfo {
        name: "float",
        description: Some("32-bit floating point"),
    },
    DataTypeInfo {
        name: "geohash",
        description: Some("Geohash with precision in parentheses"),
    },
    DataTypeInfo {
        name: "int",
        description: Some("32-bit signed integer"),
    },
    DataTypeInfo {
        name: "interval",
        description: Some("Pair of timestamps"),
    },
    DataTypeInfo {
        name: "ipv4",
        description: Some("IPv4 address"),
    },
    DataTypeInfo {
        name: "long",
        description: Some("64-bit signed integer"),
    },
    DataTypeInfo {
        name: "long256",
        description: Some("256-bit unsigned integer"),
    },
    DataTypeInfo {
        name: "short",
        description: Some("16-bit signed integer"),
    },
    DataTypeInfo {
        name: "string",
        description: Some("Variable-length UTF-16 text"),
    },
    DataTypeInfo {
        name: "symbol",
        description: Some("Interned string, indexed when requested"),
    },
    DataTypeInfo {
        name: "timestamp",
        description: Some("Microseconds since epoch"),
    },
    DataTypeInfo {
        name: "timestamp_ns",
        description: Some("Nanoseconds since epoch"),
    },
    DataTypeInfo {
        name: "uuid",
        description: Some("128-bit UUID"),
    },
    DataTypeInfo {
        name: "varchar",
        description: Some("Variable-length UTF-8 text"),
    },
];
