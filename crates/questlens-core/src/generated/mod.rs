//! Generated QuestDB word lists.
//!
//! DO NOT EDIT MANUALLY - generated by build.rs from specs/questdb/

pub mod data_types;
pub mod functions;

pub use data_types::*;
pub use functions::*;
