//! # strata-core
//!
//! Structured-filename engine for cataloging scientifically-named files.
//! Defines the value model, codecs, testers, fields, naming conventions,
//! and record filters. The traversal engine in `strata-catalog` builds on
//! this crate.

pub mod codec;
pub mod convention;
pub mod errors;
pub mod field;
pub mod filter;
pub mod tester;
pub mod time;
pub mod trace;
pub mod value;

// Re-export the most commonly used types at the crate root.
pub use convention::{Convention, FieldValues};
pub use errors::{ConventionError, DecodeError, EncodeError, FilterError};
pub use field::Field;
pub use filter::{FieldRefs, RecordFilter};
pub use tester::Reference;
pub use time::Period;
pub use value::{Record, Value};

pub use rustc_hash::{FxHashMap, FxHashSet};
