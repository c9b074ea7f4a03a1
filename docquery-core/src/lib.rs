// docquery-core/src/lib.rs
// Dot-path filtering and transactional updates over in-memory JSON documents

pub mod error;
pub mod document;
pub mod path;
pub mod filter;
pub mod update;
pub mod options;
pub mod query;

// Public exports
pub use error::{DocQueryError, Result};
pub use path::{get, rename, set, unset, FieldPath, MAX_ARRAY_PAD};
pub use filter::{Expected, Filter, FilterOutcome};
pub use update::{UpdateOperator, UpdateSpec, RESERVED_OPERATORS};
pub use options::{FilterOptions, MatchMode, QueryOptions, ReservedOperatorPolicy, UpdateOptions};
pub use query::{query, Query, QueryResult};
