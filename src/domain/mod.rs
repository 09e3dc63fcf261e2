//! Domain layer: option parsing, settings and merge semantics
//!
//! This layer is independent of external concerns (no I/O, no terminal, no file loading).

pub mod error;
pub mod merge;
pub mod option;
pub mod parser;
pub mod schema;
pub mod setting;

pub use error::{DomainError, DomainResult};
pub use merge::{merge, merge_all};
pub use option::{Arity, OptionScalar, OptionSpec, OptionTable, OptionValue, ParsedOptions};
pub use parser::{parse_arguments, parse_options};
pub use schema::{validate, Rule};
pub use setting::{build_settings, typecast, RuntimeSetting};
