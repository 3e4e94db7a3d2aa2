//! Dynamic filter engine
//!
//! Turns free-form filter and sort expressions received as repeated query
//! parameters into typed, composable predicates.
//!
//! ```text
//! raw strings -> Tokenizer -> AtomList -> PredicateCompiler -> Predicate
//! ```
//!
//! Two dialects share the pipeline:
//!
//! - [`Dialect::Criteria`] accepts `: ! > < ~` and ANDs every comparison.
//! - [`Dialect::Specification`] also understands wildcard markers on `:`
//!   (`v*`, `*v`, `*v*`) and ORs comparisons on the same field before
//!   ANDing the per-field groups.
//!
//! # Example
//!
//! ```rust
//! use user_service::filter::{Dialect, PredicateCompiler, Tokenizer};
//! use user_service::models::UserField;
//!
//! let atoms = Tokenizer::new(Dialect::Specification)
//!     .tokenize(["firstName:Jo*", "firstName:Ann", "status:active"]);
//! let predicate = PredicateCompiler::<UserField>::new(Dialect::Specification)
//!     .compile(&atoms)
//!     .unwrap();
//! assert_eq!(predicate.conjuncts().len(), 2);
//! ```

pub mod atom;
pub mod compiler;
pub mod dialect;
pub mod error;
pub mod field;
pub mod operator;
pub mod predicate;
pub mod tokenizer;

pub use atom::{AtomList, FilterAtom, SortAtom, SortDirection};
pub use compiler::PredicateCompiler;
pub use dialect::{CombinationRule, Dialect, MalformedPolicy};
pub use error::{FilterError, FilterResult};
pub use field::{FieldKind, FieldValue, FilterField, FilterRecord};
pub use operator::{Operator, OperatorSpec, Semantics, CATALOG};
pub use predicate::{escape_like, like_matches, Comparison, Predicate};
#[cfg(feature = "database")]
pub use predicate::comparable_column;
pub use tokenizer::{parse_sort, tokenize_sort, tokenize_sort_with, Tokenizer};
