//! Domain Layer - Request encoding and response contracts
//!
//! Pure, synchronous logic with no I/O:
//! - `query`: query string encoding
//! - `schema`: declarative contract language and strict validator
//! - `contracts`: per-endpoint contracts and the typed records they produce
//! - `datetime`: timestamp coercion for datetime contract fields

pub mod query;
pub mod schema;
pub mod contracts;
pub mod datetime;

pub use query::{QueryParams, QueryValue};
pub use schema::{Field, IssueKind, Presence, Schema, ValidationError, ValidationIssue};
pub use contracts::{Contract, Envelope, HistoryPrice, HistoryPriceItem, PriceData, TokenList, TokenListItem};
