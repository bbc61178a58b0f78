//! Personal goal planning over a four-level tree:
//! roles, long-term goals, short-term goals and tasks.
//!
//! [`store::Store`] owns the live tree; [`edit`] and [`query`] operate on it,
//! [`rules`] keeps children within their parents' importance and due date,
//! and [`migrate`] admits documents from storage, files and drives.

pub mod alloc;
pub mod bus;
pub mod config;
pub mod db;
pub mod drive;
pub mod edit;
pub mod entities;
pub mod error;
pub mod logging;
pub mod migrate;
pub mod model;
pub mod query;
pub mod rules;
pub mod schema;
pub mod storage;
pub mod store;
pub mod util;

pub use error::AppError;
pub use model::Tree;
pub use store::{LoadOutcome, MutateOptions, Persistence, Store};
