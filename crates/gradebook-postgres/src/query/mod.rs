//! Database query repositories for all entities in the system.
//!
//! This module contains repository implementations that provide high-level
//! database operations for all entities, encapsulating common patterns and
//! providing type-safe interfaces.
//!
//! Update and delete operations return the affected row count rather than
//! the row itself, so callers can observe zero-affected outcomes.

pub mod class;
pub mod grade;
pub mod user;

pub use class::ClassRepository;
pub use grade::GradeRepository;
pub use user::UserRepository;
