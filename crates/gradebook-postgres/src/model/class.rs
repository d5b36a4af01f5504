//! Class model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::classes;

/// A school class that users can be enrolled in.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = classes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Class {
    /// Unique class identifier.
    pub id: i32,
    /// Class name.
    pub name: String,
    /// Timestamp when the class was created.
    pub created_at: Timestamp,
    /// Timestamp when the class was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new class.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = classes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewClass {
    /// Class name.
    pub name: String,
}

/// Data for updating a class. Only `Some(..)` fields are written.
#[derive(Debug, Default, Clone, AsChangeset)]
#[diesel(table_name = classes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateClass {
    /// Class name.
    pub name: Option<String>,
}
