//! Grade model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::grades;

/// A grade awarded to a user for a named piece of work.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = grades)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Grade {
    /// Unique grade identifier.
    pub id: i32,
    /// What the grade was awarded for.
    pub name: String,
    /// Numeric grade value.
    pub value: f64,
    /// User the grade belongs to.
    pub user_id: i32,
    /// Timestamp when the grade was created.
    pub created_at: Timestamp,
    /// Timestamp when the grade was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new grade.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = grades)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewGrade {
    /// What the grade is awarded for.
    pub name: String,
    /// Numeric grade value.
    pub value: f64,
    /// User the grade belongs to.
    pub user_id: i32,
}

/// Data for updating a grade. Only `Some(..)` fields are written.
#[derive(Debug, Default, Clone, AsChangeset)]
#[diesel(table_name = grades)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateGrade {
    /// What the grade is awarded for.
    pub name: Option<String>,
    /// Numeric grade value.
    pub value: Option<f64>,
    /// User the grade belongs to.
    pub user_id: Option<i32>,
}
