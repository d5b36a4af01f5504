//! User account model.
//!
//! ## Models
//!
//! - [`User`] - Main user model carrying credentials and the authorization role
//! - [`NewUser`] - Data structure for creating new users
//! - [`UpdateUser`] - Data structure for partial user updates

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::users;
use crate::types::UserRole;

/// A user account: a student or a teacher.
///
/// The `password_hash` field holds a PHC-format Argon2id digest; it is never
/// compared by equality, only through the hasher's verify operation.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    /// Unique user identifier.
    pub id: i32,
    /// Display/login name. Not unique: login scans all rows with a username.
    pub username: String,
    /// Email address, unique case-insensitively.
    pub email: String,
    /// Argon2id digest of the user's password.
    pub password_hash: String,
    /// Authorization role.
    pub role: UserRole,
    /// Class the user is enrolled in, if any.
    pub class_id: Option<i32>,
    /// Timestamp when the user was created.
    pub created_at: Timestamp,
    /// Timestamp when the user was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new user.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUser {
    /// Display/login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Argon2id digest of the user's password.
    pub password_hash: String,
    /// Authorization role.
    pub role: UserRole,
    /// Class the user is enrolled in, if any.
    pub class_id: Option<i32>,
}

/// Data for updating a user. Only `Some(..)` fields are written.
#[derive(Debug, Default, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateUser {
    /// Display/login name.
    pub username: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Argon2id digest of a new password.
    pub password_hash: Option<String>,
    /// Authorization role.
    pub role: Option<UserRole>,
    /// Class the user is enrolled in.
    pub class_id: Option<i32>,
}

impl User {
    /// Returns whether this user may manage classes and grades.
    #[inline]
    pub fn is_teacher(&self) -> bool {
        self.role.is_teacher()
    }
}
