//! Response payloads shared across handlers.

use std::borrow::Cow;

use gradebook_postgres::model::{Class, Grade, User};
use gradebook_postgres::types::UserRole;
use serde::{Deserialize, Serialize};

/// JSON body returned by query routes on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error name.
    pub name: Cow<'static, str>,
    /// Human-readable error message.
    pub message: Cow<'static, str>,
    /// Optional debugging context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Cow<'static, str>>,
}

/// A user as exposed by the API.
///
/// The stored password digest is deliberately absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Unique user identifier.
    pub user_id: i32,
    /// Display/login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Authorization role.
    pub role: UserRole,
    /// Class the user is enrolled in, if any.
    pub class_id: Option<i32>,
    /// Timestamp when the user was created.
    pub created_at: jiff::Timestamp,
    /// Timestamp when the user was last updated.
    pub updated_at: jiff::Timestamp,
}

impl UserProfile {
    /// Builds the API view of a user model.
    pub fn from_model(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            class_id: user.class_id,
            created_at: user.created_at.into(),
            updated_at: user.updated_at.into(),
        }
    }
}

/// A class as exposed by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassView {
    /// Unique class identifier.
    pub class_id: i32,
    /// Class name.
    pub name: String,
    /// Timestamp when the class was created.
    pub created_at: jiff::Timestamp,
    /// Timestamp when the class was last updated.
    pub updated_at: jiff::Timestamp,
}

impl ClassView {
    /// Builds the API view of a class model.
    pub fn from_model(class: Class) -> Self {
        Self {
            class_id: class.id,
            name: class.name,
            created_at: class.created_at.into(),
            updated_at: class.updated_at.into(),
        }
    }
}

/// A grade as exposed by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeView {
    /// Unique grade identifier.
    pub grade_id: i32,
    /// What the grade was awarded for.
    pub name: String,
    /// Numeric grade value.
    pub value: f64,
    /// User the grade belongs to.
    pub user_id: i32,
    /// Timestamp when the grade was created.
    pub created_at: jiff::Timestamp,
    /// Timestamp when the grade was last updated.
    pub updated_at: jiff::Timestamp,
}

impl GradeView {
    /// Builds the API view of a grade model.
    pub fn from_model(grade: Grade) -> Self {
        Self {
            grade_id: grade.id,
            name: grade.name,
            value: grade.value,
            user_id: grade.user_id,
            created_at: grade.created_at.into(),
            updated_at: grade.updated_at.into(),
        }
    }
}
