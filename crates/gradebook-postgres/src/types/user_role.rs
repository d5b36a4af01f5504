//! User role enumeration for authorization decisions.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Defines the role a user holds within the school.
///
/// This enumeration corresponds to the `user_role` PostgreSQL enum. The role
/// gates every class and grade mutation: only teachers may create, update, or
/// delete classes and grades.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::UserRole"]
pub enum UserRole {
    /// Staff member; may manage classes and grades.
    #[db_rename = "teacher"]
    #[serde(rename = "Teacher")]
    #[strum(serialize = "Teacher")]
    Teacher,

    /// Enrolled student; read access and self-service account updates only.
    #[db_rename = "student"]
    #[serde(rename = "Student")]
    #[strum(serialize = "Student")]
    #[default]
    Student,
}

impl UserRole {
    /// Returns whether this role may manage classes and grades.
    #[inline]
    pub fn is_teacher(self) -> bool {
        matches!(self, UserRole::Teacher)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn serializes_with_capitalized_names() {
        assert_eq!(
            serde_json::to_string(&UserRole::Teacher).unwrap(),
            r#""Teacher""#
        );
        assert_eq!(
            serde_json::from_str::<UserRole>(r#""Student""#).unwrap(),
            UserRole::Student
        );
    }

    #[test]
    fn only_teacher_is_teacher() {
        assert!(UserRole::Teacher.is_teacher());
        assert!(!UserRole::Student.is_teacher());
    }
}
