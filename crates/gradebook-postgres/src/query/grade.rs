//! Grade repository for managing grades.

use std::future::Future;

use diesel::dsl::now;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{Grade, NewGrade, UpdateGrade};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for grade database operations.
pub trait GradeRepository {
    /// Creates a new grade.
    fn create_grade(
        &mut self,
        new_grade: NewGrade,
    ) -> impl Future<Output = PgResult<Grade>> + Send;

    /// Finds a grade by its unique identifier.
    fn find_grade_by_id(
        &mut self,
        grade_id: i32,
    ) -> impl Future<Output = PgResult<Option<Grade>>> + Send;

    /// Lists all grades ordered by id.
    fn list_grades(&mut self) -> impl Future<Output = PgResult<Vec<Grade>>> + Send;

    /// Finds all grades awarded to a user.
    fn find_grades_by_user(
        &mut self,
        user_id: i32,
    ) -> impl Future<Output = PgResult<Vec<Grade>>> + Send;

    /// Applies a partial update to a grade and bumps `updated_at`.
    ///
    /// Returns the number of affected rows; zero means no such grade.
    fn update_grade(
        &mut self,
        grade_id: i32,
        changes: UpdateGrade,
    ) -> impl Future<Output = PgResult<usize>> + Send;

    /// Deletes a grade.
    ///
    /// Returns the number of affected rows; zero means no such grade.
    fn delete_grade(&mut self, grade_id: i32) -> impl Future<Output = PgResult<usize>> + Send;
}

impl GradeRepository for PgConnection {
    async fn create_grade(&mut self, new_grade: NewGrade) -> PgResult<Grade> {
        use schema::grades;

        diesel::insert_into(grades::table)
            .values(&new_grade)
            .returning(Grade::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_grade_by_id(&mut self, grade_id: i32) -> PgResult<Option<Grade>> {
        use schema::grades::dsl::*;

        grades
            .filter(id.eq(grade_id))
            .select(Grade::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_grades(&mut self) -> PgResult<Vec<Grade>> {
        use schema::grades::dsl::*;

        grades
            .order(id.asc())
            .select(Grade::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_grades_by_user(&mut self, user: i32) -> PgResult<Vec<Grade>> {
        use schema::grades::dsl::*;

        grades
            .filter(user_id.eq(user))
            .order(id.asc())
            .select(Grade::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_grade(&mut self, grade_id: i32, changes: UpdateGrade) -> PgResult<usize> {
        use schema::grades::dsl::*;

        diesel::update(grades.filter(id.eq(grade_id)))
            .set((&changes, updated_at.eq(now)))
            .execute(self)
            .await
            .map_err(PgError::from)
    }

    async fn delete_grade(&mut self, grade_id: i32) -> PgResult<usize> {
        use schema::grades::dsl::*;

        diesel::delete(grades.filter(id.eq(grade_id)))
            .execute(self)
            .await
            .map_err(PgError::from)
    }
}
