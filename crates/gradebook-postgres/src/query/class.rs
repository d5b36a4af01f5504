//! Class repository for managing classes.

use std::future::Future;

use diesel::dsl::now;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{Class, NewClass, UpdateClass};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for class database operations.
pub trait ClassRepository {
    /// Creates a new class.
    fn create_class(
        &mut self,
        new_class: NewClass,
    ) -> impl Future<Output = PgResult<Class>> + Send;

    /// Finds a class by its unique identifier.
    fn find_class_by_id(
        &mut self,
        class_id: i32,
    ) -> impl Future<Output = PgResult<Option<Class>>> + Send;

    /// Lists all classes ordered by id.
    fn list_classes(&mut self) -> impl Future<Output = PgResult<Vec<Class>>> + Send;

    /// Applies a partial update to a class and bumps `updated_at`.
    ///
    /// Returns the number of affected rows; zero means no such class.
    fn update_class(
        &mut self,
        class_id: i32,
        changes: UpdateClass,
    ) -> impl Future<Output = PgResult<usize>> + Send;

    /// Deletes a class.
    ///
    /// Returns the number of affected rows; zero means no such class.
    fn delete_class(&mut self, class_id: i32) -> impl Future<Output = PgResult<usize>> + Send;
}

impl ClassRepository for PgConnection {
    async fn create_class(&mut self, new_class: NewClass) -> PgResult<Class> {
        use schema::classes;

        diesel::insert_into(classes::table)
            .values(&new_class)
            .returning(Class::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_class_by_id(&mut self, class_id: i32) -> PgResult<Option<Class>> {
        use schema::classes::dsl::*;

        classes
            .filter(id.eq(class_id))
            .select(Class::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_classes(&mut self) -> PgResult<Vec<Class>> {
        use schema::classes::dsl::*;

        classes
            .order(id.asc())
            .select(Class::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_class(&mut self, class_id: i32, changes: UpdateClass) -> PgResult<usize> {
        use schema::classes::dsl::*;

        diesel::update(classes.filter(id.eq(class_id)))
            .set((&changes, updated_at.eq(now)))
            .execute(self)
            .await
            .map_err(PgError::from)
    }

    async fn delete_class(&mut self, class_id: i32) -> PgResult<usize> {
        use schema::classes::dsl::*;

        diesel::delete(classes.filter(id.eq(class_id)))
            .execute(self)
            .await
            .map_err(PgError::from)
    }
}
