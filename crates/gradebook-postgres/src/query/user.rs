//! User repository for managing user accounts.

use std::future::Future;

use diesel::dsl::now;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{NewUser, UpdateUser, User};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for user database operations.
///
/// Handles user lifecycle management including registration lookups,
/// credential scans, and partial updates.
pub trait UserRepository {
    /// Creates a new user.
    ///
    /// The caller is responsible for hashing the password before insertion;
    /// this layer never sees plaintext credentials.
    fn create_user(&mut self, new_user: NewUser) -> impl Future<Output = PgResult<User>> + Send;

    /// Finds a user by its unique identifier.
    fn find_user_by_id(
        &mut self,
        user_id: i32,
    ) -> impl Future<Output = PgResult<Option<User>>> + Send;

    /// Finds all users with the given username.
    ///
    /// Usernames are not unique at this layer; login verifies the password
    /// against every candidate row.
    fn find_users_by_username(
        &mut self,
        username: &str,
    ) -> impl Future<Output = PgResult<Vec<User>>> + Send;

    /// Checks if an email address is already registered.
    ///
    /// Comparison is case-insensitive.
    fn email_exists(&mut self, email: &str) -> impl Future<Output = PgResult<bool>> + Send;

    /// Lists all users ordered by id.
    fn list_users(&mut self) -> impl Future<Output = PgResult<Vec<User>>> + Send;

    /// Applies a partial update to a user and bumps `updated_at`.
    ///
    /// Returns the number of affected rows; zero means no such user.
    fn update_user(
        &mut self,
        user_id: i32,
        changes: UpdateUser,
    ) -> impl Future<Output = PgResult<usize>> + Send;

    /// Deletes a user.
    ///
    /// Returns the number of affected rows; zero means no such user.
    fn delete_user(&mut self, user_id: i32) -> impl Future<Output = PgResult<usize>> + Send;
}

impl UserRepository for PgConnection {
    async fn create_user(&mut self, mut new_user: NewUser) -> PgResult<User> {
        use schema::users;

        // Normalize fields: trim whitespace, lowercase the email
        new_user.username = new_user.username.trim().to_owned();
        new_user.email = new_user.email.trim().to_lowercase();

        diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_user_by_id(&mut self, user_id: i32) -> PgResult<Option<User>> {
        use schema::users::dsl::*;

        users
            .filter(id.eq(user_id))
            .select(User::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_users_by_username(&mut self, name: &str) -> PgResult<Vec<User>> {
        use schema::users::dsl::*;

        users
            .filter(username.eq(name))
            .order(id.asc())
            .select(User::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn email_exists(&mut self, address: &str) -> PgResult<bool> {
        use diesel::dsl::{exists, select};
        use schema::users::dsl::*;

        let normalized = address.trim().to_lowercase();
        select(exists(users.filter(email.eq(normalized))))
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn list_users(&mut self) -> PgResult<Vec<User>> {
        use schema::users::dsl::*;

        users
            .order(id.asc())
            .select(User::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_user(&mut self, user_id: i32, changes: UpdateUser) -> PgResult<usize> {
        use schema::users::dsl::*;

        diesel::update(users.filter(id.eq(user_id)))
            .set((&changes, updated_at.eq(now)))
            .execute(self)
            .await
            .map_err(PgError::from)
    }

    async fn delete_user(&mut self, user_id: i32) -> PgResult<usize> {
        use schema::users::dsl::*;

        diesel::delete(users.filter(id.eq(user_id)))
            .execute(self)
            .await
            .map_err(PgError::from)
    }
}
