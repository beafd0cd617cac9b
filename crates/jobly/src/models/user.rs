//! Users: lookup, partial profile update, job applications.

use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::row::{FromRow, RowExt};
use crate::sql::{FieldNameMap, UpdatePayload, sql_for_partial_update};
use serde::Serialize;
use tokio_postgres::Row;

const USER_COLUMNS: &str = r#"username,
                              first_name AS "firstName",
                              last_name AS "lastName",
                              email,
                              is_admin AS "isAdmin""#;

fn field_names() -> FieldNameMap {
    FieldNameMap::from([
        ("firstName", "first_name"),
        ("lastName", "last_name"),
        ("isAdmin", "is_admin"),
    ])
}

/// A user, without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
}

impl FromRow for User {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            username: row.try_get_column("username")?,
            first_name: row.try_get_column("firstName")?,
            last_name: row.try_get_column("lastName")?,
            email: row.try_get_column("email")?,
            is_admin: row.try_get_column("isAdmin")?,
        })
    }
}

/// A user with the ids of the jobs they applied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub jobs: Vec<i32>,
}

/// Fields to change on a user. The username cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub is_admin: Option<bool>,
}

impl UserUpdate {
    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn is_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = Some(is_admin);
        self
    }

    /// The fields present in this update, keyed by their API names.
    pub fn to_payload(&self) -> UpdatePayload {
        UpdatePayload::new()
            .set_opt("firstName", self.first_name.clone())
            .set_opt("lastName", self.last_name.clone())
            .set_opt("email", self.email.clone())
            .set_opt("isAdmin", self.is_admin)
    }
}

impl User {
    /// List all users, ordered by username.
    pub async fn find_all(client: &impl GenericClient) -> JoblyResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY username");
        let rows = client.query_tagged("user.find_all", &sql, &[]).await?;
        User::from_rows(&rows)
    }

    /// Fetch one user with the jobs they applied to.
    pub async fn get(client: &impl GenericClient, username: &str) -> JoblyResult<UserDetail> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let row = client
            .query_opt_tagged("user.get", &sql, &[&username])
            .await?
            .ok_or_else(|| no_such_user(username))?;
        let user = User::from_row(&row)?;

        let rows = client
            .query_tagged(
                "user.get.applications",
                "SELECT job_id FROM applications WHERE username = $1 ORDER BY job_id",
                &[&username],
            )
            .await?;
        let jobs = rows
            .iter()
            .map(|r| r.try_get_column("job_id"))
            .collect::<JoblyResult<Vec<i32>>>()?;

        Ok(UserDetail { user, jobs })
    }

    /// Apply a partial update and return the updated user.
    ///
    /// Returns [`JoblyError::NoData`] when `data` sets no field.
    pub async fn update(
        client: &impl GenericClient,
        username: &str,
        data: &UserUpdate,
    ) -> JoblyResult<User> {
        let set = sql_for_partial_update(&data.to_payload(), &field_names())?;
        let sql = format!(
            "UPDATE users
             SET {}
             WHERE username = ${}
             RETURNING {USER_COLUMNS}",
            set.set_cols(),
            set.next_placeholder()
        );
        let mut params = set.values().as_refs();
        params.push(&username);

        let row = client
            .query_opt_tagged("user.update", &sql, &params)
            .await?
            .ok_or_else(|| no_such_user(username))?;
        User::from_row(&row)
    }

    /// Delete a user.
    pub async fn remove(client: &impl GenericClient, username: &str) -> JoblyResult<()> {
        client
            .query_opt_tagged(
                "user.remove",
                "DELETE FROM users WHERE username = $1 RETURNING username",
                &[&username],
            )
            .await?
            .map(|_| ())
            .ok_or_else(|| no_such_user(username))
    }

    /// Record that `username` applied to job `job_id`.
    pub async fn apply_to_job(
        client: &impl GenericClient,
        username: &str,
        job_id: i32,
    ) -> JoblyResult<()> {
        client
            .query_opt_tagged("user.apply.job", "SELECT id FROM jobs WHERE id = $1", &[&job_id])
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No job: {job_id}")))?;
        client
            .query_opt_tagged(
                "user.apply.user",
                "SELECT username FROM users WHERE username = $1",
                &[&username],
            )
            .await?
            .ok_or_else(|| no_such_user(username))?;

        // ON CONFLICT keeps a surrounding transaction usable on a repeat application.
        let inserted = client
            .execute_tagged(
                "user.apply",
                "INSERT INTO applications (job_id, username) VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
                &[&job_id, &username],
            )
            .await?;
        if inserted == 0 {
            return Err(JoblyError::bad_request(format!(
                "{username} already applied to job {job_id}"
            )));
        }
        Ok(())
    }
}

fn no_such_user(username: &str) -> JoblyError {
    JoblyError::not_found(format!("No user: {username}"))
}
