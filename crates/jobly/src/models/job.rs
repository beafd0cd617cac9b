//! Jobs: listing with filters, lookup, partial update.

use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::models::company::Company;
use crate::row::{FromRow, RowExt};
use crate::sql::{FieldNameMap, UpdatePayload, WhereFragment, sql_for_partial_update};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

const JOB_COLUMNS: &str = r#"id, title, salary, equity, company_handle AS "companyHandle""#;

/// A job row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("companyHandle")?,
        })
    }
}

/// A job in a listing, with the name of the company offering it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
    pub company_name: Option<String>,
}

impl FromRow for JobListing {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("companyHandle")?,
            company_name: row.try_get_column("companyName")?,
        })
    }
}

/// A single job with its company inlined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobDetail {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company: Company,
}

/// Data for a new job.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// Fields to change on a job. The owning company cannot be changed.
///
/// The outer `Option` says whether the field is part of the update; the inner
/// one (for nullable columns) says whether it is set to `NULL`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub salary: Option<Option<i32>>,
    pub equity: Option<Option<Decimal>>,
}

impl JobUpdate {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn salary(mut self, salary: Option<i32>) -> Self {
        self.salary = Some(salary);
        self
    }

    pub fn equity(mut self, equity: Option<Decimal>) -> Self {
        self.equity = Some(equity);
        self
    }

    /// The fields present in this update, keyed by their API names.
    pub fn to_payload(&self) -> UpdatePayload {
        UpdatePayload::new()
            .set_opt("title", self.title.clone())
            .set_opt("salary", self.salary)
            .set_opt("equity", self.equity)
    }
}

/// Optional criteria for [`Job::find_all`].
///
/// A zero `min_salary`, a `false` `has_equity` and an empty `title` are treated
/// exactly like absent filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobFilter {
    pub min_salary: Option<i32>,
    pub has_equity: Option<bool>,
    pub title: Option<String>,
}

impl JobFilter {
    pub fn min_salary(mut self, min_salary: i32) -> Self {
        self.min_salary = Some(min_salary);
        self
    }

    pub fn has_equity(mut self, has_equity: bool) -> Self {
        self.has_equity = Some(has_equity);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Build the WHERE body for a job listing.
    ///
    /// Predicates are considered in a fixed order (salary, equity, title);
    /// placeholders are numbered by the values actually bound.
    pub fn where_clause(&self) -> JoblyResult<WhereFragment> {
        if self.min_salary.is_some_and(|s| s < 0) {
            return Err(JoblyError::invalid_filter(
                "Min salary cannot be less than zero",
            ));
        }

        let mut w = WhereFragment::new();
        if let Some(min_salary) = self.min_salary.filter(|&s| s != 0) {
            w.and_gte("salary", min_salary);
        }
        if self.has_equity == Some(true) {
            w.and_raw("equity > 0");
        }
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            w.and_contains("title", title);
        }
        Ok(w)
    }
}

impl Job {
    /// Insert a job and return it.
    pub async fn create(client: &impl GenericClient, data: &NewJob) -> JoblyResult<Job> {
        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle)
             VALUES ($1, $2, $3, $4)
             RETURNING {JOB_COLUMNS}"
        );
        let row = client
            .query_one_tagged(
                "job.create",
                &sql,
                &[&data.title, &data.salary, &data.equity, &data.company_handle],
            )
            .await?;
        Job::from_row(&row)
    }

    /// List jobs matching `filter`, ordered by title.
    pub async fn find_all(
        client: &impl GenericClient,
        filter: &JobFilter,
    ) -> JoblyResult<Vec<JobListing>> {
        let w = filter.where_clause()?;
        let sql = format!(
            r#"SELECT j.id,
                      j.title,
                      j.salary,
                      j.equity,
                      j.company_handle AS "companyHandle",
                      c.name AS "companyName"
               FROM jobs AS j
               LEFT JOIN companies AS c ON c.handle = j.company_handle{}
               ORDER BY title"#,
            w.to_where_sql()
        );
        let rows = client
            .query_tagged("job.find_all", &sql, &w.values().as_refs())
            .await?;
        JobListing::from_rows(&rows)
    }

    /// Fetch one job with its company.
    pub async fn get(client: &impl GenericClient, id: i32) -> JoblyResult<JobDetail> {
        let sql = r#"SELECT j.id,
                            j.title,
                            j.salary,
                            j.equity,
                            c.handle,
                            c.name,
                            c.description,
                            c.num_employees AS "numEmployees",
                            c.logo_url AS "logoUrl"
                     FROM jobs AS j
                     LEFT JOIN companies AS c ON j.company_handle = c.handle
                     WHERE j.id = $1"#;
        let row = client
            .query_opt_tagged("job.get", sql, &[&id])
            .await?
            .ok_or_else(|| no_such_job(id))?;

        Ok(JobDetail {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company: Company::from_row(&row)?,
        })
    }

    /// Apply a partial update and return the updated job.
    ///
    /// Returns [`JoblyError::NoData`] when `data` sets no field.
    pub async fn update(
        client: &impl GenericClient,
        id: i32,
        data: &JobUpdate,
    ) -> JoblyResult<Job> {
        let set = sql_for_partial_update(&data.to_payload(), &FieldNameMap::new())?;
        let sql = format!(
            "UPDATE jobs
             SET {}
             WHERE id = ${}
             RETURNING {JOB_COLUMNS}",
            set.set_cols(),
            set.next_placeholder()
        );
        let mut params = set.values().as_refs();
        params.push(&id);

        let row = client
            .query_opt_tagged("job.update", &sql, &params)
            .await?
            .ok_or_else(|| no_such_job(id))?;
        Job::from_row(&row)
    }

    /// Delete a job.
    pub async fn remove(client: &impl GenericClient, id: i32) -> JoblyResult<()> {
        client
            .query_opt_tagged("job.remove", "DELETE FROM jobs WHERE id = $1 RETURNING id", &[&id])
            .await?
            .map(|_| ())
            .ok_or_else(|| no_such_job(id))
    }
}

fn no_such_job(id: i32) -> JoblyError {
    JoblyError::not_found(format!("No job with id: {id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shown(w: &WhereFragment) -> Vec<String> {
        w.values().iter().map(|p| format!("{p:?}")).collect()
    }

    #[test]
    fn no_filters_yield_empty_fragment() {
        let w = JobFilter::default().where_clause().unwrap();
        assert_eq!(w.clause(), "");
        assert_eq!(w.to_where_sql(), "");
        assert!(w.values().is_empty());
    }

    #[test]
    fn negative_min_salary_is_rejected() {
        let err = JobFilter::default().min_salary(-1).where_clause().unwrap_err();
        assert!(matches!(err, JoblyError::InvalidFilter(_)));

        let err = JobFilter::default()
            .min_salary(-1)
            .has_equity(true)
            .title("eng")
            .where_clause()
            .unwrap_err();
        assert!(matches!(err, JoblyError::InvalidFilter(_)));
        assert_eq!(
            err.to_string(),
            "Invalid filter: Min salary cannot be less than zero"
        );
    }

    #[test]
    fn equity_flag_does_not_shift_salary_placeholder() {
        let w = JobFilter::default()
            .min_salary(5)
            .has_equity(true)
            .where_clause()
            .unwrap();
        assert_eq!(w.clause(), "salary >= $1 AND equity > 0");
        assert_eq!(shown(&w), ["5"]);
    }

    #[test]
    fn title_is_a_case_insensitive_substring_match() {
        let w = JobFilter::default().title("eng").where_clause().unwrap();
        assert_eq!(w.clause(), "title ILIKE $1");
        assert_eq!(shown(&w), [r#""%eng%""#]);
    }

    #[test]
    fn skipped_salary_leaves_no_numbering_gap() {
        let w = JobFilter::default()
            .has_equity(true)
            .title("eng")
            .where_clause()
            .unwrap();
        assert_eq!(w.clause(), "equity > 0 AND title ILIKE $1");
        assert_eq!(shown(&w), [r#""%eng%""#]);
    }

    #[test]
    fn all_filters_in_fixed_order() {
        let w = JobFilter::default()
            .title("1")
            .has_equity(true)
            .min_salary(1)
            .where_clause()
            .unwrap();
        assert_eq!(w.clause(), "salary >= $1 AND equity > 0 AND title ILIKE $2");
        assert_eq!(shown(&w), ["1", r#""%1%""#]);
        assert_eq!(
            w.to_where_sql(),
            " WHERE salary >= $1 AND equity > 0 AND title ILIKE $2"
        );
    }

    #[test]
    fn falsy_filters_are_treated_as_absent() {
        let w = JobFilter::default()
            .min_salary(0)
            .has_equity(false)
            .title("")
            .where_clause()
            .unwrap();
        assert!(w.is_empty());
        assert!(w.values().is_empty());
    }

    #[test]
    fn filter_values_never_appear_in_sql() {
        let hostile = "x' OR '1'='1";
        let w = JobFilter::default()
            .min_salary(424_242)
            .title(hostile)
            .where_clause()
            .unwrap();
        assert!(!w.clause().contains(hostile));
        assert!(!w.clause().contains("424242"));
    }

    #[test]
    fn where_clause_is_idempotent() {
        let filter = JobFilter::default().min_salary(100).title("dev");
        let a = filter.where_clause().unwrap();
        let b = filter.where_clause().unwrap();
        assert_eq!(a.clause(), b.clause());
        assert_eq!(shown(&a), shown(&b));
    }

    #[test]
    fn filter_deserializes_from_query_names() {
        let filter: JobFilter =
            serde_json::from_str(r#"{"minSalary": 2, "hasEquity": true}"#).unwrap();
        assert_eq!(filter, JobFilter::default().min_salary(2).has_equity(true));

        let empty: JobFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, JobFilter::default());
    }

    #[test]
    fn job_update_payload_lists_only_present_fields() {
        let update = JobUpdate::default().title("New").salary(None);
        let payload = update.to_payload();
        assert_eq!(payload.field_names().collect::<Vec<_>>(), ["title", "salary"]);

        let set = sql_for_partial_update(&payload, &FieldNameMap::new()).unwrap();
        assert_eq!(set.set_cols(), r#""title"=$1, "salary"=$2"#);
        assert_eq!(set.next_placeholder(), 3);
    }

    #[test]
    fn empty_job_update_is_no_data() {
        let err = sql_for_partial_update(&JobUpdate::default().to_payload(), &FieldNameMap::new())
            .unwrap_err();
        assert!(matches!(err, JoblyError::NoData));
    }
}
