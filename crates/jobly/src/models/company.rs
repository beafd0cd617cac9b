//! Companies: listing with employee-count and name filters, partial update.

use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::row::{FromRow, RowExt};
use crate::sql::{FieldNameMap, UpdatePayload, WhereFragment, sql_for_partial_update};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

const COMPANY_COLUMNS: &str = r#"handle,
                                 name,
                                 description,
                                 num_employees AS "numEmployees",
                                 logo_url AS "logoUrl""#;

/// API field names that differ from their column names.
fn field_names() -> FieldNameMap {
    FieldNameMap::from([("numEmployees", "num_employees"), ("logoUrl", "logo_url")])
}

/// A company row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

impl FromRow for Company {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("numEmployees")?,
            logo_url: row.try_get_column("logoUrl")?,
        })
    }
}

/// A job as listed under its company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyJob {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
}

impl FromRow for CompanyJob {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
        })
    }
}

/// A company with the jobs it offers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<CompanyJob>,
}

/// Data for a new company.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// Fields to change on a company. The handle cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub num_employees: Option<Option<i32>>,
    pub logo_url: Option<Option<String>>,
}

impl CompanyUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn num_employees(mut self, num_employees: Option<i32>) -> Self {
        self.num_employees = Some(num_employees);
        self
    }

    pub fn logo_url(mut self, logo_url: Option<String>) -> Self {
        self.logo_url = Some(logo_url);
        self
    }

    /// The fields present in this update, keyed by their API names.
    pub fn to_payload(&self) -> UpdatePayload {
        UpdatePayload::new()
            .set_opt("name", self.name.clone())
            .set_opt("description", self.description.clone())
            .set_opt("numEmployees", self.num_employees)
            .set_opt("logoUrl", self.logo_url.clone())
    }
}

/// Optional criteria for [`Company::find_all`].
///
/// Zero employee counts and an empty name are treated like absent filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyFilter {
    pub min_employees: Option<i32>,
    pub max_employees: Option<i32>,
    pub name_like: Option<String>,
}

impl CompanyFilter {
    pub fn min_employees(mut self, min_employees: i32) -> Self {
        self.min_employees = Some(min_employees);
        self
    }

    pub fn max_employees(mut self, max_employees: i32) -> Self {
        self.max_employees = Some(max_employees);
        self
    }

    pub fn name_like(mut self, name_like: impl Into<String>) -> Self {
        self.name_like = Some(name_like.into());
        self
    }

    /// Build the WHERE body for a company listing.
    pub fn where_clause(&self) -> JoblyResult<WhereFragment> {
        if self.min_employees.is_some_and(|n| n < 0) || self.max_employees.is_some_and(|n| n < 0)
        {
            return Err(JoblyError::invalid_filter(
                "Employee counts cannot be less than zero",
            ));
        }
        if let (Some(min), Some(max)) = (self.min_employees, self.max_employees) {
            if min > max {
                return Err(JoblyError::invalid_filter(
                    "Min employees cannot be greater than max employees",
                ));
            }
        }

        let mut w = WhereFragment::new();
        if let Some(min) = self.min_employees.filter(|&n| n != 0) {
            w.and_gte("num_employees", min);
        }
        if let Some(max) = self.max_employees.filter(|&n| n != 0) {
            w.and_lte("num_employees", max);
        }
        if let Some(name) = self.name_like.as_deref().filter(|n| !n.is_empty()) {
            w.and_contains("name", name);
        }
        Ok(w)
    }
}

impl Company {
    /// Insert a company and return it.
    ///
    /// Returns [`JoblyError::BadRequest`] if the handle is taken.
    pub async fn create(client: &impl GenericClient, data: &NewCompany) -> JoblyResult<Company> {
        let taken = client
            .query_opt_tagged(
                "company.create.check",
                "SELECT handle FROM companies WHERE handle = $1",
                &[&data.handle],
            )
            .await?;
        if taken.is_some() {
            return Err(JoblyError::bad_request(format!(
                "Duplicate company: {}",
                data.handle
            )));
        }

        let sql = format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COMPANY_COLUMNS}"
        );
        let row = client
            .query_one_tagged(
                "company.create",
                &sql,
                &[
                    &data.handle,
                    &data.name,
                    &data.description,
                    &data.num_employees,
                    &data.logo_url,
                ],
            )
            .await?;
        Company::from_row(&row)
    }

    /// List companies matching `filter`, ordered by name.
    pub async fn find_all(
        client: &impl GenericClient,
        filter: &CompanyFilter,
    ) -> JoblyResult<Vec<Company>> {
        let w = filter.where_clause()?;
        let sql = format!(
            "SELECT {COMPANY_COLUMNS}
             FROM companies{}
             ORDER BY name",
            w.to_where_sql()
        );
        let rows = client
            .query_tagged("company.find_all", &sql, &w.values().as_refs())
            .await?;
        Company::from_rows(&rows)
    }

    /// Fetch one company with its jobs.
    pub async fn get(client: &impl GenericClient, handle: &str) -> JoblyResult<CompanyDetail> {
        let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE handle = $1");
        let row = client
            .query_opt_tagged("company.get", &sql, &[&handle])
            .await?
            .ok_or_else(|| no_such_company(handle))?;
        let company = Company::from_row(&row)?;

        let rows = client
            .query_tagged(
                "company.get.jobs",
                "SELECT id, title, salary, equity
                 FROM jobs
                 WHERE company_handle = $1
                 ORDER BY id",
                &[&handle],
            )
            .await?;

        Ok(CompanyDetail {
            company,
            jobs: CompanyJob::from_rows(&rows)?,
        })
    }

    /// Apply a partial update and return the updated company.
    ///
    /// Returns [`JoblyError::NoData`] when `data` sets no field.
    pub async fn update(
        client: &impl GenericClient,
        handle: &str,
        data: &CompanyUpdate,
    ) -> JoblyResult<Company> {
        let set = sql_for_partial_update(&data.to_payload(), &field_names())?;
        let sql = format!(
            "UPDATE companies
             SET {}
             WHERE handle = ${}
             RETURNING {COMPANY_COLUMNS}",
            set.set_cols(),
            set.next_placeholder()
        );
        let mut params = set.values().as_refs();
        params.push(&handle);

        let row = client
            .query_opt_tagged("company.update", &sql, &params)
            .await?
            .ok_or_else(|| no_such_company(handle))?;
        Company::from_row(&row)
    }

    /// Delete a company (and, by cascade, its jobs).
    pub async fn remove(client: &impl GenericClient, handle: &str) -> JoblyResult<()> {
        client
            .query_opt_tagged(
                "company.remove",
                "DELETE FROM companies WHERE handle = $1 RETURNING handle",
                &[&handle],
            )
            .await?
            .map(|_| ())
            .ok_or_else(|| no_such_company(handle))
    }
}

fn no_such_company(handle: &str) -> JoblyError {
    JoblyError::not_found(format!("No company: {handle}"))
}
