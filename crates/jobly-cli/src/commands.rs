use crate::cli::{CompaniesListArgs, ConfigArgs, JobsListArgs, MigrateArgs, TokenArgs};
use anyhow::Context;
use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL};
use jobly::{Company, CompanyFilter, Job, JobFilter, JoblyConfig};
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "jobly.toml";

/// Resolve configuration: `--config`, else `jobly.toml` if it exists, else the environment.
fn load_config(args: &ConfigArgs) -> anyhow::Result<JoblyConfig> {
    let mut config = match &args.config {
        Some(path) => JoblyConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => JoblyConfig::load(DEFAULT_CONFIG_FILE)?,
        None => JoblyConfig::from_env().context("no jobly.toml found; reading environment")?,
    };
    if let Some(url) = &args.database {
        config.database_url = url.clone();
    }
    Ok(config)
}

fn connect(config: &JoblyConfig) -> anyhow::Result<deadpool_postgres::Pool> {
    jobly::create_pool_from(config).context("failed to create connection pool")
}

pub async fn migrate(args: MigrateArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    let pool = connect(&config)?;

    let report = jobly::migrate::run_pool(&pool).await?;
    let applied = report.applied_migrations();
    if applied.is_empty() {
        tracing::info!("schema is up to date");
    }
    for m in applied {
        tracing::info!(version = m.version(), name = m.name(), "applied migration");
    }
    Ok(())
}

pub fn token(args: TokenArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    let token = jobly::create_token(
        &args.username,
        args.admin,
        &config.secret_key,
        config.token_ttl(),
    )?;
    println!("{token}");
    Ok(())
}

pub async fn list_jobs(args: JobsListArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    let pool = connect(&config)?;
    let client = pool.get().await?;

    let mut filter = JobFilter::default();
    filter.min_salary = args.min_salary;
    filter.has_equity = args.has_equity.then_some(true);
    filter.title = args.title;

    let jobs = Job::find_all(&client, &filter).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&jobs)?);
        return Ok(());
    }

    let mut table = new_table(["ID", "Title", "Salary", "Equity", "Company"]);
    for job in &jobs {
        table.add_row(vec![
            Cell::new(job.id),
            Cell::new(&job.title),
            Cell::new(display_opt(job.salary)),
            Cell::new(display_opt(job.equity)),
            Cell::new(job.company_name.as_deref().unwrap_or(&job.company_handle)),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub async fn list_companies(args: CompaniesListArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    let pool = connect(&config)?;
    let client = pool.get().await?;

    let filter = CompanyFilter {
        min_employees: args.min_employees,
        max_employees: args.max_employees,
        name_like: args.name,
    };

    let companies = Company::find_all(&client, &filter).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&companies)?);
        return Ok(());
    }

    let mut table = new_table(["Handle", "Name", "Employees", "Description"]);
    for c in &companies {
        table.add_row(vec![
            Cell::new(&c.handle),
            Cell::new(&c.name),
            Cell::new(display_opt(c.num_employees)),
            Cell::new(&c.description),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn new_table<const N: usize>(header: [&str; N]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.map(Cell::new));
    table
}

fn display_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
