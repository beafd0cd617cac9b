use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Migrate,
    Token,
    Jobs,
    Companies,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Migrate(MigrateArgs),
    Token(TokenArgs),
    Jobs(JobsListArgs),
    Companies(CompaniesListArgs),
}

/// Where to read configuration from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigArgs {
    /// Explicit TOML file; `jobly.toml` is used when present, else the environment.
    pub config: Option<PathBuf>,
    /// Overrides `database_url`.
    pub database: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MigrateArgs {
    pub config: ConfigArgs,
}

#[derive(Debug, Clone)]
pub struct TokenArgs {
    pub config: ConfigArgs,
    pub username: String,
    pub admin: bool,
}

#[derive(Debug, Clone)]
pub struct JobsListArgs {
    pub config: ConfigArgs,
    pub min_salary: Option<i32>,
    pub has_equity: bool,
    pub title: Option<String>,
    pub json: bool,
}

#[derive(Debug, Clone)]
pub struct CompaniesListArgs {
    pub config: ConfigArgs,
    pub min_employees: Option<i32>,
    pub max_employees: Option<i32>,
    pub name: Option<String>,
    pub json: bool,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help(HelpTopic::Root)),
        "migrate" => parse_migrate(it.map(|s| s.as_str())),
        "token" => parse_token(it.map(|s| s.as_str())),
        "jobs" => parse_jobs(it.map(|s| s.as_str())),
        "companies" => parse_companies(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

/// Take the value of `--name <v>` or `--name=<v>`.
///
/// Returns `Ok(None)` when `token` is not `name`.
fn option_value<'a>(
    name: &str,
    token: &'a str,
    it: &mut impl Iterator<Item = &'a str>,
) -> anyhow::Result<Option<&'a str>> {
    if token == name {
        let Some(v) = it.next() else {
            anyhow::bail!("{name} requires a value");
        };
        return Ok(Some(v));
    }
    Ok(token
        .strip_prefix(name)
        .and_then(|rest| rest.strip_prefix('=')))
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> anyhow::Result<T> {
    raw.parse::<T>()
        .map_err(|_| anyhow::anyhow!("invalid {name} value: {raw}"))
}

/// Consume `--config` / `--database` if `token` is one of them.
fn parse_config_option<'a>(
    config: &mut ConfigArgs,
    token: &'a str,
    it: &mut impl Iterator<Item = &'a str>,
) -> anyhow::Result<bool> {
    if let Some(v) = option_value("--config", token, it)? {
        config.config = Some(PathBuf::from(v));
        return Ok(true);
    }
    if let Some(v) = option_value("--database", token, it)? {
        config.database = Some(v.to_string());
        return Ok(true);
    }
    Ok(false)
}

fn parse_migrate<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = ConfigArgs::default();

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Migrate)),
            _ if parse_config_option(&mut config, token, &mut it)? => {}
            _ => anyhow::bail!("unexpected argument: {token}"),
        }
    }

    Ok(Command::Migrate(MigrateArgs { config }))
}

fn parse_token<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = ConfigArgs::default();
    let mut username: Option<String> = None;
    let mut admin = false;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Token)),
            "--admin" => admin = true,
            _ if parse_config_option(&mut config, token, &mut it)? => {}
            _ if token.starts_with('-') => anyhow::bail!("unknown option: {token}"),
            _ if username.is_none() => username = Some(token.to_string()),
            _ => anyhow::bail!("unexpected argument: {token}"),
        }
    }

    let Some(username) = username else {
        anyhow::bail!("token requires a <USERNAME>");
    };
    Ok(Command::Token(TokenArgs {
        config,
        username,
        admin,
    }))
}

fn parse_jobs<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut subcmd: Option<&str> = None;
    let mut config = ConfigArgs::default();
    let mut min_salary: Option<i32> = None;
    let mut has_equity = false;
    let mut title: Option<String> = None;
    let mut json = false;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Jobs)),
            "list" if subcmd.is_none() => subcmd = Some(token),
            "--has-equity" => has_equity = true,
            "--json" => json = true,
            _ if parse_config_option(&mut config, token, &mut it)? => {}
            _ => {
                if let Some(v) = option_value("--min-salary", token, &mut it)? {
                    min_salary = Some(parse_number("--min-salary", v)?);
                } else if let Some(v) = option_value("--title", token, &mut it)? {
                    title = Some(v.to_string());
                } else {
                    anyhow::bail!("unexpected argument: {token}");
                }
            }
        }
    }

    match subcmd {
        Some("list") => Ok(Command::Jobs(JobsListArgs {
            config,
            min_salary,
            has_equity,
            title,
            json,
        })),
        _ => Ok(Command::Help(HelpTopic::Jobs)),
    }
}

fn parse_companies<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut subcmd: Option<&str> = None;
    let mut config = ConfigArgs::default();
    let mut min_employees: Option<i32> = None;
    let mut max_employees: Option<i32> = None;
    let mut name: Option<String> = None;
    let mut json = false;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Companies)),
            "list" if subcmd.is_none() => subcmd = Some(token),
            "--json" => json = true,
            _ if parse_config_option(&mut config, token, &mut it)? => {}
            _ => {
                if let Some(v) = option_value("--min-employees", token, &mut it)? {
                    min_employees = Some(parse_number("--min-employees", v)?);
                } else if let Some(v) = option_value("--max-employees", token, &mut it)? {
                    max_employees = Some(parse_number("--max-employees", v)?);
                } else if let Some(v) = option_value("--name", token, &mut it)? {
                    name = Some(v.to_string());
                } else {
                    anyhow::bail!("unexpected argument: {token}");
                }
            }
        }
    }

    match subcmd {
        Some("list") => Ok(Command::Companies(CompaniesListArgs {
            config,
            min_employees,
            max_employees,
            name,
            json,
        })),
        _ => Ok(Command::Help(HelpTopic::Companies)),
    }
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
jobly - admin CLI for the jobly data layer

USAGE:
  jobly <COMMAND> [OPTIONS]

COMMANDS:
  migrate       Apply pending schema migrations
  token         Issue a signed token for a user
  jobs          List jobs (with filters)
  companies     List companies (with filters)

GLOBAL OPTIONS:
  --config <FILE>       Config file path (default: jobly.toml if present, else env)
  --database <URL>      Override database_url from config
  -h, --help            Print help

Run `jobly <command> --help` for more."
            );
        }
        HelpTopic::Migrate => {
            println!(
                "\
USAGE:
  jobly migrate [OPTIONS]

Applies the embedded migrations that have not run yet.

OPTIONS:
  --config <FILE>       Config file path
  --database <URL>      Override database_url from config"
            );
        }
        HelpTopic::Token => {
            println!(
                "\
USAGE:
  jobly token <USERNAME> [OPTIONS]

OPTIONS:
  --admin               Mark the token as an admin token
  --config <FILE>       Config file path"
            );
        }
        HelpTopic::Jobs => {
            println!(
                "\
USAGE:
  jobly jobs list [OPTIONS]

OPTIONS:
  --min-salary <N>      Only jobs paying at least N
  --has-equity          Only jobs with non-zero equity
  --title <TEXT>        Case-insensitive title substring
  --json                Print JSON instead of a table
  --config <FILE>       Config file path
  --database <URL>      Override database_url from config"
            );
        }
        HelpTopic::Companies => {
            println!(
                "\
USAGE:
  jobly companies list [OPTIONS]

OPTIONS:
  --min-employees <N>   Only companies with at least N employees
  --max-employees <N>   Only companies with at most N employees
  --name <TEXT>         Case-insensitive name substring
  --json                Print JSON instead of a table
  --config <FILE>       Config file path
  --database <URL>      Override database_url from config"
            );
        }
    }
}
