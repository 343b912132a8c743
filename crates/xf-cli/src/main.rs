//! Salary dashboard on the command line
//!
//! Loads a JSON record file, applies chart selections and prints the
//! dashboard state as JSON.

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use xf_core::dashboard::AxisExtent;
use xf_core::{Chart, DashboardConfig, JsonFileLoader, SalaryDashboard};

/// Axis domains of both scatter plots
#[derive(Debug, Serialize)]
struct ExtentsReport {
    records: usize,
    service_salary: Option<AxisExtent>,
    phd_salary: Option<AxisExtent>,
}

fn cli() -> Command {
    let data = Arg::new("data")
        .long("data")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("JSON file holding an array of salary rows");

    Command::new("xf-dashboard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Cross-filtered salary dashboard")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Write logs to stderr as JSON lines"),
        )
        .subcommand(
            Command::new("summary")
                .about("Print every chart's values as JSON")
                .arg(data.clone())
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML dashboard configuration"),
                )
                .arg(
                    Arg::new("select")
                        .long("select")
                        .action(ArgAction::Append)
                        .value_name("CHART=VALUE")
                        .help("Select a value on a chart; repeat to select several"),
                )
                .arg(
                    Arg::new("pretty")
                        .long("pretty")
                        .action(ArgAction::SetTrue)
                        .help("Indent the JSON output"),
                ),
        )
        .subcommand(
            Command::new("extents")
                .about("Print the scatter-plot axis domains")
                .arg(data),
        )
}

/// Split `chart=value`
fn parse_selection(text: &str) -> Result<(Chart, String)> {
    let Some((chart, value)) = text.split_once('=') else {
        bail!("selection '{text}' is not of the form CHART=VALUE");
    };
    let chart: Chart = chart
        .trim()
        .parse()
        .map_err(|name| anyhow::anyhow!("unknown chart '{name}'"))?;
    Ok((chart, value.to_string()))
}

/// Group selections by chart, keeping the order values were given in
fn group_selections<'a, I>(texts: I) -> Result<BTreeMap<Chart, Vec<String>>>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut grouped: BTreeMap<Chart, Vec<String>> = BTreeMap::new();
    for text in texts {
        let (chart, value) = parse_selection(text)?;
        grouped.entry(chart).or_default().push(value);
    }
    Ok(grouped)
}

fn data_path(args: &ArgMatches) -> Result<PathBuf> {
    args.get_one::<PathBuf>("data")
        .cloned()
        .context("--data is required")
}

async fn summary(args: &ArgMatches) -> Result<()> {
    let config = match args.get_one::<PathBuf>("config") {
        Some(path) => DashboardConfig::from_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    let selections = group_selections(args.get_many::<String>("select").into_iter().flatten())?;

    let loader = JsonFileLoader::new(data_path(args)?);
    let mut dashboard = SalaryDashboard::load(&loader, config).await?;

    for (chart, values) in selections {
        let event = match values.as_slice() {
            [value] => dashboard.select(chart, value)?,
            _ => dashboard.select_many(chart, &values)?,
        };
        tracing::info!(
            %chart,
            passing = dashboard.crossfilter().passing_count(),
            generation = event.generation,
            "selection applied"
        );
    }

    let state = dashboard.state()?;
    let json = if args.get_flag("pretty") {
        serde_json::to_string_pretty(&state)?
    } else {
        serde_json::to_string(&state)?
    };
    println!("{json}");
    Ok(())
}

async fn extents(args: &ArgMatches) -> Result<()> {
    let loader = JsonFileLoader::new(data_path(args)?);
    let dashboard = SalaryDashboard::load(&loader, DashboardConfig::default()).await?;

    let report = ExtentsReport {
        records: dashboard.crossfilter().store().len(),
        service_salary: dashboard.extent(Chart::ServiceSalary),
        phd_salary: dashboard.extent(Chart::PhdSalary),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let logs = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if matches.get_flag("json-logs") {
        logs.json().init();
    } else {
        logs.init();
    }

    match matches.subcommand() {
        Some(("summary", args)) => summary(args).await,
        Some(("extents", args)) => extents(args).await,
        Some((other, _)) => bail!("unknown command '{other}'"),
        None => bail!("no command given"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn selections_parse_and_group() {
        let texts: Vec<String> = ["discipline=A", "gender-balance=Female", "discipline=B"]
            .into_iter()
            .map(String::from)
            .collect();
        let grouped = group_selections(&texts).unwrap();

        assert_eq!(grouped[&Chart::Discipline], vec!["A".to_string(), "B".to_string()]);
        assert_eq!(grouped[&Chart::GenderBalance], vec!["Female".to_string()]);
    }

    #[test]
    fn bad_selections_are_reported() {
        assert!(parse_selection("discipline").is_err());
        let err = parse_selection("pie=1").unwrap_err();
        assert_eq!(err.to_string(), "unknown chart 'pie'");
        assert_eq!(parse_selection("rank-distribution=").unwrap().1, "");
    }

    #[test]
    fn summary_arguments() {
        let matches = cli()
            .try_get_matches_from([
                "xf-dashboard",
                "summary",
                "--data",
                "Salaries.json",
                "--select",
                "discipline=A",
                "--select",
                "gender-balance=Male",
                "--pretty",
            ])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "summary");
        assert_eq!(data_path(args).unwrap(), PathBuf::from("Salaries.json"));
        assert_eq!(args.get_many::<String>("select").unwrap().count(), 2);
        assert!(args.get_flag("pretty"));
    }
}
