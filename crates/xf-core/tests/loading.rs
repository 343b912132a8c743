//! Async bulk loading and configuration files

use std::io::Write;
use tempfile::NamedTempFile;
use xf_core::{
    BulkLoader, Chart, ConfigError, DashboardConfig, JsonFileLoader, LoadError, MemoryLoader,
    SalaryDashboard, XfError,
};
use xf_record::{IngestError, RawRecord, Sex};
use xf_test_utils::{raw_row, sample_rows};

fn json_file(rows: &[RawRecord]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string(rows).unwrap().as_bytes()).unwrap();
    file
}

/// Loader that always fails
struct Unreachable;

#[async_trait::async_trait]
impl BulkLoader for Unreachable {
    async fn load(&self) -> Result<Vec<RawRecord>, LoadError> {
        Err(LoadError::Source("connection refused".into()))
    }

    fn source(&self) -> String {
        "unreachable".into()
    }
}

#[tokio::test]
async fn dashboard_from_json_file() {
    let file = json_file(&sample_rows());
    let loader = JsonFileLoader::new(file.path());

    let mut dashboard = SalaryDashboard::load(&loader, DashboardConfig::default())
        .await
        .unwrap();
    assert_eq!(dashboard.crossfilter().store().len(), 12);
    assert_eq!(dashboard.percent_professors(Sex::Female), Some(0.5));

    dashboard.select(Chart::Discipline, "A").unwrap();
    assert_eq!(dashboard.gender_count(Sex::Female).unwrap(), 3.0);
}

#[tokio::test]
async fn memory_and_file_loaders_agree() {
    let file = json_file(&sample_rows());
    let from_file = JsonFileLoader::new(file.path()).load().await.unwrap();
    let from_memory = MemoryLoader::new(sample_rows()).load().await.unwrap();
    assert_eq!(from_file, from_memory);
}

#[tokio::test]
async fn missing_file_is_a_load_failure() {
    let dir = tempfile::tempdir().unwrap();
    let loader = JsonFileLoader::new(dir.path().join("Salaries.json"));

    let err = SalaryDashboard::load(&loader, DashboardConfig::default())
        .await
        .unwrap_err();
    assert!(err.is_load_failure());
    assert!(matches!(err, XfError::Load(LoadError::Io { .. })));
}

#[tokio::test]
async fn bad_category_rejects_the_whole_load() {
    let mut rows = sample_rows();
    rows.push(raw_row("A", "Female", "Lecturer", "50000", "3", "2"));
    let file = json_file(&rows);

    let err = SalaryDashboard::load(&JsonFileLoader::new(file.path()), DashboardConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        XfError::Load(LoadError::Ingest(IngestError::UnknownRank { row: 12, .. }))
    ));
}

#[tokio::test]
async fn loader_errors_propagate() {
    let err = SalaryDashboard::load(&Unreachable, DashboardConfig::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "load failed: source error: connection refused");
}

#[tokio::test]
async fn config_is_checked_before_loading() {
    let config = DashboardConfig::default().with_average_field(xf_record::Field::Sex);
    let err = SalaryDashboard::load(&Unreachable, config).await.unwrap_err();
    assert!(matches!(err, XfError::Config(ConfigError::Invalid(_))));
}

#[test]
fn config_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "percent_sexes = [\"Male\"]").unwrap();
    writeln!(file, "stacked_ranks = [\"Prof\", \"AsstProf\"]").unwrap();

    let config = DashboardConfig::from_file(file.path()).unwrap();
    assert_eq!(config.percent_sexes, vec![Sex::Male]);
    assert_eq!(config.stacked_ranks.len(), 2);

    let missing = DashboardConfig::from_file("/nonexistent/dashboard.toml").unwrap_err();
    assert!(matches!(missing, ConfigError::Io { .. }));
}
