//! Salary dashboard
//!
//! Wires the salary charts onto one [`Crossfilter`]. Each chart owns its own
//! dimension, so a selection on one chart filters every other chart while
//! leaving its own bars in place. Two charts keyed by the same field still
//! filter each other: selecting a sex on the gender balance zeroes the other
//! sex in the rank distribution.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use xf_core::{Chart, DashboardConfig, SalaryDashboard};
//! use xf_record::{Rank, Record, RecordStore, Sex};
//!
//! let store = RecordStore::new(vec![
//!     Record::new("A", Sex::Male, Rank::Prof, 100, 10, 8),
//!     Record::new("A", Sex::Male, Rank::AsstProf, 200, 3, 2),
//!     Record::new("B", Sex::Female, Rank::Prof, 150, 20, 15),
//! ])
//! .unwrap();
//!
//! let mut dashboard = SalaryDashboard::new(Arc::new(store), DashboardConfig::default()).unwrap();
//! assert_eq!(dashboard.percent_professors(Sex::Male), Some(0.5));
//!
//! dashboard.select(Chart::Discipline, "B").unwrap();
//! assert_eq!(dashboard.percent_professors(Sex::Male), Some(0.0));
//! assert_eq!(dashboard.percent_professors(Sex::Female), Some(1.0));
//! ```

mod chart;
mod state;

pub use chart::Chart;
pub use state::{
    format_percent, ActiveFilter, AxisExtent, DashboardState, PercentDisplay, ScatterPoint,
    ScatterState, SeriesEntry, StackedSeries,
};

use crate::config::DashboardConfig;
use crate::crossfilter::{Crossfilter, GroupAllHandle, GroupHandle};
use crate::error::{XfError, XfResult};
use crate::listener::{FilterEvent, RecomputeListener};
use crate::loader::{load_store, BulkLoader};
use std::sync::Arc;
use tracing::info;
use xf_index::{DimensionId, DimensionSpec, Filter};
use xf_record::{Field, Key, Rank, RecordStore, Sex};
use xf_reduce::{ConditionalCount, ConditionalRatio, Count, Group, Reducer, RunningAverage};

/// Dimension and group of a bar chart
#[derive(Debug, Clone, Copy)]
struct Bars<R> {
    dimension: DimensionId,
    group: GroupHandle<R>,
}

/// Point dimension and group of a scatter plot, with its x-axis domain
#[derive(Debug, Clone, Copy)]
struct Scatter {
    points: Bars<Count>,
    extent: Option<AxisExtent>,
    x_label: &'static str,
}

/// Cross-filtered salary charts over one record set
#[derive(Debug)]
pub struct SalaryDashboard {
    config: DashboardConfig,
    xf: Crossfilter,
    discipline: Bars<Count>,
    percent: Vec<(Sex, GroupAllHandle<ConditionalRatio>)>,
    gender: Bars<Count>,
    average: Bars<RunningAverage>,
    ranks: DimensionId,
    rank_series: Vec<(Rank, GroupHandle<ConditionalCount>)>,
    service: Scatter,
    phd: Scatter,
}

impl SalaryDashboard {
    /// Load every record, then build the dashboard
    ///
    /// Nothing is indexed until the loader has delivered the full set.
    ///
    /// # Errors
    /// Invalid configuration, or any load failure.
    pub async fn load(loader: &dyn BulkLoader, config: DashboardConfig) -> XfResult<Self> {
        config.validate()?;
        let store = load_store(loader).await?;
        Self::new(Arc::new(store), config)
    }

    /// Build every chart over a loaded store
    ///
    /// # Errors
    /// Invalid configuration.
    pub fn new(store: Arc<RecordStore>, config: DashboardConfig) -> XfResult<Self> {
        config.validate()?;
        let mut xf = Crossfilter::new(store);

        let discipline = build_bars(&mut xf, Field::Discipline, Count)?;

        let percent: Vec<(Sex, GroupAllHandle<ConditionalRatio>)> = config
            .percent_sexes
            .iter()
            .map(|&sex| {
                let share = ConditionalRatio::share_of_rank(sex, config.senior_rank);
                (sex, xf.group_all(share))
            })
            .collect();

        let gender = build_bars(&mut xf, Field::Sex, Count)?;
        let average = build_bars(&mut xf, Field::Sex, RunningAverage::new(config.average_field))?;

        let ranks = xf.dimension(DimensionSpec::Field(Field::Sex))?;
        let rank_series = config
            .stacked_ranks
            .iter()
            .map(|&rank| {
                xf.group(ranks, ConditionalCount::of_rank(rank))
                    .map(|handle| (rank, handle))
            })
            .collect::<XfResult<Vec<_>>>()?;

        let service = build_scatter(&mut xf, Field::YrsService, "Years Of Service")?;
        let phd = build_scatter(&mut xf, Field::YrsSincePhd, "Years Since PhD")?;

        info!(
            records = xf.store().len(),
            dimensions = xf.dimension_count(),
            groups = xf.group_count(),
            "dashboard built"
        );

        Ok(Self {
            config,
            xf,
            discipline,
            percent,
            gender,
            average,
            ranks,
            rank_series,
            service,
            phd,
        })
    }

    /// Select one value on a chart
    ///
    /// Replaces any earlier selection on the same chart.
    pub fn select(&mut self, chart: Chart, value: &str) -> XfResult<FilterEvent> {
        let dim = self.selectable(chart)?;
        let key = chart.key_field().parse_key(value);
        self.xf.apply_filter(dim, Filter::Exact(key))
    }

    /// Select several values on a chart
    pub fn select_many<I, S>(&mut self, chart: Chart, values: I) -> XfResult<FilterEvent>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dim = self.selectable(chart)?;
        let field = chart.key_field();
        let keys = values.into_iter().map(|v| field.parse_key(v.as_ref()));
        self.xf.apply_filter(dim, Filter::any_of(keys))
    }

    /// Drop a chart's selection
    pub fn clear(&mut self, chart: Chart) -> XfResult<FilterEvent> {
        let dim = self.selectable(chart)?;
        self.xf.clear_filter(dim)
    }

    /// Drop every selection
    pub fn clear_all(&mut self) -> XfResult<Vec<FilterEvent>> {
        self.xf.clear_all()
    }

    /// Register a renderer
    pub fn subscribe<L: RecomputeListener + 'static>(&mut self, listener: L) {
        self.xf.subscribe(listener);
    }

    /// Share of `sex` holding the senior rank; `None` if not configured
    #[must_use]
    pub fn percent_professors(&self, sex: Sex) -> Option<f64> {
        let (_, handle) = self.percent.iter().find(|(s, _)| *s == sex)?;
        self.xf.group_all_value(*handle).ok()
    }

    /// Average of the configured field for a sex
    pub fn average_salary(&self, sex: Sex) -> XfResult<f64> {
        self.bar_value(self.average.group, &sex_key(sex))
    }

    /// Records of `sex` holding `rank`; 0 for ranks not stacked
    pub fn rank_series(&self, rank: Rank, sex: Sex) -> XfResult<f64> {
        match self.rank_series.iter().find(|(r, _)| *r == rank) {
            Some((_, handle)) => self.bar_value(*handle, &sex_key(sex)),
            None => Ok(0.0),
        }
    }

    /// Gender-balance bar of a sex
    pub fn gender_count(&self, sex: Sex) -> XfResult<f64> {
        self.bar_value(self.gender.group, &sex_key(sex))
    }

    /// Discipline-selector count of a discipline
    pub fn discipline_count(&self, discipline: &str) -> XfResult<f64> {
        self.bar_value(self.discipline.group, &Key::from(discipline))
    }

    /// Points of a scatter chart, empty for other charts
    ///
    /// Points whose record left the active set are dropped unless the
    /// configuration keeps empty points.
    pub fn scatter_points(&self, chart: Chart) -> XfResult<Vec<ScatterPoint>> {
        let Some(scatter) = self.scatter(chart) else {
            return Ok(Vec::new());
        };
        let group = self.xf.get_group(scatter.points.group)?;
        let store = self.xf.store();

        let points = group
            .entries()
            .filter_map(|(key, count)| {
                let point = key.as_point()?;
                let record = store.get(point.record)?;
                if *count == 0 && !self.config.include_empty_points {
                    return None;
                }
                Some(ScatterPoint {
                    x: point.x,
                    y: point.y,
                    record: point.record,
                    title: format!("{} earned {}", record.rank, record.salary),
                    color: record.sex,
                    count: group.reducer().value(count),
                })
            })
            .collect();
        Ok(points)
    }

    /// Horizontal domain of a scatter chart
    #[must_use]
    pub fn extent(&self, chart: Chart) -> Option<AxisExtent> {
        self.scatter(chart).and_then(|s| s.extent)
    }

    /// Current filter of a chart
    pub fn filter(&self, chart: Chart) -> XfResult<Option<&Filter>> {
        self.xf.filter(self.chart_dimension(chart))
    }

    /// Snapshot every chart
    pub fn state(&self) -> XfResult<DashboardState> {
        let mut filters = Vec::new();
        for chart in Chart::ALL.into_iter().filter(|c| c.is_selectable()) {
            if let Some(filter) = self.filter(chart)? {
                filters.push(ActiveFilter {
                    chart,
                    filter: filter.clone(),
                });
            }
        }

        let percent_professors = self
            .percent
            .iter()
            .map(|&(sex, handle)| {
                self.xf
                    .group_all_value(handle)
                    .map(|value| PercentDisplay::new(sex, value))
            })
            .collect::<XfResult<Vec<_>>>()?;

        let rank_distribution = self
            .rank_series
            .iter()
            .map(|&(rank, handle)| {
                self.xf.get_group(handle).map(|group| StackedSeries {
                    rank,
                    label: rank.legend_label().to_string(),
                    values: series(group),
                })
            })
            .collect::<XfResult<Vec<_>>>()?;

        Ok(DashboardState {
            generation: self.xf.generation(),
            passing: self.xf.passing_count(),
            total: self.xf.store().len(),
            filters,
            discipline: series(self.xf.get_group(self.discipline.group)?),
            percent_professors,
            gender_balance: series(self.xf.get_group(self.gender.group)?),
            average_salary: series(self.xf.get_group(self.average.group)?),
            rank_distribution,
            service_salary: self.scatter_state(Chart::ServiceSalary)?,
            phd_salary: self.scatter_state(Chart::PhdSalary)?,
        })
    }

    /// Configuration the dashboard was built with
    #[inline]
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Underlying coordinator
    #[inline]
    #[must_use]
    pub fn crossfilter(&self) -> &Crossfilter {
        &self.xf
    }

    fn selectable(&self, chart: Chart) -> XfResult<DimensionId> {
        if chart.is_selectable() {
            Ok(self.chart_dimension(chart))
        } else {
            Err(XfError::NotSelectable(chart.to_string()))
        }
    }

    fn chart_dimension(&self, chart: Chart) -> DimensionId {
        match chart {
            Chart::Discipline => self.discipline.dimension,
            Chart::GenderBalance => self.gender.dimension,
            Chart::AverageSalary => self.average.dimension,
            Chart::RankDistribution => self.ranks,
            Chart::ServiceSalary => self.service.points.dimension,
            Chart::PhdSalary => self.phd.points.dimension,
        }
    }

    fn scatter(&self, chart: Chart) -> Option<&Scatter> {
        match chart {
            Chart::ServiceSalary => Some(&self.service),
            Chart::PhdSalary => Some(&self.phd),
            _ => None,
        }
    }

    fn scatter_state(&self, chart: Chart) -> XfResult<ScatterState> {
        let x_label = self.scatter(chart).map_or("", |s| s.x_label);
        Ok(ScatterState {
            x_label: x_label.to_string(),
            y_label: "Salary".to_string(),
            extent: self.extent(chart),
            points: self.scatter_points(chart)?,
        })
    }

    fn bar_value<R: Reducer>(&self, handle: GroupHandle<R>, key: &Key) -> XfResult<f64> {
        Ok(self.xf.get_group(handle)?.value(key).unwrap_or(0.0))
    }
}

fn sex_key(sex: Sex) -> Key {
    Key::from(sex.as_str())
}

fn series<R: Reducer>(group: &Group<R>) -> Vec<SeriesEntry> {
    group
        .all()
        .into_iter()
        .map(|entry| SeriesEntry {
            key: entry.key.to_string(),
            value: entry.value,
        })
        .collect()
}

fn build_bars<R: Reducer>(xf: &mut Crossfilter, field: Field, reducer: R) -> XfResult<Bars<R>> {
    let dimension = xf.dimension(DimensionSpec::Field(field))?;
    let group = xf.group(dimension, reducer)?;
    Ok(Bars { dimension, group })
}

fn build_scatter(xf: &mut Crossfilter, field: Field, x_label: &'static str) -> XfResult<Scatter> {
    let axis = xf.dimension(DimensionSpec::Field(field))?;
    let dimension = xf.dimension(DimensionSpec::Point { x: field, y: Field::Salary })?;
    let group = xf.count_group(dimension)?;

    let value_of = |ids: Vec<xf_record::RecordId>| {
        ids.first()
            .and_then(|&id| xf.store().get(id))
            .and_then(|record| field.measure(record).value())
    };
    let extent = match (value_of(xf.bottom(axis, 1)?), value_of(xf.top(axis, 1)?)) {
        (Some(min), Some(max)) => Some(AxisExtent { min, max }),
        _ => None,
    };

    Ok(Scatter {
        points: Bars { dimension, group },
        extent,
        x_label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use xf_record::Record;

    fn dashboard() -> SalaryDashboard {
        let store = RecordStore::new(vec![
            Record::new("A", Sex::Male, Rank::Prof, 100, 10, 8),
            Record::new("A", Sex::Male, Rank::AsstProf, 200, 3, 2),
            Record::new("B", Sex::Female, Rank::Prof, 150, 20, 15),
        ])
        .unwrap();
        SalaryDashboard::new(Arc::new(store), DashboardConfig::default()).unwrap()
    }

    #[test]
    fn percent_professors_per_sex() {
        let d = dashboard();
        assert_eq!(d.percent_professors(Sex::Male), Some(0.5));
        assert_eq!(d.percent_professors(Sex::Female), Some(1.0));

        let state = d.state().unwrap();
        let shown: Vec<_> = state.percent_professors.iter().map(|p| p.display.as_str()).collect();
        assert_eq!(shown, vec!["100.00%", "50.00%"]);
    }

    #[test]
    fn own_selection_keeps_own_bars() {
        let mut d = dashboard();
        d.select(Chart::GenderBalance, "Female").unwrap();

        assert_eq!(d.gender_count(Sex::Male).unwrap(), 2.0);
        assert_eq!(d.average_salary(Sex::Male).unwrap(), 0.0);
        assert_eq!(d.rank_series(Rank::Prof, Sex::Male).unwrap(), 0.0);
        assert_eq!(d.rank_series(Rank::Prof, Sex::Female).unwrap(), 1.0);
        assert_eq!(d.discipline_count("A").unwrap(), 0.0);
    }

    #[test]
    fn scatter_points_follow_filters() {
        let mut d = dashboard();
        let points = d.scatter_points(Chart::ServiceSalary).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].title, "AsstProf earned 200");
        assert_eq!(points[0].x, xf_record::Measure::Value(2));

        d.select(Chart::Discipline, "B").unwrap();
        let points = d.scatter_points(Chart::PhdSalary).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].color, Sex::Female);
        assert_eq!(d.extent(Chart::PhdSalary), Some(AxisExtent { min: 3, max: 20 }));
    }

    #[test]
    fn scatter_charts_reject_selection() {
        let mut d = dashboard();
        assert!(matches!(
            d.select(Chart::ServiceSalary, "3"),
            Err(XfError::NotSelectable(ref c)) if c == "service-salary"
        ));
        assert!(d.scatter_points(Chart::Discipline).unwrap().is_empty());
    }
}
