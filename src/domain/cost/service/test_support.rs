//! Fixtures and in-memory fakes shared by the cost tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::core::client::cost_reporter_trait::CostReporter;
use crate::core::persistence::cost::aws_cost_collector_repository_trait::AwsCostCollectorRepository;
use crate::core::persistence::cost::aws_cost_entity::AwsCostEntity;
use crate::domain::cost::cost_error::CostError;
use crate::domain::cost::model::{
    CostQuery, CostReport, Group, GroupDefinition, MetricValue, ResultByTime, TimeRange,
};

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn sample_window() -> TimeRange {
    TimeRange::new(date("2025-04-12"), date("2025-09-28"))
}

pub fn sample_query() -> CostQuery {
    CostQuery::service_breakdown(sample_window())
}

fn metric(amount: &str, unit: Option<&str>) -> MetricValue {
    MetricValue {
        amount: amount.into(),
        unit: unit.map(str::to_string),
    }
}

/// Group carrying all tracked metrics with the EC2 amounts.
pub fn group(keys: &[&str]) -> Group {
    let mut metrics = BTreeMap::new();
    metrics.insert("AmortizedCost".to_string(), metric("10.50", Some("USD")));
    metrics.insert("BlendedCost".to_string(), metric("10.50", None));
    metrics.insert("UnblendedCost".to_string(), metric("11.00", None));
    metrics.insert("UsageQuantity".to_string(), metric("5", Some("Hrs")));
    Group {
        keys: keys.iter().map(|k| k.to_string()).collect(),
        metrics,
    }
}

/// One daily bucket per entry, starting 2025-04-12.
pub fn report_with_buckets(buckets: Vec<Vec<Group>>) -> CostReport {
    let first = date("2025-04-12");
    CostReport {
        group_definitions: vec![GroupDefinition::dimension("SERVICE")],
        results_by_time: buckets
            .into_iter()
            .enumerate()
            .map(|(i, groups)| {
                let start = first + chrono::Days::new(i as u64);
                ResultByTime {
                    time_period: TimeRange::new(start, start + chrono::Days::new(1)),
                    total: BTreeMap::new(),
                    groups,
                    estimated: false,
                }
            })
            .collect(),
    }
}

/// One bucket with an EC2 and an S3 group.
pub fn sample_report() -> CostReport {
    report_with_buckets(vec![vec![group(&["EC2"]), group(&["S3"])]])
}

pub struct StaticReporter {
    pub report: CostReport,
    pub calls: Mutex<Vec<CostQuery>>,
}

impl StaticReporter {
    pub fn new(report: CostReport) -> Self {
        Self {
            report,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CostReporter for StaticReporter {
    async fn fetch(&self, query: &CostQuery) -> Result<CostReport, CostError> {
        self.calls.lock().unwrap().push(query.clone());
        Ok(self.report.clone())
    }
}

pub struct FailingReporter {
    make_error: fn() -> CostError,
}

impl FailingReporter {
    pub fn new(make_error: fn() -> CostError) -> Self {
        Self { make_error }
    }
}

#[async_trait]
impl CostReporter for FailingReporter {
    async fn fetch(&self, _query: &CostQuery) -> Result<CostReport, CostError> {
        Err((self.make_error)())
    }
}

#[derive(Default)]
pub struct InMemoryState {
    pub database_exists: bool,
    pub table_exists: bool,
    pub databases_created: usize,
    pub tables_created: usize,
    pub rows: Vec<AwsCostEntity>,
}

/// Mirrors the Postgres adapter's create-if-absent semantics in memory.
#[derive(Default)]
pub struct InMemoryCostRepository {
    pub state: Mutex<InMemoryState>,
    pub fail_inserts: bool,
}

impl InMemoryCostRepository {
    pub fn failing_inserts() -> Self {
        Self {
            fail_inserts: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl AwsCostCollectorRepository for InMemoryCostRepository {
    async fn ensure_database(&self) -> Result<bool, CostError> {
        let mut state = self.state.lock().unwrap();
        if state.database_exists {
            return Ok(false);
        }
        state.database_exists = true;
        state.databases_created += 1;
        Ok(true)
    }

    async fn ensure_table(&self) -> Result<(), CostError> {
        let mut state = self.state.lock().unwrap();
        if !state.table_exists {
            state.table_exists = true;
            state.tables_created += 1;
        }
        Ok(())
    }

    async fn insert_rows(&self, rows: &[AwsCostEntity]) -> Result<u64, CostError> {
        if self.fail_inserts {
            return Err(CostError::PersistenceError(
                "connection reset by peer".to_string(),
            ));
        }
        let mut state = self.state.lock().unwrap();
        state.rows.extend_from_slice(rows);
        Ok(rows.len() as u64)
    }
}
