//! Cost Explorer domain types (query window, metrics, grouping, report)

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Calendar date window of a cost query. Cost Explorer treats `end` as exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
#[validate(schema(function = "validate_time_range"))]
pub struct TimeRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn validate_time_range(range: &TimeRange) -> Result<(), ValidationError> {
    if range.start > range.end {
        let mut err = ValidationError::new("time_range_order");
        err.message = Some(
            format!(
                "start {} is after end {}",
                range.start.format(DATE_FORMAT),
                range.end.format(DATE_FORMAT)
            )
            .into(),
        );
        return Err(err);
    }
    Ok(())
}

/// Metric identifiers understood by `GetCostAndUsage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostMetric {
    AmortizedCost,
    BlendedCost,
    NetAmortizedCost,
    NetUnblendedCost,
    NormalizedUsageAmount,
    UnblendedCost,
    UsageQuantity,
}

impl CostMetric {
    pub const ALL: [CostMetric; 7] = [
        CostMetric::AmortizedCost,
        CostMetric::BlendedCost,
        CostMetric::NetAmortizedCost,
        CostMetric::NetUnblendedCost,
        CostMetric::NormalizedUsageAmount,
        CostMetric::UnblendedCost,
        CostMetric::UsageQuantity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CostMetric::AmortizedCost => "AmortizedCost",
            CostMetric::BlendedCost => "BlendedCost",
            CostMetric::NetAmortizedCost => "NetAmortizedCost",
            CostMetric::NetUnblendedCost => "NetUnblendedCost",
            CostMetric::NormalizedUsageAmount => "NormalizedUsageAmount",
            CostMetric::UnblendedCost => "UnblendedCost",
            CostMetric::UsageQuantity => "UsageQuantity",
        }
    }
}

impl fmt::Display for CostMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CostMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CostMetric::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown cost metric: {s}"))
    }
}

/// Ordered set of metrics; duplicates are dropped keeping the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricSet(Vec<CostMetric>);

impl MetricSet {
    pub fn new<I: IntoIterator<Item = CostMetric>>(metrics: I) -> Self {
        let mut set = Vec::new();
        for metric in metrics {
            if !set.contains(&metric) {
                set.push(metric);
            }
        }
        Self(set)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CostMetric> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn validate_metric_set(metrics: &MetricSet) -> Result<(), ValidationError> {
    if metrics.is_empty() {
        let mut err = ValidationError::new("metrics_empty");
        err.message = Some("at least one metric is required".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Granularity {
    Daily,
    Monthly,
    Hourly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupType {
    Dimension,
    Tag,
    CostCategory,
}

/// One `GroupBy` entry, e.g. `DIMENSION/SERVICE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroupDefinition {
    #[serde(rename = "Type")]
    pub group_type: GroupType,
    pub key: String,
}

impl GroupDefinition {
    pub fn dimension(key: impl Into<String>) -> Self {
        Self {
            group_type: GroupType::Dimension,
            key: key.into(),
        }
    }
}

/// Request-scoped parameters of one `GetCostAndUsage` call.
#[derive(Debug, Clone, Validate)]
pub struct CostQuery {
    #[validate(nested)]
    pub time_period: TimeRange,
    pub granularity: Granularity,
    #[validate(custom(function = "validate_metric_set"))]
    pub metrics: MetricSet,
    pub group_by: Vec<GroupDefinition>,
}

impl CostQuery {
    /// Daily breakdown of every known metric, grouped by service.
    pub fn service_breakdown(time_period: TimeRange) -> Self {
        Self {
            time_period,
            granularity: Granularity::Daily,
            metrics: MetricSet::new(CostMetric::ALL),
            group_by: vec![GroupDefinition::dimension("SERVICE")],
        }
    }
}

/// `{Amount, Unit}` pair as Cost Explorer returns it. Amounts stay strings until normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricValue {
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Group {
    pub keys: Vec<String>,
    pub metrics: BTreeMap<String, MetricValue>,
}

impl Group {
    pub fn metric(&self, metric: CostMetric) -> Option<&MetricValue> {
        self.metrics.get(metric.as_str())
    }
}

/// One time bucket of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResultByTime {
    pub time_period: TimeRange,
    #[serde(default)]
    pub total: BTreeMap<String, MetricValue>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub estimated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CostReport {
    #[serde(default)]
    pub group_definitions: Vec<GroupDefinition>,
    #[serde(default)]
    pub results_by_time: Vec<ResultByTime>,
}

impl CostReport {
    pub fn group_count(&self) -> usize {
        self.results_by_time.iter().map(|r| r.groups.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn reversed_time_range_fails_validation() {
        let range = TimeRange::new(date("2025-09-28"), date("2025-04-12"));
        assert!(range.validate().is_err());

        let same_day = TimeRange::new(date("2025-04-12"), date("2025-04-12"));
        assert!(same_day.validate().is_ok());
    }

    #[test]
    fn query_requires_metrics() {
        let mut query =
            CostQuery::service_breakdown(TimeRange::new(date("2025-04-12"), date("2025-09-28")));
        assert!(query.validate().is_ok());

        query.metrics = MetricSet::new([]);
        let errors = query.validate().unwrap_err();
        let field_errors = errors.field_errors();
        assert_eq!(field_errors["metrics"][0].code, "metrics_empty");
    }

    #[test]
    fn metric_set_serializes_as_name_list() {
        let set = MetricSet::new([CostMetric::AmortizedCost, CostMetric::UsageQuantity]);
        assert_eq!(
            serde_json::to_value(&set).unwrap(),
            json!(["AmortizedCost", "UsageQuantity"])
        );
    }

    #[test]
    fn query_validation_reaches_nested_time_range() {
        let query =
            CostQuery::service_breakdown(TimeRange::new(date("2025-09-28"), date("2025-04-12")));
        assert!(query.validate().is_err());
    }

    #[test]
    fn metric_set_keeps_first_occurrence_order() {
        let set = MetricSet::new([
            CostMetric::UsageQuantity,
            CostMetric::AmortizedCost,
            CostMetric::UsageQuantity,
        ]);
        let names: Vec<_> = set.iter().map(|m| m.as_str()).collect();
        assert_eq!(names, vec!["UsageQuantity", "AmortizedCost"]);
    }

    #[test]
    fn metric_names_parse_back() {
        for metric in CostMetric::ALL {
            assert_eq!(metric.as_str().parse::<CostMetric>().unwrap(), metric);
        }
        assert!("SavingsPlanCost".parse::<CostMetric>().is_err());
    }

    #[test]
    fn report_deserializes_from_cost_explorer_shape() {
        let raw = json!({
            "GroupDefinitions": [{ "Type": "DIMENSION", "Key": "SERVICE" }],
            "ResultsByTime": [{
                "TimePeriod": { "Start": "2025-04-12", "End": "2025-04-13" },
                "Total": {},
                "Groups": [{
                    "Keys": ["Amazon Simple Storage Service"],
                    "Metrics": {
                        "UnblendedCost": { "Amount": "0.0123", "Unit": "USD" }
                    }
                }],
                "Estimated": true
            }]
        });

        let report: CostReport = serde_json::from_value(raw).unwrap();
        assert_eq!(report.group_definitions, vec![GroupDefinition::dimension("SERVICE")]);
        assert_eq!(report.results_by_time.len(), 1);
        let bucket = &report.results_by_time[0];
        assert!(bucket.estimated);
        assert_eq!(bucket.time_period.start, date("2025-04-12"));
        assert_eq!(
            bucket.groups[0].metric(CostMetric::UnblendedCost).unwrap().amount,
            "0.0123"
        );
    }

    #[test]
    fn group_without_keys_is_rejected_at_deserialization() {
        let raw = json!({
            "ResultsByTime": [{
                "TimePeriod": { "Start": "2025-04-12", "End": "2025-04-13" },
                "Groups": [{ "Metrics": {} }]
            }]
        });

        assert!(serde_json::from_value::<CostReport>(raw).is_err());
    }
}
