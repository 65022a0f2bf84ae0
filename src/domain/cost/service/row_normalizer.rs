use crate::core::persistence::cost::aws_cost_entity::AwsCostEntity;
use crate::core::util::cost_util::CostUtil;
use crate::domain::cost::cost_error::CostError;
use crate::domain::cost::model::{CostMetric, CostReport, Group, MetricValue, ResultByTime};

/// Flattens every group of every time bucket into one row.
///
/// Only the first grouping key becomes `service_name`; any further keys of a
/// multi-dimension grouping are dropped. Rows are not deduplicated across
/// buckets. Aborts on the first group with a missing metric or an amount that
/// does not parse, so callers never see a partial batch.
pub fn normalize(report: &CostReport) -> Result<Vec<AwsCostEntity>, CostError> {
    let mut rows = Vec::with_capacity(report.group_count());

    for bucket in &report.results_by_time {
        for group in &bucket.groups {
            rows.push(normalize_group(bucket, group)?);
        }
    }

    Ok(rows)
}

fn normalize_group(bucket: &ResultByTime, group: &Group) -> Result<AwsCostEntity, CostError> {
    let service_name = group
        .keys
        .first()
        .cloned()
        .ok_or(CostError::MissingGroupKey {
            bucket: bucket.time_period.start,
        })?;

    let amortized = tracked_metric(group, &service_name, CostMetric::AmortizedCost)?;
    let blended = tracked_metric(group, &service_name, CostMetric::BlendedCost)?;
    let unblended = tracked_metric(group, &service_name, CostMetric::UnblendedCost)?;
    let usage = tracked_metric(group, &service_name, CostMetric::UsageQuantity)?;

    Ok(AwsCostEntity {
        amortized_cost: CostUtil::parse_amount(CostMetric::AmortizedCost, &amortized.amount)?,
        blended_cost: CostUtil::parse_amount(CostMetric::BlendedCost, &blended.amount)?,
        unblended_cost: CostUtil::parse_amount(CostMetric::UnblendedCost, &unblended.amount)?,
        usage_quantity: CostUtil::parse_amount(CostMetric::UsageQuantity, &usage.amount)?,
        unit: amortized.unit.clone().unwrap_or_default(),
        service_name,
    })
}

fn tracked_metric<'a>(
    group: &'a Group,
    service_name: &str,
    metric: CostMetric,
) -> Result<&'a MetricValue, CostError> {
    group.metric(metric).ok_or_else(|| CostError::MissingMetric {
        service: service_name.to_string(),
        metric,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cost::service::test_support::{group, report_with_buckets, sample_report};
    use rust_decimal::dec;

    #[test]
    fn two_groups_become_two_rows() {
        let rows = normalize(&sample_report()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].service_name, "EC2");
        assert_eq!(rows[0].amortized_cost, dec!(10.50));
        assert_eq!(rows[0].blended_cost, dec!(10.50));
        assert_eq!(rows[0].unblended_cost, dec!(11.00));
        assert_eq!(rows[0].usage_quantity, dec!(5));
        assert_eq!(rows[0].unit, "USD");
        assert_eq!(rows[1].service_name, "S3");
    }

    #[test]
    fn yields_one_row_per_bucket_and_group() {
        let buckets = vec![
            vec![group(&["EC2"]), group(&["S3"]), group(&["RDS"])],
            vec![group(&["EC2"]), group(&["S3"]), group(&["RDS"])],
        ];
        let rows = normalize(&report_with_buckets(buckets)).unwrap();

        assert_eq!(rows.len(), 6);
        let names: Vec<_> = rows.iter().map(|r| r.service_name.as_str()).collect();
        assert_eq!(names, vec!["EC2", "S3", "RDS", "EC2", "S3", "RDS"]);
    }

    #[test]
    fn only_first_group_key_is_used() {
        let report = report_with_buckets(vec![vec![group(&["EC2", "ca-central-1"])]]);
        let rows = normalize(&report).unwrap();
        assert_eq!(rows[0].service_name, "EC2");
    }

    #[test]
    fn missing_metric_aborts_whole_batch() {
        let mut broken = group(&["S3"]);
        broken.metrics.remove("UsageQuantity");
        let report = report_with_buckets(vec![vec![group(&["EC2"]), broken]]);

        let err = normalize(&report).unwrap_err();
        assert!(matches!(
            err,
            CostError::MissingMetric { ref service, metric: CostMetric::UsageQuantity } if service == "S3"
        ));
    }

    #[test]
    fn malformed_amount_aborts_whole_batch() {
        let mut broken = group(&["EC2"]);
        broken
            .metrics
            .get_mut("BlendedCost")
            .unwrap()
            .amount = "ten".into();
        let report = report_with_buckets(vec![vec![broken]]);

        assert!(matches!(
            normalize(&report),
            Err(CostError::MalformedAmount { metric: CostMetric::BlendedCost, .. })
        ));
    }

    #[test]
    fn group_without_keys_is_an_error() {
        let report = report_with_buckets(vec![vec![group(&[])]]);
        assert!(matches!(
            normalize(&report),
            Err(CostError::MissingGroupKey { .. })
        ));
    }

    #[test]
    fn ungrouped_report_yields_no_rows() {
        let report = report_with_buckets(vec![vec![], vec![]]);
        assert!(normalize(&report).unwrap().is_empty());
    }
}
