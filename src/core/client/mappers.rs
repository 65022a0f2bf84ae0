use std::collections::BTreeMap;
use std::collections::HashMap;

use aws_sdk_costexplorer::operation::get_cost_and_usage::GetCostAndUsageOutput;
use aws_sdk_costexplorer::types as sdk;
use chrono::NaiveDate;

use crate::domain::cost::cost_error::CostError;
use crate::domain::cost::model::{
    CostReport, Granularity, Group, GroupDefinition, GroupType, MetricValue, ResultByTime,
    TimeRange, DATE_FORMAT,
};

pub fn to_sdk_granularity(granularity: Granularity) -> sdk::Granularity {
    match granularity {
        Granularity::Daily => sdk::Granularity::Daily,
        Granularity::Monthly => sdk::Granularity::Monthly,
        Granularity::Hourly => sdk::Granularity::Hourly,
    }
}

pub fn to_sdk_group_definition(group: &GroupDefinition) -> sdk::GroupDefinition {
    let group_type = match group.group_type {
        GroupType::Dimension => sdk::GroupDefinitionType::Dimension,
        GroupType::Tag => sdk::GroupDefinitionType::Tag,
        GroupType::CostCategory => sdk::GroupDefinitionType::CostCategory,
    };
    sdk::GroupDefinition::builder()
        .r#type(group_type)
        .key(&group.key)
        .build()
}

/// Maps the SDK output onto the domain report.
///
/// Metrics the service returned without an amount are left out, so they show
/// up as missing during normalization instead of as zero.
pub fn map_cost_and_usage_output(output: &GetCostAndUsageOutput) -> Result<CostReport, CostError> {
    let group_definitions = output
        .group_definitions()
        .iter()
        .filter_map(map_group_definition)
        .collect();

    let results_by_time = output
        .results_by_time()
        .iter()
        .map(map_result_by_time)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CostReport {
        group_definitions,
        results_by_time,
    })
}

fn map_group_definition(group: &sdk::GroupDefinition) -> Option<GroupDefinition> {
    let group_type = match group.r#type()? {
        sdk::GroupDefinitionType::Dimension => GroupType::Dimension,
        sdk::GroupDefinitionType::Tag => GroupType::Tag,
        sdk::GroupDefinitionType::CostCategory => GroupType::CostCategory,
        _ => return None,
    };
    Some(GroupDefinition {
        group_type,
        key: group.key()?.to_string(),
    })
}

fn map_result_by_time(result: &sdk::ResultByTime) -> Result<ResultByTime, CostError> {
    let interval = result.time_period().ok_or_else(|| {
        CostError::UpstreamError("result bucket without a time period".to_string())
    })?;

    Ok(ResultByTime {
        time_period: TimeRange::new(parse_date(interval.start())?, parse_date(interval.end())?),
        total: result.total().map(map_metrics).unwrap_or_default(),
        groups: result
            .groups()
            .iter()
            .map(|group| Group {
                keys: group.keys().to_vec(),
                metrics: group.metrics().map(map_metrics).unwrap_or_default(),
            })
            .collect(),
        estimated: result.estimated(),
    })
}

fn map_metrics(metrics: &HashMap<String, sdk::MetricValue>) -> BTreeMap<String, MetricValue> {
    metrics
        .iter()
        .filter_map(|(name, value)| {
            let amount = value.amount()?;
            Some((
                name.clone(),
                MetricValue {
                    amount: amount.to_string(),
                    unit: value.unit().map(str::to_string),
                },
            ))
        })
        .collect()
}

fn parse_date(raw: &str) -> Result<NaiveDate, CostError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| CostError::UpstreamError(format!("unexpected date in report: {raw}")))
}
