use rust_decimal::Decimal;
use serde::Serialize;

/// One flattened row of the `aws_costs` table (one per report group).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AwsCostEntity {
    /// First grouping key of the group (the service name when grouping by SERVICE).
    pub service_name: String,
    pub amortized_cost: Decimal,
    pub blended_cost: Decimal,
    pub unblended_cost: Decimal,
    pub usage_quantity: Decimal,
    /// Currency unit reported with the amortized cost.
    pub unit: String,
}
