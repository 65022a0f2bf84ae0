use std::str::FromStr;

use rust_decimal::Decimal;

use crate::domain::cost::cost_error::CostError;
use crate::domain::cost::model::CostMetric;

pub struct CostUtil;

impl CostUtil {
    /// Parses a Cost Explorer amount string. Tiny amounts come back in
    /// scientific notation (e.g. `1.2E-7`).
    pub fn parse_amount(metric: CostMetric, raw: &str) -> Result<Decimal, CostError> {
        let trimmed = raw.trim();
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| CostError::MalformedAmount {
                metric,
                amount: raw.to_string(),
            })
    }
}
