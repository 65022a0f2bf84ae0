//! Cost summary pipeline: normalization and orchestration

pub mod cost_summary_service;
pub mod row_normalizer;

#[cfg(test)]
pub(crate) mod test_support;
