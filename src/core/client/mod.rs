// AWS Cost Explorer client
pub mod cost_explorer_client;
pub mod cost_reporter_trait;
pub mod mappers;
