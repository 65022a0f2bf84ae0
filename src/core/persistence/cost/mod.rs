pub mod aws_cost_collector_repository_trait;
pub mod aws_cost_entity;
pub mod aws_cost_pg_adapter;
pub mod aws_cost_repository;
pub mod cost_snapshot_fs_adapter;
