//! Domain types and services

pub mod cost;
