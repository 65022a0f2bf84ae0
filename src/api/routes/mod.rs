//! API route declarations

pub mod cost_routes;
