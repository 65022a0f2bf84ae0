//! HTTP layer: routes, controllers and response DTOs

pub mod controller;
pub mod dto;
pub mod routes;
pub mod util;
