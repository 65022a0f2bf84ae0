pub mod cost_error;
pub mod model;
pub mod service;
