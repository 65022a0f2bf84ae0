//! Response envelopes

use serde::Serialize;

/// `{"status": "success", "data": ...}` envelope for successful responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}
