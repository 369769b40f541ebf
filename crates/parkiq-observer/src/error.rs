//! Error types for the ParkIQ HTTP layer.
//!
//! [`ApiError`] converts facility rejections into the
//! `{"success": false, "message": ...}` body the dashboard expects.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use parkiq_core::FacilityError;

/// Errors that can be returned by a ParkIQ HTTP handler.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The facility rejected the operation.
    #[error(transparent)]
    Facility(#[from] FacilityError),
}

impl ApiError {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Facility(FacilityError::CapacityExceeded { .. } | FacilityError::Underflow) => {
                StatusCode::BAD_REQUEST
            }
            Self::Facility(
                FacilityError::InvalidCapacity | FacilityError::OccupancyOutOfRange { .. },
            ) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "success": false,
            "message": self.to_string(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_bad_requests() {
        let full = ApiError::from(FacilityError::CapacityExceeded { capacity: 3 });
        assert_eq!(full.status(), StatusCode::BAD_REQUEST);
        assert_eq!(full.to_string(), "Parking is full");

        let empty = ApiError::from(FacilityError::Underflow);
        assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
        assert_eq!(empty.to_string(), "Parking is empty");
    }
}
