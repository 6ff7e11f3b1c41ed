use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Budget symbol must not be empty")]
    EmptyBudget,

    #[error("Invalid minimum rating: {0}")]
    InvalidRating(String),

    #[error("Invalid search radius: {0}")]
    InvalidRadius(String),
}

/// Raised when a card cannot hand a URL to the device. The message is the alert shown to the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinkError {
    #[error("Sorry, we don't have the address for this restaurant.")]
    AddressUnavailable,

    #[error("Sorry, we don't have the phone number for this restaurant.")]
    PhoneUnavailable,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid filters: {0}")]
    InvalidFilters(#[from] FilterError),

    #[error("No card at index {0}")]
    CardNotFound(usize),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::InvalidFilters { .. } => StatusCode::BAD_REQUEST,
            AppError::CardNotFound { .. } => StatusCode::NOT_FOUND,
        };

        (status, self.to_string()).into_response()
    }
}
