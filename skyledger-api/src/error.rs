use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use skyledger_catalog::CatalogError;
use skyledger_core::identity::IdentityError;
use skyledger_order::bookings::BookingError;
use skyledger_order::orchestrator::PurchaseError;
use skyledger_order::payments::PaymentError;
use skyledger_order::tickets::TicketError;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    AuthorizationError(String),
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    PaymentRequired(String),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::PaymentRequired(msg) => (StatusCode::PAYMENT_REQUIRED, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::DuplicateLoginKey(_) => Self::ConflictError(err.to_string()),
            IdentityError::InvalidCredentials => Self::AuthenticationError(err.to_string()),
            IdentityError::Store(e) => Self::InternalServerError(e.to_string()),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Forbidden => Self::AuthorizationError(err.to_string()),
            CatalogError::FlightNotFound(_) => Self::NotFoundError(err.to_string()),
            CatalogError::Store(e) => Self::InternalServerError(e.to_string()),
        }
    }
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::InsufficientFunds { .. } => Self::PaymentRequired(err.to_string()),
            PaymentError::Store(e) => Self::InternalServerError(e.to_string()),
        }
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::FlightNotFound(_)
            | BookingError::SeatNotFound(_)
            | BookingError::BookingNotFound(_) => Self::NotFoundError(err.to_string()),
            BookingError::SeatAlreadyReserved(_) => Self::ConflictError(err.to_string()),
            BookingError::Store(e) => Self::InternalServerError(e.to_string()),
        }
    }
}

impl From<PurchaseError> for AppError {
    fn from(err: PurchaseError) -> Self {
        match err {
            PurchaseError::FlightNotFound(_) => Self::NotFoundError(err.to_string()),
            PurchaseError::Payment(payment_err) => payment_err.into(),
            PurchaseError::BookingFailed(booking_err) => booking_err.into(),
            PurchaseError::CompensationFailed { booking, refund } => Self::InternalServerError(
                format!("booking failed and the refund also failed: {}; {}", booking, refund),
            ),
        }
    }
}

impl From<TicketError> for AppError {
    fn from(err: TicketError) -> Self {
        match err {
            TicketError::BookingNotFound(_) | TicketError::FlightNotFound(_) => {
                Self::NotFoundError(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn domain_errors_map_to_the_expected_statuses() {
        let conflict: AppError =
            BookingError::SeatAlreadyReserved("S1".to_string()).into();
        assert_eq!(conflict.into_response().status(), StatusCode::CONFLICT);

        let payment: AppError = PaymentError::InsufficientFunds {
            balance: 150.0,
            price: 200.0,
        }
        .into();
        assert_eq!(
            payment.into_response().status(),
            StatusCode::PAYMENT_REQUIRED
        );

        let forbidden: AppError = CatalogError::Forbidden.into();
        assert_eq!(forbidden.into_response().status(), StatusCode::FORBIDDEN);

        let missing: AppError = PurchaseError::FlightNotFound(Uuid::new_v4()).into();
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);

        let credentials: AppError = IdentityError::InvalidCredentials.into();
        assert_eq!(
            credentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
