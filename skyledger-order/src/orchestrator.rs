use serde::Serialize;
use uuid::Uuid;

use skyledger_catalog::FlightRegistry;
use skyledger_core::booking::Booking;
use skyledger_core::identity::Identity;
use skyledger_core::payment::Payment;

use crate::bookings::{BookingError, BookingLedger};
use crate::payments::{PaymentError, PaymentLedger};

/// Outcome of a completed purchase: the charge and the booking it paid for.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseReceipt {
    pub payment: Payment,
    pub booking: Booking,
}

#[derive(Debug, thiserror::Error)]
pub enum PurchaseError {
    #[error("flight not found: {0}")]
    FlightNotFound(Uuid),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error("booking failed, payment refunded: {0}")]
    BookingFailed(#[source] BookingError),

    #[error("booking failed and the refund also failed: {booking}; {refund}")]
    CompensationFailed {
        booking: BookingError,
        refund: PaymentError,
    },
}

/// Drives the two-step purchase protocol: pay first, then reserve. The two
/// writes hit independent stores, so a crash between them can leave a
/// paid-but-unbooked state; within a running process a booking failure is
/// compensated by refunding the charge.
pub struct PurchaseOrchestrator;

impl PurchaseOrchestrator {
    pub fn purchase(
        customer: &Identity,
        payments: &mut PaymentLedger,
        registry: &mut FlightRegistry,
        bookings: &mut BookingLedger,
        flight_id: Uuid,
        seat_no: &str,
    ) -> Result<PurchaseReceipt, PurchaseError> {
        // Price lookup before any money moves.
        let flight = registry
            .get(flight_id)
            .cloned()
            .ok_or(PurchaseError::FlightNotFound(flight_id))?;

        let payment = payments.charge(&customer.login_key, &flight)?;

        match bookings.create_booking(&customer.login_key, registry, flight_id, seat_no) {
            Ok(booking) => Ok(PurchaseReceipt { payment, booking }),
            Err(booking_err) => {
                tracing::warn!(
                    "Booking failed after charge, refunding payment {}: {}",
                    payment.id,
                    booking_err
                );
                match payments.refund(&payment) {
                    Ok(_) => Err(PurchaseError::BookingFailed(booking_err)),
                    Err(refund_err) => {
                        tracing::error!(
                            "Refund of payment {} failed: {}",
                            payment.id,
                            refund_err
                        );
                        Err(PurchaseError::CompensationFailed {
                            booking: booking_err,
                            refund: refund_err,
                        })
                    }
                }
            }
        }
    }
}
