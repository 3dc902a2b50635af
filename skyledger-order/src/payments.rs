use std::collections::HashMap;

use skyledger_core::flight::Flight;
use skyledger_core::payment::Payment;
use skyledger_core::snapshot::{SnapshotStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("insufficient funds: balance {balance}, price {price}")]
    InsufficientFunds { balance: f64, price: f64 },

    #[error("storage failure: {0}")]
    Store(#[from] StoreError),
}

/// Owner of customer wallets and the append-only payment list. Wallets are
/// keyed by login key and live here exclusively; nothing else mutates a
/// balance. Balances are session state: a customer who has never paid sits
/// at the configured starting allowance.
pub struct PaymentLedger {
    payments: Vec<Payment>,
    wallets: HashMap<String, f64>,
    starting_allowance: f64,
    store: Box<dyn SnapshotStore<Payment>>,
}

impl PaymentLedger {
    pub fn open(
        store: Box<dyn SnapshotStore<Payment>>,
        starting_allowance: f64,
    ) -> Result<Self, PaymentError> {
        let payments = store.load()?;
        Ok(Self {
            payments,
            wallets: HashMap::new(),
            starting_allowance,
            store,
        })
    }

    pub fn balance(&self, login_key: &str) -> f64 {
        self.wallets
            .get(login_key)
            .copied()
            .unwrap_or(self.starting_allowance)
    }

    /// Debit the customer by exactly the flight's price and record the
    /// payment. Fails with no state change when the balance is short.
    pub fn charge(&mut self, login_key: &str, flight: &Flight) -> Result<Payment, PaymentError> {
        let balance = self.balance(login_key);
        if balance < flight.price {
            return Err(PaymentError::InsufficientFunds {
                balance,
                price: flight.price,
            });
        }

        self.wallets
            .insert(login_key.to_string(), balance - flight.price);
        let payment = Payment::new(login_key, flight.id, flight.price);
        self.payments.push(payment.clone());
        self.store.save(&self.payments)?;

        tracing::info!(
            "Payment recorded: {} charged {} for flight {}",
            login_key,
            flight.price,
            flight.id
        );
        Ok(payment)
    }

    /// Compensating action for a charge whose follow-up booking failed:
    /// credits the wallet back and appends a reversal row. The ledger stays
    /// append-only; the original charge row is untouched.
    pub fn refund(&mut self, payment: &Payment) -> Result<Payment, PaymentError> {
        let balance = self.balance(&payment.customer);
        self.wallets
            .insert(payment.customer.clone(), balance + payment.amount);
        let reversal = payment.reversal();
        self.payments.push(reversal.clone());
        self.store.save(&self.payments)?;

        tracing::info!(
            "Payment refunded: {} credited {} (reversal of {})",
            payment.customer,
            payment.amount,
            payment.id
        );
        Ok(reversal)
    }

    pub fn list_payments(&self, customer: Option<&str>) -> Vec<&Payment> {
        self.payments
            .iter()
            .filter(|p| customer.map_or(true, |c| p.customer == c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyledger_core::flight::{Flight, FlightSpec};
    use skyledger_core::snapshot::MemoryStore;

    fn flight(price: f64) -> Flight {
        Flight::new(
            FlightSpec {
                flight_number: "SL1".to_string(),
                origin: "CAI".to_string(),
                destination: "DXB".to_string(),
                price,
                date: "2026-09-01".to_string(),
                departure_time: "10:30".to_string(),
                duration: "03:45".to_string(),
                airline: "Skyledger Air".to_string(),
                seat_count: Some(2),
            },
            150,
        )
    }

    fn ledger(allowance: f64) -> PaymentLedger {
        PaymentLedger::open(Box::new(MemoryStore::new()), allowance).unwrap()
    }

    #[test]
    fn charge_debits_exactly_the_price() {
        let mut ledger = ledger(500.0);
        let f = flight(200.0);

        let payment = ledger.charge("nora@example.com", &f).unwrap();
        assert_eq!(payment.amount, 200.0);
        assert_eq!(payment.flight_id, f.id);
        assert_eq!(ledger.balance("nora@example.com"), 300.0);
        assert_eq!(ledger.list_payments(Some("nora@example.com")).len(), 1);
    }

    #[test]
    fn short_balance_fails_with_no_state_change() {
        let mut ledger = ledger(150.0);
        let f = flight(200.0);

        let err = ledger.charge("nora@example.com", &f).unwrap_err();
        assert!(matches!(err, PaymentError::InsufficientFunds { .. }));
        assert_eq!(ledger.balance("nora@example.com"), 150.0);
        assert!(ledger.list_payments(None).is_empty());
    }

    #[test]
    fn balance_exactly_equal_to_price_is_accepted() {
        let mut ledger = ledger(200.0);
        ledger.charge("nora@example.com", &flight(200.0)).unwrap();
        assert_eq!(ledger.balance("nora@example.com"), 0.0);
    }

    #[test]
    fn refund_credits_wallet_and_appends_reversal() {
        let mut ledger = ledger(500.0);
        let payment = ledger.charge("nora@example.com", &flight(200.0)).unwrap();

        let reversal = ledger.refund(&payment).unwrap();
        assert_eq!(reversal.amount, -200.0);
        assert_ne!(reversal.id, payment.id);
        assert_eq!(ledger.balance("nora@example.com"), 500.0);
        // Both the charge and the reversal stay in the ledger.
        assert_eq!(ledger.list_payments(None).len(), 2);
    }

    #[test]
    fn list_payments_filters_by_customer() {
        let mut ledger = ledger(1000.0);
        let f = flight(100.0);
        ledger.charge("a@example.com", &f).unwrap();
        ledger.charge("b@example.com", &f).unwrap();

        assert_eq!(ledger.list_payments(Some("a@example.com")).len(), 1);
        assert_eq!(ledger.list_payments(None).len(), 2);
    }

    #[test]
    fn payments_survive_reopen_but_wallets_reset() {
        let store = MemoryStore::new();
        let mut ledger =
            PaymentLedger::open(Box::new(store.clone()), 500.0).unwrap();
        ledger.charge("nora@example.com", &flight(200.0)).unwrap();

        let reopened = PaymentLedger::open(Box::new(store), 500.0).unwrap();
        assert_eq!(reopened.list_payments(None).len(), 1);
        assert_eq!(reopened.balance("nora@example.com"), 500.0);
    }
}
