//! Storage contract for payment methods and payments.

use std::future::Future;

use crate::entities::{NewPayment, Payment, PaymentMethod};
use crate::error::Result;

/// Persistence operations backing payment processing.
pub trait PaymentRepository: Send + Sync {
    /// All supported payment methods.
    fn payment_methods(&self) -> impl Future<Output = Result<Vec<PaymentMethod>>> + Send;

    /// Looks a payment method up by primary key.
    fn payment_method_by_id(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<PaymentMethod>>> + Send;

    /// Records a payment and returns its id.
    fn create_payment(&self, payment: NewPayment) -> impl Future<Output = Result<i64>> + Send;

    /// The payment recorded for `booking_id`, if any.
    fn payment_by_booking(
        &self,
        booking_id: i64,
    ) -> impl Future<Output = Result<Option<Payment>>> + Send;
}
