use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use shared_database::{eq_filter, prefer_headers, DbError, SupabaseClient};

use crate::models::{
    Booking, BookingError, BookingRecord, CreateBookingResponse, MarkPaidRequest, NewBooking,
};

/// Matches the unique index on (treatment, patient_email, date).
const BOOKING_CONFLICT_TARGET: &str = "treatment,patient_email,date";

pub struct BookingService {
    supabase: Arc<SupabaseClient>,
}

impl BookingService {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// Inserts the booking unless the patient already holds one for the same
    /// treatment and date.
    ///
    /// Duplicate detection happens in the store: the insert carries
    /// `on_conflict` against the unique index and is ignored on a clash, so
    /// two concurrent identical requests cannot both insert. A clash with
    /// another patient's booking of the same slot violates the second unique
    /// index and comes back as `SlotTaken`.
    pub async fn create_booking(&self, request: NewBooking) -> Result<CreateBookingResponse, BookingError> {
        request.validate()?;
        debug!("Creating booking for {} ({} on {} at {})",
               request.patient_email, request.treatment, request.date, request.slot);

        let booking_data = json!({
            "patient": request.patient.trim(),
            "patient_email": request.patient_email,
            "date": request.date.format("%Y-%m-%d").to_string(),
            "slot": request.slot,
            "treatment": request.treatment,
            "price": request.price,
            "paid": false,
            "created_at": Utc::now().to_rfc3339()
        });

        let path = format!("/rest/v1/bookings?on_conflict={}", BOOKING_CONFLICT_TARGET);
        let inserted: Vec<BookingRecord> = self.supabase.request_with_headers(
            Method::POST,
            &path,
            Some(booking_data),
            Some(prefer_headers("resolution=ignore-duplicates,return=representation")),
        ).await.map_err(|e| match e {
            DbError::Conflict(_) => BookingError::SlotTaken {
                treatment: request.treatment.clone(),
                date: request.date,
                slot: request.slot.clone(),
            },
            other => BookingError::Database(other),
        })?;

        if let Some(record) = inserted.into_iter().next() {
            let booking = Booking::from(record);
            info!("Booking {} created for {}", booking.id, booking.patient_email);
            return Ok(CreateBookingResponse { created: true, booking });
        }

        // Insert was ignored: the patient already has this treatment on this date
        let existing = self
            .find_existing(&request.treatment, &request.patient_email, request.date)
            .await?
            .ok_or_else(|| {
                warn!("Booking insert ignored but no matching row found for {}", request.patient_email);
                BookingError::Database(DbError::Api {
                    status: 500,
                    message: "conflicting booking could not be loaded".to_string(),
                })
            })?;

        debug!("Booking already exists: {}", existing.id);
        Ok(CreateBookingResponse { created: false, booking: existing })
    }

    pub async fn find_existing(
        &self,
        treatment: &str,
        patient_email: &str,
        date: NaiveDate,
    ) -> Result<Option<Booking>, BookingError> {
        let path = format!(
            "/rest/v1/bookings?treatment={}&patient_email={}&date={}&limit=1",
            eq_filter(treatment),
            eq_filter(patient_email),
            eq_filter(&date.format("%Y-%m-%d").to_string()),
        );

        let rows: Vec<BookingRecord> = self.supabase.select(&path).await?;
        Ok(rows.into_iter().next().map(Booking::from))
    }

    pub async fn find_by_patient(&self, patient_email: &str) -> Result<Vec<Booking>, BookingError> {
        debug!("Fetching bookings for patient: {}", patient_email);

        let path = format!(
            "/rest/v1/bookings?patient_email={}&order=date.asc,created_at.asc",
            eq_filter(patient_email)
        );
        let rows: Vec<BookingRecord> = self.supabase.select(&path).await?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }

    /// Every booking on `date`, across all treatments, in one query.
    pub async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<Booking>, BookingError> {
        debug!("Fetching bookings on {}", date);

        let path = format!(
            "/rest/v1/bookings?date={}",
            eq_filter(&date.format("%Y-%m-%d").to_string())
        );
        let rows: Vec<BookingRecord> = self.supabase.select(&path).await?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }

    pub async fn find_by_id(&self, booking_id: Uuid) -> Result<Booking, BookingError> {
        let path = format!("/rest/v1/bookings?id=eq.{}", booking_id);
        let rows: Vec<BookingRecord> = self.supabase.select(&path).await?;

        rows.into_iter()
            .next()
            .map(Booking::from)
            .ok_or(BookingError::NotFound(booking_id))
    }

    /// Flags `booking` as paid, then records the payment.
    ///
    /// A booking is paid at most once. The update is conditional on
    /// `paid=false`, so of two concurrent requests only one matches a row;
    /// the other gets `AlreadyPaid`. The payment row is written only after
    /// the booking update succeeded.
    pub async fn mark_paid(&self, booking: &Booking, payment: MarkPaidRequest) -> Result<Booking, BookingError> {
        let transaction_id = payment.transaction_id.trim();
        if transaction_id.is_empty() {
            return Err(BookingError::ValidationError("transactionId is required".to_string()));
        }

        let booking_id = booking.id;
        if booking.paid {
            debug!("Booking {} already paid, rejecting transaction {}", booking_id, transaction_id);
            return Err(BookingError::AlreadyPaid(booking_id));
        }

        let path = format!("/rest/v1/bookings?id=eq.{}&paid=eq.false", booking_id);
        let updated: Vec<BookingRecord> = self.supabase.request_with_headers(
            Method::PATCH,
            &path,
            Some(json!({
                "paid": true,
                "transaction_id": transaction_id
            })),
            Some(prefer_headers("return=representation")),
        ).await?;

        let updated = updated
            .into_iter()
            .next()
            .map(Booking::from)
            .ok_or_else(|| {
                warn!("Booking {} was paid by a concurrent request", booking_id);
                BookingError::AlreadyPaid(booking_id)
            })?;

        let payment_data = json!({
            "booking_id": booking_id,
            "transaction_id": transaction_id,
            "patient_email": booking.patient_email,
            "amount": payment.amount.or(booking.price),
            "created_at": Utc::now().to_rfc3339()
        });

        // The booking already carries the transaction id, so a failed audit
        // insert is logged for reconciliation instead of failing the request.
        if let Err(e) = self.supabase.request_with_headers::<Vec<Value>>(
            Method::POST,
            "/rest/v1/payments",
            Some(payment_data),
            Some(prefer_headers("return=representation")),
        ).await {
            error!("Failed to record payment {} for booking {}: {}", transaction_id, booking_id, e);
        }

        info!("Booking {} marked paid (transaction {})", updated.id, transaction_id);
        Ok(updated)
    }
}
