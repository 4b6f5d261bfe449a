use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use booking_cell::{Booking, BookingService};
use shared_database::SupabaseClient;

use crate::models::{AvailabilityView, CatalogError, Service};
use crate::services::catalog::CatalogService;

pub struct AvailabilityService {
    catalog: CatalogService,
    bookings: BookingService,
}

impl AvailabilityService {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self {
            catalog: CatalogService::new(supabase.clone()),
            bookings: BookingService::new(supabase),
        }
    }

    /// Open and taken slots of every service on `date`.
    pub async fn availability_on(&self, date: NaiveDate) -> Result<Vec<AvailabilityView>, CatalogError> {
        let services = self.catalog.list_services().await?;
        let bookings = self.bookings.find_by_date(date).await?;

        debug!("Computing availability on {} from {} services and {} bookings",
               date, services.len(), bookings.len());

        Ok(compute_availability(services, &bookings))
    }
}

/// Splits each service's slot list into open and taken slots.
///
/// Output keeps catalog order, and both lists keep the order of the
/// service's own slot list. A booked slot that the service does not offer
/// is ignored, so `slots` and `booked` always partition the service's slot list.
pub fn compute_availability(services: Vec<Service>, bookings: &[Booking]) -> Vec<AvailabilityView> {
    services
        .into_iter()
        .map(|service| {
            let taken: HashSet<&str> = bookings
                .iter()
                .filter(|booking| booking.treatment == service.name)
                .map(|booking| booking.slot.as_str())
                .collect();

            let (booked, slots): (Vec<String>, Vec<String>) = service
                .slots
                .into_iter()
                .partition(|slot| taken.contains(slot.as_str()));

            AvailabilityView {
                id: service.id,
                name: service.name,
                price: service.price,
                slots,
                booked,
            }
        })
        .collect()
}
