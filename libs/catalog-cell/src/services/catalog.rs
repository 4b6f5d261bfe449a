use std::sync::Arc;

use tracing::debug;

use shared_database::SupabaseClient;

use crate::models::{CatalogError, Service, ServiceSummary};

/// Read-only access to the `services` table. Rows are seeded out-of-band;
/// catalog order is ascending id.
pub struct CatalogService {
    supabase: Arc<SupabaseClient>,
}

impl CatalogService {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    pub async fn list_services(&self) -> Result<Vec<Service>, CatalogError> {
        debug!("Fetching service catalog");
        let services = self.supabase.select("/rest/v1/services?order=id.asc").await?;
        Ok(services)
    }

    pub async fn list_service_summaries(&self) -> Result<Vec<ServiceSummary>, CatalogError> {
        debug!("Fetching service names");
        let services = self.supabase.select("/rest/v1/services?select=id,name&order=id.asc").await?;
        Ok(services)
    }
}
