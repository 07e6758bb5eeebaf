use std::sync::Arc;

use postbox_domain::{ErrorRecord, FreeBlockCollection, RequestDescriptor};

use crate::api::ApiService;

/// Typed access to the schedule records.
///
/// The free-block route is deployment specific, so callers pass it in.
pub struct ScheduleService {
    api: Arc<ApiService>,
}

impl ScheduleService {
    pub fn new(api: Arc<ApiService>) -> Self {
        Self { api }
    }

    /// Free blocks for one day, `None` on failure.
    pub async fn get_free_blocks(
        &self,
        endpoint: &str,
        on_error: impl FnOnce(ErrorRecord),
    ) -> Option<FreeBlockCollection> {
        self.api.send(&RequestDescriptor::get(endpoint), on_error).await
    }
}
