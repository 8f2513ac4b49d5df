// ── Resource managers ──
//
// `Reconciler` owns a borrowed array handle for one operation. Each
// resource kind adds its `ensure_*` method in its own module, bounded
// only by the capability traits that kind needs.

mod host;
mod host_port;
mod lss;
mod mapping;
mod resource_group;
mod volume;

use std::future::Future;

use tracing::warn;

use crate::backend::ApiResult;
use crate::error::CoreError;

pub use host::{DEFAULT_HOST_TYPE, HostSpec};
pub use host_port::HostPortSpec;
pub use lss::{CuType, LssSpec};
pub use mapping::{MappingSpec, VolumeSelector};
pub use resource_group::{ResourceGroupRef, ResourceGroupSpec};
pub use volume::{
    AliasSpec, AllocationMethod, CapacityType, MAX_VOLUME_QUANTITY, StorageType, VolumeSpec,
};

/// Drives present/absent transitions against one array.
pub struct Reconciler<'a, C> {
    client: &'a C,
    check_mode: bool,
}

impl<'a, C> Reconciler<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self {
            client,
            check_mode: false,
        }
    }

    /// In check mode no mutating call is issued; outcomes still report
    /// `changed` as if it had been.
    pub fn check_mode(mut self, enabled: bool) -> Self {
        self.check_mode = enabled;
        self
    }

    pub fn is_check_mode(&self) -> bool {
        self.check_mode
    }

    /// Issue a mutating call unless in check mode. `context` describes
    /// the attempted change and prefixes the array's error text.
    async fn mutate<T, F>(
        &self,
        context: impl Into<String>,
        call: F,
    ) -> Result<Option<T>, CoreError>
    where
        F: Future<Output = ApiResult<T>>,
    {
        let context = context.into();
        if self.check_mode {
            warn!(%context, "check mode: skipping change");
            return Ok(None);
        }
        call.await
            .map(Some)
            .map_err(|e| CoreError::operation(context, &e))
    }
}

/// Reject blank required string parameters.
fn require<'s>(field: &str, value: &'s str) -> Result<&'s str, CoreError> {
    let value = value.trim();
    if value.is_empty() {
        Err(CoreError::validation(format!("{field} is required")))
    } else {
        Ok(value)
    }
}
