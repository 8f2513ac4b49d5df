//! Desired-state reconciliation for IBM DS8000 storage arrays.
//!
//! Sits between `ds8k-api` and the CLI:
//!
//! - **[`Array`]** validates an [`ArrayConfig`] and returns a logged-in
//!   client.
//!
//! - **[`Reconciler`]** drives hosts, host ports, volumes, CKD aliases,
//!   volume mappings, logical subsystems and resource groups toward a
//!   requested `present` / `absent` state, honouring check mode.
//!
//! - **[`Inventory`]** answers read-only queries, applying the same
//!   filters the managers use.
//!
//! Both are generic over the capability traits in [`backend`], so the
//! reconciliation logic runs unchanged against an in-memory fake.
//! Every operation returns an [`Outcome`] that renders into a [`Report`].

pub mod alias;
pub mod backend;
pub mod config;
pub mod error;
pub mod ids;
pub mod info;
pub mod lookup;
pub mod manager;
pub mod outcome;
pub mod session;
pub mod state;

// ── Primary re-exports ──────────────────────────────────────────────
pub use alias::{AliasOrder, AliasPlan, plan_aliases};
pub use backend::{
    ApiResult, ArrayApi, HostApi, HostPortApi, LssApi, MappingApi, MarrayApi, PoolApi,
    ResourceGroupApi, VolumeApi,
};
pub use config::{ArrayConfig, TlsVerification};
pub use error::CoreError;
pub use ids::{LssId, VolumeId, Wwpn};
pub use info::{HostPortFilter, Inventory, LssFilter, ResourceGroupFilter, VolumeFilter};
pub use manager::{
    AliasSpec, AllocationMethod, CapacityType, CuType, DEFAULT_HOST_TYPE, HostPortSpec, HostSpec,
    LssSpec, MAX_VOLUME_QUANTITY, MappingSpec, Reconciler, ResourceGroupRef, ResourceGroupSpec,
    StorageType, VolumeSelector, VolumeSpec,
};
pub use outcome::{ItemMessage, Outcome, Report, interpret_batch};
pub use session::Array;
pub use state::DesiredState;

// API representations surface unchanged as facts.
pub use ds8k_api::models;
