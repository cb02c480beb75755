//! Nightscout Integration
//!
//! Read-only access to a Nightscout site: glucose entries, treatments,
//! the pump profile, and closed-loop device status.

mod client;
mod types;

pub use client::{
    hash_api_secret, NightscoutClient, NightscoutConfig, NightscoutError, API_SECRET_HEADER,
    DEFAULT_DEVICE_STATUS_COUNT, DEFAULT_ENTRY_COUNT, DEFAULT_TREATMENT_COUNT,
};
pub use types::{sgv, LoopSnapshot, ProfilePayload, Record, LOOP_FIELD, SGV_FIELD};
