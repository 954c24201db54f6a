//! Name lookups the renderers call back into.
//!
//! Channel and tenant names are not part of the dashboard snapshot, so the
//! caller hands in a capability that resolves them. Implementations may cache
//! or hit the network; renderers only see the returned name.

use std::collections::HashMap;

use thiserror::Error;

use crate::domain::dashboard::{ChannelId, TenantId};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("no {kind} found with id `{id}`")]
    NotFound { kind: &'static str, id: String },
    #[error("{kind} lookup failed: {message}")]
    Unavailable { kind: &'static str, message: String },
}

pub trait ChannelLookup: Send + Sync {
    fn channel_name(&self, space_id: &str, channel_id: &ChannelId) -> Result<String, LookupError>;
}

pub trait TenantLookup: Send + Sync {
    fn tenant_name(&self, tenant_id: &TenantId) -> Result<String, LookupError>;
}

impl<F> ChannelLookup for F
where
    F: Fn(&str, &ChannelId) -> Result<String, LookupError> + Send + Sync,
{
    fn channel_name(&self, space_id: &str, channel_id: &ChannelId) -> Result<String, LookupError> {
        self(space_id, channel_id)
    }
}

impl<F> TenantLookup for F
where
    F: Fn(&TenantId) -> Result<String, LookupError> + Send + Sync,
{
    fn tenant_name(&self, tenant_id: &TenantId) -> Result<String, LookupError> {
        self(tenant_id)
    }
}

/// In-memory id → name directory, used when names arrive alongside the snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameDirectory {
    channels: HashMap<String, String>,
    tenants: HashMap<String, String>,
}

impl NameDirectory {
    pub fn new(channels: HashMap<String, String>, tenants: HashMap<String, String>) -> Self {
        Self { channels, tenants }
    }

    pub fn with_channel(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.channels.insert(id.into(), name.into());
        self
    }

    pub fn with_tenant(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.tenants.insert(id.into(), name.into());
        self
    }
}

impl ChannelLookup for NameDirectory {
    fn channel_name(&self, _space_id: &str, channel_id: &ChannelId) -> Result<String, LookupError> {
        self.channels
            .get(channel_id.as_str())
            .cloned()
            .ok_or_else(|| LookupError::NotFound { kind: "channel", id: channel_id.to_string() })
    }
}

impl TenantLookup for NameDirectory {
    fn tenant_name(&self, tenant_id: &TenantId) -> Result<String, LookupError> {
        self.tenants
            .get(tenant_id.as_str())
            .cloned()
            .ok_or_else(|| LookupError::NotFound { kind: "tenant", id: tenant_id.to_string() })
    }
}
