use rivulet::{BehaviorSubject, Observable};

/// The tenant id every [`TenantSettingsService`] starts with.
pub const INITIAL_TENANT_ID: &str = "my-initial-id";

/// Settings of the currently selected tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TenantSettings {
    pub tenant_id: String,
}

impl TenantSettings {
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
        }
    }
}

/// Holds the selected tenant and announces every change.
///
/// Clones share the same selection.
#[derive(Debug, Clone)]
pub struct TenantSettingsService {
    subject: BehaviorSubject<TenantSettings>,
}

impl Default for TenantSettingsService {
    fn default() -> Self {
        Self::new()
    }
}

impl TenantSettingsService {
    pub fn new() -> Self {
        Self {
            subject: BehaviorSubject::new(TenantSettings::new(INITIAL_TENANT_ID)),
        }
    }

    /// Selects `tenant_id` and pushes the new settings to every subscriber.
    pub fn change_tenant(&self, tenant_id: impl Into<String>) {
        let settings = TenantSettings::new(tenant_id);
        #[cfg(feature = "tracing")]
        tracing::debug!(tenant_id = %settings.tenant_id, "tenant changed");
        self.subject.next(settings);
    }

    /// The current settings first, then every change. Never completes.
    pub fn tenant_settings_changes(&self) -> Observable<TenantSettings> {
        self.subject.as_observable()
    }

    pub fn current(&self) -> TenantSettings {
        self.subject.value()
    }
}
