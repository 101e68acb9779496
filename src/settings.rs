use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ApiError, FieldError};
use crate::models::{
    FooterConfig, FooterUpdate, InformasiConfig, InformasiUpdate, NavbarConfig, NavbarUpdate,
    SaranConfig, SaranUpdate,
};
use crate::repository::RepositoryState;

/// SiteSettings
///
/// The live value of every singleton config section. One instance per
/// process, owned by [`SettingsStore`].
#[derive(Debug, Clone, Default)]
pub struct SiteSettings {
    pub navbar: NavbarConfig,
    pub footer: FooterConfig,
    pub informasi: InformasiConfig,
    pub saran: SaranConfig,
}

/// ConfigSection
///
/// Contract of one singleton config type: its storage key, its
/// whitelisted patch type, and its slot inside [`SiteSettings`]. The
/// store's `get`/`update` are generic over this trait, so each section
/// shares one read/merge/validate/persist path.
pub trait ConfigSection: Clone + Default + Serialize + DeserializeOwned + Send + Sync {
    const KEY: &'static str;
    /// Human-readable name used in response messages.
    const DISPLAY_NAME: &'static str;
    type Patch: Send;

    fn apply(&mut self, patch: Self::Patch);
    fn validate(&self) -> Vec<FieldError>;
    fn slot(settings: &SiteSettings) -> &Self;
    fn slot_mut(settings: &mut SiteSettings) -> &mut Self;
}

macro_rules! config_section {
    ($ty:ty, $patch:ty, $slot:ident, $key:literal, $display:literal) => {
        impl ConfigSection for $ty {
            const KEY: &'static str = $key;
            const DISPLAY_NAME: &'static str = $display;
            type Patch = $patch;

            fn apply(&mut self, patch: Self::Patch) {
                <$ty>::apply(self, patch);
            }

            fn validate(&self) -> Vec<FieldError> {
                <$ty>::validate(self)
            }

            fn slot(settings: &SiteSettings) -> &Self {
                &settings.$slot
            }

            fn slot_mut(settings: &mut SiteSettings) -> &mut Self {
                &mut settings.$slot
            }
        }
    };
}

config_section!(NavbarConfig, NavbarUpdate, navbar, "navbar", "Navbar");
config_section!(FooterConfig, FooterUpdate, footer, "footer", "Footer");
config_section!(
    InformasiConfig,
    InformasiUpdate,
    informasi,
    "informasi",
    "Informasi"
);
config_section!(SaranConfig, SaranUpdate, saran, "saran", "Saran");

/// SettingsStore
///
/// Explicitly owned, lock-guarded home of the singleton config state.
/// Reads clone the current value; updates take the write lock, merge the
/// whitelisted patch, validate the merged result, persist it through the
/// repository, and only then swap it in. Concurrent updates serialize on
/// the lock; last writer wins, which is the accepted semantics for
/// low-traffic admin editing.
pub struct SettingsStore {
    state: RwLock<SiteSettings>,
    repo: RepositoryState,
}

/// SettingsState
///
/// The concrete type used to share the settings store across the
/// application state.
pub type SettingsState = Arc<SettingsStore>;

impl SettingsStore {
    /// Seeds the store at startup: each section loads its persisted row
    /// when one exists, otherwise its compiled-in defaults. A corrupt row
    /// falls back to defaults rather than blocking startup.
    pub async fn init(repo: RepositoryState) -> Result<Self, ApiError> {
        let settings = SiteSettings {
            navbar: Self::load_section::<NavbarConfig>(&repo).await?,
            footer: Self::load_section::<FooterConfig>(&repo).await?,
            informasi: Self::load_section::<InformasiConfig>(&repo).await?,
            saran: Self::load_section::<SaranConfig>(&repo).await?,
        };
        Ok(Self {
            state: RwLock::new(settings),
            repo,
        })
    }

    async fn load_section<C: ConfigSection>(repo: &RepositoryState) -> Result<C, ApiError> {
        let Some(value) = repo.load_setting(C::KEY).await? else {
            return Ok(C::default());
        };
        match serde_json::from_value(value) {
            Ok(section) => Ok(section),
            Err(e) => {
                tracing::warn!(key = C::KEY, "stored settings unreadable, using defaults: {e}");
                Ok(C::default())
            }
        }
    }

    /// Current state of one section. Never empty: defaults are seeded at
    /// init, so public reads always render something.
    pub async fn get<C: ConfigSection>(&self) -> C {
        C::slot(&*self.state.read().await).clone()
    }

    /// Whitelist shallow-merge of a partial update, validated on the
    /// merged result and persisted before it becomes visible to readers.
    pub async fn update<C: ConfigSection>(&self, patch: C::Patch) -> Result<C, ApiError> {
        let mut guard = self.state.write().await;

        let mut merged = C::slot(&guard).clone();
        merged.apply(patch);

        let errors = merged.validate();
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        self.repo
            .save_setting(C::KEY, &serde_json::to_value(&merged)?)
            .await?;
        *C::slot_mut(&mut guard) = merged.clone();
        Ok(merged)
    }
}
