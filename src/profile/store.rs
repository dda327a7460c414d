use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// The business profile collected by the onboarding form.
///
/// One flat record, persisted wholesale under a single path. The default
/// record is the well-known initial value restored on reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessProfile {
    pub company_name: String,
    pub industry: String,
    pub about: String,
    pub services: String,
    pub location: String,
    pub faq: String,
    pub agent_name: String,
}

impl Default for BusinessProfile {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            industry: String::new(),
            about: String::new(),
            services: String::new(),
            location: String::new(),
            faq: String::new(),
            agent_name: "Eva".to_string(),
        }
    }
}

/// Field-wise patch applied by the form; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub about: Option<String>,
    pub services: Option<String>,
    pub location: Option<String>,
    pub faq: Option<String>,
    pub agent_name: Option<String>,
}

/// Filesystem-backed profile store.
///
/// An explicit handle injected into whoever needs profile access; persistence
/// is a load-at-startup/save-on-change pair at this boundary, never ambient
/// global state. Session credentials are never written here.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load the persisted profile, or the default record when none exists.
    pub fn load(&self) -> Result<BusinessProfile> {
        if !self.path.exists() {
            return Ok(BusinessProfile::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read profile from {:?}", self.path))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse profile at {:?}", self.path))
    }

    /// Overwrite the stored record wholesale.
    pub fn save(&self, profile: &BusinessProfile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create profile directory {:?}", parent))?;
            }
        }

        let contents = serde_json::to_string_pretty(profile)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write profile to {:?}", self.path))?;

        info!("Profile saved to {:?}", self.path);

        Ok(())
    }

    /// Apply a field-wise update and persist the merged record.
    pub fn update(&self, update: ProfileUpdate) -> Result<BusinessProfile> {
        let mut profile = self.load()?;

        if let Some(v) = update.company_name {
            profile.company_name = v;
        }
        if let Some(v) = update.industry {
            profile.industry = v;
        }
        if let Some(v) = update.about {
            profile.about = v;
        }
        if let Some(v) = update.services {
            profile.services = v;
        }
        if let Some(v) = update.location {
            profile.location = v;
        }
        if let Some(v) = update.faq {
            profile.faq = v;
        }
        if let Some(v) = update.agent_name {
            profile.agent_name = v;
        }

        self.save(&profile)?;

        Ok(profile)
    }

    /// Restore the exact default record.
    pub fn reset(&self) -> Result<BusinessProfile> {
        let profile = BusinessProfile::default();
        self.save(&profile)?;
        Ok(profile)
    }
}
