use config::{Config, Environment};
use serde::Deserialize;

use crate::error::{Result, ScrapeError};

pub const DEFAULT_BASE_URL: &str = "http://www.bseu.by/PersonalPages/alphabetic.htm";
pub const DEFAULT_PROFILE_PREFIX: &str = "http://www.bseu.by";
pub const DEFAULT_INDEX_CONTAINER_ID: &str = "Pages";
pub const DEFAULT_PROFILE_CONTAINER_ID: &str = "persinfo";
pub const DEFAULT_DEGREE_MARKER_CLASS: &str = "noIndnt";
pub const DEFAULT_IMAGE: &str = "https://mytimetable.live/images/man-user.png";

const ENV_PREFIX: &str = "BSEU";

/// What the pipeline does when a single profile fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// First failure aborts the whole run.
    #[default]
    Abort,
    /// Failures are recorded and the run continues.
    Collect,
}

/// Run configuration. Built once, never mutated afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub profile_prefix: String,
    pub index_container_id: String,
    pub profile_container_id: String,
    pub degree_marker_class: String,
    pub default_image: String,
    pub jobs: usize,
    pub error_policy: ErrorPolicy,
}

/// Values supplied on the command line; `None` leaves the lower layers in charge.
#[derive(Debug, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub profile_prefix: Option<String>,
    pub jobs: Option<usize>,
    pub keep_going: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            profile_prefix: DEFAULT_PROFILE_PREFIX.to_string(),
            index_container_id: DEFAULT_INDEX_CONTAINER_ID.to_string(),
            profile_container_id: DEFAULT_PROFILE_CONTAINER_ID.to_string(),
            degree_marker_class: DEFAULT_DEGREE_MARKER_CLASS.to_string(),
            default_image: DEFAULT_IMAGE.to_string(),
            jobs: 1,
            error_policy: ErrorPolicy::Abort,
        }
    }
}

impl Settings {
    /// Layer defaults, `BSEU_*` environment variables and CLI overrides, in that order.
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("profile_prefix", DEFAULT_PROFILE_PREFIX)?
            .set_default("index_container_id", DEFAULT_INDEX_CONTAINER_ID)?
            .set_default("profile_container_id", DEFAULT_PROFILE_CONTAINER_ID)?
            .set_default("degree_marker_class", DEFAULT_DEGREE_MARKER_CLASS)?
            .set_default("default_image", DEFAULT_IMAGE)?
            .set_default("jobs", 1_i64)?
            .set_default("error_policy", "abort")?
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .set_override_option("base_url", overrides.base_url.clone())?
            .set_override_option("profile_prefix", overrides.profile_prefix.clone())?
            .set_override_option("jobs", overrides.jobs.map(|j| j as i64))?;

        if overrides.keep_going {
            builder = builder.set_override("error_policy", "collect")?;
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            return Err(ScrapeError::Config("jobs must be at least 1".into()));
        }
        if self.base_url.trim().is_empty() {
            return Err(ScrapeError::Config("base_url is empty".into()));
        }
        Ok(())
    }

    /// Absolute URL of a profile page from an index link suffix.
    pub fn profile_url(&self, suffix: &str) -> String {
        format!("{}{}", self.profile_prefix, suffix)
    }
}
