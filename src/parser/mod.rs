pub mod degree;
pub mod dom;
pub mod extract;
pub mod name;

use scraper::{Html, Selector};
use tracing::debug;

use crate::config::Settings;
use crate::error::Result;
use crate::record::StaffRecord;
use degree::DEGREE_UNKNOWN;
use extract::RawProfile;

/// Page-to-record passes for one run. Configured selectors are compiled once here.
pub struct PageParser {
    settings: Settings,
    degree_marker: Selector,
}

impl PageParser {
    pub fn new(settings: Settings) -> Result<Self> {
        let degree_marker = extract::profile::degree_marker(&settings.degree_marker_class)?;
        Ok(Self {
            settings,
            degree_marker,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Index page HTML → profile link suffixes.
    pub fn process_index(&self, body: &str) -> Result<Vec<String>> {
        let doc = Html::parse_document(body);
        extract::links::extract(&doc, &self.settings.index_container_id)
    }

    /// Two-pass pipeline: profile HTML → raw fields → normalized record.
    pub fn process_profile(&self, body: &str, url: &str) -> Result<StaffRecord> {
        let doc = Html::parse_document(body);
        extract::profile::extract(&doc, &self.settings.profile_container_id, &self.degree_marker)
            .and_then(|raw| self.build_record(raw, url))
            .map_err(|e| e.at(url))
    }

    fn build_record(&self, raw: RawProfile, url: &str) -> Result<StaffRecord> {
        let name = name::normalize_name(&raw.full_name)?;

        let degree = degree::normalize_degree(&raw.degree_text);
        if degree == DEGREE_UNKNOWN {
            debug!("Unrecognized degree {:?} at {}", raw.degree_text.trim(), url);
        }

        let img = if raw.image_path.is_empty() {
            self.settings.default_image.clone()
        } else {
            format!("{}{}", self.settings.profile_prefix, raw.image_path)
        };

        Ok(StaffRecord {
            last_name: name.last_name,
            first_name: name.first_name,
            middle_name: name.middle_name,
            img,
            degree,
        })
    }
}
