use std::sync::Arc;

use indicatif::ProgressBar;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::{ErrorPolicy, Settings};
use crate::error::{Result, ScrapeError};
use crate::fetch::PageSource;
use crate::parser::PageParser;
use crate::record::StaffRecord;

/// A profile that could not be turned into a record.
#[derive(Debug)]
pub struct ProfileFailure {
    /// Position of the link on the index page.
    pub index: usize,
    pub url: String,
    pub error: ScrapeError,
}

type Outcome = std::result::Result<StaffRecord, ProfileFailure>;

/// Everything a finished run produced, in index-page order.
#[derive(Debug)]
pub struct RunReport {
    pub links: usize,
    pub records: Vec<StaffRecord>,
    pub failures: Vec<ProfileFailure>,
}

/// Index page → profile pages → records.
pub struct Pipeline {
    parser: Arc<PageParser>,
    source: Arc<dyn PageSource>,
    progress: ProgressBar,
    pretty_records: bool,
}

impl Pipeline {
    /// Fails on settings that cannot be turned into selectors, before any request.
    pub fn new(settings: Settings, source: Arc<dyn PageSource>) -> Result<Self> {
        Ok(Self {
            parser: Arc::new(PageParser::new(settings)?),
            source,
            progress: ProgressBar::hidden(),
            pretty_records: false,
        })
    }

    fn settings(&self) -> &Settings {
        self.parser.settings()
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Log records with `{:#?}` instead of `{:?}`.
    pub fn pretty_records(mut self, pretty: bool) -> Self {
        self.pretty_records = pretty;
        self
    }

    pub async fn run(&self) -> Result<RunReport> {
        let links = self.fetch_index().await?;
        info!(
            "{} staff members found. Starting accumulating data...",
            links.len()
        );

        self.progress.set_length(links.len() as u64);
        let outcomes = if self.settings().jobs > 1 {
            self.fetch_concurrent(&links).await
        } else {
            self.fetch_sequential(&links).await
        };
        self.progress.finish_and_clear();

        let mut report = RunReport {
            links: links.len(),
            records: Vec::with_capacity(links.len()),
            failures: Vec::new(),
        };
        for outcome in outcomes? {
            match outcome {
                Ok(record) => report.records.push(record),
                Err(failure) => report.failures.push(failure),
            }
        }
        Ok(report)
    }

    async fn fetch_index(&self) -> Result<Vec<String>> {
        let url = &self.settings().base_url;
        info!("Fetching staff list from {}", url);
        let body = self.source.fetch_text(url).await?;
        self.parser.process_index(&body).map_err(|e| e.at(url))
    }

    /// One request in flight at a time, strictly in index order.
    async fn fetch_sequential(&self, links: &[String]) -> Result<Vec<Outcome>> {
        let mut outcomes = Vec::with_capacity(links.len());
        for (index, link) in links.iter().enumerate() {
            let outcome = fetch_profile(self.source.as_ref(), &self.parser, index, link).await;
            self.progress.inc(1);
            outcomes.push(self.settle(outcome)?);
        }
        Ok(outcomes)
    }

    /// Up to `jobs` requests in flight; results land in their index slot.
    async fn fetch_concurrent(&self, links: &[String]) -> Result<Vec<Outcome>> {
        let semaphore = Arc::new(Semaphore::new(self.settings().jobs));
        let mut tasks = JoinSet::new();

        for (index, link) in links.iter().cloned().enumerate() {
            let source = Arc::clone(&self.source);
            let parser = Arc::clone(&self.parser);
            let sem = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = sem.acquire_owned().await;
                let outcome = fetch_profile(source.as_ref(), &parser, index, &link).await;
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<Outcome>> = (0..links.len()).map(|_| None).collect();
        // Returning early drops the JoinSet, which aborts the remaining tasks.
        while let Some(joined) = tasks.join_next().await {
            let (index, outcome) = joined?;
            self.progress.inc(1);
            slots[index] = Some(self.settle(outcome)?);
        }

        Ok(slots.into_iter().flatten().collect())
    }

    /// Apply the error policy to one outcome.
    fn settle(&self, outcome: Outcome) -> Result<Outcome> {
        match outcome {
            Ok(record) => {
                debug!("Fetched a staff member: {}", record.last_name);
                if self.pretty_records {
                    debug!("{:#?}", record);
                } else {
                    debug!("{:?}", record);
                }
                Ok(Ok(record))
            }
            Err(failure) => match self.settings().error_policy {
                ErrorPolicy::Abort => Err(failure.error),
                ErrorPolicy::Collect => {
                    warn!(
                        "Skipping staff member #{} ({}): {}",
                        failure.index + 1,
                        failure.url,
                        failure.error
                    );
                    Ok(Err(failure))
                }
            },
        }
    }
}

async fn fetch_profile(
    source: &dyn PageSource,
    parser: &PageParser,
    index: usize,
    link: &str,
) -> Outcome {
    let url = parser.settings().profile_url(link);
    debug!("Fetching the staff member #{} from {}", index + 1, url);

    let result = match source.fetch_text(&url).await {
        Ok(body) => parser.process_profile(&body, &url),
        Err(e) => Err(e),
    };
    result.map_err(|error| ProfileFailure { index, url, error })
}
