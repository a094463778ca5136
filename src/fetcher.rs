use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rand::seq::SliceRandom;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, FetchError};
use crate::settings::USER_AGENTS;
use crate::toc;

/// What to download and where to put it.
#[derive(Debug, Clone)]
pub struct FetchPlan {
    pub table_of_contents_url: String,
    /// Cached copy of the table of contents.
    pub table_of_contents_path: PathBuf,
    pub database: PathBuf,
    pub refetch: bool,
    pub delay: Duration,
    pub start: Option<usize>,
    pub end: Option<usize>,
}

/// Fetch stats returned after completion.
#[derive(Debug)]
pub struct FetchStats {
    pub available: usize,
    pub downloaded: usize,
}

pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    /// GET `url` and return the body. Anything but 200 is an error.
    pub async fn get(&self, url: &str) -> Result<String, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "text/html; charset=utf-8")
            .header(USER_AGENT, random_user_agent())
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            debug!("Response body for {}: {}", url, body);
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().await.map_err(transport)
    }

    /// Download `url` into `path`.
    pub async fn download(&self, url: &str, path: &Path) -> Result<()> {
        let body = match self.get(url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to download {}: {}", url, e);
                return Err(e.into());
            }
        };
        tokio::fs::write(path, body)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// Download chapters `start..end` of the table of contents one at a time,
/// sleeping `plan.delay` between requests. The first failure aborts the run.
pub async fn fetch_chapters(fetcher: &Fetcher, plan: &FetchPlan) -> Result<FetchStats> {
    if plan.refetch || !plan.table_of_contents_path.is_file() {
        info!("Fetching table of contents: {}", plan.table_of_contents_url);
        fetcher
            .download(&plan.table_of_contents_url, &plan.table_of_contents_path)
            .await?;
    }

    let html = tokio::fs::read_to_string(&plan.table_of_contents_path)
        .await
        .with_context(|| format!("Failed to read {}", plan.table_of_contents_path.display()))?;
    let urls = toc::chapter_urls(&html);
    info!("Chapters in table of contents: {}", urls.len());

    let start = plan.start.unwrap_or(0);
    let end = plan.end.unwrap_or(urls.len());
    if start > end || end > urls.len() {
        return Err(ConfigError::ChapterRange {
            start,
            end,
            available: urls.len(),
        }
        .into());
    }

    let pb = ProgressBar::new((end - start) as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} (eta {eta})")?
            .progress_chars("=> "),
    );

    for (i, url) in urls.iter().enumerate().take(end).skip(start) {
        info!("Downloading i: {} - {}", i, url);
        let path = plan.database.join(toc::chapter_file_name(i, url));
        fetcher.download(url, &path).await?;
        pb.inc(1);

        if i + 1 < end {
            tokio::time::sleep(plan.delay).await;
        }
    }

    pb.finish_and_clear();
    Ok(FetchStats {
        available: urls.len(),
        downloaded: end - start,
    })
}

// ── Tests ──
