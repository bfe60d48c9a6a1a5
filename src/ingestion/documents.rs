use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Crawler bookkeeping file living next to the page dumps.
const CRAWL_INDEX_FILE: &str = "scraped_urls.json";

/// One page as dumped by the portal crawler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawledDocument {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// Reads every crawled page of `dir`, in file name order.
///
/// Files that cannot be read or parsed are logged and skipped.
pub fn load_documents(dir: impl AsRef<Path>) -> Result<Vec<CrawledDocument>> {
    let dir = dir.as_ref();
    let mut paths: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("cannot list crawled documents in {:?}", dir))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension().is_some_and(|ext| ext == "json")
                && path.file_name().is_some_and(|name| name != CRAWL_INDEX_FILE)
        })
        .collect();
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let parsed = fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|raw| serde_json::from_str::<CrawledDocument>(&raw).map_err(Into::into));
        match parsed {
            Ok(document) => documents.push(document),
            Err(err) => warn!(path = %path.display(), error = %err, "crawled document skipped"),
        }
    }
    info!(dir = %dir.display(), documents = documents.len(), "crawled documents loaded");
    Ok(documents)
}
