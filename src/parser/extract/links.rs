use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::error::{Result, ScrapeError};
use crate::parser::dom;

static ANCHOR_WITH_HREF: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Profile links from the index page container, in document order.
pub fn extract(doc: &Html, container_id: &str) -> Result<Vec<String>> {
    let container = dom::find_by_id(doc, container_id).ok_or_else(|| {
        ScrapeError::structure(format!("index page has no element with id {:?}", container_id))
    })?;

    let links = container
        .select(&ANCHOR_WITH_HREF)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect();

    Ok(links)
}
