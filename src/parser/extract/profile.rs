use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, ScrapeError};
use crate::parser::dom;

static IMG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());
static H4: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h4").unwrap());
static BR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("br").unwrap());

const NBSP: char = '\u{a0}';

/// Fields read off a profile page before any normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProfile {
    pub full_name: String,
    /// Site-relative photo path; empty when the page has none.
    pub image_path: String,
    pub degree_text: String,
}

/// Selector for the paragraph holding the degree label.
pub fn degree_marker(marker_class: &str) -> Result<Selector> {
    dom::selector(&format!("p.{}", marker_class))
}

pub fn extract(doc: &Html, container_id: &str, marker: &Selector) -> Result<RawProfile> {
    let container = dom::find_by_id(doc, container_id).ok_or_else(|| {
        ScrapeError::structure(format!("profile page has no element with id {:?}", container_id))
    })?;

    let image_path = dom::first(container, &IMG)
        .and_then(|img| img.value().attr("src"))
        .unwrap_or_default()
        .to_string();

    let full_name = dom::first(container, &H4)
        .map(dom::text_of)
        .ok_or_else(|| ScrapeError::structure("profile has no <h4> name heading"))?;

    let degree_text = degree_fragment(container, marker)?;

    Ok(RawProfile {
        full_name,
        image_path,
        degree_text,
    })
}

/// `<p class=marker>…<br>LABEL&nbsp;rest…</p>` → `LABEL`
fn degree_fragment(container: ElementRef, marker: &Selector) -> Result<String> {
    let para = dom::first(container, marker)
        .ok_or_else(|| ScrapeError::structure("profile has no degree paragraph"))?;
    let br = dom::first(para, &BR)
        .ok_or_else(|| ScrapeError::structure("degree paragraph has no <br>"))?;
    let text = dom::next_text_sibling(br)
        .ok_or_else(|| ScrapeError::structure("no text after <br> in degree paragraph"))?;

    let label = text.split_once(NBSP).map_or(text, |(head, _)| head);
    Ok(label.to_string())
}
