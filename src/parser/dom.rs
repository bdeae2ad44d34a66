//! Small typed queries over a parsed document. Each returns `Option` so that
//! callers decide which absences are structural errors.

use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, ScrapeError};

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::Config(format!("bad selector {:?}: {}", css, e)))
}

/// First element (in document order) whose `id` attribute equals `id`.
pub fn find_by_id<'a>(doc: &'a Html, id: &str) -> Option<ElementRef<'a>> {
    doc.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().id() == Some(id))
}

/// First descendant of `el` matching `sel`, excluding `el` itself.
pub fn first<'a>(el: ElementRef<'a>, sel: &Selector) -> Option<ElementRef<'a>> {
    el.select(sel).next()
}

pub fn text_of(el: ElementRef) -> String {
    el.text().collect()
}

/// The node right after `el`, provided it is a text node.
pub fn next_text_sibling<'a>(el: ElementRef<'a>) -> Option<&'a str> {
    el.next_sibling()?.value().as_text().map(|t| &**t)
}
