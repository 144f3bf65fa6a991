//! Headline extraction from a quote news page.

use reqwest::Url;
use scraper::{ElementRef, Html};
use thiserror::Error;

use crate::Headline;

/// Origin that relative Yahoo Finance links resolve against.
pub const YAHOO_ORIGIN: &str = "https://finance.yahoo.com";

/// Class carried by the child element of every linked story card.
pub const STORY_MARKER_CLASS: &str = "StretchedBox";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HeadlineError {
    #[error("document contains no qualifying headline anchors")]
    EmptyResult,
}

/// Finds `<a>` elements with a marker-classed child and turns them into
/// [`Headline`]s in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlineExtractor {
    origin: String,
    marker_class: String,
}

impl HeadlineExtractor {
    pub fn new(origin: impl Into<String>, marker_class: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            marker_class: marker_class.into(),
        }
    }

    pub fn yahoo() -> Self {
        Self::new(YAHOO_ORIGIN, STORY_MARKER_CLASS)
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn extract(&self, document: &str) -> Result<Vec<Headline>, HeadlineError> {
        let html = Html::parse_document(document);

        let headlines: Vec<Headline> = html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|element| element.value().name() == "a" && self.has_marker_child(*element))
            .map(|anchor| {
                let text = anchor.text().collect::<String>();
                let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
                let href = anchor.value().attr("href").unwrap_or_default();
                Headline::new(text, self.resolve(href))
            })
            .collect();

        if headlines.is_empty() {
            return Err(HeadlineError::EmptyResult);
        }
        Ok(headlines)
    }

    fn has_marker_child(&self, anchor: ElementRef<'_>) -> bool {
        anchor
            .children()
            .filter_map(ElementRef::wrap)
            .any(|child| child.value().classes().any(|class| class == self.marker_class))
    }

    /// Absolute links pass through as written; anything else is appended
    /// to the origin, keeping any path the origin carries.
    fn resolve(&self, href: &str) -> String {
        let href = href.trim();
        if Url::parse(href).is_ok() {
            return href.to_owned();
        }

        if let Some(authority) = href.strip_prefix("//") {
            let scheme = Url::parse(&self.origin)
                .map(|origin| origin.scheme().to_owned())
                .unwrap_or_else(|_| String::from("https"));
            return format!("{scheme}://{authority}");
        }

        format!(
            "{}/{}",
            self.origin.trim_end_matches('/'),
            href.trim_start_matches('/')
        )
    }
}

impl Default for HeadlineExtractor {
    fn default() -> Self {
        Self::yahoo()
    }
}

/// Extract headlines using the default story marker and the given origin.
pub fn extract(document: &str, origin: &Url) -> Result<Vec<Headline>, HeadlineError> {
    HeadlineExtractor::new(origin.as_str(), STORY_MARKER_CLASS).extract(document)
}
