//! Tag-and-class queries over a parsed HTML document
//!
//! The listing and detail extractors are the only callers; nothing else in the
//! crate knows about markup.

use crate::error::ExtractionError;
use scraper::{ElementRef, Html, Selector};

/// Selects elements by an optional tag name and a class
#[derive(Debug)]
pub struct Query {
    css: String,
    selector: Selector,
}

impl Query {
    /// Any element carrying `class`
    pub fn class(class: &str) -> Result<Self, ExtractionError> {
        Self::parse(format!(".{class}"))
    }

    /// `<tag>` elements carrying `class`
    pub fn tag_with_class(tag: &str, class: &str) -> Result<Self, ExtractionError> {
        Self::parse(format!("{tag}.{class}"))
    }

    /// Any `<tag>` element
    pub fn tag(tag: &str) -> Result<Self, ExtractionError> {
        Self::parse(tag.to_string())
    }

    fn parse(css: String) -> Result<Self, ExtractionError> {
        let selector = Selector::parse(&css).map_err(|e| ExtractionError::InvalidSelector {
            selector: css.clone(),
            error: e.to_string(),
        })?;
        Ok(Self { css, selector })
    }

    /// All matches in document order
    pub fn all<'a>(&'a self, document: &'a Html) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        document.select(&self.selector)
    }

    /// First match within `element`'s descendants
    pub fn first_in<'a>(&self, element: ElementRef<'a>) -> Option<ElementRef<'a>> {
        element.select(&self.selector).next()
    }

    /// First match in the document, or `MissingElement`
    pub fn require<'a>(&self, document: &'a Html) -> Result<ElementRef<'a>, ExtractionError> {
        document
            .select(&self.selector)
            .next()
            .ok_or_else(|| self.missing())
    }

    /// `attr` of `element`, or `MissingAttribute` naming this query
    pub fn attr<'a>(&self, element: ElementRef<'a>, attr: &str) -> Result<&'a str, ExtractionError> {
        element
            .value()
            .attr(attr)
            .ok_or_else(|| ExtractionError::MissingAttribute {
                selector: self.css.clone(),
                attr: attr.to_string(),
            })
    }

    pub fn missing(&self) -> ExtractionError {
        ExtractionError::MissingElement {
            selector: self.css.clone(),
        }
    }
}

/// Concatenated text of `element` and its descendants
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}
