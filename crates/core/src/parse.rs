//! HTML parsing and CSS querying.
//!
//! This module provides the [`Document`] and [`Element`] types the extraction
//! engine works against. Parsing is lenient: malformed markup still yields a
//! queryable tree.
//!
//! # Example
//!
//! ```rust
//! use harvest_core::Document;
//! use scraper::Selector;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h1>Title</h1>
//!             <p class="content"> Paragraph </p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html);
//! let selector = Selector::parse("p.content").unwrap();
//! assert!(doc.matches(&selector));
//! assert_eq!(doc.query_all(&selector)[0].text(true), "Paragraph");
//! ```

use scraper::{Html, Selector};

/// Represents a parsed HTML document.
///
/// A Document is a frozen snapshot: nothing in this crate mutates it after
/// parsing, so repeated queries observe the same tree.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// Never fails; html5ever recovers from malformed input the way browsers do.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Returns true when at least one element matches `selector`.
    pub fn matches(&self, selector: &Selector) -> bool {
        self.html.select(selector).next().is_some()
    }

    /// Returns every element matching `selector`, in document order.
    pub fn query_all(&'_ self, selector: &Selector) -> Vec<Element<'_>> {
        self.html.select(selector).map(|element| Element { element }).collect()
    }

    /// Gets the title of the document.
    ///
    /// Returns the content of the `<title>` element if present.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
    }
}

/// A matched node in a [`Document`].
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: scraper::ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the text content of this element.
    ///
    /// Text nodes of all descendants are concatenated in document order.
    /// When `strip` is true, leading and trailing whitespace of the result
    /// is removed; inner whitespace is kept as-is.
    pub fn text(&self, strip: bool) -> String {
        let text: String = self.element.text().collect();
        if strip { text.trim().to_string() } else { text }
    }
}
