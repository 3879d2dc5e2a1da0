//! Declarative extraction rules.
//!
//! A listing page is described by an [`ExtractionRule`]: which elements are
//! article items, where each item's title and summary live relative to it,
//! and what happens when an expected element is absent. Rules are plain
//! `const` data so every region shares the same traversal code.

use std::fmt;

use fr_core::{Article, Error, Region, Result};
use scraper::{ElementRef, Html, Selector};

/// Matches an element by tag name and a set of class tokens that must all be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeMatcher {
    pub tag: &'static str,
    pub classes: &'static [&'static str],
}

impl NodeMatcher {
    pub const fn tag(tag: &'static str) -> Self {
        Self { tag, classes: &[] }
    }

    pub const fn with_classes(tag: &'static str, classes: &'static [&'static str]) -> Self {
        Self { tag, classes }
    }

    pub fn matches(&self, element: &ElementRef) -> bool {
        let value = element.value();
        value.name() == self.tag
            && self
                .classes
                .iter()
                .all(|class| value.classes().any(|have| have == *class))
    }

    pub fn selector(&self) -> Result<Selector> {
        let css = self.to_string();
        Selector::parse(&css)
            .map_err(|e| Error::Scraping(format!("Invalid selector {}: {}", css, e)))
    }
}

impl fmt::Display for NodeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag)?;
        for class in self.classes {
            write!(f, ".{}", class)?;
        }
        Ok(())
    }
}

/// Where a field's text is read from, relative to a matched item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// The item element itself.
    Itself,
    /// The first following element sibling that matches.
    FollowingSibling(NodeMatcher),
    /// The first descendant, in document order, that matches.
    Descendant(NodeMatcher),
}

impl Lookup {
    fn find<'a>(&self, item: ElementRef<'a>) -> Result<Option<ElementRef<'a>>> {
        match self {
            Lookup::Itself => Ok(Some(item)),
            Lookup::FollowingSibling(matcher) => Ok(item
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .find(|sibling| matcher.matches(sibling))),
            Lookup::Descendant(matcher) => {
                let selector = matcher.selector()?;
                Ok(item.select(&selector).next())
            }
        }
    }

    fn matcher(&self) -> Option<NodeMatcher> {
        match self {
            Lookup::Itself => None,
            Lookup::FollowingSibling(m) | Lookup::Descendant(m) => Some(*m),
        }
    }
}

/// What to do when a scope or field element cannot be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingElementPolicy {
    /// Absent summaries become `None`, an absent scope yields no articles.
    Degrade,
    /// Any absent scope or field aborts the scrape with [`Error::MissingElement`].
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionRule {
    /// Narrows the document to the first matching element before items are searched.
    pub scope: Option<NodeMatcher>,
    pub item: NodeMatcher,
    pub title: Lookup,
    pub summary: Lookup,
    pub on_missing: MissingElementPolicy,
}

impl ExtractionRule {
    pub fn extract(&self, region: Region, document: &Html) -> Result<Vec<Article>> {
        let item_selector = self.item.selector()?;

        let items: Vec<ElementRef> = match self.scope {
            Some(scope) => match document.select(&scope.selector()?).next() {
                Some(root) => root.select(&item_selector).collect(),
                None => {
                    self.missing(region, scope)?;
                    return Ok(Vec::new());
                }
            },
            None => document.select(&item_selector).collect(),
        };

        let mut articles = Vec::with_capacity(items.len());
        for item in items {
            let title = match self.title.find(item)? {
                Some(el) => element_text(el),
                None => {
                    if let Some(matcher) = self.title.matcher() {
                        self.missing(region, matcher)?;
                    }
                    continue;
                }
            };

            let summary = match self.summary.find(item)? {
                Some(el) => Some(element_text(el)),
                None => {
                    if let Some(matcher) = self.summary.matcher() {
                        self.missing(region, matcher)?;
                    }
                    None
                }
            };

            if title.is_empty() {
                continue;
            }
            articles.push(Article { title, summary });
        }

        Ok(articles)
    }

    fn missing(&self, region: Region, matcher: NodeMatcher) -> Result<()> {
        match self.on_missing {
            MissingElementPolicy::Degrade => {
                tracing::debug!("{}: no `{}` element, continuing without it", region, matcher);
                Ok(())
            }
            MissingElementPolicy::Fail => Err(Error::MissingElement {
                region,
                matcher: matcher.to_string(),
            }),
        }
    }
}

/// Text content of an element with every text node trimmed and empty nodes
/// dropped, joined without a separator.
pub fn element_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
