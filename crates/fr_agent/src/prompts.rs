//! Prompt templates.
//!
//! Templates are text assets compiled into the binary. A placeholder is a
//! `{name}` token where `name` is lowercase ASCII letters and underscores;
//! any other brace is literal text. Each template declares its placeholders
//! and is checked against its body when loaded, so a typo in an asset is a
//! startup error instead of a malformed prompt.

use std::collections::BTreeSet;

use fr_core::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_lowercase() || c == '_')
}

fn segments(body: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = body;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) if is_placeholder_name(&after[..end]) => {
                out.push(Segment::Literal(&rest[..start]));
                out.push(Segment::Placeholder(&after[..end]));
                rest = &after[end + 1..];
            }
            _ => {
                out.push(Segment::Literal(&rest[..=start]));
                rest = after;
            }
        }
    }
    out.push(Segment::Literal(rest));
    out
}

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    name: &'static str,
    version: u32,
    body: &'static str,
    placeholders: &'static [&'static str],
}

impl PromptTemplate {
    pub fn new(
        name: &'static str,
        version: u32,
        body: &'static str,
        placeholders: &'static [&'static str],
    ) -> Result<Self> {
        let template = Self {
            name,
            version,
            body,
            placeholders,
        };

        let used: BTreeSet<&str> = segments(body)
            .into_iter()
            .filter_map(|segment| match segment {
                Segment::Placeholder(name) => Some(name),
                Segment::Literal(_) => None,
            })
            .collect();
        let declared: BTreeSet<&str> = placeholders.iter().copied().collect();

        if let Some(unused) = declared.difference(&used).next() {
            return Err(template.error(format!("declares {{{}}} but never uses it", unused)));
        }
        if let Some(unknown) = used.difference(&declared).next() {
            return Err(template.error(format!("uses undeclared placeholder {{{}}}", unknown)));
        }
        Ok(template)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Substitutes every placeholder in one pass. Substituted text is never
    /// re-scanned, so values may contain braces.
    pub fn render(&self, values: &[(&str, &str)]) -> Result<String> {
        for (key, _) in values {
            if !self.placeholders.iter().any(|name| name == key) {
                return Err(self.error(format!("no placeholder named {{{}}}", key)));
            }
        }

        let mut out = String::with_capacity(self.body.len());
        for segment in segments(self.body) {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = values
                        .iter()
                        .find(|(key, _)| *key == name)
                        .map(|(_, value)| *value)
                        .ok_or_else(|| self.error(format!("missing value for {{{}}}", name)))?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }

    fn error(&self, message: String) -> Error {
        Error::Template(format!("{} v{}: {}", self.name, self.version, message))
    }
}

/// The two prompts the agent sends, validated together at startup.
#[derive(Debug, Clone)]
pub struct PromptSet {
    pub analysis: PromptTemplate,
    pub report_html: PromptTemplate,
}

impl PromptSet {
    pub fn load() -> Result<Self> {
        Ok(Self {
            analysis: PromptTemplate::new(
                "analysis",
                1,
                include_str!("../prompts/analysis.v1.txt"),
                &["us_articles", "japan_articles", "korea_articles"],
            )?,
            report_html: PromptTemplate::new(
                "report_html",
                1,
                include_str!("../prompts/report_html.v1.txt"),
                &["date", "analysis"],
            )?,
        })
    }
}
