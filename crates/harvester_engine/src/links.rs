use harvest_logging::harvest_debug;
use scraper::{Html, Selector};
use thiserror::Error;

/// Case-insensitive filter applied to an attribute value. Patterns are lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMatch {
    Suffix(&'static str),
    Contains(&'static str),
}

impl LinkMatch {
    pub fn matches(&self, value: &str) -> bool {
        let lower = value.to_lowercase();
        match self {
            LinkMatch::Suffix(suffix) => lower.ends_with(suffix),
            LinkMatch::Contains(fragment) => lower.contains(fragment),
        }
    }
}

/// Every `tag` element carrying `attribute` contributes its value when `matcher` accepts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkRule {
    pub tag: &'static str,
    pub attribute: &'static str,
    pub matcher: LinkMatch,
}

impl LinkRule {
    pub fn selector(&self) -> String {
        format!("{}[{}]", self.tag, self.attribute)
    }
}

/// PDF discovery rules in scan order. Inline frames use a substring match so
/// sources like `doc.pdf?page=2` still count.
pub const PDF_LINK_RULES: [LinkRule; 4] = [
    LinkRule {
        tag: "a",
        attribute: "href",
        matcher: LinkMatch::Suffix(".pdf"),
    },
    LinkRule {
        tag: "iframe",
        attribute: "src",
        matcher: LinkMatch::Contains(".pdf"),
    },
    LinkRule {
        tag: "embed",
        attribute: "src",
        matcher: LinkMatch::Suffix(".pdf"),
    },
    LinkRule {
        tag: "object",
        attribute: "data",
        matcher: LinkMatch::Suffix(".pdf"),
    },
];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("No PDF links found in the HTML")]
    NoLinksFound,
    #[error("invalid selector `{selector}`: {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Links in rule order, then document order. Duplicates and relative paths are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet(Vec<String>);

impl LinkSet {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for LinkSet {
    fn from(links: Vec<String>) -> Self {
        Self(links)
    }
}

impl<'a> IntoIterator for &'a LinkSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

pub struct LinkExtractor {
    rules: Vec<(LinkRule, Selector)>,
}

impl LinkExtractor {
    pub fn new(rules: &[LinkRule]) -> Result<Self, ExtractError> {
        let rules = rules
            .iter()
            .map(|rule| {
                let selector = rule.selector();
                let parsed = Selector::parse(&selector);
                match parsed {
                    Ok(parsed) => Ok((*rule, parsed)),
                    Err(err) => Err(ExtractError::InvalidSelector {
                        message: err.to_string(),
                        selector: selector.clone(),
                    }),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn pdf() -> Result<Self, ExtractError> {
        Self::new(&PDF_LINK_RULES)
    }

    pub fn rules(&self) -> impl Iterator<Item = &LinkRule> {
        self.rules.iter().map(|(rule, _)| rule)
    }

    /// Applies every rule in order; an empty result is [`ExtractError::NoLinksFound`].
    pub fn extract_from_document(&self, document: &Html) -> Result<LinkSet, ExtractError> {
        let mut links = Vec::new();
        for (rule, selector) in &self.rules {
            let before = links.len();
            links.extend(
                document
                    .select(selector)
                    .filter_map(|element| element.value().attr(rule.attribute))
                    .filter(|value| rule.matcher.matches(value))
                    .map(str::to_string),
            );
            harvest_debug!(
                "{} matched {} links",
                rule.selector(),
                links.len() - before
            );
        }

        if links.is_empty() {
            return Err(ExtractError::NoLinksFound);
        }
        Ok(LinkSet(links))
    }

    pub fn extract(&self, html: &str) -> Result<LinkSet, ExtractError> {
        let document = Html::parse_document(html);
        self.extract_from_document(&document)
    }
}

/// Extracts PDF links from raw HTML with [`PDF_LINK_RULES`].
pub fn extract_links(html: &str) -> Result<LinkSet, ExtractError> {
    LinkExtractor::pdf()?.extract(html)
}
