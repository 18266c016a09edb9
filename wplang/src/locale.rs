//! Locale selection.
//!
//! Operators configure a list of locale codes; an empty list means every
//! locale the translation API offers for a package.

use std::collections::HashSet;

/// Requested set of locale codes.
///
/// Keeps the operator's order for display; membership is exact
/// (`fr_FR` does not match `fr`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleRequest {
    locales: Vec<String>,
}

impl LocaleRequest {
    /// Request every available locale.
    pub fn all() -> Self {
        Self::default()
    }

    /// Request the given locales. Blank entries and duplicates are dropped.
    pub fn new<I, S>(locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let locales = locales
            .into_iter()
            .map(|l| l.into().trim().to_string())
            .filter(|l| !l.is_empty())
            .filter(|l| seen.insert(l.clone()))
            .collect();
        Self { locales }
    }

    /// Parse a comma-separated list such as `fr_FR,de_DE`.
    pub fn parse_list(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// True when no restriction applies.
    pub fn is_unrestricted(&self) -> bool {
        self.locales.is_empty()
    }

    /// Requested locales in configuration order.
    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    /// Whether `locale` should be fetched.
    pub fn applies(&self, locale: &str) -> bool {
        self.is_unrestricted() || self.locales.iter().any(|l| l == locale)
    }

    /// Filter `available` down to the applicable locales.
    ///
    /// Order follows `available`; duplicates are collapsed.
    pub fn select<'a, I>(&self, available: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        available
            .into_iter()
            .filter(|l| self.applies(l))
            .filter(|l| seen.insert(*l))
            .map(str::to_string)
            .collect()
    }
}
