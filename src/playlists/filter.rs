use regex::{Regex, RegexBuilder};

use crate::error::{Result, SyncError};

/// Case-insensitive, partial-match name filter. `disco` selects both
/// "Disco 2010" and "nu_disco"; `2020$` selects names ending in 2020.
#[derive(Debug, Clone)]
pub struct NameFilter {
    regex: Option<Regex>,
}

impl NameFilter {
    /// An empty pattern lets every name through.
    pub fn new(pattern: &str) -> Result<Self> {
        if pattern.trim().is_empty() {
            return Ok(Self { regex: None });
        }
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| SyncError::InvalidFilter {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self { regex: Some(regex) })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.regex.as_ref().is_none_or(|r| r.is_match(name))
    }
}

/// Names from `names` selected by `pattern`, in their original order.
pub fn filter_names<'a, I>(names: I, pattern: &str) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    let filter = NameFilter::new(pattern)?;
    Ok(names
        .into_iter()
        .filter(|n| filter.matches(n))
        .map(str::to_string)
        .collect())
}
