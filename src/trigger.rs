//! Trigger scanning.
//!
//! A trigger is any page element carrying the source marker. Its attributes are
//! read once, at scan time, into a typed [`TriggerConfig`].

use std::fmt;
use std::path::Path;

use crate::page::{Page, PageElement};

/// Media source. Its presence marks an element as a trigger.
pub const SOURCE_ATTR: &str = "data-gallerypop";
/// Group identifier shared by triggers that navigate together.
pub const GROUP_ATTR: &str = "data-group";
/// Alternate source stored in the group in place of the real one.
pub const DISPLAY_SOURCE_ATTR: &str = "data-video-image";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Named(String),
    /// Triggers without a group identifier all share this one.
    Ungrouped,
}

impl GroupKey {
    fn from_attribute(value: Option<&str>) -> Self {
        // Blank values count as missing; anything else is kept exactly as written.
        match value {
            Some(name) if !name.trim().is_empty() => GroupKey::Named(name.to_string()),
            _ => GroupKey::Ungrouped,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Named(name) => write!(f, "\"{}\"", name),
            GroupKey::Ungrouped => write!(f, "<ungrouped>"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerConfig {
    pub source: String,
    pub group: GroupKey,
    pub display_source: Option<String>,
}

impl TriggerConfig {
    /// Build a config from an element's attributes, `None` if it is not a trigger.
    pub fn from_element(element: &PageElement) -> Option<Self> {
        let source = element.attribute(SOURCE_ATTR)?;
        Some(TriggerConfig {
            source: source.to_string(),
            group: GroupKey::from_attribute(element.attribute(GROUP_ATTR)),
            display_source: element
                .attribute(DISPLAY_SOURCE_ATTR)
                .filter(|value| !value.is_empty())
                .map(str::to_string),
        })
    }

    /// The string this trigger contributes to its group.
    pub fn group_entry(&self) -> &str {
        self.display_source.as_deref().unwrap_or(&self.source)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trigger {
    /// Position among the page's triggers.
    pub id: usize,
    /// Position among all page elements.
    pub element: usize,
    pub label: String,
    pub config: TriggerConfig,
}

/// Collect every trigger on the page, in page order.
pub fn scan(page: &Page) -> Vec<Trigger> {
    page.elements
        .iter()
        .enumerate()
        .filter_map(|(element, el)| {
            let config = TriggerConfig::from_element(el)?;
            Some((element, el, config))
        })
        .enumerate()
        .map(|(id, (element, el, config))| Trigger {
            id,
            element,
            label: el.text.clone().unwrap_or_else(|| file_label(&config.source)),
            config,
        })
        .collect()
}

fn file_label(src: &str) -> String {
    Path::new(src)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| src.to_string())
}
