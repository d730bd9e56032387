use clap::ValueEnum;
use serde::Deserialize;
use std::cmp::Ordering;

use super::file_entry::DirectoryEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Size,
    /// Folders before files, then by name.
    Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    pub fn apply(&self, entries: &mut [DirectoryEntry]) {
        entries.sort_by(|a, b| {
            let order = match self.key {
                SortKey::Name => by_name(a, b),
                SortKey::Size => a.size_bytes.cmp(&b.size_bytes).then_with(|| by_name(a, b)),
                SortKey::Type => b
                    .is_folder()
                    .cmp(&a.is_folder())
                    .then_with(|| by_name(a, b)),
            };
            match self.order {
                SortOrder::Asc => order,
                SortOrder::Desc => order.reverse(),
            }
        });
    }
}

// Case-insensitive, exact name breaks ties so the order is total.
fn by_name(a: &DirectoryEntry, b: &DirectoryEntry) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}
