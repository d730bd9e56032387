use serde::Serialize;
use std::path::Path;

/// One immediate child of a scanned directory.
///
/// Serialized with the field names the listing endpoint has always returned,
/// so the keys contain spaces and capitals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    #[serde(rename = "Path")]
    pub path: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Size (Bytes)")]
    pub size_bytes: u64,
    #[serde(rename = "Type")]
    pub kind: EntryKind,
    #[serde(rename = "Size")]
    pub human_size: String,
}

impl DirectoryEntry {
    pub fn new(path: &Path, kind: EntryKind, size_bytes: u64) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        Self {
            path: path.to_string_lossy().into_owned(),
            name,
            size_bytes,
            kind,
            human_size: format_size(size_bytes),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryKind {
    File,
    Folder,
}

/// Renders a byte count with 1024-based units, e.g. `1.50 KB`.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_base_name_of_path() {
        let entry = DirectoryEntry::new(Path::new("/data/sub"), EntryKind::Folder, 50);
        assert_eq!(entry.name, "sub");
        assert_eq!(entry.path, "/data/sub");
        assert!(entry.is_folder());
    }

    #[test]
    fn serializes_with_listing_keys() {
        let entry = DirectoryEntry::new(Path::new("/data/a.txt"), EntryKind::File, 100);
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(value["Path"], "/data/a.txt");
        assert_eq!(value["Name"], "a.txt");
        assert_eq!(value["Size (Bytes)"], 100);
        assert_eq!(value["Type"], "File");
        assert_eq!(value["Size"], "100 B");
    }

    #[test]
    fn format_size_picks_unit() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }
}
