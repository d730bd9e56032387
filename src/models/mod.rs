pub mod file_entry;
pub mod sort;

pub use file_entry::{format_size, DirectoryEntry, EntryKind};
pub use sort::{SortKey, SortOrder, SortSpec};
