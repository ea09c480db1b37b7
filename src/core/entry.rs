//! Classification and grouping of archive members.

use crate::domain::ports::ArchiveEntry;
use std::collections::HashMap;

pub const IMAGE_EXTENSIONS: [&str; 5] = ["webp", "jpg", "jpeg", "png", "gif"];
pub const MARKUP_EXTENSION: &str = "xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Directory,
    Image,
    Markup,
    Unknown,
}

/// Archive member with its derived name, parent directory and kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedEntry {
    pub name: String,
    pub parent_path: String,
    pub kind: EntryKind,
    pub full_path: String,
}

impl ClassifiedEntry {
    pub fn classify(entry: &ArchiveEntry) -> Self {
        let path = entry.path.as_str();
        if entry.is_directory {
            return Self {
                name: String::new(),
                parent_path: path.trim_end_matches('/').to_string(),
                kind: EntryKind::Directory,
                full_path: path.to_string(),
            };
        }

        let (parent_path, name) = match path.rfind('/') {
            Some(idx) => (&path[..idx], &path[idx + 1..]),
            None => ("", path),
        };

        Self {
            name: name.to_string(),
            parent_path: parent_path.to_string(),
            kind: kind_of_file(name),
            full_path: path.to_string(),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_image(&self) -> bool {
        self.kind == EntryKind::Image
    }

    pub fn is_markup(&self) -> bool {
        self.kind == EntryKind::Markup
    }

    /// True when the entry sits in `directory` or any of its subdirectories.
    pub fn is_under(&self, directory: &str) -> bool {
        let directory = directory.trim_end_matches('/');
        self.parent_path == directory
            || self
                .parent_path
                .strip_prefix(directory)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

fn kind_of_file(name: &str) -> EntryKind {
    let Some((_, extension)) = name.rsplit_once('.') else {
        return EntryKind::Unknown;
    };
    let extension = extension.to_ascii_lowercase();
    if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        EntryKind::Image
    } else if extension == MARKUP_EXTENSION {
        EntryKind::Markup
    } else {
        EntryKind::Unknown
    }
}

pub type GroupedByKind = HashMap<EntryKind, Vec<ClassifiedEntry>>;
pub type GroupedByDirectory = HashMap<String, Vec<ClassifiedEntry>>;

pub fn classify_all(entries: &[ArchiveEntry]) -> Vec<ClassifiedEntry> {
    entries.iter().map(ClassifiedEntry::classify).collect()
}

/// Partitions entries by kind, keeping archive order. Kinds without entries have no key.
pub fn group_by_kind(entries: &[ClassifiedEntry]) -> GroupedByKind {
    entries.iter().fold(HashMap::new(), |mut grouped, entry| {
        grouped
            .entry(entry.kind)
            .or_insert_with(Vec::new)
            .push(entry.clone());
        grouped
    })
}

/// Partitions files by parent directory. Directory entries are only keys, never payload.
pub fn group_by_directory(entries: &[ClassifiedEntry]) -> GroupedByDirectory {
    entries
        .iter()
        .filter(|entry| !entry.is_dir())
        .fold(HashMap::new(), |mut grouped, entry| {
            grouped
                .entry(entry.parent_path.clone())
                .or_insert_with(Vec::new)
                .push(entry.clone());
            grouped
        })
}

pub fn lookup<'a>(
    directories: &'a GroupedByDirectory,
    path: &str,
    name: &str,
) -> Option<&'a ClassifiedEntry> {
    directories
        .get(path)
        .and_then(|entries| entries.iter().find(|entry| entry.name == name))
}

/// Classification and both groupings of one archive, computed once per import pass.
#[derive(Debug, Clone, Default)]
pub struct ArchiveIndex {
    pub by_kind: GroupedByKind,
    pub by_directory: GroupedByDirectory,
}

impl ArchiveIndex {
    pub fn build(entries: &[ArchiveEntry]) -> Self {
        let classified = classify_all(entries);
        Self {
            by_kind: group_by_kind(&classified),
            by_directory: group_by_directory(&classified),
        }
    }

    pub fn lookup(&self, path: &str, name: &str) -> Option<&ClassifiedEntry> {
        lookup(&self.by_directory, path, name)
    }

    pub fn images_under<'a>(
        &'a self,
        directory: &'a str,
    ) -> impl Iterator<Item = &'a ClassifiedEntry> + 'a {
        self.by_kind
            .get(&EntryKind::Image)
            .into_iter()
            .flatten()
            .filter(move |entry| entry.is_under(directory))
    }
}
