// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Larissa-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Larissa and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::{Note, NoteId};

use super::{NoteIndex, NoteStore};

const NOTE_EXTENSION: &str = "md";
const VAULT_META_FILENAME: &str = "larissa-vault.meta.json";
const FRONT_MATTER_DELIMITER: &str = "---";

fn wiki_link_regex() -> &'static Regex {
    static WIKI_LINK: OnceLock<Regex> = OnceLock::new();
    WIKI_LINK.get_or_init(|| Regex::new(r"\[\[([^\[\]]+)\]\]").expect("valid wiki link regex"))
}

/// A directory of markdown notes, one file per note id.
///
/// The vault owns all parsing the pager is not allowed to do itself: the
/// front-matter `title:` field and the `[[wiki link]]` anchor scan.
#[derive(Debug, Clone)]
pub struct VaultFolder {
    dir: PathBuf,
}

impl VaultFolder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn note_path(&self, id: &NoteId) -> PathBuf {
        self.dir.join(format!("{id}.{NOTE_EXTENSION}"))
    }

    /// Reads the optional vault metadata file. Missing or malformed metadata
    /// is treated as absent; it only feeds the footer line.
    pub fn load_meta(&self) -> Option<VaultMeta> {
        let raw = fs::read_to_string(self.dir.join(VAULT_META_FILENAME)).ok()?;
        serde_json::from_str(&raw).ok()
    }
}

impl NoteStore for VaultFolder {
    fn exists(&self, id: &NoteId) -> bool {
        self.note_path(id).is_file()
    }

    fn read(&self, id: &NoteId) -> Result<Note, VaultError> {
        let path = self.note_path(id);
        let body = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                VaultError::NotFound(id.clone())
            } else {
                VaultError::Io { path, source }
            }
        })?;

        let title = front_matter_title(&body).unwrap_or_else(|| id.to_string());
        let links = extract_links(&body);
        Ok(Note::new(id.clone(), title, links, body))
    }
}

impl NoteIndex for VaultFolder {
    fn list(&self) -> Vec<(String, NoteId)> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };

        let mut pairs = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(NOTE_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let Ok(id) = NoteId::new(stem) else {
                continue;
            };
            // Unreadable entries are skipped, not fatal; the listing is a
            // best-effort snapshot.
            let Ok(body) = fs::read_to_string(&path) else {
                continue;
            };
            let title = front_matter_title(&body).unwrap_or_else(|| id.to_string());
            pairs.push((title, id));
        }

        pairs.sort();
        pairs
    }
}

/// Extracts `[[anchor]]` display texts in first-seen source order, duplicates
/// kept (the links pane numbers them as they appear).
fn extract_links(body: &str) -> Vec<String> {
    wiki_link_regex()
        .captures_iter(body)
        .map(|captures| captures[1].trim().to_owned())
        .collect()
}

/// Pulls the `title:` field out of a leading front-matter block, if any.
fn front_matter_title(body: &str) -> Option<String> {
    let mut lines = body.split('\n');
    if lines.next()?.trim_end() != FRONT_MATTER_DELIMITER {
        return None;
    }

    for line in lines {
        if line.trim_end() == FRONT_MATTER_DELIMITER {
            return None;
        }
        if let Some(value) = line.strip_prefix("title:") {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if value.is_empty() {
                return None;
            }
            return Some(value.to_owned());
        }
    }

    None
}

/// Optional vault metadata, shown in the pager footer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultMeta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

#[derive(Debug)]
pub enum VaultError {
    NotFound(NoteId),
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for VaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::Io { path, source } => write!(f, "vault io error at {}: {source}", path.display()),
        }
    }
}

impl std::error::Error for VaultError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{extract_links, front_matter_title, VaultError, VaultFolder, VaultMeta};
    use crate::model::NoteId;
    use crate::store::{NoteIndex, NoteStore};
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    struct TempVault {
        dir: PathBuf,
    }

    impl TempVault {
        fn new(label: &str) -> Self {
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|duration| duration.as_nanos())
                .unwrap_or(0);
            let dir = std::env::temp_dir().join(format!(
                "larissa-vault-test-{label}-{}-{nanos}",
                std::process::id()
            ));
            fs::create_dir_all(&dir).expect("create temp vault dir");
            Self { dir }
        }

        fn write_note(&self, id: &str, content: &str) {
            fs::write(self.dir.join(format!("{id}.md")), content).expect("write note");
        }

        fn folder(&self) -> VaultFolder {
            VaultFolder::new(&self.dir)
        }
    }

    impl Drop for TempVault {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.dir);
        }
    }

    #[test]
    fn read_parses_title_and_links_in_order() {
        let vault = TempVault::new("read");
        vault.write_note(
            "n1",
            "---\ntitle: First Note\n---\nSee [[Second Note]] and [[Third]].\nAgain [[Second Note]].",
        );

        let note = vault.folder().read(&NoteId::new("n1").expect("id")).expect("read note");
        assert_eq!(note.title(), "First Note");
        assert_eq!(note.links(), ["Second Note", "Third", "Second Note"]);
    }

    #[test]
    fn read_falls_back_to_id_without_front_matter_title() {
        let vault = TempVault::new("fallback");
        vault.write_note("n2", "just a body");

        let note = vault.folder().read(&NoteId::new("n2").expect("id")).expect("read note");
        assert_eq!(note.title(), "n2");
    }

    #[test]
    fn read_reports_not_found() {
        let vault = TempVault::new("missing");
        let err = vault.folder().read(&NoteId::new("ghost").expect("id")).unwrap_err();
        assert!(matches!(err, VaultError::NotFound(_)));
    }

    #[test]
    fn exists_checks_the_note_file() {
        let vault = TempVault::new("exists");
        vault.write_note("n3", "body");
        let folder = vault.folder();
        assert!(folder.exists(&NoteId::new("n3").expect("id")));
        assert!(!folder.exists(&NoteId::new("n4").expect("id")));
    }

    #[test]
    fn list_returns_title_id_pairs_and_skips_non_notes() {
        let vault = TempVault::new("list");
        vault.write_note("b", "---\ntitle: Beta\n---\n");
        vault.write_note("a", "---\ntitle: Alpha\n---\n");
        fs::write(vault.dir.join("notes.txt"), "not a note").expect("write");

        let listed = vault.folder().list();
        let titles: Vec<&str> = listed.iter().map(|(title, _)| title.as_str()).collect();
        assert_eq!(titles, ["Alpha", "Beta"]);
    }

    #[test]
    fn load_meta_reads_optional_json() {
        let vault = TempVault::new("meta");
        assert_eq!(vault.folder().load_meta(), None);

        fs::write(
            vault.dir.join("larissa-vault.meta.json"),
            r#"{"name": "Knowledge", "author": "Lorenzo"}"#,
        )
        .expect("write meta");
        assert_eq!(
            vault.folder().load_meta(),
            Some(VaultMeta {
                name: Some("Knowledge".to_owned()),
                author: Some("Lorenzo".to_owned()),
            })
        );
    }

    #[test]
    fn front_matter_title_requires_leading_block() {
        assert_eq!(front_matter_title("body\n---\ntitle: X\n---"), None);
        assert_eq!(
            front_matter_title("---\ntitle: \"Quoted\"\n---\n"),
            Some("Quoted".to_owned())
        );
    }

    #[test]
    fn extract_links_ignores_malformed_brackets() {
        assert_eq!(extract_links("[single] [[ok]] [[]]"), vec!["ok".to_owned()]);
    }
}
