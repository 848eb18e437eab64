// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Larissa-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Larissa and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::NoteId;

/// A single loaded note.
///
/// Immutable once constructed; the pager replaces the whole value on
/// navigation and never mutates a note in place. `links` keeps the anchors in
/// first-seen source order, duplicates included, because the links pane
/// numbers them 1-based and those numbers must match the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    id: NoteId,
    title: String,
    links: Vec<String>,
    body: String,
}

impl Note {
    pub fn new(
        id: NoteId,
        title: impl Into<String>,
        links: Vec<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            links,
            body: body.into(),
        }
    }

    pub fn id(&self) -> &NoteId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn links(&self) -> &[String] {
        &self.links
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}
