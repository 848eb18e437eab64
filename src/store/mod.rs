// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Larissa-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Larissa and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Note storage: the pager consumes these traits, `VaultFolder` implements
//! them over a directory of `<id>.md` files.

mod vault;

pub use vault::{VaultError, VaultFolder, VaultMeta};

use crate::model::{Note, NoteId};

/// Read access to stored notes.
pub trait NoteStore {
    fn exists(&self, id: &NoteId) -> bool;

    /// Loads a note. Fails with [`VaultError::NotFound`] for unknown ids.
    fn read(&self, id: &NoteId) -> Result<Note, VaultError>;
}

/// Point-in-time listing of `(title, id)` pairs, used for link resolution and
/// the fuzzy picker. Callers re-list on every use; notes may appear or vanish
/// between calls.
pub trait NoteIndex {
    fn list(&self) -> Vec<(String, NoteId)>;
}
