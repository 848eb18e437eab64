// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Larissa-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Larissa and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model: note ids, loaded notes, and title slugs.

mod ids;
mod note;
mod slug;

pub use ids::{IdError, NoteId};
pub use note::Note;
pub use slug::sluggify;
