// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Larissa-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Larissa and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Larissa, a terminal zettelkasten pager.
//!
//! Browse a vault of linked markdown notes: one note at a time in a wide
//! content pane, its outbound links numbered in a side pane, with
//! browser-style back/forward history over the note graph.

pub mod model;
pub mod render;
pub mod store;
pub mod tui;

#[cfg(test)]
mod tests {
    #[test]
    fn sanity() {
        assert_eq!(2 + 2, 4);
    }
}
