// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Larissa-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Larissa and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Normalizes a title into a slug: lowercase, alphanumeric runs kept, every
/// other run collapsed into a single `-`, no leading/trailing `-`.
///
/// Link anchors are written with the same normalization at authoring time, so
/// slug equality is the resolution key for `[[wiki links]]`.
pub fn sluggify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for ch in title.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::sluggify;

    #[test]
    fn sluggify_lowercases_and_dashes() {
        assert_eq!(sluggify("On Writing Well"), "on-writing-well");
    }

    #[test]
    fn sluggify_collapses_punctuation_runs() {
        assert_eq!(sluggify("Notes -- a (short) survey!"), "notes-a-short-survey");
    }

    #[test]
    fn sluggify_trims_edges() {
        assert_eq!(sluggify("  ...Hello?  "), "hello");
        assert_eq!(sluggify("!!!"), "");
    }

    #[test]
    fn sluggify_is_idempotent() {
        let once = sluggify("Zettelkasten: An Introduction");
        assert_eq!(sluggify(&once), once);
    }
}
