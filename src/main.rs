// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Larissa-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Larissa and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Larissa CLI entrypoint.
//!
//! Opens the interactive pager over a vault directory. Without `--note` a
//! fuzzy picker chooses the starting note.

use std::error::Error;
use std::str::FromStr;

use larissa::model::NoteId;
use larissa::store::VaultFolder;
use larissa::tui::{self, PagerOptions};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<vault-dir>] [--note <id>] [--links-ratio <n>]\n  {program} [--vault <dir>] [--note <id>] [--links-ratio <n>]\n\nIf vault-dir/--vault is omitted, the current working directory is used.\n--note skips the startup picker and opens the given note id directly.\n--links-ratio sets the links pane to 1/n of the terminal width (default 4, minimum 2)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    vault_dir: Option<String>,
    note: Option<String>,
    links_ratio: Option<u16>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--vault" => {
                if options.vault_dir.is_some() {
                    return Err(());
                }
                let dir = args.next().ok_or(())?;
                options.vault_dir = Some(dir);
            }
            "--note" => {
                if options.note.is_some() {
                    return Err(());
                }
                let note = args.next().ok_or(())?;
                options.note = Some(note);
            }
            "--links-ratio" => {
                if options.links_ratio.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let ratio: u16 = raw.parse().map_err(|_| ())?;
                if ratio < 2 {
                    return Err(());
                }
                options.links_ratio = Some(ratio);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.vault_dir.is_some() {
                    return Err(());
                }
                options.vault_dir = Some(arg);
            }
        }
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "larissa".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let folder = VaultFolder::new(options.vault_dir.unwrap_or_else(|| ".".to_owned()));
        let start_note = options.note.map(|raw| NoteId::from_str(&raw)).transpose()?;
        let mut pager_options = PagerOptions { start_note, ..PagerOptions::default() };
        if let Some(ratio) = options.links_ratio {
            pager_options.links_ratio = ratio;
        }

        tui::run(folder, pager_options)
    })();

    if let Err(err) = result {
        eprintln!("larissa: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions};

    #[test]
    fn parses_empty_args() {
        let options = parse_options(std::iter::empty()).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_positional_vault_dir() {
        let options = parse_options(["some/dir".to_owned()].into_iter()).expect("parse options");
        assert_eq!(options.vault_dir.as_deref(), Some("some/dir"));
        assert!(options.note.is_none());
    }

    #[test]
    fn parses_vault_flag() {
        let options = parse_options(["--vault".to_owned(), "some/dir".to_owned()].into_iter())
            .expect("parse options");
        assert_eq!(options.vault_dir.as_deref(), Some("some/dir"));
    }

    #[test]
    fn parses_note_and_links_ratio() {
        let options = parse_options(
            ["--note".to_owned(), "abc123".to_owned(), "--links-ratio".to_owned(), "3".to_owned()]
                .into_iter(),
        )
        .expect("parse options");
        assert_eq!(options.note.as_deref(), Some("abc123"));
        assert_eq!(options.links_ratio, Some(3));
    }

    #[test]
    fn rejects_links_ratio_below_two() {
        parse_options(["--links-ratio".to_owned(), "1".to_owned()].into_iter()).unwrap_err();
        parse_options(["--links-ratio".to_owned(), "0".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_non_numeric_links_ratio() {
        parse_options(["--links-ratio".to_owned(), "wide".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_unknown_args() {
        parse_options(["--nope".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_duplicate_flags() {
        parse_options(
            ["--note".to_owned(), "a".to_owned(), "--note".to_owned(), "b".to_owned()].into_iter(),
        )
        .unwrap_err();

        parse_options(
            ["--vault".to_owned(), ".".to_owned(), "--vault".to_owned(), "other".to_owned()]
                .into_iter(),
        )
        .unwrap_err();
    }

    #[test]
    fn rejects_multiple_positional_vault_dirs() {
        parse_options(["one".to_owned(), "two".to_owned()].into_iter()).unwrap_err();
    }

    #[test]
    fn rejects_positional_vault_dir_with_vault_flag() {
        parse_options(["--vault".to_owned(), "one".to_owned(), "two".to_owned()].into_iter())
            .unwrap_err();
    }

    #[test]
    fn rejects_missing_flag_values() {
        parse_options(["--vault".to_owned()].into_iter()).unwrap_err();
        parse_options(["--note".to_owned()].into_iter()).unwrap_err();
        parse_options(["--links-ratio".to_owned()].into_iter()).unwrap_err();
    }
}
