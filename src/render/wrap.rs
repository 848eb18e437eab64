// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Larissa-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Larissa and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

const FRONT_MATTER_DELIMITER: &str = "---";
const CODE_FENCE: &str = "```";

/// Styling class of a wrapped line, decided by the classifier pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Plain,
    Heading,
    FrontMatter,
    CodeBlock,
}

/// One display line: already wrapped to the target width, tagged for styling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderLine {
    pub text: String,
    pub kind: LineKind,
}

impl RenderLine {
    fn new(text: impl Into<String>, kind: LineKind) -> Self {
        Self { text: text.into(), kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Out,
    FrontMatter,
    CodeBlock,
}

/// Wraps a note body to `width` columns and classifies every line.
///
/// Single forward pass, no backtracking. The context transitions follow the
/// note format: a `---` line toggles front matter, a ``` ``` ``` prefix
/// toggles a code block. Delimiter and fence lines themselves are classified
/// under the transition, i.e. rendered plain; only interior lines carry the
/// front-matter/code-block tag. A block left open classifies the rest of the
/// document as its interior, which is accepted behavior rather than an error.
///
/// Pure function of `(body, width)`, so a terminal resize can simply re-wrap.
pub fn wrap_note(body: &str, width: usize) -> Vec<RenderLine> {
    let mut lines = Vec::new();
    let mut context = Context::Out;

    for raw in body.split('\n') {
        let mut is_delimiter = false;

        if raw == FRONT_MATTER_DELIMITER && context == Context::Out {
            context = Context::FrontMatter;
            is_delimiter = true;
        } else if raw == FRONT_MATTER_DELIMITER && context == Context::FrontMatter {
            context = Context::Out;
            is_delimiter = true;
        } else if raw.starts_with(CODE_FENCE) && context == Context::Out {
            context = Context::CodeBlock;
            is_delimiter = true;
        } else if raw.starts_with(CODE_FENCE) && context == Context::CodeBlock {
            context = Context::Out;
            is_delimiter = true;
        }

        let kind = match context {
            Context::FrontMatter if !is_delimiter => LineKind::FrontMatter,
            Context::CodeBlock if !is_delimiter => LineKind::CodeBlock,
            _ if raw.starts_with('#') && !is_delimiter => LineKind::Heading,
            _ => LineKind::Plain,
        };

        if raw.trim().is_empty() {
            // An empty (or blank) raw line stays exactly one render line.
            lines.push(RenderLine::new("", kind));
            continue;
        }

        for wrapped in wrap_line(raw, width) {
            lines.push(RenderLine::new(wrapped, kind));
        }
    }

    lines
}

/// Greedy word wrap of a single raw line to `width` columns, counted in
/// chars, not bytes. The leading indent is kept on the first sub-line so code
/// keeps its shape; words longer than a line are hard-split.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let indent_len = line
        .chars()
        .take_while(|ch| ch.is_whitespace())
        .count()
        .min(width.saturating_sub(1));
    let indent: String = line.chars().take(indent_len).collect();

    let mut out = Vec::new();
    let mut current = indent;
    let mut current_len = indent_len;
    let mut has_word = false;

    for word in line.split_whitespace() {
        let mut rest = word;
        while !rest.is_empty() {
            let sep = usize::from(has_word);
            let room = width.saturating_sub(current_len + sep);
            let rest_len = rest.chars().count();

            if rest_len <= room {
                if has_word {
                    current.push(' ');
                    current_len += 1;
                }
                current.push_str(rest);
                current_len += rest_len;
                has_word = true;
                break;
            }

            if has_word {
                out.push(std::mem::take(&mut current));
                current_len = 0;
                has_word = false;
                continue;
            }

            // The word cannot fit a whole line even on its own: hard split.
            let take = width - current_len;
            let split_at = char_boundary(rest, take);
            current.push_str(&rest[..split_at]);
            out.push(std::mem::take(&mut current));
            current_len = 0;
            rest = &rest[split_at..];
        }
    }

    if has_word {
        out.push(current);
    }
    if out.is_empty() {
        out.push(String::new());
    }

    out
}

/// Byte offset of the `nth` char boundary in `s` (or the end of `s`).
fn char_boundary(s: &str, nth: usize) -> usize {
    s.char_indices().nth(nth).map_or(s.len(), |(offset, _)| offset)
}

#[cfg(test)]
mod tests {
    use super::{wrap_line, wrap_note, LineKind};
    use rstest::rstest;

    fn kinds(body: &str, width: usize) -> Vec<LineKind> {
        wrap_note(body, width).into_iter().map(|line| line.kind).collect()
    }

    #[test]
    fn plain_text_wraps_to_width() {
        let lines = wrap_note("alpha beta gamma delta", 11);
        let texts: Vec<&str> = lines.iter().map(|line| line.text.as_str()).collect();
        assert_eq!(texts, vec!["alpha beta", "gamma delta"]);
        assert!(lines.iter().all(|line| line.kind == LineKind::Plain));
    }

    #[test]
    fn empty_raw_line_stays_one_render_line() {
        let lines = wrap_note("alpha\n\nbeta", 80);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].text, "");
    }

    #[test]
    fn front_matter_interior_is_tagged_and_delimiters_stay_plain() {
        let body = "---\ntitle: Hello\nid: h1\n---\nBody text";
        let tagged = kinds(body, 80);
        assert_eq!(
            tagged,
            vec![
                LineKind::Plain,
                LineKind::FrontMatter,
                LineKind::FrontMatter,
                LineKind::Plain,
                LineKind::Plain,
            ]
        );
    }

    #[test]
    fn code_fence_toggles_and_fence_lines_stay_plain() {
        let body = "intro\n```rust\nlet x = 1;\n```\noutro";
        let tagged = kinds(body, 80);
        assert_eq!(
            tagged,
            vec![
                LineKind::Plain,
                LineKind::Plain,
                LineKind::CodeBlock,
                LineKind::Plain,
                LineKind::Plain,
            ]
        );
    }

    #[test]
    fn unterminated_code_fence_classifies_remainder_as_code() {
        let body = "intro\n```\nlet x = 1;\n# not a heading in here\ntrailing";
        let tagged = kinds(body, 80);
        assert_eq!(
            tagged,
            vec![
                LineKind::Plain,
                LineKind::Plain,
                LineKind::CodeBlock,
                LineKind::CodeBlock,
                LineKind::CodeBlock,
            ]
        );
    }

    #[test]
    fn headings_outside_blocks_are_tagged() {
        let tagged = kinds("# Title\ntext\n## Sub", 80);
        assert_eq!(tagged, vec![LineKind::Heading, LineKind::Plain, LineKind::Heading]);
    }

    #[test]
    fn heading_marker_inside_front_matter_is_not_a_heading() {
        let tagged = kinds("---\n# comment-ish\n---", 80);
        assert_eq!(tagged[1], LineKind::FrontMatter);
    }

    #[test]
    fn wrapped_sub_lines_share_the_tag() {
        let body = "```\nlong code line that needs wrapping badly\n```";
        let lines = wrap_note(body, 12);
        assert!(lines.len() > 3);
        for line in &lines[1..lines.len() - 1] {
            assert_eq!(line.kind, LineKind::CodeBlock);
        }
    }

    #[test]
    fn code_indent_is_kept_on_first_sub_line() {
        assert_eq!(wrap_line("    let x = 1;", 80), vec!["    let x = 1;"]);
    }

    #[test]
    fn long_words_are_hard_split() {
        let wrapped = wrap_line("abcdefghij", 4);
        assert_eq!(wrapped, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn no_wrapped_line_exceeds_width() {
        let body = "one two three four five six seven eight nine ten eleven twelve";
        for width in 1..30 {
            for line in wrap_note(body, width) {
                assert!(
                    line.text.chars().count() <= width.max(1),
                    "width {width}: {:?}",
                    line.text
                );
            }
        }
    }

    #[rstest]
    #[case(1)]
    #[case(7)]
    #[case(24)]
    #[case(80)]
    fn wrapping_is_deterministic(#[case] width: usize) {
        let body = "---\ntitle: T\n---\n# Heading\nsome longer body text to wrap\n```\ncode\n```";
        assert_eq!(wrap_note(body, width), wrap_note(body, width));
    }
}
