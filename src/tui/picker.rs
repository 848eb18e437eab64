// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Larissa-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Larissa and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Full-screen fuzzy note picker.
//!
//! Runs in its own terminal session while the pager is suspended, and hands
//! back zero or more chosen note ids.

use std::collections::BTreeSet;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::model::NoteId;
use crate::store::NoteIndex;

use super::theme::TuiTheme;
use super::TerminalSession;

/// Runs the picker over a fresh index listing. An empty result means the
/// user cancelled (or the vault is empty); callers treat that as "no change".
pub fn pick_notes<I: NoteIndex + ?Sized>(index: &I) -> Result<Vec<NoteId>, String> {
    let candidates = index.list();
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let theme = TuiTheme::from_env().map_err(|err| err.to_string())?;
    let mut terminal = TerminalSession::new().map_err(|err| err.to_string())?;
    let mut picker = Picker::new(candidates);

    loop {
        terminal
            .draw(|frame| picker.draw(frame, &theme))
            .map_err(|err| format!("picker draw failed: {err}"))?;

        match event::read().map_err(|err| format!("picker input failed: {err}"))? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if let Some(outcome) = picker.handle_key(key) {
                    return Ok(outcome);
                }
            }
            _ => {}
        }
    }
}

struct Picker {
    candidates: Vec<(String, NoteId)>,
    query: String,
    ranked: Vec<usize>,
    marked: BTreeSet<usize>,
    list_state: ListState,
}

impl Picker {
    fn new(candidates: Vec<(String, NoteId)>) -> Self {
        let ranked: Vec<usize> = (0..candidates.len()).collect();
        let mut list_state = ListState::default();
        if !ranked.is_empty() {
            list_state.select(Some(0));
        }
        Self { candidates, query: String::new(), ranked, marked: BTreeSet::new(), list_state }
    }

    /// Returns `Some(ids)` when the picker session is over: the marked notes
    /// (or the highlighted one) on Enter, nothing on cancel.
    fn handle_key(&mut self, key: KeyEvent) -> Option<Vec<NoteId>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Vec::new());
        }

        match key.code {
            KeyCode::Esc => return Some(Vec::new()),
            KeyCode::Enter => return Some(self.chosen()),
            KeyCode::Tab => {
                if let Some(candidate) = self.highlighted() {
                    if !self.marked.remove(&candidate) {
                        self.marked.insert(candidate);
                    }
                }
                self.move_cursor(1);
            }
            KeyCode::Down => self.move_cursor(1),
            KeyCode::Up => self.move_cursor(-1),
            KeyCode::Backspace => {
                self.query.pop();
                self.rerank();
            }
            KeyCode::Char(ch) => {
                self.query.push(ch);
                self.rerank();
            }
            _ => {}
        }

        None
    }

    fn highlighted(&self) -> Option<usize> {
        self.list_state.selected().and_then(|visible| self.ranked.get(visible).copied())
    }

    fn chosen(&self) -> Vec<NoteId> {
        if self.marked.is_empty() {
            return self
                .highlighted()
                .map(|candidate| vec![self.candidates[candidate].1.clone()])
                .unwrap_or_default();
        }
        self.marked.iter().map(|&candidate| self.candidates[candidate].1.clone()).collect()
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.ranked.is_empty() {
            self.list_state.select(None);
            return;
        }
        let current = self.list_state.selected().unwrap_or(0) as isize;
        let last = self.ranked.len() as isize - 1;
        let next = (current + delta).clamp(0, last) as usize;
        self.list_state.select(Some(next));
    }

    fn rerank(&mut self) {
        let titles: Vec<&str> =
            self.candidates.iter().map(|(title, _)| title.as_str()).collect();
        self.ranked = rank_titles(&self.query, &titles);
        self.list_state.select(if self.ranked.is_empty() { None } else { Some(0) });
    }

    fn draw(&mut self, frame: &mut Frame<'_>, theme: &TuiTheme) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(frame.size());

        let prompt = Paragraph::new(Line::from(vec![
            Span::styled("> ", theme.footer_key_style()),
            Span::raw(self.query.clone()),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Find note ")
                .border_style(theme.border_style()),
        );
        frame.render_widget(prompt, rows[0]);

        let items = self
            .ranked
            .iter()
            .map(|&candidate| {
                let (title, id) = &self.candidates[candidate];
                let marker = if self.marked.contains(&candidate) { "◼ " } else { "◻ " };
                ListItem::new(Line::from(vec![
                    Span::raw(marker),
                    Span::raw(title.clone()),
                    Span::styled(format!("  ({id})"), theme.footer_label_style()),
                ]))
            })
            .collect::<Vec<_>>();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Notes ({}) ", self.ranked.len()))
                    .border_style(theme.border_style()),
            )
            .highlight_style(theme.selection_style());
        frame.render_stateful_widget(list, rows[1], &mut self.list_state);
    }
}

/// Ranks candidate titles against `query`: an empty query keeps the index
/// order, otherwise non-matching titles drop out and the rest sort by score.
fn rank_titles(query: &str, titles: &[&str]) -> Vec<usize> {
    let query = query.trim();
    if query.is_empty() {
        return (0..titles.len()).collect();
    }

    let needle = query.to_lowercase();
    let mut scored: Vec<(i64, usize)> = titles
        .iter()
        .enumerate()
        .filter_map(|(idx, title)| {
            fuzzy_score(&needle, &title.to_lowercase()).map(|score| (score, idx))
        })
        .collect();

    scored.sort_by(|(score_a, idx_a), (score_b, idx_b)| {
        score_b.cmp(score_a).then_with(|| titles[*idx_a].cmp(titles[*idx_b]))
    });
    scored.into_iter().map(|(_, idx)| idx).collect()
}

/// Subsequence match required; the score blends the rapidfuzz ratio with
/// span, start position, consecutive-run and word-boundary bonuses.
fn fuzzy_score(needle: &str, haystack: &str) -> Option<i64> {
    let subseq = subsequence_stats(needle, haystack)?;
    let ratio = rapidfuzz::fuzz::ratio(needle.chars(), haystack.chars());
    let ratio_score = (ratio * 1000.0).round() as i64;

    let mut score = ratio_score;
    score -= subseq.span as i64;
    score -= (subseq.first as i64) / 4;
    score += (subseq.consecutive as i64) * 40;
    if subseq.start_boundary {
        score += 150;
    }
    if haystack.contains(needle) {
        score += 2000;
    }

    Some(score)
}

struct SubsequenceStats {
    first: usize,
    span: usize,
    consecutive: usize,
    start_boundary: bool,
}

fn subsequence_stats(needle: &str, haystack: &str) -> Option<SubsequenceStats> {
    let mut needle_iter = needle.chars().filter(|ch| !ch.is_whitespace()).peekable();
    let mut first: Option<usize> = None;
    let mut last: usize = 0;
    let mut prev_match: Option<usize> = None;
    let mut consecutive: usize = 0;
    let mut start_boundary = false;
    let mut prev_hay: Option<char> = None;

    for (idx, ch) in haystack.chars().enumerate() {
        let Some(&want) = needle_iter.peek() else {
            break;
        };

        if ch == want {
            needle_iter.next();

            if first.is_none() {
                first = Some(idx);
                start_boundary = prev_hay.map_or(true, is_boundary_char);
            }

            if let Some(prev) = prev_match {
                if idx == prev + 1 {
                    consecutive += 1;
                }
            }
            prev_match = Some(idx);
            last = idx;
        }

        prev_hay = Some(ch);
    }

    if needle_iter.peek().is_some() {
        return None;
    }

    let first = first?;
    Some(SubsequenceStats {
        first,
        span: last.saturating_sub(first).saturating_add(1),
        consecutive,
        start_boundary,
    })
}

fn is_boundary_char(ch: char) -> bool {
    matches!(ch, '/' | ':' | '-' | '_' | ' ')
}
