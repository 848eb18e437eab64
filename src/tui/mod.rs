// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Larissa-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Larissa and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! The interactive pager shell (ratatui + crossterm): a wide content pane, a
//! narrower links pane, and browser-style history over the note graph.

use std::error::Error;
use std::io;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::model::{sluggify, Note, NoteId};
use crate::render::{wrap_line, wrap_note, RenderLine};
use crate::store::{NoteIndex, NoteStore, VaultError, VaultFolder, VaultMeta};

mod picker;
mod theme;


pub use picker::pick_notes;
pub use theme::TuiTheme;

/// The links pane takes `1/LINKS_RATIO` of the terminal width by default.
const DEFAULT_LINKS_RATIO: u16 = 4;
const MIN_LINKS_PANE_WIDTH: u16 = 12;

/// Digit keys follow links; only single digits are dispatched.
const MAX_DIGIT_LINK: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerOptions {
    pub start_note: Option<NoteId>,
    pub links_ratio: u16,
}

impl Default for PagerOptions {
    fn default() -> Self {
        Self { start_note: None, links_ratio: DEFAULT_LINKS_RATIO }
    }
}

/// Clamped scroll window over a line buffer.
///
/// `limit` is line count + 1 so the last line may rest at the bottom of the
/// viewport; every mutation funnels through [`ScrollState::clamp`], keeping
/// `0 <= position <= max(0, limit - viewport_height)` by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    position: usize,
    limit: usize,
    viewport_height: usize,
}

impl ScrollState {
    fn new(line_count: usize, viewport_height: usize) -> Self {
        let mut state = Self { position: 0, limit: line_count + 1, viewport_height };
        state.clamp();
        state
    }

    pub fn position(&self) -> usize {
        self.position
    }

    fn max_position(&self) -> usize {
        self.limit.saturating_sub(self.viewport_height)
    }

    fn clamp(&mut self) {
        self.position = self.position.min(self.max_position());
    }

    fn scroll_by(&mut self, delta: isize) {
        self.position = self.position.saturating_add_signed(delta);
        self.clamp();
    }

    fn page(&mut self, direction: isize) {
        let half = (self.viewport_height / 2).max(1) as isize;
        self.scroll_by(direction.signum() * half);
    }

    fn to_start(&mut self) {
        self.position = 0;
    }

    fn to_end(&mut self) {
        self.position = self.max_position();
    }

    fn resize(&mut self, line_count: usize, viewport_height: usize) {
        self.limit = line_count + 1;
        self.viewport_height = viewport_height;
        self.clamp();
    }
}

/// Scrollable display of the classified, wrapped lines of the current note.
#[derive(Debug, Clone)]
pub struct ContentView {
    lines: Vec<RenderLine>,
    scroll: ScrollState,
}

impl ContentView {
    fn new(body: &str, width: usize, height: usize) -> Self {
        let lines = wrap_note(body, width);
        let scroll = ScrollState::new(lines.len(), height);
        Self { lines, scroll }
    }

    /// Re-wraps at new dimensions, keeping the scroll position (clamped).
    fn rewrap(&mut self, body: &str, width: usize, height: usize) {
        self.lines = wrap_note(body, width);
        self.scroll.resize(self.lines.len(), height);
    }

    fn visible(&self) -> &[RenderLine] {
        let start = self.scroll.position.min(self.lines.len());
        let end = (start + self.scroll.viewport_height).min(self.lines.len());
        &self.lines[start..end]
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }
}

/// Scrollable, indexed display of the current note's outbound links.
///
/// Entries render as `"[i] <anchor>"` with 1-based indices derived from the
/// note's link order, so the numbering survives resizes and pure redraws.
#[derive(Debug, Clone)]
pub struct LinksView {
    entries: Vec<String>,
    link_count: usize,
    scroll: ScrollState,
}

impl LinksView {
    fn new(links: &[String], width: usize, height: usize) -> Self {
        let entries = wrap_links(links, width);
        let scroll = ScrollState::new(entries.len(), height);
        Self { entries, link_count: links.len(), scroll }
    }

    fn relayout(&mut self, links: &[String], width: usize, height: usize) {
        self.entries = wrap_links(links, width);
        self.link_count = links.len();
        self.scroll.resize(self.entries.len(), height);
    }

    fn visible(&self) -> &[String] {
        let start = self.scroll.position.min(self.entries.len());
        let end = (start + self.scroll.viewport_height).min(self.entries.len());
        &self.entries[start..end]
    }

    pub fn link_count(&self) -> usize {
        self.link_count
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }
}

fn wrap_links(links: &[String], width: usize) -> Vec<String> {
    let mut entries = Vec::new();
    for (index, anchor) in links.iter().enumerate() {
        let labeled = format!("[{}] {anchor}", index + 1);
        entries.extend(wrap_line(&labeled, width));
    }
    entries
}

/// Bounded browser-style history over note ids.
///
/// `head` is a negative offset from the end of the stack: `-1` is the tip,
/// `-len` the oldest entry. The single convention covers "at the tip" and
/// "somewhere in history" without an extra flag; appending while behind the
/// tip discards the abandoned forward entries first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavStack {
    stack: Vec<NoteId>,
    head: isize,
}

impl NavStack {
    pub fn new(first: NoteId) -> Self {
        Self { stack: vec![first], head: -1 }
    }

    fn len(&self) -> usize {
        self.stack.len()
    }

    fn head_index(&self) -> usize {
        // head is kept in [-len, -1], so this cannot underflow.
        (self.stack.len() as isize + self.head) as usize
    }

    pub fn head(&self) -> isize {
        self.head
    }

    pub fn entries(&self) -> &[NoteId] {
        &self.stack
    }

    pub fn current(&self) -> &NoteId {
        &self.stack[self.head_index()]
    }

    /// Truncates abandoned forward history if behind the tip, then appends
    /// `id` as the new tip.
    pub fn push(&mut self, id: NoteId) {
        if self.head < -1 {
            let keep = self.head_index() + 1;
            self.stack.truncate(keep);
        }
        self.stack.push(id);
        self.head = -1;
    }

    /// Returns whether the head moved; boundary moves are no-ops.
    pub fn go_back(&mut self) -> bool {
        if self.head > -(self.stack.len() as isize) {
            self.head -= 1;
            return true;
        }
        false
    }

    pub fn go_forward(&mut self) -> bool {
        if self.head < -1 {
            self.head += 1;
            return true;
        }
        false
    }

    pub fn go_oldest(&mut self) -> bool {
        let oldest = -(self.stack.len() as isize);
        if self.head != oldest {
            self.head = oldest;
            return true;
        }
        false
    }

    pub fn go_newest(&mut self) -> bool {
        if self.head != -1 {
            self.head = -1;
            return true;
        }
        false
    }

    /// Removes the current entry, landing on its logical neighbor: the next
    /// entry when behind the tip (deletion shifts it into the same slot), the
    /// previous tip otherwise. Refuses to empty the stack.
    pub fn drop_current(&mut self) -> bool {
        if self.stack.len() == 1 {
            return false;
        }

        if self.head == -1 {
            self.stack.pop();
        } else {
            let index = self.head_index();
            self.stack.remove(index);
            self.head += 1;
        }
        true
    }

    /// Replaces all history with the single current entry.
    pub fn collapse_to_current(&mut self) -> bool {
        if self.stack.len() == 1 {
            return false;
        }
        let current = self.current().clone();
        self.stack = vec![current];
        self.head = -1;
        true
    }

    /// Appends every id in order (picker results), after the same forward
    /// truncation as [`NavStack::push`]; the head lands on the last appended.
    pub fn extend(&mut self, ids: impl IntoIterator<Item = NoteId>) {
        for id in ids {
            self.push(id);
        }
    }
}

/// Resolves a link anchor to a note id by slug-matching against a fresh
/// listing of the index. O(n) per call; resolution only happens on explicit
/// user action. `None` means a dead link, which callers ignore.
pub fn resolve_anchor<I: NoteIndex + ?Sized>(index: &I, anchor: &str) -> Option<NoteId> {
    let slug = sluggify(anchor);
    index
        .list()
        .into_iter()
        .find(|(title, _)| sluggify(title) == slug)
        .map(|(_, id)| id)
}

/// Inner dimensions of the two panes, as derived from the terminal area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PaneDims {
    content_width: usize,
    content_height: usize,
    links_width: usize,
    links_height: usize,
}

impl PaneDims {
    const FALLBACK: Self =
        Self { content_width: 58, content_height: 22, links_width: 18, links_height: 22 };

    fn from_areas(content: Rect, links: Rect) -> Self {
        Self {
            content_width: content.width.saturating_sub(2) as usize,
            content_height: content.height.saturating_sub(2) as usize,
            links_width: links.width.saturating_sub(2) as usize,
            links_height: links.height.saturating_sub(2) as usize,
        }
    }
}

/// The navigation session: owns the history stack, the materialized note and
/// both viewports, and the injected store/index collaborator.
pub struct App<S> {
    store: S,
    meta: Option<VaultMeta>,
    theme: TuiTheme,
    links_ratio: u16,
    nav: NavStack,
    note: Note,
    content: ContentView,
    links: LinksView,
    dims: PaneDims,
    toast: Option<String>,
    picker_requested: bool,
    should_quit: bool,
}

impl<S: NoteStore + NoteIndex> App<S> {
    pub fn new(
        store: S,
        meta: Option<VaultMeta>,
        theme: TuiTheme,
        start: NoteId,
        links_ratio: u16,
    ) -> Result<Self, VaultError> {
        let note = store.read(&start)?;
        let dims = PaneDims::FALLBACK;
        let content = ContentView::new(note.body(), dims.content_width, dims.content_height);
        let links = LinksView::new(note.links(), dims.links_width, dims.links_height);

        Ok(Self {
            store,
            meta,
            theme,
            links_ratio: links_ratio.max(2),
            nav: NavStack::new(start),
            note,
            content,
            links,
            dims,
            toast: None,
            picker_requested: false,
            should_quit: false,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn note(&self) -> &Note {
        &self.note
    }

    pub fn nav(&self) -> &NavStack {
        &self.nav
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(message.into());
    }

    /// The single choke point all navigation passes through. NotFound (and
    /// any read failure) leaves the previous note displayed.
    fn materialize(&mut self, id: &NoteId) -> Result<(), VaultError> {
        if !self.store.exists(id) {
            return Err(VaultError::NotFound(id.clone()));
        }
        let note = self.store.read(id)?;
        self.content = ContentView::new(note.body(), self.dims.content_width, self.dims.content_height);
        self.links = LinksView::new(note.links(), self.dims.links_width, self.dims.links_height);
        self.note = note;
        Ok(())
    }

    /// Applies a history mutation, then loads the new current note. A `false`
    /// mutation result is a boundary no-op and triggers no reload; a failed
    /// load rolls the stack back and keeps the previous note on screen.
    fn navigate(&mut self, mutate: impl FnOnce(&mut NavStack) -> bool) {
        let saved = self.nav.clone();
        if !mutate(&mut self.nav) {
            return;
        }

        let id = self.nav.current().clone();
        if let Err(err) = self.materialize(&id) {
            self.nav = saved;
            self.set_toast(err.to_string());
        }
    }

    /// Follows the `number`-th (1-based) link of the current note. Out of
    /// range and unresolved anchors are silent no-ops.
    fn follow_link(&mut self, number: usize) {
        if number == 0 || number > self.note.links().len() || number > MAX_DIGIT_LINK {
            return;
        }
        let anchor = self.note.links()[number - 1].clone();
        let Some(id) = resolve_anchor(&self.store, &anchor) else {
            return;
        };
        self.navigate(|nav| {
            nav.push(id);
            true
        });
    }

    fn request_picker(&mut self) {
        self.picker_requested = true;
    }

    fn take_picker_request(&mut self) -> bool {
        std::mem::take(&mut self.picker_requested)
    }

    /// Appends picker results to the history; an empty (cancelled) result
    /// leaves everything unchanged.
    fn apply_picked(&mut self, ids: Vec<NoteId>) {
        if ids.is_empty() {
            return;
        }
        self.navigate(|nav| {
            nav.extend(ids);
            true
        });
    }

    fn ensure_layout(&mut self, dims: PaneDims) {
        if self.dims == dims {
            return;
        }
        self.dims = dims;
        self.content.rewrap(self.note.body(), dims.content_width, dims.content_height);
        self.links.relayout(self.note.links(), dims.links_width, dims.links_height);
    }

    fn history_label(&self) -> String {
        let position = self.nav.len() as isize + self.nav.head() + 1;
        format!("{position}/{}", self.nav.len())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        self.toast = None;

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.content.scroll.scroll_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.content.scroll.scroll_by(-1),
            KeyCode::Char('d') | KeyCode::PageDown => self.content.scroll.page(1),
            KeyCode::Char('u') | KeyCode::PageUp => self.content.scroll.page(-1),
            KeyCode::Char('g') | KeyCode::Home => self.content.scroll.to_start(),
            KeyCode::Char('G') | KeyCode::End => self.content.scroll.to_end(),
            KeyCode::Char('J') => self.links.scroll.scroll_by(1),
            KeyCode::Char('K') => self.links.scroll.scroll_by(-1),
            KeyCode::Char('h') | KeyCode::Left => self.navigate(NavStack::go_back),
            KeyCode::Char('l') | KeyCode::Right => self.navigate(NavStack::go_forward),
            KeyCode::Char('H') => self.navigate(NavStack::go_oldest),
            KeyCode::Char('L') => self.navigate(NavStack::go_newest),
            KeyCode::Char('x') => self.navigate(NavStack::drop_current),
            KeyCode::Char('c') => {
                if self.nav.collapse_to_current() {
                    self.set_toast("History collapsed");
                }
            }
            KeyCode::Char('/') | KeyCode::Char('o') => self.request_picker(),
            KeyCode::Char(digit @ '1'..='9') => {
                self.follow_link(digit as usize - '0' as usize);
            }
            _ => {}
        }
    }
}

/// Runs the pager over a vault directory until the user quits.
pub fn run(folder: VaultFolder, options: PagerOptions) -> Result<(), Box<dyn Error>> {
    let theme = TuiTheme::from_env()?;
    let meta = folder.load_meta();

    let start = match options.start_note {
        Some(id) => id,
        None => pick_start_note(&folder)?,
    };

    let mut app = App::new(folder, meta, theme, start, options.links_ratio)?;
    let mut terminal = TerminalSession::new()?;

    while !app.should_quit {
        terminal.draw(|frame| draw(frame, &mut app))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                app.handle_key(key);
                if app.take_picker_request() {
                    let result = terminal.run_external_action(|| pick_notes(app.store()));
                    match result {
                        Ok(ids) => app.apply_picked(ids),
                        Err(err) => app.set_toast(format!("Picker failed: {err}")),
                    }
                }
            }
            // Resize re-derives the wrap on the next draw via ensure_layout.
            _ => {}
        }
    }

    Ok(())
}

/// Chooses the note the pager opens with when `--note` was not given: the
/// first picker result, falling back to the first indexed note on cancel.
fn pick_start_note(folder: &VaultFolder) -> Result<NoteId, Box<dyn Error>> {
    let picked = pick_notes(folder).map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
    if let Some(id) = picked.into_iter().next() {
        return Ok(id);
    }
    match folder.list().into_iter().next() {
        Some((_, id)) => Ok(id),
        None => Err(format!("vault has no notes: {}", folder.dir().display()).into()),
    }
}

fn draw<S: NoteStore + NoteIndex>(frame: &mut Frame<'_>, app: &mut App<S>) {
    let area = frame.size();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let main_area = rows[0];
    let footer_area = rows[1];

    let links_pane_width = (main_area.width / app.links_ratio).max(MIN_LINKS_PANE_WIDTH);
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(links_pane_width)])
        .split(main_area);
    let content_area = panes[0];
    let links_area = panes[1];

    app.ensure_layout(PaneDims::from_areas(content_area, links_area));

    let content_lines = app
        .content
        .visible()
        .iter()
        .map(|line| Line::from(Span::styled(line.text.clone(), app.theme.content_style(line.kind))))
        .collect::<Vec<_>>();
    let content = Paragraph::new(Text::from(content_lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", app.note.title()))
            .border_style(app.theme.border_style()),
    );
    frame.render_widget(content, content_area);

    let link_lines = app
        .links
        .visible()
        .iter()
        .map(|entry| Line::from(Span::styled(entry.clone(), app.theme.link_style())))
        .collect::<Vec<_>>();
    let links = Paragraph::new(Text::from(link_lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Links ({}) ", app.links.link_count()))
            .border_style(app.theme.border_style()),
    );
    frame.render_widget(links, links_area);

    frame.render_widget(footer_line(app), footer_area);
}

fn footer_line<S: NoteStore + NoteIndex>(app: &App<S>) -> Paragraph<'static> {
    if let Some(toast) = &app.toast {
        return Paragraph::new(Line::from(Span::styled(toast.clone(), app.theme.toast_style())));
    }

    let mut spans = vec![
        Span::styled(" q", app.theme.footer_key_style()),
        Span::styled(" quit  ", app.theme.footer_label_style()),
        Span::styled("j/k", app.theme.footer_key_style()),
        Span::styled(" scroll  ", app.theme.footer_label_style()),
        Span::styled("h/l", app.theme.footer_key_style()),
        Span::styled(" back/fwd  ", app.theme.footer_label_style()),
        Span::styled("1-9", app.theme.footer_key_style()),
        Span::styled(" follow  ", app.theme.footer_label_style()),
        Span::styled("/", app.theme.footer_key_style()),
        Span::styled(" pick  ", app.theme.footer_label_style()),
        Span::styled(app.history_label(), app.theme.footer_key_style()),
    ];

    if let Some(meta) = &app.meta {
        if let Some(label) = vault_label(meta) {
            spans.push(Span::styled("  ", app.theme.footer_label_style()));
            spans.push(Span::styled(label, app.theme.footer_label_style()));
        }
    }

    Paragraph::new(Line::from(spans))
}

fn vault_label(meta: &VaultMeta) -> Option<String> {
    match (&meta.name, &meta.author) {
        (Some(name), Some(author)) => Some(format!("{name} — {author}")),
        (Some(name), None) => Some(name.clone()),
        (None, Some(author)) => Some(author.clone()),
        (None, None) => None,
    }
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let acquired = (|| {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
            terminal.clear()?;
            Ok::<_, io::Error>(terminal)
        })();

        match acquired {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                teardown_terminal();
                Err(err.into())
            }
        }
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }

    /// Releases the terminal for the duration of `action` (the fuzzy picker
    /// runs its own session), then reacquires it as if freshly started.
    fn run_external_action<T>(
        &mut self,
        action: impl FnOnce() -> Result<T, String>,
    ) -> Result<T, String> {
        let _suspend = TerminalSuspendGuard::new(&mut self.terminal)
            .map_err(|err| format!("terminal suspend failed: {err}"))?;
        action()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

struct TerminalSuspendGuard<'a> {
    terminal: &'a mut Terminal<CrosstermBackend<io::Stdout>>,
}

impl<'a> TerminalSuspendGuard<'a> {
    fn new(terminal: &'a mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<Self> {
        terminal.show_cursor()?;
        disable_raw_mode()?;

        let released = execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .and_then(|()| ratatui::backend::Backend::flush(terminal.backend_mut()));
        match released {
            Ok(()) => Ok(Self { terminal }),
            // Half-released terminal; reacquire before reporting failure.
            Err(err) => {
                reacquire_terminal(terminal);
                Err(err)
            }
        }
    }
}

impl Drop for TerminalSuspendGuard<'_> {
    fn drop(&mut self) {
        reacquire_terminal(self.terminal);
    }
}

/// Puts the pager's terminal state back after an external action (or a failed
/// suspend). Errors are ignored; there is no better recovery at this point.
fn reacquire_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    let _ = enable_raw_mode();
    let _ = execute!(terminal.backend_mut(), EnterAlternateScreen);
    let _ = terminal.clear();
    let _ = terminal.hide_cursor();
    let _ = ratatui::backend::Backend::flush(terminal.backend_mut());
}

/// Restores cooked mode and the main screen; safe to call on any exit path.
fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}
