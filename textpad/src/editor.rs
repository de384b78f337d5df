//! Editing widget for textpad
//!
//! Owns the document, caret and selection, and paints itself with egui.
//! This is the concrete `TextEditingSurface` the shell drives.
//!
//! Selection modes:
//!   - Click: position cursor
//!   - Double-click: select word
//!   - Triple-click: select line
//!   - Click+drag: select arbitrary range
//!   - Shift+click: extend selection
//!   - Shift+arrow: extend selection

use crate::document::Document;
use crate::session::{Caret, FontAttributes};
use crate::surface::TextEditingSurface;
use egui::text::{CCursor, LayoutJob, TextFormat};
use egui::{FontId, Galley, Key, Modifiers, Pos2, Rect, Response, Sense, Stroke, Ui, Vec2};
use padcore::Palette;
use std::sync::Arc;

/// Cursor position in the document
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cursor {
    pub pos: usize,
    pub anchor: Option<usize>,
}

impl Cursor {
    pub fn new(pos: usize) -> Self {
        Self { pos, anchor: None }
    }

    pub fn start_selection(&mut self) {
        if self.anchor.is_none() {
            self.anchor = Some(self.pos);
        }
    }

    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    pub fn selection_range(&self) -> Option<(usize, usize)> {
        self.anchor.map(|anchor| {
            if anchor < self.pos { (anchor, self.pos) } else { (self.pos, anchor) }
        })
    }

    pub fn has_selection(&self) -> bool {
        self.anchor.is_some() && self.anchor != Some(self.pos)
    }
}

/// Where cut and copied text goes.
///
/// The system clipboard is tried first; the in-process buffer always
/// holds the last copy so paste keeps working when the system one fails.
pub struct Clipboard {
    use_system: bool,
    internal: String,
}

impl Clipboard {
    pub fn system() -> Self {
        Self { use_system: true, internal: String::new() }
    }

    /// In-process only.
    #[cfg(test)]
    pub fn internal() -> Self {
        Self { use_system: false, internal: String::new() }
    }

    fn set(&mut self, text: &str) {
        self.internal = text.to_string();
        if self.use_system {
            // fresh handle each time; long-lived handles go stale on some platforms
            match arboard::Clipboard::new() {
                Ok(mut cb) => {
                    if let Err(e) = cb.set_text(text) {
                        log::debug!("system clipboard write failed: {}", e);
                    }
                }
                Err(e) => log::debug!("system clipboard unavailable: {}", e),
            }
        }
    }

    fn get(&self) -> Option<String> {
        let system = if self.use_system {
            arboard::Clipboard::new().ok().and_then(|mut cb| cb.get_text().ok())
        } else {
            None
        };
        system
            .filter(|t| !t.is_empty())
            .or_else(|| Some(self.internal.clone()).filter(|t| !t.is_empty()))
    }
}

/// How the session wants the text drawn
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceStyle {
    pub font: FontAttributes,
    pub palette: Palette,
}

impl SurfaceStyle {
    pub fn font_id(&self) -> FontId {
        FontId::monospace(self.font.size.points() as f32)
    }

    pub fn line_height(&self) -> f32 {
        (self.font.size.points() as f32 * 1.5).round()
    }
}

pub struct EditorSurface {
    doc: Document,
    pub cursor: Cursor,
    clipboard: Clipboard,
    pub scroll_offset: Vec2,
    pub left_margin: f32,
    pub cursor_visible: bool,
    /// Scroll the caret into view on the next render.
    follow_cursor: bool,
    cursor_blink_time: f64,
    /// Mouse drag state for text selection
    is_dragging: bool,
    /// Multi-click tracking
    last_click_time: f64,
    click_count: u32,
    last_click_pos: usize,
    /// Word-select anchor for double-click+drag
    word_sel_start: Option<usize>,
    word_sel_end: Option<usize>,
}

impl Default for EditorSurface {
    fn default() -> Self {
        Self::new(Clipboard::system())
    }
}

impl EditorSurface {
    pub fn new(clipboard: Clipboard) -> Self {
        Self {
            doc: Document::new(),
            cursor: Cursor::default(),
            clipboard,
            scroll_offset: Vec2::ZERO,
            left_margin: 6.0,
            cursor_visible: true,
            follow_cursor: true,
            cursor_blink_time: 0.0,
            is_dragging: false,
            last_click_time: 0.0,
            click_count: 0,
            last_click_pos: usize::MAX,
            word_sel_start: None,
            word_sel_end: None,
        }
    }

    // ---------------------------------------------------------------
    // Layout
    // ---------------------------------------------------------------

    /// One galley per document line, wrapped to `wrap_width`.
    fn layout(ctx: &egui::Context, text: &str, style: &SurfaceStyle, wrap_width: f32) -> Arc<Galley> {
        let mut job = LayoutJob::single_section(
            text.to_string(),
            TextFormat {
                font_id: style.font_id(),
                color: style.palette.foreground,
                italics: style.font.italic,
                line_height: Some(style.line_height()),
                ..Default::default()
            },
        );
        job.wrap.max_width = wrap_width;
        ctx.fonts(|f| f.layout_job(job))
    }

    fn layout_lines(&self, ctx: &egui::Context, style: &SurfaceStyle, wrap_width: f32) -> Vec<LineLayout> {
        let line_height = style.line_height();
        let mut top = 0.0;
        (0..self.doc.line_count())
            .map(|line| {
                let text = self.doc.line(line).unwrap_or_default();
                let galley = Self::layout(ctx, &text, style, wrap_width);
                let laid = LineLayout {
                    start: self.doc.line_col_to_char(line, 0),
                    len: text.chars().count(),
                    top,
                    height: galley.size().y.max(line_height),
                    galley,
                };
                top += laid.height;
                laid
            })
            .collect()
    }

    /// Convert a position relative to the text origin into a character offset.
    fn hit_test(lines: &[LineLayout], pos: Vec2) -> usize {
        let Some(line) = lines.iter().rev().find(|l| l.top <= pos.y).or(lines.first()) else {
            return 0;
        };
        let local = Vec2::new(pos.x, pos.y - line.top);
        line.start + line.galley.cursor_from_pos(local).ccursor.index.min(line.len)
    }

    /// Caret rectangle relative to the text origin.
    fn caret_rect(lines: &[LineLayout], pos: usize, line_height: f32) -> Option<Rect> {
        let line = lines.iter().rev().find(|l| l.start <= pos)?;
        let col = (pos - line.start).min(line.len);
        let at = line.galley.pos_from_cursor(&line.galley.from_ccursor(CCursor::new(col)));
        Some(Rect::from_min_size(
            Pos2::new(at.min.x, line.top + at.min.y),
            Vec2::new(0.0, line_height),
        ))
    }

    /// Find word boundaries around a character position.
    fn word_boundaries_at(&self, char_pos: usize) -> (usize, usize) {
        let chars: Vec<char> = self.doc.text().chars().collect();
        let len = chars.len();
        let pos = char_pos.min(len);
        if pos >= len { return (len, len); }
        let is_word = |c: char| c.is_alphanumeric() || c == '_';
        let ch = chars[pos];
        if is_word(ch) {
            let mut start = pos;
            while start > 0 && is_word(chars[start - 1]) { start -= 1; }
            let mut end = pos;
            while end < len && is_word(chars[end]) { end += 1; }
            (start, end)
        } else if ch.is_whitespace() && ch != '\n' {
            let mut start = pos;
            while start > 0 && chars[start - 1].is_whitespace() && chars[start - 1] != '\n' { start -= 1; }
            let mut end = pos;
            while end < len && chars[end].is_whitespace() && chars[end] != '\n' { end += 1; }
            (start, end)
        } else {
            (pos, (pos + 1).min(len))
        }
    }

    /// Line boundaries around a character position, line break excluded.
    fn line_boundaries_at(&self, char_pos: usize) -> (usize, usize) {
        let (line, _) = self.doc.char_to_line_col(char_pos);
        let line_start = self.doc.line_col_to_char(line, 0);
        (line_start, line_start + self.doc.line_len(line))
    }

    // ---------------------------------------------------------------
    // Cursor movement
    // ---------------------------------------------------------------

    pub fn move_left(&mut self, select: bool) {
        if select { self.cursor.start_selection(); }
        else if let Some((start, _)) = self.cursor.selection_range().filter(|_| self.cursor.has_selection()) {
            self.cursor.pos = start; self.cursor.clear_selection(); return;
        }
        if self.cursor.pos > 0 { self.cursor.pos -= 1; }
        if !select { self.cursor.clear_selection(); }
    }

    pub fn move_right(&mut self, select: bool) {
        if select { self.cursor.start_selection(); }
        else if let Some((_, end)) = self.cursor.selection_range().filter(|_| self.cursor.has_selection()) {
            self.cursor.pos = end; self.cursor.clear_selection(); return;
        }
        if self.cursor.pos < self.doc.char_count() { self.cursor.pos += 1; }
        if !select { self.cursor.clear_selection(); }
    }

    pub fn move_up(&mut self, select: bool) {
        if select { self.cursor.start_selection(); }
        let (line, col) = self.doc.char_to_line_col(self.cursor.pos);
        if line > 0 { self.cursor.pos = self.doc.line_col_to_char(line - 1, col); }
        else { self.cursor.pos = 0; }
        if !select { self.cursor.clear_selection(); }
    }

    pub fn move_down(&mut self, select: bool) {
        if select { self.cursor.start_selection(); }
        let (line, col) = self.doc.char_to_line_col(self.cursor.pos);
        if line + 1 < self.doc.line_count() { self.cursor.pos = self.doc.line_col_to_char(line + 1, col); }
        else { self.cursor.pos = self.doc.char_count(); }
        if !select { self.cursor.clear_selection(); }
    }

    pub fn move_to_line_start(&mut self, select: bool) {
        if select { self.cursor.start_selection(); }
        let (line, _) = self.doc.char_to_line_col(self.cursor.pos);
        self.cursor.pos = self.doc.line_col_to_char(line, 0);
        if !select { self.cursor.clear_selection(); }
    }

    pub fn move_to_line_end(&mut self, select: bool) {
        if select { self.cursor.start_selection(); }
        let (line, _) = self.doc.char_to_line_col(self.cursor.pos);
        self.cursor.pos = self.doc.line_col_to_char(line, self.doc.line_len(line));
        if !select { self.cursor.clear_selection(); }
    }

    pub fn move_word_left(&mut self, select: bool) {
        if select { self.cursor.start_selection(); }
        let chars: Vec<char> = self.doc.text().chars().collect();
        let mut pos = self.cursor.pos.min(chars.len());
        while pos > 0 && chars[pos - 1].is_whitespace() { pos -= 1; }
        while pos > 0 && !chars[pos - 1].is_whitespace() { pos -= 1; }
        self.cursor.pos = pos;
        if !select { self.cursor.clear_selection(); }
    }

    pub fn move_word_right(&mut self, select: bool) {
        if select { self.cursor.start_selection(); }
        let chars: Vec<char> = self.doc.text().chars().collect();
        let len = chars.len();
        let mut pos = self.cursor.pos.min(len);
        while pos < len && !chars[pos].is_whitespace() { pos += 1; }
        while pos < len && chars[pos].is_whitespace() { pos += 1; }
        self.cursor.pos = pos;
        if !select { self.cursor.clear_selection(); }
    }

    // ---------------------------------------------------------------
    // Editing
    // ---------------------------------------------------------------

    /// Remove the selected text, leaving the caret at its start.
    fn delete_selection(&mut self) -> bool {
        match self.cursor.selection_range().filter(|_| self.cursor.has_selection()) {
            Some((start, end)) => {
                self.doc.delete_range(start, end);
                self.cursor = Cursor::new(start);
                true
            }
            None => {
                self.cursor.clear_selection();
                false
            }
        }
    }

    pub fn insert_text(&mut self, text: &str) {
        if text.is_empty() && !self.cursor.has_selection() { return; }
        self.doc.save_undo_state(self.cursor.pos);
        self.delete_selection();
        self.doc.insert(self.cursor.pos, text);
        self.cursor.pos += text.chars().count();
        self.reset_blink();
    }

    pub fn backspace(&mut self) {
        if !self.cursor.has_selection() && self.cursor.pos == 0 {
            self.cursor.clear_selection();
            return;
        }
        self.doc.save_undo_state(self.cursor.pos);
        if !self.delete_selection() {
            self.cursor.pos -= 1;
            self.doc.delete(self.cursor.pos);
        }
    }

    pub fn delete_forward(&mut self) {
        if !self.cursor.has_selection() && self.cursor.pos >= self.doc.char_count() {
            self.cursor.clear_selection();
            return;
        }
        self.doc.save_undo_state(self.cursor.pos);
        if !self.delete_selection() {
            self.doc.delete(self.cursor.pos);
        }
    }

    pub fn selected_text(&self) -> Option<String> {
        if !self.cursor.has_selection() { return None; }
        self.cursor.selection_range().map(|(s, e)| self.doc.get_range(s, e))
    }

    // ---------------------------------------------------------------
    // Keyboard input (shortcuts are routed elsewhere)
    // ---------------------------------------------------------------

    /// Apply a text or key event. Returns whether it was used.
    pub fn handle_event(&mut self, event: &egui::Event) -> bool {
        match event {
            egui::Event::Text(text) => {
                let printable: String = text.chars().filter(|c| !c.is_control()).collect();
                if printable.is_empty() { return false; }
                self.insert_text(&printable);
                true
            }
            egui::Event::Key { key, pressed: true, modifiers, .. } => self.handle_key(*key, *modifiers),
            _ => false,
        }
    }

    fn handle_key(&mut self, key: Key, modifiers: Modifiers) -> bool {
        let select = modifiers.shift;
        let word = modifiers.alt || modifiers.command;
        match key {
            Key::ArrowLeft if word => self.move_word_left(select),
            Key::ArrowLeft => self.move_left(select),
            Key::ArrowRight if word => self.move_word_right(select),
            Key::ArrowRight => self.move_right(select),
            Key::ArrowUp => self.move_up(select),
            Key::ArrowDown => self.move_down(select),
            Key::Home => self.move_to_line_start(select),
            Key::End => self.move_to_line_end(select),
            Key::Backspace => self.delete(),
            Key::Delete => self.delete_forward(),
            Key::Enter => self.insert_text("\n"),
            Key::Tab => self.insert_text("    "),
            _ => return false,
        }
        self.reset_blink();
        true
    }

    // ---------------------------------------------------------------
    // Cursor blink
    // ---------------------------------------------------------------

    pub fn update(&mut self, dt: f64) {
        self.cursor_blink_time += dt;
        if self.cursor_blink_time >= 0.5 { self.cursor_blink_time = 0.0; self.cursor_visible = !self.cursor_visible; }
    }

    pub fn reset_blink(&mut self) {
        self.cursor_visible = true;
        self.cursor_blink_time = 0.0;
        self.follow_cursor = true;
    }

    // ---------------------------------------------------------------
    // Rendering, with mouse interaction for selection
    // ---------------------------------------------------------------

    pub fn render(&mut self, ui: &mut Ui, rect: Rect, style: &SurfaceStyle) -> Response {
        let ctx = ui.ctx().clone();
        let response = ui.allocate_rect(rect, Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let fg = style.palette.foreground;
        let line_height = style.line_height();

        painter.rect_filled(rect, 0.0, style.palette.background);

        let text_area = Rect::from_min_max(
            rect.min + Vec2::new(self.left_margin, 4.0),
            rect.max - Vec2::new(4.0, 4.0),
        );
        let lines = self.layout_lines(&ctx, style, text_area.width().max(line_height));
        let total_height = lines.last().map_or(line_height, |l| l.top + l.height);
        let to_text = |pos: Pos2, scroll: Vec2| pos - text_area.min + scroll;

        // ---- Mouse interaction ----
        let time = ctx.input(|i| i.time);
        let shift_held = ctx.input(|i| i.modifiers.shift);
        let pressed = response.hovered() && ctx.input(|i| i.pointer.primary_pressed());

        if pressed {
            if let Some(pos) = ctx.input(|i| i.pointer.interact_pos()) {
                let char_pos = Self::hit_test(&lines, to_text(pos, self.scroll_offset));

                // Multi-click: same line, within a few chars, within 0.4s
                let near_last = {
                    let (line_a, _) = self.doc.char_to_line_col(char_pos);
                    let (line_b, _) = self.doc.char_to_line_col(self.last_click_pos.min(self.doc.char_count()));
                    line_a == line_b && char_pos.abs_diff(self.last_click_pos) < 3
                };
                let is_multi = (time - self.last_click_time) < 0.4 && near_last;
                if is_multi { self.click_count += 1; } else { self.click_count = 1; }
                self.last_click_time = time;
                self.last_click_pos = char_pos;

                match self.click_count {
                    1 => {
                        if shift_held {
                            self.cursor.start_selection();
                            self.cursor.pos = char_pos;
                        } else {
                            self.cursor.pos = char_pos;
                            self.cursor.anchor = Some(char_pos);
                        }
                        self.is_dragging = true;
                        self.word_sel_start = None;
                        self.word_sel_end = None;
                    }
                    2 => {
                        let (start, end) = self.word_boundaries_at(char_pos);
                        self.cursor.anchor = Some(start);
                        self.cursor.pos = end;
                        self.word_sel_start = Some(start);
                        self.word_sel_end = Some(end);
                        self.is_dragging = true;
                    }
                    _ => {
                        let (start, end) = self.line_boundaries_at(char_pos);
                        self.cursor.anchor = Some(start);
                        self.cursor.pos = end;
                        self.is_dragging = false;
                        self.word_sel_start = None;
                        self.word_sel_end = None;
                        self.click_count = 0;
                    }
                }
                self.reset_blink();
            }
        }

        if self.is_dragging && response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                let char_pos = Self::hit_test(&lines, to_text(pos, self.scroll_offset));

                if let (Some(ws), Some(we)) = (self.word_sel_start, self.word_sel_end) {
                    // Word-by-word extension from double-click
                    let (word_start, word_end) = self.word_boundaries_at(char_pos);
                    if char_pos < ws {
                        self.cursor.anchor = Some(we);
                        self.cursor.pos = word_start;
                    } else {
                        self.cursor.anchor = Some(ws);
                        self.cursor.pos = word_end;
                    }
                } else {
                    self.cursor.pos = char_pos;
                }
                self.reset_blink();
            }
        }

        if self.is_dragging && ctx.input(|i| i.pointer.primary_released()) {
            self.is_dragging = false;
            self.word_sel_start = None;
            self.word_sel_end = None;
            if self.cursor.anchor == Some(self.cursor.pos) { self.cursor.clear_selection(); }
        }

        // ---- Scrolling ----
        let max_scroll = (total_height - line_height).max(0.0);
        let scroll_delta = ctx.input(|i| i.smooth_scroll_delta.y);
        if scroll_delta != 0.0 && response.hovered() {
            self.scroll_offset.y -= scroll_delta;
        }
        let caret = Self::caret_rect(&lines, self.cursor.pos, line_height);
        if self.follow_cursor {
            if let Some(c) = caret {
                if c.min.y < self.scroll_offset.y {
                    self.scroll_offset.y = c.min.y;
                }
                if c.max.y > self.scroll_offset.y + text_area.height() {
                    self.scroll_offset.y = c.max.y - text_area.height();
                }
            }
            self.follow_cursor = false;
        }
        self.scroll_offset.y = self.scroll_offset.y.clamp(0.0, max_scroll);
        let origin = text_area.min - self.scroll_offset;

        // ---- Painting ----
        let selection = self.cursor.selection_range().filter(|_| self.cursor.has_selection());
        let view_top = self.scroll_offset.y;
        let view_bottom = view_top + rect.height();

        for line in lines.iter().filter(|l| l.top + l.height >= view_top && l.top <= view_bottom) {
            let line_origin = origin + Vec2::new(0.0, line.top);

            if let Some((sel_start, sel_end)) = selection {
                let line_end = line.start + line.len;
                if sel_end > line.start && sel_start <= line_end {
                    let last_row = line.galley.rows.len().saturating_sub(1);
                    let mut row_start = line.start;
                    for (i, row) in line.galley.rows.iter().enumerate() {
                        let row_end = row_start + row.char_count_excluding_newline();
                        let from = sel_start.max(row_start);
                        let to = sel_end.min(row_end);
                        // selection runs through the line break
                        let through_break = i == last_row && sel_end > line_end;
                        if from < to || (through_break && from <= to) {
                            let x_start = row.x_offset(from - row_start);
                            let mut x_end = row.x_offset(to - row_start);
                            if through_break { x_end += line_height / 3.0; }
                            painter.rect_filled(
                                Rect::from_min_max(
                                    line_origin + Vec2::new(x_start, row.min_y()),
                                    line_origin + Vec2::new(x_end, row.max_y()),
                                ),
                                0.0,
                                fg.gamma_multiply(0.3),
                            );
                        }
                        row_start = row_end;
                    }
                }
            }

            if line.len > 0 {
                if style.font.bold {
                    // no bold face in the default fonts: overstrike
                    painter.galley(line_origin + Vec2::new(1.0, 0.0), line.galley.clone(), fg);
                }
                painter.galley(line_origin, line.galley.clone(), fg);
            }
        }

        // Caret, in the foreground colour
        if let Some(c) = caret.map(|c| c.translate(origin.to_vec2())) {
            ctx.output_mut(|o| o.ime = Some(egui::output::IMEOutput { rect, cursor_rect: c }));
            if self.cursor_visible && rect.intersects(c) {
                painter.vline(c.min.x, c.y_range(), Stroke::new(2.0, fg));
            }
        }

        response
    }
}

/// A document line laid out for painting, positioned in text coordinates.
struct LineLayout {
    /// Character offset of the line start.
    start: usize,
    /// Characters in the line, line break excluded.
    len: usize,
    top: f32,
    height: f32,
    galley: Arc<Galley>,
}

impl TextEditingSurface for EditorSurface {
    fn insert(&mut self, text: &str) {
        self.insert_text(text);
    }

    fn delete(&mut self) {
        self.backspace();
    }

    fn content(&self) -> String {
        self.doc.text()
    }

    fn set_content(&mut self, text: &str) {
        self.doc.reset(text);
        self.cursor = Cursor::default();
        self.scroll_offset = Vec2::ZERO;
        self.is_dragging = false;
        self.reset_blink();
    }

    fn undo(&mut self) {
        if let Some(pos) = self.doc.undo(self.cursor.pos) {
            self.cursor = Cursor::new(pos);
            self.reset_blink();
        }
    }

    fn redo(&mut self) {
        if let Some(pos) = self.doc.redo(self.cursor.pos) {
            self.cursor = Cursor::new(pos);
            self.reset_blink();
        }
    }

    fn cut(&mut self) {
        if let Some(text) = self.selected_text() {
            self.clipboard.set(&text);
            self.doc.save_undo_state(self.cursor.pos);
            self.delete_selection();
            self.reset_blink();
        }
    }

    fn copy(&mut self) {
        if let Some(text) = self.selected_text() {
            self.clipboard.set(&text);
        }
    }

    fn paste(&mut self) {
        if let Some(text) = self.clipboard.get() {
            self.insert_text(&text);
        }
    }

    fn select_all(&mut self) {
        self.cursor.anchor = Some(0);
        self.cursor.pos = self.doc.char_count();
        self.reset_blink();
    }

    fn caret(&self) -> Caret {
        let (line, col) = self.doc.char_to_line_col(self.cursor.pos);
        Caret { row: line + 1, column: col }
    }

    fn edit_modified(&self) -> bool {
        self.doc.changed()
    }

    fn set_edit_modified(&mut self, modified: bool) {
        self.doc.set_changed(modified);
    }
}
