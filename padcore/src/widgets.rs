//! Window chrome widgets: toolbar and status bar

use egui::{Response, Stroke, Ui, Widget};

/// A toolbar button: 1px outline in the current text colour, shown
/// highlighted while `selected`.
pub struct ToolbarButton<'a> {
    text: &'a str,
    selected: bool,
}

impl<'a> ToolbarButton<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, selected: false }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

impl<'a> Widget for ToolbarButton<'a> {
    fn ui(self, ui: &mut Ui) -> Response {
        let font = egui::TextStyle::Button.resolve(ui.style());
        let fg = ui.visuals().text_color();
        let bg = ui.visuals().panel_fill;
        let text_width = ui.fonts(|f| f.layout_no_wrap(self.text.to_string(), font.clone(), fg)).size().x;
        let size = egui::vec2(text_width + 16.0, ui.spacing().interact_size.y);
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            let inverted = response.is_pointer_button_down_on() || self.selected;
            let (fill, text_color) = if inverted { (fg, bg) } else { (bg, fg) };

            painter.rect_filled(rect, 0.0, fill);
            let stroke_width = if response.hovered() { 2.0 } else { 1.0 };
            painter.rect_stroke(rect, 0.0, Stroke::new(stroke_width, fg));
            painter.text(rect.center(), egui::Align2::CENTER_CENTER, self.text, font, text_color);
        }

        response
    }
}

/// Toolbar separator (vertical 1px line)
pub fn toolbar_separator(ui: &mut Ui) {
    let height = ui.spacing().interact_size.y;
    let (rect, _) = ui.allocate_exact_size(egui::vec2(8.0, height), egui::Sense::hover());

    if ui.is_rect_visible(rect) {
        ui.painter().vline(
            rect.center().x,
            rect.y_range(),
            Stroke::new(1.0, ui.visuals().text_color()),
        );
    }
}

/// Toolbar strip: panel fill, 1px outline
pub fn toolbar(ui: &mut Ui, add_contents: impl FnOnce(&mut Ui)) {
    egui::Frame::none()
        .fill(ui.visuals().panel_fill)
        .stroke(Stroke::new(1.0, ui.visuals().text_color()))
        .inner_margin(egui::Margin::symmetric(6.0, 3.0))
        .show(ui, |ui| {
            ui.horizontal(add_contents);
        });
}

/// Status bar: panel fill, 1px top border, left-aligned text
pub fn status_bar(ui: &mut Ui, text: &str) {
    egui::Frame::none()
        .fill(ui.visuals().panel_fill)
        .stroke(Stroke::new(1.0, ui.visuals().text_color()))
        .inner_margin(egui::Margin::symmetric(8.0, 2.0))
        .show(ui, |ui| {
            ui.with_layout(egui::Layout::left_to_right(egui::Align::Center), |ui| {
                ui.label(text);
            });
        });
}
