//! Textpad application
//!
//! Window chrome around the editor shell: menu bar, toolbar, status bar
//! and the editing surface. Every click or shortcut becomes a `Command`.

use crate::commands::{route_event, Command, MenuItem, Routed, FONT_SIZE_MENU, MENUS, TOOLBAR};
use crate::dialogs::NativeDialogs;
use crate::editor::{EditorSurface, SurfaceStyle};
use crate::session::FontSize;
use crate::shell::EditorShell;
use egui::Context;
use padcore::theme::{consume_zoom_keys, menu_bar};
use padcore::widgets::{status_bar, toolbar, toolbar_separator, ToolbarButton};
use padcore::{EditorConfig, PadTheme, Theme};

pub struct TextEditorApp {
    shell: EditorShell<EditorSurface, NativeDialogs>,
    chrome: PadTheme,
    /// Theme currently pushed into the egui style.
    applied_theme: Option<Theme>,
    applied_title: String,
    /// Close requests pass through once the shell has agreed to exit.
    close_confirmed: bool,
}

impl TextEditorApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: &EditorConfig) -> Self {
        let shell = EditorShell::new(EditorSurface::default(), NativeDialogs)
            .with_save_confirmation(config.confirm_saves);
        let mut app = Self {
            applied_title: shell.window_title(),
            shell,
            chrome: PadTheme::default(),
            applied_theme: None,
            close_confirmed: false,
        };
        app.apply_theme(&cc.egui_ctx);
        app
    }

    fn apply_theme(&mut self, ctx: &Context) {
        let theme = self.shell.state().theme;
        if self.applied_theme != Some(theme) {
            log::debug!("applying {} theme", theme.name());
            self.chrome.apply(ctx, theme);
            self.applied_theme = Some(theme);
        }
    }

    fn sync_title(&mut self, ctx: &Context) {
        let title = self.shell.window_title();
        if title != self.applied_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.applied_title = title;
        }
    }

    /// Whether a menu entry or toolbar button shows as switched on.
    fn is_checked(&self, command: Command) -> bool {
        let state = self.shell.state();
        match command {
            Command::Bold => state.font.bold,
            Command::Italic => state.font.italic,
            Command::SetTheme(theme) => state.theme == theme,
            Command::SetFontSize(size) => state.font.size == size,
            _ => false,
        }
    }

    // ---------------------------------------------------------------
    // Keyboard handling
    // ---------------------------------------------------------------

    fn handle_keyboard(&mut self, ctx: &Context) {
        consume_zoom_keys(ctx);

        // commands run after the input lock is released; they may block on a dialog
        let mut deferred: Vec<Routed> = Vec::new();
        let surface = self.shell.surface_mut();
        ctx.input_mut(|i| {
            let events = std::mem::take(&mut i.events);
            let mut remaining = Vec::new();
            for event in events {
                match route_event(&event) {
                    Some(Routed::Edit(edit)) => {
                        if !surface.handle_event(&edit) {
                            remaining.push(event);
                        }
                    }
                    Some(r) => deferred.push(r),
                    None => remaining.push(event),
                }
            }
            i.events = remaining;
        });
        self.shell.sync();

        for r in deferred {
            match r {
                Routed::Command(command) => self.shell.execute(command),
                Routed::PasteText(text) => self.shell.paste_text(&text),
                Routed::Edit(_) => {}
            }
        }
    }

    // ---------------------------------------------------------------
    // UI rendering
    // ---------------------------------------------------------------

    fn render_menu_bar(&self, ui: &mut egui::Ui) -> Option<Command> {
        let mut clicked = None;
        menu_bar(ui, |ui| {
            for menu in MENUS {
                ui.menu_button(menu.title, |ui| {
                    for item in menu.items {
                        match item {
                            MenuItem::Command(command) => {
                                if self.menu_entry(ui, *command) {
                                    clicked = Some(*command);
                                    ui.close_menu();
                                }
                            }
                            MenuItem::Separator => {
                                ui.separator();
                            }
                            MenuItem::FontSizes => {
                                ui.menu_button(FONT_SIZE_MENU, |ui| {
                                    for size in FontSize::ALL {
                                        let command = Command::SetFontSize(size);
                                        if self.menu_entry(ui, command) {
                                            clicked = Some(command);
                                            ui.close_menu();
                                        }
                                    }
                                });
                            }
                        }
                    }
                });
            }
        });
        clicked
    }

    fn menu_entry(&self, ui: &mut egui::Ui, command: Command) -> bool {
        let mut button = egui::Button::new(command.label()).selected(self.is_checked(command));
        if let Some(chord) = command.shortcut() {
            button = button.shortcut_text(chord.label());
        }
        ui.add(button).clicked()
    }

    fn render_toolbar(&self, ui: &mut egui::Ui) -> Option<Command> {
        let mut clicked = None;
        toolbar(ui, |ui| {
            for command in TOOLBAR {
                if matches!(command, Command::Bold | Command::ToggleTheme) {
                    toolbar_separator(ui);
                }
                let label = command.label();
                let button = ToolbarButton::new(&label).selected(self.is_checked(*command));
                if ui.add(button).clicked() {
                    clicked = Some(*command);
                }
            }
        });
        clicked
    }

    fn render_editor(&mut self, ui: &mut egui::Ui) {
        let state = self.shell.state();
        let style = SurfaceStyle {
            font: state.font,
            palette: state.theme.palette(),
        };
        let rect = ui.available_rect_before_wrap();
        self.shell.surface_mut().render(ui, rect, &style);
    }
}

impl eframe::App for TextEditorApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let dt = ctx.input(|i| i.stable_dt as f64);
        self.shell.surface_mut().update(dt);

        self.handle_keyboard(ctx);
        self.apply_theme(ctx);

        let mut clicked = None;
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            clicked = self.render_menu_bar(ui);
        });
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            if let Some(command) = self.render_toolbar(ui) {
                clicked = Some(command);
            }
        });
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            status_bar(ui, self.shell.status_text());
        });
        let background = self.shell.state().theme.palette().background;
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(background).inner_margin(egui::Margin::same(0.0)))
            .show(ctx, |ui| self.render_editor(ui));

        if let Some(command) = clicked {
            self.shell.execute(command);
        }

        // mouse clicks in the editor move the caret after the status bar was drawn
        let status = self.shell.status_text().to_string();
        self.shell.sync();
        if status != self.shell.status_text() || clicked.is_some() {
            ctx.request_repaint();
        }
        self.sync_title(ctx);

        if ctx.input(|i| i.viewport().close_requested()) && !self.close_confirmed {
            if self.shell.exit_editor() {
                self.close_confirmed = true;
            } else {
                ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            }
        }
        if self.shell.exit_requested() && !self.close_confirmed {
            self.close_confirmed = true;
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        // caret blink
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
