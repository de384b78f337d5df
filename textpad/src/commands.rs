//! Command table
//!
//! Every action the editor offers, and the fixed tables that expose them:
//! keyboard bindings, menus and the toolbar. All three feed
//! `EditorShell::execute`.

use crate::session::FontSize;
use egui::{Key, Modifiers};
use padcore::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    New,
    Open,
    Save,
    SaveAs,
    Exit,
    Bold,
    Italic,
    SetFontSize(FontSize),
    SetTheme(Theme),
    ToggleTheme,
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
}

impl Command {
    pub fn label(self) -> String {
        match self {
            Command::New => "New".into(),
            Command::Open => "Open".into(),
            Command::Save => "Save".into(),
            Command::SaveAs => "Save As".into(),
            Command::Exit => "Exit".into(),
            Command::Bold => "Bold".into(),
            Command::Italic => "Italic".into(),
            Command::SetFontSize(size) => size.to_string(),
            Command::SetTheme(theme) => theme.label().into(),
            Command::ToggleTheme => "Theme".into(),
            Command::Undo => "Undo".into(),
            Command::Redo => "Redo".into(),
            Command::Cut => "Cut".into(),
            Command::Copy => "Copy".into(),
            Command::Paste => "Paste".into(),
            Command::SelectAll => "Select All".into(),
        }
    }

    /// Keyboard shortcut bound to this command, if any.
    pub fn shortcut(self) -> Option<Chord> {
        BINDINGS.iter().find(|b| b.command == self).map(|b| b.chord)
    }
}

/// Ctrl (Cmd on macOS) plus a key, optionally with Shift.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chord {
    pub key: Key,
    pub shift: bool,
}

impl Chord {
    pub const fn ctrl(key: Key) -> Self {
        Self { key, shift: false }
    }

    pub const fn ctrl_shift(key: Key) -> Self {
        Self { key, shift: true }
    }

    /// Whether a key press with these modifiers is this chord. Shift must
    /// match exactly.
    pub fn matches(self, key: Key, modifiers: Modifiers) -> bool {
        key == self.key && modifiers.command && !modifiers.alt && modifiers.shift == self.shift
    }

    pub fn label(self) -> String {
        let shift = if self.shift { "Shift+" } else { "" };
        format!("Ctrl+{}{}", shift, self.key.name())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Binding {
    pub chord: Chord,
    pub command: Command,
}

const fn bind(chord: Chord, command: Command) -> Binding {
    Binding { chord, command }
}

pub const BINDINGS: &[Binding] = &[
    bind(Chord::ctrl(Key::N), Command::New),
    bind(Chord::ctrl(Key::O), Command::Open),
    bind(Chord::ctrl(Key::S), Command::Save),
    bind(Chord::ctrl_shift(Key::S), Command::SaveAs),
    bind(Chord::ctrl(Key::Q), Command::Exit),
    bind(Chord::ctrl(Key::B), Command::Bold),
    bind(Chord::ctrl(Key::I), Command::Italic),
    bind(Chord::ctrl(Key::Z), Command::Undo),
    bind(Chord::ctrl(Key::Y), Command::Redo),
    bind(Chord::ctrl(Key::X), Command::Cut),
    bind(Chord::ctrl(Key::C), Command::Copy),
    bind(Chord::ctrl(Key::V), Command::Paste),
    bind(Chord::ctrl(Key::A), Command::SelectAll),
];

pub fn lookup(key: Key, modifiers: Modifiers) -> Option<Command> {
    BINDINGS.iter().find(|b| b.chord.matches(key, modifiers)).map(|b| b.command)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuItem {
    Command(Command),
    Separator,
    /// Submenu listing every `FontSize`.
    FontSizes,
}

pub struct Menu {
    pub title: &'static str,
    pub items: &'static [MenuItem],
}

pub const MENUS: &[Menu] = &[
    Menu {
        title: "File",
        items: &[
            MenuItem::Command(Command::New),
            MenuItem::Command(Command::Open),
            MenuItem::Command(Command::Save),
            MenuItem::Command(Command::SaveAs),
            MenuItem::Separator,
            MenuItem::Command(Command::Exit),
        ],
    },
    Menu {
        title: "Edit",
        items: &[
            MenuItem::Command(Command::Undo),
            MenuItem::Command(Command::Redo),
            MenuItem::Separator,
            MenuItem::Command(Command::Cut),
            MenuItem::Command(Command::Copy),
            MenuItem::Command(Command::Paste),
            MenuItem::Separator,
            MenuItem::Command(Command::SelectAll),
        ],
    },
    Menu {
        title: "Format",
        items: &[
            MenuItem::Command(Command::Bold),
            MenuItem::Command(Command::Italic),
            MenuItem::FontSizes,
        ],
    },
    Menu {
        title: "Theme",
        items: &[
            MenuItem::Command(Command::SetTheme(Theme::Light)),
            MenuItem::Command(Command::SetTheme(Theme::Dark)),
        ],
    },
];

pub const FONT_SIZE_MENU: &str = "Font Size";

pub const TOOLBAR: &[Command] = &[
    Command::New,
    Command::Open,
    Command::Save,
    Command::Bold,
    Command::Italic,
    Command::ToggleTheme,
];

/// Where an input event should go.
#[derive(Clone, Debug, PartialEq)]
pub enum Routed {
    Command(Command),
    /// Platform paste, with the clipboard text already attached.
    PasteText(String),
    /// Plain typing or navigation for the editing surface.
    Edit(egui::Event),
}

/// Sort a raw input event. `None` leaves it to egui. Key presses that are
/// not shortcuts go to the surface, which hands back the ones it ignores.
pub fn route_event(event: &egui::Event) -> Option<Routed> {
    match event {
        egui::Event::Cut => Some(Routed::Command(Command::Cut)),
        egui::Event::Copy => Some(Routed::Command(Command::Copy)),
        egui::Event::Paste(text) => Some(Routed::PasteText(text.clone())),
        egui::Event::Text(text) if !text.is_empty() => Some(Routed::Edit(event.clone())),
        egui::Event::Key { key, pressed: true, modifiers, .. } => match lookup(*key, *modifiers) {
            Some(command) => Some(Routed::Command(command)),
            None => Some(Routed::Edit(event.clone())),
        },
        _ => None,
    }
}
