use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

// Constants
const HOTKEY: &str = "ctrl+alt+t";
const TASKBAR_CLASS: &str = "Shell_TrayWnd";
const REFRESH_DELAY_MS: u64 = 100; // Give the shell a moment before asking for a repaint
const ELEVATION_WARNING_PAUSE_SECS: u64 = 3;

/// Fixed startup settings
#[derive(Debug, Clone)]
pub struct Config {
    pub hotkey: &'static str,
    pub taskbar_class: &'static str,
    pub refresh_delay: Duration,
    pub elevation_warning_pause: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hotkey: HOTKEY,
            taskbar_class: TASKBAR_CLASS,
            refresh_delay: Duration::from_millis(REFRESH_DELAY_MS),
            elevation_warning_pause: Duration::from_secs(ELEVATION_WARNING_PAUSE_SECS),
        }
    }
}

impl Config {
    pub fn parsed_hotkey(&self) -> Result<HotkeyCombo, AppError> {
        self.hotkey.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub win: bool,
}

/// The non-modifier part of a hotkey
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Letter(char),
    Digit(u8),
    Function(u8),
    Space,
    Tab,
    Enter,
    Escape,
    Backspace,
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    fn parse(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return match c {
                'a'..='z' => Some(Key::Letter(c.to_ascii_uppercase())),
                '0'..='9' => Some(Key::Digit(c as u8 - b'0')),
                _ => None,
            };
        }

        if let Some(n) = token.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            return (1..=12).contains(&n).then_some(Key::Function(n));
        }

        let key = match token {
            "space" => Key::Space,
            "tab" => Key::Tab,
            "enter" | "return" => Key::Enter,
            "esc" | "escape" => Key::Escape,
            "backspace" => Key::Backspace,
            "insert" | "ins" => Key::Insert,
            "delete" | "del" => Key::Delete,
            "home" => Key::Home,
            "end" => Key::End,
            "pageup" | "pgup" => Key::PageUp,
            "pagedown" | "pgdn" => Key::PageDown,
            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            _ => return None,
        };
        Some(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Letter(c) => write!(f, "{c}"),
            Key::Digit(d) => write!(f, "{d}"),
            Key::Function(n) => write!(f, "F{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// A parsed key combination such as `ctrl+alt+t`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyCombo {
    pub modifiers: Modifiers,
    pub key: Key,
}

impl FromStr for HotkeyCombo {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| AppError::InvalidHotkey(format!("'{s}': {reason}"));

        let mut modifiers = Modifiers::default();
        let mut key = None;

        for raw in s.split('+') {
            let token = raw.trim().to_ascii_lowercase();
            if token.is_empty() {
                return Err(invalid("empty key name".into()));
            }

            let slot = match token.as_str() {
                "ctrl" | "control" => Some(&mut modifiers.ctrl),
                "alt" | "option" => Some(&mut modifiers.alt),
                "shift" => Some(&mut modifiers.shift),
                "win" | "super" | "meta" | "cmd" => Some(&mut modifiers.win),
                _ => None,
            };

            match slot {
                Some(flag) if *flag => return Err(invalid(format!("'{token}' given twice"))),
                Some(flag) => *flag = true,
                None => {
                    let parsed = Key::parse(&token)
                        .ok_or_else(|| invalid(format!("unknown key '{token}'")))?;
                    if key.replace(parsed).is_some() {
                        return Err(invalid("more than one non-modifier key".into()));
                    }
                }
            }
        }

        let key = key.ok_or_else(|| invalid("no non-modifier key".into()))?;
        Ok(Self { modifiers, key })
    }
}

impl fmt::Display for HotkeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.modifiers;
        for (on, name) in [
            (m.ctrl, "Ctrl"),
            (m.alt, "Alt"),
            (m.shift, "Shift"),
            (m.win, "Win"),
        ] {
            if on {
                write!(f, "{name}+")?;
            }
        }
        write!(f, "{}", self.key)
    }
}
