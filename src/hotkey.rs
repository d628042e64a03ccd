//! Global hotkey registration
//!
//! Uses the global-hotkey crate. On Windows its events are delivered through
//! the message loop of the thread that created the manager, so the
//! registration must live on the event loop thread.

use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use tracing::{debug, info, warn};

use crate::config::{HotkeyCombo, Key};
use crate::error::AppError;

const LETTERS: [Code; 26] = [
    Code::KeyA,
    Code::KeyB,
    Code::KeyC,
    Code::KeyD,
    Code::KeyE,
    Code::KeyF,
    Code::KeyG,
    Code::KeyH,
    Code::KeyI,
    Code::KeyJ,
    Code::KeyK,
    Code::KeyL,
    Code::KeyM,
    Code::KeyN,
    Code::KeyO,
    Code::KeyP,
    Code::KeyQ,
    Code::KeyR,
    Code::KeyS,
    Code::KeyT,
    Code::KeyU,
    Code::KeyV,
    Code::KeyW,
    Code::KeyX,
    Code::KeyY,
    Code::KeyZ,
];

const DIGITS: [Code; 10] = [
    Code::Digit0,
    Code::Digit1,
    Code::Digit2,
    Code::Digit3,
    Code::Digit4,
    Code::Digit5,
    Code::Digit6,
    Code::Digit7,
    Code::Digit8,
    Code::Digit9,
];

const FUNCTION_KEYS: [Code; 12] = [
    Code::F1,
    Code::F2,
    Code::F3,
    Code::F4,
    Code::F5,
    Code::F6,
    Code::F7,
    Code::F8,
    Code::F9,
    Code::F10,
    Code::F11,
    Code::F12,
];

fn to_code(key: Key) -> Code {
    match key {
        Key::Letter(c) => LETTERS[(c as u8 - b'A') as usize],
        Key::Digit(d) => DIGITS[d as usize],
        Key::Function(n) => FUNCTION_KEYS[(n - 1) as usize],
        Key::Space => Code::Space,
        Key::Tab => Code::Tab,
        Key::Enter => Code::Enter,
        Key::Escape => Code::Escape,
        Key::Backspace => Code::Backspace,
        Key::Insert => Code::Insert,
        Key::Delete => Code::Delete,
        Key::Home => Code::Home,
        Key::End => Code::End,
        Key::PageUp => Code::PageUp,
        Key::PageDown => Code::PageDown,
        Key::Up => Code::ArrowUp,
        Key::Down => Code::ArrowDown,
        Key::Left => Code::ArrowLeft,
        Key::Right => Code::ArrowRight,
    }
}

/// Convert a parsed combination to the global-hotkey representation
pub fn to_hotkey(combo: &HotkeyCombo) -> HotKey {
    let m = combo.modifiers;
    let mut mods = Modifiers::empty();
    if m.ctrl {
        mods |= Modifiers::CONTROL;
    }
    if m.alt {
        mods |= Modifiers::ALT;
    }
    if m.shift {
        mods |= Modifiers::SHIFT;
    }
    if m.win {
        mods |= Modifiers::META;
    }

    let mods = (!mods.is_empty()).then_some(mods);
    HotKey::new(mods, to_code(combo.key))
}

/// Registered hotkeys; all of them are released when this is dropped
pub struct HotkeyRegistration {
    manager: GlobalHotKeyManager,
    hotkeys: Vec<HotKey>,
}

impl HotkeyRegistration {
    pub fn register(combo: &HotkeyCombo) -> Result<Self, AppError> {
        let manager = GlobalHotKeyManager::new()
            .map_err(|e| AppError::HotkeyRegistrationFailed(e.to_string()))?;

        let hotkey = to_hotkey(combo);
        manager
            .register(hotkey)
            .map_err(|e| AppError::HotkeyRegistrationFailed(format!("{combo}: {e}")))?;
        info!("Registered hotkey: {}", combo);

        Ok(Self {
            manager,
            hotkeys: vec![hotkey],
        })
    }

    /// Call `on_press` for every press of a registered hotkey. Releases are
    /// ignored. The callback runs on the thread pumping the message loop.
    pub fn on_press<F>(&self, on_press: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let ids: Vec<u32> = self.hotkeys.iter().map(HotKey::id).collect();
        GlobalHotKeyEvent::set_event_handler(Some(move |event: GlobalHotKeyEvent| {
            if event.state == HotKeyState::Pressed && ids.contains(&event.id) {
                on_press();
            }
        }));
    }
}

impl Drop for HotkeyRegistration {
    fn drop(&mut self) {
        GlobalHotKeyEvent::set_event_handler(None::<fn(GlobalHotKeyEvent)>);
        match self.manager.unregister_all(&self.hotkeys) {
            Ok(()) => debug!("Hotkeys unregistered"),
            Err(e) => warn!("Failed to unregister hotkeys: {}", e),
        }
    }
}
