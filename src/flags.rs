use std::fmt;

/// Taskbar appearance bits as reported by `ABM_GETSTATE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppearanceFlags(u32);

impl AppearanceFlags {
    /// `ABS_AUTOHIDE`
    pub const AUTO_HIDE: u32 = 0x1;
    /// `ABS_ALWAYSONTOP`
    pub const ALWAYS_ON_TOP: u32 = 0x2;

    const KNOWN: u32 = Self::AUTO_HIDE | Self::ALWAYS_ON_TOP;

    pub const fn new(auto_hide: bool, always_on_top: bool) -> Self {
        let mut bits = 0;
        if auto_hide {
            bits |= Self::AUTO_HIDE;
        }
        if always_on_top {
            bits |= Self::ALWAYS_ON_TOP;
        }
        Self(bits)
    }

    /// Build from a raw shell bitmask, dropping bits we don't know about
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & Self::KNOWN)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn auto_hide(self) -> bool {
        self.0 & Self::AUTO_HIDE != 0
    }

    pub const fn always_on_top(self) -> bool {
        self.0 & Self::ALWAYS_ON_TOP != 0
    }

    /// Same flags with auto-hide set to `enabled`; always-on-top is carried over
    pub const fn with_auto_hide(self, enabled: bool) -> Self {
        Self::new(enabled, self.always_on_top())
    }

    pub const fn toggled_auto_hide(self) -> Self {
        self.with_auto_hide(!self.auto_hide())
    }
}

impl fmt::Display for AppearanceFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AutoHide={}, AlwaysOnTop={}",
            self.auto_hide(),
            self.always_on_top()
        )
    }
}
