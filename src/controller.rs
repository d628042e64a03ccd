//! Read-modify-write of the taskbar appearance flags
//!
//! The shell's `ABM_SETSTATE` has no "leave unchanged" mode: any bit missing
//! from the written mask is cleared. Every write here therefore starts from a
//! fresh `ABM_GETSTATE` read and carries always-on-top over unless the caller
//! explicitly goes through [`TaskbarController::overwrite_state`].

use std::time::Duration;

use tracing::{debug, info};

use crate::error::ControllerError;
use crate::flags::AppearanceFlags;

/// The shell facilities the controller needs
pub trait TaskbarShell {
    type Handle: Copy;

    /// Look up the taskbar window by class name
    fn find_window(&self, class: &str) -> Option<Self::Handle>;

    fn get_state(&self, handle: Self::Handle) -> AppearanceFlags;

    /// Returns `false` when the shell reports failure
    fn set_state(&self, handle: Self::Handle, flags: AppearanceFlags) -> bool;

    /// Ask for a repaint. Fire-and-forget.
    fn refresh(&self, handle: Self::Handle);
}

pub struct TaskbarController<S> {
    shell: S,
    taskbar_class: String,
    refresh_delay: Duration,
}

impl<S: TaskbarShell> TaskbarController<S> {
    pub fn new(shell: S, taskbar_class: impl Into<String>, refresh_delay: Duration) -> Self {
        Self {
            shell,
            taskbar_class: taskbar_class.into(),
            refresh_delay,
        }
    }

    #[cfg(test)]
    pub(crate) fn shell(&self) -> &S {
        &self.shell
    }

    fn taskbar(&self) -> Result<S::Handle, ControllerError> {
        self.shell
            .find_window(&self.taskbar_class)
            .ok_or_else(|| ControllerError::TaskbarNotFound {
                class: self.taskbar_class.clone(),
            })
    }

    /// Read the current flags without changing anything
    pub fn current_state(&self) -> Result<AppearanceFlags, ControllerError> {
        let handle = self.taskbar()?;
        Ok(self.shell.get_state(handle))
    }

    /// Flip auto-hide, keeping always-on-top as it currently is.
    /// Returns the flags that were written.
    pub fn toggle_auto_hide(&self) -> Result<AppearanceFlags, ControllerError> {
        let handle = self.taskbar()?;
        let current = self.shell.get_state(handle);
        debug!("Current taskbar state: {}", current);

        if current.auto_hide() {
            info!("Disabling AutoHide (taskbar always visible)...");
        } else {
            info!("Enabling AutoHide...");
        }

        self.apply(handle, current.toggled_auto_hide())
    }

    /// Set auto-hide to `enabled`, keeping always-on-top as it currently is
    #[allow(dead_code)] // the hotkey only toggles; kept as the named direct setter
    pub fn set_auto_hide(&self, enabled: bool) -> Result<AppearanceFlags, ControllerError> {
        let handle = self.taskbar()?;
        let current = self.shell.get_state(handle);
        self.apply(handle, current.with_auto_hide(enabled))
    }

    /// Write `flags` as-is. Unlike the other operations this may clear
    /// always-on-top.
    #[allow(dead_code)] // never on the hotkey path
    pub fn overwrite_state(
        &self,
        flags: AppearanceFlags,
    ) -> Result<AppearanceFlags, ControllerError> {
        let handle = self.taskbar()?;
        self.apply(handle, flags)
    }

    fn apply(
        &self,
        handle: S::Handle,
        flags: AppearanceFlags,
    ) -> Result<AppearanceFlags, ControllerError> {
        info!("Setting taskbar state: {}", flags);
        let accepted = self.shell.set_state(handle, flags);

        // The taskbar sometimes keeps its old look until repainted
        if !self.refresh_delay.is_zero() {
            std::thread::sleep(self.refresh_delay);
        }
        self.shell.refresh(handle);

        if accepted {
            Ok(flags)
        } else {
            Err(ControllerError::StateSetFailed { requested: flags })
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// In-memory stand-in for the shell
    #[derive(Default)]
    pub(crate) struct FakeShell {
        pub present: Cell<bool>,
        pub reject_writes: Cell<bool>,
        pub state: Cell<u32>,
        pub writes: RefCell<Vec<u32>>,
        pub refreshes: Cell<usize>,
    }

    impl FakeShell {
        pub fn with_state(bits: u32) -> Self {
            Self {
                present: Cell::new(true),
                state: Cell::new(bits),
                ..Default::default()
            }
        }
    }

    impl TaskbarShell for FakeShell {
        type Handle = usize;

        fn find_window(&self, class: &str) -> Option<usize> {
            assert_eq!(class, "Shell_TrayWnd");
            self.present.get().then_some(0x1_0000)
        }

        fn get_state(&self, handle: usize) -> AppearanceFlags {
            assert_eq!(handle, 0x1_0000);
            AppearanceFlags::from_bits(self.state.get())
        }

        fn set_state(&self, _handle: usize, flags: AppearanceFlags) -> bool {
            self.writes.borrow_mut().push(flags.bits());
            if self.reject_writes.get() {
                return false;
            }
            self.state.set(flags.bits());
            true
        }

        fn refresh(&self, _handle: usize) {
            self.refreshes.set(self.refreshes.get() + 1);
        }
    }

    fn controller(shell: FakeShell) -> TaskbarController<FakeShell> {
        TaskbarController::new(shell, "Shell_TrayWnd", Duration::ZERO)
    }

    #[test]
    fn toggle_flips_auto_hide_and_keeps_always_on_top() {
        for bits in 0..4 {
            let before = AppearanceFlags::from_bits(bits);
            let c = controller(FakeShell::with_state(bits));

            let written = c.toggle_auto_hide().unwrap();

            assert_eq!(written.auto_hide(), !before.auto_hide());
            assert_eq!(written.always_on_top(), before.always_on_top());
            assert_eq!(c.current_state().unwrap(), written);
        }
    }

    #[test]
    fn toggling_twice_restores_original_state() {
        for bits in 0..4 {
            let c = controller(FakeShell::with_state(bits));
            c.toggle_auto_hide().unwrap();
            c.toggle_auto_hide().unwrap();

            assert_eq!(c.shell.state.get(), bits);
            let always_on_top = bits & AppearanceFlags::ALWAYS_ON_TOP;
            assert!(c
                .shell
                .writes
                .borrow()
                .iter()
                .all(|w| w & AppearanceFlags::ALWAYS_ON_TOP == always_on_top));
        }
    }

    #[test]
    fn visible_on_top_taskbar_is_written_as_three() {
        let c = controller(FakeShell::with_state(AppearanceFlags::ALWAYS_ON_TOP));
        c.toggle_auto_hide().unwrap();
        assert_eq!(*c.shell.writes.borrow(), vec![3]);
    }

    #[test]
    fn hidden_taskbar_without_on_top_is_written_as_zero() {
        let c = controller(FakeShell::with_state(AppearanceFlags::AUTO_HIDE));
        c.toggle_auto_hide().unwrap();
        assert_eq!(*c.shell.writes.borrow(), vec![0]);
    }

    #[test]
    fn missing_taskbar_is_reported_without_writing() {
        let c = controller(FakeShell::default());

        let err = c.toggle_auto_hide().unwrap_err();

        assert_eq!(
            err,
            ControllerError::TaskbarNotFound {
                class: "Shell_TrayWnd".into()
            }
        );
        assert!(c.shell.writes.borrow().is_empty());
        assert_eq!(c.shell.refreshes.get(), 0);
    }

    #[test]
    fn rejected_write_leaves_state_authoritative_for_retry() {
        let shell = FakeShell::with_state(AppearanceFlags::ALWAYS_ON_TOP);
        shell.reject_writes.set(true);
        let c = controller(shell);

        let first = c.toggle_auto_hide().unwrap_err();
        let second = c.toggle_auto_hide().unwrap_err();

        let expected = AppearanceFlags::new(true, true);
        assert_eq!(first, ControllerError::StateSetFailed { requested: expected });
        assert_eq!(second, first);
        assert_eq!(*c.shell.writes.borrow(), vec![3, 3]);
        assert_eq!(c.shell.refreshes.get(), 2);
        assert_eq!(c.shell.state.get(), AppearanceFlags::ALWAYS_ON_TOP);
    }

    #[test]
    fn every_write_requests_a_refresh() {
        let c = controller(FakeShell::with_state(0));
        c.toggle_auto_hide().unwrap();
        c.set_auto_hide(false).unwrap();
        assert_eq!(c.shell.refreshes.get(), 2);
    }

    #[test]
    fn set_auto_hide_preserves_always_on_top() {
        let c = controller(FakeShell::with_state(3));
        let written = c.set_auto_hide(false).unwrap();
        assert_eq!(written.bits(), AppearanceFlags::ALWAYS_ON_TOP);

        // Already in the requested state: still written, still preserved
        let written = c.set_auto_hide(false).unwrap();
        assert_eq!(written.bits(), AppearanceFlags::ALWAYS_ON_TOP);
    }

    #[test]
    fn overwrite_state_writes_exactly_what_was_asked() {
        let c = controller(FakeShell::with_state(3));
        c.overwrite_state(AppearanceFlags::new(true, false)).unwrap();
        assert_eq!(c.shell.state.get(), AppearanceFlags::AUTO_HIDE);
    }
}
