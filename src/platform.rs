//! Win32 side of the taskbar controller

use std::mem;

use windows::core::PCWSTR;
use windows::Win32::Foundation::{
    CloseHandle, GetLastError, ERROR_ALREADY_EXISTS, HANDLE, HWND, LPARAM,
};
use windows::Win32::Graphics::Gdi::UpdateWindow;
use windows::Win32::System::Threading::CreateMutexW;
use windows::Win32::UI::Shell::{
    IsUserAnAdmin, SHAppBarMessage, ABM_GETSTATE, ABM_SETSTATE, APPBARDATA,
};
use windows::Win32::UI::WindowsAndMessaging::FindWindowW;

use crate::controller::TaskbarShell;
use crate::error::AppError;
use crate::flags::AppearanceFlags;

const SINGLE_INSTANCE_MUTEX: &str = "Local\\TaskbarAutoHideToggle_SingleInstance";

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(Some(0)).collect()
}

fn appbar_data(hwnd: HWND) -> APPBARDATA {
    // SAFETY: APPBARDATA is plain old data; all-zero is a valid value
    let mut data: APPBARDATA = unsafe { mem::zeroed() };
    data.cbSize = mem::size_of::<APPBARDATA>() as u32;
    data.hWnd = hwnd;
    data
}

/// `TaskbarShell` backed by `FindWindowW` and `SHAppBarMessage`
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Shell;

impl TaskbarShell for Win32Shell {
    type Handle = HWND;

    fn find_window(&self, class: &str) -> Option<HWND> {
        let class_wide = to_wide(class);
        unsafe {
            match FindWindowW(PCWSTR(class_wide.as_ptr()), PCWSTR::null()) {
                Ok(hwnd) if !hwnd.0.is_null() => Some(hwnd),
                _ => None,
            }
        }
    }

    fn get_state(&self, handle: HWND) -> AppearanceFlags {
        let mut data = appbar_data(handle);
        let state = unsafe { SHAppBarMessage(ABM_GETSTATE, &mut data) };
        AppearanceFlags::from_bits(state as u32)
    }

    fn set_state(&self, handle: HWND, flags: AppearanceFlags) -> bool {
        let mut data = appbar_data(handle);
        data.lParam = LPARAM(flags.bits() as isize);
        unsafe { SHAppBarMessage(ABM_SETSTATE, &mut data) != 0 }
    }

    fn refresh(&self, handle: HWND) {
        unsafe {
            let _ = UpdateWindow(handle);
        }
    }
}

/// Whether the process runs with administrator rights
pub fn is_elevated() -> bool {
    unsafe { IsUserAnAdmin().as_bool() }
}

/// Named mutex held for the lifetime of the process
pub struct SingleInstance {
    handle: HANDLE,
}

impl SingleInstance {
    pub fn acquire() -> Result<Self, AppError> {
        let name = to_wide(SINGLE_INSTANCE_MUTEX);
        unsafe {
            let handle = CreateMutexW(None, true, PCWSTR(name.as_ptr()))
                .map_err(|_| AppError::AlreadyRunning)?;

            if GetLastError() == ERROR_ALREADY_EXISTS {
                let _ = CloseHandle(handle);
                return Err(AppError::AlreadyRunning);
            }

            Ok(Self { handle })
        }
    }
}

impl Drop for SingleInstance {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_strings_are_nul_terminated() {
        let wide = to_wide("Shell_TrayWnd");
        assert_eq!(wide.len(), "Shell_TrayWnd".len() + 1);
        assert_eq!(wide.last(), Some(&0));
    }

    #[test]
    fn unknown_class_is_not_found() {
        assert!(Win32Shell
            .find_window("TaskbarAutoHide_NoSuchWindowClass")
            .is_none());
    }

    #[test]
    fn second_instance_is_refused() {
        let _first = SingleInstance::acquire().unwrap();
        assert!(matches!(
            SingleInstance::acquire(),
            Err(AppError::AlreadyRunning)
        ));
    }
}
