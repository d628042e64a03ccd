use tracing::{error, info};

use crate::config::{Config, HotkeyCombo};
use crate::controller::{TaskbarController, TaskbarShell};
use crate::error::{AppError, Result};

/// Fails on hosts without the Windows shell. Checked before anything else.
pub fn ensure_supported() -> Result<()> {
    if cfg!(windows) {
        Ok(())
    } else {
        Err(AppError::PlatformUnsupported)
    }
}

/// One hotkey press. Errors are logged and swallowed so the listener keeps
/// running.
pub fn toggle_and_report<S: TaskbarShell>(
    hotkey: &HotkeyCombo,
    controller: &TaskbarController<S>,
) {
    info!("Hotkey '{}' pressed! Toggling taskbar AutoHide...", hotkey);
    match controller.toggle_auto_hide() {
        Ok(_) => info!("Toggle complete."),
        Err(e) => error!("Error setting taskbar state: {}", e),
    }
}

/// Listen for the hotkey until interrupted
pub fn run(config: Config) -> Result<()> {
    ensure_supported()?;
    listen(config)
}

#[cfg(not(windows))]
fn listen(_config: Config) -> Result<()> {
    Err(AppError::PlatformUnsupported)
}

#[cfg(windows)]
fn listen(config: Config) -> Result<()> {
    use std::sync::Mutex;

    use tracing::{debug, warn};
    use winit::event::Event;
    use winit::event_loop::{ControlFlow, EventLoopBuilder};

    use crate::hotkey::HotkeyRegistration;
    use crate::platform::{self, SingleInstance, Win32Shell};
    use crate::worker::{Request, ToggleWorker};

    #[derive(Debug, Clone, Copy)]
    enum AppEvent {
        HotkeyPressed,
        Shutdown,
    }

    let hotkey = config.parsed_hotkey()?;
    let _instance = SingleInstance::acquire()?;

    if !platform::is_elevated() {
        warn!("This program modifies system settings (Taskbar AutoHide).");
        warn!("It might require Administrator privileges to work reliably.");
        warn!("If it doesn't work, try running from a terminal launched 'As Administrator'.");
        std::thread::sleep(config.elevation_warning_pause);
    }

    let controller =
        TaskbarController::new(Win32Shell, config.taskbar_class, config.refresh_delay);
    match controller.current_state() {
        Ok(state) => info!("Current taskbar state: {}", state),
        Err(e) => warn!("{}", e),
    }

    let event_loop = EventLoopBuilder::<AppEvent>::with_user_event()
        .build()
        .map_err(|e| AppError::EventLoop(e.to_string()))?;

    let worker = ToggleWorker::spawn(move || toggle_and_report(&hotkey, &controller))?;

    let registration = HotkeyRegistration::register(&hotkey)?;
    let press_proxy = Mutex::new(event_loop.create_proxy());
    registration.on_press(move || {
        if let Ok(proxy) = press_proxy.lock() {
            let _ = proxy.send_event(AppEvent::HotkeyPressed);
        }
    });

    let shutdown_proxy = event_loop.create_proxy();
    ctrlc::set_handler(move || {
        let _ = shutdown_proxy.send_event(AppEvent::Shutdown);
    })
    .map_err(|e| AppError::SignalHandler(e.to_string()))?;

    info!("Press '{}' to toggle the taskbar AutoHide setting.", hotkey);
    info!("Press Ctrl+C in this window (or close it) to stop.");
    info!("Listening for hotkey...");

    let result = event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Wait);

        if let Event::UserEvent(app_event) = event {
            match app_event {
                AppEvent::HotkeyPressed => {
                    if worker.request() == Request::Busy {
                        debug!("Toggle already pending, ignoring press");
                    }
                }
                AppEvent::Shutdown => {
                    info!("Stopping...");
                    elwt.exit();
                }
            }
        }
    });

    // The taskbar is left as it is; only the hook goes away
    drop(registration);
    info!("Stopped.");

    result.map_err(|e| AppError::EventLoop(e.to_string()))
}
