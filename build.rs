fn main() {
    if std::env::var("CARGO_CFG_WINDOWS").is_ok() {
        let mut res = winres::WindowsResource::new();
        let version = env!("CARGO_PKG_VERSION");
        res.set("ProductName", "Taskbar AutoHide");
        res.set("FileDescription", "Taskbar auto-hide hotkey toggle");
        res.set("OriginalFilename", "taskbar-autohide.exe");
        res.set("InternalName", "taskbar-autohide");
        res.set("ProductVersion", version);
        res.set("FileVersion", version);

        res.compile().unwrap_or_else(|_| {
            eprintln!("Warning: Could not embed resources in executable");
        });
    }
}
