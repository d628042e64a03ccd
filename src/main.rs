#![cfg_attr(not(windows), allow(dead_code))]

mod app;
mod config;
mod controller;
mod error;
mod flags;
#[cfg(windows)]
mod hotkey;
#[cfg(windows)]
mod platform;
mod worker;

use std::process::ExitCode;

use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::Config;

fn main() -> ExitCode {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    info!("--- Taskbar AutoHide Toggle ---");

    match app::run(Config::default()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            for line in e.guidance() {
                error!("{}", line);
            }
            ExitCode::FAILURE
        }
    }
}
