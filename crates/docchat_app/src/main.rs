use std::mem;
use std::path::PathBuf;
use std::sync::mpsc;

use client_logging::{client_error, client_warn};
use docchat_app::effects::EffectRunner;
use docchat_app::logging::{self, LogDestination};
use docchat_app::{shell, AppEvent};
use docchat_core::{update, AppState};
use docchat_transport::BackendSettings;

fn main() {
    logging::initialize(LogDestination::File);

    let mut settings = BackendSettings::default();
    if let Ok(origin) = std::env::var("DOCCHAT_BACKEND_URL") {
        match url::Url::parse(&origin) {
            Ok(base) => settings.base_url = base,
            Err(err) => client_warn!("ignoring DOCCHAT_BACKEND_URL ({}): {}", origin, err),
        }
    }

    let download_dir = std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("downloads");

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = match EffectRunner::new(event_tx.clone(), settings, download_dir) {
        Ok(runner) => runner,
        Err(err) => {
            client_error!("transport worker failed to start: {}", err);
            eprintln!("transport worker failed to start");
            return;
        }
    };
    shell::spawn_input_thread(event_tx);
    shell::print_help();

    let mut state = AppState::new();
    while let Ok(event) = event_rx.recv() {
        match event {
            AppEvent::Quit => break,
            AppEvent::Render => shell::render(&state.view()),
            AppEvent::Intent(msg) => {
                let (next, effects) = update(mem::take(&mut state), msg);
                state = next;
                runner.run(effects);
                if state.consume_dirty() {
                    shell::render(&state.view());
                }
            }
        }
    }
}
