use actix_web::{web, App, HttpServer};
use anyhow::Context;
use clap::Parser;
use std::sync::{Arc, Mutex, PoisonError};

use process_console::api;
use process_console::cli::CommandArgs;
use process_console::contract::{ActionGateway, EventBus, ProcessSource, EVENT_PROCESSES_UPDATE};
use process_console::models::ProcessUpdateEvent;
use process_console::services::{prime, start_updater, LocalSource, SysinfoCollector, SystemExecutor};
use process_console::state::{new_sampler_state, new_state, AppState};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CommandArgs::parse();
    let bind_address = format!("{}:{}", args.address, args.port);

    let collector = SysinfoCollector::new();
    let sampler = new_sampler_state(collector.current_user().to_string(), args.interval_ms, args.paused);
    let collector = Arc::new(Mutex::new(collector));
    let bus = EventBus::new();

    let sampled = prime(&sampler, &collector);
    log::info!("Initial sample: {} processes", sampled);

    let source: Arc<dyn ProcessSource> =
        Arc::new(LocalSource::new(sampler.clone(), collector.clone(), bus.clone()));
    let executor = Arc::new(SystemExecutor::new(sampler.clone(), collector.clone()));
    let state = new_state(source.clone(), ActionGateway::new(executor));

    // Subscribe before the first snapshot so no event falls in between.
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<ProcessUpdateEvent>();
    let _subscription = source.subscribe(Box::new(move |event| {
        let _ = tx.send(event.clone());
    }));

    {
        let mut console = state.console.lock().unwrap_or_else(PoisonError::into_inner);
        match console.refresh() {
            Ok(count) => log::info!("Console loaded {} processes", count),
            Err(e) => log::warn!("Initial console load failed: {}", e),
        }
    }

    tokio::spawn(consume_events(state.clone(), rx));
    let _updater = start_updater(sampler, collector, bus);

    print_banner(&args);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(api::configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("failed to bind {}", bind_address))?
    .run()
    .await
    .context("HTTP server terminated with an error")
}

/// Applies pushed events to the console table strictly in arrival order.
async fn consume_events(
    state: AppState,
    mut rx: tokio::sync::mpsc::UnboundedReceiver<ProcessUpdateEvent>,
) {
    log::info!("Listening on {}", EVENT_PROCESSES_UPDATE);
    while let Some(event) = rx.recv().await {
        let mut console = state.console.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = console.handle_event(&event) {
            log::error!("Console resynchronization failed: {}", e);
        }
    }
}

fn print_banner(args: &CommandArgs) {
    println!("╔═══════════════════════════════════════════════════════════╗");
    println!("║      Process Console v0.1.1                               ║");
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();
    println!("🚀 Server starting on http://{}:{}", args.address, args.port);
    println!();
    println!("📋 Available endpoints:");
    println!("  POST   /api/processes/query              - Filtered, sorted process list");
    println!("  GET    /api/processes/{{pid}}              - Process details");
    println!("  POST   /api/processes/{{pid}}/kill         - Terminate or kill a process");
    println!("  POST   /api/processes/{{pid}}/open         - Open the executable's folder");
    println!("  POST   /api/clipboard                    - Copy text to the clipboard");
    println!("  PUT    /api/settings/refresh-interval    - Change sampling interval");
    println!("  PUT    /api/settings/paused              - Pause or resume sampling");
    println!("  GET    /api/console                      - Synchronized console table");
    println!("  POST   /api/console/refresh              - Force a full resync");
    println!("  GET    /metrics                          - Prometheus metrics");
    println!("  GET    /health                           - Health check");
    println!("═══════════════════════════════════════════════════════════");
}
