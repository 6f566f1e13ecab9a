use crate::console::Console;
use crate::contract::{ActionGateway, ProcessSource};
use crate::models::ProcessRecord;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const MIN_REFRESH_INTERVAL_MS: u64 = 200;
pub const MAX_REFRESH_INTERVAL_MS: u64 = 10_000;

/// What the sampler knows: the latest sample plus its cadence settings.
pub struct SamplerStateInner {
    /// Latest sample, pid → record
    pub snapshot: HashMap<u32, ProcessRecord>,
    pub refresh_interval_ms: u64,
    pub paused: bool,
    /// OS user running the sampler, resolved once at startup
    pub current_user: String,
}

pub type SamplerState = Arc<Mutex<SamplerStateInner>>;

pub fn new_sampler_state(current_user: String, refresh_interval_ms: u64, paused: bool) -> SamplerState {
    Arc::new(Mutex::new(SamplerStateInner {
        snapshot: HashMap::new(),
        refresh_interval_ms: clamp_interval(refresh_interval_ms),
        paused,
        current_user,
    }))
}

pub fn clamp_interval(ms: u64) -> u64 {
    ms.clamp(MIN_REFRESH_INTERVAL_MS, MAX_REFRESH_INTERVAL_MS)
}

/// Everything the HTTP handlers reach for.
pub struct AppStateInner {
    pub source: Arc<dyn ProcessSource>,
    pub gateway: ActionGateway,
    pub console: Mutex<Console>,
}

pub type AppState = Arc<AppStateInner>;

pub fn new_state(source: Arc<dyn ProcessSource>, gateway: ActionGateway) -> AppState {
    Arc::new(AppStateInner {
        console: Mutex::new(Console::new(source.clone(), gateway.clone())),
        source,
        gateway,
    })
}
