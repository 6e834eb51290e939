//! Shared server state.

use std::sync::Arc;

use crate::airstack::BalanceSource;
use crate::config::Config;
use crate::theme::Theme;

/// Built once at startup and shared immutably across requests.
pub struct AppState {
    pub config: Config,
    pub theme: Theme,
    pub source: Arc<dyn BalanceSource>,
}
