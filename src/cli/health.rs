use std::error::Error;

use crate::core::config::Settings;
use crate::core::connectivity::ConnectivityMonitor;
use crate::ui::print_lines;
use crate::ui::status::connection_line;

/// Probe `/health` once; an unreachable backend is reported as an error so
/// the process exits non-zero.
pub async fn check_health(settings: &Settings) -> Result<(), Box<dyn Error>> {
    let monitor = ConnectivityMonitor::new(reqwest::Client::new(), &settings.base_url);
    let connected = monitor.probe().await;

    print_lines(&[connection_line(connected)], settings.markup)?;
    if connected {
        Ok(())
    } else {
        Err(format!("Backend at {} is not reachable", settings.base_url).into())
    }
}
