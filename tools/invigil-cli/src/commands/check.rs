//! Validate a monitor configuration and print the resolved form.

use anyhow::Context;

use invigil_monitor::MonitorConfig;

pub fn run(
    fps: u32,
    gaze_sensitivity: u32,
    encoding: &str,
    color: &str,
    queue: bool,
    flush_period: Option<u64>,
) -> anyhow::Result<()> {
    let config =
        MonitorConfig::from_options(fps, encoding, color, gaze_sensitivity, queue, flush_period)
            .context("configuration rejected")?;

    let rendered = serde_json::to_string_pretty(&config)?;
    println!("{rendered}");
    Ok(())
}
