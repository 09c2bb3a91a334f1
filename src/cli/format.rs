//! Output formatting for CLI display.

use std::path::Path;

use crate::config::Config;
use crate::model::{Field, TimeSlot};

/// `name, email`: fields in the order given.
pub(super) fn format_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One line per slot: the label and its 24-hour start.
pub(super) fn format_slots() -> Vec<String> {
    TimeSlot::ALL
        .iter()
        .map(|slot| {
            let (hour, minute) = slot.start();
            format!("{slot}  ({hour:02}:{minute:02})")
        })
        .collect()
}

/// The config source and its effective values.
pub(super) fn format_config(config: &Config, explicit: Option<&Path>, recipient: &str) -> Vec<String> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(Config::path)
        .map_or_else(|| "(no home directory)".to_string(), |p| p.display().to_string());

    let opener = config.opener.as_deref().unwrap_or("(platform default)");
    let log_dir = config
        .log_dir()
        .map_or_else(|| "(disabled)".to_string(), |p| p.display().to_string());

    vec![
        format!("config:       {path}"),
        format!("recipient:    {recipient}"),
        format!("reset delay:  {}s", config.reset_delay_secs),
        format!(
            "email check:  {}",
            if config.strict_email {
                "well-formed"
            } else {
                "non-empty"
            }
        ),
        format!("opener:       {opener}"),
        format!("logs:         {log_dir}"),
    ]
}
