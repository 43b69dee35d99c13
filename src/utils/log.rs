// src/utils/log.rs

//! Progress-style log helpers.
//!
//! Thin wrappers over the `log` facade that render headers, steps and
//! summaries in a consistent layout. Output goes wherever the installed
//! logger sends it.

/// Log an info message
pub fn info(message: &str) {
    ::log::info!("{message}");
}

/// Log a warning message
pub fn warn(message: &str) {
    ::log::warn!("{message}");
}

/// Log a success message (always shown as INFO)
pub fn success(message: &str) {
    ::log::info!("[OK] {message}");
}

/// Format a step marker.
fn step_line(step_num: usize, total: usize, message: &str) -> String {
    format!("[STEP {step_num}/{total}] {message}")
}

/// Log a step in a process
pub fn step(step_num: usize, total: usize, message: &str) {
    ::log::info!("{}", step_line(step_num, total, message));
}

/// Log a header
pub fn header(title: &str) {
    let border = "═".repeat(60);
    ::log::info!("{border}");
    ::log::info!("  {title}");
    ::log::info!("{border}");
}

/// Log a sub-item (indented)
pub fn sub_item(message: &str) {
    ::log::info!("    {message}");
}

/// Log a summary section
pub fn summary(title: &str, items: &[(&str, String)]) {
    ::log::info!("[SUMMARY] {title}");
    for (key, value) in items {
        ::log::info!("    {key}: {value}");
    }
}
