//! Utility functions for the Stash CLI

use stash_core::types::ImageConstraints;

/// Format size as human readable
pub fn format_size(bytes: u64, human_readable: bool) -> String {
    if human_readable {
        humansize::format_size(bytes, humansize::BINARY)
    } else {
        bytes.to_string()
    }
}

/// Describe active constraints, e.g. `width >= 100, size <= 512 KB`
pub fn describe_constraints(constraints: &ImageConstraints) -> String {
    let bounds = [
        ("width >=", constraints.min_width.map(u64::from), ""),
        ("width <=", constraints.max_width.map(u64::from), ""),
        ("height >=", constraints.min_height.map(u64::from), ""),
        ("height <=", constraints.max_height.map(u64::from), ""),
        ("size <=", constraints.max_file_size_kb, " KB"),
    ];

    let parts: Vec<String> = bounds
        .iter()
        .filter_map(|(label, value, unit)| {
            value
                .filter(|v| *v > 0)
                .map(|v| format!("{} {}{}", label, v, unit))
        })
        .collect();

    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(", ")
    }
}
