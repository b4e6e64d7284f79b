//! Label extraction — the first stage of a reconciliation pass.
//!
//! Pure functions over the container's flat label map. Anything that is not
//! exactly `scheduler.<job>.<prop>` with a known property is silently
//! ignored; validation of the surviving groups happens in [`crate::validate`].

use std::collections::HashMap;

use dockron_core::types::{ENABLE_LABEL, LABEL_NAMESPACE};

use crate::types::RawJobGroups;

/// Whether scheduling is enabled for a container.
///
/// True only when the `scheduler.enable` label is exactly `"true"`,
/// case-insensitively. Missing label, `"false"`, or any other value —
/// including `"TRUE "` with stray whitespace — means disabled.
pub fn schedule_enabled(labels: &HashMap<String, String>) -> bool {
    labels
        .get(ENABLE_LABEL)
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Collect raw schedule/command pairs from `scheduler.<job>.<prop>` labels.
///
/// Keys must have exactly three dot-separated segments with the first
/// literally `scheduler` — this excludes `scheduler.enable` and anything
/// malformed. Only the `schedule` and `command` properties are retained;
/// other property names under a job are dropped without creating a group.
pub fn extract_raw_jobs(labels: &HashMap<String, String>) -> RawJobGroups {
    let mut groups = RawJobGroups::new();

    for (key, value) in labels {
        let mut parts = key.split('.');
        let (Some(ns), Some(job_name), Some(prop), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            continue;
        };
        if ns != LABEL_NAMESPACE {
            continue;
        }

        match prop {
            "schedule" => {
                groups.entry(job_name.to_string()).or_default().schedule = Some(value.clone());
            }
            "command" => {
                groups.entry(job_name.to_string()).or_default().command = Some(value.clone());
            }
            _ => {}
        }
    }

    groups
}
