// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Container name derivation from an `AppId` (spec §4.2).
//!
//! Sanitized names always match `^VEA-[a-z0-9_-]{1,50}$`.

const PREFIX: &str = "VEA-";
const MAX_BODY_LEN: usize = 50;

/// Derives the container name for `app_id`, applying the sanitization
/// rule: lowercase, replace anything outside `[a-z0-9_-]` with `-`,
/// collapse runs of `-`, trim leading/trailing `-`, cap at 50 characters,
/// prefix with `VEA-`.
pub fn container_name(app_id: &str) -> String {
    let lowered = app_id.to_ascii_lowercase();
    let mut body = String::with_capacity(lowered.len());
    let mut last_was_dash = false;
    for c in lowered.chars() {
        let mapped = if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '-' };
        if mapped == '-' {
            if last_was_dash {
                continue;
            }
            last_was_dash = true;
        } else {
            last_was_dash = false;
        }
        body.push(mapped);
    }
    let trimmed = body.trim_matches('-');
    let capped = &trimmed[..trimmed.len().min(MAX_BODY_LEN)];
    let capped = capped.trim_end_matches('-');
    let body = if capped.is_empty() { "app" } else { capped };
    format!("{PREFIX}{body}")
}

#[cfg(test)]
#[path = "name_tests.rs"]
mod tests;
