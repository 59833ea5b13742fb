use std::io::IsTerminal;

use crossterm::style::Color;

use crate::target::mask_url;

use super::format::{format_elapsed, format_with_commas, paint};
use super::settings::RunSettings;

const UNSET: &str = "-";

/// Prints the resolved run configuration before dispatch starts.
pub fn print_config(settings: &RunSettings) {
    let use_color = !settings.no_color && std::io::stdout().is_terminal();
    for line in config_lines(settings, use_color) {
        println!("{line}");
    }
    println!();
}

pub(crate) fn config_lines(settings: &RunSettings, use_color: bool) -> Vec<String> {
    let tag = |label: &str, color: Color| paint(label, Some(color), use_color).into_owned();
    let info = tag("INFO", Color::Green);
    let detail = tag("DETAIL", Color::Blue);
    let config = tag("CONFIG", Color::Yellow);

    let masked = mask_url(&settings.target.url);
    let mut lines = vec![format!(
        "{} Sending {} relays to {}",
        info,
        format_with_commas(settings.executions),
        masked
    )];
    if settings.target.overridden {
        lines.push(format!(
            "{} Overriding URL with: {}",
            tag("OVERRIDE", Color::Red),
            masked
        ));
    }

    let workers = u64::try_from(settings.sizing.workers).unwrap_or(u64::MAX);
    lines.push(format!("{} Workers: {}", detail, format_with_commas(workers)));
    lines.push(format!("{} Delay: {}ms", detail, settings.sizing.delay_ms));
    lines.push(format!(
        "{} Timeout: {}",
        detail,
        format_elapsed(settings.timeout)
    ));
    if settings.sizing.clamped {
        lines.push(format!(
            "{} Starter plan limits applied ({} workers, {}ms stagger)",
            tag("NOTICE", Color::Yellow),
            settings.sizing.workers,
            settings.sizing.delay_ms
        ));
    }

    lines.push(format!(
        "{} Env: {}",
        config,
        settings.environment.map_or(UNSET, |env| env.as_str())
    ));
    lines.push(format!(
        "{} Plan Type: {}",
        config,
        settings.plan_type.map_or(UNSET, |plan| plan.as_str())
    ));
    lines.push(format!(
        "{} Chain: {}",
        config,
        settings.chain.as_deref().unwrap_or(UNSET)
    ));
    lines.push(format!(
        "{} Request Body: {}",
        tag("REQUEST", Color::Magenta),
        settings.request_body
    ));
    lines
}
