use std::io::IsTerminal;

use crossterm::style::Color;

use crate::relay::{LatencyStats, RunReport, format_x100};

use super::format::{
    compare_bodies, decode_hex_body, failure_color, format_elapsed, format_with_commas,
    latency_color, paint, plural_suffix, success_color,
};

/// Prints the final report to stdout.
pub fn print_report(run: &RunReport, show_bodies: bool, no_color: bool) {
    let use_color = !no_color && std::io::stdout().is_terminal();
    println!();
    for line in report_lines(run, show_bodies, use_color) {
        println!("{line}");
    }
}

pub(crate) fn report_lines(run: &RunReport, show_bodies: bool, use_color: bool) -> Vec<String> {
    let report = &run.report;
    let success_rate = report.success_rate_x100();
    let failure_rate = report.failure_rate_x100();
    let ok_color = Some(success_color(success_rate));
    let err_color = failure_color(failure_rate);

    let mut lines = vec![
        paint("RESULTS", Some(Color::Blue), use_color).into_owned(),
        format!("Total time taken: {}", format_elapsed(run.elapsed)),
        format!("Total relays: {}", format_with_commas(report.total)),
        format!(
            "Successful relays: {}",
            paint(&format_with_commas(report.successes), ok_color, use_color)
        ),
        format!(
            "Failed relays: {}",
            paint(&format_with_commas(report.failures), err_color, use_color)
        ),
        format!(
            "Success rate: {}",
            paint(&format!("{}%", format_x100(success_rate)), ok_color, use_color)
        ),
        format!(
            "Failure rate: {}",
            paint(&format!("{}%", format_x100(failure_rate)), err_color, use_color)
        ),
        format!("Throughput: {} req/s", format_x100(run.throughput_x100)),
    ];

    if show_bodies && !report.bodies.is_empty() {
        lines.push(String::new());
        lines.push(
            paint(
                "Successful response bodies and their occurrences:",
                Some(Color::Green),
                use_color,
            )
            .into_owned(),
        );
        let mut bodies: Vec<(&str, u64)> = report
            .bodies
            .iter()
            .map(|(body, count)| (body.as_str(), *count))
            .collect();
        bodies.sort_by(|left, right| compare_bodies(left.0, right.0));
        for (body, count) in bodies {
            let mut line = format!("  {} occurrence{} - {}", count, plural_suffix(count), body);
            if let Some(decoded) = decode_hex_body(body) {
                line = format!("{} ({})", line, decoded);
            }
            lines.push(line);
        }
    }

    if !report.errors.is_empty() {
        lines.push(String::new());
        lines.push(paint("Error reasons:", Some(Color::Red), use_color).into_owned());
        for (reason, count) in report.ranked_errors() {
            lines.push(format!(
                "  {} occurrence{} - {}",
                count,
                plural_suffix(count),
                reason
            ));
        }
    }

    lines.push(String::new());
    lines.push(paint("LATENCIES", Some(Color::Blue), use_color).into_owned());
    lines.extend(report.latency.map_or_else(
        || vec!["Latency: n/a (no successful relays)".to_owned()],
        |latency| latency_lines(&latency, use_color).to_vec(),
    ));
    lines
}

fn latency_lines(latency: &LatencyStats, use_color: bool) -> [String; 4] {
    let ms = |value: u64| {
        paint(
            &format!("{}ms", value),
            Some(latency_color(value)),
            use_color,
        )
        .into_owned()
    };
    let mean_ms = latency.mean_ms_x100 / 100;
    let mean = paint(
        &format!("{}ms", format_x100(latency.mean_ms_x100)),
        Some(latency_color(mean_ms)),
        use_color,
    )
    .into_owned();
    [
        format!("P90 latency: {}", ms(latency.p90_ms)),
        format!("Average latency: {}", mean),
        format!("Lowest latency: {}", ms(latency.min_ms)),
        format!("Highest latency: {}", ms(latency.max_ms)),
    ]
}
