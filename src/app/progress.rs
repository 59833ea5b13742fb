use std::io::{IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use tokio::sync::watch;
use tracing::debug;

use crate::relay::{ProgressSnapshot, ProgressTracker};

use super::format::format_with_commas;

const TICK: Duration = Duration::from_millis(250);
const BAR_WIDTH: usize = 30;

/// Redraws a progress line on stderr until `stop_rx` flips to `true`.
///
/// Reads the tracker's atomics only, so workers never wait on rendering.
/// Does nothing when stderr is not a terminal.
pub(crate) fn spawn_progress_line(
    tracker: Arc<ProgressTracker>,
    no_color: bool,
    mut stop_rx: watch::Receiver<bool>,
) -> tokio::task::JoinHandle<()> {
    let style = ProgressStyle::new(BAR_WIDTH);

    tokio::spawn(async move {
        if !std::io::stderr().is_terminal() {
            return;
        }

        let mut ticker = tokio::time::interval(TICK);
        loop {
            tokio::select! {
                changed = stop_rx.changed() => {
                    let stopped = changed.is_err() || *stop_rx.borrow();
                    if !stopped {
                        continue;
                    }
                    let mut out = std::io::stderr();
                    if let Err(err) =
                        write_progress_line(&mut out, &style, tracker.snapshot(), no_color, true)
                    {
                        debug!("final progress line not written: {}", err);
                    }
                    break;
                }
                _ = ticker.tick() => {
                    let mut out = std::io::stderr();
                    if write_progress_line(&mut out, &style, tracker.snapshot(), no_color, false)
                        .is_err()
                    {
                        break;
                    }
                }
            }
        }
    })
}

/// Redraws the current line; the final line also ends it with a newline.
fn write_progress_line<W: Write>(
    out: &mut W,
    style: &ProgressStyle,
    snapshot: ProgressSnapshot,
    no_color: bool,
    final_line: bool,
) -> Result<(), std::io::Error> {
    let line = build_progress_line(style, snapshot, no_color);

    queue!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    for segment in line {
        if let Some(color) = segment.color {
            queue!(
                out,
                SetForegroundColor(color),
                Print(&segment.text),
                ResetColor
            )?;
        } else {
            queue!(out, Print(&segment.text))?;
        }
    }
    if final_line {
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

fn build_progress_line(
    style: &ProgressStyle,
    snapshot: ProgressSnapshot,
    no_color: bool,
) -> Vec<ProgressSegment> {
    let size = style.size.max(1);
    let total = snapshot.total.max(1);
    let completed = snapshot.completed.min(total);

    let size_u128 = u128::from(u64::try_from(size).unwrap_or(u64::MAX));
    let scaled = u128::from(completed)
        .saturating_mul(size_u128)
        .checked_div(u128::from(total))
        .unwrap_or(0);
    let complete_size = usize::try_from(scaled).unwrap_or(size).min(size);
    let incomplete_size = size.saturating_sub(complete_size);

    let percent_x100 = u128::from(completed)
        .saturating_mul(10_000)
        .checked_div(u128::from(total))
        .unwrap_or(0);
    let percent_whole = percent_x100.checked_div(100).unwrap_or(0);
    let percent_frac = percent_x100.checked_rem(100).unwrap_or(0);
    let percent_text = format!(" {}.{:02}%", percent_whole, percent_frac);
    let count_text = format!(
        " | {} / {} relays",
        format_with_commas(completed),
        format_with_commas(snapshot.total)
    );

    let progress_bar = format!(
        "{}{}{}{}",
        style.begin,
        style.fill.repeat(complete_size),
        style.empty.repeat(incomplete_size),
        style.end
    );

    if no_color {
        vec![
            ProgressSegment::plain(progress_bar),
            ProgressSegment::plain(percent_text),
            ProgressSegment::plain(count_text),
        ]
    } else {
        vec![
            ProgressSegment::plain(progress_bar),
            ProgressSegment::colored(percent_text, Color::Cyan),
            ProgressSegment::colored(count_text, Color::Yellow),
        ]
    }
}

struct ProgressStyle {
    size: usize,
    begin: &'static str,
    end: &'static str,
    fill: &'static str,
    empty: &'static str,
}

impl ProgressStyle {
    const fn new(size: usize) -> Self {
        Self {
            size,
            begin: "[",
            end: "]",
            fill: "#",
            empty: "-",
        }
    }
}

struct ProgressSegment {
    text: String,
    color: Option<Color>,
}

impl ProgressSegment {
    const fn plain(text: String) -> Self {
        Self { text, color: None }
    }

    const fn colored(text: String, color: Color) -> Self {
        Self {
            text,
            color: Some(color),
        }
    }
}
