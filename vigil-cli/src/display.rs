//! Snapshot rendering: an in-place table board or plain log lines.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{Clear, ClearType},
};
use humansize::{DECIMAL, format_size};
use tabled::{
    Table, Tabled,
    settings::{Color, Style, object::Rows},
};
use tracing::info;
use vigil_engine::{REACHABLE_MESSAGE, TargetSnapshot};

/// How much of the last message makes it onto the board.
const MESSAGE_WIDTH: usize = 40;

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Reqs")]
    requests: u64,
    #[tabled(rename = "Errors")]
    errors: u64,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Last")]
    last: String,
}

/// Redraws the stats board in place, or logs it when `plain` is set.
pub struct Renderer {
    plain: bool,
    stdout: Stdout,
}

impl Renderer {
    pub fn new(plain: bool) -> Self {
        Self {
            plain,
            stdout: io::stdout(),
        }
    }

    pub fn render(&mut self, snapshots: &[TargetSnapshot]) -> io::Result<()> {
        if self.plain {
            self.render_plain(snapshots);
            Ok(())
        } else {
            self.render_table(snapshots)
        }
    }

    fn render_plain(&self, snapshots: &[TargetSnapshot]) {
        for snapshot in snapshots {
            info!(
                name = %snapshot.identifier,
                requests = snapshot.stats.request_count,
                errors = snapshot.stats.error_count,
                size = %format_size(snapshot.stats.bytes_received, DECIMAL),
                time = %format_latency(snapshot.stats.last_latency),
                message = %snapshot.stats.last_message,
                "probe stats"
            );
        }
    }

    fn render_table(&mut self, snapshots: &[TargetSnapshot]) -> io::Result<()> {
        let table = build_table(snapshots);
        queue!(self.stdout, MoveTo(0, 0), Clear(ClearType::FromCursorDown))?;
        write!(self.stdout, "{table}\r\n")?;
        self.stdout.flush()
    }
}

fn build_table(snapshots: &[TargetSnapshot]) -> Table {
    let rows: Vec<Row> = snapshots
        .iter()
        .map(|snapshot| Row {
            url: snapshot.identifier.clone(),
            requests: snapshot.stats.request_count,
            errors: snapshot.stats.error_count,
            size: format_size(snapshot.stats.bytes_received, DECIMAL),
            time: format_latency(snapshot.stats.last_latency),
            last: truncate(&snapshot.stats.last_message, MESSAGE_WIDTH),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::modern());
    for (index, snapshot) in snapshots.iter().enumerate() {
        if snapshot.stats.last_message == REACHABLE_MESSAGE {
            // row 0 is the header
            table.modify(Rows::one(index + 1), Color::FG_RED);
        }
    }
    table
}

/// Scales a latency into the handiest unit, microseconds up to hours.
pub fn format_latency(latency: Duration) -> String {
    let mut value = latency.as_secs_f64() * 1_000_000.0;
    for (unit, step) in [("µs", 1000.0), ("ms", 1000.0), ("s", 60.0), ("m", 60.0)] {
        if value < step {
            return format!("{value:.2} {unit}");
        }
        value /= step;
    }
    format!("{value:.2} h")
}

fn truncate(message: &str, width: usize) -> String {
    message.chars().take(width).collect()
}

#[cfg(test)]
mod tests {
    use vigil_engine::StatsSnapshot;

    use super::*;

    fn snapshot(identifier: &str, message: &str) -> TargetSnapshot {
        TargetSnapshot {
            identifier: identifier.to_owned(),
            stats: StatsSnapshot {
                request_count: 7,
                error_count: 2,
                bytes_received: 1500,
                last_message: message.to_owned(),
                last_url: format!("https://{identifier}"),
                last_latency: Duration::from_millis(120),
            },
        }
    }

    #[test]
    fn latency_scales_through_units() {
        assert_eq!(format_latency(Duration::from_micros(250)), "250.00 µs");
        assert_eq!(format_latency(Duration::from_micros(1500)), "1.50 ms");
        assert_eq!(format_latency(Duration::from_secs(2)), "2.00 s");
        assert_eq!(format_latency(Duration::from_secs(90)), "1.50 m");
        assert_eq!(format_latency(Duration::from_secs(7200)), "2.00 h");
        assert_eq!(format_latency(Duration::ZERO), "0.00 µs");
    }

    #[test]
    fn truncate_is_char_safe() {
        assert_eq!(truncate("short", 40), "short");
        let long = "x".repeat(60);
        assert_eq!(truncate(&long, 40).len(), 40);
        let accented = "é".repeat(60);
        assert_eq!(truncate(&accented, 40).chars().count(), 40);
    }

    #[test]
    fn table_carries_headers_and_cells() {
        let rendered = build_table(&[snapshot("example.com/", "http error: 503")]).to_string();
        assert!(rendered.contains("URL"));
        assert!(rendered.contains("Reqs"));
        assert!(rendered.contains("example.com/"));
        assert!(rendered.contains("http error: 503"));
        assert!(rendered.contains("1.5 kB"));
    }

    #[test]
    fn reachable_rows_are_painted() {
        let rendered = build_table(&[
            snapshot("a.example/", REACHABLE_MESSAGE),
            snapshot("b.example/", "error: timed out"),
        ])
        .to_string();
        assert!(rendered.contains('\u{1b}'), "reachable row must carry color");
    }

    #[test]
    fn long_messages_are_cut_to_board_width() {
        let noisy = "error: ".to_owned() + &"x".repeat(100);
        let rendered = build_table(&[snapshot("a.example/", &noisy)]).to_string();
        assert!(!rendered.contains(&"x".repeat(50)));
    }
}
