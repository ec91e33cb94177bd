//! Download progress reporting
//!
//! The downloader hands a [`ProgressState`] to a [`ProgressReporter`] after
//! every chunk. [`TerminalReporter`] redraws a single console line;
//! [`RecordingReporter`] keeps the sequence of events for inspection.

use std::io::{self, IsTerminal, Write};
use tracing::debug;

/// Width of the bar drawn for bounded progress
pub const BAR_WIDTH: usize = 40;

/// Spinner frames cycled while the total size is unknown
pub const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];

const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";
const YELLOW: &str = "\x1b[33m";
const WHITE: &str = "\x1b[37m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressState {
    /// Total size is known
    Bounded {
        percent: f64,
        transferred: u64,
        total: u64,
    },
    /// Total size is unknown
    Indeterminate { transferred: u64 },
}

impl ProgressState {
    pub fn transferred(&self) -> u64 {
        match self {
            ProgressState::Bounded { transferred, .. } => *transferred,
            ProgressState::Indeterminate { transferred } => *transferred,
        }
    }
}

pub trait ProgressReporter {
    /// Called once the response headers are in and the destination is open.
    fn start(&mut self, total: Option<u64>);

    /// Called after every chunk written to disk.
    fn update(&mut self, state: &ProgressState);

    /// Called when the transfer stops, whether it succeeded or not.
    fn finish(&mut self);
}

/// Format a byte count with binary units, e.g. `512 B`, `1.5 KB`, `3.27 MB`.
pub fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    const GIB: u64 = MIB * 1024;

    let (value, unit) = if bytes < KIB {
        return format!("{bytes} B");
    } else if bytes < MIB {
        (bytes as f64 / KIB as f64, "KB")
    } else if bytes < GIB {
        (bytes as f64 / MIB as f64, "MB")
    } else {
        (bytes as f64 / GIB as f64, "GB")
    };

    // At most two decimals, trailing zeros dropped
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {unit}")
}

/// Fixed-width bar filled in proportion to `transferred / total`.
pub fn render_bar(transferred: u64, total: u64) -> String {
    let filled = if total == 0 {
        0
    } else {
        ((BAR_WIDTH as u128 * transferred as u128) / total as u128).min(BAR_WIDTH as u128) as usize
    };

    "=".repeat(filled) + &" ".repeat(BAR_WIDTH - filled)
}

fn downloaded(transferred: u64) -> String {
    format!("{} downloaded", format_bytes(transferred))
}

fn paint(text: &str, color: &str, colors: bool) -> String {
    if colors {
        format!("{color}{text}")
    } else {
        text.to_string()
    }
}

/// Reporter that redraws one console line in place.
pub struct TerminalReporter<W: Write> {
    out: W,
    colors: bool,
    spinner_index: usize,
    drawn: bool,
}

impl TerminalReporter<io::Stdout> {
    /// Reporter on standard output, coloured only when it is a terminal.
    pub fn stdout() -> Self {
        let stdout = io::stdout();
        let colors = stdout.is_terminal();
        Self::new(stdout, colors)
    }
}

impl<W: Write> TerminalReporter<W> {
    pub fn new(out: W, colors: bool) -> Self {
        Self {
            out,
            colors,
            spinner_index: 0,
            drawn: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self, state: &ProgressState) -> String {
        match state {
            ProgressState::Bounded {
                percent,
                transferred,
                total,
            } => format!(
                "\r{}{}{}",
                paint(&format!("[{}] ", render_bar(*transferred, *total)), GREEN, self.colors),
                paint(&format!("{percent:.2}% "), CYAN, self.colors),
                paint(&downloaded(*transferred), WHITE, self.colors),
            ),
            ProgressState::Indeterminate { transferred } => {
                let frame = SPINNER_FRAMES[self.spinner_index % SPINNER_FRAMES.len()];
                self.spinner_index += 1;
                format!(
                    "\r{}{}",
                    paint(&format!("{frame} "), YELLOW, self.colors),
                    paint(&downloaded(*transferred), WHITE, self.colors),
                )
            }
        }
    }

    fn write(&mut self, text: &str) {
        let result = self
            .out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush());

        if let Err(e) = result {
            debug!("Failed to draw progress: {e}");
        }
    }
}

impl<W: Write> ProgressReporter for TerminalReporter<W> {
    fn start(&mut self, total: Option<u64>) {
        debug!(total = ?total, "transfer started");
        self.write("Downloading...\n");
    }

    fn update(&mut self, state: &ProgressState) {
        let line = self.render(state);
        self.drawn = true;
        self.write(&line);
    }

    fn finish(&mut self) {
        let mut tail = String::new();
        if self.colors {
            tail.push_str(RESET);
        }
        if self.drawn {
            tail.push('\n');
            self.drawn = false;
        }
        self.write(&tail);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Started { total: Option<u64> },
    Updated(ProgressState),
    Finished,
}

/// Reporter that only remembers what it was told.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<ProgressEvent>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<&ProgressState> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ProgressEvent::Updated(state) => Some(state),
                _ => None,
            })
            .collect()
    }
}

impl ProgressReporter for RecordingReporter {
    fn start(&mut self, total: Option<u64>) {
        self.events.push(ProgressEvent::Started { total });
    }

    fn update(&mut self, state: &ProgressState) {
        self.events.push(ProgressEvent::Updated(state.clone()));
    }

    fn finish(&mut self) {
        self.events.push(ProgressEvent::Finished);
    }
}
