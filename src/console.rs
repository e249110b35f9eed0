// src/console.rs
// Terminal front end: the page collaborators drawn as plain text

use crate::page::{ProgressIndicator, SegmentContainer, Status, StatusRegion, SubmitControl, Tone};
use crate::render::{Playback, PlaybackError, ScrollOptions, SegmentList, Viewport};
use std::io::{self, Write};

const BAR_WIDTH: usize = 30;

/// Writes every UI update to `out`. Write failures are logged and otherwise ignored.
pub struct Console<W: Write> {
    out: W,
    progress_visible: bool,
    /// A `\r` progress line is on screen without its newline
    line_open: bool,
}

impl Console<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            progress_visible: false,
            line_open: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::warn!("Failed to write to terminal: {}", e);
        }
    }

    /// Terminate an in-place progress line before printing anything else
    fn break_progress_line(&mut self) {
        if self.line_open {
            self.emit("\n");
            self.line_open = false;
        }
    }
}

pub fn progress_line(percent: f64) -> String {
    let percent = percent.clamp(0.0, 100.0);
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!(
        "\r[{}{}] {:5.1}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        percent
    )
}

fn tone_marker(tone: Tone) -> &'static str {
    match tone {
        Tone::Muted => " ",
        Tone::Info => "*",
        Tone::Success => "+",
        Tone::Danger => "!",
    }
}

impl<W: Write> ProgressIndicator for Console<W> {
    fn show(&mut self) {
        self.progress_visible = true;
    }

    fn hide(&mut self) {
        self.break_progress_line();
        self.progress_visible = false;
    }

    fn set_percent(&mut self, percent: f64) {
        // Selecting a file resets the bar without showing it
        if self.progress_visible {
            self.emit(&progress_line(percent));
            self.line_open = true;
        }
    }
}

impl<W: Write> StatusRegion for Console<W> {
    fn set_status(&mut self, status: &Status) {
        self.break_progress_line();
        self.emit(&format!("{} {}\n", tone_marker(status.tone()), status));
    }

    fn prompt(&mut self, message: &str) {
        self.break_progress_line();
        self.emit(&format!("! {}\n", message));
    }
}

impl<W: Write> SubmitControl for Console<W> {
    fn set_enabled(&mut self, enabled: bool, label: &str) {
        tracing::debug!("Submit control '{}' enabled={}", label, enabled);
    }
}

impl<W: Write> SegmentContainer for Console<W> {
    fn display(&mut self, segments: &SegmentList) {
        self.break_progress_line();
        if segments.is_empty() {
            self.emit("(no segments)\n");
        } else {
            self.emit(&segments.to_string());
        }
    }
}

/// Stands in for a video element: remembers the position and logs playback requests.
#[derive(Debug, Default)]
pub struct LoggingPlayer {
    position: f64,
}

impl LoggingPlayer {
    pub fn position(&self) -> f64 {
        self.position
    }
}

impl Playback for LoggingPlayer {
    fn set_position(&mut self, seconds: f64) {
        self.position = seconds;
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        tracing::info!("Playing from {:.2}s", self.position);
        Ok(())
    }
}

/// Nothing scrolls in a terminal
#[derive(Debug, Default)]
pub struct FixedViewport;

impl Viewport for FixedViewport {
    fn scroll_into_view(&mut self, segment_index: usize, _options: ScrollOptions) {
        tracing::debug!("Segment {} scrolled into view", segment_index + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::SegmentRenderer;
    use crate::segment::SegmentResult;

    fn output(console: Console<Vec<u8>>) -> String {
        String::from_utf8(console.into_inner()).unwrap()
    }

    #[test]
    fn test_progress_line_bounds() {
        assert_eq!(progress_line(0.0), format!("\r[{}]   0.0%", "-".repeat(BAR_WIDTH)));
        assert_eq!(progress_line(100.0), format!("\r[{}] 100.0%", "#".repeat(BAR_WIDTH)));
        assert_eq!(progress_line(250.0), progress_line(100.0), "clamped");
    }

    #[test]
    fn test_progress_hidden_until_shown() {
        let mut console = Console::new(Vec::new());
        console.set_percent(40.0);
        assert!(output(console).is_empty());
    }

    #[test]
    fn test_status_breaks_progress_line() {
        let mut console = Console::new(Vec::new());
        console.show();
        console.set_percent(50.0);
        console.set_status(&Status::Complete);
        console.hide();

        let text = output(console);
        assert!(text.starts_with('\r'));
        assert!(text.ends_with("\n+ Upload complete! Video processed successfully.\n"));
    }

    #[test]
    fn test_progress_resumes_after_status() {
        let mut console = Console::new(Vec::new());
        console.show();
        console.set_percent(0.0);
        console.set_status(&Status::Failed("x".into()));
        console.set_percent(50.0);
        console.hide();

        let text = output(console);
        assert!(text.contains(&progress_line(50.0)), "bar still drawn after a status line");
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_display_dumps_segments() {
        let list = SegmentRenderer::new("p.png").render(&[SegmentResult::new(0.0, 12.0)]);
        let mut console = Console::new(Vec::new());
        console.display(&list);
        assert!(output(console).contains("00:00 → 00:12"));
    }

    #[test]
    fn test_logging_player_tracks_position() {
        let mut player = LoggingPlayer::default();
        player.set_position(42.5);
        assert!(player.play().is_ok());
        assert_eq!(player.position(), 42.5);
    }
}
