//! Headless playback - a renderer that writes one line per tick.

use std::io::Write;

use colored::Colorize;
use serde::Serialize;

use crate::engine::{Params, Status};
use crate::error::Result;
use crate::identicon::participant_name;
use crate::layout::Point;
use crate::session::{Frame, Renderer, RunId, RunOutcome};

/// Line format for [`ConsoleRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// Writes frames to any `Write` sink, as colored text or JSON lines.
pub struct ConsoleRenderer {
    out: Box<dyn Write + Send>,
    format: Format,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Record<'a> {
    Start { run: RunId, participants: usize, step: usize },
    Frame(&'a Frame),
    Finish { run: RunId, outcome: &'a RunOutcome },
}

impl ConsoleRenderer {
    pub fn new(out: Box<dyn Write + Send>, format: Format) -> Self {
        Self { out, format }
    }

    pub fn stdout(format: Format) -> Self {
        Self::new(Box::new(std::io::stdout()), format)
    }

    fn json(&mut self, record: &Record<'_>) -> Result<()> {
        serde_json::to_writer(&mut self.out, record)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn text(&mut self, line: String) -> Result<()> {
        writeln!(self.out, "{}", line)?;
        self.out.flush()?;
        Ok(())
    }

    fn emit_start(&mut self, run: RunId, params: Params) -> Result<()> {
        match self.format {
            Format::Json => self.json(&Record::Start {
                run,
                participants: params.participants(),
                step: params.step(),
            }),
            Format::Text => self.text(format!(
                "{} run {}: {} soldiers, every {}",
                "▶".cyan(),
                run,
                params.participants(),
                params.step()
            )),
        }
    }

    fn emit_finish(&mut self, run: RunId, outcome: &RunOutcome) -> Result<()> {
        match self.format {
            Format::Json => self.json(&Record::Finish { run, outcome }),
            Format::Text => {
                let label = match outcome {
                    RunOutcome::Completed => "completed".green(),
                    RunOutcome::Cancelled => "cancelled".yellow(),
                    RunOutcome::ClockStopped => "clock stopped".yellow(),
                    RunOutcome::Failed(reason) => format!("failed: {}", reason).red(),
                };
                self.text(format!("{} run {} {}", "■".cyan(), run, label))
            }
        }
    }
}

impl Renderer for ConsoleRenderer {
    fn reset(&mut self, run: RunId, params: Params) {
        if let Err(e) = self.emit_start(run, params) {
            log::warn!("Failed to write run header: {}", e);
        }
    }

    fn layout(&mut self, positions: &[Point]) {
        log::debug!("Placed {} participants", positions.len());
    }

    fn render(&mut self, frame: &Frame) -> Result<()> {
        match self.format {
            Format::Json => self.json(&Record::Frame(frame)),
            Format::Text => {
                let event = frame.paced.event;
                let status = match event.status {
                    Status::Dead => "✝ dead".red().bold(),
                    Status::Alive => "· alive".green(),
                };
                self.text(format!(
                    "{:>5}  {:<12} {}",
                    frame.paced.sequence + 1,
                    participant_name(event.id),
                    status
                ))
            }
        }
    }

    fn finish(&mut self, run: RunId, outcome: &RunOutcome) {
        if let Err(e) = self.emit_finish(run, outcome) {
            log::warn!("Failed to write run summary: {}", e);
        }
    }
}
