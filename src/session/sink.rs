use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Stdout, Write};
use std::time::Duration;

/// Printed once the response stream has been fully relayed
pub const COMPLETION_MARKER: &str = "✅ Streaming complete!";

/// Destination for streamed response text
pub trait ResponseSink {
    /// Called once before the first fragment is awaited
    fn begin(&mut self) -> Result<()> {
        Ok(())
    }

    fn write_fragment(&mut self, fragment: &str) -> Result<()>;

    /// Called once after the stream is exhausted
    fn finish(&mut self) -> Result<()>;
}

/// Writes fragments to a terminal as they arrive
pub struct ConsoleSink<W: Write = Stdout> {
    out: W,
    color: bool,
    spinner: Option<ProgressBar>,
}

impl ConsoleSink<Stdout> {
    pub fn stdout(color: bool) -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }

        Self {
            out: io::stdout(),
            color,
            spinner: Some(spinner),
        }
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            spinner: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn banner(&self, text: &str) -> String {
        if self.color {
            text.bold().cyan().to_string()
        } else {
            text.to_string()
        }
    }
}

impl<W: Write> ResponseSink for ConsoleSink<W> {
    fn begin(&mut self) -> Result<()> {
        let banner = self.banner("💬 AI Response:");
        writeln!(self.out, "\n{}\n", banner)?;
        self.out.flush()?;

        if let Some(spinner) = &self.spinner {
            spinner.set_message("Waiting for the coach...");
            spinner.enable_steady_tick(Duration::from_millis(100));
        }
        Ok(())
    }

    fn write_fragment(&mut self, fragment: &str) -> Result<()> {
        self.clear_spinner();
        self.out
            .write_all(fragment.as_bytes())
            .context("Failed to write response fragment")?;
        self.out.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.clear_spinner();
        let marker = if self.color {
            COMPLETION_MARKER.green().to_string()
        } else {
            COMPLETION_MARKER.to_string()
        };
        writeln!(self.out, "\n\n{}", marker)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Collects fragments in memory
#[derive(Debug, Default)]
pub struct BufferSink {
    output: String,
    fragments: usize,
    finished: bool,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, including the completion marker once finished
    pub fn contents(&self) -> &str {
        &self.output
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl ResponseSink for BufferSink {
    fn write_fragment(&mut self, fragment: &str) -> Result<()> {
        self.output.push_str(fragment);
        self.fragments += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.output.push('\n');
        self.output.push_str(COMPLETION_MARKER);
        self.finished = true;
        Ok(())
    }
}
