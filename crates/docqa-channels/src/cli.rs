use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use docqa_core::channel::{Channel, ChannelError, ChannelMessage};

type LineSource = Box<dyn BufRead + Send>;
type Sink = Box<dyn Write + Send>;

/// CLI channel that reads lines from stdin and writes to stdout.
pub struct CliChannel {
    input: Option<LineSource>,
    output: Sink,
}

impl CliChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::with_io(BufReader::new(std::io::stdin()), std::io::stdout())
    }

    /// Channel over arbitrary reader and writer.
    #[must_use]
    pub fn with_io(
        input: impl BufRead + Send + 'static,
        output: impl Write + Send + 'static,
    ) -> Self {
        Self {
            input: Some(Box::new(input)),
            output: Box::new(output),
        }
    }

    fn write_line(&mut self, line: &str) -> Result<(), ChannelError> {
        writeln!(self.output, "{line}")?;
        self.output.flush()?;
        Ok(())
    }
}

impl Default for CliChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CliChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliChannel")
            .field("input_open", &self.input.is_some())
            .finish_non_exhaustive()
    }
}

impl Channel for CliChannel {
    async fn recv(&mut self) -> Result<Option<ChannelMessage>, ChannelError> {
        write!(self.output, "You: ")?;
        self.output.flush()?;

        let mut input = self.input.take().ok_or(ChannelError::ChannelClosed)?;
        let (input, result) = tokio::task::spawn_blocking(move || {
            let mut line = String::new();
            let result = input.read_line(&mut line).map(|n| (n, line));
            (input, result)
        })
        .await
        .map_err(|e| ChannelError::Other(e.to_string()))?;

        let (read, line) = result?;
        if read == 0 {
            tracing::debug!("stdin closed");
            return Ok(None);
        }
        self.input = Some(input);

        let text = line.trim_end_matches(['\r', '\n']);
        let trimmed = text.trim();
        if trimmed == "exit" || trimmed == "quit" {
            return Ok(None);
        }

        Ok(Some(ChannelMessage {
            text: text.to_owned(),
        }))
    }

    async fn send(&mut self, text: &str) -> Result<(), ChannelError> {
        self.write_line(&format!("Assistant: {text}"))
    }

    async fn send_status(&mut self, text: &str) -> Result<(), ChannelError> {
        self.write_line(&format!("[{text}]"))
    }

    async fn send_audio(&mut self, path: &Path) -> Result<(), ChannelError> {
        self.write_line(&format!("Audio saved to {}", path.display()))
    }
}
