use std::path::Path;

use docqa_llm::LlmProvider;

use crate::channel::Channel;
use crate::error::AgentError;

use super::{Assistant, IngestOutcome, messages};

impl<P: LlmProvider, C: Channel> Assistant<P, C> {
    pub(super) async fn handle_command(&mut self, input: &str) -> Result<(), AgentError> {
        let (command, args) = input
            .split_once(char::is_whitespace)
            .map_or((input, ""), |(c, a)| (c, a.trim()));

        match command {
            "/upload" => self.handle_upload(args).await,
            "/docs" => {
                let listing = messages::document_list(self.mode, &self.session.list());
                self.channel.send(&listing).await?;
                Ok(())
            }
            "/history" => {
                let rendered = messages::history(self.mode, self.session.exchanges());
                self.channel.send(&rendered).await?;
                Ok(())
            }
            "/clear" => {
                let count = self.clear();
                self.channel
                    .send(&messages::cleared(self.mode, count))
                    .await?;
                Ok(())
            }
            "/help" => {
                self.channel.send(messages::HELP).await?;
                Ok(())
            }
            other => {
                self.channel
                    .send(&format!("Unknown command: {other}. Type /help for commands."))
                    .await?;
                Ok(())
            }
        }
    }

    async fn handle_upload(&mut self, args: &str) -> Result<(), AgentError> {
        if args.is_empty() {
            self.channel.send("Usage: /upload <path>").await?;
            return Ok(());
        }

        let path = Path::new(args);
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(args)
            .to_owned();
        self.channel
            .send_status(&messages::reading(self.mode, &name))
            .await?;

        match self.upload_path(path).await {
            Ok(IngestOutcome::Added(kind)) => {
                self.channel
                    .send(&messages::added(self.mode, &name, kind))
                    .await?;
            }
            Ok(IngestOutcome::Skipped) => {
                self.channel.send(&messages::skipped(&name)).await?;
            }
            Err(AgentError::Channel(e)) => return Err(e.into()),
            Err(e) => {
                tracing::warn!(path = %path.display(), "upload failed: {e}");
                self.channel
                    .send(&messages::upload_failed(&name, &e))
                    .await?;
            }
        }
        Ok(())
    }
}
