//! User-facing text for each mode.

use std::fmt::Write;

use docqa_ingest::DocumentKind;

use crate::config::Mode;
use crate::error::AgentError;
use crate::session::Exchange;

pub(super) const HELP: &str = "\
Commands:
  /upload <path>  add a document to the session
  /docs           list uploaded documents
  /history        show previous questions and answers
  /clear          clear the chat history
  /help           show this message
  exit, quit      leave
Anything else is sent as a question.";

pub(super) fn greeting(mode: Mode) -> &'static str {
    match mode {
        Mode::Research => {
            "PDF Chat Assistant. Upload PDFs with /upload <path>, then ask a question. Type /help for commands."
        }
        Mode::Voice => {
            "Hey there! Upload some PDFs or ask me a question, and I'll speak my answer! Type /help for commands."
        }
        Mode::Video => {
            "Video AI Summarizer. Upload a video with /upload <path>, then ask about it. Type /help for commands."
        }
    }
}

pub(super) fn no_documents(mode: Mode) -> &'static str {
    match mode {
        Mode::Research => "Start by uploading one or more PDF files with /upload <path>.",
        Mode::Voice => "No PDFs yet. Ask me anything, or add some with /upload <path>.",
        Mode::Video => "Start by uploading a video file with /upload <path>.",
    }
}

pub(super) fn thinking(mode: Mode) -> &'static str {
    match mode {
        Mode::Research => "Analyzing PDFs and preparing response...",
        Mode::Voice => "Thinking and preparing to speak...",
        Mode::Video => "Processing your video...",
    }
}

pub(super) fn processing_video(name: &str) -> String {
    format!("Uploading {name} for analysis...")
}

pub(super) fn reading(mode: Mode, name: &str) -> String {
    match mode {
        Mode::Voice => format!("Reading {name}..."),
        Mode::Research | Mode::Video => format!("Processing {name}..."),
    }
}

pub(super) fn added(mode: Mode, name: &str, kind: DocumentKind) -> String {
    match (mode, kind) {
        (_, DocumentKind::Video) => format!("Video {name} is ready for analysis."),
        (Mode::Voice, DocumentKind::Pdf) => format!("Got it! Added {name} to my research pile!"),
        (_, DocumentKind::Pdf) => format!("Successfully processed {name}"),
    }
}

pub(super) fn skipped(name: &str) -> String {
    format!("{name} is already uploaded; keeping the first copy.")
}

pub(super) fn voice_failed(err: &str) -> String {
    format!("Voice generation failed: {err}")
}

pub(super) fn upload_failed(target: &str, err: &AgentError) -> String {
    format!("Could not add {target}: {err}")
}

pub(super) fn question_failed(mode: Mode, err: &AgentError) -> String {
    match (mode, err) {
        (Mode::Video, AgentError::EmptyQuestion) => {
            "Please enter a question or topic to analyze the video.".to_owned()
        }
        (_, AgentError::EmptyQuestion) => "Please enter a question.".to_owned(),
        (_, AgentError::NoDocuments) => no_documents(mode).to_owned(),
        (Mode::Voice, e) => format!("Oops! Something went wrong: {e}"),
        (_, e) => format!("Analysis Error: {e}"),
    }
}

pub(super) fn document_list(mode: Mode, names: &[&str]) -> String {
    if names.is_empty() {
        return no_documents(mode).to_owned();
    }
    let mut out = String::from(match mode {
        Mode::Research => "Uploaded PDFs:\n",
        Mode::Voice => "My Research Stack:\n",
        Mode::Video => "Uploaded videos:\n",
    });
    for name in names {
        let _ = writeln!(out, "- {name}");
    }
    out
}

pub(super) fn history(mode: Mode, exchanges: &[Exchange]) -> String {
    if exchanges.is_empty() {
        return "No questions asked yet.".to_owned();
    }
    let mut out = String::new();
    for exchange in exchanges {
        match mode {
            Mode::Voice => {
                let _ = writeln!(out, "You asked: {}", exchange.question);
                let _ = writeln!(out, "I said: {}", exchange.answer);
                if let Some(path) = &exchange.audio {
                    let _ = writeln!(out, "Audio: {}", path.display());
                }
            }
            Mode::Research | Mode::Video => {
                let _ = writeln!(out, "Question:\n{}", exchange.question);
                let _ = writeln!(out, "Answer:\n{}", exchange.answer);
            }
        }
        out.push_str("---\n");
    }
    out
}

pub(super) fn cleared(mode: Mode, count: usize) -> String {
    match mode {
        Mode::Voice => format!("Starting fresh! Forgot {count} exchanges."),
        Mode::Research => format!("Chat history cleared ({count} exchanges)."),
        Mode::Video => format!("Cleared {count} analyses and uploaded videos."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_question_warning_is_mode_specific() {
        assert_eq!(
            question_failed(Mode::Video, &AgentError::EmptyQuestion),
            "Please enter a question or topic to analyze the video."
        );
        assert_eq!(
            question_failed(Mode::Research, &AgentError::EmptyQuestion),
            "Please enter a question."
        );
    }

    #[test]
    fn model_errors_are_prefixed() {
        let err = AgentError::Other("quota exceeded".into());
        assert_eq!(
            question_failed(Mode::Research, &err),
            "Analysis Error: quota exceeded"
        );
        assert_eq!(
            question_failed(Mode::Voice, &err),
            "Oops! Something went wrong: quota exceeded"
        );
    }

    #[test]
    fn document_list_formats_names() {
        assert_eq!(
            document_list(Mode::Research, &["a.pdf", "b.pdf"]),
            "Uploaded PDFs:\n- a.pdf\n- b.pdf\n"
        );
        assert_eq!(document_list(Mode::Video, &[]), no_documents(Mode::Video));
    }

    #[test]
    fn history_includes_audio_in_voice_mode() {
        let exchanges = vec![
            Exchange::new("q1", "a1").with_audio(Some("/tmp/a1.mp3".into())),
        ];
        let rendered = history(Mode::Voice, &exchanges);
        assert!(rendered.contains("You asked: q1"));
        assert!(rendered.contains("I said: a1"));
        assert!(rendered.contains("Audio: /tmp/a1.mp3"));

        let rendered = history(Mode::Research, &exchanges);
        assert_eq!(rendered, "Question:\nq1\nAnswer:\na1\n---\n");
    }

    #[test]
    fn added_message_depends_on_mode() {
        assert_eq!(
            added(Mode::Voice, "a.pdf", DocumentKind::Pdf),
            "Got it! Added a.pdf to my research pile!"
        );
        assert_eq!(
            added(Mode::Research, "a.pdf", DocumentKind::Pdf),
            "Successfully processed a.pdf"
        );
    }
}
