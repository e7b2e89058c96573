//! Per-run state: uploaded documents keyed by file name and the chat history.

use std::path::{Path, PathBuf};

use docqa_ingest::Document;

/// One question/answer round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
    /// Synthesised speech for `answer`, owned by the session until cleared.
    pub audio: Option<PathBuf>,
}

impl Exchange {
    #[must_use]
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            audio: None,
        }
    }

    #[must_use]
    pub fn with_audio(mut self, path: Option<PathBuf>) -> Self {
        self.audio = path;
        self
    }
}

/// Documents in upload order plus the ordered exchange history.
///
/// Document names are unique: `put` never replaces an existing entry.
#[derive(Debug, Default)]
pub struct Session {
    documents: Vec<(String, Document)>,
    exchanges: Vec<Exchange>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.documents.iter().any(|(n, _)| n == name)
    }

    /// Store `document` under `name`. Returns `false` and drops `document`
    /// when the name is already taken.
    pub fn put(&mut self, name: impl Into<String>, document: Document) -> bool {
        let name = name.into();
        if self.has(&name) {
            tracing::debug!(%name, "document already stored, keeping first upload");
            return false;
        }
        self.documents.push((name, document));
        true
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Document> {
        self.documents
            .iter()
            .find_map(|(n, doc)| (n == name).then_some(doc))
    }

    /// Document names in first-upload order.
    #[must_use]
    pub fn list(&self) -> Vec<&str> {
        self.documents.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn documents(&self) -> impl Iterator<Item = (&str, &Document)> {
        self.documents.iter().map(|(n, doc)| (n.as_str(), doc))
    }

    #[must_use]
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Drop every stored document. Video temp files are removed with them.
    pub fn clear_documents(&mut self) {
        self.documents.clear();
    }

    pub fn append_exchange(&mut self, exchange: Exchange) -> &Exchange {
        self.exchanges.push(exchange);
        &self.exchanges[self.exchanges.len() - 1]
    }

    #[must_use]
    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    /// Empty the history and delete audio files owned by cleared exchanges.
    /// Returns the number of exchanges removed.
    pub fn clear_exchanges(&mut self) -> usize {
        let cleared = self.exchanges.len();
        for exchange in self.exchanges.drain(..) {
            if let Some(path) = exchange.audio.as_deref() {
                release_audio(path);
            }
        }
        cleared
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.clear_exchanges();
    }
}

fn release_audio(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "removed audio file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), "failed to remove audio file: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn text(s: &str) -> Document {
        Document::Text(s.to_owned())
    }

    #[test]
    fn put_keeps_first_upload() {
        let mut session = Session::new();
        assert!(session.put("a.pdf", text("first")));
        assert!(!session.put("a.pdf", text("second")));
        assert_eq!(session.list(), vec!["a.pdf"]);
        assert_eq!(session.get("a.pdf").and_then(Document::text), Some("first"));
    }

    #[test]
    fn list_preserves_insertion_order() {
        let mut session = Session::new();
        session.put("b.pdf", text("b"));
        session.put("a.pdf", text("a"));
        session.put("c.pdf", text("c"));
        assert_eq!(session.list(), vec!["b.pdf", "a.pdf", "c.pdf"]);
        let names: Vec<&str> = session.documents().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b.pdf", "a.pdf", "c.pdf"]);
    }

    #[test]
    fn has_and_get_missing() {
        let session = Session::new();
        assert!(!session.has("x.pdf"));
        assert!(session.get("x.pdf").is_none());
        assert_eq!(session.document_count(), 0);
    }

    #[test]
    fn append_exchange_returns_stored_entry() {
        let mut session = Session::new();
        let stored = session.append_exchange(Exchange::new("q1", "a1"));
        assert_eq!(stored.question, "q1");
        session.append_exchange(Exchange::new("q2", "a2"));
        let questions: Vec<&str> = session
            .exchanges()
            .iter()
            .map(|e| e.question.as_str())
            .collect();
        assert_eq!(questions, vec!["q1", "q2"]);
    }

    #[test]
    fn clear_exchanges_removes_audio_files() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("answer.mp3");
        std::fs::write(&audio, b"ID3").unwrap();

        let mut session = Session::new();
        session.append_exchange(Exchange::new("q", "a").with_audio(Some(audio.clone())));
        session.append_exchange(Exchange::new("q2", "a2"));

        assert_eq!(session.clear_exchanges(), 2);
        assert!(session.exchanges().is_empty());
        assert!(!audio.exists());
    }

    #[test]
    fn clear_exchanges_tolerates_missing_audio() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new();
        session.append_exchange(
            Exchange::new("q", "a").with_audio(Some(dir.path().join("gone.mp3"))),
        );
        assert_eq!(session.clear_exchanges(), 1);
    }

    #[test]
    fn clear_exchanges_keeps_documents() {
        let mut session = Session::new();
        session.put("a.pdf", text("a"));
        session.append_exchange(Exchange::new("q", "a"));
        session.clear_exchanges();
        assert_eq!(session.list(), vec!["a.pdf"]);
    }

    #[test]
    fn clear_documents_keeps_history() {
        let mut session = Session::new();
        session.put("a.pdf", text("a"));
        session.append_exchange(Exchange::new("q", "a"));
        session.clear_documents();
        assert!(session.list().is_empty());
        assert_eq!(session.exchanges().len(), 1);
    }

    #[test]
    fn drop_removes_audio_files() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("answer.mp3");
        std::fs::write(&audio, b"ID3").unwrap();
        {
            let mut session = Session::new();
            session.append_exchange(Exchange::new("q", "a").with_audio(Some(audio.clone())));
        }
        assert!(!audio.exists());
    }

    proptest! {
        #[test]
        fn list_is_first_seen_order(names in proptest::collection::vec("[a-d]\\.pdf", 0..20)) {
            let mut session = Session::new();
            for (i, name) in names.iter().enumerate() {
                session.put(name.clone(), Document::Text(i.to_string()));
            }

            let mut expected: Vec<&str> = Vec::new();
            for name in &names {
                if !expected.contains(&name.as_str()) {
                    expected.push(name);
                }
            }
            prop_assert_eq!(session.list(), expected.clone());

            for name in expected {
                let first = names.iter().position(|n| n == name).unwrap();
                let first_text = first.to_string();
                prop_assert_eq!(
                    session.get(name).and_then(Document::text),
                    Some(first_text.as_str())
                );
            }
        }
    }
}
