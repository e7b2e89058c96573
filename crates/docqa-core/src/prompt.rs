//! Prompt templates for each mode.
//!
//! Every stored text document is inlined on every question. There is no
//! truncation or token budgeting.

use crate::config::Mode;
use crate::session::Session;

/// Marker placed between document blocks in the combined context.
pub const CONTEXT_SEPARATOR: &str = "\n\n===\n\n";

const NO_DOCUMENTS_HINT: &str =
    "Since no PDFs are uploaded, use your general knowledge and search tools if needed.";

/// `Document: <name>\n<text>` blocks for every text document, in upload order.
#[must_use]
pub fn combined_context(session: &Session) -> String {
    session
        .documents()
        .filter_map(|(name, doc)| doc.text().map(|text| format!("Document: {name}\n{text}")))
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// Build the single prompt sent to the model for `question`.
#[must_use]
pub fn compose(mode: Mode, session: &Session, question: &str) -> String {
    if mode == Mode::Video {
        return video_prompt(question);
    }

    let context = combined_context(session);
    match (mode, context.is_empty()) {
        (Mode::Voice, false) => format!(
            "Hello! I'm your friendly voice assistant.\n\
             Here's the context from the uploaded PDFs:\n\
             {context}\n\n\
             User Question: {question}\n\n\
             Provide a conversational, friendly response based on the PDF content.\n\
             Reference specific documents when possible. Keep it concise for voice output!"
        ),
        (Mode::Voice, true) => format!(
            "Hello! I'm your friendly voice assistant.\n\n\
             User Question: {question}\n\n\
             {NO_DOCUMENTS_HINT}\n\
             Provide a conversational, friendly response. Keep it concise for voice output!"
        ),
        (_, false) => format!(
            "Context from PDFs:\n\
             {context}\n\n\
             User Question: {question}\n\n\
             Please provide a comprehensive answer based on the content of the PDFs.\n\
             Include specific references to the source documents where appropriate.\n\
             Format your response in a clear, well-structured manner."
        ),
        (_, true) => format!(
            "User Question: {question}\n\n\
             {NO_DOCUMENTS_HINT}\n\
             Provide a comprehensive, well-structured answer."
        ),
    }
}

fn video_prompt(question: &str) -> String {
    format!(
        "Analyze the uploaded video for content and context.\n\
         Query: {question}\n\n\
         Please provide a comprehensive analysis addressing the query,\n\
         including relevant insights and observations from the video.\n\
         Format your response in a clear, well-structured manner."
    )
}
