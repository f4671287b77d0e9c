//! Prompt construction.

use crate::types::QueryRequest;
use std::fmt::Write as _;

/// Build the single prompt sent for a request.
///
/// The document is fenced so that instructions inside it read as content;
/// questions are numbered from 1 in request order.
pub fn build_prompt(request: &QueryRequest) -> String {
    let count = request.questions().len();
    let mut prompt = String::with_capacity(request.document().len() + 512);

    prompt.push_str(
        "Answer the questions below using only the document provided. \
         Do not use outside knowledge or make assumptions beyond what the document states.\n",
    );
    let _ = writeln!(
        prompt,
        "Answer the questions in the order they are listed, giving exactly one answer per question ({} in total).",
        count
    );
    prompt.push_str(
        "If the document does not contain the information needed to answer a question, \
         say explicitly that the document does not provide it instead of guessing.\n",
    );
    prompt.push_str(
        "Respond with a JSON object of the form {\"answers\": [\"...\"]}, \
         where the i-th string answers the i-th question.\n\n",
    );

    prompt.push_str("Document:\n\"\"\"\n");
    prompt.push_str(request.document());
    prompt.push_str("\n\"\"\"\n\nQuestions:\n");
    for (i, question) in request.questions().iter().enumerate() {
        let _ = writeln!(prompt, "{}. {}", i + 1, question);
    }

    prompt
}
