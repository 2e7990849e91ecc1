//! RAG prompt assembly

use crate::domain::retrieval::RetrievedDocument;

/// Build the generation prompt from retrieved context and the question
///
/// With no context the model is still asked the question and is expected to
/// say it does not know.
pub fn build_prompt(documents: &[RetrievedDocument], question: &str) -> String {
    let context = documents
        .iter()
        .map(|doc| doc.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Use the following pieces of context to answer the question at the end. \
         If you don't know the answer, just say that you don't know.\n\n\
         Context: {}\n\n\
         Question: {}\n\n\
         Answer: ",
        context, question
    )
}
