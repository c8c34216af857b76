use std::sync::Arc;

use tracing::{info, warn};

use crate::application::ports::chat_model::{ChatModel, ChatModelError, CompletionRequest};

pub const DEFAULT_TEMPERATURE: f32 = 0.3;

const PROMPT_PREAMBLE: &str = "You are an educational assistant that helps readers understand \
their own documents. Answer thoroughly, with clear structure, using only the material below.

Context from the document:
";

const PROMPT_INSTRUCTIONS: &str = "

How to answer:

1. Analysis: work through the relevant parts of the context, break complex ideas into \
smaller steps and define key terms as they appear.
2. Structure: open with a direct answer, then supporting detail and examples taken from \
the document. Use headings or bullet points where they help.
3. Accuracy: rely only on the context above. Quote passages where useful and say plainly \
when the context does not contain the answer. Separate what the text states from what \
you infer.
4. Teaching: explain jargon, add background when it aids understanding and point to \
related parts of the document.
5. Transparency: mention assumptions and note when more context would help.

Format the response with these sections:

📌 Direct Answer:
[The immediate answer to the question]

🔍 Detailed Explanation:
[Analysis and supporting details]

💡 Key Insights:
[Important concepts, terms or takeaways]

📑 Source References:
[Relevant passages and where they appear in the document]

🔄 Related Concepts:
[Connected topics or sections worth reading next]

Answer: ";

/// Fills the study-assistant template. Context and question are appended as
/// plain text, so braces in either are never interpreted.
pub fn build_prompt(question: &str, context_chunks: &[&str]) -> String {
    let context = context_chunks.join("\n\n");
    let mut prompt = String::with_capacity(
        PROMPT_PREAMBLE.len() + context.len() + question.len() + PROMPT_INSTRUCTIONS.len() + 16,
    );
    prompt.push_str(PROMPT_PREAMBLE);
    prompt.push_str(&context);
    prompt.push_str("\n\nQuestion: ");
    prompt.push_str(question);
    prompt.push_str(PROMPT_INSTRUCTIONS);
    prompt
}

pub struct AnswerGenerator {
    chat_model: Arc<dyn ChatModel>,
    temperature: f32,
}

impl AnswerGenerator {
    pub fn new(chat_model: Arc<dyn ChatModel>, temperature: f32) -> Self {
        Self {
            chat_model,
            temperature,
        }
    }

    pub async fn generate(
        &self,
        question: &str,
        context_chunks: &[&str],
    ) -> Result<String, ChatModelError> {
        let request = CompletionRequest {
            prompt: build_prompt(question, context_chunks),
            temperature: self.temperature,
        };

        match self.chat_model.complete(request).await {
            Ok(response) => {
                info!(
                    "Generated answer with {} ({} chars)",
                    response.model,
                    response.content.len()
                );
                Ok(response.content)
            }
            Err(e) => {
                warn!("Answer generation with {} failed: {}", self.chat_model.model_name(), e);
                Err(e)
            }
        }
    }
}
