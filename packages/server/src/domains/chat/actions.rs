use tracing::warn;

use crate::common::AppError;
use crate::kernel::{is_rate_limit_error, BaseAI};

const GREETINGS: [&str; 5] = ["hi", "hello", "welcome", "hey", "greetings"];

pub const GREETING_REPLY: &str = "<b>Hi there! 👋</b><br>I am your Gemini chatbot. Ask me anything, request code, or type a command to get started!";
pub const UNAVAILABLE_REPLY: &str =
    "<p><b>AI Chatbot Unavailable.</b><br>Please configure the Gemini API key in settings.</p>";
pub const EMPTY_REPLY: &str = "<p><b>Sorry, I couldn't generate a response right now.</b><br>Please try again in a moment.</p>";

/// Exact greeting, or a short message (under 10 chars) starting with one.
pub fn is_greeting(message: &str) -> bool {
    let cleaned = message.trim().to_lowercase();
    GREETINGS.contains(&cleaned.as_str())
        || (cleaned.chars().count() < 10 && GREETINGS.iter().any(|g| cleaned.starts_with(g)))
}

pub fn answer_prompt(message: &str) -> String {
    format!(
        "You are a helpful AI assistant. Respond to the user's request on ANY topic (coding, general knowledge, creative writing, etc.).\n\n\
Answer style:\n\
- Be helpful, friendly, and direct.\n\
- Keep answers concise and well-structured unless the user asks for a detailed explanation.\n\
- If the user says words like 'detailed', 'explain step by step', or 'in depth', then you may give a longer answer.\n\n\
Formatting rules:\n\
- Output ONLY a valid HTML fragment (no <!DOCTYPE>, <html>, <head>, or <body> tags).\n\
- Start with a concise 1-2 sentence summary of the answer.\n\
- For any code, ALWAYS wrap it in <pre><code>...</code></pre>.\n\
- For any console/sample output, wrap it in <pre>...</pre>.\n\
- Use <b>, <ul>, <ol>, <li>, <p>, and <br> for structure and readability.\n\
- Do NOT use Markdown code fences like ```; use HTML tags only.\n\
- Do NOT restate the user prompt; just answer it.\n\n\
User request:\n{message}"
    )
}

/// HTML answer for the study assistant.
pub async fn ask(ai: Option<&dyn BaseAI>, message: &str) -> Result<String, AppError> {
    if message.trim().is_empty() {
        return Err(AppError::bad_request("No message provided"));
    }
    if is_greeting(message) {
        return Ok(GREETING_REPLY.to_string());
    }
    let Some(ai) = ai else {
        return Ok(UNAVAILABLE_REPLY.to_string());
    };

    match ai.complete(&answer_prompt(message)).await {
        Ok(answer) if answer.trim().is_empty() => Ok(EMPTY_REPLY.to_string()),
        Ok(answer) => Ok(answer),
        Err(e) if is_rate_limit_error(&e) => {
            warn!(error = %e, "Chat rate limited");
            Err(AppError::unavailable(
                "AI generation is temporarily unavailable due to rate limits. Please try again later.",
            ))
        }
        Err(e) => Err(AppError::Internal(e.context("Chat completion failed"))),
    }
}
