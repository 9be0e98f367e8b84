//! Prompt templates for screening and quiz generation.

use youtube_client::ContentSource;

use super::models::Difficulty;

/// Characters of video text sent to the classifier.
pub const CLASSIFIER_SAMPLE_CHARS: usize = 2000;

/// Characters of video text sent to the quiz generator.
pub const QUIZ_CONTENT_CHARS: usize = 15_000;

/// First `max_chars` characters of `text`.
pub fn take_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub fn educational_check_prompt(content: &str) -> String {
    let sample = take_chars(content, CLASSIFIER_SAMPLE_CHARS);
    format!(
        "Analyze the following YouTube video content and determine if it is educational. \
Educational videos include: tutorials, lectures, courses, how-to guides, explanations, \
documentaries, science videos, history, language learning, programming tutorials, \
academic content, skill-building content, etc.\n\n\
Non-educational videos include: entertainment, music videos, vlogs, gaming streams, \
pranks, challenges, reaction videos, pure entertainment content, etc.\n\n\
Respond with ONLY a JSON object in this exact format:\n\
{{\"is_educational\": true or false, \"reason\": \"brief explanation\"}}\n\n\
Video Content:\n{sample}\n\n\
Remember: Return ONLY the JSON object, nothing else."
    )
}

fn video_difficulty_instruction(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "Easy: Create simple, straightforward questions that test basic understanding and recall of key facts from the video. Use simple language and focus on main concepts.",
        Difficulty::Medium => "Medium: Create moderately challenging questions that require understanding of concepts, relationships, and some analysis. Mix factual recall with conceptual understanding.",
        Difficulty::Hard => "Hard: Create challenging questions that require deep understanding, critical thinking, analysis, and application of concepts. Include questions that test synthesis and evaluation skills.",
    }
}

fn topic_difficulty_instruction(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "Easy: Simple questions focusing on basic facts and definitions.",
        Difficulty::Medium => "Medium: Mix of factual and conceptual questions requiring understanding.",
        Difficulty::Hard => "Hard: Challenging questions requiring deep understanding and application.",
    }
}

pub fn video_quiz_prompt(
    content: &str,
    source: ContentSource,
    num_questions: i32,
    difficulty: Difficulty,
) -> String {
    let content = take_chars(content, QUIZ_CONTENT_CHARS);
    let content_description = source.description();
    let difficulty_instruction = video_difficulty_instruction(difficulty);

    format!(
        "The following is content from an educational YouTube video ({content_description}). \
Create a quiz with exactly {num_questions} multiple choice questions.\n\n\
Difficulty Level: {difficulty_instruction}\n\n\
IMPORTANT: Return ONLY valid JSON in this exact format (no markdown, no code blocks, just pure JSON):\n\
{{\n\
  \"questions\": [\n\
    {{\n\
      \"question\": \"Question text here\",\n\
      \"options\": [\"Option A\", \"Option B\", \"Option C\", \"Option D\"],\n\
      \"correct\": 0,\n\
      \"explanation\": \"Explanation of why this answer is correct\"\n\
    }}\n\
  ],\n\
  \"notes\": \"Study notes content (can include HTML formatting for clarity)\"\n\
}}\n\n\
Requirements for Questions:\n\
- Create exactly {num_questions} multiple choice questions (no more, no less)\n\
- Each question must have exactly 4 options (A, B, C, D)\n\
- 'correct' is the index (0-3) of the correct option in the options array\n\
- Provide clear, detailed explanations for each correct answer\n\
- Base questions on the actual content provided below\n\
- Match the difficulty level specified above\n\n\
Requirements for Study Notes (VERY IMPORTANT - Make them EXTREMELY CLEAR):\n\
- The 'notes' field should contain well-organized, clear study notes\n\
- Use HTML formatting for better structure: <b>bold</b>, <ul><li>bullet points</li></ul>, <h3>headings</h3>, <br> for line breaks\n\
- Organize notes into clear sections with headings\n\
- Use bullet points or numbered lists for key concepts\n\
- Highlight important terms and definitions\n\
- Make it easy to scan and understand quickly\n\
- Include all major topics covered in the video\n\
- Use clear, concise language\n\
- Structure: Main Topic -> Key Points -> Important Details\n\
- Example structure: '<h3>Topic Name</h3><ul><li><b>Key Point:</b> Explanation</li></ul>'\n\
- Return ONLY the JSON object, nothing else\n\n\
--- Video Content Start ---\n{content}\n--- Video Content End ---"
    )
}

pub fn topic_quiz_prompt(topic: &str, num_questions: i32, difficulty: Difficulty) -> String {
    let difficulty_instruction = topic_difficulty_instruction(difficulty);

    format!(
        "Create a multiple-choice quiz on the topic: '{topic}'. \
Generate exactly {num_questions} questions.\n\n\
Difficulty Level: {difficulty_instruction}\n\n\
Return ONLY valid JSON (no markdown, no prose, just JSON) in this exact format:\n\
{{\n\
  \"questions\": [\n\
    {{\n\
      \"question\": \"Question text\",\n\
      \"options\": [\"Option A\", \"Option B\", \"Option C\", \"Option D\"],\n\
      \"correct\": 0,\n\
      \"explanation\": \"Short explanation of the correct answer\"\n\
    }}\n\
  ]\n\
}}\n\n\
Rules:\n\
- Create exactly {num_questions} questions.\n\
- Each question MUST have 4 options.\n\
- 'correct' must be the index (0-3) of the correct option.\n\
- Questions must be directly relevant to the topic.\n\
- Use clear, simple language.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_chars_is_char_safe() {
        assert_eq!(take_chars("héllo", 2), "hé");
        assert_eq!(take_chars("abc", 10), "abc");
        assert_eq!(take_chars("", 3), "");
    }

    #[test]
    fn test_classifier_prompt_samples_content() {
        let content = "a".repeat(5000);
        let prompt = educational_check_prompt(&content);
        assert!(prompt.contains(&"a".repeat(2000)));
        assert!(!prompt.contains(&"a".repeat(2001)));
        assert!(prompt.contains(r#"{"is_educational": true or false, "reason": "brief explanation"}"#));
    }

    #[test]
    fn test_video_prompt_mentions_count_source_and_difficulty() {
        let prompt = video_quiz_prompt("Cells divide.", ContentSource::Metadata, 7, Difficulty::Hard);
        assert!(prompt.contains("(video title and description)"));
        assert!(prompt.contains("exactly 7 multiple choice questions"));
        assert!(prompt.contains("Difficulty Level: Hard:"));
        assert!(prompt.contains("--- Video Content Start ---\nCells divide.\n--- Video Content End ---"));
    }

    #[test]
    fn test_video_prompt_truncates_content() {
        let content = format!("{}TAIL", "x".repeat(QUIZ_CONTENT_CHARS));
        let prompt = video_quiz_prompt(&content, ContentSource::Transcript, 5, Difficulty::Easy);
        assert!(!prompt.contains("TAIL"));
        assert!(prompt.contains("(transcript/subtitles)"));
    }

    #[test]
    fn test_topic_prompt() {
        let prompt = topic_quiz_prompt("Rust ownership", 4, Difficulty::Easy);
        assert!(prompt.starts_with("Create a multiple-choice quiz on the topic: 'Rust ownership'."));
        assert!(prompt.contains("Difficulty Level: Easy: Simple questions"));
    }
}
