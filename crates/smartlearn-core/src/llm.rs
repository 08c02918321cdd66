//! Tutor client: quiz, hint, evaluation and free-text operations
//! against a generative-text provider.
//!
//! Structured operations expect a JSON object or array embedded
//! somewhere in the model's free-form output; the client slices out
//! the first `{`/`[` through the matching last `}`/`]` before parsing.

use serde::Deserialize;
use serde_json::json;

use crate::error::{Result, SmartlearnError};
use crate::provider::Provider;
use crate::types::{Evaluation, QuizQuestion};

pub struct TutorClient {
    provider: Provider,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct QuizEnvelope {
    quiz: Vec<QuizQuestion>,
}

impl TutorClient {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            http: reqwest::Client::new(),
        }
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    async fn chat(&self, prompt: &str) -> Result<String> {
        let config = self.provider.config();
        let api_key = self.provider.validate_api_key()?;

        let response = self
            .http
            .post(config.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&json!({
                "model": config.model,
                "messages": [
                    {
                        "role": "user",
                        "content": prompt,
                    },
                ],
                "temperature": 0.3,
            }))
            .send()
            .await?
            .json::<serde_json::Value>()
            .await?;

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| SmartlearnError::ModelRequestFailed {
                reason: format!("invalid API response: {:?}", response),
            })?;

        Ok(content.to_string())
    }

    /// Generate a multiple-choice quiz from a transcript.
    pub async fn generate_quiz(
        &self,
        transcript: &str,
        learner_state: &str,
        difficulty: &str,
    ) -> Result<Vec<QuizQuestion>> {
        if transcript.trim().is_empty() {
            return Err(SmartlearnError::EmptyField {
                field: "transcript",
            });
        }
        if learner_state.trim().is_empty() {
            return Err(SmartlearnError::EmptyField {
                field: "learner_state",
            });
        }

        let prompt = format!(
            r#"Generate 5 multiple-choice questions from this learning material.
Learner state: {learner_state}
Difficulty: {difficulty}

Transcript: {transcript}

Return a valid JSON array, where each object has "question", "options" (an array of 4 strings), "answer" (one of the options), "hint" (a helpful clue without giving away the answer), and "explanation" (why the answer is correct):
[
    {{"question": "...", "options": ["A", "B", "C", "D"], "answer": "A", "hint": "...", "explanation": "..."}},
    ...
]"#
        );

        let content = self.chat(&prompt).await?;
        let questions = parse_quiz_payload(&content)?;
        if questions.is_empty() {
            return Err(SmartlearnError::ModelRequestFailed {
                reason: "model returned an empty quiz".to_string(),
            });
        }
        Ok(questions)
    }

    /// Generate a hint that guides without revealing the answer.
    pub async fn generate_hint(
        &self,
        question: &str,
        options: Option<&[String]>,
    ) -> Result<String> {
        if question.trim().is_empty() {
            return Err(SmartlearnError::EmptyField { field: "question" });
        }

        let options_text = options
            .filter(|o| !o.is_empty())
            .map(|o| format!("\nOptions: {}", o.join(", ")))
            .unwrap_or_default();

        let prompt = format!(
            r#"Provide a helpful hint for this question without revealing the answer directly.
The hint should guide the learner's thinking process.

Question: {question}{options_text}

Return JSON in this exact format:
{{
    "hint": "Your helpful hint here"
}}"#
        );

        #[derive(Deserialize)]
        struct HintPayload {
            hint: String,
        }

        let content = self.chat(&prompt).await?;
        let payload: HintPayload = serde_json::from_str(extract_json_slice(&content)?)?;
        Ok(payload.hint)
    }

    /// Evaluate a learner's answer. A match (trimmed,
    /// case-insensitive) short-circuits without a model call; wrong
    /// answers get an explanation and a reinforcement follow-up.
    pub async fn evaluate_answer(
        &self,
        question: &str,
        user_answer: &str,
        correct_answer: &str,
    ) -> Result<Evaluation> {
        if user_answer.trim().eq_ignore_ascii_case(correct_answer.trim()) {
            return Ok(Evaluation {
                explanation: "Correct! Well done.".to_string(),
                follow_up: "Ready for the next challenge?".to_string(),
                is_correct: true,
            });
        }

        let prompt = format!(
            r#"The learner answered this question incorrectly:

Question: {question}
User Answer: {user_answer}
Correct Answer: {correct_answer}

Explain why the user's answer is wrong and provide a clear explanation of the correct concept.
Then provide a follow-up reinforcement question to help them understand better.

Return JSON in this exact format:
{{
    "explanation": "Explanation of why the answer is wrong and the correct concept",
    "follow_up": "A follow-up question to reinforce learning",
    "is_correct": false
}}"#
        );

        let content = self.chat(&prompt).await?;
        let mut evaluation: Evaluation = serde_json::from_str(extract_json_slice(&content)?)?;
        evaluation.is_correct = false;
        Ok(evaluation)
    }

    /// Concise 2-3 paragraph summary of a transcript.
    pub async fn summarize(&self, transcript: &str) -> Result<String> {
        if transcript.trim().is_empty() {
            return Err(SmartlearnError::EmptyField {
                field: "transcript",
            });
        }
        let prompt = format!(
            r#"Please provide a concise summary of the following video transcript in 2-3 paragraphs.
Focus on the main topics and key insights discussed.

Transcript: {transcript}

Summary:"#
        );
        Ok(self.chat(&prompt).await?.trim().to_string())
    }

    /// Bullet-point key learning points from a transcript.
    pub async fn key_points(&self, transcript: &str) -> Result<String> {
        if transcript.trim().is_empty() {
            return Err(SmartlearnError::EmptyField {
                field: "transcript",
            });
        }
        let prompt = format!(
            r#"Extract the key learning points from this video transcript.
Provide them as a bullet-point list (5-8 points) that captures the most important concepts and insights.

Transcript: {transcript}

Key Points:"#
        );
        Ok(self.chat(&prompt).await?.trim().to_string())
    }

    /// Answer a learner's question from the transcript content.
    pub async fn answer_question(&self, transcript: &str, question: &str) -> Result<String> {
        if question.trim().is_empty() {
            return Err(SmartlearnError::EmptyField { field: "question" });
        }
        let prompt = format!(
            r#"Based on the following video transcript, please answer this question: "{question}"

Provide a clear, concise, and accurate answer based on the content of the transcript.
If the question cannot be answered using the transcript, politely explain that.

Transcript: {transcript}

Answer:"#
        );
        Ok(self.chat(&prompt).await?.trim().to_string())
    }
}

/// Slice the first JSON object or array out of free-form model text.
pub fn extract_json_slice(text: &str) -> Result<&str> {
    let obj_start = text.find('{');
    let arr_start = text.find('[');

    let (start, close) = match (obj_start, arr_start) {
        (Some(o), Some(a)) if a < o => (a, ']'),
        (Some(o), _) => (o, '}'),
        (None, Some(a)) => (a, ']'),
        (None, None) => return Err(SmartlearnError::MissingJson),
    };

    let end = text.rfind(close).ok_or(SmartlearnError::MissingJson)?;
    if end < start {
        return Err(SmartlearnError::MissingJson);
    }
    Ok(&text[start..=end])
}

/// The model is asked for a bare array, but some providers wrap it in
/// a `{"quiz": [...]}` envelope. Accept both.
fn parse_quiz_payload(content: &str) -> Result<Vec<QuizQuestion>> {
    let slice = extract_json_slice(content)?;
    if slice.starts_with('[') {
        Ok(serde_json::from_str(slice)?)
    } else {
        let envelope: QuizEnvelope = serde_json::from_str(slice)?;
        Ok(envelope.quiz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_object_out_of_prose() {
        let text = "Sure! Here is the JSON you asked for:\n{\"hint\": \"think about scope\"}\nHope it helps.";
        assert_eq!(
            extract_json_slice(text).unwrap(),
            "{\"hint\": \"think about scope\"}"
        );
    }

    #[test]
    fn slices_array_when_it_comes_first() {
        let text = "```json\n[{\"question\": \"q\"}]\n``` trailing {noise}";
        assert_eq!(extract_json_slice(text).unwrap(), "[{\"question\": \"q\"}]");
    }

    #[test]
    fn missing_json_is_an_error() {
        assert!(matches!(
            extract_json_slice("no structured output here"),
            Err(SmartlearnError::MissingJson)
        ));
    }

    #[test]
    fn parses_bare_array_quiz() {
        let content = r#"[{"question":"What is ownership?","options":["a","b","c","d"],"answer":"a","hint":"memory"}]"#;
        let quiz = parse_quiz_payload(content).unwrap();
        assert_eq!(quiz.len(), 1);
        assert_eq!(quiz[0].answer, "a");
        assert_eq!(quiz[0].hint.as_deref(), Some("memory"));
    }

    #[test]
    fn parses_enveloped_quiz() {
        let content = r#"Here you go: {"quiz":[{"question":"q","options":["a","b","c","d"],"answer":"b","difficulty":"medium","explanation":"because"}]}"#;
        let quiz = parse_quiz_payload(content).unwrap();
        assert_eq!(quiz.len(), 1);
        assert_eq!(quiz[0].difficulty.as_deref(), Some("medium"));
    }

    #[tokio::test]
    async fn correct_answer_short_circuits_without_network() {
        let client = TutorClient::new(Provider::Gemini);
        let evaluation = client
            .evaluate_answer("What is Rust?", "  a language ", "A Language")
            .await
            .unwrap();
        assert!(evaluation.is_correct);
        assert_eq!(evaluation.explanation, "Correct! Well done.");
    }

    #[tokio::test]
    async fn empty_transcript_is_rejected_before_any_call() {
        let client = TutorClient::new(Provider::Gemini);
        let err = client.generate_quiz("   ", "engaged", "medium").await;
        assert!(matches!(
            err,
            Err(SmartlearnError::EmptyField {
                field: "transcript"
            })
        ));
    }
}
