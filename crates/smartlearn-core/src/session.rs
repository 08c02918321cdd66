//! Quiz session store: ordered questions plus a cursor, keyed by a
//! generated session id, with TTL expiry swept on access.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::Serialize;
use uuid::Uuid;

use crate::error::{Result, SmartlearnError};
use crate::types::QuizQuestion;

/// Fallback hint when a question carries none.
pub const DEFAULT_HINT: &str = "Review the material and try again.";

/// Sessions older than this are dropped.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// What the learner sees: the question without its answer.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub question: String,
    pub options: Vec<String>,
    pub question_number: usize,
    pub total_questions: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug)]
pub enum Advance {
    Next(QuestionView),
    Completed,
}

struct QuizSession {
    questions: Vec<QuizQuestion>,
    current: usize,
    created_at: Instant,
}

impl QuizSession {
    fn view(&self) -> Option<QuestionView> {
        let question = self.questions.get(self.current)?;
        Some(QuestionView {
            question: question.question.clone(),
            options: question.options.clone(),
            question_number: self.current + 1,
            total_questions: self.questions.len(),
        })
    }
}

pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<String, QuizSession>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Store a generated quiz and return the session id with the first
    /// question view.
    pub fn create(&self, questions: Vec<QuizQuestion>) -> Result<(String, QuestionView)> {
        if questions.is_empty() {
            return Err(SmartlearnError::EmptyField { field: "quiz" });
        }

        let view = QuestionView {
            question: questions[0].question.clone(),
            options: questions[0].options.clone(),
            question_number: 1,
            total_questions: questions.len(),
        };
        let session = QuizSession {
            questions,
            current: 0,
            created_at: Instant::now(),
        };

        let id = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.lock().unwrap();
        Self::sweep(&mut sessions, self.ttl);
        sessions.insert(id.clone(), session);
        Ok((id, view))
    }

    /// Check an answer against the current question. Wrong answers get
    /// the stored hint, or a fixed review message when there is none.
    pub fn check_answer(&self, session_id: &str, answer: &str) -> Result<AnswerOutcome> {
        let mut sessions = self.sessions.lock().unwrap();
        Self::sweep(&mut sessions, self.ttl);
        let session =
            sessions
                .get(session_id)
                .ok_or_else(|| SmartlearnError::UnknownSession {
                    session_id: session_id.to_string(),
                })?;

        let question = session.questions.get(session.current).ok_or_else(|| {
            SmartlearnError::SessionCompleted {
                session_id: session_id.to_string(),
            }
        })?;

        let correct = answer == question.answer;
        let hint = (!correct).then(|| {
            question
                .hint
                .clone()
                .unwrap_or_else(|| DEFAULT_HINT.to_string())
        });
        Ok(AnswerOutcome { correct, hint })
    }

    /// Advance the cursor; returns the next question view or signals
    /// completion.
    pub fn advance(&self, session_id: &str) -> Result<Advance> {
        let mut sessions = self.sessions.lock().unwrap();
        Self::sweep(&mut sessions, self.ttl);
        let session =
            sessions
                .get_mut(session_id)
                .ok_or_else(|| SmartlearnError::UnknownSession {
                    session_id: session_id.to_string(),
                })?;

        session.current += 1;
        match session.view() {
            Some(view) => Ok(Advance::Next(view)),
            None => Ok(Advance::Completed),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().unwrap().is_empty()
    }

    fn sweep(sessions: &mut HashMap<String, QuizSession>, ttl: Duration) {
        sessions.retain(|_, s| s.created_at.elapsed() < ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, answer: &str, hint: Option<&str>) -> QuizQuestion {
        QuizQuestion {
            question: text.to_string(),
            options: vec![
                "A".to_string(),
                "B".to_string(),
                "C".to_string(),
                "D".to_string(),
            ],
            answer: answer.to_string(),
            hint: hint.map(str::to_string),
            explanation: None,
            difficulty: None,
        }
    }

    fn two_question_quiz() -> Vec<QuizQuestion> {
        vec![
            question("first?", "A", Some("starts the alphabet")),
            question("second?", "C", None),
        ]
    }

    #[test]
    fn create_returns_first_question_without_answer() {
        let store = SessionStore::default();
        let (id, view) = store.create(two_question_quiz()).unwrap();

        assert!(!id.is_empty());
        assert_eq!(view.question, "first?");
        assert_eq!(view.question_number, 1);
        assert_eq!(view.total_questions, 2);
    }

    #[test]
    fn correct_answer_has_no_hint() {
        let store = SessionStore::default();
        let (id, _) = store.create(two_question_quiz()).unwrap();

        let outcome = store.check_answer(&id, "A").unwrap();
        assert!(outcome.correct);
        assert!(outcome.hint.is_none());
    }

    #[test]
    fn wrong_answer_returns_stored_hint() {
        let store = SessionStore::default();
        let (id, _) = store.create(two_question_quiz()).unwrap();

        let outcome = store.check_answer(&id, "B").unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.hint.as_deref(), Some("starts the alphabet"));
    }

    #[test]
    fn wrong_answer_without_hint_falls_back_to_review_message() {
        let store = SessionStore::default();
        let (id, _) = store.create(two_question_quiz()).unwrap();
        store.advance(&id).unwrap();

        let outcome = store.check_answer(&id, "A").unwrap();
        assert_eq!(outcome.hint.as_deref(), Some(DEFAULT_HINT));
    }

    #[test]
    fn advance_walks_to_completion() {
        let store = SessionStore::default();
        let (id, _) = store.create(two_question_quiz()).unwrap();

        match store.advance(&id).unwrap() {
            Advance::Next(view) => {
                assert_eq!(view.question, "second?");
                assert_eq!(view.question_number, 2);
            }
            Advance::Completed => panic!("expected a second question"),
        }
        assert!(matches!(store.advance(&id).unwrap(), Advance::Completed));
    }

    #[test]
    fn answering_a_completed_session_is_an_error() {
        let store = SessionStore::default();
        let (id, _) = store.create(two_question_quiz()).unwrap();
        store.advance(&id).unwrap();
        store.advance(&id).unwrap();

        assert!(matches!(
            store.check_answer(&id, "A"),
            Err(SmartlearnError::SessionCompleted { .. })
        ));
    }

    #[test]
    fn unknown_session_is_an_error() {
        let store = SessionStore::default();
        assert!(matches!(
            store.check_answer("nope", "A"),
            Err(SmartlearnError::UnknownSession { .. })
        ));
    }

    #[test]
    fn expired_sessions_are_swept_on_access() {
        let store = SessionStore::new(Duration::ZERO);
        let (id, _) = store.create(two_question_quiz()).unwrap();

        assert!(matches!(
            store.check_answer(&id, "A"),
            Err(SmartlearnError::UnknownSession { .. })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn empty_quiz_is_rejected() {
        let store = SessionStore::default();
        assert!(matches!(
            store.create(Vec::new()),
            Err(SmartlearnError::EmptyField { field: "quiz" })
        ));
    }
}
