use crate::types::QuizQuestion;

/// Format a generated quiz as human-readable markdown, answers and
/// hints included (CLI output, not the learner-facing view).
pub fn format_quiz_readable(questions: &[QuizQuestion]) -> String {
    let mut output = String::new();

    output.push_str(&format!("# Quiz ({} questions)\n\n", questions.len()));

    for (i, q) in questions.iter().enumerate() {
        output.push_str(&format!("## Q{}. {}\n\n", i + 1, q.question));

        for option in &q.options {
            output.push_str(&format!("• {}\n", option));
        }
        output.push('\n');

        output.push_str(&format!("**Answer:** {}\n", q.answer));
        if let Some(hint) = &q.hint {
            output.push_str(&format!("**Hint:** {}\n", hint));
        }
        if let Some(explanation) = &q.explanation {
            output.push_str(&format!("**Explanation:** {}\n", explanation));
        }
        output.push('\n');
    }

    output
}
