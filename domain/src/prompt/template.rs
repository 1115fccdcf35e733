//! Prompt templates for multiple-choice evaluation

use crate::answer::letter::AnswerLetter;
use crate::core::question::Question;

/// Templates for the system instruction and the per-question user prompt
pub struct PromptTemplate;

impl PromptTemplate {
    /// System instruction constraining the model to a single letter
    pub fn answer_system() -> &'static str {
        "Only respond with a single letter (A, B, C, or D) that represents the option that is most correct."
    }

    /// User prompt embedding the question and its four options
    pub fn question_prompt(question: &Question) -> String {
        Self::format_question(&question.prompt_text, &question.options)
    }

    /// Same as [`question_prompt`](Self::question_prompt) for raw parts
    pub fn format_question(prompt_text: &str, options: &[String; 4]) -> String {
        let mut prompt = format!("Question: {}", prompt_text.trim());
        for letter in AnswerLetter::ALL {
            prompt.push_str(&format!("\n{}. {}", letter, options[letter.index()].trim()));
        }
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> [String; 4] {
        [
            "Firewall".to_string(),
            "Antivirus".to_string(),
            "Honeypot".to_string(),
            "Proxy".to_string(),
        ]
    }

    #[test]
    fn test_question_prompt_layout() {
        let prompt = PromptTemplate::format_question("Which one lures attackers?", &options());
        assert_eq!(
            prompt,
            "Question: Which one lures attackers?\nA. Firewall\nB. Antivirus\nC. Honeypot\nD. Proxy"
        );
    }

    #[test]
    fn test_prompt_trims_fields() {
        let mut opts = options();
        opts[0] = "  Firewall \n".to_string();
        let prompt = PromptTemplate::format_question("  Which?  ", &opts);
        assert!(prompt.starts_with("Question: Which?\nA. Firewall\n"));
    }

    #[test]
    fn test_system_mentions_all_letters() {
        let system = PromptTemplate::answer_system();
        for letter in AnswerLetter::ALL {
            assert!(system.contains(letter.as_str()));
        }
    }
}
