// crates/medivault-server/src/proxy/prompt.rs
// System prompt construction: shared prefix, role instructions, retrieved context

use medivault_types::{Role, SearchResult};
use std::fmt::Write;

/// Shared prefix for every generate call
const STATIC_PREFIX: &str = r#"You are MediVault AI, an assistant answering questions over encrypted medical records.
Core principles:
- Answer only from the retrieved records and general clinical knowledge
- Say plainly when the records do not contain the answer
- Never invent patient identifiers, dates or results
- Keep protected health information to the minimum the question needs
"#;

const NO_CONTEXT: &str = "No matching records were retrieved for this question.";

/// Role-specific instructions
fn role_instructions(role: Role) -> &'static str {
    match role {
        Role::Doctor => {
            "You are assisting a physician. Use precise clinical terminology, cover \
             differential considerations, current treatment and relevant lab values."
        }
        Role::Clinician => {
            "You are assisting a nurse or allied clinician. Focus on care plans, \
             medication administration, monitoring and escalation criteria."
        }
        Role::Admin => {
            "You are assisting a health information administrator. Focus on record \
             counts, access patterns and compliance. Do not reveal clinical detail \
             about individual patients."
        }
        Role::Researcher => {
            "You are assisting a clinical researcher. Answer with de-identified, \
             aggregate findings only and note cohort sizes where available."
        }
    }
}

/// Build the system prompt for `role`, embedding the search context
pub fn system_prompt(role: Role, context: &[SearchResult]) -> String {
    let mut prompt = STATIC_PREFIX.to_string();
    prompt.push('\n');
    prompt.push_str(role_instructions(role));
    prompt.push_str("\n\nRetrieved records (decrypted for this request):\n");

    if context.is_empty() {
        prompt.push_str(NO_CONTEXT);
    } else {
        for (i, record) in context.iter().enumerate() {
            // writing to a String cannot fail
            let _ = writeln!(
                prompt,
                "[{}] {} (relevance {:.2}): {}",
                i + 1,
                record.id,
                record.score,
                record.content
            );
        }
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, content: &str) -> SearchResult {
        SearchResult {
            id: id.to_string(),
            score: 0.91,
            content: content.to_string(),
            metadata: serde_json::Value::Null,
        }
    }

    #[test]
    fn test_prompt_embeds_context() {
        let prompt = system_prompt(
            Role::Doctor,
            &[record("rec-1", "HbA1c 7.2%"), record("rec-2", "Metformin 1000mg")],
        );
        assert!(prompt.starts_with("You are MediVault AI"));
        assert!(prompt.contains("assisting a physician"));
        assert!(prompt.contains("[1] rec-1 (relevance 0.91): HbA1c 7.2%"));
        assert!(prompt.contains("[2] rec-2"));
    }

    #[test]
    fn test_prompt_without_context() {
        let prompt = system_prompt(Role::Researcher, &[]);
        assert!(prompt.contains(NO_CONTEXT));
        assert!(prompt.contains("de-identified"));
    }

    #[test]
    fn test_roles_differ() {
        let prompts: Vec<String> = Role::ALL.iter().map(|r| system_prompt(*r, &[])).collect();
        for (i, a) in prompts.iter().enumerate() {
            for b in &prompts[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
