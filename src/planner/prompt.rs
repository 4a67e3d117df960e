//! Weekly plan prompt construction
//!
//! Formats the generation request from the user's templates and computed
//! capacity. Deterministic given identical inputs, so a plan can be
//! regenerated and diffed.

use std::fmt::Write;

use crate::domain::UserProfile;

/// Build the plan request text sent to the generator.
pub fn build_plan_request(profile: &UserProfile, weekly_capacity: u32) -> String {
    let mut prompt = String::new();

    let _ = writeln!(
        prompt,
        "You are a personal habit coach for {} (member since {}).",
        profile.username, profile.join_date
    );
    let _ = writeln!(
        prompt,
        "Generate exactly {} tasks for the coming week, derived from these task areas:",
        weekly_capacity
    );
    prompt.push('\n');

    for template in &profile.task_templates {
        let _ = writeln!(prompt, "- Title: {} | Area: {}", template.title, template.area);
        if !template.description.is_empty() {
            let _ = writeln!(prompt, "  Description: {}", template.description);
        }
        if !template.fields.is_empty() {
            let _ = writeln!(prompt, "  Fields: {}", template.fields.join(", "));
        }
    }

    prompt.push('\n');
    let _ = writeln!(prompt, "Rules:");
    let _ = writeln!(prompt, "- Produce exactly {} items.", weekly_capacity);
    let _ = writeln!(prompt, "- Every task must belong to one of the areas listed above.");
    let _ = writeln!(
        prompt,
        "- Each item must include: Title, Area, a short Description, and an estimated time in minutes."
    );
    let _ = writeln!(
        prompt,
        "- Return ONLY a numbered list in the form 'N. Title: ...' with the remaining fields on following lines. No other prose."
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TaskTemplate, UserProfile};

    fn profile() -> UserProfile {
        UserProfile {
            username: "ada".to_string(),
            join_date: "2025-01-15".to_string(),
            task_templates: vec![
                TaskTemplate {
                    title: "Morning run".to_string(),
                    area: "Fitness".to_string(),
                    description: "Short run before work".to_string(),
                    fields: vec!["distance".to_string(), "duration".to_string()],
                },
                TaskTemplate {
                    title: "Read".to_string(),
                    area: "Learning".to_string(),
                    description: String::new(),
                    fields: vec![],
                },
            ],
            activity_history: vec![],
        }
    }

    #[test]
    fn test_prompt_embeds_identity_and_capacity() {
        let prompt = build_plan_request(&profile(), 21);

        assert!(prompt.contains("ada"));
        assert!(prompt.contains("2025-01-15"));
        assert!(prompt.contains("exactly 21 tasks"));
        assert!(prompt.contains("Produce exactly 21 items."));
    }

    #[test]
    fn test_prompt_serializes_templates() {
        let prompt = build_plan_request(&profile(), 21);

        assert!(prompt.contains("- Title: Morning run | Area: Fitness"));
        assert!(prompt.contains("Description: Short run before work"));
        assert!(prompt.contains("Fields: distance, duration"));
        // Empty description/fields are omitted, not rendered blank
        assert!(prompt.contains("- Title: Read | Area: Learning\n\n"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let a = build_plan_request(&profile(), 28);
        let b = build_plan_request(&profile(), 28);
        assert_eq!(a, b);
    }
}
