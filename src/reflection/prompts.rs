//! Prompt text for the description and reflection calls.

/// First-person prompt asking the model to describe reading `passage`.
/// The passage sits inside triple quotes so it cannot blend into the instructions.
pub fn description_prompt(passage: &str) -> String {
    format!(
        "You are perceiving this text passage for the first time.\n\
         Describe what it's like to read it.\n\
         \n\
         TEXT PASSAGE:\n\
         \"\"\"\n\
         {passage}\n\
         \"\"\""
    )
}

/// Prompt naming the uncertain tokens back to the model.
pub fn reflection_prompt(tokens: &str, passage: &str) -> String {
    format!(
        "\nYou used some low-confidence tokens: \"{tokens}\".\n\
         Explain what made these details uncertain or ambiguous,\n\
         and reflect on your process of interpretation.\n\
         \n\
         ORIGINAL TEXT PASSAGE:\n\
         {passage}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_prompt_delimits_the_passage() {
        let prompt = description_prompt("The fog rolled in.");
        assert!(prompt.starts_with("You are perceiving this text passage for the first time.\n"));
        assert!(prompt.ends_with("TEXT PASSAGE:\n\"\"\"\nThe fog rolled in.\n\"\"\""));
    }

    #[test]
    fn reflection_prompt_names_tokens_and_repeats_passage() {
        let prompt = reflection_prompt("fog rolled", "The fog rolled in.");
        assert!(prompt.contains("You used some low-confidence tokens: \"fog rolled\"."));
        assert!(prompt.contains("uncertain or ambiguous"));
        assert!(prompt.ends_with("ORIGINAL TEXT PASSAGE:\nThe fog rolled in.\n"));
    }
}
