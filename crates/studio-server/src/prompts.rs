//! Instruction templates sent to the model.

pub fn companion_prompt(prompt: &str, context: &str) -> String {
    format!(
        "Conversation Memory:\n{context}\n\n\
         User Prompt:\n{prompt}\n\n\
         Instructions:\n\
         1. Use the entire conversation memory to recall facts, names, past questions, and previous answers.\n\
         2. Always maintain consistency with the memory provided.\n\
         3. If the user asks about something already in memory, use that instead of guessing.\n\
         4. First, answer the user's question thoroughly.\n\
         5. Then, on a new line, provide a 25-word summary of this Q&A, prefixed with 'SUMMARY:'.\n\
         6. Ensure the summary captures key details from both the user's request and your answer."
    )
}

pub fn essay_prompt(topic: &str, length: u32) -> String {
    format!(
        "Write an engaging and informative essay about {topic} in approximately {length} words. \
         Use clear, simple language so that readers of all ages can enjoy and understand it. \
         Organize the essay with a brief introduction, a well-structured body, and a thoughtful conclusion. \
         Make the content interesting and easy to read."
    )
}

pub fn poem_prompt(topic: &str, length: u32) -> String {
    format!(
        "Write a creative and heartwarming poem about {topic} in approximately {length} words. \
         Use simple, relatable language and imagery that resonates with Indian culture and everyday life. \
         Ensure the poem has a pleasant rhyme scheme and is enjoyable to read for all ages. \
         Make the poem emotionally engaging and easy to understand."
    )
}

pub fn image_prompts_request(prompt: &str, num_images: u32) -> String {
    format!(
        "Generate {num_images} distinct image generation prompts for Pollinations AI based on: '{prompt}'. \
         Return them as a numbered list."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn companion_prompt_embeds_memory_and_summary_instruction() {
        let prompt = companion_prompt("What is my name?", "User said their name is Asha.");
        assert!(prompt.starts_with("Conversation Memory:\nUser said their name is Asha.\n\n"));
        assert!(prompt.contains("User Prompt:\nWhat is my name?\n\n"));
        assert!(prompt.contains("prefixed with 'SUMMARY:'"));
    }

    #[test]
    fn length_and_topic_are_embedded() {
        assert!(essay_prompt("monsoon", 150).contains("about monsoon in approximately 150 words."));
        assert!(poem_prompt("kites", 30).contains("about kites in approximately 30 words."));
        assert!(image_prompts_request("a cat", 3)
            .starts_with("Generate 3 distinct image generation prompts for Pollinations AI based on: 'a cat'."));
    }
}
