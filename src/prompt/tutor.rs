/// Fixed system prompt shared by every tutor surface (CLI and HTTP API).
pub const TUTOR_SYSTEM_PROMPT: &str = "\
You are an expert tutor in technology and programming. \n\
Your role is to provide clear and structured explanations in Markdown format about:\n\
- Programming concepts and best practices.\n\
- Code snippets provided by the user, including their functionality and possible optimizations.\n\
- General technology topics, including AI, software development, networking, hardware, and emerging technologies.\n\
- Comparisons between technologies, frameworks, or programming paradigms.\n\
- Recommendations on tools, best practices, and industry trends.\n\
Your responses must be **structured, educational, and formatted in Markdown**. \n\
Use headings, bullet points, code blocks, and bold/italic text where appropriate.";

/// Render the user-facing half of a tutor exchange. Code snippets are
/// wrapped in a fence tagged with their language so the model sees them
/// verbatim.
pub fn user_prompt_for(query: &str, is_code: bool, language: &str) -> String {
    if is_code {
        format!(
            "I will provide you with a {language} code snippet. Explain it in detail in \
             **Markdown format**, including what it does and why it works.\n\n\
             **Code:**\n```{language}\n{query}\n```\n\n\
             Please provide a structured breakdown of its functionality and suggest any \
             improvements if applicable.",
            language = language,
            query = query,
        )
    } else {
        format!(
            "**Question:** {query}\n\n\
             Please respond in **Markdown format**, structured with headings, bullet points, \
             and examples where appropriate.",
            query = query,
        )
    }
}

/// Prompt for the optional second pass that translates a finished answer.
pub fn translation_prompt(markdown: &str, target_language: &str) -> String {
    format!(
        "Translate the following Markdown document into {target}. Preserve all Markdown \
         structure, code blocks, and technical terms exactly as they are; translate only \
         the prose.\n\n{markdown}",
        target = target_language,
        markdown = markdown,
    )
}
