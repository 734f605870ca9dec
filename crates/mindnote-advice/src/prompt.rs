//! Prompt construction for the generation loop.

use std::fmt::Write;

/// Inputs for one generation prompt.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    /// Diary entry text.
    pub diary_text: &'a str,
    /// Predicted category label.
    pub label: &'a str,
    /// Reference suggestions, in stored order.
    pub suggestions: &'a [String],
    /// Similarity the response must reach.
    pub threshold: f32,
    /// Best similarity reached so far in this call.
    pub best_score: f32,
    /// Response that reached `best_score`.
    pub best_response: &'a str,
}

/// Build the system prompt for one attempt.
///
/// Each attempt carries the current best score and response so the model
/// is asked to improve on earlier rounds rather than start over.
pub fn build_prompt(ctx: &PromptContext<'_>) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a helpful and empathetic therapist. Based on the following diary content \
         and mental health prediction, provide advice tailored to the writer's current state \
         of mind.\n\n",
    );

    let _ = writeln!(prompt, "Diary content: {}", ctx.diary_text);
    let _ = writeln!(prompt, "Mental health prediction: {}", ctx.label);

    prompt.push_str("\nReference suggestions for this prediction:\n");
    for (i, suggestion) in ctx.suggestions.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {}", i + 1, suggestion);
    }

    prompt.push_str(
        "\nGuidelines:\n\
         - Base your advice on the reference suggestions above; you do not need to use all of them.\n\
         - Match the language and tone of the reference suggestions closely.\n\
         - Keep the advice relevant to the diary content and the prediction.\n\
         - Reply with the advice only, in a few sentences.\n",
    );

    let _ = writeln!(
        prompt,
        "- Your response is scored by semantic similarity to the references and must reach at least {:.0}%.",
        ctx.threshold * 100.0
    );
    let _ = writeln!(
        prompt,
        "- The best similarity score so far is {:.2}. Write a response that scores higher than this.",
        ctx.best_score
    );
    let _ = writeln!(prompt, "- Best response so far: \"{}\"", ctx.best_response);

    prompt
}
