//! Prompt templates per transform mode.

use hexakin_core::editing::EditingParameters;
use hexakin_core::transform::{TransformMode, TransformRequest};
use minijinja::{Environment, context};

use crate::chat_backend::ChatCompletion;

const EDIT_TEMPLATE: &str = r#"You are an expert writing editor tasked with improving the user's writing.

🎯 Purpose: {{ purpose }}
🖋️ Style: {{ style }}
📝 Editor Type: {{ editor_type }}

--- BEGIN TEXT ---
{{ text }}
--- END TEXT ---

Please return only the improved version of the text. Keep formatting and tone unless the instruction says otherwise."#;

const REFINE_SELECTION_TEMPLATE: &str = r#"You're a helpful editor. Refine only the selected text below based on the instruction.
Do not rephrase the full context, just rewrite the selected section. Return only the updated selection, nothing else.

Instruction: {{ instruction }}

Context:
{{ text }}

Selected Text:
"{{ selection }}"

Improved Selection:"#;

const REFINE_WHOLE_TEMPLATE: &str = r#"You're a helpful editor. Rewrite the text below based on the instruction.
Return only the rewritten text, nothing else.

Instruction: {{ instruction }}

Text:
{{ text }}"#;

const CRITIQUE_TEMPLATE: &str = r#"You are a literary critic. Provide constructive, professional feedback on the following text.

First, identify the biggest weakness or area for improvement.
Second, give 2–3 clear, actionable suggestions for improving that part.
Avoid general advice; be specific and concise.

Editing Purpose: {{ purpose }}

TEXT:
{{ text }}

Respond only with your critique."#;

const ECHO_TEMPLATE: &str = r#"You are a literary pattern analyst.

Analyze the following text for ECHOES: repeated phrases, motifs, or metaphors.

Return a list of:
- ✳️ Repeated phrases (2+ words)
- 🔁 How many times they appear
- 📌 A short example usage (if possible)

TEXT TO ANALYZE:
"""
{{ text }}
"""

Return only the findings in structured markdown like:

## Echoes Found

- "the weight of it" (3 times), e.g. “He could feel the weight of it pressing down.”
- "turned away" (4 times), e.g. “She turned away from the light.”

Only include meaningful patterns. Skip common function words or non-pattern repetition."#;

const TONE_TEMPLATE: &str = r#"Analyze the following text for overall tone and formality level.

Return:
- 🎭 Tone: (e.g. optimistic, sarcastic, professional, moody, passive-aggressive)
- 🧑‍⚖️ Formality: (e.g. formal, casual, neutral)
- 💡 Suggestions: {% if target_tone %}How to shift the tone towards "{{ target_tone }}" while keeping the content.{% else %}If appropriate, suggest ways to shift the tone or improve consistency.{% endif %}

TEXT:
"""
{{ text }}
"""

Use clear and simple language in your response."#;

const CHAT_TEMPLATE: &str = r#"{% if insight %}Based on the following editorial insight, respond to the user's request.

INSIGHT:
{{ insight }}

USER REQUEST:
{{ message }}{% else %}{{ message }}{% endif %}"#;

const CHAT_SYSTEM_PROMPT: &str = "You are an editorial assistant helping writers brainstorm, plan, and improve their text. Be helpful, creative, and supportive.";

/// Sampling temperature per mode.
pub fn temperature(mode: TransformMode) -> f32 {
    match mode {
        TransformMode::Edit | TransformMode::Refine | TransformMode::Chat => 0.7,
        TransformMode::Critique | TransformMode::Echo => 0.5,
        TransformMode::Tone => 0.4,
    }
}

/// Text returned when the model answers without content.
pub fn fallback_text(mode: TransformMode) -> &'static str {
    match mode {
        TransformMode::Edit => "No response from model.",
        TransformMode::Refine => "No response.",
        TransformMode::Critique => "No critique generated.",
        TransformMode::Echo => "No echoes found.",
        TransformMode::Tone => "No analysis returned.",
        TransformMode::Chat => "No response generated.",
    }
}

/// Compiled prompt templates.
pub struct PromptLibrary {
    env: Environment<'static>,
}

impl PromptLibrary {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("edit", EDIT_TEMPLATE)?;
        env.add_template("refine_selection", REFINE_SELECTION_TEMPLATE)?;
        env.add_template("refine_whole", REFINE_WHOLE_TEMPLATE)?;
        env.add_template("critique", CRITIQUE_TEMPLATE)?;
        env.add_template("echo", ECHO_TEMPLATE)?;
        env.add_template("tone", TONE_TEMPLATE)?;
        env.add_template("chat", CHAT_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Builds the completion for a validated request.
    pub fn render(&self, request: &TransformRequest) -> Result<ChatCompletion, minijinja::Error> {
        let parameters = request.parameters.unwrap_or_default();
        let text = request.input_text.as_str();

        let (name, ctx) = match request.mode {
            TransformMode::Edit => ("edit", edit_context(text, parameters)),
            TransformMode::Refine => match request.scoped_selection() {
                Some(selection) => (
                    "refine_selection",
                    context! {
                        instruction => request.effective_instruction(),
                        text => text,
                        selection => selection,
                    },
                ),
                None => (
                    "refine_whole",
                    context! {
                        instruction => request.effective_instruction(),
                        text => text,
                    },
                ),
            },
            TransformMode::Critique => (
                "critique",
                context! {
                    purpose => parameters.purpose.to_string(),
                    text => text,
                },
            ),
            TransformMode::Echo => ("echo", context! { text => text }),
            TransformMode::Tone => (
                "tone",
                context! {
                    target_tone => request.target_tone.map(|tone| tone.to_string()),
                    text => text,
                },
            ),
            TransformMode::Chat => (
                "chat",
                context! {
                    insight => request.context.as_deref().filter(|c| !c.trim().is_empty()),
                    message => request.message.as_deref().unwrap_or_default(),
                },
            ),
        };

        let user = self.env.get_template(name)?.render(ctx)?;
        let system = (request.mode == TransformMode::Chat).then(|| CHAT_SYSTEM_PROMPT.to_string());

        Ok(ChatCompletion {
            system,
            user,
            temperature: temperature(request.mode),
        })
    }
}

fn edit_context(text: &str, parameters: EditingParameters) -> minijinja::Value {
    context! {
        purpose => parameters.purpose.to_string(),
        style => parameters.style.to_string(),
        editor_type => parameters.editor_type.to_string(),
        text => text,
    }
}
