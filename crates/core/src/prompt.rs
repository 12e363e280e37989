//! Prompt composition for the generation endpoints and prompt enhancement.

use crate::error::CoreError;
use crate::styles::Style;

/// Longest prompt accepted from a caller, in characters.
pub const MAX_PROMPT_CHARS: usize = 2000;

/// Instruction given to the chat model when enhancing a prompt.
pub const ENHANCE_SYSTEM_PROMPT: &str = "You are a creative prompt engineer specializing in \
image generation. Your task is to enhance user prompts by:
1. Adding more descriptive details
2. Incorporating artistic elements (lighting, style, mood)
3. Improving composition and focus
4. Maintaining the original intent while making it more vivid
5. Do not exceed 40 words.

Respond only with the enhanced prompt, no explanations or additional text.";

/// Trim a caller prompt and reject it when empty or oversized.
///
/// `field` names the missing input in the error message.
pub fn require_prompt<'a>(prompt: Option<&'a str>, field: &str) -> Result<&'a str, CoreError> {
    let prompt = prompt.map(str::trim).unwrap_or_default();
    if prompt.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    if prompt.chars().count() > MAX_PROMPT_CHARS {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {MAX_PROMPT_CHARS} characters"
        )));
    }
    Ok(prompt)
}

/// Append the prompt fragments of the selected styles: `"<prompt>, <a>, <b>"`.
pub fn with_style_fragments(prompt: &str, styles: &[&Style]) -> String {
    if styles.is_empty() {
        return prompt.to_string();
    }
    let fragments = styles
        .iter()
        .map(|s| s.prompt)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{prompt}, {fragments}")
}

/// Join a prompt with free-text style names: `[prompt, ...styles].join(", ")`.
///
/// Empty entries (including an absent prompt) are skipped.
pub fn join_with_styles(prompt: &str, styles: &[String]) -> String {
    std::iter::once(prompt)
        .chain(styles.iter().map(String::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Wrap a style name in the furniture-transformation instruction.
pub fn furniture_prompt(style: &str) -> String {
    format!(
        "Transform this room into {style} style, maintain the same layout and furniture \
         placement, make sure the style is clearly visible and noticeable."
    )
}

/// User message sent alongside [`ENHANCE_SYSTEM_PROMPT`].
pub fn enhancement_request(prompt: &str) -> String {
    format!("Enhance this image generation prompt: \"{prompt}\"")
}
