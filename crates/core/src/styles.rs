//! Built-in style catalog used to decorate text-to-image prompts.

use serde::Serialize;

use crate::error::CoreError;

/// A named style with the prompt fragment appended when it is selected.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Style {
    pub key: &'static str,
    pub name: &'static str,
    pub prompt: &'static str,
}

pub const STYLES: &[Style] = &[
    Style {
        key: "realistic",
        name: "Realistic",
        prompt: "photorealistic, highly detailed, professional photography, 8k resolution, sharp focus",
    },
    Style {
        key: "anime",
        name: "Anime",
        prompt: "anime style, Studio Ghibli, vibrant colors, cel shading, detailed anime illustration",
    },
    Style {
        key: "medieval",
        name: "Medieval",
        prompt: "medieval fantasy art, oil painting style, detailed fantasy illustration, dramatic lighting",
    },
    Style {
        key: "cyberpunk",
        name: "Cyberpunk",
        prompt: "cyberpunk style, neon lights, futuristic, high tech, digital art, sci-fi concept art",
    },
    Style {
        key: "watercolor",
        name: "Watercolor",
        prompt: "watercolor painting, artistic, soft colors, flowing textures, traditional art style",
    },
    Style {
        key: "cartoon",
        name: "Cartoon",
        prompt: "cartoon style, bold colors, clean lines, stylized illustration, character design",
    },
    Style {
        key: "retro",
        name: "Retro",
        prompt: "retro style, vintage aesthetics, 80s design, synthwave, nostalgic colors",
    },
    Style {
        key: "minimalist",
        name: "Minimalist",
        prompt: "minimalist style, clean design, simple shapes, limited color palette, modern art",
    },
    Style {
        key: "pixel",
        name: "Pixel Art",
        prompt: "pixel art style, 16-bit graphics, retro game aesthetic, pixelated details, video game art",
    },
    Style {
        key: "steampunk",
        name: "Steampunk",
        prompt: "steampunk aesthetic, victorian sci-fi, brass and copper tones, mechanical details, steam-powered machinery",
    },
    Style {
        key: "abstract",
        name: "Abstract",
        prompt: "abstract art, non-representational, geometric shapes, bold composition, modern abstract expressionism",
    },
];

/// Look up a style by key (case-insensitive).
pub fn find_style(key: &str) -> Option<&'static Style> {
    let key = key.trim();
    STYLES.iter().find(|s| s.key.eq_ignore_ascii_case(key))
}

/// Resolve a list of style keys, rejecting any unknown key.
///
/// Duplicate keys are collapsed; the caller's order is kept.
pub fn resolve_styles(keys: &[String]) -> Result<Vec<&'static Style>, CoreError> {
    let mut resolved: Vec<&'static Style> = Vec::with_capacity(keys.len());
    for key in keys {
        let style = find_style(key)
            .ok_or_else(|| CoreError::Validation(format!("Unknown style '{key}'")))?;
        if !resolved.iter().any(|s| s.key == style.key) {
            resolved.push(style);
        }
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_keys_are_unique() {
        for (i, a) in STYLES.iter().enumerate() {
            for b in &STYLES[i + 1..] {
                assert_ne!(a.key, b.key);
            }
        }
        assert_eq!(STYLES.len(), 11);
    }

    #[test]
    fn find_is_case_insensitive() {
        assert_eq!(find_style("Anime").unwrap().name, "Anime");
        assert!(find_style("baroque").is_none());
    }

    #[test]
    fn resolve_dedupes_and_keeps_order() {
        let keys = vec!["retro".to_string(), "pixel".to_string(), "RETRO".to_string()];
        let styles = resolve_styles(&keys).unwrap();
        let names: Vec<_> = styles.iter().map(|s| s.key).collect();
        assert_eq!(names, ["retro", "pixel"]);
    }

    #[test]
    fn resolve_rejects_unknown() {
        let keys = vec!["anime".to_string(), "vaporwave".to_string()];
        assert!(resolve_styles(&keys).is_err());
    }
}
