//! Prompt assembly for the generative model.

use adclip_models::GenerationRequest;

/// Which part of the final advertisement a model call produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRole {
    Full,
    FirstHalf,
    SecondHalf,
}

/// Build the generation prompt for one segment.
pub fn build_prompt(request: &GenerationRequest, role: SegmentRole) -> String {
    let product = &request.product;

    let benefits = product
        .benefits
        .iter()
        .map(|b| format!("- {}", b))
        .collect::<Vec<_>>()
        .join("\n");

    let scene = match &request.scene_context {
        Some(context) => format!("\nSCENE CONTEXT: {}\n", context),
        None => String::new(),
    };

    let continuity = match role {
        SegmentRole::Full => {
            "Start exactly on the provided first frame and end exactly on the provided last frame."
        }
        SegmentRole::FirstHalf => {
            "This is the first half of a longer advertisement. Start exactly on the provided \
             first frame and end exactly on the provided last frame; the second half continues \
             from that frame."
        }
        SegmentRole::SecondHalf => {
            "This is the second half of a longer advertisement. Continue seamlessly from the \
             provided first frame and end exactly on the provided last frame."
        }
    };

    format!(
        r#"Create a short product advertisement video.

PRODUCT: {brand} {product}
TAGLINE: {tagline}
VISUAL: {visual}
ACTION: {action}

KEY BENEFITS:
{benefits}

Use a background gradient between {color_a} and {color_b} for any graphic overlays.
Visual style: {style}.
{scene}
Additional instructions:
- {continuity}
- Keep the product clearly visible and recognizable throughout.
- No on-screen text other than the tagline.
"#,
        brand = product.brand,
        product = product.product,
        tagline = product.tagline,
        visual = product.visual_description,
        action = product.action_script,
        benefits = benefits,
        color_a = product.gradient_colors.first().map(String::as_str).unwrap_or("#000000"),
        color_b = product.gradient_colors.get(1).map(String::as_str).unwrap_or("#ffffff"),
        style = request.style.prompt_fragment(),
        scene = scene,
        continuity = continuity,
    )
}
