use gateway::models::chat_completion::{
    ChatCompletion, ChatCompletionRequest, FunctionDefinition, Message, Tool,
    ToolChoice,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::job::response::CreativeSuggestion;
use crate::response::{ApiResponse, IntoApiResponse};
use crate::ApiError;

const SUGGESTION_COUNT: usize = 3;
const SUGGEST_PROMPTS: &str = "suggest_prompts";

const SYSTEM_PROMPT: &str = r#"You are an elite creative director and advertising strategist with expertise in crafting campaigns for world-class publications like WSJ, NYT, Vogue, and Hypebeast.

Your mission: Transform user prompts into premium, editorial-quality advertisement concepts that rival the sophistication of Hollywood productions and luxury brand campaigns.

CREATIVE EXCELLENCE STANDARDS:
- Visual Storytelling: Create narratives that evoke emotion and capture attention instantly
- Cinematic Composition: Think in terms of lighting, depth, perspective, and dramatic framing
- Editorial Polish: Every element should feel meticulously art-directed
- Cultural Resonance: Tap into current trends while maintaining timeless appeal
- Premium Aesthetics: Luxury materials, sophisticated color palettes, refined typography
- Authentic Emotion: Real moments over staged perfection
{brand_context}

QUALITY BENCHMARKS:
- Hollywood Production Quality: Cinematic lighting, dramatic angles, perfect timing
- Editorial Standards: WSJ/NYT level sophistication, clean layouts, purposeful negative space
- Fashion Magazine Excellence: Vogue-level styling, aspirational yet authentic
- Contemporary Edge: Hypebeast/Bazaar innovative approaches, bold creative choices

Return 3 refined variations optimized for different creative approaches (Cinematic Editorial, Bold Contemporary, Sophisticated Luxury)."#;

#[derive(Deserialize)]
struct SuggestPromptsArguments {
    suggestions: Vec<CreativeSuggestion>,
}

fn system_prompt(app_role: Option<&str>) -> String {
    let brand_context = app_role
        .map(|brand| {
            format!(
                "\n\nIMPORTANT - Brand/App Context: {}. ALL suggestions MUST \
                 align with and reflect this brand identity and style. \
                 Ensure the visual style, tone, and messaging are consistent \
                 with this brand context.",
                brand
            )
        })
        .unwrap_or_default();

    SYSTEM_PROMPT.replace("{brand_context}", &brand_context)
}

fn suggest_prompts_tool() -> Tool {
    Tool::Function {
        function: FunctionDefinition {
            name: SUGGEST_PROMPTS.to_string(),
            description: "Return 3 refined advertisement prompt variations"
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "suggestions": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "title": {
                                    "type": "string",
                                    "description": "Style name (e.g., 'Modern & Minimalist')"
                                },
                                "prompt": {
                                    "type": "string",
                                    "description": "Refined advertisement description"
                                },
                                "description": {
                                    "type": "string",
                                    "description": "Brief explanation of the style"
                                }
                            },
                            "required": ["title", "prompt", "description"],
                            "additionalProperties": false
                        },
                        "minItems": SUGGESTION_COUNT,
                        "maxItems": SUGGESTION_COUNT
                    }
                },
                "required": ["suggestions"],
                "additionalProperties": false
            }),
        },
    }
}

/// Turns a brief into exactly three creative directions through a forced
/// function call.
pub(crate) async fn refine<C: ChatCompletion + Sync>(
    client: &C,
    model: &str,
    prompt: &str,
    app_role: Option<&str>,
) -> ApiResponse<Vec<CreativeSuggestion>> {
    let request = ChatCompletionRequest {
        model: model.to_string(),
        messages: vec![
            Message::system(system_prompt(app_role)),
            Message::user(prompt),
        ],
        tools: Some(vec![suggest_prompts_tool()]),
        tool_choice: Some(ToolChoice::function(SUGGEST_PROMPTS)),
        ..Default::default()
    };

    let response = client
        .chat_completion(request)
        .await
        .into_response("AI Gateway error")?;

    info!(task = "suggestions received");

    let tool_call = response.first_tool_call().ok_or_else(|| {
        ApiError::ServerError("No tool call in response".to_string())
    })?;

    if tool_call.function.name != SUGGEST_PROMPTS {
        return Err(ApiError::ServerError(format!(
            "Unexpected tool call in response: {}",
            tool_call.function.name
        )));
    }

    let arguments: SuggestPromptsArguments =
        serde_json::from_str(&tool_call.function.arguments).map_err(|e| {
            ApiError::ServerError(format!(
                "Malformed suggestions in response: {}",
                e
            ))
        })?;

    validate(arguments.suggestions)
}

fn validate(
    suggestions: Vec<CreativeSuggestion>,
) -> ApiResponse<Vec<CreativeSuggestion>> {
    if suggestions.len() != SUGGESTION_COUNT {
        return Err(ApiError::ServerError(format!(
            "Expected {} suggestions in response, received {}",
            SUGGESTION_COUNT,
            suggestions.len()
        )));
    }

    let incomplete = suggestions.iter().any(|s| {
        s.title.trim().is_empty()
            || s.prompt.trim().is_empty()
            || s.description.trim().is_empty()
    });
    if incomplete {
        return Err(ApiError::ServerError(
            "Incomplete suggestion in response".to_string(),
        ));
    }

    Ok(suggestions)
}
