use crate::error::ImportError;
use crate::model::{ClassifiedFacts, NutritionRecord};
use crate::providers::{build_normalizer_prompt, LlmProvider};
use log::{debug, warn};
use serde_json::Value;

/// Ask the language model to turn the facts panel into a nutrient table.
///
/// Provider failures abort with [`ImportError::Unexpected`]; a reply that
/// is not a JSON object degrades to [`NutritionRecord::fallback`].
pub async fn normalize(
    provider: &dyn LlmProvider,
    classified: &ClassifiedFacts,
) -> Result<NutritionRecord, ImportError> {
    let prompt = build_normalizer_prompt(&classified.facts);

    let reply = provider
        .complete(&prompt)
        .await
        .map_err(|e| ImportError::Unexpected(e.to_string()))?;
    debug!("{} response: {}", provider.provider_name(), reply);

    Ok(parse_response(&reply))
}

/// Parse a model reply, falling back to the empty record on bad JSON
pub fn parse_response(reply: &str) -> NutritionRecord {
    match serde_json::from_str::<Value>(reply.trim()) {
        Ok(Value::Object(object)) => NutritionRecord::from_json(&object),
        Ok(other) => {
            warn!("Model reply is JSON but not an object ({}), using empty record", other);
            NutritionRecord::fallback()
        }
        Err(e) => {
            warn!("Model reply is not valid JSON ({}), using empty record", e);
            NutritionRecord::fallback()
        }
    }
}
