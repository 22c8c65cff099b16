use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Text used whenever no ingredients statement could be found
pub const NO_INGREDIENTS_FOUND: &str = "No other ingredients found.";

/// JSON key holding the nutrient name -> amount object
pub const NUTRITIONAL_INFO_KEY: &str = "Nutritional Info";

/// JSON key holding the ingredients statement
pub const OTHER_INGREDIENTS_KEY: &str = "Other Ingredients";

/// A single typed unit of text returned by document analysis
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    /// Block type tag, e.g. `PAGE`, `LINE`, `WORD`, `TABLE`
    pub block_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl Block {
    pub fn line(text: impl Into<String>) -> Self {
        Block {
            block_type: "LINE".to_string(),
            text: Some(text.into()),
            ..Default::default()
        }
    }
}

/// Result of analysing one document, blocks in reading order
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct AnalyzeDocumentOutput {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// OCR lines split into the facts panel and the ingredients statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedFacts {
    /// Facts panel lines, in label order
    pub facts: Vec<String>,
    /// Ingredients text joined into one string
    pub ingredients: String,
}

/// Nutrient data normalized by the language model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NutritionRecord {
    /// Nutrient name -> amount, in the order the model emitted them
    pub nutrients: Vec<(String, String)>,
    pub other_ingredients: String,
}

impl NutritionRecord {
    /// The empty-but-valid record used when the model reply is unusable
    pub fn fallback() -> Self {
        NutritionRecord {
            nutrients: Vec::new(),
            other_ingredients: NO_INGREDIENTS_FOUND.to_string(),
        }
    }

    /// Build a record from a parsed model reply.
    ///
    /// Missing or mistyped keys fall back to an empty mapping and
    /// [`NO_INGREDIENTS_FOUND`] respectively.
    pub fn from_json(object: &Map<String, Value>) -> Self {
        let nutrients = object
            .get(NUTRITIONAL_INFO_KEY)
            .and_then(Value::as_object)
            .map(|info| {
                info.iter()
                    .map(|(name, amount)| (name.clone(), amount_to_string(amount)))
                    .collect()
            })
            .unwrap_or_default();

        let other_ingredients = object
            .get(OTHER_INGREDIENTS_KEY)
            .and_then(Value::as_str)
            .unwrap_or(NO_INGREDIENTS_FOUND)
            .to_string();

        NutritionRecord {
            nutrients,
            other_ingredients,
        }
    }

    /// Render back into the two-key JSON shape
    pub fn to_json(&self) -> Value {
        let info: Map<String, Value> = self
            .nutrients
            .iter()
            .map(|(name, amount)| (name.clone(), Value::String(amount.clone())))
            .collect();

        let mut object = Map::new();
        object.insert(NUTRITIONAL_INFO_KEY.to_string(), Value::Object(info));
        object.insert(
            OTHER_INGREDIENTS_KEY.to_string(),
            Value::String(self.other_ingredients.clone()),
        );
        Value::Object(object)
    }
}

fn amount_to_string(amount: &Value) -> String {
    match amount {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_deserializes_textract_shape() {
        let output: AnalyzeDocumentOutput = serde_json::from_value(json!({
            "DocumentMetadata": {"Pages": 1},
            "Blocks": [
                {"BlockType": "PAGE", "Id": "p1"},
                {"BlockType": "LINE", "Id": "l1", "Text": "Serving Size 1 scoop", "Confidence": 99.1}
            ]
        }))
        .unwrap();

        assert_eq!(output.blocks.len(), 2);
        assert_eq!(output.blocks[1].block_type, "LINE");
        assert_eq!(output.blocks[1].text.as_deref(), Some("Serving Size 1 scoop"));
        assert!(output.blocks[0].text.is_none());
    }

    #[test]
    fn test_missing_blocks_is_empty() {
        let output: AnalyzeDocumentOutput = serde_json::from_str("{}").unwrap();
        assert!(output.blocks.is_empty());
    }

    #[test]
    fn test_record_keeps_emitted_order_and_stringifies_amounts() {
        let value = json!({
            "Nutritional Info": {"Zinc": "11mg", "Calories": 100, "Iron": null},
            "Other Ingredients": "Gelatin"
        });
        let record = NutritionRecord::from_json(value.as_object().unwrap());

        assert_eq!(
            record.nutrients,
            vec![
                ("Zinc".to_string(), "11mg".to_string()),
                ("Calories".to_string(), "100".to_string()),
                ("Iron".to_string(), String::new()),
            ]
        );
        assert_eq!(record.other_ingredients, "Gelatin");
    }

    #[test]
    fn test_record_defaults_for_missing_keys() {
        let record = NutritionRecord::from_json(&Map::new());
        assert_eq!(record, NutritionRecord::fallback());
    }

    #[test]
    fn test_fallback_json_shape() {
        assert_eq!(
            NutritionRecord::fallback().to_json(),
            json!({"Nutritional Info": {}, "Other Ingredients": "No other ingredients found."})
        );
    }
}
