use serde::{Deserialize, Serialize};

pub const DEFAULT_INFERENCE_STEPS: u32 = 40;
pub const MIN_INFERENCE_STEPS: u32 = 20;
pub const MAX_INFERENCE_STEPS: u32 = 50;
pub const DEFAULT_GUIDANCE_SCALE: f32 = 1.0;
pub const DEFAULT_TRUE_CFG_SCALE: f32 = 4.0;

const SEED_RANGE: u64 = 1_000_000;

/// Prompts offered as one-click suggestions
pub const PROMPT_SUGGESTIONS: [&str; 8] = [
    "Remove the background",
    "Add a sunset sky background",
    "Transform into Studio Ghibli style",
    "Make it look like a watercolor painting",
    "Add soft lighting",
    "Convert to black and white",
    "Add a vintage film effect",
    "Remove text from the image",
];

/// `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
    #[serde(default)]
    pub cuda_available: bool,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// `GET /info`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoResponse {
    pub model_id: Option<String>,
    pub variant: String,
    pub loaded: bool,
    pub cuda_available: bool,
    pub gpu_name: Option<String>,
    pub gpu_memory_gb: Option<f32>,
}

/// Generation parameters shared by both edit endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditParams {
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub num_inference_steps: u32,
    pub guidance_scale: f32,
    pub true_cfg_scale: f32,
    pub seed: Option<u64>,
}

impl EditParams {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: None,
            num_inference_steps: DEFAULT_INFERENCE_STEPS,
            guidance_scale: DEFAULT_GUIDANCE_SCALE,
            true_cfg_scale: DEFAULT_TRUE_CFG_SCALE,
            seed: None,
        }
    }

    /// Parameters as multipart text fields. Unset optional fields are omitted.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("prompt", self.prompt.clone())];
        if let Some(negative) = &self.negative_prompt {
            fields.push(("negative_prompt", negative.clone()));
        }
        fields.push(("num_inference_steps", self.num_inference_steps.to_string()));
        fields.push(("guidance_scale", self.guidance_scale.to_string()));
        fields.push(("true_cfg_scale", self.true_cfg_scale.to_string()));
        if let Some(seed) = self.seed {
            fields.push(("seed", seed.to_string()));
        }
        fields
    }
}

/// `POST /edit/base64` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditBase64Request {
    /// PNG bytes, base64 without a data-URL prefix
    pub image: String,
    #[serde(flatten)]
    pub params: EditParams,
}

/// `POST /edit/base64` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditBase64Response {
    pub image: String,
    #[serde(default)]
    pub format: String,
}

/// What the user filled in next to the prompt
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditOptions {
    pub negative_prompt: String,
    pub num_inference_steps: Option<u32>,
    pub seed: Option<u64>,
}

impl EditOptions {
    /// Normalize into wire parameters: trimmed text, empty negative prompt sent as
    /// null, steps defaulted and clamped to the supported range.
    pub fn to_params(&self, prompt: &str) -> EditParams {
        let negative = self.negative_prompt.trim();
        EditParams {
            negative_prompt: (!negative.is_empty()).then(|| negative.to_owned()),
            num_inference_steps: self
                .num_inference_steps
                .unwrap_or(DEFAULT_INFERENCE_STEPS)
                .clamp(MIN_INFERENCE_STEPS, MAX_INFERENCE_STEPS),
            seed: self.seed,
            ..EditParams::new(prompt.trim())
        }
    }
}

/// A seed in `0..1_000_000`
pub fn random_seed() -> u64 {
    rand::random_range(0..SEED_RANGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_base64_request_wire_format() {
        let request = EditBase64Request {
            image: "AAAA".to_owned(),
            params: EditParams::new("remove background"),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "image": "AAAA",
                "prompt": "remove background",
                "negative_prompt": null,
                "num_inference_steps": 40,
                "guidance_scale": 1.0,
                "true_cfg_scale": 4.0,
                "seed": null,
            })
        );
    }

    #[test]
    fn test_options_normalization() {
        let options = EditOptions {
            negative_prompt: "   ".to_owned(),
            num_inference_steps: Some(200),
            seed: Some(7),
        };
        let params = options.to_params("  make it blue ");
        assert_eq!(params.prompt, "make it blue");
        assert_eq!(params.negative_prompt, None);
        assert_eq!(params.num_inference_steps, MAX_INFERENCE_STEPS);
        assert_eq!(params.seed, Some(7));

        let params = EditOptions::default().to_params("x");
        assert_eq!(params.num_inference_steps, DEFAULT_INFERENCE_STEPS);
    }

    #[test]
    fn test_form_fields_skip_unset() {
        let fields = EditParams::new("p").form_fields();
        let names: Vec<_> = fields.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["prompt", "num_inference_steps", "guidance_scale", "true_cfg_scale"]);
    }

    #[test]
    fn test_health_parsing() {
        let health: HealthResponse = serde_json::from_str(r#"{"status":"healthy"}"#).unwrap();
        assert!(health.is_healthy());
        assert!(!health.model_loaded);

        let health: HealthResponse =
            serde_json::from_str(r#"{"status":"loading","model_loaded":false,"cuda_available":true}"#).unwrap();
        assert!(!health.is_healthy());
    }

    #[test]
    fn test_random_seed_range() {
        let seeds: Vec<u64> = (0..100).map(|_| random_seed()).collect();
        assert!(seeds.iter().all(|seed| *seed < 1_000_000));
        assert!(seeds.iter().any(|seed| *seed != seeds[0]));
    }
}
