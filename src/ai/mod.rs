//! Round trips through the external generative image-edit service.

mod client;
mod orchestrator;
mod types;

pub use client::{DiffusionClient, ImageEditService};
pub use orchestrator::{AiEditOrchestrator, EditStatus, PendingEdit};
pub use types::{
    DEFAULT_GUIDANCE_SCALE, DEFAULT_INFERENCE_STEPS, DEFAULT_TRUE_CFG_SCALE, EditBase64Request, EditBase64Response,
    EditOptions, EditParams, HealthResponse, InfoResponse, MAX_INFERENCE_STEPS, MIN_INFERENCE_STEPS, PROMPT_SUGGESTIONS,
    random_seed,
};
