const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MAX_DOCUMENT_CHARS: usize = 12_000;

#[derive(Debug, Clone)]
pub struct AssistConfig {
    pub api_key: String,
    pub model: String,
    /// Base URL of an OpenAI-compatible API, without a trailing slash.
    pub base_url: String,
    /// Extracted document text beyond this many characters is dropped.
    pub max_document_chars: usize,
}

impl AssistConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` (assistant disabled) if `AI_API_KEY` is not set.
    ///
    /// | Variable                | Required | Default                     |
    /// |-------------------------|----------|-----------------------------|
    /// | `AI_API_KEY`            | yes      | -                           |
    /// | `AI_MODEL`              | no       | `gpt-4o-mini`               |
    /// | `AI_BASE_URL`           | no       | `https://api.openai.com/v1` |
    /// | `AI_MAX_DOCUMENT_CHARS` | no       | `12000`                     |
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("AI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())?;
        Some(Self {
            api_key,
            model: std::env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            base_url: std::env::var("AI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            max_document_chars: std::env::var("AI_MAX_DOCUMENT_CHARS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_DOCUMENT_CHARS),
        })
    }
}
