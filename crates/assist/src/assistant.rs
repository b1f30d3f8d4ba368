use mediar_documents::{extract_text, truncate_chars, DocumentError, DocumentKind};

use crate::client::CompletionClient;
use crate::config::AssistConfig;
use crate::error::AssistError;
use crate::prompt::{build_messages, Attachment};
use crate::source::{load, resolve, StorageRoots};

#[derive(Debug, Clone)]
pub struct Answer {
    pub answer: String,
    /// Whether the attached document's text was cut to fit.
    pub truncated: bool,
    pub model: String,
}

/// Resolves documents and talks to the completion API.
pub struct Assistant {
    completion: CompletionClient,
    http: reqwest::Client,
    roots: StorageRoots,
}

impl Assistant {
    pub fn new(config: AssistConfig, roots: StorageRoots) -> Result<Self, AssistError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            completion: CompletionClient::new(config)?,
            http,
            roots,
        })
    }

    pub fn model(&self) -> &str {
        self.completion.model()
    }

    /// Answer `prompt`, optionally about the document at `document_ref`.
    pub async fn answer(
        &self,
        prompt: &str,
        document_ref: Option<&str>,
    ) -> Result<Answer, AssistError> {
        let attachment = match document_ref.map(str::trim).filter(|r| !r.is_empty()) {
            Some(reference) => Some(self.prepare_attachment(reference).await?),
            None => None,
        };

        let messages = build_messages(prompt, attachment.as_ref());
        let completion = self.completion.complete(&messages).await?;

        tracing::info!(
            model = %completion.model,
            with_document = attachment.is_some(),
            "Legal assistant answered"
        );
        Ok(Answer {
            answer: completion.content,
            truncated: attachment.as_ref().is_some_and(Attachment::truncated),
            model: completion.model,
        })
    }

    /// Resolve, read, and convert a document reference.
    pub async fn prepare_attachment(&self, reference: &str) -> Result<Attachment, AssistError> {
        let source = resolve(reference, &self.roots)?;
        let name = source.name();
        let kind = DocumentKind::from_path(&name)?;
        let bytes = load(&source, &self.http).await?;

        if let DocumentKind::Image { mime } = kind {
            return Ok(Attachment::Image { mime, data: bytes });
        }

        let text = tokio::task::spawn_blocking(move || extract_text(&bytes, kind))
            .await
            .map_err(|e| DocumentError::Pdf(format!("extraction task failed: {e}")))??;

        let (kept, truncated) = truncate_chars(&text, self.completion.max_document_chars());
        if truncated {
            tracing::debug!(document = %name, "Document text truncated");
        }
        Ok(Attachment::Text {
            name,
            text: kept.to_string(),
            truncated,
        })
    }
}
