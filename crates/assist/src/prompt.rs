//! Chat messages sent to the completion API.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;

/// System prompt for every legal-assistant request.
pub const LEGAL_SYSTEM_PROMPT: &str = "Sos un asistente jurídico especializado en mediación \
y métodos alternativos de resolución de conflictos en Argentina. Respondé en español, con \
lenguaje claro y preciso, citando la normativa aplicable cuando corresponda (por ejemplo, la \
Ley 26.589 de Mediación y Conciliación). Si se adjunta un documento, basá tu respuesta en su \
contenido y aclará cuando la información no surja de él. No inventes datos, fechas ni \
artículos; si no estás seguro, decilo. Tus respuestas son orientativas y no reemplazan el \
asesoramiento profesional.";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: MessageContent,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImageUrl {
    pub url: String,
}

/// A document prepared for the model.
#[derive(Debug, Clone)]
pub enum Attachment {
    Text {
        name: String,
        text: String,
        truncated: bool,
    },
    Image {
        mime: &'static str,
        data: Vec<u8>,
    },
}

impl Attachment {
    pub fn truncated(&self) -> bool {
        matches!(self, Attachment::Text { truncated: true, .. })
    }
}

/// System prompt plus one user turn carrying the question and, if present,
/// the attachment.
pub fn build_messages(prompt: &str, attachment: Option<&Attachment>) -> Vec<ChatMessage> {
    let user = match attachment {
        None => MessageContent::Text(prompt.to_string()),
        Some(Attachment::Text {
            name,
            text,
            truncated,
        }) => {
            let note = if *truncated {
                " (recortado por extensión)"
            } else {
                ""
            };
            MessageContent::Text(format!(
                "Documento adjunto: {name}{note}\n\"\"\"\n{text}\n\"\"\"\n\nConsulta: {prompt}"
            ))
        }
        Some(Attachment::Image { mime, data }) => MessageContent::Parts(vec![
            ContentPart::Text {
                text: prompt.to_string(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: format!("data:{mime};base64,{}", STANDARD.encode(data)),
                },
            },
        ]),
    };

    vec![
        ChatMessage {
            role: "system",
            content: MessageContent::Text(LEGAL_SYSTEM_PROMPT.to_string()),
        },
        ChatMessage {
            role: "user",
            content: user,
        },
    ]
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn plain_question() {
        let messages = build_messages("¿Qué es la mediación prejudicial?", None);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(
            serde_json::to_value(&messages[1]).unwrap(),
            json!({ "role": "user", "content": "¿Qué es la mediación prejudicial?" })
        );
    }

    #[test]
    fn text_attachment_is_quoted_with_note() {
        let attachment = Attachment::Text {
            name: "acta.docx".to_string(),
            text: "Las partes acuerdan".to_string(),
            truncated: true,
        };
        let messages = build_messages("Resumí", Some(&attachment));
        let MessageContent::Text(text) = &messages[1].content else {
            panic!("expected text content");
        };
        assert!(text.starts_with("Documento adjunto: acta.docx (recortado por extensión)"));
        assert!(text.contains("Las partes acuerdan"));
        assert!(text.ends_with("Consulta: Resumí"));
        assert!(attachment.truncated());
    }

    #[test]
    fn image_attachment_uses_data_url() {
        let attachment = Attachment::Image {
            mime: "image/png",
            data: b"abc".to_vec(),
        };
        let messages = build_messages("¿Qué dice?", Some(&attachment));
        let value = serde_json::to_value(&messages[1]).unwrap();
        assert_eq!(value["content"][0], json!({ "type": "text", "text": "¿Qué dice?" }));
        assert_eq!(
            value["content"][1],
            json!({ "type": "image_url", "image_url": { "url": "data:image/png;base64,YWJj" } })
        );
    }
}
