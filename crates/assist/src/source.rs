//! Document reference resolution.
//!
//! A reference is one of:
//! - an `http(s)://` URL, fetched with a size limit;
//! - a public file URL, `/files/uploads/<name>` or `/files/actas/<name>`;
//! - any other path, which must resolve inside the upload or actas root.
//!
//! `..`, absolute paths outside the roots, and nested names in public URLs
//! are rejected.

use std::path::{Component, Path, PathBuf};

use crate::error::AssistError;

/// Public URL prefix for uploaded files.
pub const UPLOADS_URL_PREFIX: &str = "/files/uploads/";

/// Public URL prefix for generated actas.
pub const ACTAS_URL_PREFIX: &str = "/files/actas/";

/// Largest document read, local or remote.
pub const MAX_DOCUMENT_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct StorageRoots {
    pub uploads: PathBuf,
    pub actas: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Remote(String),
    Local(PathBuf),
}

impl DocumentSource {
    /// Name whose extension decides how the document is read.
    pub fn name(&self) -> String {
        match self {
            DocumentSource::Remote(url) => {
                let path = url.split(|c: char| c == '?' || c == '#').next().unwrap_or(url);
                path.rsplit('/').next().unwrap_or(path).to_string()
            }
            DocumentSource::Local(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(|c: char| c == '/' || c == '\\')
        && !name.contains('\0')
}

fn only_normal_components(path: &Path) -> bool {
    path.components().all(|c| matches!(c, Component::Normal(_)))
}

/// Resolve a reference without touching the network.
pub fn resolve(reference: &str, roots: &StorageRoots) -> Result<DocumentSource, AssistError> {
    let reference = reference.trim();
    let invalid = || AssistError::InvalidReference(reference.to_string());

    let lower = reference.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Ok(DocumentSource::Remote(reference.to_string()));
    }

    for (prefix, root) in [
        (UPLOADS_URL_PREFIX, &roots.uploads),
        (ACTAS_URL_PREFIX, &roots.actas),
    ] {
        if let Some(name) = reference.strip_prefix(prefix) {
            if !is_plain_file_name(name) {
                return Err(invalid());
            }
            return Ok(DocumentSource::Local(root.join(name)));
        }
    }

    let path = Path::new(reference);
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(invalid());
    }

    // A path already spelled inside one of the roots.
    for root in [&roots.uploads, &roots.actas] {
        if let Ok(rest) = path.strip_prefix(root) {
            if !rest.as_os_str().is_empty() && only_normal_components(rest) {
                return Ok(DocumentSource::Local(root.join(rest)));
            }
        }
    }

    // Otherwise a relative name looked up in the uploads root, then actas.
    let relative = path.strip_prefix("/").unwrap_or(path);
    if relative.as_os_str().is_empty() || !only_normal_components(relative) {
        return Err(invalid());
    }
    let in_actas = roots.actas.join(relative);
    if !roots.uploads.join(relative).exists() && in_actas.exists() {
        return Ok(DocumentSource::Local(in_actas));
    }
    Ok(DocumentSource::Local(roots.uploads.join(relative)))
}

/// Read the bytes of a resolved document, enforcing [`MAX_DOCUMENT_BYTES`].
pub async fn load(source: &DocumentSource, http: &reqwest::Client) -> Result<Vec<u8>, AssistError> {
    match source {
        DocumentSource::Remote(url) => {
            let mut response = http.get(url).send().await?;
            if !response.status().is_success() {
                return Err(AssistError::FetchStatus(response.status().as_u16()));
            }
            if response
                .content_length()
                .is_some_and(|len| len as usize > MAX_DOCUMENT_BYTES)
            {
                return Err(AssistError::TooLarge {
                    limit: MAX_DOCUMENT_BYTES,
                });
            }
            let mut bytes = Vec::new();
            while let Some(chunk) = response.chunk().await? {
                if bytes.len() + chunk.len() > MAX_DOCUMENT_BYTES {
                    return Err(AssistError::TooLarge {
                        limit: MAX_DOCUMENT_BYTES,
                    });
                }
                bytes.extend_from_slice(&chunk);
            }
            Ok(bytes)
        }
        DocumentSource::Local(path) => {
            let metadata = match tokio::fs::metadata(path).await {
                Ok(m) => m,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(AssistError::NotFound(source.name()));
                }
                Err(e) => return Err(e.into()),
            };
            if metadata.len() as usize > MAX_DOCUMENT_BYTES {
                return Err(AssistError::TooLarge {
                    limit: MAX_DOCUMENT_BYTES,
                });
            }
            Ok(tokio::fs::read(path).await?)
        }
    }
}
