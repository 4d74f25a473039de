use crate::api::ApiClient;
use crate::api::models::{SecretKind, SecretPayload};
use crate::display::{MessageKind, display_message};
use crate::filter::split_key_value;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SecretsError {
    #[error(
        "Option \"{0}\" is invalid:\nFor literal strings use \"SECRET_NAME=VALUE\" format"
    )]
    InvalidLiteral(String),

    #[error("File {path} could not be uploaded: {source}")]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File {0} has no usable file name")]
    NoFileName(PathBuf),
}

#[derive(Debug, Clone, Default)]
pub struct SecretsAddOptions {
    pub env: Vec<String>,
    pub files: Vec<PathBuf>,
    pub overwrite: bool,
}

fn payload(name: &str, kind: SecretKind, content: &[u8]) -> (String, SecretPayload) {
    (
        name.to_string(),
        SecretPayload {
            name: name.to_string(),
            kind,
            value: STANDARD.encode(content),
        },
    )
}

fn file_secret(path: &Path) -> Result<(String, SecretPayload), SecretsError> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| SecretsError::NoFileName(path.to_path_buf()))?;
    let content = fs::read(path).map_err(|source| SecretsError::UnreadableFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(payload(name, SecretKind::File, &content))
}

/// Build the upload body from `NAME=VALUE` literals and secret files.
///
/// Values are base64-encoded; file secrets are named after the file.
pub fn collect_secrets(
    env: &[String],
    files: &[PathBuf],
) -> Result<IndexMap<String, SecretPayload>, SecretsError> {
    let mut secrets = IndexMap::new();

    for literal in env {
        let (name, value) = split_key_value(literal)
            .filter(|(name, _)| !name.is_empty())
            .ok_or_else(|| SecretsError::InvalidLiteral(literal.clone()))?;
        let (name, secret) = payload(name, SecretKind::Env, value.as_bytes());
        secrets.insert(name, secret);
    }

    for path in files {
        let (name, secret) = file_secret(path)?;
        secrets.insert(name, secret);
    }

    debug!(count = secrets.len(), "collected secrets");
    Ok(secrets)
}

pub fn run(client: &ApiClient, options: &SecretsAddOptions) -> anyhow::Result<()> {
    let secrets = collect_secrets(&options.env, &options.files)?;
    client.add_secrets(&secrets, options.overwrite)?;

    let names: Vec<&str> = secrets.keys().map(String::as_str).collect();
    display_message(
        &format!("Secrets {} were successfully uploaded.", names.join(", ")),
        MessageKind::Success,
        false,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_env_literals_are_encoded() {
        let secrets =
            collect_secrets(&["PASSWORD=pass".to_string(), "TOKEN=a=b".to_string()], &[]).unwrap();

        assert_eq!(secrets.keys().collect::<Vec<_>>(), ["PASSWORD", "TOKEN"]);
        assert_eq!(secrets["PASSWORD"].value, "cGFzcw==");
        assert_eq!(secrets["PASSWORD"].kind, SecretKind::Env);
        assert_eq!(secrets["TOKEN"].value, STANDARD.encode("a=b"));
    }

    #[test]
    fn test_invalid_literal() {
        for literal in ["PASSWORD", "=value"] {
            let err = collect_secrets(&[literal.to_string()], &[]).unwrap_err();
            assert!(matches!(err, SecretsError::InvalidLiteral(_)));
            assert!(err.to_string().contains("SECRET_NAME=VALUE"));
        }
    }

    #[test]
    fn test_file_secret_uses_file_name() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"-----BEGIN KEY-----").unwrap();
        let name = file.path().file_name().unwrap().to_str().unwrap().to_string();

        let secrets = collect_secrets(&[], &[file.path().to_path_buf()]).unwrap();
        let secret = &secrets[&name];
        assert_eq!(secret.kind, SecretKind::File);
        assert_eq!(secret.value, STANDARD.encode("-----BEGIN KEY-----"));
    }

    #[test]
    fn test_missing_file() {
        let err = collect_secrets(&[], &[PathBuf::from("/nonexistent/userkey.pem")]).unwrap_err();
        assert!(err.to_string().contains("could not be uploaded"));
    }
}
