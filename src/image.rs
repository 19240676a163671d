use std::path::PathBuf;

use base64::{Engine, engine::general_purpose::STANDARD};
use eventflow_shared::{Error, ImageHost};
use ulid::Ulid;
use url::Url;

use crate::config::ImagesConfig;

/// Stores data URL uploads on disk and serves them under a public prefix.
#[derive(Debug, Clone)]
pub struct LocalImageHost {
    dir: PathBuf,
    public_url: String,
}

impl LocalImageHost {
    pub fn new(config: &ImagesConfig) -> Self {
        Self {
            dir: PathBuf::from(&config.dir),
            public_url: config.public_url.trim_end_matches('/').to_owned(),
        }
    }
}

fn extension(mime: &str) -> Option<&'static str> {
    match mime {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

/// Splits `data:<mime>;base64,<data>` into its extension and decoded bytes.
fn decode_data_url(payload: &str) -> eventflow_shared::Result<(&'static str, Vec<u8>)> {
    let Some((header, data)) = payload
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
    else {
        return Err(Error::UploadFailed("unsupported image payload".to_owned()));
    };

    let Some(ext) = header.strip_suffix(";base64").and_then(extension) else {
        return Err(Error::UploadFailed(format!("unsupported image type {header}")));
    };

    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|err| Error::UploadFailed(err.to_string()))?;

    if bytes.is_empty() {
        return Err(Error::UploadFailed("empty image".to_owned()));
    }

    Ok((ext, bytes))
}

#[async_trait::async_trait]
impl ImageHost for LocalImageHost {
    async fn upload(&self, payload: &str) -> eventflow_shared::Result<String> {
        let payload = payload.trim();

        if let Ok(url) = Url::parse(payload)
            && matches!(url.scheme(), "http" | "https")
        {
            return Ok(url.to_string());
        }

        let (ext, bytes) = decode_data_url(payload)?;
        let file_name = format!("{}.{ext}", Ulid::new().to_string().to_lowercase());

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|err| Error::UploadFailed(err.to_string()))?;

        tokio::fs::write(self.dir.join(&file_name), bytes)
            .await
            .map_err(|err| Error::UploadFailed(err.to_string()))?;

        tracing::debug!(file = %file_name, "stored uploaded image");

        Ok(format!("{}/{file_name}", self.public_url))
    }

    async fn discard(&self, url: &str) -> eventflow_shared::Result<()> {
        // Only files this host stored are removed.
        let Some(file_name) = url
            .strip_prefix(&self.public_url)
            .and_then(|rest| rest.strip_prefix('/'))
        else {
            return Ok(());
        };

        if file_name.is_empty() || file_name.contains('/') || file_name.contains("..") {
            return Ok(());
        }

        match tokio::fs::remove_file(self.dir.join(file_name)).await {
            Ok(()) => {
                tracing::debug!(file = %file_name, "discarded uploaded image");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Error::UploadFailed(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use temp_dir::TempDir;

    fn host(dir: &TempDir) -> LocalImageHost {
        LocalImageHost::new(&ImagesConfig {
            dir: dir.path().to_str().unwrap().to_owned(),
            public_url: "http://localhost:3000/uploads/".to_owned(),
        })
    }

    #[tokio::test]
    async fn test_hosted_url_is_kept() {
        let dir = TempDir::new().unwrap();
        let url = host(&dir)
            .upload("https://cdn.example.com/banner.png")
            .await
            .unwrap();

        assert_eq!(url, "https://cdn.example.com/banner.png");
    }

    #[tokio::test]
    async fn test_data_url_is_stored() {
        let dir = TempDir::new().unwrap();
        let payload = format!("data:image/png;base64,{}", STANDARD.encode(b"not really a png"));

        let url = host(&dir).upload(&payload).await.unwrap();
        let file_name = url
            .strip_prefix("http://localhost:3000/uploads/")
            .unwrap();

        assert!(file_name.ends_with(".png"));
        assert_eq!(
            std::fs::read(dir.path().join(file_name)).unwrap(),
            b"not really a png"
        );
    }

    #[tokio::test]
    async fn test_unsupported_payloads() {
        let dir = TempDir::new().unwrap();
        let host = host(&dir);

        for payload in [
            "just some text",
            "ftp://example.com/a.png",
            "data:text/plain;base64,aGVsbG8=",
            "data:image/png;base64,***",
        ] {
            assert!(matches!(
                host.upload(payload).await,
                Err(Error::UploadFailed(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_discard_removes_stored_file_only() {
        let dir = TempDir::new().unwrap();
        let host = host(&dir);
        let payload = format!("data:image/png;base64,{}", STANDARD.encode(b"png"));

        let url = host.upload(&payload).await.unwrap();
        let file_name = url
            .strip_prefix("http://localhost:3000/uploads/")
            .unwrap()
            .to_owned();
        std::fs::write(dir.path().join("keep.png"), b"keep").unwrap();

        host.discard(&url).await.unwrap();
        host.discard(&url).await.unwrap();
        host.discard("https://cdn.example.com/keep.png").await.unwrap();
        host.discard("http://localhost:3000/uploads/../keep.png")
            .await
            .unwrap();

        assert!(!dir.path().join(file_name).exists());
        assert!(dir.path().join("keep.png").exists());
    }
}
