use std::sync::Arc;

/// External image hosting. Accepts an image payload and returns a stable URL.
#[async_trait::async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, payload: &str) -> crate::Result<String>;

    /// Removes an image previously stored by `upload`. Hosts that cannot
    /// delete keep the default.
    async fn discard(&self, _url: &str) -> crate::Result<()> {
        Ok(())
    }
}

pub type SharedImageHost = Arc<dyn ImageHost>;

/// Uploads every supplied payload, keeping the field name in the error.
pub async fn upload_named(
    host: &dyn ImageHost,
    name: &str,
    payload: &str,
) -> crate::Result<String> {
    if payload.trim().is_empty() {
        return Err(crate::Error::Invalid(format!("{name} is required")));
    }

    host.upload(payload).await.map_err(|err| match err {
        crate::Error::UploadFailed(reason) => {
            tracing::error!(image = name, reason = %reason, "image upload failed");
            crate::Error::UploadFailed(format!("{name}: {reason}"))
        }
        other => other,
    })
}

/// Images stored during one operation. Payloads that already were URLs are
/// not tracked, so `discard` never touches an image the caller did not send.
#[derive(Default)]
pub struct Uploads {
    stored: Vec<String>,
}

impl Uploads {
    pub async fn upload(
        &mut self,
        host: &dyn ImageHost,
        name: &str,
        payload: &str,
    ) -> crate::Result<String> {
        let url = match upload_named(host, name, payload).await {
            Ok(url) => url,
            Err(err) => {
                self.discard(host).await;
                return Err(err);
            }
        };

        if url != payload.trim() {
            self.stored.push(url.to_owned());
        }

        Ok(url)
    }

    pub async fn upload_optional(
        &mut self,
        host: &dyn ImageHost,
        name: &str,
        payload: Option<&str>,
    ) -> crate::Result<Option<String>> {
        match payload {
            Some(payload) => Ok(Some(self.upload(host, name, payload).await?)),
            None => Ok(None),
        }
    }

    /// Removes every tracked image. Failures are logged only.
    pub async fn discard(&mut self, host: &dyn ImageHost) {
        for url in self.stored.drain(..) {
            if let Err(err) = host.discard(&url).await {
                tracing::warn!(url = %url, err = %err, "failed to discard image");
            }
        }
    }

    /// Passes `result` through, discarding the tracked images when it failed.
    pub async fn settle<T>(
        mut self,
        host: &dyn ImageHost,
        result: crate::Result<T>,
    ) -> crate::Result<T> {
        if result.is_err() {
            self.discard(host).await;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Host {
        discarded: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl ImageHost for Host {
        async fn upload(&self, payload: &str) -> crate::Result<String> {
            match payload {
                "broken" => Err(crate::Error::UploadFailed("offline".to_owned())),
                url if url.starts_with("https://") => Ok(url.to_owned()),
                name => Ok(format!("https://cdn.test/{name}.png")),
            }
        }

        async fn discard(&self, url: &str) -> crate::Result<()> {
            self.discarded.lock().unwrap().push(url.to_owned());

            Ok(())
        }
    }

    #[tokio::test]
    async fn test_failed_upload_discards_earlier_images() {
        let host = Host::default();
        let mut uploads = Uploads::default();

        uploads.upload(&host, "Image", "a").await.unwrap();
        uploads
            .upload(&host, "Banner1", "https://cdn.test/kept.png")
            .await
            .unwrap();
        let err = uploads.upload(&host, "Banner2", "broken").await.unwrap_err();

        assert_eq!(err.to_string(), "Image upload failed: Banner2: offline");
        assert_eq!(
            *host.discarded.lock().unwrap(),
            vec!["https://cdn.test/a.png".to_owned()]
        );
    }

    #[tokio::test]
    async fn test_settle_discards_only_on_error() {
        let host = Host::default();

        let mut uploads = Uploads::default();
        uploads.upload(&host, "Image", "a").await.unwrap();
        assert_eq!(uploads.settle(&host, Ok(1)).await.unwrap(), 1);
        assert!(host.discarded.lock().unwrap().is_empty());

        let mut uploads = Uploads::default();
        uploads.upload(&host, "Image", "b").await.unwrap();
        let result: crate::Result<()> = Err(crate::Error::NoOp);
        assert!(uploads.settle(&host, result).await.is_err());
        assert_eq!(
            *host.discarded.lock().unwrap(),
            vec!["https://cdn.test/b.png".to_owned()]
        );
    }
}
