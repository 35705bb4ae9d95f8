use super::{ImageFetcher, LoadError};
use async_trait::async_trait;
use iced::widget::image::Handle;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Fetches image sources over HTTP or from the local filesystem and keeps
/// the decoded handles in memory.
///
/// The in-memory map is what makes a source "ready": once fetched, probing
/// the same source succeeds synchronously and no new fetch is issued.
pub struct WebImageLoader {
    client: Client,
    memory: Mutex<HashMap<String, Handle>>,
}

impl WebImageLoader {
    /// Create a new loader with a pooled HTTP client
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        WebImageLoader {
            client,
            memory: Mutex::new(HashMap::new()),
        }
    }

    /// Sources with an http(s) scheme go through the network; everything
    /// else is treated as a filesystem path
    fn is_remote(src: &str) -> bool {
        src.starts_with("http://") || src.starts_with("https://")
    }

    async fn read_bytes(&self, src: &str) -> Result<Vec<u8>, LoadError> {
        if Self::is_remote(src) {
            let response = self
                .client
                .get(src)
                .send()
                .await
                .map_err(|e| LoadError::Network(e.to_string()))?;

            if !response.status().is_success() {
                return Err(LoadError::Network(format!(
                    "HTTP {}: {}",
                    response.status(),
                    src
                )));
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| LoadError::Network(e.to_string()))?;

            Ok(bytes.to_vec())
        } else {
            tokio::fs::read(src)
                .await
                .map_err(|e| LoadError::Read(e.to_string()))
        }
    }
}

#[async_trait]
impl ImageFetcher for WebImageLoader {
    fn is_ready(&self, src: &str) -> bool {
        self.memory
            .lock()
            .expect("image memory lock")
            .contains_key(src)
    }

    fn get(&self, src: &str) -> Option<Handle> {
        self.memory
            .lock()
            .expect("image memory lock")
            .get(src)
            .cloned()
    }

    async fn fetch(&self, src: String) -> Result<(), LoadError> {
        let bytes = self.read_bytes(&src).await?;

        // Spawn blocking because decoding is CPU-intensive
        let decoded = tokio::task::spawn_blocking(move || {
            image::load_from_memory(&bytes)
                .map(|img| img.into_rgba8())
                .map_err(|e| LoadError::Decode(e.to_string()))
        })
        .await
        .map_err(|e| LoadError::Join(e.to_string()))??;

        let (width, height) = decoded.dimensions();
        let handle = Handle::from_rgba(width, height, decoded.into_raw());

        self.memory
            .lock()
            .expect("image memory lock")
            .insert(src, handle);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Write a tiny valid PNG under the system temp dir
    fn sample_png(name: &str) -> String {
        let path = std::env::temp_dir().join(name);
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
        img.save_with_format(&path, image::ImageFormat::Png)
            .expect("write sample png");
        path.to_string_lossy().to_string()
    }

    #[tokio::test]
    async fn test_fetch_missing_file() {
        let loader = WebImageLoader::new();
        let result = loader.fetch("/nonexistent/image.png".to_string()).await;
        assert!(matches!(result, Err(LoadError::Read(_))));
    }

    #[tokio::test]
    async fn test_fetch_local_file_becomes_ready() {
        let src = sample_png("lazy-gallery-loader-test.png");
        let loader = WebImageLoader::new();

        assert!(!loader.is_ready(&src));

        loader.fetch(src.clone()).await.expect("fetch sample png");

        assert!(loader.is_ready(&src));
        assert!(loader.get(&src).is_some());
    }

    #[tokio::test]
    async fn test_fetch_undecodable_bytes() {
        let path = std::env::temp_dir().join("lazy-gallery-not-an-image.txt");
        std::fs::write(&path, b"definitely not pixels").expect("write sample file");

        let loader = WebImageLoader::new();
        let result = loader.fetch(path.to_string_lossy().to_string()).await;

        assert!(matches!(result, Err(LoadError::Decode(_))));
    }
}
