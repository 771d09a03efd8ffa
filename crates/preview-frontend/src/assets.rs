//! Asset sources for model files

#[cfg(not(target_arch = "wasm32"))]
pub use native::FileAssetSource;
#[cfg(target_arch = "wasm32")]
pub use web::FetchAssetSource;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use futures::FutureExt;
    use futures::future::LocalBoxFuture;
    use preview_core::{AssetError, AssetSource};

    /// Reads asset paths relative to a root directory
    pub struct FileAssetSource {
        root: PathBuf,
    }

    impl FileAssetSource {
        pub fn new(root: impl Into<PathBuf>) -> Self {
            Self { root: root.into() }
        }
    }

    impl AssetSource for FileAssetSource {
        fn fetch(&self, path: &str) -> LocalBoxFuture<'_, Result<Vec<u8>, AssetError>> {
            let full = self.root.join(path);
            let result = std::fs::read(&full).map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => AssetError::NotFound(full.display().to_string()),
                _ => AssetError::Io(format!("{}: {}", full.display(), e)),
            });
            async move { result }.boxed_local()
        }
    }

}

#[cfg(target_arch = "wasm32")]
mod web {
    use futures::FutureExt;
    use futures::future::LocalBoxFuture;
    use preview_core::{AssetError, AssetSource};
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    /// Fetches asset paths relative to the page URL
    #[derive(Default)]
    pub struct FetchAssetSource;

    impl AssetSource for FetchAssetSource {
        fn fetch(&self, path: &str) -> LocalBoxFuture<'_, Result<Vec<u8>, AssetError>> {
            let path = path.to_string();
            async move { fetch_bytes(&path).await }.boxed_local()
        }
    }

    async fn fetch_bytes(path: &str) -> Result<Vec<u8>, AssetError> {
        let network = |e: wasm_bindgen::JsValue| AssetError::Network(format!("{path}: {e:?}"));

        let window = web_sys::window().ok_or_else(|| AssetError::Network("No window object".into()))?;
        let response = JsFuture::from(window.fetch_with_str(path))
            .await
            .map_err(network)?
            .dyn_into::<web_sys::Response>()
            .map_err(network)?;

        if response.status() == 404 {
            return Err(AssetError::NotFound(path.to_string()));
        }
        if !response.ok() {
            return Err(AssetError::Network(format!("{path}: HTTP {}", response.status())));
        }

        let buffer = JsFuture::from(response.array_buffer().map_err(network)?)
            .await
            .map_err(network)?;
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }
}
