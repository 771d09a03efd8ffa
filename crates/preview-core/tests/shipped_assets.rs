//! Loads the model files shipped in `assets/models` through the cache

use std::path::PathBuf;

use futures::FutureExt;
use futures::executor::block_on;
use futures::future::LocalBoxFuture;
use preview_core::{
    AssetError, AssetSource, Color, ModelCache, ModelKind, PreviewConfig, TEXTURE_SIZE, composite,
};

struct AssetDir(PathBuf);

impl AssetDir {
    fn shipped() -> Self {
        Self(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets"))
    }
}

impl AssetSource for AssetDir {
    fn fetch(&self, path: &str) -> LocalBoxFuture<'_, Result<Vec<u8>, AssetError>> {
        let full = self.0.join(path);
        let result = std::fs::read(&full)
            .map_err(|e| AssetError::Io(format!("{}: {}", full.display(), e)));
        async move { result }.boxed_local()
    }
}

#[test]
fn test_shipped_models_load() {
    let cache = ModelCache::with_config(AssetDir::shipped(), &PreviewConfig::default());

    for kind in ModelKind::ALL {
        let model = block_on(cache.get_or_load(kind)).unwrap();
        let mesh = &model.mesh;

        assert_eq!(model.kind, kind);
        assert!(mesh.triangle_count() > 100, "{kind} has too few triangles");
        assert_eq!(mesh.uvs.len(), mesh.positions.len());
        assert!(
            mesh.uvs
                .iter()
                .all(|uv| (0.0..=1.0).contains(&uv[0]) && (0.0..=1.0).contains(&uv[1])),
            "{kind} has texture coordinates outside the texture"
        );
        for axis in 0..3 {
            assert!(mesh.bbox_min[axis] <= mesh.bbox_max[axis]);
        }
    }

    assert_eq!(cache.len(), ModelKind::ALL.len());
}

#[test]
fn test_shipped_model_takes_a_composite() {
    let cache = ModelCache::with_config(AssetDir::shipped(), &PreviewConfig::default());
    let model = block_on(cache.get_or_load_id("cushion")).unwrap();

    let texture = composite(model.kind, Color::rgb(200, 10, 10), None);
    assert_eq!(texture.dimensions(), (TEXTURE_SIZE, TEXTURE_SIZE));
}
