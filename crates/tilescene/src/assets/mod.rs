mod keys;
mod loader;

pub use keys::{validate_asset_key, AssetKeyError};
pub use loader::{AssetError, AssetSource, FsAssets, ImagePayload, LoadedAsset, MemoryAssets};
pub(crate) use loader::encode_png;
