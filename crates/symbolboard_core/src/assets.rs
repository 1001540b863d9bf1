//! Image path derivation for symbols.
//!
//! Pure string derivation; nothing here touches the filesystem or network.

use crate::config::AssetConfig;
use crate::model::symbol::Symbol;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

// Final extension only; never spans a path separator.
static FILE_EXTENSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.[^/.]+$").expect("valid extension regex"));

/// Image size variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetVariant {
    Full,
    Thumbnail,
}

/// Derives `/volume-<id>/<variant dir>/<name>.<extension>` for `symbol`.
///
/// File names without an extension are kept as-is.
pub fn asset_path(assets: &AssetConfig, symbol: &Symbol, variant: AssetVariant) -> String {
    let dir = match variant {
        AssetVariant::Full => assets.full_dir.as_str(),
        AssetVariant::Thumbnail => assets.thumb_dir.as_str(),
    };
    format!(
        "/volume-{}/{}/{}",
        symbol.volume,
        dir,
        converted_file_name(assets, &symbol.file_name)
    )
}

pub fn image_path(assets: &AssetConfig, symbol: &Symbol) -> String {
    asset_path(assets, symbol, AssetVariant::Full)
}

pub fn thumbnail_path(assets: &AssetConfig, symbol: &Symbol) -> String {
    asset_path(assets, symbol, AssetVariant::Thumbnail)
}

pub fn fallback_image_path(assets: &AssetConfig) -> &str {
    assets.fallback.as_str()
}

fn converted_file_name(assets: &AssetConfig, file_name: &str) -> String {
    let replacement = format!(".{}", assets.extension);
    FILE_EXTENSION_RE
        .replace(file_name, NoExpand(replacement.as_str()))
        .into_owned()
}
