//! Texture loading boundary
//!
//! A missing or unreadable asset is fatal: the error is propagated up to
//! the runner, which exits.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::settings::AssetPaths;
use crate::sim::{LevelAssets, SpriteSheet, TextureId};

/// A loaded texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
}

/// Texture backend
pub trait TextureLoader {
    fn load_texture(&mut self, path: &Path) -> Result<TextureInfo>;
}

/// Everything the game needs from the texture backend
#[derive(Debug, Clone, Copy)]
pub struct LoadedAssets {
    pub level: LevelAssets,
    /// 16x16 glyph grid bitmap font
    pub font: TextureInfo,
}

/// Load the sprite sheet, background and font
pub fn load_assets<L: TextureLoader + ?Sized>(
    loader: &mut L,
    paths: &AssetPaths,
) -> Result<LoadedAssets> {
    let sheet = loader.load_texture(&paths.sprite_sheet)?;
    let background = loader.load_texture(&paths.background)?;
    let font = loader.load_texture(&paths.font)?;
    log::info!(
        "Loaded assets: sheet {}x{}, font {}x{}",
        sheet.width,
        sheet.height,
        font.width,
        font.height
    );

    Ok(LoadedAssets {
        level: LevelAssets {
            sheet: SpriteSheet::new(sheet.id, sheet.width as f32, sheet.height as f32),
            background: Some(background.id),
        },
        font,
    })
}

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Width and height from a PNG's IHDR chunk
pub fn png_dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    if bytes.len() < 24 || bytes[..8] != PNG_SIGNATURE {
        bail!("not a PNG image");
    }
    if &bytes[12..16] != b"IHDR" {
        bail!("PNG is missing its IHDR header");
    }
    let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
    let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    if width == 0 || height == 0 {
        bail!("PNG has zero size ({width}x{height})");
    }
    Ok((width, height))
}

/// Validates PNG assets under a root directory and assigns handles.
/// Pixel upload is left to the renderer.
#[derive(Debug)]
pub struct FsTextureLoader {
    root: PathBuf,
    next_id: u32,
}

impl FsTextureLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            next_id: 1,
        }
    }
}

impl TextureLoader for FsTextureLoader {
    fn load_texture(&mut self, path: &Path) -> Result<TextureInfo> {
        let full = self.root.join(path);
        let bytes = fs::read(&full)
            .with_context(|| format!("unable to load image {}", full.display()))?;
        let (width, height) = png_dimensions(&bytes)
            .with_context(|| format!("unable to decode image {}", full.display()))?;

        let id = TextureId(self.next_id);
        self.next_id += 1;
        log::debug!("Loaded {} ({}x{}) as {:?}", full.display(), width, height, id);
        Ok(TextureInfo { id, width, height })
    }
}
