//! Headless platform pieces for the native runner and tests

use std::collections::{HashSet, VecDeque};
use std::path::Path;

use anyhow::Result;

use super::assets::{TextureInfo, TextureLoader};
use super::{InputEvent, Key, Platform};
use crate::sim::TextureId;

/// Replays a fixed list of per-frame event batches
#[derive(Debug, Default)]
pub struct ScriptedPlatform {
    frames: VecDeque<Vec<InputEvent>>,
    held: HashSet<Key>,
}

impl ScriptedPlatform {
    pub fn new(frames: Vec<Vec<InputEvent>>) -> Self {
        Self {
            frames: frames.into(),
            held: HashSet::new(),
        }
    }

    pub fn hold(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }
}

impl Platform for ScriptedPlatform {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.frames.pop_front().unwrap_or_default()
    }

    fn is_key_down(&self, key: Key) -> bool {
        self.held.contains(&key)
    }
}

/// Hands out texture handles without touching the filesystem
#[derive(Debug)]
pub struct HeadlessTextureLoader {
    next_id: u32,
    width: u32,
    height: u32,
}

impl HeadlessTextureLoader {
    /// Every texture reports the given pixel size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            next_id: 1,
            width,
            height,
        }
    }
}

impl TextureLoader for HeadlessTextureLoader {
    fn load_texture(&mut self, path: &Path) -> Result<TextureInfo> {
        let id = TextureId(self.next_id);
        self.next_id += 1;
        log::debug!("Headless texture {:?} for {}", id, path.display());
        Ok(TextureInfo {
            id,
            width: self.width,
            height: self.height,
        })
    }
}
