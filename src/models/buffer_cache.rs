//! In-memory text of every opened file plus its last persisted snapshot.
//!
//! Buffers outlive tabs: closing or switching away from a tab never drops a
//! buffer, only deleting the file or tearing the session down does.

use rustc_hash::FxHashMap;

use crate::kernel::error::{SessionError, SessionResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    current: String,
    persisted: String,
}

impl Buffer {
    fn loaded(text: String) -> Self {
        Self {
            persisted: text.clone(),
            current: text,
        }
    }

    pub fn text(&self) -> &str {
        &self.current
    }

    pub fn persisted_text(&self) -> &str {
        &self.persisted
    }

    pub fn is_dirty(&self) -> bool {
        self.current != self.persisted
    }
}

#[derive(Debug, Default)]
pub struct BufferCache {
    buffers: FxHashMap<String, Buffer>,
}

impl BufferCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached text, or runs `loader` once and caches its result
    /// as both current and persisted text. A failing loader creates nothing.
    pub fn open<F>(&mut self, path: &str, loader: F) -> SessionResult<&str>
    where
        F: FnOnce(&str) -> SessionResult<String>,
    {
        if !self.buffers.contains_key(path) {
            let text = loader(path)?;
            self.buffers.insert(path.to_string(), Buffer::loaded(text));
        }
        self.text(path).ok_or_else(|| SessionError::not_open(path))
    }

    pub fn edit(&mut self, path: &str, text: impl Into<String>) -> SessionResult<()> {
        let buffer = self
            .buffers
            .get_mut(path)
            .ok_or_else(|| SessionError::not_open(path))?;
        buffer.current = text.into();
        Ok(())
    }

    /// Records that the current text is now what the collaborator holds.
    pub fn mark_persisted(&mut self, path: &str) -> SessionResult<()> {
        let buffer = self
            .buffers
            .get_mut(path)
            .ok_or_else(|| SessionError::not_open(path))?;
        buffer.persisted = buffer.current.clone();
        Ok(())
    }

    /// Records a confirmed write of `text`, which may be older than the
    /// current text if the user kept typing while the write was in flight.
    pub fn mark_persisted_as(&mut self, path: &str, text: &str) -> SessionResult<()> {
        let buffer = self
            .buffers
            .get_mut(path)
            .ok_or_else(|| SessionError::not_open(path))?;
        buffer.persisted = text.to_string();
        Ok(())
    }

    /// `false` for paths without a buffer.
    pub fn dirty(&self, path: &str) -> bool {
        self.buffers.get(path).is_some_and(Buffer::is_dirty)
    }

    pub fn discard(&mut self, path: &str) -> Option<Buffer> {
        self.buffers.remove(path)
    }

    pub fn clear(&mut self) {
        self.buffers.clear();
    }

    pub fn contains(&self, path: &str) -> bool {
        self.buffers.contains_key(path)
    }

    pub fn get(&self, path: &str) -> Option<&Buffer> {
        self.buffers.get(path)
    }

    pub fn text(&self, path: &str) -> Option<&str> {
        self.buffers.get(path).map(Buffer::text)
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/buffer_cache.rs"]
mod tests;
