//! In-memory drawing surface for development and testing.
//!
//! Uses `RwLock::unwrap()` intentionally. Lock poisoning only occurs when
//! another thread panicked while holding the lock, which is an
//! unrecoverable state.

use std::sync::{Arc, RwLock};

use gridsketch_core::error::Result;
use gridsketch_core::models::SketchLine;

use crate::ports::DrawingSurface;

/// In-memory implementation of DrawingSurface
#[derive(Debug, Clone, Default)]
pub struct MemorySketchSurface {
    features: Arc<RwLock<Vec<SketchLine>>>,
}

impl MemorySketchSurface {
    /// Create a new, empty surface
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a surface already holding one sketch
    pub fn with_sketch(line: SketchLine) -> Self {
        let surface = Self::new();
        surface.set_sketch(line);
        surface
    }

    /// Put a single sketch on the surface, replacing whatever was there
    pub fn set_sketch(&self, line: SketchLine) {
        let mut features = self.features.write().unwrap();
        features.clear();
        features.push(line);
    }

    pub fn feature_count(&self) -> usize {
        self.features.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.read().unwrap().is_empty()
    }
}

impl DrawingSurface for MemorySketchSurface {
    fn features(&self) -> Result<Vec<SketchLine>> {
        Ok(self.features.read().unwrap().clone())
    }

    fn replace(&self, line: &SketchLine) -> Result<()> {
        let mut features = self.features.write().unwrap();
        features.clear();
        features.push(line.clone());
        Ok(())
    }

    fn delete_all(&self) -> Result<()> {
        self.features.write().unwrap().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> SketchLine {
        SketchLine::new(vec![[0.0, 0.0], [1.0, 1.0]])
    }

    #[test]
    fn test_set_and_read_sketch() {
        let surface = MemorySketchSurface::new();
        assert!(surface.is_empty());

        surface.set_sketch(line());
        assert_eq!(surface.feature_count(), 1);
        assert_eq!(surface.features().unwrap()[0], line());
    }

    #[test]
    fn test_replace_keeps_a_single_feature() {
        let surface = MemorySketchSurface::with_sketch(line());
        let replacement = SketchLine::new(vec![[5.0, 5.0], [6.0, 6.0], [7.0, 7.0]]);

        surface.replace(&replacement).unwrap();
        assert_eq!(surface.feature_count(), 1);
        assert_eq!(surface.features().unwrap()[0].point_count(), 3);
    }

    #[test]
    fn test_delete_all() {
        let surface = MemorySketchSurface::with_sketch(line());
        surface.delete_all().unwrap();
        assert!(surface.is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let surface = MemorySketchSurface::new();
        let handle = surface.clone();

        surface.set_sketch(line());
        assert_eq!(handle.feature_count(), 1);
    }

    #[test]
    fn test_features_returns_deep_copies() {
        let surface = MemorySketchSurface::with_sketch(line());
        let snapshot = surface.features().unwrap();

        surface.delete_all().unwrap();
        // The snapshot is unaffected by later surface changes
        assert_eq!(snapshot[0], line());
    }
}
