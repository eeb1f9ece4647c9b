// src/engine/sampler.rs

/// Consecutive-miss counter for the face-presence sampler.
///
/// One observation per sampling tick. The violation fires when the miss
/// streak reaches the threshold exactly once per streak: the counter keeps
/// climbing silently past the threshold and only re-arms after a detection
/// resets it to zero.
#[derive(Debug, Clone)]
pub struct FacePresence {
    misses: u32,
    threshold: u32,
}

impl FacePresence {
    pub fn new(threshold: u32) -> Self {
        FacePresence { misses: 0, threshold }
    }

    /// Records one detection sample. Returns true when this miss completes
    /// a full streak, i.e. the counter equals the threshold.
    pub fn observe(&mut self, face_present: bool) -> bool {
        if face_present {
            self.misses = 0;
            return false;
        }
        self.misses += 1;
        self.misses == self.threshold
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }
}
