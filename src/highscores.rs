//! Persisted best score
//!
//! A single scalar, read at startup and rewritten only when beaten.

use serde::{Deserialize, Serialize};

use crate::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScore {
    pub best: u32,
}

impl HighScore {
    const STORAGE_KEY: &'static str = "hand_slice_high_score";

    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished round's score.
    ///
    /// Returns true only on a strict improvement; the caller persists via
    /// [`HighScore::save`] after displaying the result.
    pub fn submit(&mut self, score: u32) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Load from LocalStorage (fresh zero on native or corrupt data)
    pub fn load() -> Self {
        if let Some(json) = platform::storage_get(Self::STORAGE_KEY)
            && let Ok(high) = serde_json::from_str::<HighScore>(&json)
        {
            log::info!("Loaded high score: {}", high.best);
            return high;
        }
        log::info!("No high score found, starting fresh");
        Self::new()
    }

    /// Save to LocalStorage (no-op on native)
    pub fn save(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            platform::storage_set(Self::STORAGE_KEY, &json);
            log::info!("High score saved: {}", self.best);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_only_on_strict_improvement() {
        let mut high = HighScore::new();
        assert!(high.submit(50));
        assert_eq!(high.best, 50);

        assert!(!high.submit(50));
        assert!(!high.submit(30));
        assert_eq!(high.best, 50);

        assert!(high.submit(51));
        assert_eq!(high.best, 51);
    }

    #[test]
    fn test_zero_score_never_beats_fresh_store() {
        let mut high = HighScore::new();
        assert!(!high.submit(0));
        assert_eq!(high.best, 0);
    }

    #[test]
    fn test_json_round_trip() {
        let high = HighScore { best: 245 };
        let json = serde_json::to_string(&high).unwrap();
        let back: HighScore = serde_json::from_str(&json).unwrap();
        assert_eq!(back.best, 245);
    }
}
