//! Horizontal shake played on a wrong PIN

/// Horizontal offsets in cells, one per tick, ending at rest
const KEYFRAMES: [i16; 5] = [3, -3, 2, -2, 0];

#[derive(Debug, Clone, Default)]
pub struct Shake {
    frame: Option<usize>,
}

impl Shake {
    /// Restart the animation from the first keyframe
    pub fn start(&mut self) {
        self.frame = Some(0);
    }

    pub fn stop(&mut self) {
        self.frame = None;
    }

    pub fn is_active(&self) -> bool {
        self.frame.is_some()
    }

    /// Advance one keyframe; the animation ends after the last one
    pub fn tick(&mut self) {
        self.frame = match self.frame {
            Some(i) if i + 1 < KEYFRAMES.len() => Some(i + 1),
            _ => None,
        };
    }

    /// Current horizontal offset
    pub fn offset(&self) -> i16 {
        self.frame.map_or(0, |i| KEYFRAMES[i])
    }
}
