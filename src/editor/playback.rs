//! Looping playback over a frame sequence.

use crate::schema::Frame;

/// Endless iterator cycling through a frame sequence.
///
/// Yields `(index, frame)` pairs; an empty sequence yields nothing.
///
/// ```
/// use led_matrix_studio::editor::Playback;
/// use led_matrix_studio::schema::Frame;
///
/// let frames = vec![Frame::empty(100), Frame::empty(50)];
/// let order: Vec<usize> = Playback::new(&frames).take(5).map(|(i, _)| i).collect();
/// assert_eq!(order, vec![0, 1, 0, 1, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct Playback<'a> {
    frames: &'a [Frame],
    next: usize,
}

impl<'a> Playback<'a> {
    pub fn new(frames: &'a [Frame]) -> Self {
        Self { frames, next: 0 }
    }

    /// Start playback at `index` (wrapped into range).
    pub fn starting_at(frames: &'a [Frame], index: usize) -> Self {
        Self {
            frames,
            next: if frames.is_empty() { 0 } else { index % frames.len() },
        }
    }

    /// Length of one pass through the sequence in milliseconds.
    pub fn cycle_duration_ms(&self) -> u64 {
        self.frames.iter().map(|f| f.duration as u64).sum()
    }

    /// Index of the frame on screen `elapsed_ms` after playback started.
    ///
    /// Returns `None` for an empty sequence or one whose durations are all zero.
    pub fn frame_at(&self, elapsed_ms: u64) -> Option<usize> {
        let cycle = self.cycle_duration_ms();
        if cycle == 0 {
            return None;
        }
        let mut t = elapsed_ms % cycle;
        for (i, frame) in self.frames.iter().enumerate() {
            let d = frame.duration as u64;
            if t < d {
                return Some(i);
            }
            t -= d;
        }
        None
    }
}

impl<'a> Iterator for Playback<'a> {
    type Item = (usize, &'a Frame);

    fn next(&mut self) -> Option<Self::Item> {
        let frame = self.frames.get(self.next)?;
        let index = self.next;
        self.next = (self.next + 1) % self.frames.len();
        Some((index, frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(durations: &[u32]) -> Vec<Frame> {
        durations.iter().map(|&d| Frame::empty(d)).collect()
    }

    #[test]
    fn test_cycles() {
        let frames = frames(&[10, 20, 30]);
        let order: Vec<_> = Playback::new(&frames).take(7).map(|(i, _)| i).collect();
        assert_eq!(order, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn test_starting_at_wraps() {
        let frames = frames(&[10, 20, 30]);
        let first = Playback::starting_at(&frames, 4).next().map(|(i, _)| i);
        assert_eq!(first, Some(1));
    }

    #[test]
    fn test_empty_yields_nothing() {
        let mut playback = Playback::new(&[]);
        assert!(playback.next().is_none());
        assert_eq!(playback.frame_at(10), None);
    }

    #[test]
    fn test_frame_at() {
        let frames = frames(&[100, 50, 200]);
        let playback = Playback::new(&frames);

        assert_eq!(playback.cycle_duration_ms(), 350);
        assert_eq!(playback.frame_at(0), Some(0));
        assert_eq!(playback.frame_at(99), Some(0));
        assert_eq!(playback.frame_at(100), Some(1));
        assert_eq!(playback.frame_at(150), Some(2));
        assert_eq!(playback.frame_at(350 + 120), Some(1));
    }

    #[test]
    fn test_frame_at_zero_durations() {
        let frames = frames(&[0, 0]);
        assert_eq!(Playback::new(&frames).frame_at(5), None);
    }
}
