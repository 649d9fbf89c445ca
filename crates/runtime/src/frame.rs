/// Deterministic frame metadata.
///
/// This is the timebase handed to every `tick`. It is intentionally small and
/// pure so a render loop can be recorded and replayed; the scheduling
/// primitive (frame callback, timer, test loop) only decides when to call.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta time since the previous frame (seconds).
    pub dt_s: f64,
    /// Elapsed time at the start of the frame (seconds).
    pub time_s: f64,
}

impl Frame {
    /// Target rate for display-refresh driven loops.
    pub const DEFAULT_DT_S: f64 = 1.0 / 60.0;

    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time_s: index as f64 * dt_s,
        }
    }

    /// Next frame at the same fixed rate.
    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_s)
    }

    /// Next frame with a measured delta (frame callbacks rarely arrive on a fixed grid).
    ///
    /// Negative or non-finite deltas are treated as zero.
    pub fn advance(self, dt_s: f64) -> Self {
        let dt_s = if dt_s.is_finite() { dt_s.max(0.0) } else { 0.0 };
        Self {
            index: self.index + 1,
            dt_s,
            time_s: self.time_s + self.dt_s,
        }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_DT_S)
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;

    #[test]
    fn frame_time_is_deterministic() {
        let a = Frame::new(10, 1.0 / 60.0);
        let b = Frame::new(10, 1.0 / 60.0);
        assert_eq!(a, b);
        assert_eq!(a.time_s, 10.0 / 60.0);
    }

    #[test]
    fn next_advances_index_and_time() {
        let f0 = Frame::new(0, 0.5);
        let f1 = f0.next();
        assert_eq!(f1.index, 1);
        assert_eq!(f1.time_s, 0.5);
    }

    #[test]
    fn advance_accumulates_measured_deltas() {
        let f = Frame::new(0, 0.25).advance(0.5).advance(f64::NAN);
        assert_eq!(f.index, 2);
        assert_eq!(f.time_s, 0.75);
        assert_eq!(f.dt_s, 0.0);
    }
}
