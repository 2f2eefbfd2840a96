/// An offset animation sampled by wall-clock time.
///
/// The host drives it from its frame/timer tick; nothing here schedules work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tween {
    pub from: u64,
    pub to: u64,
    pub start_ms: u64,
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Tween {
    /// A zero duration is treated as one millisecond.
    pub fn new(from: u64, to: u64, start_ms: u64, duration_ms: u64, easing: Easing) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms: duration_ms.max(1),
            easing,
        }
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self, now_ms: u64) -> f64 {
        let elapsed = now_ms.saturating_sub(self.start_ms);
        (elapsed as f64 / self.duration_ms as f64).clamp(0.0, 1.0)
    }

    pub fn is_done(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.start_ms) >= self.duration_ms
    }

    /// The offset at `now_ms`. Lands exactly on `to` once the tween is done.
    pub fn sample(&self, now_ms: u64) -> u64 {
        if self.is_done(now_ms) {
            return self.to;
        }
        let eased = self.easing.sample(self.progress(now_ms));
        let from = self.from as f64;
        let to = self.to as f64;
        let v = from + (to - from) * eased;
        v.round().max(0.0) as u64
    }

    /// Redirects an in-flight tween to `to`, starting from wherever it is at `now_ms`.
    pub fn retarget(&mut self, now_ms: u64, to: u64, duration_ms: u64) {
        let cur = self.sample(now_ms);
        *self = Self::new(cur, to, now_ms, duration_ms, self.easing);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    Linear,
    #[default]
    SmoothStep,
    EaseOutCubic,
    EaseInOutCubic,
}

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` to eased progress in `[0, 1]`.
    pub fn sample(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
            Self::EaseOutCubic => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - (u * u * u) / 2.0
                }
            }
        }
    }
}
