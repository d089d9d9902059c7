use crate::error::{Error, Result};
use ordered_float::NotNan;
use std::cmp::Ordering;

/// Kinds of events that can occur in the event-driven engine.
///
/// Participants are indices into the engine's particle arena. Only `Pair`
/// carries a second participant.
///
/// Tie-breaking for deterministic ordering prefers `Pair` < `Wall` < `Obstacle`
/// when times are equal; beyond that the order among simultaneous events is
/// not meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Particle `i` reaches the container wall.
    Wall { i: u32 },
    /// Particle `i` reaches the central obstacle.
    Obstacle { i: u32 },
    /// Particles `i` and `j` come into contact.
    Pair { i: u32, j: u32 },
}

impl EventKind {
    /// First participant.
    #[inline]
    pub fn first(&self) -> u32 {
        match *self {
            EventKind::Wall { i } | EventKind::Obstacle { i } | EventKind::Pair { i, .. } => i,
        }
    }

    /// Second participant, present only for particle-particle events.
    #[inline]
    pub fn second(&self) -> Option<u32> {
        match *self {
            EventKind::Pair { j, .. } => Some(j),
            _ => None,
        }
    }

    #[inline]
    fn order_key(&self) -> (u8, u32, u32) {
        match *self {
            EventKind::Pair { i, j } => (0, i, j),
            EventKind::Wall { i } => (1, i, 0),
            EventKind::Obstacle { i } => (2, i, 0),
        }
    }
}

/// A predicted collision.
///
/// - `time`: absolute event time (finite, non-NaN).
/// - `kind`: event kind and participants.
/// - `cc_i`, `cc_j`: collision-count snapshots taken when the event was predicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub time: NotNan<f64>,
    pub kind: EventKind,
    pub cc_i: u64,
    pub cc_j: Option<u64>,
}

impl Event {
    /// Create a new event, validating that time is finite and non-NaN.
    pub fn new(time: f64, kind: EventKind, cc_i: u64, cc_j: Option<u64>) -> Result<Self> {
        if !time.is_finite() {
            return Err(Error::InvalidParam(format!(
                "event time must be finite and not NaN, got {time}"
            )));
        }
        let time = NotNan::new(time)
            .map_err(|_| Error::InvalidParam("event time cannot be NaN".into()))?;
        Ok(Self {
            time,
            kind,
            cc_i,
            cc_j,
        })
    }

    /// Returns the raw f64 event time.
    #[inline]
    pub fn time_f64(&self) -> f64 {
        self.time.into_inner()
    }

    /// Validate against current collision counts. For wall and obstacle events
    /// pass `None` for `cc_j_now`.
    #[inline]
    pub fn is_valid(&self, cc_i_now: u64, cc_j_now: Option<u64>) -> bool {
        if self.cc_i != cc_i_now {
            return false;
        }
        match (self.cc_j, cc_j_now) {
            (Some(a), Some(b)) => a == b,
            (None, None) => true,
            // A single-participant event ignores an unrelated second count.
            (None, Some(_)) => true,
            // The event expected a second participant but none is provided now.
            (Some(_), None) => false,
        }
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.time.cmp(&other.time) {
            Ordering::Equal => {
                let a = self.kind.order_key();
                let b = other.kind.order_key();
                match a.cmp(&b) {
                    Ordering::Equal => (self.cc_i, self.cc_j.unwrap_or(0))
                        .cmp(&(other.cc_i, other.cc_j.unwrap_or(0))),
                    o => o,
                }
            }
            o => o,
        }
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use EventKind::{Obstacle, Pair, Wall};

    #[test]
    fn new_event_rejects_nan_time() {
        let err = Event::new(f64::NAN, Pair { i: 1, j: 2 }, 0, Some(0)).unwrap_err();
        assert!(err.to_string().contains("NaN"));
    }

    #[test]
    fn new_event_rejects_infinite_time() {
        assert!(Event::new(f64::INFINITY, Wall { i: 0 }, 0, None).is_err());
    }

    #[test]
    fn ordering_by_time() -> Result<()> {
        let e1 = Event::new(1.0, Pair { i: 0, j: 1 }, 0, Some(0))?;
        let e2 = Event::new(2.0, Wall { i: 0 }, 0, None)?;
        assert!(e1 < e2);
        Ok(())
    }

    #[test]
    fn tie_breaker_is_deterministic() -> Result<()> {
        let t = 5.0;
        let a = Event::new(t, Pair { i: 0, j: 1 }, 3, Some(4))?;
        let b = Event::new(t, Wall { i: 0 }, 3, None)?;
        let c = Event::new(t, Obstacle { i: 0 }, 3, None)?;
        assert!(a < b);
        assert!(b < c);
        Ok(())
    }

    #[test]
    fn participants() {
        assert_eq!(Wall { i: 4 }.first(), 4);
        assert_eq!(Wall { i: 4 }.second(), None);
        assert_eq!(Obstacle { i: 2 }.second(), None);
        assert_eq!(Pair { i: 1, j: 9 }.first(), 1);
        assert_eq!(Pair { i: 1, j: 9 }.second(), Some(9));
    }

    #[test]
    fn is_valid_checks_collision_counts() -> Result<()> {
        let e_pp = Event::new(1.0, Pair { i: 1, j: 2 }, 10, Some(20))?;
        assert!(e_pp.is_valid(10, Some(20)));
        assert!(!e_pp.is_valid(11, Some(20)));
        assert!(!e_pp.is_valid(10, Some(21)));
        assert!(!e_pp.is_valid(10, None));

        let e_w = Event::new(1.0, Wall { i: 3 }, 7, None)?;
        assert!(e_w.is_valid(7, None));
        assert!(!e_w.is_valid(8, None));
        assert!(e_w.is_valid(7, Some(999)));
        Ok(())
    }
}
