//! Cover-art load throttling
//!
//! While the user scrolls or moves the selection, cover art is served from
//! the in-memory cache only so disk reads do not stall the table. Once the
//! user has been idle for [`USER_IDLE_THRESHOLD`] (checked on every GUI
//! tick), loading from disk is allowed again and the single selected track,
//! if any, is announced to the cover preview and crate/playlist highlighting.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Cadence of the GUI tick that drives [`CoverArtThrottle::on_tick`]
pub const GUI_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Idle time after which disk loading is re-enabled
pub const USER_IDLE_THRESHOLD: Duration = Duration::from_millis(100);

/// Source of monotonic time for the throttle
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin
    fn elapsed(&self) -> Duration;
}

/// Wall clock based on [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually advanced clock
///
/// Clones share the same time, so a test can keep one handle and hand
/// another to the throttle.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current time
    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }

    /// Advance the current time
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        self.now.get()
    }
}

/// Load mode for cover art
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverLoadState {
    /// Covers may be looked up on disk
    Loading,
    /// Covers are only served from the in-memory cache
    CachedOnly,
}

/// Notification produced by the throttle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverArtEvent<Id> {
    /// Toggle cache-only cover loading
    OnlyCachedCoverArt(bool),
    /// The single selected track, or `None` for zero or several selected rows
    TrackFocused(Option<Id>),
}

/// Debounce state machine for cover-art loading
#[derive(Debug)]
pub struct CoverArtThrottle<C> {
    clock: C,
    state: CoverLoadState,
    last_user_action: Duration,
}

impl<C: Clock> CoverArtThrottle<C> {
    pub fn new(clock: C) -> Self {
        let last_user_action = clock.elapsed();
        Self {
            clock,
            state: CoverLoadState::Loading,
            last_user_action,
        }
    }

    pub fn state(&self) -> CoverLoadState {
        self.state
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Record a scroll or selection change.
    ///
    /// Returns the cache-only notification when this switches the state.
    pub fn on_user_activity<Id>(&mut self) -> Option<CoverArtEvent<Id>> {
        self.last_user_action = self.clock.elapsed();
        if self.state == CoverLoadState::Loading {
            self.state = CoverLoadState::CachedOnly;
            return Some(CoverArtEvent::OnlyCachedCoverArt(true));
        }
        None
    }

    /// Periodic check for user idleness.
    ///
    /// `selected_rows` is the number of selected rows and `single_track`
    /// resolves the track of the only selected row; it is only called when
    /// exactly one row is selected.
    pub fn on_tick<Id, F>(&mut self, selected_rows: usize, single_track: F) -> Vec<CoverArtEvent<Id>>
    where
        F: FnOnce() -> Option<Id>,
    {
        let idle = self.clock.elapsed().saturating_sub(self.last_user_action);
        if self.state != CoverLoadState::CachedOnly || idle <= USER_IDLE_THRESHOLD {
            return Vec::new();
        }

        let mut events = Vec::with_capacity(2);
        if selected_rows == 1 {
            match single_track() {
                Some(id) => events.push(CoverArtEvent::TrackFocused(Some(id))),
                None => log::debug!("cover art: selected row has no track"),
            }
        } else {
            events.push(CoverArtEvent::TrackFocused(None));
        }
        events.push(CoverArtEvent::OnlyCachedCoverArt(false));
        self.state = CoverLoadState::Loading;
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_scroll_then_idle_timeline() {
        let clock = ManualClock::new();
        let mut throttle = CoverArtThrottle::new(clock.clone());
        assert_eq!(throttle.state(), CoverLoadState::Loading);

        assert_eq!(
            throttle.on_user_activity::<u32>(),
            Some(CoverArtEvent::OnlyCachedCoverArt(true))
        );
        assert_eq!(throttle.state(), CoverLoadState::CachedOnly);

        clock.set(ms(60));
        assert!(throttle.on_tick(1, || Some(7u32)).is_empty());
        assert_eq!(throttle.state(), CoverLoadState::CachedOnly);

        clock.set(ms(110));
        let events = throttle.on_tick(1, || Some(7u32));
        assert_eq!(
            events,
            vec![
                CoverArtEvent::TrackFocused(Some(7)),
                CoverArtEvent::OnlyCachedCoverArt(false),
            ]
        );
        assert_eq!(throttle.state(), CoverLoadState::Loading);

        clock.set(ms(200));
        assert!(throttle.on_tick(1, || Some(7u32)).is_empty());
    }

    #[test]
    fn test_repeated_activity_extends_quiet_period() {
        let clock = ManualClock::new();
        let mut throttle = CoverArtThrottle::new(clock.clone());

        assert!(throttle.on_user_activity::<u32>().is_some());
        clock.set(ms(80));
        assert!(throttle.on_user_activity::<u32>().is_none());

        clock.set(ms(150));
        assert!(throttle.on_tick(0, || None::<u32>).is_empty());

        clock.set(ms(181));
        assert_eq!(throttle.on_tick(0, || None::<u32>).len(), 2);
    }

    #[test]
    fn test_exactly_100ms_is_not_idle() {
        let clock = ManualClock::new();
        let mut throttle = CoverArtThrottle::new(clock.clone());
        throttle.on_user_activity::<u32>();
        clock.set(USER_IDLE_THRESHOLD);
        assert!(throttle.on_tick(1, || Some(1u32)).is_empty());
    }

    #[test]
    fn test_zero_or_many_selected_clears_focus() {
        for selected in [0usize, 2, 5] {
            let clock = ManualClock::new();
            let mut throttle = CoverArtThrottle::new(clock.clone());
            throttle.on_user_activity::<u32>();
            clock.advance(ms(120));
            let events = throttle.on_tick(selected, || -> Option<u32> {
                panic!("single track must not be resolved")
            });
            assert_eq!(events[0], CoverArtEvent::TrackFocused(None));
        }
    }

    #[test]
    fn test_single_row_without_track_emits_no_focus() {
        let clock = ManualClock::new();
        let mut throttle = CoverArtThrottle::new(clock.clone());
        throttle.on_user_activity::<u32>();
        clock.advance(ms(101));
        let events = throttle.on_tick(1, || None::<u32>);
        assert_eq!(events, vec![CoverArtEvent::OnlyCachedCoverArt(false)]);
    }

    #[test]
    fn test_tick_while_loading_is_noop() {
        let clock = ManualClock::new();
        let mut throttle = CoverArtThrottle::new(clock.clone());
        clock.advance(ms(500));
        assert!(throttle.on_tick(1, || Some(1u32)).is_empty());
    }
}
