//! Scroll-triggered batch loading.
//!
//! A `ScrollSurface` stands in for the scrollable container; it only tracks
//! how many listeners are attached so teardown can be verified. A
//! `ScrollTrigger` attaches to it with `start()` and holds a
//! `ScrollRegistration` that detaches on drop.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Geometry of the scroll container at the time of an event, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub content_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, viewport_height: f64, content_height: f64) -> Self {
        Self {
            scroll_top,
            viewport_height,
            content_height,
        }
    }

    pub fn distance_from_bottom(&self) -> f64 {
        self.content_height - (self.scroll_top + self.viewport_height)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScrollSurface {
    listeners: Arc<AtomicUsize>,
}

impl ScrollSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.load(Ordering::SeqCst)
    }

    fn attach(&self) -> ScrollRegistration {
        self.listeners.fetch_add(1, Ordering::SeqCst);
        ScrollRegistration {
            listeners: Arc::clone(&self.listeners),
        }
    }
}

/// Live listener on a `ScrollSurface`; dropping it detaches.
#[derive(Debug)]
pub struct ScrollRegistration {
    listeners: Arc<AtomicUsize>,
}

impl Drop for ScrollRegistration {
    fn drop(&mut self) {
        self.listeners.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct ScrollTrigger {
    threshold: f64,
    registration: Option<ScrollRegistration>,
}

impl ScrollTrigger {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: f64::from(threshold),
            registration: None,
        }
    }

    /// Attach to `surface`. Starting an active trigger does nothing.
    pub fn start(&mut self, surface: &ScrollSurface) {
        if self.registration.is_none() {
            self.registration = Some(surface.attach());
        }
    }

    pub fn stop(&mut self) {
        self.registration = None;
    }

    pub fn is_active(&self) -> bool {
        self.registration.is_some()
    }

    /// Whether `metrics` is within the threshold of the bottom.
    ///
    /// An inactive trigger never fires.
    pub fn is_near_bottom(&self, metrics: &ScrollMetrics) -> bool {
        self.is_active() && metrics.distance_from_bottom() <= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_from_bottom() {
        let metrics = ScrollMetrics::new(850.0, 600.0, 1500.0);
        assert_eq!(metrics.distance_from_bottom(), 50.0);
    }

    #[test]
    fn test_fires_only_within_threshold_while_active() {
        let surface = ScrollSurface::new();
        let mut trigger = ScrollTrigger::new(100);
        let near = ScrollMetrics::new(850.0, 600.0, 1500.0);
        let far = ScrollMetrics::new(0.0, 600.0, 1500.0);

        assert!(!trigger.is_near_bottom(&near));
        trigger.start(&surface);
        assert!(trigger.is_near_bottom(&near));
        assert!(!trigger.is_near_bottom(&far));
    }

    #[test]
    fn test_registration_released_on_stop_and_drop() {
        let surface = ScrollSurface::new();
        let mut trigger = ScrollTrigger::new(100);
        trigger.start(&surface);
        trigger.start(&surface);
        assert_eq!(surface.listener_count(), 1);

        trigger.stop();
        assert_eq!(surface.listener_count(), 0);

        trigger.start(&surface);
        drop(trigger);
        assert_eq!(surface.listener_count(), 0);
    }
}
