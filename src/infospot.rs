// infospot.rs - hotspot / marker node placed on a panorama surface

use crate::panorama::PanoramaId;
use crate::tween::{Easing, Tween};
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HotspotId(Uuid);

impl HotspotId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for HotspotId {
    fn default() -> Self {
        Self::new()
    }
}

/// Visibility directive a hotspot is currently carrying out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Show,
    Hide,
}

#[derive(Debug, Clone)]
pub struct Infospot {
    pub id: HotspotId,
    pub size: f32,
    pub image_url: String,
    pub visible: bool,
    pub opacity: f32,
    pub animation_duration: Duration,
    /// Panorama this marker navigates to; lookup only.
    pub to_panorama: Option<PanoramaId>,
    transition: Option<(Directive, Tween)>,
}

impl Infospot {
    pub fn new(size: f32, image_url: impl Into<String>) -> Self {
        Self {
            id: HotspotId::new(),
            size,
            image_url: image_url.into(),
            visible: false,
            opacity: 0.0,
            animation_duration: Duration::from_millis(500),
            to_panorama: None,
            transition: None,
        }
    }

    pub fn directive(&self) -> Option<Directive> {
        self.transition.as_ref().map(|(d, _)| *d)
    }

    /// Replaces any directive still in flight.
    pub fn show(&mut self, delay: Duration) {
        self.schedule(Directive::Show, 1.0, delay);
    }

    pub fn hide(&mut self, delay: Duration) {
        self.schedule(Directive::Hide, 0.0, delay);
    }

    fn schedule(&mut self, directive: Directive, target: f32, delay: Duration) {
        let tween = Tween::new(self.opacity, target, self.animation_duration)
            .with_delay(delay)
            .with_easing(Easing::QuarticOut);
        self.transition = Some((directive, tween));
    }

    pub fn update(&mut self, dt: Duration) {
        let Some((directive, tween)) = self.transition.as_mut() else {
            return;
        };

        let step = tween.advance(dt);
        if step.started && *directive == Directive::Show {
            self.visible = true;
        }
        self.opacity = step.value;

        if step.completed {
            if *directive == Directive::Hide {
                self.visible = false;
            }
            self.transition = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_waits_for_delay() {
        let mut spot = Infospot::new(300.0, "icon.png");
        spot.show(Duration::from_millis(500));
        assert_eq!(spot.directive(), Some(Directive::Show));

        spot.update(Duration::from_millis(400));
        assert!(!spot.visible);

        spot.update(Duration::from_millis(100));
        assert!(spot.visible);

        spot.update(Duration::from_millis(500));
        assert_eq!(spot.opacity, 1.0);
        assert_eq!(spot.directive(), None);
    }

    #[test]
    fn hide_replaces_pending_show() {
        let mut spot = Infospot::new(300.0, "icon.png");
        spot.show(Duration::from_millis(500));
        spot.hide(Duration::ZERO);
        assert_eq!(spot.directive(), Some(Directive::Hide));

        spot.update(Duration::from_millis(600));
        assert!(!spot.visible);
        assert_eq!(spot.opacity, 0.0);
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(Infospot::new(1.0, "a").id, Infospot::new(1.0, "a").id);
    }
}
