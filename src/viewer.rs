// viewer.rs - owns panoramas and performs the scene switches they request

use crate::config::PanoramaConfig;
use crate::error::{PanoramaError, Result};
use crate::event::{EventKind, PanoramaEvent, ViewerRequest};
use crate::panorama::{Panorama, PanoramaId};
use crate::quality;
use log::{debug, info, warn};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct Viewer {
    pub config: PanoramaConfig,
    panoramas: Vec<Panorama>,
    active: Option<PanoramaId>,
    requests: Rc<RefCell<VecDeque<ViewerRequest>>>,
}

impl Viewer {
    pub fn new(config: PanoramaConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Takes ownership and subscribes to the panorama's viewer requests.
    pub fn add(&mut self, mut panorama: Panorama) -> PanoramaId {
        let queue = self.requests.clone();
        panorama.add_event_listener(EventKind::ViewerHandler, move |event| {
            if let PanoramaEvent::ViewerHandler(request) = event {
                queue.borrow_mut().push_back(*request);
            }
        });

        let id = panorama.id;
        self.panoramas.push(panorama);
        id
    }

    pub fn panoramas(&self) -> &[Panorama] {
        &self.panoramas
    }

    pub fn active(&self) -> Option<PanoramaId> {
        self.active
    }

    fn index_of(&self, id: PanoramaId) -> Result<usize> {
        self.panoramas
            .iter()
            .position(|p| p.id == id)
            .ok_or(PanoramaError::UnknownPanorama(id))
    }

    pub fn panorama(&self, id: PanoramaId) -> Option<&Panorama> {
        self.panoramas.iter().find(|p| p.id == id)
    }

    pub fn panorama_mut(&mut self, id: PanoramaId) -> Option<&mut Panorama> {
        self.panoramas.iter_mut().find(|p| p.id == id)
    }

    /// Links `from` to `to` (and back). Coincident panoramas are logged and skipped
    /// by the panorama itself; only unknown ids are errors here.
    pub fn link(&mut self, from: PanoramaId, to: PanoramaId) -> Result<()> {
        let a = self.index_of(from)?;
        let b = self.index_of(to)?;
        if a == b {
            warn!("refusing to link panorama {from:?} to itself");
            return Err(PanoramaError::NoIntersection);
        }

        let (first, second) = if a < b {
            let (left, right) = self.panoramas.split_at_mut(b);
            (&mut left[a], &mut right[0])
        } else {
            let (left, right) = self.panoramas.split_at_mut(a);
            (&mut right[0], &mut left[b])
        };
        first.link(second, false);
        Ok(())
    }

    pub fn set_panorama(&mut self, id: PanoramaId) -> Result<()> {
        let target = self.index_of(id)?;
        if self.active == Some(id) {
            return Ok(());
        }

        if let Some(current) = self.active.and_then(|a| self.index_of(a).ok()) {
            self.panoramas[current].on_leave();
        }

        let panorama = &mut self.panoramas[target];
        info!("switching to panorama {:?}", panorama.name);
        panorama.on_enter();
        self.active = Some(id);
        Ok(())
    }

    /// Services queued viewer requests, then ticks every panorama.
    pub fn update(&mut self, dt: Duration) {
        let pending: Vec<ViewerRequest> = self.requests.borrow_mut().drain(..).collect();
        for request in pending {
            debug!("viewer request {}", request.method());
            match request {
                ViewerRequest::SetPanorama(id) => {
                    if let Err(err) = self.set_panorama(id) {
                        warn!("{err}");
                    }
                }
            }
        }

        for panorama in &mut self.panoramas {
            panorama.update(dt);
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        debug!("viewport resized to {width}x{height}");
        quality::set_viewport_width(width as f32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::mesh::SphereGeometry;
    use crate::panorama::TransitionState;
    use glam::Vec3;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn tour() -> (Viewer, PanoramaId, PanoramaId) {
        let mut viewer = Viewer::new(PanoramaConfig::default());
        let a = viewer.add(
            Panorama::new(SphereGeometry::new(100.0), Material::transparent()).with_name("hall"),
        );
        let b = viewer.add(
            Panorama::new(SphereGeometry::new(100.0), Material::transparent())
                .with_name("garden")
                .with_position(Vec3::new(0.0, 0.0, -250.0)),
        );
        viewer.link(a, b).unwrap();
        (viewer, a, b)
    }

    #[test]
    fn link_through_viewer_is_symmetric() {
        let (viewer, a, b) = tour();
        assert_eq!(viewer.panorama(a).unwrap().linked_spots().len(), 1);
        assert_eq!(viewer.panorama(b).unwrap().linked_spots().len(), 1);
    }

    #[test]
    fn unknown_and_self_links_are_rejected() {
        let (mut viewer, a, _) = tour();
        let stranger = PanoramaId::new();
        assert!(matches!(
            viewer.link(a, stranger),
            Err(PanoramaError::UnknownPanorama(id)) if id == stranger
        ));
        assert!(viewer.link(a, a).is_err());
        assert!(viewer.set_panorama(stranger).is_err());
    }

    #[test]
    fn clicking_a_marker_switches_scene() {
        let (mut viewer, a, b) = tour();
        viewer.set_panorama(a).unwrap();
        viewer.update(ms(500));
        viewer.update(ms(500));
        assert_eq!(
            viewer.panorama(a).unwrap().state(),
            TransitionState::Visible
        );

        let hall = viewer.panorama_mut(a).unwrap();
        let marker = hall.linked_spots()[0];
        assert!(hall.activate_hotspot(marker));
        assert_eq!(viewer.active(), Some(a));

        viewer.update(ms(0));
        assert_eq!(viewer.active(), Some(b));
        assert_eq!(
            viewer.panorama(a).unwrap().state(),
            TransitionState::Leaving
        );
        assert_eq!(
            viewer.panorama(b).unwrap().state(),
            TransitionState::Entering
        );

        viewer.update(ms(500));
        viewer.update(ms(500));
        assert!(!viewer.panorama(a).unwrap().visible);
        assert!(viewer.panorama(b).unwrap().visible);
        assert!(viewer.panorama(b).unwrap().is_loaded());
    }

    #[test]
    fn switching_to_active_is_a_no_op() {
        let (mut viewer, a, _) = tour();
        viewer.set_panorama(a).unwrap();
        viewer.set_panorama(a).unwrap();
        viewer.update(ms(500));
        assert_eq!(
            viewer.panorama(a).unwrap().state(),
            TransitionState::Entering
        );
    }
}
