// panorama.rs - panorama scene node: transitions, hotspots, linking
//
// A panorama is always mirrored on x (scale.x == -1) so an inward-facing
// sphere shows its texture with the right winding. Everything attached under
// it has to cope with that: infospots are built for the mirrored frame, any
// other object gets wrapped in a group with scale.x == -1 to cancel it out.

use crate::config::{IntersectionPolicy, PanoramaConfig};
use crate::error::{PanoramaError, Result};
use crate::event::{EventDispatcher, EventKind, ListenerId, PanoramaEvent, ViewerRequest};
use crate::infospot::{HotspotId, Infospot};
use crate::material::{Material, Side, Texture};
use crate::mesh::{Geometry, Ray};
use crate::object::Object3D;
use crate::quality::{self, ImageQuality};
use crate::tween::{Easing, Tween};
use glam::{Affine3A, Quat, Vec3};
use log::{debug, warn};
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PanoramaId(Uuid);

impl PanoramaId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PanoramaId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionState {
    #[default]
    Hidden,
    Entering,
    Visible,
    Leaving,
}

#[derive(Debug)]
pub struct Panorama {
    pub id: PanoramaId,
    pub name: String,
    pub position: Vec3,
    pub rotation: Quat,
    scale: Vec3,
    pub visible: bool,
    geometry: Box<dyn Geometry>,
    pub material: Material,
    orbit_radius: f32,

    loaded: bool,
    is_children_visible: bool,
    linked_spots: Vec<HotspotId>,
    children: Vec<Object3D>,

    pub linking_image_url: Option<String>,
    pub linking_image_scale: Option<f32>,
    pub animation_duration: Duration,
    pub default_infospot_size: f32,
    link_icon_url: String,
    link_inset: f32,
    intersection_policy: IntersectionPolicy,

    events: EventDispatcher,
    state: TransitionState,
    transition: Option<Tween>,
    fade: Option<Tween>,
}

impl Panorama {
    pub fn new(geometry: impl Geometry + 'static, material: Material) -> Self {
        Self::with_config(geometry, material, &PanoramaConfig::default())
    }

    pub fn with_config(
        geometry: impl Geometry + 'static,
        mut material: Material,
        config: &PanoramaConfig,
    ) -> Self {
        material.side = Side::Double;
        material.visible = false;

        let orbit_radius = geometry.radius().unwrap_or(config.default_orbit_radius);

        Self {
            id: PanoramaId::new(),
            name: String::new(),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::new(-1.0, 1.0, 1.0),
            visible: false,
            geometry: Box::new(geometry),
            material,
            orbit_radius,
            loaded: false,
            is_children_visible: false,
            linked_spots: Vec::new(),
            children: Vec::new(),
            linking_image_url: None,
            linking_image_scale: None,
            animation_duration: config.animation_duration(),
            default_infospot_size: config.default_infospot_size,
            link_icon_url: config.link_icon_url.clone(),
            link_inset: config.link_inset,
            intersection_policy: config.intersection_policy,
            events: EventDispatcher::new(),
            state: TransitionState::Hidden,
            transition: None,
            fade: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn orbit_radius(&self) -> f32 {
        self.orbit_radius
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_children_visible(&self) -> bool {
        self.is_children_visible
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn children(&self) -> &[Object3D] {
        &self.children
    }

    /// Markers created by this panorama's own `link` calls, oldest first.
    pub fn linked_spots(&self) -> &[HotspotId] {
        &self.linked_spots
    }

    pub fn find_infospot(&self, id: HotspotId) -> Option<&Infospot> {
        self.children.iter().find_map(|c| c.find_infospot(id))
    }

    /// Opacity the material is currently fading toward, if a fade is running.
    pub fn fade_target(&self) -> Option<f32> {
        self.fade.as_ref().map(Tween::target)
    }

    pub fn world_matrix(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// World position of a hotspot anywhere under this panorama.
    pub fn world_position_of(&self, id: HotspotId) -> Option<Vec3> {
        fn walk(object: &Object3D, parent: Affine3A, id: HotspotId) -> Option<Vec3> {
            let local = Affine3A::from_scale_rotation_translation(
                object.scale,
                Quat::IDENTITY,
                object.position,
            );
            let world = parent * local;
            if object.as_infospot().is_some_and(|s| s.id == id) {
                return Some(world.translation.into());
            }
            object.children.iter().find_map(|c| walk(c, world, id))
        }

        let root = self.world_matrix();
        self.children.iter().find_map(|c| walk(c, root, id))
    }

    // ---- events ----

    pub fn add_event_listener<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&PanoramaEvent) + 'static,
    {
        self.events.add_listener(kind, listener)
    }

    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.events.remove_listener(id)
    }

    fn dispatch_event(&mut self, event: PanoramaEvent) {
        // every load ends in a fade-in, whoever triggered it
        if event == PanoramaEvent::Load {
            self.fade_in();
        }
        self.events.dispatch(&event);
    }

    // ---- hierarchy ----

    pub fn add(&mut self, object: Object3D) -> &mut Self {
        debug_assert!(self.scale.x < 0.0, "panorama lost its x mirror");

        let attached = if object.is_infospot() {
            object
        } else {
            let mut wrapper = Object3D::new("mirror-compensation");
            wrapper.scale.x = -1.0;
            wrapper.add(object);
            wrapper
        };

        self.children.push(attached);
        self
    }

    pub fn add_all(&mut self, objects: impl IntoIterator<Item = Object3D>) -> &mut Self {
        for object in objects {
            self.add(object);
        }
        self
    }

    /// Drops every child, link markers included.
    pub fn reset(&mut self) {
        debug!(
            "panorama {:?}: reset, dropping {} children",
            self.name,
            self.children.len()
        );
        self.children.clear();
        self.linked_spots.clear();
    }

    fn for_each_infospot(&mut self, mut f: impl FnMut(&mut Infospot)) {
        for child in &mut self.children {
            child.traverse_mut(&mut |o| {
                if let Some(spot) = o.as_infospot_mut() {
                    f(spot);
                }
            });
        }
    }

    /// `force` wins; without it the current state flips.
    pub fn toggle_children_visibility(&mut self, force: Option<bool>, delay: Duration) {
        let visible = force.unwrap_or(!self.is_children_visible);

        self.for_each_infospot(|spot| {
            if visible {
                spot.show(delay);
            } else {
                spot.hide(delay);
            }
        });

        self.is_children_visible = visible;
    }

    // ---- loading ----

    pub fn load(&mut self) {
        self.on_load();
    }

    pub fn on_load(&mut self) {
        self.toggle_children_visibility(Some(true), Duration::ZERO);
        self.loaded = true;
        debug!("panorama {:?}: loaded", self.name);
        self.dispatch_event(PanoramaEvent::Load);
    }

    pub fn on_progress(&mut self, progress: f32) {
        self.dispatch_event(PanoramaEvent::Progress(progress));
    }

    pub fn on_error(&mut self) {
        self.dispatch_event(PanoramaEvent::Error);
    }

    pub fn get_zoom_level(&self) -> ImageQuality {
        quality::current_zoom_level()
    }

    pub fn update_texture(&mut self, texture: Texture) {
        self.material.map = Some(texture);
        self.material.needs_update = true;
    }

    // ---- linking ----

    pub fn set_linking_image(&mut self, url: impl Into<String>, scale: f32) {
        self.linking_image_url = Some(url.into());
        self.linking_image_scale = Some(scale);
    }

    /// World-space hits of a world-space ray against this panorama's own
    /// geometry, near to far. Hidden panoramas are never hit.
    pub fn raycast(&self, origin: Vec3, direction: Vec3) -> Vec<Vec3> {
        if !self.visible {
            return Vec::new();
        }

        let world = self.world_matrix();
        let inverse = world.inverse();
        let Some(local_ray) = Ray::new(
            inverse.transform_point3(origin),
            inverse.transform_vector3(direction),
        ) else {
            return Vec::new();
        };

        let mut hits: Vec<Vec3> = self
            .geometry
            .intersect_ray(&local_ray)
            .into_iter()
            .map(|p| world.transform_point3(p))
            .collect();
        hits.sort_by(|a, b| a.distance_squared(origin).total_cmp(&b.distance_squared(origin)));
        hits
    }

    /// Point on this panorama's surface in the direction of `target`, pulled
    /// slightly toward the center.
    pub fn link_point(&self, target: Vec3) -> Result<Vec3> {
        let direction = target - self.position;
        if direction.try_normalize().is_none() {
            return Err(PanoramaError::NoIntersection);
        }

        let hits = self.raycast(self.position, direction);
        let hit = self
            .intersection_policy
            .pick(&hits)
            .ok_or(PanoramaError::NoIntersection)?;

        Ok(self.position + (hit - self.position) * self.link_inset)
    }

    /// Places a marker on this panorama that asks the viewer to switch to
    /// `other`, then links back unless this already is the return leg.
    pub fn link(&mut self, other: &mut Panorama, is_return_trip: bool) {
        let was_visible = self.visible;
        self.visible = true;

        let point = match self.link_point(other.position) {
            Ok(point) => point,
            Err(err) => {
                warn!("{err} ({:?} -> {:?})", self.name, other.name);
                self.visible = was_visible;
                return;
            }
        };

        let mut spot = Infospot::new(
            other
                .linking_image_scale
                .unwrap_or(self.default_infospot_size),
            other
                .linking_image_url
                .clone()
                .unwrap_or_else(|| self.link_icon_url.clone()),
        );
        spot.to_panorama = Some(other.id);
        spot.animation_duration = self.animation_duration;
        let spot_id = spot.id;

        let mut marker = Object3D::from_infospot(spot);
        marker.position = self.world_matrix().inverse().transform_point3(point);

        self.linked_spots.push(spot_id);
        self.add(marker);

        self.visible = false;

        if !is_return_trip {
            other.link(self, true);
        }
    }

    /// Delivers a click on one of this panorama's hotspots. Returns `true`
    /// when the hotspot was a link marker and a scene switch was requested.
    pub fn activate_hotspot(&mut self, id: HotspotId) -> bool {
        let Some(target) = self.find_infospot(id).and_then(|s| s.to_panorama) else {
            return false;
        };
        self.dispatch_event(PanoramaEvent::ViewerHandler(ViewerRequest::SetPanorama(
            target,
        )));
        true
    }

    // ---- transitions ----

    fn start_fade(&mut self, to: f32) {
        self.fade = Some(
            Tween::new(self.material.opacity, to, self.animation_duration)
                .with_easing(Easing::QuarticOut),
        );
    }

    pub fn fade_in(&mut self) {
        self.start_fade(1.0);
    }

    pub fn fade_out(&mut self) {
        self.start_fade(0.0);
    }

    /// Emits `enter` now; the visible part starts after one animation duration.
    /// Cancels whatever transition or fade is still pending.
    pub fn on_enter(&mut self) {
        self.fade = None;
        self.state = TransitionState::Entering;
        self.transition = Some(
            Tween::new(0.0, 1.0, self.animation_duration)
                .with_delay(self.animation_duration)
                .with_easing(Easing::QuarticOut),
        );
        self.dispatch_event(PanoramaEvent::Enter);
    }

    pub fn on_leave(&mut self) {
        self.fade = None;
        self.state = TransitionState::Leaving;
        self.transition = Some(
            Tween::new(0.0, 1.0, self.animation_duration).with_easing(Easing::QuarticOut),
        );
        self.dispatch_event(PanoramaEvent::Leave);
    }

    fn begin_enter(&mut self) {
        self.dispatch_event(PanoramaEvent::EnterStart);

        if self.loaded {
            self.fade_in();
            self.toggle_children_visibility(Some(true), self.animation_duration);
        } else {
            self.load();
        }

        self.visible = true;
        self.material.visible = true;
    }

    fn begin_leave(&mut self) {
        self.fade_out();
        self.toggle_children_visibility(Some(false), Duration::ZERO);
    }

    fn finish_leave(&mut self) {
        self.visible = false;
        // back on, so the next fade-in starts from visible-but-transparent
        self.material.visible = true;
        debug!("panorama {:?}: hidden", self.name);
    }

    /// Advances fades, hotspot animations and the transition state machine.
    /// Work started during this call first moves on the next one.
    pub fn update(&mut self, dt: Duration) {
        if let Some(fade) = self.fade.as_mut() {
            let step = fade.advance(dt);
            self.material.opacity = step.value;
            if step.completed {
                self.fade = None;
            }
        }

        self.for_each_infospot(|spot| spot.update(dt));

        let Some(mut transition) = self.transition.take() else {
            return;
        };
        let step = transition.advance(dt);

        if step.started {
            match self.state {
                TransitionState::Entering => self.begin_enter(),
                TransitionState::Leaving => self.begin_leave(),
                TransitionState::Hidden | TransitionState::Visible => {}
            }
        }

        if step.completed {
            match self.state {
                TransitionState::Entering => self.state = TransitionState::Visible,
                TransitionState::Leaving => {
                    self.finish_leave();
                    self.state = TransitionState::Hidden;
                }
                TransitionState::Hidden | TransitionState::Visible => {}
            }
        } else {
            self.transition = Some(transition);
        }
    }
}
