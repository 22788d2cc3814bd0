// lib.rs - panorama scene node for an interactive 360° viewer
//
// The node linking and enter/leave transitions live in `panorama`; the other
// modules are the small scene-graph, tween and event layers it runs on.

pub mod config;
pub mod error;
pub mod event;
pub mod infospot;
pub mod material;
pub mod mesh;
pub mod object;
pub mod panorama;
pub mod quality;
pub mod tween;
pub mod viewer;

pub use config::{IntersectionPolicy, PanoramaConfig};
pub use error::PanoramaError;
pub use event::{EventKind, PanoramaEvent, ViewerRequest};
pub use infospot::{HotspotId, Infospot};
pub use material::{Material, Texture};
pub use mesh::{Geometry, SphereGeometry};
pub use object::Object3D;
pub use panorama::{Panorama, PanoramaId, TransitionState};
pub use quality::ImageQuality;
pub use viewer::Viewer;
