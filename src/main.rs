// main.rs - headless walk through a small linked tour, driven by a fixed clock
//
// Usage: panolens-tour [--config tour.json]   (or PANOLENS_CONFIG=tour.json)
// Set RUST_LOG=debug to see every transition edge.

use glam::Vec3;
use image::{Rgba, RgbaImage};
use log::{error, info, warn};
use panolens_core::config::{resolve_config_path_from_args, PanoramaConfig};
use panolens_core::{EventKind, Material, Panorama, SphereGeometry, Viewer};
use std::sync::Arc;
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(16);

fn load_config() -> PanoramaConfig {
    let Some(path) = resolve_config_path_from_args() else {
        return PanoramaConfig::default();
    };

    match PanoramaConfig::load(&path) {
        Ok(cfg) => {
            info!("using config {:?}", path);
            cfg
        }
        Err(e) => {
            error!("{e}; falling back to defaults");
            PanoramaConfig::default()
        }
    }
}

fn build_panorama(cfg: &PanoramaConfig, name: &str, position: Vec3, tint: [u8; 4]) -> Panorama {
    let mut pano = Panorama::with_config(SphereGeometry::new(100.0), Material::transparent(), cfg)
        .with_name(name)
        .with_position(position);

    // solid placeholder texture; decoding real images is the loader's job
    pano.update_texture(Arc::new(RgbaImage::from_pixel(64, 32, Rgba(tint))));

    let label = name.to_string();
    pano.add_event_listener(EventKind::Enter, move |_| info!("enter {label}"));
    let label = name.to_string();
    pano.add_event_listener(EventKind::Load, move |_| info!("loaded {label}"));
    pano
}

fn run_for(viewer: &mut Viewer, total: Duration) {
    let mut elapsed = Duration::ZERO;
    while elapsed < total {
        viewer.update(FRAME);
        elapsed += FRAME;
    }
}

fn main() {
    env_logger::init();

    let cfg = load_config();
    let mut viewer = Viewer::new(cfg.clone());
    viewer.resize(1280, 720);

    let hall = viewer.add(build_panorama(&cfg, "hall", Vec3::ZERO, [200, 180, 150, 255]));
    let garden = viewer.add(build_panorama(
        &cfg,
        "garden",
        Vec3::new(0.0, 0.0, -300.0),
        [90, 160, 80, 255],
    ));
    let roof = viewer.add(build_panorama(
        &cfg,
        "roof",
        Vec3::new(0.0, 250.0, -300.0),
        [120, 150, 220, 255],
    ));

    for (a, b) in [(hall, garden), (garden, roof)] {
        if let Err(e) = viewer.link(a, b) {
            warn!("{e}");
        }
    }

    let settle = cfg.animation_duration() * 3;

    if let Err(e) = viewer.set_panorama(hall) {
        error!("{e}");
        return;
    }
    run_for(&mut viewer, settle);

    // follow the first marker of every panorama along the tour
    for stop in [hall, garden] {
        let Some(pano) = viewer.panorama_mut(stop) else {
            continue;
        };
        let Some(marker) = pano.linked_spots().last().copied() else {
            continue;
        };
        info!(
            "{}: clicking marker, zoom level {:?}",
            pano.name,
            pano.get_zoom_level()
        );
        pano.activate_hotspot(marker);
        run_for(&mut viewer, settle);
    }

    for pano in viewer.panoramas() {
        info!(
            "{:<8} state={:?} visible={} opacity={:.2} markers={}",
            pano.name,
            pano.state(),
            pano.visible,
            pano.material.opacity,
            pano.linked_spots().len()
        );
    }
}
