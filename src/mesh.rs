// mesh.rs - panorama geometry: rays, analytic sphere, tessellated sphere mesh

use glam::Vec3;

const EPSILON: f32 = 1e-6;

/// A ray with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Returns `None` when `direction` has no usable length (e.g. two coincident points).
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Möller-Trumbore, double sided. Returns the distance along the ray.
    pub fn intersect_triangle(&self, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        let h = self.direction.cross(edge2);
        let det = edge1.dot(h);
        if det.abs() < EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = self.origin - v0;
        let u = inv_det * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = inv_det * self.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = inv_det * edge2.dot(q);
        (t > EPSILON).then_some(t)
    }
}

/// What a panorama needs from its geometry. Intersections are in the geometry's
/// local space, sorted near to far, and include back faces.
pub trait Geometry: std::fmt::Debug {
    /// Declared radius parameter, if the geometry has one.
    fn radius(&self) -> Option<f32> {
        None
    }

    fn intersect_ray(&self, ray: &Ray) -> Vec<Vec3>;
}

/// Analytic sphere centered on the local origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereGeometry {
    pub radius: f32,
    pub width_segments: usize,
    pub height_segments: usize,
}

impl SphereGeometry {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            width_segments: 60,
            height_segments: 40,
        }
    }

    /// Triangulated version of this sphere, for renderers that need vertex data.
    pub fn to_mesh(&self) -> SphereMesh {
        build_sphere(self.radius, self.height_segments, self.width_segments)
    }
}

impl Geometry for SphereGeometry {
    fn radius(&self) -> Option<f32> {
        Some(self.radius)
    }

    fn intersect_ray(&self, ray: &Ray) -> Vec<Vec3> {
        // |o + t*d|^2 = r^2 with |d| = 1
        let b = ray.origin.dot(ray.direction);
        let c = ray.origin.length_squared() - self.radius * self.radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return Vec::new();
        }

        let root = disc.sqrt();
        let mut hits: Vec<Vec3> = [-b - root, -b + root]
            .into_iter()
            .filter(|t| *t > EPSILON)
            .map(|t| ray.point_at(t))
            .collect();
        hits.dedup_by(|a, b| a.distance_squared(*b) < EPSILON);
        hits
    }
}

#[derive(Debug, Clone)]
pub struct SphereMesh {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

pub fn build_sphere(radius: f32, lat: usize, lon: usize) -> SphereMesh {
    let mut positions = Vec::with_capacity((lat + 1) * (lon + 1));
    let mut uvs = Vec::with_capacity((lat + 1) * (lon + 1));
    let mut indices = Vec::with_capacity(lat * lon * 6);

    for i in 0..=lat {
        let theta = std::f32::consts::PI * (i as f32) / (lat as f32);
        let y = radius * theta.cos();
        let sin_t = theta.sin();

        for j in 0..=lon {
            let phi = 2.0 * std::f32::consts::PI * (j as f32) / (lon as f32);

            let x = radius * phi.cos() * sin_t;
            let z = radius * phi.sin() * sin_t;

            // u runs right to left: the sphere is viewed from the inside
            let u = 1.0 - (j as f32) / (lon as f32);
            let v = 1.0 - (i as f32) / (lat as f32);

            positions.push([x, y, z]);
            uvs.push([u, v]);
        }
    }

    for i in 0..lat {
        for j in 0..lon {
            let a = (i * (lon + 1) + j) as u32;
            let b = a + (lon + 1) as u32;

            indices.extend_from_slice(&[a, b, a + 1, b, b + 1, a + 1]);
        }
    }

    SphereMesh {
        positions,
        uvs,
        indices,
    }
}

impl SphereMesh {
    /// Bounding radius of the vertex cloud.
    pub fn bounding_radius(&self) -> f32 {
        self.positions
            .iter()
            .map(|p| Vec3::from_array(*p).length())
            .fold(0.0, f32::max)
    }
}

impl Geometry for SphereMesh {
    fn radius(&self) -> Option<f32> {
        Some(self.bounding_radius())
    }

    fn intersect_ray(&self, ray: &Ray) -> Vec<Vec3> {
        let vertex = |i: u32| Vec3::from_array(self.positions[i as usize]);

        let mut hits: Vec<f32> = self
            .indices
            .chunks_exact(3)
            .filter_map(|tri| ray.intersect_triangle(vertex(tri[0]), vertex(tri[1]), vertex(tri[2])))
            .collect();

        hits.sort_by(|a, b| a.total_cmp(b));
        hits.into_iter().map(|t| ray.point_at(t)).collect()
    }
}
