//! Tube sweep for stem paths
//!
//! Samples a [`StemPath`] along its length and sweeps a circle around it,
//! producing an indexed triangle mesh with per-vertex colors. The vertex
//! layout is `#[repr(C)]` and `Pod` so a GPU substrate can upload it as is.

use super::stem::StemPath;
use crate::foundation::math::{constants, Vec3};
use bytemuck::{Pod, Zeroable};

/// Default number of rings along a stem
pub const DEFAULT_TUBE_SAMPLES: usize = 64;

/// Default number of vertices around each ring
pub const DEFAULT_RADIAL_SEGMENTS: usize = 8;

/// Default tube radius in model units
pub const DEFAULT_TUBE_RADIUS: f32 = 0.03;

/// Stem tube vertex
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TubeVertex {
    /// Position in model space
    pub position: [f32; 3],
    /// Outward normal
    pub normal: [f32; 3],
    /// Linear RGB color
    pub color: [f32; 3],
}

/// Indexed tube mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TubeMesh {
    /// Vertices, ring by ring
    pub vertices: Vec<TubeVertex>,
    /// Triangle list indices
    pub indices: Vec<u32>,
}

impl TubeMesh {
    /// Raw vertex bytes for buffer upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index bytes for buffer upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Sweep a tube of `radius` around `path`
///
/// `samples` rings are placed along the path (at least 2) and each ring has
/// `radial_segments` vertices (at least 3). Ring colors are the path's
/// piecewise-linear color with the brightness pulse for `elapsed` applied.
pub fn sweep_tube(
    path: &StemPath,
    samples: usize,
    radial_segments: usize,
    radius: f32,
    elapsed: f32,
) -> TubeMesh {
    let samples = samples.max(2);
    let radial = radial_segments.max(3);
    let mut vertices = Vec::with_capacity(samples * radial);
    let mut indices = Vec::with_capacity((samples - 1) * radial * 6);

    let mut previous_normal: Option<Vec3> = None;
    for ring in 0..samples {
        let t = ring as f32 / (samples - 1) as f32;
        let center = path.point_at(t);
        let tangent = path.tangent_at(t);
        let (normal, binormal) = match previous_normal {
            Some(previous) => transport_frame(&tangent, &previous),
            None => ring_frame(&tangent),
        };
        previous_normal = Some(normal);
        let color = path.pulsed_color_at(t, elapsed);

        for k in 0..radial {
            let theta = constants::TAU * k as f32 / radial as f32;
            let out = normal * theta.cos() + binormal * theta.sin();
            let position = center + out * radius;
            vertices.push(TubeVertex {
                position: position.coords.into(),
                normal: out.into(),
                color: color.into(),
            });
        }
    }

    for ring in 0..samples - 1 {
        let current = (ring * radial) as u32;
        let next = ((ring + 1) * radial) as u32;
        for k in 0..radial as u32 {
            let k_next = (k + 1) % radial as u32;
            indices.extend_from_slice(&[
                current + k, next + k, current + k_next,
                current + k_next, next + k, next + k_next,
            ]);
        }
    }

    TubeMesh { vertices, indices }
}

/// Two unit vectors perpendicular to `tangent` and to each other
///
/// Starting frame for the first ring, built from a reference axis.
fn ring_frame(tangent: &Vec3) -> (Vec3, Vec3) {
    let reference = if tangent.x.abs() < 0.9 { Vec3::x() } else { Vec3::z() };
    let normal = tangent.cross(&reference).normalize();
    let binormal = tangent.cross(&normal).normalize();
    (normal, binormal)
}

/// Carry the previous ring's normal onto the plane of `tangent`
///
/// Parallel transport: the normal only turns as much as the tangent does.
fn transport_frame(tangent: &Vec3, previous_normal: &Vec3) -> (Vec3, Vec3) {
    let projected = previous_normal - tangent * tangent.dot(previous_normal);
    if projected.norm_squared() < 1e-8 {
        return ring_frame(tangent);
    }
    let normal = projected.normalize();
    let binormal = tangent.cross(&normal).normalize();
    (normal, binormal)
}
