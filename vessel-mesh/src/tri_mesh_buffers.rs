//! # Triangle Buffer Conversion
//!
//! Helper for turning an assembled [`QuadMesh`] into triangle mesh buffers for
//! use with realtime rendering.
use itertools::Itertools;
use slice_of_array::prelude::*;

use crate::{Result, mesh::QuadMesh};

static EPSILON: f32 = 0.00000001;

type Vector = ultraviolet::vec::Vec3;
type Normal = Vector;
type Point = Vector;

/// Returns a flat [`u32`] triangle index buffer and two, flat matching point
/// and normal buffers.
///
/// All the faces are disconnected. I.e. points & normals are duplicated for
/// each shared vertex. Quads are split along their shorter diagonal.
pub fn to_triangle_mesh_buffers(
    mesh: &QuadMesh,
) -> Result<(Vec<u32>, Vec<[f32; 3]>, Vec<[f32; 3]>)> {
    #[cfg(feature = "topology_validation")]
    mesh.validate()?;

    let vertices = mesh
        .flat_points()
        .iter()
        .map(|coordinate| *coordinate as f32)
        .collect_vec();
    let points_nested = vertices.nest::<[_; 3]>();

    let (points, normals): (Vec<[f32; 3]>, Vec<[f32; 3]>) = mesh
        .flat_indices()
        .chunks_exact(4)
        .flat_map(|face| {
            let corners = index_as_points(face, points_nested);
            let mut corners = corners
                .iter()
                .circular_tuple_windows::<(_, _, _)>()
                .map(|(previous, point, next)| {
                    let normal = orthogonal(previous, point, next);
                    let mag_sq = normal.mag_sq();

                    // Collinear edges: fall back to the face average.
                    let normal = if mag_sq < EPSILON {
                        face_normal(&corners).unwrap_or_else(Vector::zero)
                    } else {
                        normal / mag_sq.sqrt()
                    };

                    (
                        [point.x, point.y, point.z],
                        [normal.x, normal.y, normal.z],
                    )
                })
                .collect_vec();
            // Windows are centred on the next corner, put corner 0 first again.
            corners.rotate_right(1);
            corners
        })
        .unzip();

    let triangle_index = points
        .as_slice()
        .nest::<[_; 4]>()
        .iter()
        .zip((0u32..).step_by(4))
        .flat_map(|(corners, base)| {
            let p = corners.map(|[x, y, z]| Point::new(x, y, z));

            // Shorter diagonal keeps the triangles closest to equilateral.
            if (p[0] - p[2]).mag_sq() <= (p[1] - p[3]).mag_sq() {
                [base, base + 1, base + 2, base, base + 2, base + 3]
            } else {
                [base + 1, base + 2, base + 3, base + 1, base + 3, base]
            }
        })
        .collect();

    Ok((triangle_index, points, normals))
}

#[inline]
fn orthogonal(v0: &Point, v1: &Point, v2: &Point) -> Vector {
    (*v1 - *v0).cross(*v2 - *v1)
}

#[inline]
fn index_as_points(face: &[u32], points: &[[f32; 3]]) -> Vec<Point> {
    face.iter()
        .map(|index| {
            let [x, y, z] = points[*index as usize];
            Point::new(x, y, z)
        })
        .collect()
}

/// Average unit normal of a possibly non-planar face. `None` if every corner
/// is degenerate.
#[inline]
fn face_normal(points: &[Point]) -> Option<Normal> {
    let (sum, count) = points
        .iter()
        .circular_tuple_windows::<(_, _, _)>()
        .map(|(v0, v1, v2)| orthogonal(v0, v1, v2))
        .filter(|normal| EPSILON <= normal.mag_sq())
        .fold((Vector::zero(), 0), |(sum, count), normal| {
            (sum + normal / normal.mag_sq().sqrt(), count + 1)
        });

    if 0 == count {
        None
    } else {
        Some(sum / count as f32)
    }
}
