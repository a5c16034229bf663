use bytemuck::{Pod, Zeroable};
use campfire_scene::Shape;
use glam::Vec3;
use std::f32::consts::TAU;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Which GPU mesh a shape draws with. Cylinder radius and height are folded
/// into the instance transform, so only the segment count needs its own mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum MeshKind {
    Cube,
    Quad,
    Cylinder(u32),
}

impl MeshKind {
    pub fn of(shape: &Shape) -> Self {
        match *shape {
            Shape::Cube => MeshKind::Cube,
            Shape::Quad => MeshKind::Quad,
            Shape::Cylinder { segments, .. } => MeshKind::Cylinder(segments.max(3)),
        }
    }

    pub fn build(self) -> (Vec<Vertex>, Vec<u16>) {
        match self {
            MeshKind::Cube => cube_mesh(),
            MeshKind::Quad => quad_mesh(),
            MeshKind::Cylinder(segments) => cylinder_mesh(segments),
        }
    }
}

/// Scale that turns the unit mesh of `shape` into its real size.
pub(crate) fn shape_scale(shape: &Shape) -> Vec3 {
    match *shape {
        Shape::Cylinder { radius, height, .. } => Vec3::new(radius, height, radius),
        Shape::Cube | Shape::Quad => Vec3::ONE,
    }
}

/// Unit cube vertices and indices.
pub(crate) fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let p = 0.5_f32;
    #[rustfmt::skip]
    let vertices = vec![
        // +Z face
        Vertex { position: [-p, -p,  p], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [ p, -p,  p], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [ p,  p,  p], normal: [0.0, 0.0, 1.0] },
        Vertex { position: [-p,  p,  p], normal: [0.0, 0.0, 1.0] },
        // -Z face
        Vertex { position: [ p, -p, -p], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [-p, -p, -p], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [-p,  p, -p], normal: [0.0, 0.0, -1.0] },
        Vertex { position: [ p,  p, -p], normal: [0.0, 0.0, -1.0] },
        // +X face
        Vertex { position: [ p, -p,  p], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ p, -p, -p], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ p,  p, -p], normal: [1.0, 0.0, 0.0] },
        Vertex { position: [ p,  p,  p], normal: [1.0, 0.0, 0.0] },
        // -X face
        Vertex { position: [-p, -p, -p], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-p, -p,  p], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-p,  p,  p], normal: [-1.0, 0.0, 0.0] },
        Vertex { position: [-p,  p, -p], normal: [-1.0, 0.0, 0.0] },
        // +Y face
        Vertex { position: [-p,  p,  p], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [ p,  p,  p], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [ p,  p, -p], normal: [0.0, 1.0, 0.0] },
        Vertex { position: [-p,  p, -p], normal: [0.0, 1.0, 0.0] },
        // -Y face
        Vertex { position: [-p, -p, -p], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [ p, -p, -p], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [ p, -p,  p], normal: [0.0, -1.0, 0.0] },
        Vertex { position: [-p, -p,  p], normal: [0.0, -1.0, 0.0] },
    ];
    #[rustfmt::skip]
    let indices: Vec<u16> = vec![
        0,1,2, 2,3,0,       // +Z
        4,5,6, 6,7,4,       // -Z
        8,9,10, 10,11,8,    // +X
        12,13,14, 14,15,12, // -X
        16,17,18, 18,19,16, // +Y
        20,21,22, 22,23,20, // -Y
    ];
    (vertices, indices)
}

/// Unit quad in the XY plane facing +Z.
pub(crate) fn quad_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let p = 0.5_f32;
    let n = [0.0, 0.0, 1.0];
    let vertices = vec![
        Vertex { position: [-p, -p, 0.0], normal: n },
        Vertex { position: [p, -p, 0.0], normal: n },
        Vertex { position: [p, p, 0.0], normal: n },
        Vertex { position: [-p, p, 0.0], normal: n },
    ];
    (vertices, vec![0, 1, 2, 2, 3, 0])
}

/// Capped cylinder of radius 1 and height 1 standing on the Y axis,
/// centered on the origin.
pub(crate) fn cylinder_mesh(segments: u32) -> (Vec<Vertex>, Vec<u16>) {
    let segments = segments.max(3);
    let h = 0.5_f32;
    let ring = |i: u32| {
        let a = i as f32 / segments as f32 * TAU;
        (a.sin(), a.cos())
    };

    let mut vertices = Vec::with_capacity((segments as usize + 1) * 4 + 2);
    let mut indices = Vec::with_capacity(segments as usize * 12);

    // Side: duplicate the seam vertex so normals stay smooth.
    for i in 0..=segments {
        let (x, z) = ring(i);
        vertices.push(Vertex { position: [x, h, z], normal: [x, 0.0, z] });
        vertices.push(Vertex { position: [x, -h, z], normal: [x, 0.0, z] });
    }
    for i in 0..segments {
        let top = (i * 2) as u16;
        let bottom = top + 1;
        let next_top = top + 2;
        let next_bottom = top + 3;
        indices.extend_from_slice(&[top, bottom, next_top, bottom, next_bottom, next_top]);
    }

    for (y, ny) in [(h, 1.0_f32), (-h, -1.0)] {
        let center = vertices.len() as u16;
        vertices.push(Vertex { position: [0.0, y, 0.0], normal: [0.0, ny, 0.0] });
        let start = vertices.len() as u16;
        for i in 0..=segments {
            let (x, z) = ring(i);
            vertices.push(Vertex { position: [x, y, z], normal: [0.0, ny, 0.0] });
        }
        for i in 0..segments as u16 {
            let a = start + i;
            let b = a + 1;
            if ny > 0.0 {
                indices.extend_from_slice(&[center, a, b]);
            } else {
                indices.extend_from_slice(&[center, b, a]);
            }
        }
    }

    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_normal(v: &[Vertex], tri: &[u16]) -> Vec3 {
        let a = Vec3::from(v[tri[0] as usize].position);
        let b = Vec3::from(v[tri[1] as usize].position);
        let c = Vec3::from(v[tri[2] as usize].position);
        (b - a).cross(c - a)
    }

    /// Counter-clockwise winding: every triangle's geometric normal agrees
    /// with its vertex normals, so back-face culling keeps the outside.
    fn assert_outward_winding(vertices: &[Vertex], indices: &[u16]) {
        for tri in indices.chunks(3) {
            let n = face_normal(vertices, tri);
            let vn = Vec3::from(vertices[tri[0] as usize].normal);
            assert!(n.dot(vn) > 0.0, "triangle {tri:?} faces inward");
        }
    }

    #[test]
    fn cube_counts_and_winding() {
        let (v, i) = cube_mesh();
        assert_eq!(v.len(), 24);
        assert_eq!(i.len(), 36);
        assert_outward_winding(&v, &i);
    }

    #[test]
    fn quad_faces_camera() {
        let (v, i) = quad_mesh();
        assert_eq!(v.len(), 4);
        assert_eq!(i.len(), 6);
        assert_outward_winding(&v, &i);
    }

    #[test]
    fn cylinder_counts_and_winding() {
        let (v, i) = cylinder_mesh(30);
        assert_eq!(v.len(), 31 * 2 + 2 * 32);
        assert_eq!(i.len(), 30 * 12);
        assert_outward_winding(&v, &i);
        assert!(i.iter().all(|&ix| (ix as usize) < v.len()));
    }

    #[test]
    fn cylinder_segments_floor_at_three() {
        let (_, i) = cylinder_mesh(1);
        assert_eq!(i.len(), 3 * 12);
    }

    #[test]
    fn cylinder_shapes_share_mesh_by_segments() {
        let a = Shape::Cylinder { radius: 0.3, height: 4.0, segments: 30 };
        let b = Shape::Cylinder { radius: 0.25, height: 0.1, segments: 30 };
        assert_eq!(MeshKind::of(&a), MeshKind::of(&b));
        assert_eq!(shape_scale(&a), Vec3::new(0.3, 4.0, 0.3));
        assert_eq!(shape_scale(&Shape::Cube), Vec3::ONE);
    }
}
