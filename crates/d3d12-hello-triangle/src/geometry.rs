use bevy_math::Mat4;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3], // x, y, z
    pub color: [f32; 4],    // r, g, b, a
}

impl Vertex {
    pub const STRIDE: u32 = std::mem::size_of::<Vertex>() as u32;
    /// Byte offset of `color`, after three position floats.
    pub const COLOR_OFFSET: u32 = std::mem::offset_of!(Vertex, color) as u32;
}

/// The sample triangle; heights are scaled by the window's aspect ratio.
pub fn triangle_vertices(aspect_ratio: f32) -> [Vertex; 3] {
    [
        Vertex {
            position: [0.0, 0.25 * aspect_ratio, 0.0],
            color: [1.0, 0.0, 0.0, 1.0],
        },
        Vertex {
            position: [0.25, -0.25 * aspect_ratio, 0.0],
            color: [0.0, 1.0, 0.0, 1.0],
        },
        Vertex {
            position: [-0.25, -0.25 * aspect_ratio, 0.0],
            color: [0.0, 0.0, 1.0, 1.0],
        },
    ]
}

/// Packs a transform into the row-major 3x4 layout of a raytracing instance desc.
///
/// `Mat4` is column-major with translation in the last column; the instance
/// desc wants the top three rows, translation in the fourth element of each.
pub fn instance_transform(transform: &Mat4) -> [f32; 12] {
    let rows = transform.transpose().to_cols_array_2d();
    let mut packed = [0.0; 12];
    for (row, values) in rows.iter().take(3).enumerate() {
        packed[row * 4..row * 4 + 4].copy_from_slice(values);
    }
    packed
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_math::Vec3;

    #[test]
    fn vertex_layout_matches_the_input_layout() {
        assert_eq!(Vertex::STRIDE, 28);
        assert_eq!(Vertex::COLOR_OFFSET, 12);
    }

    #[test]
    fn triangle_height_follows_aspect_ratio() {
        let aspect_ratio = 16.0_f32 / 9.0;
        let vertices = triangle_vertices(aspect_ratio);
        assert_eq!(vertices[0].position[1], 0.25 * aspect_ratio);
        assert_eq!(vertices[1].position[1], -0.25 * aspect_ratio);
        assert_eq!(vertices[1].position[0], 0.25);
        assert_eq!(vertices[2].position[0], -0.25);
        assert!(vertices.iter().all(|v| v.position[2] == 0.0));
    }

    #[test]
    fn triangle_is_red_green_blue_and_opaque() {
        let colors: Vec<[f32; 4]> = triangle_vertices(1.0).iter().map(|v| v.color).collect();
        assert_eq!(
            colors,
            vec![
                [1.0, 0.0, 0.0, 1.0],
                [0.0, 1.0, 0.0, 1.0],
                [0.0, 0.0, 1.0, 1.0],
            ]
        );
    }

    #[test]
    fn identity_packs_to_identity_rows() {
        assert_eq!(
            instance_transform(&Mat4::IDENTITY),
            [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0]
        );
    }

    #[test]
    fn translation_lands_in_the_fourth_column() {
        let packed = instance_transform(&Mat4::from_translation(Vec3::new(2.0, -3.0, 4.0)));
        assert_eq!(packed[3], 2.0);
        assert_eq!(packed[7], -3.0);
        assert_eq!(packed[11], 4.0);
    }
}
