use ultraviolet::Vec3;

/// Извлекает 6 плоскостей frustum из view-projection матрицы
/// Каждая плоскость: (nx, ny, nz, d) где nx*x + ny*y + nz*z + d >= 0 означает "внутри"
pub fn extract_frustum_planes(vp: &[[f32; 4]; 4]) -> [[f32; 4]; 6] {
    let m = vp;
    [
        // Left:   row3 + row0
        [m[0][3] + m[0][0], m[1][3] + m[1][0], m[2][3] + m[2][0], m[3][3] + m[3][0]],
        // Right:  row3 - row0
        [m[0][3] - m[0][0], m[1][3] - m[1][0], m[2][3] - m[2][0], m[3][3] - m[3][0]],
        // Bottom: row3 + row1
        [m[0][3] + m[0][1], m[1][3] + m[1][1], m[2][3] + m[2][1], m[3][3] + m[3][1]],
        // Top:    row3 - row1
        [m[0][3] - m[0][1], m[1][3] - m[1][1], m[2][3] - m[2][1], m[3][3] - m[3][1]],
        // Near/far для z в [0, 1]: row2 и row3 - row2 (верно и для reversed-Z)
        [m[0][2], m[1][2], m[2][2], m[3][2]],
        [m[0][3] - m[0][2], m[1][3] - m[1][2], m[2][3] - m[2][2], m[3][3] - m[3][2]],
    ]
}

/// Проверяет, находится ли AABB полностью снаружи плоскости frustum
fn is_aabb_outside_plane(plane: &[f32; 4], min: Vec3, max: Vec3) -> bool {
    let px = if plane[0] >= 0.0 { max.x } else { min.x };
    let py = if plane[1] >= 0.0 { max.y } else { min.y };
    let pz = if plane[2] >= 0.0 { max.z } else { min.z };

    plane[0] * px + plane[1] * py + plane[2] * pz + plane[3] < 0.0
}

/// Frustum culling: видим ли AABB хотя бы частично
pub fn is_aabb_visible(view_proj: &[[f32; 4]; 4], min: Vec3, max: Vec3) -> bool {
    let planes = extract_frustum_planes(view_proj);
    !planes.iter().any(|plane| is_aabb_outside_plane(plane, min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::camera::Camera;

    fn camera_vp() -> [[f32; 4]; 4] {
        let mut camera = Camera::new(Vec3::new(0.0, 10.0, 0.0), 1.0);
        camera.pitch = 0.0;
        camera.view_projection_matrix().into()
    }

    #[test]
    fn test_box_in_front_is_visible() {
        let vp = camera_vp();
        assert!(is_aabb_visible(&vp, Vec3::new(-1.0, 9.0, -21.0), Vec3::new(1.0, 11.0, -19.0)));
    }

    #[test]
    fn test_box_behind_is_culled() {
        let vp = camera_vp();
        assert!(!is_aabb_visible(&vp, Vec3::new(-1.0, 9.0, 19.0), Vec3::new(1.0, 11.0, 21.0)));
    }

    #[test]
    fn test_box_beyond_far_is_culled() {
        let vp = camera_vp();
        assert!(!is_aabb_visible(&vp, Vec3::new(-1.0, 9.0, -2001.0), Vec3::new(1.0, 11.0, -1999.0)));
    }
}
