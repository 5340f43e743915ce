use nalgebra::{Matrix3, Matrix3x4, Vector3, Vector4};

use crate::control::ObjectPose;

/// カメラより手前にある点だけを投影する
const NEAR_PLANE: f32 = 0.05;

/// 頂点と辺だけのモデル
#[derive(Debug, Clone)]
pub struct Wireframe {
    pub vertices: Vec<Vector3<f32>>,
    pub edges: Vec<(usize, usize)>,
}

impl Wireframe {
    /// 原点中心の直方体
    pub fn cuboid(sx: f32, sy: f32, sz: f32) -> Self {
        let (hx, hy, hz) = (sx / 2.0, sy / 2.0, sz / 2.0);
        let vertices = (0..8)
            .map(|i| {
                Vector3::new(
                    if i & 1 == 0 { -hx } else { hx },
                    if i & 2 == 0 { -hy } else { hy },
                    if i & 4 == 0 { -hz } else { hz },
                )
            })
            .collect();
        // 1ビットだけ異なる頂点同士を結ぶ
        let mut edges = Vec::with_capacity(12);
        for a in 0..8usize {
            for bit in [1, 2, 4] {
                let b = a ^ bit;
                if a < b {
                    edges.push((a, b));
                }
            }
        }
        Self { vertices, edges }
    }

    /// 車体 + キャビンの簡易モデル
    pub fn car() -> Self {
        let mut body = Self::cuboid(2.0, 0.5, 1.0);
        let mut cabin = Self::cuboid(1.0, 0.4, 0.8);
        for v in &mut cabin.vertices {
            v.y += 0.45;
        }
        body.append(cabin);
        body
    }

    pub fn append(&mut self, other: Wireframe) {
        let offset = self.vertices.len();
        self.vertices.extend(other.vertices);
        self.edges
            .extend(other.edges.into_iter().map(|(a, b)| (a + offset, b + offset)));
    }
}

/// オイラー角（度）から回転行列 (Rz * Ry * Rx)
pub fn rotation_matrix(rotation_deg: &Vector3<f32>) -> Matrix3<f32> {
    let rx = rotation_deg.x.to_radians();
    let ry = rotation_deg.y.to_radians();
    let rz = rotation_deg.z.to_radians();

    let rot_x = Matrix3::new(
        1.0, 0.0, 0.0,
        0.0, rx.cos(), -rx.sin(),
        0.0, rx.sin(), rx.cos(),
    );
    let rot_y = Matrix3::new(
        ry.cos(), 0.0, ry.sin(),
        0.0, 1.0, 0.0,
        -ry.sin(), 0.0, ry.cos(),
    );
    let rot_z = Matrix3::new(
        rz.cos(), -rz.sin(), 0.0,
        rz.sin(), rz.cos(), 0.0,
        0.0, 0.0, 1.0,
    );
    rot_z * rot_y * rot_x
}

/// z 軸上に置いた原点向きのピンホールカメラ
///
/// シーン座標は y 上向き、カメラは負の z 側から +z 方向を見る
#[derive(Debug, Clone)]
pub struct SceneCamera {
    intrinsic: Matrix3<f32>,
}

impl SceneCamera {
    /// fov_v_deg: 垂直画角（度）
    pub fn new(fov_v_deg: f32, width: usize, height: usize) -> Self {
        let w = width as f32;
        let h = height as f32;
        let fy = h / (2.0 * (fov_v_deg.to_radians() / 2.0).tan());
        let fx = fy; // 正方ピクセルを仮定
        // 画像の y は下向きなので fy を反転
        let intrinsic = Matrix3::new(fx, 0.0, w / 2.0, 0.0, -fy, h / 2.0, 0.0, 0.0, 1.0);
        Self { intrinsic }
    }

    /// P = K * [I | t], t = -(0, 0, camera_z)
    fn projection(&self, camera_z: f32) -> Matrix3x4<f32> {
        let mut rt = Matrix3x4::zeros();
        for i in 0..3 {
            rt[(i, i)] = 1.0;
        }
        rt[(2, 3)] = -camera_z;
        self.intrinsic * rt
    }

    /// 姿勢を適用したモデルの各頂点をピクセル座標へ。カメラの後ろは None
    pub fn project(&self, model: &Wireframe, pose: &ObjectPose) -> Vec<Option<(i32, i32)>> {
        let r = rotation_matrix(&pose.rotation);
        let p = self.projection(pose.camera_distance);

        model
            .vertices
            .iter()
            .map(|v| {
                let world = r * v + pose.position;
                let uvw = p * Vector4::new(world.x, world.y, world.z, 1.0);
                if uvw.z < NEAR_PLANE {
                    return None;
                }
                Some(((uvw.x / uvw.z).round() as i32, (uvw.y / uvw.z).round() as i32))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(camera_distance: f32) -> ObjectPose {
        ObjectPose {
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
            camera_distance,
        }
    }

    fn single_point(p: Vector3<f32>) -> Wireframe {
        Wireframe {
            vertices: vec![p],
            edges: Vec::new(),
        }
    }

    #[test]
    fn test_cuboid_topology() {
        let cube = Wireframe::cuboid(1.0, 1.0, 1.0);
        assert_eq!(cube.vertices.len(), 8);
        assert_eq!(cube.edges.len(), 12);
        for (a, b) in &cube.edges {
            // 辺の長さはすべて1
            assert!(((cube.vertices[*a] - cube.vertices[*b]).norm() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_car_offsets_edges() {
        let car = Wireframe::car();
        assert_eq!(car.vertices.len(), 16);
        assert_eq!(car.edges.len(), 24);
        assert!(car.edges.iter().all(|(a, b)| *a < 16 && *b < 16));
    }

    #[test]
    fn test_origin_projects_to_center() {
        let cam = SceneCamera::new(60.0, 640, 480);
        let pts = cam.project(&single_point(Vector3::zeros()), &pose(-6.0));
        assert_eq!(pts, vec![Some((320, 240))]);
    }

    #[test]
    fn test_up_is_up_on_screen() {
        let cam = SceneCamera::new(60.0, 640, 480);
        let pts = cam.project(&single_point(Vector3::new(1.0, 1.0, 0.0)), &pose(-6.0));
        let (u, v) = pts[0].unwrap();
        assert!(u > 320);
        assert!(v < 240);
    }

    #[test]
    fn test_closer_camera_is_larger() {
        let cam = SceneCamera::new(60.0, 640, 480);
        let model = single_point(Vector3::new(1.0, 0.0, 0.0));
        let far = cam.project(&model, &pose(-20.0))[0].unwrap();
        let near = cam.project(&model, &pose(-4.0))[0].unwrap();
        assert!(near.0 - 320 > far.0 - 320);
    }

    #[test]
    fn test_behind_camera_is_none() {
        let cam = SceneCamera::new(60.0, 640, 480);
        let model = single_point(Vector3::new(0.0, 0.0, -10.0));
        assert_eq!(cam.project(&model, &pose(-6.0)), vec![None]);
    }

    #[test]
    fn test_yaw_90_moves_x_to_z() {
        let r = rotation_matrix(&Vector3::new(0.0, 90.0, 0.0));
        let v = r * Vector3::new(1.0, 0.0, 0.0);
        assert!(v.x.abs() < 1e-6);
        assert!((v.z + 1.0).abs() < 1e-6);
    }
}
