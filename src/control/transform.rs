use nalgebra::Vector3;

use crate::config::TransformConfig;

/// 表示対象の姿勢。レンダラーには読み取り専用で渡す
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectPose {
    pub position: Vector3<f32>,
    /// オイラー角（度） (pitch, yaw, roll)
    pub rotation: Vector3<f32>,
    /// カメラの z 位置。原点の後ろ（負側）にある
    pub camera_distance: f32,
}

/// カメラ距離の範囲と初期値
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformLimits {
    pub min_distance: f32,
    pub max_distance: f32,
    pub default_distance: f32,
}

impl TransformLimits {
    pub fn from_config(config: &TransformConfig) -> Self {
        Self {
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            default_distance: config.default_distance,
        }
    }

    fn clamp(&self, distance: f32) -> f32 {
        distance.clamp(self.min_distance, self.max_distance)
    }
}

impl Default for TransformLimits {
    fn default() -> Self {
        Self::from_config(&TransformConfig::default())
    }
}

/// 平滑化済みの差分を姿勢に積算する
#[derive(Debug, Clone)]
pub struct TransformAccumulator {
    pose: ObjectPose,
    limits: TransformLimits,
}

impl TransformAccumulator {
    pub fn new(limits: TransformLimits) -> Self {
        Self {
            pose: Self::rest_pose(&limits),
            limits,
        }
    }

    fn rest_pose(limits: &TransformLimits) -> ObjectPose {
        ObjectPose {
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
            camera_distance: limits.clamp(limits.default_distance),
        }
    }

    pub fn pose(&self) -> &ObjectPose {
        &self.pose
    }

    pub fn rotate(&mut self, pitch: f32, yaw: f32) {
        self.pose.rotation += Vector3::new(pitch, yaw, 0.0);
    }

    /// 画像座標の dy は下向きが正なので反転する
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.pose.position += Vector3::new(dx, -dy, 0.0);
    }

    pub fn zoom(&mut self, velocity: f32) {
        self.pose.camera_distance = self.limits.clamp(self.pose.camera_distance - velocity);
    }

    /// 原点・回転なし・初期カメラ距離に戻す
    pub fn reset(&mut self) {
        self.pose = Self::rest_pose(&self.limits);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accumulator() -> TransformAccumulator {
        TransformAccumulator::new(TransformLimits::default())
    }

    #[test]
    fn test_initial_pose() {
        let acc = accumulator();
        assert_eq!(acc.pose().position, Vector3::zeros());
        assert_eq!(acc.pose().rotation, Vector3::zeros());
        assert_eq!(acc.pose().camera_distance, -6.0);
    }

    #[test]
    fn test_rotate_accumulates() {
        let mut acc = accumulator();
        acc.rotate(2.0, 8.0);
        acc.rotate(-1.0, 2.0);
        assert_eq!(acc.pose().rotation, Vector3::new(1.0, 10.0, 0.0));
    }

    #[test]
    fn test_translate_inverts_y() {
        let mut acc = accumulator();
        acc.translate(0.3, 0.15);
        assert_eq!(acc.pose().position, Vector3::new(0.3, -0.15, 0.0));
    }

    #[test]
    fn test_zoom_clamped() {
        let mut acc = accumulator();
        for _ in 0..1000 {
            acc.zoom(1e6);
        }
        assert_eq!(acc.pose().camera_distance, -35.0);
        acc.zoom(-1e9);
        assert_eq!(acc.pose().camera_distance, -3.0);
        acc.zoom(f32::MAX);
        assert_eq!(acc.pose().camera_distance, -35.0);
    }

    #[test]
    fn test_reset_idempotent() {
        let mut acc = accumulator();
        acc.rotate(45.0, -30.0);
        acc.translate(1.0, 2.0);
        acc.zoom(10.0);
        acc.reset();
        let first = *acc.pose();
        acc.reset();
        assert_eq!(*acc.pose(), first);
        assert_eq!(first.position, Vector3::zeros());
        assert_eq!(first.rotation, Vector3::zeros());
        assert_eq!(first.camera_distance, -6.0);
    }

    #[test]
    fn test_default_distance_outside_range_is_clamped() {
        let limits = TransformLimits {
            min_distance: -10.0,
            max_distance: -4.0,
            default_distance: -2.0,
        };
        let acc = TransformAccumulator::new(limits);
        assert_eq!(acc.pose().camera_distance, -4.0);
    }
}
