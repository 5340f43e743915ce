use crate::config::SmoothingConfig;

/// 単一チャンネルの指数移動平均
///
/// 入力が無いフレームは `update` を呼ばない。状態はリセットせずそのまま保持する
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ema {
    alpha: f32,
    value: f32,
}

impl Ema {
    pub fn new(alpha: f32) -> Self {
        Self { alpha, value: 0.0 }
    }

    pub fn update(&mut self, raw: f32) -> f32 {
        self.value = self.value * (1.0 - self.alpha) + raw * self.alpha;
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

/// 回転・平行移動・ズームの平滑化状態
#[derive(Debug, Clone)]
pub struct ControlSmoother {
    pitch: Ema,
    yaw: Ema,
    translate_x: Ema,
    translate_y: Ema,
    zoom: Ema,
}

impl ControlSmoother {
    pub fn new(motion_alpha: f32, zoom_alpha: f32) -> Self {
        Self {
            pitch: Ema::new(motion_alpha),
            yaw: Ema::new(motion_alpha),
            translate_x: Ema::new(motion_alpha),
            translate_y: Ema::new(motion_alpha),
            zoom: Ema::new(zoom_alpha),
        }
    }

    pub fn from_config(config: &SmoothingConfig) -> Self {
        Self::new(config.motion_alpha, config.zoom_alpha)
    }

    /// (pitch, yaw)
    pub fn rotation(&mut self, raw_pitch: f32, raw_yaw: f32) -> (f32, f32) {
        (self.pitch.update(raw_pitch), self.yaw.update(raw_yaw))
    }

    /// (dx, dy)
    pub fn translation(&mut self, raw_dx: f32, raw_dy: f32) -> (f32, f32) {
        (self.translate_x.update(raw_dx), self.translate_y.update(raw_dy))
    }

    pub fn zoom(&mut self, raw: f32) -> f32 {
        self.zoom.update(raw)
    }

    /// 現在の平滑化済み値 (pitch, yaw, dx, dy, zoom)
    pub fn values(&self) -> [f32; 5] {
        [
            self.pitch.value(),
            self.yaw.value(),
            self.translate_x.value(),
            self.translate_y.value(),
            self.zoom.value(),
        ]
    }
}

/// ピンチ強度の変化量からズーム入力を作る。
/// 変化量の絶対値を掛けて二乗的にし、静止時の揺れを潰して素早い操作だけを効かせる
pub fn shape_zoom(pinch_now: f32, pinch_last: f32, gain: f32) -> f32 {
    let delta = pinch_now - pinch_last;
    delta * gain * delta.abs() * 2.0
}
