use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::gesture::GestureConfig;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub control: ControlConfig,
    #[serde(default)]
    pub smoothing: SmoothingConfig,
    #[serde(default)]
    pub transform: TransformConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CameraConfig {
    /// カメラデバイス番号
    #[serde(default)]
    pub index: i32,
    #[serde(default = "default_camera_width")]
    pub width: u32,
    #[serde(default = "default_camera_height")]
    pub height: u32,
    #[serde(default = "default_camera_fps")]
    pub fps: u32,
    /// 左右反転（鏡像表示）。handedness ラベルを利用者視点に合わせる
    #[serde(default = "default_true")]
    pub mirror: bool,
}

fn default_camera_width() -> u32 { 640 }
fn default_camera_height() -> u32 { 480 }
fn default_camera_fps() -> u32 { 30 }
fn default_true() -> bool { true }

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: default_camera_width(),
            height: default_camera_height(),
            fps: default_camera_fps(),
            mirror: default_true(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DetectorConfig {
    /// 検出プロセスの実行ファイル (Python インタプリタ)
    #[serde(default = "default_detector_command")]
    pub command: String,
    /// 検出スクリプトのパス
    #[serde(default = "default_detector_script")]
    pub script: String,
    /// これ未満のスコアの手は捨てる
    #[serde(default = "default_min_score")]
    pub min_score: f32,
}

fn default_detector_command() -> String { ".venv/bin/python".to_string() }
fn default_detector_script() -> String { "scripts/hand_detect.py".to_string() }
fn default_min_score() -> f32 { 0.8 }

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            command: default_detector_command(),
            script: default_detector_script(),
            min_score: default_min_score(),
        }
    }
}

/// 平行移動に使う左手のランドマーク
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TranslateAnchor {
    #[default]
    IndexTip,
    Wrist,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ControlConfig {
    /// ポーズ確定前に必要な open palm の連続フレーム数
    #[serde(default = "default_pause_hold_frames")]
    pub pause_hold_frames: u32,
    /// 縦移動 (px) → pitch (度)
    #[serde(default = "default_rotate_gain")]
    pub rotate_gain_x: f32,
    /// 横移動 (px) → yaw (度)
    #[serde(default = "default_rotate_gain")]
    pub rotate_gain_y: f32,
    /// 正規化移動量 → シーン単位
    #[serde(default = "default_translate_gain")]
    pub translate_gain: f32,
    #[serde(default)]
    pub translate_anchor: TranslateAnchor,
    #[serde(default = "default_zoom_gain")]
    pub zoom_gain: f32,
}

fn default_pause_hold_frames() -> u32 { 2 }
fn default_rotate_gain() -> f32 { 0.4 }
fn default_translate_gain() -> f32 { 3.0 }
fn default_zoom_gain() -> f32 { 2.0 }

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            pause_hold_frames: default_pause_hold_frames(),
            rotate_gain_x: default_rotate_gain(),
            rotate_gain_y: default_rotate_gain(),
            translate_gain: default_translate_gain(),
            translate_anchor: TranslateAnchor::default(),
            zoom_gain: default_zoom_gain(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SmoothingConfig {
    /// 回転・平行移動の EMA 係数
    #[serde(default = "default_motion_alpha")]
    pub motion_alpha: f32,
    /// ズームの EMA 係数
    #[serde(default = "default_zoom_alpha")]
    pub zoom_alpha: f32,
}

fn default_motion_alpha() -> f32 { 0.25 }
fn default_zoom_alpha() -> f32 { 0.35 }

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            motion_alpha: default_motion_alpha(),
            zoom_alpha: default_zoom_alpha(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TransformConfig {
    /// 最も遠いカメラ位置 (z)
    #[serde(default = "default_min_distance")]
    pub min_distance: f32,
    /// 最も近いカメラ位置 (z)
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
    /// 初期・リセット時のカメラ位置 (z)
    #[serde(default = "default_distance")]
    pub default_distance: f32,
}

fn default_min_distance() -> f32 { -35.0 }
fn default_max_distance() -> f32 { -3.0 }
fn default_distance() -> f32 { -6.0 }

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            min_distance: default_min_distance(),
            max_distance: default_max_distance(),
            default_distance: default_distance(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RenderConfig {
    #[serde(default = "default_render_width")]
    pub width: usize,
    #[serde(default = "default_render_height")]
    pub height: usize,
    /// 垂直画角（度）
    #[serde(default = "default_fov")]
    pub fov_deg: f32,
    /// カメラプレビューの縮小率 (0 で非表示)
    #[serde(default = "default_preview_scale")]
    pub preview_scale: f32,
    #[serde(default = "default_screenshot_dir")]
    pub screenshot_dir: String,
}

fn default_render_width() -> usize { 960 }
fn default_render_height() -> usize { 720 }
fn default_fov() -> f32 { 60.0 }
fn default_preview_scale() -> f32 { 0.3 }
fn default_screenshot_dir() -> String { "screenshots".to_string() }

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_render_width(),
            height: default_render_height(),
            fov_deg: default_fov(),
            preview_scale: default_preview_scale(),
            screenshot_dir: default_screenshot_dir(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content)
    }

    /// ファイルが無ければデフォルト値。パース失敗はエラー
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Invalid config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let t = &self.transform;
        if t.min_distance > t.max_distance {
            anyhow::bail!(
                "transform.min_distance ({}) must not exceed max_distance ({})",
                t.min_distance,
                t.max_distance
            );
        }
        let s = &self.smoothing;
        for (name, alpha) in [("motion_alpha", s.motion_alpha), ("zoom_alpha", s.zoom_alpha)] {
            if !(0.0..=1.0).contains(&alpha) {
                anyhow::bail!("smoothing.{} must be within 0..=1, got {}", name, alpha);
            }
        }
        let pinch = &self.gesture.pinch;
        if pinch.near >= pinch.far {
            anyhow::bail!(
                "gesture.pinch.near ({}) must be less than far ({})",
                pinch.near,
                pinch.far
            );
        }
        let palm = &self.gesture.open_palm;
        let fingers = if palm.include_pinky { 4 } else { 3 };
        if palm.min_extended > fingers {
            anyhow::bail!(
                "gesture.open_palm.min_extended ({}) exceeds the {} fingers checked",
                palm.min_extended,
                fingers
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.control.pause_hold_frames, 2);
        assert_eq!(config.smoothing.motion_alpha, 0.25);
        assert_eq!(config.smoothing.zoom_alpha, 0.35);
        assert_eq!(config.transform.min_distance, -35.0);
        assert_eq!(config.transform.max_distance, -3.0);
        assert_eq!(config.transform.default_distance, -6.0);
        assert_eq!(config.control.translate_anchor, TranslateAnchor::IndexTip);
        assert_eq!(config.render.screenshot_dir, "screenshots");
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.camera.width, 640);
        assert!(config.camera.mirror);
        assert_eq!(config.gesture.open_palm.min_extended, 2);
    }

    #[test]
    fn test_partial_section() {
        let config = Config::parse(
            r#"
            [control]
            pause_hold_frames = 0
            translate_anchor = "wrist"

            [gesture.open_palm]
            include_pinky = true
            min_extended = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.control.pause_hold_frames, 0);
        assert_eq!(config.control.translate_anchor, TranslateAnchor::Wrist);
        // 指定していないフィールドはデフォルトのまま
        assert_eq!(config.control.rotate_gain_x, 0.4);
        assert!(config.gesture.open_palm.include_pinky);
        assert_eq!(config.gesture.open_palm.min_extended, 4);
        assert_eq!(config.gesture.open_palm.margin, 0.01);
    }

    #[test]
    fn test_invalid_distance_range() {
        let result = Config::parse(
            r#"
            [transform]
            min_distance = -2.0
            max_distance = -10.0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_alpha() {
        let result = Config::parse("[smoothing]\nzoom_alpha = 1.5\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_pinch_range() {
        assert!(Config::parse("[gesture.pinch]\nnear = 0.1\nfar = 0.1\n").is_err());
        assert!(Config::parse("[gesture.pinch]\nnear = 0.3\nfar = 0.2\n").is_err());
        assert!(Config::parse("[gesture.pinch]\nnear = 0.05\nfar = 0.3\n").is_ok());
    }

    #[test]
    fn test_unreachable_min_extended() {
        assert!(Config::parse("[gesture.open_palm]\nmin_extended = 4\n").is_err());
        let config =
            Config::parse("[gesture.open_palm]\ninclude_pinky = true\nmin_extended = 4\n").unwrap();
        assert_eq!(config.gesture.open_palm.min_extended, 4);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default("does/not/exist/config.toml").unwrap();
        assert_eq!(config.render.width, 960);
    }
}
