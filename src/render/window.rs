use anyhow::Result;
use chrono::Local;
use minifb::{Key, Window, WindowOptions};
use opencv::core::{Mat, Size};
use opencv::imgproc;
use opencv::prelude::*;
use std::path::{Path, PathBuf};

use crate::control::{Mode, ObjectPose};
use crate::hand::{HandLandmarks, Handedness, Landmark};
use crate::render::canvas::{Canvas, Rect};
use crate::render::scene::{SceneCamera, Wireframe};
use crate::render::screenshot::{save_png, snapshot_path};
use crate::render::skeleton::{
    HAND_CONNECTIONS, LANDMARK_COLOR, LEFT_HAND_COLOR, MODEL_COLOR, PAUSED_COLOR, RIGHT_HAND_COLOR,
};

/// minifbを使用したレンダラー
pub struct MinifbRenderer {
    window: Window,
    canvas: Canvas,
    camera: SceneCamera,
    model: Wireframe,
    /// カメラ映像を置いた領域
    inset: Option<Rect>,
}

impl MinifbRenderer {
    /// ウィンドウを作成
    pub fn new(title: &str, width: usize, height: usize, fov_deg: f32) -> Result<Self> {
        let window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        Ok(Self {
            window,
            canvas: Canvas::new(width, height),
            camera: SceneCamera::new(fov_deg, width, height),
            model: Wireframe::car(),
            inset: None,
        })
    }

    /// ウィンドウが開いているか
    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    pub fn clear(&mut self) {
        self.canvas.clear(0x000000);
    }

    /// 姿勢を適用したモデルを描画
    pub fn draw_scene(&mut self, pose: &ObjectPose) {
        let points = self.camera.project(&self.model, pose);
        for (a, b) in &self.model.edges {
            if let (Some(p), Some(q)) = (points[*a], points[*b]) {
                self.canvas.draw_line(p.0, p.1, q.0, q.1, MODEL_COLOR);
            }
        }
    }

    /// カメラ映像を縮小して右上に描画。scale <= 0 なら描画しない
    pub fn draw_preview(&mut self, frame: &Mat, scale: f32) -> Result<()> {
        if scale <= 0.0 {
            self.inset = None;
            return Ok(());
        }
        let w = ((frame.cols() as f32 * scale) as i32).max(1);
        let h = ((frame.rows() as f32 * scale) as i32).max(1);

        let mut small = Mat::default();
        imgproc::resize(frame, &mut small, Size::new(w, h), 0.0, 0.0, imgproc::INTER_LINEAR)?;

        let x_off = self.canvas.width() as i32 - w;
        for y in 0..h {
            for x in 0..w {
                let pixel = small.at_2d::<opencv::core::Vec3b>(y, x)?;
                // BGR -> RGB -> u32
                let r = pixel[2] as u32;
                let g = pixel[1] as u32;
                let b = pixel[0] as u32;
                self.canvas.set_pixel(x_off + x, y, (r << 16) | (g << 8) | b);
            }
        }

        self.inset = Some(Rect::new(x_off, 0, w, h));
        Ok(())
    }

    /// 手の骨格をプレビュー上に描画。はみ出した部分はプレビュー外に描かない
    pub fn draw_hand(&mut self, hand: &HandLandmarks) {
        let Some(inset) = self.inset else {
            return;
        };
        let color = match hand.handedness {
            Handedness::Left => LEFT_HAND_COLOR,
            Handedness::Right => RIGHT_HAND_COLOR,
        };
        let to_canvas = |lm: &Landmark| {
            let (px, py) = lm.to_pixel(inset.width as u32, inset.height as u32);
            (inset.x.saturating_add(px), inset.y.saturating_add(py))
        };

        self.canvas.set_clip(Some(inset));
        for (start, end) in HAND_CONNECTIONS.iter() {
            let (x1, y1) = to_canvas(hand.get(*start));
            let (x2, y2) = to_canvas(hand.get(*end));
            self.canvas.draw_line(x1, y1, x2, y2, color);
        }
        for lm in hand.landmarks.iter() {
            let (x, y) = to_canvas(lm);
            self.canvas.draw_circle(x, y, 2, LANDMARK_COLOR);
        }
        self.canvas.set_clip(None);
    }

    /// ポーズ中は画面の縁を赤く
    pub fn draw_status(&mut self, mode: Mode) {
        if mode == Mode::Paused {
            let (w, h) = (self.canvas.width() as i32, self.canvas.height() as i32);
            self.canvas.draw_rect(0, 0, w, h, 6, PAUSED_COLOR);
        }
    }

    /// 現在のバッファを `<dir>/snap_<時刻>.png` に保存
    pub fn save_screenshot(&self, dir: &Path) -> Result<PathBuf> {
        let path = snapshot_path(dir, &Local::now());
        save_png(&path, self.canvas.buffer(), self.canvas.width(), self.canvas.height())?;
        Ok(path)
    }

    /// バッファをウィンドウに表示
    pub fn update(&mut self) -> Result<()> {
        self.window.update_with_buffer(
            self.canvas.buffer(),
            self.canvas.width(),
            self.canvas.height(),
        )?;
        Ok(())
    }
}
