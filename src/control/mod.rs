//! 1フレームごとの制御パイプライン
//!
//! ジェスチャー判定 → ポーズ判定 → ワンショットアクション → (ACTIVE 時のみ) 平滑化 → 姿勢の積算

pub mod pause;
pub mod smooth;
pub mod transform;
pub mod trigger;

pub use pause::{Mode, PauseStateMachine, Transition};
pub use smooth::{shape_zoom, ControlSmoother, Ema};
pub use transform::{ObjectPose, TransformAccumulator, TransformLimits};
pub use trigger::Action;

use crate::config::{Config, TranslateAnchor};
use crate::gesture::{is_open_palm, pinch_strength, GestureConfig};
use crate::hand::{FrameHands, HandLandmarks, LandmarkIndex};

/// フレームをまたいで保持する制御状態
#[derive(Debug, Clone)]
pub struct ControlState {
    pub pause: PauseStateMachine,
    /// 前フレームの右手人差し指先 (px)。前フレームに右手が無ければ None
    pub right_anchor: Option<(i32, i32)>,
    /// 前フレームの左手アンカー (px)
    pub left_anchor: Option<(i32, i32)>,
    /// 前フレームのピンチ強度
    pub last_pinch: Option<f32>,
    /// 手が消えてもリセットしない
    pub smoother: ControlSmoother,
}

impl ControlState {
    pub fn new(pause_hold_frames: u32, smoother: ControlSmoother) -> Self {
        Self {
            pause: PauseStateMachine::new(pause_hold_frames),
            right_anchor: None,
            left_anchor: None,
            last_pinch: None,
            smoother,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ControlParams {
    pub gesture: GestureConfig,
    pub rotate_gain_x: f32,
    pub rotate_gain_y: f32,
    pub translate_gain: f32,
    pub translate_anchor: TranslateAnchor,
    pub zoom_gain: f32,
}

impl ControlParams {
    pub fn from_config(config: &Config) -> Self {
        Self {
            gesture: config.gesture.clone(),
            rotate_gain_x: config.control.rotate_gain_x,
            rotate_gain_y: config.control.rotate_gain_y,
            translate_gain: config.control.translate_gain,
            translate_anchor: config.control.translate_anchor,
            zoom_gain: config.control.zoom_gain,
        }
    }
}

/// 1フレームの処理結果
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub transition: Transition,
    /// 呼び出し側で実行するアクション。Reset は適用済み
    pub actions: Vec<Action>,
}

pub struct Controller {
    params: ControlParams,
    state: ControlState,
    transform: TransformAccumulator,
}

impl Controller {
    pub fn new(params: ControlParams, state: ControlState, limits: TransformLimits) -> Self {
        Self {
            params,
            state,
            transform: TransformAccumulator::new(limits),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            ControlParams::from_config(config),
            ControlState::new(
                config.control.pause_hold_frames,
                ControlSmoother::from_config(&config.smoothing),
            ),
            TransformLimits::from_config(&config.transform),
        )
    }

    pub fn pose(&self) -> &ObjectPose {
        self.transform.pose()
    }

    pub fn mode(&self) -> Mode {
        self.state.pause.mode()
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    /// frame_size: 推論に使ったフレームの解像度 (px)
    pub fn update(&mut self, hands: &FrameHands, frame_size: (u32, u32)) -> FrameOutput {
        let palm_open = hands
            .left
            .as_ref()
            .is_some_and(|l| is_open_palm(l, &self.params.gesture.open_palm));
        let transition = self.state.pause.update(palm_open);

        let actions = trigger::evaluate(
            &mut self.state.pause,
            hands.right.as_ref(),
            &self.params.gesture.thumbs_up,
        );
        if actions.contains(&Action::Reset) {
            self.transform.reset();
        }

        let active = self.state.pause.mode() == Mode::Active;
        self.update_right(hands.right.as_ref(), frame_size, active);
        self.update_left(hands.left.as_ref(), frame_size, active);

        FrameOutput { transition, actions }
    }

    /// 右手: 人差し指先の移動で回転、ピンチ強度の変化でズーム
    fn update_right(&mut self, hand: Option<&HandLandmarks>, (w, h): (u32, u32), active: bool) {
        let Some(hand) = hand else {
            self.state.right_anchor = None;
            self.state.last_pinch = None;
            return;
        };

        let anchor = hand.get(LandmarkIndex::IndexTip).to_pixel(w, h);
        let pinch = pinch_strength(hand, &self.params.gesture.pinch);

        if active {
            if let Some((lx, ly)) = self.state.right_anchor {
                let dx = anchor.0 as f32 - lx as f32;
                let dy = anchor.1 as f32 - ly as f32;
                let (pitch, yaw) = self
                    .state
                    .smoother
                    .rotation(-dy * self.params.rotate_gain_x, dx * self.params.rotate_gain_y);
                self.transform.rotate(pitch, yaw);
            }
            if let Some(last) = self.state.last_pinch {
                let raw = shape_zoom(pinch, last, self.params.zoom_gain);
                let velocity = self.state.smoother.zoom(raw);
                self.transform.zoom(velocity);
            }
        }

        self.state.right_anchor = Some(anchor);
        self.state.last_pinch = Some(pinch);
    }

    /// 左手: アンカーの正規化移動量で平行移動
    fn update_left(&mut self, hand: Option<&HandLandmarks>, (w, h): (u32, u32), active: bool) {
        let Some(hand) = hand else {
            self.state.left_anchor = None;
            return;
        };

        let index = match self.params.translate_anchor {
            TranslateAnchor::IndexTip => LandmarkIndex::IndexTip,
            TranslateAnchor::Wrist => LandmarkIndex::Wrist,
        };
        let anchor = hand.get(index).to_pixel(w, h);

        if active {
            if let Some((lx, ly)) = self.state.left_anchor {
                let dx = (anchor.0 as f32 - lx as f32) / w.max(1) as f32;
                let dy = (anchor.1 as f32 - ly as f32) / h.max(1) as f32;
                let gain = self.params.translate_gain;
                let (sx, sy) = self.state.smoother.translation(dx * gain, dy * gain);
                self.transform.translate(sx, sy);
            }
        }

        self.state.left_anchor = Some(anchor);
    }
}
