//! 片手のランドマークからのジェスチャー判定
//!
//! どれも状態を持たない純関数。手が検出されていない場合は呼び出し側で分岐する。
//! 画像座標系なので「上」は y が小さい方向。

use serde::Deserialize;

use crate::hand::{HandLandmarks, LandmarkIndex};

/// 人差し指・中指・薬指・小指の (指先, 付け根)
const FINGERS: [(LandmarkIndex, LandmarkIndex); 4] = [
    (LandmarkIndex::IndexTip, LandmarkIndex::IndexMcp),
    (LandmarkIndex::MiddleTip, LandmarkIndex::MiddleMcp),
    (LandmarkIndex::RingTip, LandmarkIndex::RingMcp),
    (LandmarkIndex::PinkyTip, LandmarkIndex::PinkyMcp),
];

/// open palm の判定条件
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OpenPalmProfile {
    /// 小指も数えるか
    #[serde(default)]
    pub include_pinky: bool,
    /// 伸びている指の最小本数
    #[serde(default = "default_min_extended")]
    pub min_extended: usize,
    /// 指先が付け根より上にあるとみなす最小差
    #[serde(default = "default_palm_margin")]
    pub margin: f32,
    /// 親指の横方向の開き (|x4 - x3|) の下限。0 で判定しない
    #[serde(default)]
    pub thumb_spread: f32,
}

fn default_min_extended() -> usize { 2 }
fn default_palm_margin() -> f32 { 0.01 }

impl OpenPalmProfile {
    /// 3本中2本。一部が隠れていてもポーズが効くように緩め
    pub fn relaxed() -> Self {
        Self {
            include_pinky: false,
            min_extended: default_min_extended(),
            margin: default_palm_margin(),
            thumb_spread: 0.0,
        }
    }

    /// 4本全部 + 親指が開いていること
    pub fn strict() -> Self {
        Self {
            include_pinky: true,
            min_extended: 4,
            margin: 0.0,
            thumb_spread: 0.05,
        }
    }
}

impl Default for OpenPalmProfile {
    fn default() -> Self {
        Self::relaxed()
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct ThumbsUpProfile {
    /// 親指の関節間に必要な最小の高さ差
    #[serde(default)]
    pub thumb_margin: f32,
    /// 他の指先が付け根より下にあるとみなす最小差
    #[serde(default)]
    pub fold_margin: f32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PinchProfile {
    /// この距離以下で強さ 1.0
    #[serde(default = "default_pinch_near")]
    pub near: f32,
    /// この距離以上で強さ 0.0
    #[serde(default = "default_pinch_far")]
    pub far: f32,
}

fn default_pinch_near() -> f32 { 0.02 }
fn default_pinch_far() -> f32 { 0.2 }

impl Default for PinchProfile {
    fn default() -> Self {
        Self {
            near: default_pinch_near(),
            far: default_pinch_far(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct GestureConfig {
    #[serde(default)]
    pub open_palm: OpenPalmProfile,
    #[serde(default)]
    pub thumbs_up: ThumbsUpProfile,
    #[serde(default)]
    pub pinch: PinchProfile,
}

/// 手のひらを開いているか
pub fn is_open_palm(hand: &HandLandmarks, profile: &OpenPalmProfile) -> bool {
    let fingers = if profile.include_pinky { &FINGERS[..] } else { &FINGERS[..3] };
    let extended = fingers
        .iter()
        .filter(|(tip, base)| hand.get(*base).y - hand.get(*tip).y >= profile.margin)
        .count();

    if extended < profile.min_extended {
        return false;
    }
    if profile.thumb_spread > 0.0 {
        let tip = hand.get(LandmarkIndex::ThumbTip);
        let ip = hand.get(LandmarkIndex::ThumbIp);
        return (tip.x - ip.x).abs() > profile.thumb_spread;
    }
    true
}

/// ピースサイン: 人差し指と中指が立ち、薬指と小指が曲がっている
pub fn is_peace_sign(hand: &HandLandmarks) -> bool {
    let y = |i: LandmarkIndex| hand.get(i).y;
    y(LandmarkIndex::IndexTip) < y(LandmarkIndex::IndexPip)
        && y(LandmarkIndex::MiddleTip) < y(LandmarkIndex::MiddlePip)
        && y(LandmarkIndex::RingTip) > y(LandmarkIndex::RingPip)
        && y(LandmarkIndex::PinkyTip) > y(LandmarkIndex::PinkyPip)
}

/// サムズアップ: 親指が上向きに一直線、他の4本は握っている
pub fn is_thumbs_up(hand: &HandLandmarks, profile: &ThumbsUpProfile) -> bool {
    let tip = hand.get(LandmarkIndex::ThumbTip).y;
    let ip = hand.get(LandmarkIndex::ThumbIp).y;
    let mcp = hand.get(LandmarkIndex::ThumbMcp).y;
    let m = profile.thumb_margin;
    let thumb_up = tip < ip - m && ip < mcp - m;

    let folded = FINGERS
        .iter()
        .all(|(t, b)| hand.get(*t).y - hand.get(*b).y > profile.fold_margin);

    thumb_up && folded
}

/// 親指と人差し指の近さ (0.0〜1.0)。正規化2D距離から線形に変換
pub fn pinch_strength(hand: &HandLandmarks, profile: &PinchProfile) -> f32 {
    let t = hand.get(LandmarkIndex::ThumbTip);
    let i = hand.get(LandmarkIndex::IndexTip);
    let d = ((t.x - i.x).powi(2) + (t.y - i.y).powi(2)).sqrt();
    ((profile.far - d) / (profile.far - profile.near)).clamp(0.0, 1.0)
}
