use crate::hand::LandmarkIndex;

/// 手の骨格の接続定義 (開始ランドマーク, 終了ランドマーク)
pub const HAND_CONNECTIONS: [(LandmarkIndex, LandmarkIndex); 21] = [
    // 親指
    (LandmarkIndex::Wrist, LandmarkIndex::ThumbCmc),
    (LandmarkIndex::ThumbCmc, LandmarkIndex::ThumbMcp),
    (LandmarkIndex::ThumbMcp, LandmarkIndex::ThumbIp),
    (LandmarkIndex::ThumbIp, LandmarkIndex::ThumbTip),
    // 人差し指
    (LandmarkIndex::Wrist, LandmarkIndex::IndexMcp),
    (LandmarkIndex::IndexMcp, LandmarkIndex::IndexPip),
    (LandmarkIndex::IndexPip, LandmarkIndex::IndexDip),
    (LandmarkIndex::IndexDip, LandmarkIndex::IndexTip),
    // 中指
    (LandmarkIndex::MiddleMcp, LandmarkIndex::MiddlePip),
    (LandmarkIndex::MiddlePip, LandmarkIndex::MiddleDip),
    (LandmarkIndex::MiddleDip, LandmarkIndex::MiddleTip),
    // 薬指
    (LandmarkIndex::RingMcp, LandmarkIndex::RingPip),
    (LandmarkIndex::RingPip, LandmarkIndex::RingDip),
    (LandmarkIndex::RingDip, LandmarkIndex::RingTip),
    // 小指
    (LandmarkIndex::Wrist, LandmarkIndex::PinkyMcp),
    (LandmarkIndex::PinkyMcp, LandmarkIndex::PinkyPip),
    (LandmarkIndex::PinkyPip, LandmarkIndex::PinkyDip),
    (LandmarkIndex::PinkyDip, LandmarkIndex::PinkyTip),
    // 手のひら
    (LandmarkIndex::IndexMcp, LandmarkIndex::MiddleMcp),
    (LandmarkIndex::MiddleMcp, LandmarkIndex::RingMcp),
    (LandmarkIndex::RingMcp, LandmarkIndex::PinkyMcp),
];

/// ランドマークの色 (RGB)
pub const LANDMARK_COLOR: u32 = 0x00FF00; // 緑

/// 左手の骨格線の色 (RGB)
pub const LEFT_HAND_COLOR: u32 = 0x00BFFF; // 水色

/// 右手の骨格線の色 (RGB)
pub const RIGHT_HAND_COLOR: u32 = 0xFFFF00; // 黄色

/// オブジェクトのワイヤーフレームの色 (RGB)
pub const MODEL_COLOR: u32 = 0xFFFFFF;

/// ポーズ中インジケータの色 (RGB)
pub const PAUSED_COLOR: u32 = 0xFF4040;
