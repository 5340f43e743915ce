use anyhow::Result;
use tracing::warn;

/// MediaPipe Hands の 21 ランドマークインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum LandmarkIndex {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl LandmarkIndex {
    pub const COUNT: usize = 21;
}

/// 左右の別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// 推論側のラベル ("Left" / "Right") から変換
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Left" => Some(Self::Left),
            "Right" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }
}

/// 単一ランドマーク
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    /// 正規化されたX座標 (0.0〜1.0)
    pub x: f32,
    /// 正規化されたY座標 (0.0〜1.0, 下向きが正)
    pub y: f32,
    /// 手首を基準とした奥行き
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// ピクセル座標に変換（切り捨て）
    pub fn to_pixel(&self, width: u32, height: u32) -> (i32, i32) {
        let px = (self.x * width as f32) as i32;
        let py = (self.y * height as f32) as i32;
        (px, py)
    }
}

/// 21ランドマークからなる片手
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    pub handedness: Handedness,
    pub landmarks: [Landmark; LandmarkIndex::COUNT],
}

impl HandLandmarks {
    pub fn new(handedness: Handedness, landmarks: [Landmark; LandmarkIndex::COUNT]) -> Self {
        Self { handedness, landmarks }
    }

    /// 点列から作成。点数が21でなければ推論側の契約違反としてエラー
    pub fn from_points(handedness: Handedness, points: &[[f32; 3]]) -> Result<Self> {
        if points.len() != LandmarkIndex::COUNT {
            anyhow::bail!(
                "{} hand has {} landmarks, expected {}",
                handedness.as_str(),
                points.len(),
                LandmarkIndex::COUNT
            );
        }
        if let Some(i) = points.iter().position(|p| p.iter().any(|v| !v.is_finite())) {
            anyhow::bail!("{} hand landmark {} is not finite", handedness.as_str(), i);
        }
        let mut landmarks = [Landmark::default(); LandmarkIndex::COUNT];
        for (dst, p) in landmarks.iter_mut().zip(points) {
            *dst = Landmark::new(p[0], p[1], p[2]);
        }
        Ok(Self::new(handedness, landmarks))
    }

    /// インデックスでランドマークを取得
    pub fn get(&self, index: LandmarkIndex) -> &Landmark {
        &self.landmarks[index as usize]
    }
}

/// 推論結果の1件（ラベル付きの点列）
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub label: String,
    pub score: f32,
    pub points: Vec<[f32; 3]>,
}

/// 1フレーム分の左右の手
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameHands {
    pub left: Option<HandLandmarks>,
    pub right: Option<HandLandmarks>,
}

impl FrameHands {
    pub fn new(left: Option<HandLandmarks>, right: Option<HandLandmarks>) -> Self {
        Self { left, right }
    }

    /// 推論結果から左右の手を組み立てる。
    /// 同じラベルが複数あれば最初の1件のみ使う
    pub fn from_detections(detections: Vec<Detection>) -> Result<Self> {
        let mut hands = Self::default();
        for det in detections {
            let Some(handedness) = Handedness::from_label(&det.label) else {
                warn!("Unknown handedness label: {:?}", det.label);
                continue;
            };
            let slot = match handedness {
                Handedness::Left => &mut hands.left,
                Handedness::Right => &mut hands.right,
            };
            if slot.is_none() {
                *slot = Some(HandLandmarks::from_points(handedness, &det.points)?);
            }
        }
        Ok(hands)
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(x: f32) -> Vec<[f32; 3]> {
        vec![[x, 0.5, 0.0]; LandmarkIndex::COUNT]
    }

    fn detection(label: &str, x: f32) -> Detection {
        Detection {
            label: label.to_string(),
            score: 0.9,
            points: points(x),
        }
    }

    #[test]
    fn test_landmark_index_values() {
        assert_eq!(LandmarkIndex::ThumbTip as usize, 4);
        assert_eq!(LandmarkIndex::IndexTip as usize, 8);
        assert_eq!(LandmarkIndex::PinkyTip as usize, 20);
        assert_eq!(LandmarkIndex::COUNT, 21);
    }

    #[test]
    fn test_landmark_to_pixel_truncates() {
        let lm = Landmark::new(0.5, 0.2499, 0.0);
        assert_eq!(lm.to_pixel(640, 480), (320, 119));
    }

    #[test]
    fn test_from_points_wrong_count() {
        let result = HandLandmarks::from_points(Handedness::Left, &[[0.0; 3]; 20]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_points_rejects_non_finite() {
        let mut points = [[0.5f32; 3]; LandmarkIndex::COUNT];
        points[8][0] = f32::NAN;
        assert!(HandLandmarks::from_points(Handedness::Right, &points).is_err());
        points[8][0] = f32::INFINITY;
        assert!(HandLandmarks::from_points(Handedness::Right, &points).is_err());
        points[8][0] = 1.5;
        assert!(HandLandmarks::from_points(Handedness::Right, &points).is_ok());
    }

    #[test]
    fn test_from_detections_both_hands() {
        let hands =
            FrameHands::from_detections(vec![detection("Right", 0.7), detection("Left", 0.2)])
                .unwrap();
        assert_eq!(hands.left.as_ref().unwrap().handedness, Handedness::Left);
        assert_eq!(hands.right.as_ref().unwrap().get(LandmarkIndex::Wrist).x, 0.7);
    }

    #[test]
    fn test_from_detections_keeps_first_duplicate() {
        let hands =
            FrameHands::from_detections(vec![detection("Left", 0.1), detection("Left", 0.9)])
                .unwrap();
        assert_eq!(hands.left.unwrap().get(LandmarkIndex::IndexTip).x, 0.1);
        assert!(hands.right.is_none());
    }

    #[test]
    fn test_from_detections_empty() {
        let hands = FrameHands::from_detections(Vec::new()).unwrap();
        assert!(hands.is_empty());
    }

    #[test]
    fn test_from_detections_unknown_label_skipped() {
        let hands = FrameHands::from_detections(vec![detection("Both", 0.5)]).unwrap();
        assert!(hands.is_empty());
    }

    #[test]
    fn test_from_detections_malformed_is_error() {
        let bad = Detection {
            label: "Right".to_string(),
            score: 0.9,
            points: vec![[0.0; 3]; 5],
        };
        assert!(FrameHands::from_detections(vec![bad]).is_err());
    }
}
