use crate::gesture::{is_peace_sign, is_thumbs_up, ThumbsUpProfile};
use crate::hand::HandLandmarks;

use super::pause::PauseStateMachine;

/// ポーズ中に右手で発火するアクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// サムズアップ。保持している間は毎フレーム
    Reset,
    /// ピースサイン。1回のポーズにつき1回
    Screenshot,
}

/// ポーズ中の右手ジェスチャーからアクションを決める
pub fn evaluate(
    pause: &mut PauseStateMachine,
    right: Option<&HandLandmarks>,
    thumbs_up: &ThumbsUpProfile,
) -> Vec<Action> {
    let mut actions = Vec::new();
    let Some(right) = right else {
        return actions;
    };
    if !pause.is_paused() {
        return actions;
    }

    if is_thumbs_up(right, thumbs_up) {
        actions.push(Action::Reset);
    }
    if is_peace_sign(right) && pause.take_screenshot_slot() {
        actions.push(Action::Screenshot);
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::test_hands::{fist, peace, thumbs_up};
    use crate::hand::Handedness::Right;

    fn paused() -> PauseStateMachine {
        let mut sm = PauseStateMachine::new(0);
        sm.update(true);
        sm
    }

    #[test]
    fn test_nothing_while_active() {
        let mut sm = PauseStateMachine::new(0);
        let profile = ThumbsUpProfile::default();
        assert!(evaluate(&mut sm, Some(&thumbs_up(Right)), &profile).is_empty());
        assert!(evaluate(&mut sm, Some(&peace(Right)), &profile).is_empty());
    }

    #[test]
    fn test_nothing_without_right_hand() {
        let mut sm = paused();
        assert!(evaluate(&mut sm, None, &ThumbsUpProfile::default()).is_empty());
    }

    #[test]
    fn test_reset_level_triggered() {
        let mut sm = paused();
        let hand = thumbs_up(Right);
        for _ in 0..5 {
            sm.update(true);
            let actions = evaluate(&mut sm, Some(&hand), &ThumbsUpProfile::default());
            assert_eq!(actions, vec![Action::Reset]);
        }
    }

    #[test]
    fn test_screenshot_once_per_hold() {
        for n in [1, 2, 30] {
            let mut sm = paused();
            let hand = peace(Right);
            let fired = (0..n)
                .map(|_| {
                    sm.update(true);
                    evaluate(&mut sm, Some(&hand), &ThumbsUpProfile::default())
                })
                .filter(|a| a.contains(&Action::Screenshot))
                .count();
            assert_eq!(fired, 1, "n={}", n);
        }
    }

    #[test]
    fn test_screenshot_not_refired_after_release_within_pause() {
        let mut sm = paused();
        let profile = ThumbsUpProfile::default();
        assert_eq!(evaluate(&mut sm, Some(&peace(Right)), &profile), vec![Action::Screenshot]);
        assert!(evaluate(&mut sm, Some(&fist(Right)), &profile).is_empty());
        assert!(evaluate(&mut sm, Some(&peace(Right)), &profile).is_empty());

        // ACTIVE を挟んだら再度撮れる
        sm.update(false);
        sm.update(true);
        assert_eq!(evaluate(&mut sm, Some(&peace(Right)), &profile), vec![Action::Screenshot]);
    }
}
