/// 操作モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Active,
    Paused,
}

/// 1フレームの状態遷移
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    Paused,
    Resumed,
}

/// 左手 open palm によるポーズ/再開のステートマシン
///
/// - ACTIVE → PAUSED: open palm が `hold_frames` フレーム続いた後、さらに続いているフレームで遷移
/// - PAUSED → ACTIVE: 条件が崩れたフレームで即座に遷移
///
/// スクリーンショットは1回のポーズにつき1枚まで。その消費フラグもここで持つ
#[derive(Debug, Clone)]
pub struct PauseStateMachine {
    hold_frames: u32,
    mode: Mode,
    hold_count: u32,
    screenshot_taken: bool,
}

impl PauseStateMachine {
    pub fn new(hold_frames: u32) -> Self {
        Self {
            hold_frames,
            mode: Mode::Active,
            hold_count: 0,
            screenshot_taken: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_paused(&self) -> bool {
        self.mode == Mode::Paused
    }

    pub fn hold_count(&self) -> u32 {
        self.hold_count
    }

    /// palm_open: 左手があり、かつ open palm か
    pub fn update(&mut self, palm_open: bool) -> Transition {
        if !palm_open {
            self.hold_count = 0;
            if self.mode == Mode::Paused {
                self.mode = Mode::Active;
                self.screenshot_taken = false;
                return Transition::Resumed;
            }
            return Transition::None;
        }

        self.hold_count = self.hold_count.saturating_add(1);
        if self.mode == Mode::Active && self.hold_count > self.hold_frames {
            self.mode = Mode::Paused;
            self.screenshot_taken = false;
            return Transition::Paused;
        }
        Transition::None
    }

    /// このポーズ中にまだ撮っていなければ撮影権を消費して true
    pub fn take_screenshot_slot(&mut self) -> bool {
        if self.mode != Mode::Paused || self.screenshot_taken {
            return false;
        }
        self.screenshot_taken = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(sm: &mut PauseStateMachine, frames: &[u8]) -> Vec<Mode> {
        frames
            .iter()
            .map(|&f| {
                sm.update(f == 1);
                sm.mode()
            })
            .collect()
    }

    #[test]
    fn test_initial_state() {
        let sm = PauseStateMachine::new(2);
        assert_eq!(sm.mode(), Mode::Active);
        assert_eq!(sm.hold_count(), 0);
    }

    #[test]
    fn test_interrupted_hold_never_pauses() {
        let mut sm = PauseStateMachine::new(2);
        let modes = run(&mut sm, &[1, 1, 0, 1, 1]);
        assert!(modes.iter().all(|m| *m == Mode::Active));
        assert_eq!(sm.hold_count(), 2);
    }

    #[test]
    fn test_pause_after_hold() {
        let mut sm = PauseStateMachine::new(2);
        assert_eq!(sm.update(true), Transition::None);
        assert_eq!(sm.update(true), Transition::None);
        assert_eq!(sm.update(true), Transition::Paused);
        assert!(sm.is_paused());
        assert_eq!(sm.update(true), Transition::None);
        assert!(sm.is_paused());
    }

    #[test]
    fn test_zero_hold_pauses_immediately() {
        let mut sm = PauseStateMachine::new(0);
        assert_eq!(sm.update(true), Transition::Paused);
    }

    #[test]
    fn test_non_qualifying_frame_resets_counter() {
        let mut sm = PauseStateMachine::new(3);
        run(&mut sm, &[1, 1, 1]);
        assert_eq!(sm.hold_count(), 3);
        sm.update(false);
        assert_eq!(sm.hold_count(), 0);
    }

    #[test]
    fn test_resume_is_immediate() {
        let mut sm = PauseStateMachine::new(1);
        run(&mut sm, &[1, 1, 1, 1]);
        assert!(sm.is_paused());
        assert_eq!(sm.update(false), Transition::Resumed);
        assert_eq!(sm.mode(), Mode::Active);
    }

    #[test]
    fn test_screenshot_slot_once_per_episode() {
        let mut sm = PauseStateMachine::new(0);
        assert!(!sm.take_screenshot_slot());

        sm.update(true);
        assert!(sm.take_screenshot_slot());
        for _ in 0..10 {
            sm.update(true);
            assert!(!sm.take_screenshot_slot());
        }

        // ACTIVE を挟むと再び撮れる
        sm.update(false);
        assert!(!sm.take_screenshot_slot());
        sm.update(true);
        assert!(sm.take_screenshot_slot());
    }
}
