use anyhow::Result;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use hand_orbit::camera::OpenCvCamera;
use hand_orbit::config::Config;
use hand_orbit::control::{Action, Controller, Transition};
use hand_orbit::hand::{FrameHands, HandDetector};
use hand_orbit::render::screenshot::ensure_dir;
use hand_orbit::render::MinifbRenderer;

const CONFIG_PATH: &str = "config.toml";
const CAPTURE_RETRY_DELAY: Duration = Duration::from_millis(10);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hand_orbit=info".into()),
        )
        .init();

    info!("hand-orbit {} starting", env!("GIT_VERSION"));

    let config_path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_PATH.to_string());
    let config = Config::load_or_default(&config_path)?;
    info!("Config: {}", config_path);

    let screenshot_dir = PathBuf::from(&config.render.screenshot_dir);
    ensure_dir(&screenshot_dir)?;

    let mut camera = OpenCvCamera::open(&config.camera)?;
    let frame_size = camera.resolution();
    let mut detector = HandDetector::spawn(&config.detector)?;
    let mut renderer = MinifbRenderer::new(
        "hand-orbit",
        config.render.width,
        config.render.height,
        config.render.fov_deg,
    )?;
    let mut controller = Controller::from_config(&config);

    info!("Left open palm: pause / Right thumbs up (paused): reset / Right peace (paused): screenshot");
    info!("Press ESC to exit");

    // FPS計測用
    let mut frame_count = 0u32;
    let mut fps_timer = Instant::now();
    let mut was_resetting = false;

    while renderer.is_open() {
        let frame = match camera.read_frame() {
            Ok(f) => f,
            Err(e) => {
                debug!("Frame capture error: {}", e);
                // 前回のバッファを出し直してウィンドウイベントを処理させる
                renderer.update()?;
                std::thread::sleep(CAPTURE_RETRY_DELAY);
                continue;
            }
        };

        let detections = detector.detect(&frame)?;
        let hands = FrameHands::from_detections(detections)?;
        let output = controller.update(&hands, frame_size);

        match output.transition {
            Transition::Paused => info!("Paused"),
            Transition::Resumed => info!("Resumed"),
            Transition::None => {}
        }

        renderer.clear();
        renderer.draw_scene(controller.pose());

        // スクリーンショットはプレビューと枠を重ねる前のシーンだけ
        if output.actions.contains(&Action::Screenshot) {
            match renderer.save_screenshot(&screenshot_dir) {
                Ok(path) => info!("Saved: {}", path.display()),
                Err(e) => warn!("Screenshot failed: {:#}", e),
            }
        }

        renderer.draw_preview(&frame, config.render.preview_scale)?;
        for hand in hands.left.iter().chain(hands.right.iter()) {
            renderer.draw_hand(hand);
        }
        renderer.draw_status(controller.mode());

        // Reset は保持中ずっと出るので立ち上がりだけログ
        let resetting = output.actions.contains(&Action::Reset);
        if resetting && !was_resetting {
            info!("Reset");
        }
        was_resetting = resetting;

        renderer.update()?;

        frame_count += 1;
        let elapsed = fps_timer.elapsed().as_secs_f32();
        if elapsed >= 5.0 {
            let pose = controller.pose();
            debug!(
                "FPS: {:.1}, rotation: {:?}, position: {:?}, distance: {:.2}",
                frame_count as f32 / elapsed,
                pose.rotation,
                pose.position,
                pose.camera_distance
            );
            frame_count = 0;
            fps_timer = Instant::now();
        }
    }

    info!("Shutting down...");
    Ok(())
}
