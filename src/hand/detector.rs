//! MediaPipe Hands をサブプロセスとして動かす手検出器
//!
//! プロトコル (1フレームごと):
//! - stdin: ヘッダ `width`, `height`, `channels` (u32 little endian) + BGR 生データ
//! - stdout: JSON 1行 `{"hands": [{"handedness", "score", "landmarks": [{x,y,z} ×21]}], "error": null}`
//!
//! 起動直後に `READY` の1行を送ってくるまで待つ。

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

use super::landmark::Detection;

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    #[serde(default)]
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    handedness: String,
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionResponse {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// 検出プロセスの応答1行をパースする。
/// `error` 付きの応答は手なしとして扱う
pub fn parse_response(line: &str, min_score: f32) -> Result<Vec<Detection>> {
    let response: DetectionResponse = serde_json::from_str(line.trim())
        .with_context(|| format!("Failed to parse detector response: {}", line.trim()))?;

    if let Some(error) = response.error {
        warn!("Hand detector error: {}", error);
        return Ok(Vec::new());
    }

    Ok(response
        .hands
        .into_iter()
        .filter(|h| h.score >= min_score)
        .map(|h| Detection {
            label: h.handedness,
            score: h.score,
            points: h.landmarks.iter().map(|l| [l.x, l.y, l.z]).collect(),
        })
        .collect())
}

#[cfg(feature = "desktop")]
pub use process::HandDetector;

#[cfg(feature = "desktop")]
mod process {
    use anyhow::{Context, Result};
    use opencv::{core::Mat, prelude::*};
    use std::io::{BufRead, BufReader, Write};
    use std::process::{Child, ChildStdout, Command, Stdio};
    use tracing::info;

    use super::parse_response;
    use crate::config::DetectorConfig;
    use crate::hand::landmark::Detection;

    pub struct HandDetector {
        process: Child,
        stdout_reader: BufReader<ChildStdout>,
        min_score: f32,
    }

    impl HandDetector {
        pub fn spawn(config: &DetectorConfig) -> Result<Self> {
            info!("Starting hand detector: {} {}", config.command, config.script);

            let mut process = Command::new(&config.command)
                .arg(&config.script)
                .stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .stderr(Stdio::inherit())
                .spawn()
                .with_context(|| format!("Failed to start {}", config.command))?;

            let stdout = process.stdout.take().context("Failed to get detector stdout")?;
            let mut stdout_reader = BufReader::new(stdout);

            let mut ready = String::new();
            stdout_reader.read_line(&mut ready)?;
            if ready.trim() != "READY" {
                let _ = process.kill();
                anyhow::bail!("Hand detector did not signal ready, got: {:?}", ready);
            }
            info!("Hand detector ready");

            Ok(Self {
                process,
                stdout_reader,
                min_score: config.min_score,
            })
        }

        /// BGR フレームから手を検出
        pub fn detect(&mut self, frame: &Mat) -> Result<Vec<Detection>> {
            if frame.empty() {
                return Ok(Vec::new());
            }

            let width = frame.cols() as u32;
            let height = frame.rows() as u32;
            let channels = frame.channels() as u32;
            let data = frame.data_bytes()?;

            let stdin = self.process.stdin.as_mut().context("Failed to get detector stdin")?;
            stdin.write_all(&width.to_le_bytes())?;
            stdin.write_all(&height.to_le_bytes())?;
            stdin.write_all(&channels.to_le_bytes())?;
            stdin.write_all(data)?;
            stdin.flush()?;

            let mut line = String::new();
            if self.stdout_reader.read_line(&mut line)? == 0 {
                anyhow::bail!("Hand detector exited");
            }
            parse_response(&line, self.min_score)
        }
    }

    impl Drop for HandDetector {
        fn drop(&mut self) {
            let _ = self.process.kill();
        }
    }
}
