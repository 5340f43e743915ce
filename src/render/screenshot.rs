use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use image::{Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};

/// 保存先ディレクトリを作成（既にあれば何もしない）
pub fn ensure_dir<P: AsRef<Path>>(dir: P) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create screenshot directory {}", dir.display()))
}

/// `<dir>/snap_<YYYYMMDD_HHMMSS>.png`
pub fn snapshot_path<P: AsRef<Path>>(dir: P, time: &DateTime<Local>) -> PathBuf {
    dir.as_ref()
        .join(format!("snap_{}.png", time.format("%Y%m%d_%H%M%S")))
}

/// 0RGB バッファを PNG として保存
pub fn save_png(path: &Path, buffer: &[u32], width: usize, height: usize) -> Result<()> {
    if buffer.len() != width * height {
        anyhow::bail!(
            "Buffer size {} does not match {}x{}",
            buffer.len(),
            width,
            height
        );
    }
    let img = RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let p = buffer[y as usize * width + x as usize];
        Rgb([(p >> 16) as u8, (p >> 8) as u8, p as u8])
    });
    img.save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
