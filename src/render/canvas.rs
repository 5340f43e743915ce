/// 0RGB の u32 ピクセルバッファ
pub struct Canvas {
    buffer: Vec<u32>,
    width: usize,
    height: usize,
    clip: Option<Rect>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            buffer: vec![0u32; width * height],
            width,
            height,
            clip: None,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn buffer(&self) -> &[u32] {
        &self.buffer
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.buffer[y * self.width + x])
    }

    pub fn clear(&mut self, color: u32) {
        self.buffer.fill(color);
    }

    /// 描画範囲を制限する。None でキャンバス全体
    pub fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip;
    }

    /// 現在の描画範囲（キャンバスとクリップの共通部分）
    fn bounds(&self) -> Rect {
        let full = Rect::new(0, 0, self.width as i32, self.height as i32);
        match self.clip {
            Some(clip) => full.intersect(&clip),
            None => full,
        }
    }

    /// 描画範囲に切り詰めてから Bresenham で線を描画。
    /// 範囲外の端点が極端な値でも走査は範囲内だけ
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let Some(((x0, y0), (x1, y1))) = self.bounds().clip_segment((x0, y0), (x1, y1)) else {
            return;
        };

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// 塗りつぶし円
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: u32) {
        let b = self.bounds();
        let r2 = radius as i64 * radius as i64;
        for y in (cy.saturating_sub(radius)).max(b.y)..=(cy.saturating_add(radius)).min(b.bottom() - 1) {
            for x in (cx.saturating_sub(radius)).max(b.x)..=(cx.saturating_add(radius)).min(b.right() - 1) {
                let (ddx, ddy) = (x as i64 - cx as i64, y as i64 - cy as i64);
                if ddx * ddx + ddy * ddy <= r2 {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }

    /// 矩形の枠を描画
    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, thickness: i32, color: u32) {
        for t in 0..thickness {
            let (x0, y0) = (x + t, y + t);
            let (x1, y1) = (x + w - 1 - t, y + h - 1 - t);
            if x0 > x1 || y0 > y1 {
                break;
            }
            self.draw_line(x0, y0, x1, y0, color);
            self.draw_line(x0, y1, x1, y1, color);
            self.draw_line(x0, y0, x0, y1, color);
            self.draw_line(x1, y0, x1, y1, color);
        }
    }

    /// 描画範囲内ならピクセルをセット
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if self.bounds().contains(x, y) {
            self.buffer[y as usize * self.width + x as usize] = color;
        }
    }
}

/// 左上 (x, y) と大きさで表す矩形（右端・下端は含まない）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width: width.max(0), height: height.max(0) }
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn intersect(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        Rect::new(x, y, self.right().min(other.right()) - x, self.bottom().min(other.bottom()) - y)
    }

    /// Liang-Barsky で線分を矩形内に切り詰める。交差しなければ None
    pub fn clip_segment(&self, p0: (i32, i32), p1: (i32, i32)) -> Option<((i32, i32), (i32, i32))> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let (x0, y0) = (p0.0 as f64, p0.1 as f64);
        let (dx, dy) = (p1.0 as f64 - x0, p1.1 as f64 - y0);
        let (xmin, ymin) = (self.x as f64, self.y as f64);
        let (xmax, ymax) = ((self.right() - 1) as f64, (self.bottom() - 1) as f64);

        let mut t0 = 0.0f64;
        let mut t1 = 1.0f64;
        for (p, q) in [(-dx, x0 - xmin), (dx, xmax - x0), (-dy, y0 - ymin), (dy, ymax - y0)] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return None;
            }
        }

        let at = |t: f64| {
            let x = (x0 + t * dx).round().clamp(xmin, xmax) as i32;
            let y = (y0 + t * dy).round().clamp(ymin, ymax) as i32;
            (x, y)
        };
        Some((at(t0), at(t1)))
    }
}
