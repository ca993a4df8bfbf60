use anyhow::Result;
use plotters::prelude::*;

use super::COLOR_BLACK;

const PAD: i32 = 3;
const GAP: i32 = 8;
const MAX_STEPS: i32 = 40;

/// Direction in which labels are stacked away from their anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stack {
    Up,
    Down,
}

impl Stack {
    fn flipped(self) -> Stack {
        match self {
            Stack::Up => Stack::Down,
            Stack::Down => Stack::Up,
        }
    }
}

/// Axis-aligned box in pixel space; `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelBox {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl LabelBox {
    pub fn overlaps(&self, other: &LabelBox) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    fn inside(&self, bounds: &LabelBox) -> bool {
        self.x >= bounds.x
            && self.y >= bounds.y
            && self.x + self.w <= bounds.x + bounds.w
            && self.y + self.h <= bounds.y + bounds.h
    }

    fn clamped(&self, bounds: &LabelBox) -> LabelBox {
        LabelBox {
            x: self.x.clamp(bounds.x, (bounds.x + bounds.w - self.w).max(bounds.x)),
            y: self.y.clamp(bounds.y, (bounds.y + bounds.h - self.h).max(bounds.y)),
            ..*self
        }
    }

    /// Point on the box edge facing the anchor.
    fn attach_point(&self, anchor: (i32, i32)) -> (i32, i32) {
        let x = self.x + self.w / 2;
        if anchor.1 >= self.y + self.h {
            (x, self.y + self.h)
        } else {
            (x, self.y)
        }
    }
}

/// Greedy label placement.
///
/// Labels are placed in order of how far their anchor sits in the stacking
/// direction (the strongest hits first). Each label tries slots at growing
/// distance from its anchor, left of, right of, then centred on it, first on the
/// `stack` side and then on the opposite side, and takes the first slot that
/// stays inside `bounds` without touching an earlier box. When no slot is free
/// the nearest slot is used, clamped into `bounds`.
///
/// Returns one box per anchor, in input order.
pub fn place_labels(anchors: &[(i32, i32)], sizes: &[(i32, i32)], bounds: LabelBox, stack: Stack) -> Vec<LabelBox> {
    let mut order: Vec<usize> = (0..anchors.len().min(sizes.len())).collect();
    match stack {
        Stack::Up => order.sort_by_key(|&i| anchors[i].1),
        Stack::Down => order.sort_by_key(|&i| std::cmp::Reverse(anchors[i].1)),
    }

    let mut placed: Vec<Option<LabelBox>> = vec![None; order.len()];
    let mut taken: Vec<LabelBox> = Vec::with_capacity(order.len());

    for i in order {
        let (ax, ay) = anchors[i];
        let (w, h) = sizes[i];

        // Preferred side first, then the opposite side of the anchor
        let candidates = [stack, stack.flipped()].into_iter().flat_map(|dir| {
            (0..MAX_STEPS).flat_map(move |step| {
                let d = GAP + step * (h + PAD);
                let y = match dir {
                    Stack::Up => ay - d - h,
                    Stack::Down => ay + d,
                };
                [ax - w - PAD, ax + PAD, ax - w / 2].map(move |x| LabelBox { x, y, w, h })
            })
        });

        let mut first = None;
        let mut chosen = None;
        for c in candidates {
            if first.is_none() {
                first = Some(c);
            }
            if c.inside(&bounds) && !taken.iter().any(|t| t.overlaps(&c)) {
                chosen = Some(c);
                break;
            }
        }

        let b = chosen
            .or_else(|| first.map(|f| f.clamped(&bounds)))
            .unwrap_or(LabelBox { x: ax, y: ay, w, h });
        taken.push(b);
        placed[i] = Some(b);
    }

    placed.into_iter().flatten().collect()
}

/// Draw boxed text labels with leader lines to their anchors.
///
/// Anchors and bounds are backend pixel coordinates, so `root` must be the
/// full-image drawing area.
pub fn draw_labels<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    anchors: &[(i32, i32)],
    texts: &[String],
    bounds: LabelBox,
    stack: Stack,
    font_size: u32,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    if anchors.is_empty() {
        return Ok(());
    }

    let style = ("sans-serif", font_size).into_font().color(&COLOR_BLACK);

    let mut sizes = Vec::with_capacity(texts.len());
    for t in texts {
        let (w, h) = root.estimate_text_size(t, &style)?;
        sizes.push((w as i32 + 2 * PAD, h as i32 + 2 * PAD));
    }

    let boxes = place_labels(anchors, &sizes, bounds, stack);

    for ((anchor, text), b) in anchors.iter().zip(texts).zip(&boxes) {
        root.draw(&PathElement::new(
            vec![*anchor, b.attach_point(*anchor)],
            COLOR_BLACK.stroke_width(1),
        ))?;
        root.draw(&Rectangle::new([(b.x, b.y), (b.x + b.w, b.y + b.h)], WHITE.filled()))?;
        root.draw(&Rectangle::new(
            [(b.x, b.y), (b.x + b.w, b.y + b.h)],
            COLOR_BLACK.stroke_width(1),
        ))?;
        root.draw(&Text::new(text.clone(), (b.x + PAD, b.y + PAD), style.clone()))?;
    }

    Ok(())
}
