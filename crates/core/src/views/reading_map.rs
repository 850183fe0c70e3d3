use okuma_seyri_protocol::{
    GazeSample, Point, ReadingCounters, Rect, RenderCommand, TextAlign, TextBlock, ThemeToken,
    Viewport,
};

use crate::summary::ReadingSummary;
use crate::transition::{Transition, TransitionTracker};

const HEADER_HEIGHT: f64 = 24.0;
const SIDE_MARGIN: f64 = 8.0;
const FONT_SIZE: f64 = 11.0;
const LABEL_CHARS: usize = 48;
const PATH_WIDTH: f64 = 1.5;

/// Render blocks and the gaze path over them.
///
/// Each block becomes a horizontal band shaded by how many samples landed
/// on it. Consecutive classified samples are joined by line segments;
/// segments that regress or skip ahead get their own colours. The page is
/// fitted vertically into the viewport below a one-line counters header.
///
/// `counters` are the session's cumulative counters, shown in the header.
/// They can exceed what `samples` alone would give once old samples have
/// been evicted.
pub fn render_reading_map(
    blocks: &[TextBlock],
    samples: &[GazeSample],
    counters: ReadingCounters,
    viewport: &Viewport,
) -> Vec<RenderCommand> {
    let Some((y_min, y_max)) = content_range(blocks, samples) else {
        return Vec::new();
    };

    let summary = ReadingSummary::from_samples(samples);
    let body_height = (viewport.height - HEADER_HEIGHT).max(1.0);
    let span = y_max - y_min;
    let y_scale = if span > 0.0 { body_height / span } else { 1.0 };
    let to_y = |y: f64| HEADER_HEIGHT + (y - y_min) * y_scale;

    let mut commands = Vec::with_capacity(blocks.len() + samples.len() + 6);
    commands.push(RenderCommand::BeginGroup {
        id: "reading-map".to_string(),
        label: None,
    });
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, 0.0, viewport.width, viewport.height),
        color: ThemeToken::Background,
        border_color: None,
        label: None,
        block_id: None,
    });

    let max_dwell = summary.max_dwell();
    for block in blocks {
        let dwell = summary.dwell_for(block.id);
        let top = to_y(block.top);
        let height = (block.height() * y_scale).max(1.0);
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(
                SIDE_MARGIN,
                top,
                (viewport.width - 2.0 * SIDE_MARGIN).max(1.0),
                height,
            ),
            color: heat_token(dwell, max_dwell),
            border_color: Some(ThemeToken::BlockBorder),
            label: Some(block_label(block, dwell)),
            block_id: Some(block.id),
        });
    }

    let mut tracker = TransitionTracker::new();
    let mut previous: Option<Point> = None;
    for sample in samples {
        let transition = tracker.observe(sample.block_id);
        if transition == Transition::Unknown {
            continue;
        }
        let x_scale = if sample.viewport.width > 0 {
            viewport.width / f64::from(sample.viewport.width)
        } else {
            1.0
        };
        let point = Point::new(sample.x as f64 * x_scale, to_y(sample.y as f64));
        if let Some(from) = previous {
            commands.push(RenderCommand::DrawLine {
                from,
                to: point,
                color: path_token(transition),
                width: PATH_WIDTH,
            });
        }
        previous = Some(point);
    }

    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, 0.0, viewport.width, HEADER_HEIGHT),
        color: ThemeToken::HeaderBackground,
        border_color: None,
        label: None,
        block_id: None,
    });
    commands.push(RenderCommand::DrawText {
        position: Point::new(SIDE_MARGIN, HEADER_HEIGHT - 8.0),
        text: format!(
            "{} samples | {} line changes | {} back | {} skip",
            summary.sample_count, counters.line_changes, counters.line_back, counters.line_skip
        ),
        color: ThemeToken::TextPrimary,
        font_size: FONT_SIZE,
        align: TextAlign::Left,
    });
    commands.push(RenderCommand::DrawText {
        position: Point::new(viewport.width - SIDE_MARGIN, HEADER_HEIGHT - 8.0),
        text: format!("{:.0}% off-text", summary.unknown_ratio() * 100.0),
        color: ThemeToken::TextMuted,
        font_size: FONT_SIZE,
        align: TextAlign::Right,
    });

    commands.push(RenderCommand::EndGroup);
    commands
}

/// Vertical range covering every block and every classified sample.
fn content_range(blocks: &[TextBlock], samples: &[GazeSample]) -> Option<(f64, f64)> {
    let block_ys = blocks.iter().flat_map(|b| [b.top, b.bottom]);
    let sample_ys = samples
        .iter()
        .filter(|s| s.block_id.is_some())
        .map(|s| s.y as f64);
    let (lo, hi) = block_ys
        .chain(sample_ys)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });
    (lo.is_finite() && hi.is_finite()).then_some((lo, hi))
}

fn heat_token(dwell: usize, max_dwell: usize) -> ThemeToken {
    if dwell == 0 || max_dwell == 0 {
        return ThemeToken::DwellNone;
    }
    let ratio = dwell as f64 / max_dwell as f64;
    if ratio >= 2.0 / 3.0 {
        ThemeToken::DwellHot
    } else if ratio >= 1.0 / 3.0 {
        ThemeToken::DwellWarm
    } else {
        ThemeToken::DwellCold
    }
}

fn path_token(transition: Transition) -> ThemeToken {
    match transition {
        Transition::Regress => ThemeToken::RegressionPath,
        Transition::Skip => ThemeToken::SkipPath,
        _ => ThemeToken::GazePath,
    }
}

fn block_label(block: &TextBlock, dwell: usize) -> String {
    let text = block.text.split_whitespace().collect::<Vec<_>>().join(" ");
    let snippet = if text.chars().count() > LABEL_CHARS {
        let cut: String = text.chars().take(LABEL_CHARS - 1).collect();
        format!("{cut}…")
    } else {
        text
    };
    format!("{} [{dwell}] {snippet}", block.id)
}
