use crate::trends::ChartPoint;
use crate::ui::escape_html;

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 260.0;
const PADDING_X: f64 = 52.0;
const PADDING_Y: f64 = 34.0;
const TOP: f64 = 24.0;
const TICKS: usize = 4;

/// Renders a downvote series as an inline SVG line chart.
///
/// Values are magnitudes; axis labels carry a leading minus sign.
pub fn render_line_chart(points: &[ChartPoint]) -> String {
    if points.is_empty() {
        return format!(
            r#"<svg class="chart" viewBox="0 0 {WIDTH} {HEIGHT}" role="img"><text class="chart-label" x="50%" y="50%" text-anchor="middle">No data yet</text></svg>"#
        );
    }

    let (min, max) = value_range(points);
    let range = max - min;
    let x_step = if points.len() > 1 {
        (WIDTH - PADDING_X * 2.0) / (points.len() - 1) as f64
    } else {
        0.0
    };
    let scale_y = (HEIGHT - TOP - PADDING_Y) / range;
    let x = |index: usize| PADDING_X + index as f64 * x_step;
    let y = |value: f64| HEIGHT - PADDING_Y - (value - min) * scale_y;

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg class="chart" viewBox="0 0 {WIDTH} {HEIGHT}" role="img" aria-label="Downvotes per day">"#
    ));

    for tick in 0..=TICKS {
        let value = min + range * tick as f64 / TICKS as f64;
        let y_pos = y(value);
        svg.push_str(&format!(
            r#"<line class="chart-grid" x1="{PADDING_X}" y1="{y_pos:.2}" x2="{x2}" y2="{y_pos:.2}" /><text class="chart-label" x="{lx}" y="{ly:.2}" text-anchor="end">{label}</text>"#,
            x2 = WIDTH - PADDING_X,
            lx = PADDING_X - 10.0,
            ly = y_pos + 4.0,
            label = axis_label(value),
        ));
    }

    let path: Vec<String> = points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let command = if index == 0 { 'M' } else { 'L' };
            format!("{command} {:.2} {:.2}", x(index), y(point.value))
        })
        .collect();
    svg.push_str(&format!(r#"<path class="chart-line" d="{}" />"#, path.join(" ")));

    let label_every = if points.len() > 8 { 2 } else { 1 };
    for (index, point) in points.iter().enumerate() {
        svg.push_str(&format!(
            r#"<circle class="chart-point" cx="{:.2}" cy="{:.2}" r="4"><title>{}: -{}</title></circle>"#,
            x(index),
            y(point.value),
            escape_html(&point.label),
            point.value,
        ));
        if index % label_every == 0 {
            svg.push_str(&format!(
                r#"<text class="chart-label" x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
                x(index),
                HEIGHT - PADDING_Y + 18.0,
                escape_html(&point.label),
            ));
        }
    }

    svg.push_str("</svg>");
    svg
}

fn value_range(points: &[ChartPoint]) -> (f64, f64) {
    let mut min = points.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
    let mut max = points.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);
    min = min.min(0.0);
    max = max.max(0.0);
    if min == max {
        min -= 1.0;
        max += 1.0;
    }
    (min, max)
}

fn axis_label(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    if rounded.fract() == 0.0 {
        format!("-{}", rounded as i64)
    } else {
        format!("-{rounded:.1}")
    }
}
