use crate::report::confusion::ConfusionMatrix;

/// One polyline on a line chart.
pub struct Series<'a> {
    pub label: &'a str,
    pub values: &'a [f64],
    pub color: &'a str,
}

const GREY_GRID: &str = "#e5e7eb";
const GREY_TEXT: &str = "#666";
const DARK_TEXT: &str = "#222";

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Renders an epoch-indexed line chart as a standalone SVG document.
pub fn render_line_chart(title: &str, y_desc: &str, series: &[Series<'_>]) -> String {
    let w = 640.0f64;
    let h = 480.0f64;
    let pad_l = 64.0f64;
    let pad_r = 20.0f64;
    let pad_t = 40.0f64;
    let pad_b = 48.0f64;

    let n = series.iter().map(|s| s.values.len()).max().unwrap_or(0);
    let all_vals = series.iter().flat_map(|s| s.values.iter().copied()).filter(|v| v.is_finite());
    let max_y = all_vals.fold(0.0f64, f64::max) * 1.05;
    let max_y = if max_y > 0.0 { max_y } else { 1.0 };
    let min_y = 0.0f64;

    let px = |i: usize, v: f64| -> (f64, f64) {
        let frac = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.5 };
        let x = pad_l + frac * (w - pad_l - pad_r);
        let y = pad_t + (max_y - v) / (max_y - min_y) * (h - pad_t - pad_b);
        (x, y)
    };

    // Horizontal grid with y axis labels.
    let y_labels: String = (0..=4).map(|g| {
        let frac = g as f64 / 4.0;
        let val = min_y + (max_y - min_y) * frac;
        let y = pad_t + (1.0 - frac) * (h - pad_t - pad_b);
        format!(
            "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"1\"/>\n\
             <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" fill=\"{}\" font-size=\"11\">{:.3}</text>",
            pad_l, y, w - pad_r, y, GREY_GRID,
            pad_l - 6.0, y + 4.0, GREY_TEXT, val
        )
    }).collect::<Vec<_>>().join("\n");

    // Epoch ticks: first, middle, last.
    let mut ticks = vec![0, n / 2, n.saturating_sub(1)];
    ticks.dedup();
    let x_labels: String = if n == 0 {
        String::new()
    } else {
        ticks.iter().map(|&i| {
            let (x, _) = px(i, 0.0);
            format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"{}\" font-size=\"11\">{}</text>",
                x, h - pad_b + 16.0, GREY_TEXT, i + 1
            )
        }).collect::<Vec<_>>().join("\n")
    };

    let lines: String = series.iter().filter(|s| !s.values.is_empty()).map(|s| {
        let path: String = s.values.iter().enumerate().map(|(i, &v)| {
            let (x, y) = px(i, v);
            if i == 0 { format!("M{:.1},{:.1}", x, y) } else { format!(" L{:.1},{:.1}", x, y) }
        }).collect();
        let markers: String = s.values.iter().enumerate().map(|(i, &v)| {
            let (x, y) = px(i, v);
            format!("<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"2.5\" fill=\"{}\"/>", x, y, s.color)
        }).collect();
        format!(
            "<path d=\"{}\" stroke=\"{}\" stroke-width=\"2\" fill=\"none\"/>\n{}",
            path, s.color, markers
        )
    }).collect::<Vec<_>>().join("\n");

    let legend: String = series.iter().enumerate().map(|(k, s)| {
        let y = pad_t + 14.0 + k as f64 * 16.0;
        let x = w - pad_r - 150.0;
        format!(
            "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"2\"/>\n\
             <text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-size=\"11\">{}</text>",
            x, y - 4.0, x + 18.0, y - 4.0, s.color,
            x + 24.0, y, DARK_TEXT, escape(s.label)
        )
    }).collect::<Vec<_>>().join("\n");

    format!(
        "<svg width=\"{w}\" height=\"{h}\" xmlns=\"http://www.w3.org/2000/svg\">\n\
         <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n\
         <text x=\"{tx:.1}\" y=\"24\" text-anchor=\"middle\" fill=\"{dark}\" font-size=\"15\">{title}</text>\n\
         {y_labels}\n{x_labels}\n\
         <text x=\"{ex:.1}\" y=\"{ey:.1}\" text-anchor=\"middle\" fill=\"{dark}\" font-size=\"12\">Epoch</text>\n\
         <text x=\"16\" y=\"{yy:.1}\" text-anchor=\"middle\" fill=\"{dark}\" font-size=\"12\" \
         transform=\"rotate(-90 16 {yy:.1})\">{y_desc}</text>\n\
         {lines}\n\
         <!-- Legend -->\n\
         {legend}\n\
         </svg>\n",
        w = w, h = h,
        tx = w / 2.0, dark = DARK_TEXT, title = escape(title),
        y_labels = y_labels, x_labels = x_labels,
        ex = pad_l + (w - pad_l - pad_r) / 2.0, ey = h - 10.0,
        yy = pad_t + (h - pad_t - pad_b) / 2.0, y_desc = escape(y_desc),
        lines = lines, legend = legend,
    )
}

/// Maps `t` in [0, 1] onto a white → dark blue ramp.
fn blues(t: f64) -> String {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    format!("#{:02x}{:02x}{:02x}", lerp(247.0, 8.0), lerp(251.0, 48.0), lerp(255.0, 107.0))
}

/// Renders a row-normalized confusion matrix as an annotated heatmap.
///
/// Rows are true classes, columns predicted classes. Each cell shows its
/// proportion with two decimals; text turns white on cells above half the
/// matrix maximum.
pub fn render_confusion_matrix(matrix: &ConfusionMatrix, classes: &[String]) -> String {
    let norm = matrix.normalized();
    let n = matrix.num_classes();
    let cell = 48.0f64;
    let pad_l = 130.0f64;
    let pad_t = 50.0f64;
    let pad_b = 120.0f64;
    let bar_w = 16.0f64;
    let w = pad_l + cell * n as f64 + 80.0;
    let h = pad_t + cell * n as f64 + pad_b;

    let max = norm.iter().flatten().cloned().fold(0.0f64, f64::max);
    let thresh = max / 2.0;
    let label = |i: usize| classes.get(i).map(|c| escape(c)).unwrap_or_else(|| i.to_string());

    let cells: String = norm.iter().enumerate().flat_map(|(r, row)| {
        row.iter().enumerate().map(move |(c, &v)| (r, c, v))
    }).map(|(r, c, v)| {
        let x = pad_l + c as f64 * cell;
        let y = pad_t + r as f64 * cell;
        let fill = blues(if max > 0.0 { v / max } else { 0.0 });
        let text = if v > thresh { "white" } else { "black" };
        format!(
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"/>\n\
             <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"{}\" font-size=\"11\">{:.2}</text>",
            x, y, cell, cell, fill,
            x + cell / 2.0, y + cell / 2.0 + 4.0, text, v
        )
    }).collect::<Vec<_>>().join("\n");

    let y_ticks: String = (0..n).map(|i| {
        format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" fill=\"{}\" font-size=\"11\">{}</text>",
            pad_l - 6.0, pad_t + (i as f64 + 0.5) * cell + 4.0, DARK_TEXT, label(i)
        )
    }).collect::<Vec<_>>().join("\n");

    // Predicted-label ticks rotated 45 degrees, anchored at their end.
    let x_ticks: String = (0..n).map(|i| {
        let x = pad_l + (i as f64 + 0.5) * cell;
        let y = pad_t + n as f64 * cell + 12.0;
        format!(
            "<text x=\"{x:.1}\" y=\"{y:.1}\" text-anchor=\"end\" fill=\"{}\" font-size=\"11\" \
             transform=\"rotate(-45 {x:.1} {y:.1})\">{}</text>",
            DARK_TEXT, label(i), x = x, y = y
        )
    }).collect::<Vec<_>>().join("\n");

    let bar_x = pad_l + n as f64 * cell + 20.0;
    let bar_h = n as f64 * cell;
    let colorbar: String = (0..10).map(|k| {
        let t = 1.0 - k as f64 / 10.0;
        format!(
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"/>",
            bar_x, pad_t + k as f64 * bar_h / 10.0, bar_w, bar_h / 10.0, blues(t)
        )
    }).collect::<Vec<_>>().join("\n");

    format!(
        "<svg width=\"{w:.0}\" height=\"{h:.0}\" xmlns=\"http://www.w3.org/2000/svg\">\n\
         <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n\
         <text x=\"{tx:.1}\" y=\"28\" text-anchor=\"middle\" fill=\"{dark}\" font-size=\"15\">Normalized confusion matrix</text>\n\
         {cells}\n{y_ticks}\n{x_ticks}\n{colorbar}\n\
         <text x=\"{bx:.1}\" y=\"{by0:.1}\" fill=\"{grey}\" font-size=\"10\">{max:.2}</text>\n\
         <text x=\"{bx:.1}\" y=\"{by1:.1}\" fill=\"{grey}\" font-size=\"10\">0.00</text>\n\
         <text x=\"{tx:.1}\" y=\"{xl:.1}\" text-anchor=\"middle\" fill=\"{dark}\" font-size=\"12\">Predicted label</text>\n\
         <text x=\"14\" y=\"{yl:.1}\" text-anchor=\"middle\" fill=\"{dark}\" font-size=\"12\" \
         transform=\"rotate(-90 14 {yl:.1})\">True label</text>\n\
         </svg>\n",
        w = w, h = h,
        tx = pad_l + n as f64 * cell / 2.0, dark = DARK_TEXT, grey = GREY_TEXT,
        cells = cells, y_ticks = y_ticks, x_ticks = x_ticks, colorbar = colorbar,
        bx = bar_x + bar_w + 4.0, by0 = pad_t + 8.0, by1 = pad_t + bar_h,
        max = max,
        xl = h - 12.0, yl = pad_t + bar_h / 2.0,
    )
}
