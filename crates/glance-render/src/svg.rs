//! SVG serialisation of drawings and widget views.

use crate::color::Color;
use crate::geometry::{Drawing, Path, PathCommand, Shape};
use crate::widget::{
    Background, Icon, IconView, Symbol, TextLine, WidgetBody, WidgetContent, WidgetView,
    ERROR_HINT_SIZE, ERROR_TEXT_SIZE,
};

const PADDING: f64 = 24.0;
const FONT_FAMILY: &str = "-apple-system, 'SF Pro Text', 'Helvetica Neue', Arial, sans-serif";
/// Characters per line before the error message wraps.
const ERROR_WRAP_CHARS: usize = 26;

/// A standalone SVG document for a single drawing.
pub fn drawing_svg(drawing: &Drawing) -> String {
    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = num(drawing.width),
        h = num(drawing.height),
    );
    write_shapes(&mut out, drawing);
    out.push_str("</svg>");
    out
}

/// The complete widget as an SVG document.
pub fn widget_svg(view: &WidgetView) -> String {
    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = num(view.width),
        h = num(view.height),
    );

    write_background(&mut out, view);

    if let Some(url) = &view.url {
        out.push_str(&format!(r#"<a xlink:href="{}">"#, escape(url)));
    }

    match &view.body {
        WidgetBody::Content(content) => write_content(&mut out, view, content),
        WidgetBody::Error {
            message,
            hint,
            color,
        } => write_error(&mut out, message, hint.as_deref(), *color),
    }

    if view.url.is_some() {
        out.push_str("</a>");
    }
    out.push_str("</svg>");
    out
}

fn write_background(out: &mut String, view: &WidgetView) {
    let fill = match &view.background {
        Background::Gradient { start, end } => {
            out.push_str(r#"<defs><linearGradient id="background" x1="0" y1="0" x2="0" y2="1">"#);
            out.push_str(&format!(
                r#"<stop offset="0" stop-color="{}"/><stop offset="1" stop-color="{}"/>"#,
                start.to_hex(),
                end.to_hex()
            ));
            out.push_str("</linearGradient></defs>");
            "url(#background)".to_string()
        }
        Background::Plain(color) => color.to_hex(),
    };
    out.push_str(&format!(
        r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
        num(view.width),
        num(view.height),
        fill
    ));
}

fn write_content(out: &mut String, view: &WidgetView, content: &WidgetContent) {
    let header_baseline = PADDING + content.header.size;
    write_text_line(out, &content.header, PADDING, header_baseline, content.text_color);

    let value_baseline = header_baseline + 6.0 + content.value.size;
    write_text_line(out, &content.value, PADDING, value_baseline, content.text_color);

    write_icon(
        out,
        &content.icon,
        view.width - PADDING - content.icon.size,
        PADDING,
    );

    let footer_height: f64 = content.footer.iter().map(|l| l.size * 1.3).sum();

    let band_top = value_baseline + 14.0;
    let band_bottom = view.height - PADDING - footer_height - 6.0;
    let band_width = view.width - 2.0 * PADDING;
    write_fitted(out, &content.graphic, band_top, band_bottom, band_width, view.width);

    let mut baseline = view.height - PADDING - footer_height;
    for line in &content.footer {
        baseline += line.size * 1.3;
        write_text_line(out, line, PADDING, baseline - line.size * 0.3, content.text_color);
    }
}

fn write_error(out: &mut String, message: &str, hint: Option<&str>, color: Color) {
    let mut baseline = PADDING + ERROR_TEXT_SIZE;
    for line in wrap(message, ERROR_WRAP_CHARS) {
        write_error_line(out, &line, baseline, ERROR_TEXT_SIZE, color);
        baseline += ERROR_TEXT_SIZE * 1.25;
    }

    let Some(hint) = hint else { return };
    baseline += ERROR_HINT_SIZE * 0.75;
    let hint_chars = ERROR_WRAP_CHARS * 4 / 3;
    for line in wrap(hint, hint_chars) {
        write_error_line(out, &line, baseline, ERROR_HINT_SIZE, color);
        baseline += ERROR_HINT_SIZE * 1.25;
    }
}

fn write_error_line(out: &mut String, text: &str, baseline: f64, size: f64, color: Color) {
    out.push_str(&format!(
        r#"<text x="{}" y="{}" font-family="{}" font-size="{}" fill="{}">{}</text>"#,
        num(PADDING),
        num(baseline),
        FONT_FAMILY,
        num(size),
        color.to_hex(),
        escape(text)
    ));
}

fn write_text_line(out: &mut String, line: &TextLine, x: f64, baseline: f64, color: Color) {
    out.push_str(&format!(
        r#"<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{}"{}>{}</text>"#,
        num(x),
        num(baseline),
        FONT_FAMILY,
        num(line.size),
        line.weight.css_weight(),
        paint_attrs("fill", color),
        escape(&line.text)
    ));
}

fn write_icon(out: &mut String, icon: &IconView, x: f64, y: f64) {
    let s = icon.size;
    match icon.icon {
        Icon::Symbol(symbol) => write_symbol(out, symbol, icon.tint, x, y, s),
        Icon::TemplatePng(base64) => {
            out.push_str(&format!(
                r#"<mask id="icon-mask" mask-type="alpha"><image x="{x}" y="{y}" width="{s}" height="{s}" xlink:href="data:image/png;base64,{data}"/></mask>"#,
                x = num(x),
                y = num(y),
                s = num(s),
                data = base64,
            ));
            out.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}" mask="url(#icon-mask)"{}/>"#,
                num(x),
                num(y),
                num(s),
                num(s),
                paint_attrs("fill", icon.tint)
            ));
        }
    }
}

/// Three stacked rounded bars; the bottom `level` bars are solid.
fn write_symbol(out: &mut String, symbol: Symbol, tint: Color, x: f64, y: f64, size: f64) {
    let bar_height = size / 6.0;
    let gap = (size - 3.0 * bar_height) / 2.0;
    for i in 0..3u8 {
        let from_bottom = 2 - i;
        let alpha = if from_bottom < symbol.level() { 1.0 } else { 0.3 };
        let inset = f64::from(i) * size / 10.0;
        out.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}"{}/>"#,
            num(x + inset),
            num(y + f64::from(i) * (bar_height + gap)),
            num(size - inset),
            num(bar_height),
            num(bar_height / 2.0),
            paint_attrs("fill", tint.with_alpha(tint.alpha * alpha))
        ));
    }
}

/// Place a drawing centred horizontally, scaled to fit the band.
fn write_fitted(
    out: &mut String,
    drawing: &Drawing,
    top: f64,
    bottom: f64,
    max_width: f64,
    total_width: f64,
) {
    let max_height = (bottom - top).max(0.0);
    if drawing.width <= 0.0 || drawing.height <= 0.0 || max_height <= 0.0 {
        tracing::warn!("No room to place {}x{} graphic", drawing.width, drawing.height);
        return;
    }
    let scale = (max_width / drawing.width).min(max_height / drawing.height);
    let width = drawing.width * scale;
    let height = drawing.height * scale;
    let x = (total_width - width) / 2.0;
    let y = top + (max_height - height) / 2.0;

    out.push_str(&format!(
        r#"<svg x="{}" y="{}" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        num(x),
        num(y),
        num(width),
        num(height),
        num(drawing.width),
        num(drawing.height)
    ));
    write_shapes(out, drawing);
    out.push_str("</svg>");
}

fn write_shapes(out: &mut String, drawing: &Drawing) {
    for shape in &drawing.shapes {
        match shape {
            Shape::FillPath { path, color } => out.push_str(&format!(
                r#"<path d="{}"{}/>"#,
                path_data(path),
                paint_attrs("fill", *color)
            )),
            Shape::StrokePath { path, color, width } => out.push_str(&format!(
                r#"<path d="{}" fill="none" stroke-width="{}"{}/>"#,
                path_data(path),
                num(*width),
                paint_attrs("stroke", *color)
            )),
            Shape::FillCircle { center, radius, color } => out.push_str(&format!(
                r#"<circle cx="{}" cy="{}" r="{}"{}/>"#,
                num(center.x),
                num(center.y),
                num(*radius),
                paint_attrs("fill", *color)
            )),
            Shape::StrokeCircle {
                center,
                radius,
                color,
                width,
            } => out.push_str(&format!(
                r#"<circle cx="{}" cy="{}" r="{}" fill="none" stroke-width="{}"{}/>"#,
                num(center.x),
                num(center.y),
                num(*radius),
                num(*width),
                paint_attrs("stroke", *color)
            )),
            Shape::Text {
                text,
                rect,
                size,
                weight,
                color,
            } => {
                let c = rect.center();
                out.push_str(&format!(
                    r#"<text x="{}" y="{}" text-anchor="middle" dominant-baseline="central" font-family="{}" font-size="{}" font-weight="{}"{}>{}</text>"#,
                    num(c.x),
                    num(c.y),
                    FONT_FAMILY,
                    num(*size),
                    weight.css_weight(),
                    paint_attrs("fill", *color),
                    escape(text)
                ));
            }
        }
    }
}

/// SVG `d` attribute for a path.
pub fn path_data(path: &Path) -> String {
    path.commands()
        .iter()
        .map(|c| match c {
            PathCommand::MoveTo(p) => format!("M{} {}", num(p.x), num(p.y)),
            PathCommand::LineTo(p) => format!("L{} {}", num(p.x), num(p.y)),
            PathCommand::QuadTo { ctrl, to } => format!(
                "Q{} {} {} {}",
                num(ctrl.x),
                num(ctrl.y),
                num(to.x),
                num(to.y)
            ),
            PathCommand::Close => "Z".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn paint_attrs(kind: &str, color: Color) -> String {
    if color.is_opaque() {
        format!(r#" {}="{}""#, kind, color.to_hex())
    } else {
        format!(
            r#" {kind}="{}" {kind}-opacity="{}""#,
            color.to_hex(),
            num(f64::from(color.alpha))
        )
    }
}

/// Compact number formatting: at most two decimals, trailing zeros dropped.
fn num(v: f64) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Escape text for use in XML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
