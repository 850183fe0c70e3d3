//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use okuma_seyri_protocol::{RenderCommand, TextAlign, ThemeToken};

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions.
/// `dark` selects the color palette.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, dark: bool) -> String {
    let mut svg = String::with_capacity(commands.len() * 160);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif;font-size:11px">"#,
    ));

    for cmd in commands {
        match cmd {
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                label,
                block_id,
            } => {
                let fill = resolve_color(*color, dark);
                svg.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}""#,
                    rect.x, rect.y, rect.w, rect.h,
                ));
                if let Some(border) = border_color {
                    svg.push_str(&format!(
                        r#" stroke="{}" stroke-width="0.5""#,
                        resolve_color(*border, dark)
                    ));
                }
                if let Some(id) = block_id {
                    svg.push_str(&format!(r#" data-block="{id}""#));
                }
                svg.push('>');
                if let Some(label) = label {
                    svg.push_str(&format!("<title>{}</title>", escape_xml(label)));
                }
                svg.push_str("</rect>");

                // Inline the label when the band is tall enough to hold a line of text.
                if let Some(label) = label
                    && rect.h >= 12.0
                {
                    let text_color = resolve_color(ThemeToken::TextPrimary, dark);
                    let ty = rect.y + rect.h / 2.0 + 4.0;
                    svg.push_str(&format!(
                        r#"<text x="{}" y="{ty}" fill="{text_color}" style="pointer-events:none">{}</text>"#,
                        rect.x + 4.0,
                        escape_xml(label),
                    ));
                }
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                let stroke = resolve_color(*color, dark);
                svg.push_str(&format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{stroke}" stroke-width="{line_width}"/>"#,
                    from.x, from.y, to.x, to.y,
                ));
            }
            RenderCommand::DrawText {
                text,
                position,
                color,
                font_size,
                align,
            } => {
                let fill = resolve_color(*color, dark);
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                svg.push_str(&format!(
                    r#"<text x="{}" y="{}" fill="{fill}" font-size="{font_size}" text-anchor="{anchor}">{}</text>"#,
                    position.x,
                    position.y,
                    escape_xml(text),
                ));
            }
            RenderCommand::BeginGroup { id, .. } => {
                svg.push_str(&format!(r#"<g id="{}">"#, escape_xml(id)));
            }
            RenderCommand::EndGroup => svg.push_str("</g>"),
        }
    }

    svg.push_str("</svg>");
    svg
}

fn resolve_color(token: ThemeToken, dark: bool) -> &'static str {
    if dark {
        match token {
            ThemeToken::Background => "#181818",
            ThemeToken::HeaderBackground => "#262626",
            ThemeToken::DwellHot => "#f44336",
            ThemeToken::DwellWarm => "#ffa726",
            ThemeToken::DwellCold => "#42a5f5",
            ThemeToken::DwellNone => "#303030",
            ThemeToken::BlockBorder => "#424242",
            ThemeToken::GazePath => "#e0e0e0",
            ThemeToken::RegressionPath => "#ffd600",
            ThemeToken::SkipPath => "#ab47bc",
            ThemeToken::TextPrimary => "#ececec",
            ThemeToken::TextMuted => "#9e9e9e",
        }
    } else {
        match token {
            ThemeToken::Background => "#ffffff",
            ThemeToken::HeaderBackground => "#f1f3f5",
            ThemeToken::DwellHot => "#e63946",
            ThemeToken::DwellWarm => "#f4845f",
            ThemeToken::DwellCold => "#a8dadc",
            ThemeToken::DwellNone => "#f8f9fa",
            ThemeToken::BlockBorder => "#dee2e6",
            ThemeToken::GazePath => "#1a1a2e",
            ThemeToken::RegressionPath => "#e67e22",
            ThemeToken::SkipPath => "#8e44ad",
            ThemeToken::TextPrimary => "#1a1a2e",
            ThemeToken::TextMuted => "#666677",
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use okuma_seyri_protocol::{Point, Rect};

    #[test]
    fn basic_svg_output() {
        let commands = vec![
            RenderCommand::BeginGroup {
                id: "reading-map".into(),
                label: None,
            },
            RenderCommand::DrawRect {
                rect: Rect::new(8.0, 24.0, 300.0, 40.0),
                color: ThemeToken::DwellHot,
                border_color: Some(ThemeToken::BlockBorder),
                label: Some("0 [3] Birinci".into()),
                block_id: Some(0),
            },
            RenderCommand::DrawLine {
                from: Point::new(0.0, 30.0),
                to: Point::new(10.0, 50.0),
                color: ThemeToken::RegressionPath,
                width: 1.5,
            },
            RenderCommand::EndGroup,
        ];
        let svg = render_svg(&commands, 800.0, 400.0, true);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"<g id="reading-map">"#));
        assert!(svg.contains(r#"data-block="0""#));
        assert!(svg.contains("#f44336"));
        assert!(svg.contains("#ffd600"));
        assert!(svg.contains("Birinci"));
    }

    #[test]
    fn escapes_xml_entities() {
        let commands = vec![RenderCommand::DrawText {
            position: Point::new(0.0, 10.0),
            text: "a < b & \"c\"".into(),
            color: ThemeToken::TextMuted,
            font_size: 11.0,
            align: TextAlign::Right,
        }];
        let svg = render_svg(&commands, 400.0, 100.0, false);
        assert!(svg.contains("a &lt; b &amp; &quot;c&quot;"));
        assert!(svg.contains(r#"text-anchor="end""#));
    }
}
