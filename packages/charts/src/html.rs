//! HTML writers wrapping a [`Figure`] for the browser.
//!
//! Documents are self-contained apart from the plotly.js script tag, so
//! a MapDocument opens directly from disk and embeds cleanly in an
//! iframe. Fragments assume the embedding page has already loaded
//! plotly.js once.

use crate::Figure;

/// Script tag loading the chart renderer. Pinned so regenerated
/// documents stay byte-identical across runs.
pub const PLOTLY_SCRIPT_TAG: &str =
    r#"<script src="https://cdn.plot.ly/plotly-2.32.0.min.js" charset="utf-8"></script>"#;

/// Serialises a figure for embedding inside an inline `<script>` block.
///
/// `</` is escaped so a closing tag inside a string value (an authority
/// name, a title) cannot terminate the script element early.
///
/// # Errors
///
/// Returns a serialisation error if the figure cannot be encoded.
fn inline_json(figure: &Figure) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(figure)?.replace("</", "<\\/"))
}

/// Renders a figure as a standalone HTML document.
///
/// # Errors
///
/// Returns a serialisation error if the figure cannot be encoded.
pub fn document(title: &str, figure: &Figure) -> Result<String, serde_json::Error> {
    let payload = inline_json(figure)?;
    let title = escape_text(title);
    Ok(format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         {PLOTLY_SCRIPT_TAG}\n\
         <style>html, body {{ margin: 0; padding: 0; }}</style>\n\
         </head>\n\
         <body>\n\
         <div id=\"chart\"></div>\n\
         <script>\n\
         const figure = {payload};\n\
         Plotly.newPlot(\"chart\", figure.data, figure.layout, {{\"responsive\": true}});\n\
         </script>\n\
         </body>\n\
         </html>\n"
    ))
}

/// Renders a figure as an inline fragment: a `<div>` plus the script
/// that plots into it. The embedding page must include
/// [`PLOTLY_SCRIPT_TAG`] once.
///
/// # Errors
///
/// Returns a serialisation error if the figure cannot be encoded.
pub fn fragment(div_id: &str, figure: &Figure) -> Result<String, serde_json::Error> {
    let payload = inline_json(figure)?;
    Ok(format!(
        "<div id=\"{div_id}\"></div>\n\
         <script>\n\
         (() => {{\n\
         const figure = {payload};\n\
         Plotly.newPlot(\"{div_id}\", figure.data, figure.layout, {{\"responsive\": true}});\n\
         }})();\n\
         </script>\n"
    ))
}

/// Escapes text for safe interpolation into HTML content.
#[must_use]
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn figure_with_title(title: &str) -> Figure {
        Figure {
            data: vec![json!({ "type": "bar", "x": ["a"], "y": [1] })],
            layout: json!({ "title": { "text": title } }),
        }
    }

    #[test]
    fn document_is_self_contained() {
        let html = document("Test Chart", &figure_with_title("Test Chart")).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(PLOTLY_SCRIPT_TAG));
        assert!(html.contains("Plotly.newPlot"));
        assert!(html.contains("<title>Test Chart</title>"));
    }

    #[test]
    fn fragment_targets_its_div() {
        let html = fragment("severity-chart", &figure_with_title("t")).unwrap();
        assert!(html.contains("<div id=\"severity-chart\"></div>"));
        assert!(html.contains("Plotly.newPlot(\"severity-chart\""));
        assert!(!html.contains(PLOTLY_SCRIPT_TAG));
    }

    #[test]
    fn payload_cannot_break_out_of_the_script_element() {
        let html = document("t", &figure_with_title("</script><b>bad</b>")).unwrap();
        assert!(!html.contains("</script><b>"));
        assert!(html.contains("<\\/script>"));
    }

    #[test]
    fn titles_are_escaped_in_markup() {
        assert_eq!(escape_text("a < b & c"), "a &lt; b &amp; c");
    }
}
