use crate::core::utils::html::escape;
use crate::engine::error::EngineError;
use std::fs;
use std::path::Path;

const BASE_STYLES: &str = r#"
    :root {
        --primary: #145ABE;
        --accent: #185FE2;
        --success: #388e3c;
        --danger: #d32f2f;
        --text: #212121;
        --muted: #6c757d;
        --border: #e0e0e0;
        --surface: #f5f5f5;
    }
    body {
        font-family: 'Roboto', -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
        color: var(--text);
        background: #ffffff;
        margin: 0;
    }
    .container { max-width: 1200px; margin: 0 auto; padding: 20px; }
    .footer { text-align: center; color: var(--muted); font-size: 0.85em; margin-top: 30px; }
    .notice {
        border-left: 5px solid var(--danger);
        background: #fdecea;
        color: #c62828;
        padding: 12px 16px;
        border-radius: 5px;
        margin: 15px 0;
    }
"#;

/// Wraps rendered sections in a complete HTML document.
pub fn document(title: &str, head_extra: &str, styles: &str, body: &str) -> String {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M UTC");
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
    @import url('https://fonts.googleapis.com/css2?family=Roboto+Mono&family=Roboto:wght@400;500;700&display=swap');
{base}
{styles}
    </style>
{head_extra}
</head>
<body>
<div class="container">
{body}
    <div class="footer">
        <p>Generated by boltzkit {version} on {timestamp}</p>
    </div>
</div>
</body>
</html>
"#,
        title = escape(title),
        base = BASE_STYLES,
        styles = styles,
        head_extra = head_extra,
        body = body,
        version = env!("CARGO_PKG_VERSION"),
        timestamp = timestamp,
    )
}

/// A visible warning box, used when a section could not be rendered.
pub fn notice(message: &str) -> String {
    format!(r#"<div class="notice">{}</div>"#, escape(message))
}

pub fn write_html(path: &Path, html: &str) -> Result<(), EngineError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| EngineError::io(parent, e))?;
    }
    fs::write(path, html).map_err(|e| EngineError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_escapes_title_and_embeds_body() {
        let html = document("Job <T1>", "", ".x { }", "<p>body</p>");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Job &lt;T1&gt;</title>"));
        assert!(html.contains("<p>body</p>"));
        assert!(html.contains(".x { }"));
    }

    #[test]
    fn notice_text_is_escaped() {
        assert_eq!(
            notice("missing <pae>"),
            r#"<div class="notice">missing &lt;pae&gt;</div>"#
        );
    }

    #[test]
    fn write_html_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job/report.html");
        write_html(&path, "<html></html>").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "<html></html>");
    }
}
