//! Local preview compositor: document model to an HTML fragment.
//!
//! Deterministic and free of IO. The engine uses it directly when the
//! backend cannot render a preview.
use crate::document::DocumentModel;

pub const UNTITLED_PROJECT: &str = "Untitled Project";
pub const DEFAULT_CAPTION: &str = "Screenshot";
/// Shown before the first render completes.
pub const PREVIEW_PLACEHOLDER: &str = "<p>Preview will appear here.</p>";

/// Escape user text for element content. Newlines become line breaks.
pub fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + raw.len() / 8);
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\n' => out.push_str("<br />"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape user text for a double-quoted attribute value.
pub fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + raw.len() / 8);
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            _ => out.push(c),
        }
    }
    out
}

struct Html {
    buf: String,
}

impl Html {
    fn new() -> Self {
        Self {
            buf: String::with_capacity(4 * 1024),
        }
    }

    fn push(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    fn text(&mut self, raw: &str) {
        self.buf.push_str(&escape_text(raw));
    }

    fn attr(&mut self, raw: &str) {
        self.buf.push_str(&escape_attr(raw));
    }

    fn finish(self) -> String {
        self.buf
    }
}

/// Render the document as the live-preview fragment.
///
/// Title, table of contents, one `<section>` per section in order, then one
/// `<figure>` per screenshot numbered by position.
pub fn render_preview_html(doc: &DocumentModel) -> String {
    let mut w = Html::new();

    w.push("<article><h1>");
    let title = if doc.meta.project_title.is_empty() {
        UNTITLED_PROJECT
    } else {
        doc.meta.project_title.as_str()
    };
    w.text(title);
    w.push("</h1><h3>Table of Contents</h3>");

    for entry in doc.toc() {
        w.push("<div class=\"toc-entry\"><span>");
        w.text(&entry.title);
        w.push("</span><span>");
        w.push(&entry.page.to_string());
        w.push("</span></div>");
    }

    for section in &doc.sections {
        w.push("<section><h2>");
        w.text(&section.heading);
        w.push("</h2><p>");
        w.text(&section.content);
        w.push("</p></section>");
    }

    for (idx, figure) in doc.figures.iter().enumerate() {
        let caption = if figure.caption.is_empty() {
            DEFAULT_CAPTION
        } else {
            figure.caption.as_str()
        };
        w.push("<figure><img src=\"");
        w.attr(figure.image_ref());
        w.push("\" alt=\"");
        w.attr(caption);
        w.push("\" style=\"max-width:100%\" /><figcaption>Figure ");
        w.push(&(idx + 1).to_string());
        w.push(": ");
        w.text(caption);
        w.push("</figcaption></figure>");
    }

    w.push("</article>");
    w.finish()
}
