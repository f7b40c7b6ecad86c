//! Email body rendering.
//!
//! Structured recommendations become a small self-contained HTML document
//! with one styled block per pick (title as a link, summary as body text).
//! The line-based digest variant is opaque model output and is passed
//! through verbatim as plain text.

use crate::models::DigestContent;
use chrono::Local;
use html_escape::{encode_double_quoted_attribute, encode_text};

/// How the rendered body should be labelled in the outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Html,
    Plain,
}

/// Render a digest into an email body and its content kind.
pub fn digest_body(content: &DigestContent) -> (String, BodyKind) {
    match content {
        DigestContent::Raw(text) => (text.clone(), BodyKind::Plain),
        DigestContent::Structured(items) => {
            let mut body = format!(
                "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"></head>\n\
                 <body style=\"font-family: sans-serif; color: #222;\">\n\
                 <h2>Square picks for {}</h2>\n",
                Local::now().date_naive()
            );
            for item in items {
                body.push_str(&format!(
                    "<div style=\"margin: 12px 0; padding: 12px; \
                     border: 1px solid #ddd; border-radius: 6px;\">\n\
                     <h3 style=\"margin: 0 0 6px 0;\">\
                     <a href=\"{link}\">{title}</a></h3>\n\
                     <p style=\"margin: 0;\">{summary}</p>\n\
                     </div>\n",
                    link = encode_double_quoted_attribute(&item.link),
                    title = encode_text(&item.title),
                    summary = encode_text(&item.summary),
                ));
            }
            body.push_str("</body>\n</html>\n");
            (body, BodyKind::Html)
        }
    }
}
