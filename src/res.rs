use axum::{http::StatusCode, response::{Html, IntoResponse, Response}};
use pulldown_cmark::{CowStr, Event, Parser, Tag};
use time::{macros::format_description, OffsetDateTime};

use crate::AppResult;

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

pub fn sorry(what: &str) -> AppResult<Response> {
    Ok((
        StatusCode::NOT_FOUND,
        Html(include_res!(str, "/pages/sorry.html").replace("{what}", what)),
    ).into_response())
}

/// Renders anonymous message content. Raw HTML is escaped, never passed through,
/// and script links are defused.
pub fn markdown_to_html(content: &str) -> String {
    let parser = Parser::new(content).map(|event| match event {
        Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
        Event::Start(Tag::Link { link_type, dest_url, title, id }) if is_script_url(&dest_url) => {
            Event::Start(Tag::Link { link_type, dest_url: CowStr::Borrowed("#"), title, id })
        }
        Event::Start(Tag::Image { link_type, dest_url, title, id }) if is_script_url(&dest_url) => {
            Event::Start(Tag::Image { link_type, dest_url: CowStr::Borrowed("#"), title, id })
        }
        _ => event,
    });

    let mut html_output = String::new();
    pulldown_cmark::html::push_html(&mut html_output, parser);
    html_output
}

fn is_script_url(url: &str) -> bool {
    let scheme = url.trim_start().split(':').next().unwrap_or_default().to_ascii_lowercase();
    url.contains(':') && matches!(scheme.as_str(), "javascript" | "vbscript" | "data")
}

pub fn readable_date(at: OffsetDateTime) -> String {
    at.format(format_description!("[month repr:long] [day padding:none], [year] [hour]:[minute]"))
        .unwrap_or_else(|_| at.to_string())
}
