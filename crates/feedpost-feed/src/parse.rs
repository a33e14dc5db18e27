//! RSS item extraction.

use feedpost_core::{FeedItem, Url};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::FeedError;

/// Parse an RSS XML body and return its first complete item.
///
/// Items are taken in document order, which for news feeds is newest first.
/// An item counts only when it has a non-empty `<title>` and an absolute
/// `<link>`; incomplete items are skipped.
///
/// # Errors
///
/// Returns [`FeedError::Xml`] if the XML is malformed before a complete item
/// is found.
pub fn parse_latest_item(xml: &str) -> Result<Option<FeedItem>, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut in_item = false;
    let mut current_tag = String::new();
    let mut title = String::new();
    let mut link = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = std::str::from_utf8(e.name().as_ref())
                    .unwrap_or("")
                    .to_string();
                if name == "item" {
                    in_item = true;
                    title.clear();
                    link.clear();
                }
                current_tag = name;
            }
            Ok(Event::End(e)) => {
                let raw = e.name();
                let name = std::str::from_utf8(raw.as_ref()).unwrap_or("");
                if name == "item" && in_item {
                    in_item = false;
                    if let Some(item) = complete_item(&title, &link) {
                        return Ok(Some(item));
                    }
                    tracing::debug!(title = %title, link = %link, "skipping incomplete feed item");
                }
                current_tag.clear();
            }
            Ok(Event::Text(e)) => {
                if in_item {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    match current_tag.as_str() {
                        "title" => title.push_str(&text),
                        "link" => link.push_str(&text),
                        _ => {}
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if in_item {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    match current_tag.as_str() {
                        "title" => title.push_str(&text),
                        "link" => link.push_str(&text),
                        _ => {}
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FeedError::Xml(e)),
            _ => {}
        }
    }

    Ok(None)
}

fn complete_item(title: &str, link: &str) -> Option<FeedItem> {
    let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
    if title.is_empty() {
        return None;
    }
    let link = Url::parse(link.trim()).ok()?;
    if !matches!(link.scheme(), "http" | "https") {
        return None;
    }
    Some(FeedItem::new(title, link))
}
