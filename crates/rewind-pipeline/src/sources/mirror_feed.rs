//! Mirror RSS feed parsing.
//!
//! Mirror instances serve a per-account RSS feed: the channel-level
//! `<image><url>` is the account avatar and each `<item>` is one post. The
//! fragility of feed scraping stays contained here; callers only ever see
//! the parsed [`MirrorFeed`] subset.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::LookupError;

/// The schema subset a mirror feed is reduced to.
#[derive(Debug, Default)]
pub(super) struct MirrorFeed {
    pub(super) image_url: Option<String>,
    pub(super) items: Vec<FeedItem>,
}

#[derive(Debug, Default)]
pub(super) struct FeedItem {
    pub(super) title: String,
    pub(super) link: String,
    pub(super) description: String,
    pub(super) pub_date: String,
}

/// Parse a mirror RSS feed into the [`MirrorFeed`] subset.
///
/// Extracts the channel `<image><url>` and, per `<item>`: `<title>`,
/// `<link>`, `<description>` (HTML stripped), `<pubDate>`. Unknown elements
/// are skipped.
///
/// # Errors
///
/// Returns [`LookupError::Xml`] if the XML is malformed.
pub(super) fn parse_mirror_feed(xml: &str) -> Result<MirrorFeed, LookupError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut feed = MirrorFeed::default();
    let mut item = FeedItem::default();
    let mut in_item = false;
    let mut in_image = false;
    let mut in_description = false;
    let mut current_tag = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name_buf = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("").to_string();
                match name.as_str() {
                    "item" => {
                        in_item = true;
                        in_description = false;
                        item = FeedItem::default();
                    }
                    "image" if !in_item => in_image = true,
                    "description" if in_item => in_description = true,
                    _ => {}
                }
                current_tag = name;
            }
            Ok(Event::End(e)) => {
                let name_buf = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("");
                match name {
                    "description" => in_description = false,
                    "image" => in_image = false,
                    "item" if in_item => {
                        in_item = false;
                        if !item.link.is_empty() {
                            feed.items.push(std::mem::take(&mut item));
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().unwrap_or_default().into_owned();
                if in_item {
                    if in_description {
                        // Accumulate all text nodes inside <description>,
                        // including those emitted after nested tags.
                        if !item.description.is_empty() {
                            item.description.push(' ');
                        }
                        item.description.push_str(&text);
                    } else {
                        match current_tag.as_str() {
                            "title" => item.title = text,
                            "link" => item.link = text,
                            "pubDate" => item.pub_date = text,
                            _ => {}
                        }
                    }
                } else if in_image && current_tag == "url" {
                    feed.image_url = Some(text);
                }
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                if in_item {
                    if in_description {
                        item.description = strip_html(&text);
                    } else if current_tag == "title" {
                        item.title = strip_html(&text);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(LookupError::Xml(e)),
            _ => {}
        }
    }

    Ok(feed)
}

/// Strip HTML tags from a string and normalize whitespace.
fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>tester / @tester</title>
    <image>
      <url>https://mirror.example/pic/avatar.jpg</url>
      <title>tester</title>
    </image>
    <item>
      <title>First post about $GMIC</title>
      <link>https://mirror.example/tester/status/111#m</link>
      <description><![CDATA[<p>First post about <b>$GMIC</b></p>]]></description>
      <pubDate>Sat, 02 Nov 2024 10:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Second post</title>
      <link>https://mirror.example/tester/status/222#m</link>
      <description>plain description</description>
      <pubDate>Fri, 01 Nov 2024 09:00:00 GMT</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parses_channel_image_and_items() {
        let feed = parse_mirror_feed(FEED).unwrap();
        assert_eq!(
            feed.image_url.as_deref(),
            Some("https://mirror.example/pic/avatar.jpg")
        );
        assert_eq!(feed.items.len(), 2);
    }

    #[test]
    fn strips_html_from_cdata_descriptions() {
        let feed = parse_mirror_feed(FEED).unwrap();
        assert_eq!(feed.items[0].description, "First post about $GMIC");
        assert_eq!(feed.items[1].description, "plain description");
    }

    #[test]
    fn keeps_link_and_pub_date() {
        let feed = parse_mirror_feed(FEED).unwrap();
        assert_eq!(
            feed.items[0].link,
            "https://mirror.example/tester/status/111#m"
        );
        assert_eq!(feed.items[0].pub_date, "Sat, 02 Nov 2024 10:00:00 GMT");
    }

    #[test]
    fn items_without_links_are_dropped() {
        let xml = r"<rss><channel><item><title>no link</title></item></channel></rss>";
        let feed = parse_mirror_feed(xml).unwrap();
        assert!(feed.items.is_empty());
    }

    #[test]
    fn empty_feed_parses_to_empty_items() {
        let xml = r"<rss><channel><title>tester</title></channel></rss>";
        let feed = parse_mirror_feed(xml).unwrap();
        assert!(feed.items.is_empty());
        assert!(feed.image_url.is_none());
    }

    #[test]
    fn strip_html_collapses_whitespace() {
        assert_eq!(strip_html("<p>a  b</p>\n<br>c"), "a b c");
    }
}
