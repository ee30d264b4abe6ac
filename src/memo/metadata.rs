//! # Page Metadata Extraction
//!
//! Reads the title and the link to record for the page a snippet was taken
//! from. This is a pure read of the page markup: nothing is fetched, and missing
//! pieces degrade to the navigated URL or an empty title.
//!
//! - **href**: `<link rel="canonical">`, unless it is missing, unusable, or
//!   points at a host known to misuse canonical links. Then the navigated URL.
//! - **cache key**: always the navigated URL, so a cached composer state tracks
//!   the page instance the user actually had open.
//! - **title**: first non-empty of `og:title`, `twitter:title`, `<title>`, the
//!   first `<h1>`.

use crate::model::CacheableModel;
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use url::Url;

/// Hosts whose canonical links point somewhere other than the page itself.
const SKIP_CANONICAL_HOSTNAMES: &[&str] = &["www.youtube.com"];

/// The page a tab is showing: where it was navigated to and its markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSnapshot {
    pub location: String,
    pub html: String,
}

impl PageSnapshot {
    pub fn new(location: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            html: html.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub href: String,
    pub cache_key: String,
}

/// Extract title, link and cache key from a page.
pub fn extract(page: &PageSnapshot) -> PageMetadata {
    let head = scan(&page.html);

    let title = [
        head.og_title.as_deref(),
        head.twitter_title.as_deref(),
        head.title.as_deref(),
        head.h1.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .find(|t| !t.is_empty())
    .unwrap_or_default()
    .to_string();

    PageMetadata {
        title,
        href: page_url(&page.location, head.canonical.as_deref()),
        cache_key: page.location.clone(),
    }
}

/// Fresh composer data for a page, with the selected text as description.
pub fn capture(page: &PageSnapshot, selection: Option<&str>) -> CacheableModel {
    let meta = extract(page);
    CacheableModel {
        title: Some(meta.title),
        href: Some(meta.href),
        cache_key: Some(meta.cache_key),
        description: selection.map(str::to_string),
        ..Default::default()
    }
}

fn page_url(location: &str, canonical: Option<&str>) -> String {
    let Some(canonical) = canonical.map(str::trim).filter(|c| !c.is_empty()) else {
        return location.to_string();
    };

    let (href, host) = match Url::parse(canonical) {
        Ok(url) => (canonical.to_string(), url.host_str().map(str::to_string)),
        Err(_) => match Url::parse(location).and_then(|base| base.join(canonical)) {
            Ok(joined) => {
                let host = joined.host_str().map(str::to_string);
                (joined.to_string(), host)
            }
            Err(_) => return location.to_string(),
        },
    };

    match host {
        Some(host) if !SKIP_CANONICAL_HOSTNAMES.contains(&host.as_str()) => href,
        _ => location.to_string(),
    }
}

#[derive(Debug, Default)]
struct HeadScan {
    canonical: Option<String>,
    og_title: Option<String>,
    twitter_title: Option<String>,
    title: Option<String>,
    h1: Option<String>,
}

/// Which element's text is being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    None,
    Title,
    Heading,
}

struct HeadScanner {
    scan: HeadScan,
    capture: Capture,
    buffer: String,
}

impl HeadScanner {
    fn start_tag(&mut self, tag: &Tag) -> TokenSinkResult<()> {
        match &*tag.name {
            "meta" => {
                let content = attr(tag, "content");
                if attr(tag, "property").is_some_and(|p| p == "og:title") {
                    self.scan.og_title.get_or_insert(content.unwrap_or_default());
                } else if attr(tag, "name").is_some_and(|n| n == "twitter:title") {
                    self.scan
                        .twitter_title
                        .get_or_insert(content.unwrap_or_default());
                }
            }
            "link" => {
                if attr(tag, "rel").is_some_and(|r| r.eq_ignore_ascii_case("canonical")) {
                    self.scan
                        .canonical
                        .get_or_insert(attr(tag, "href").unwrap_or_default());
                }
            }
            "title" => {
                if self.scan.title.is_none() && !tag.self_closing {
                    self.capture = Capture::Title;
                    self.buffer.clear();
                }
                return TokenSinkResult::RawData(RawKind::Rcdata);
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                // A heading start tag closes any open heading.
                if self.capture == Capture::Heading {
                    self.flush();
                }
                if &*tag.name == "h1" && self.scan.h1.is_none() && self.capture == Capture::None {
                    self.capture = Capture::Heading;
                    self.buffer.clear();
                }
            }
            "script" => return TokenSinkResult::RawData(RawKind::ScriptData),
            "style" | "noscript" | "iframe" | "noembed" | "noframes" | "xmp" => {
                return TokenSinkResult::RawData(RawKind::Rawtext);
            }
            "textarea" => return TokenSinkResult::RawData(RawKind::Rcdata),
            _ => {}
        }
        TokenSinkResult::Continue
    }

    fn end_tag(&mut self, tag: &Tag) {
        let closes = match (&*tag.name, self.capture) {
            ("title", Capture::Title) => true,
            ("h1" | "h2" | "h3" | "h4" | "h5" | "h6", Capture::Heading) => true,
            _ => false,
        };
        if closes {
            self.flush();
        }
    }

    /// Store the text collected so far for the element being captured.
    fn flush(&mut self) {
        let text = collapse_whitespace(&self.buffer);
        match self.capture {
            Capture::Title => self.scan.title = Some(text),
            Capture::Heading => self.scan.h1 = Some(text),
            Capture::None => {}
        }
        self.capture = Capture::None;
        self.buffer.clear();
    }
}

impl TokenSink for HeadScanner {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => match tag.kind {
                TagKind::StartTag => return self.start_tag(&tag),
                TagKind::EndTag => self.end_tag(&tag),
            },
            Token::CharacterTokens(text) => {
                if self.capture != Capture::None {
                    self.buffer.push_str(&text);
                }
            }
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

fn attr(tag: &Tag, name: &str) -> Option<String> {
    tag.attrs
        .iter()
        .find(|a| &*a.name.local == name)
        .map(|a| a.value.trim().to_string())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn scan(html: &str) -> HeadScan {
    let sink = HeadScanner {
        scan: HeadScan::default(),
        capture: Capture::None,
        buffer: String::new(),
    };
    let mut tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
    let mut queue = BufferQueue::default();
    queue.push_back(StrTendril::from_slice(html));
    let _ = tokenizer.feed(&mut queue);
    tokenizer.end();

    // Elements still open at end of input end there.
    tokenizer.sink.flush();
    tokenizer.sink.scan
}
