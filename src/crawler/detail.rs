//! Detail page extraction
//!
//! Turns the markup of one detail page into an [`ItemDetail`]. Every field
//! is extracted on its own and falls back to its default when the page does
//! not carry it, so a missing or odd-looking field never affects the others.
//!
//! # Label/value pairs
//!
//! Info paragraphs look like `<p><strong>Genres:</strong> Action, Drama</p>`.
//! Extraction runs in two passes: first every bold label inside a paragraph
//! is paired with the text node that directly follows it
//! ([`label_value`]), then the pairs are matched against the recognised
//! labels.
//!
//! # Download links
//!
//! Inside the download section, a heading whose text names a resolution
//! (`480p`, `720p`, `1080p`, `2160p`) labels the link held by the heading
//! right after it. Pairing is by adjacent index over the ordered headings;
//! a label whose successor carries no link yields nothing, and a heading
//! that carries its own link is never used as a label.

use crate::item::{
    absolutize, slugify, DownloadLink, ItemDetail, DEFAULT_LINK_LABEL, PLACEHOLDER_POSTER,
};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Resolution tokens recognised in quality values and link headings
pub const QUALITY_TOKENS: [&str; 4] = ["480p", "720p", "1080p", "2160p"];

/// Substrings that mark an image URL as a screenshot
const SCREENSHOT_URL_TOKENS: [&str; 4] = ["vlcsnap", "screenshot", "screen", "snap"];

const RATING_MARKER: &str = "IMDb Rating";

const DOWNLOAD_HEADINGS: &str = ".download-links-div h3, .download-links-div h4";
const DOWNLOAD_BUTTONS: &str = ".download-links-div a.btn";

/// Which download-link strategies apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkStrategy {
    /// Heading pairs, then button anchors, then the source page itself
    Bulk,
    /// Button anchors only; no links means the source removed the item
    Refresh,
}

/// Extracts every field of a detail page
///
/// `source_url` is the page's own URL and becomes the single download link
/// when no other link is found. `base` is the site origin used to rewrite
/// root-relative image URLs.
///
/// ```
/// use reel_harvest::crawler::extract_detail;
/// use url::Url;
///
/// let base = Url::parse("https://vegavinc.com").unwrap();
/// let item = extract_detail("<html></html>", "https://vegavinc.com/x/", &base);
/// assert_eq!(item.rating, 0.0);
/// assert_eq!(item.download_links.len(), 1);
/// assert_eq!(item.download_links[0].url, "https://vegavinc.com/x/");
/// ```
pub fn extract_detail(html: &str, source_url: &str, base: &Url) -> ItemDetail {
    let document = Html::parse_document(html);

    let title = extract_title(&document);
    let slug = slugify(&title);
    let poster_url = meta_content(&document, r#"meta[property="og:image"]"#)
        .unwrap_or_else(|| PLACEHOLDER_POSTER.to_string());
    let description =
        meta_content(&document, r#"meta[name="description"]"#).unwrap_or_else(|| title.clone());
    let rating = extract_rating(&document).unwrap_or(0.0);
    let info = InfoFields::from_pairs(label_pairs(&document));
    let download_links = download_links(&document, LinkStrategy::Bulk, source_url);
    let screenshots = extract_screenshots(&document, base);

    ItemDetail {
        title,
        slug,
        poster_url,
        description,
        rating,
        screenshots,
        download_links,
        genres: info.genres,
        cast: info.cast,
        languages: info.languages,
        size: info.size,
        quality: info.quality,
        resolution: info.resolution,
        audio: info.audio,
        release_year: info.release_year,
    }
}

/// Extracts only the download links, for the refresh flow
///
/// Uses the button-anchor strategy with no source-page fallback: an empty
/// result means the item is gone.
pub fn extract_refresh_links(html: &str) -> Vec<DownloadLink> {
    let document = Html::parse_document(html);
    download_links(&document, LinkStrategy::Refresh, "")
}

/// Returns the plain text that directly follows a label element
///
/// `None` when the next sibling node is not text or is blank.
pub fn label_value(label: ElementRef<'_>) -> Option<String> {
    label
        .next_sibling()?
        .value()
        .as_text()
        .map(|text| text.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn select_within<'a>(element: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => element.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn extract_title(document: &Html) -> String {
    ["h1.entry-title", "h1"]
        .iter()
        .find_map(|css| {
            select_all(document, css)
                .into_iter()
                .next()
                .map(|h1| element_text(h1).trim().to_string())
                .filter(|title| !title.is_empty())
        })
        .unwrap_or_default()
}

fn meta_content(document: &Html, css: &str) -> Option<String> {
    select_all(document, css)
        .into_iter()
        .find_map(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}

fn first_number(text: &str) -> Option<f64> {
    let re = Regex::new(r"\d+(?:\.\d+)?").ok()?;
    re.find(text)?.as_str().parse::<f64>().ok()
}

/// First number in the first paragraph mentioning the rating marker
fn extract_rating(document: &Html) -> Option<f64> {
    select_all(document, "p")
        .into_iter()
        .map(element_text)
        .find(|text| text.contains(RATING_MARKER))
        .and_then(|text| first_number(&text))
}

fn normalize_label(raw: &str) -> String {
    raw.trim().trim_end_matches(':').trim().to_lowercase()
}

/// Pairs every bold label inside a paragraph with its following text
fn label_pairs(document: &Html) -> Vec<(String, String)> {
    select_all(document, "p strong, p b")
        .into_iter()
        .filter_map(|label| {
            let value = label_value(label)?;
            Some((normalize_label(&element_text(label)), value))
        })
        .collect()
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

/// Resolution tokens in order of appearance, joined with ", "
fn scan_resolution(value: &str) -> Option<String> {
    let pattern = format!("(?i){}", QUALITY_TOKENS.join("|"));
    let re = Regex::new(&pattern).ok()?;
    let tokens: Vec<&str> = re.find_iter(value).map(|m| m.as_str()).collect();
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(", "))
    }
}

fn mentions_quality(text: &str) -> bool {
    let lower = text.to_lowercase();
    QUALITY_TOKENS.iter().any(|token| lower.contains(token))
}

fn parse_year(value: &str) -> Option<i32> {
    let re = Regex::new(r"\b(?:19|20)\d{2}\b").ok()?;
    re.find(value)?.as_str().parse().ok()
}

/// Values carried by the info paragraphs
#[derive(Debug, Default, PartialEq)]
struct InfoFields {
    genres: Vec<String>,
    cast: Vec<String>,
    languages: Vec<String>,
    size: Option<String>,
    quality: Option<String>,
    resolution: Option<String>,
    audio: Option<String>,
    release_year: Option<i32>,
}

impl InfoFields {
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut fields = Self::default();
        for (label, value) in pairs {
            fields.apply(&label, value);
        }
        fields
    }

    fn apply(&mut self, label: &str, value: String) {
        match label {
            "genres" => self.genres = split_list(&value),
            "cast" => self.cast = split_list(&value),
            "original language" => {
                let lower = value.to_lowercase();
                if lower.contains("hi") {
                    self.push_language("Hindi");
                }
                if lower.contains("en") {
                    self.push_language("English");
                }
            }
            "size" => self.size = Some(value),
            "quality" => {
                self.resolution = scan_resolution(&value);
                self.quality = Some(value);
            }
            "audio" => self.audio = Some(value),
            "release year" => {
                if let Some(year) = parse_year(&value) {
                    self.release_year = Some(year);
                }
            }
            _ => {}
        }
    }

    fn push_language(&mut self, language: &str) {
        if !self.languages.iter().any(|known| known == language) {
            self.languages.push(language.to_string());
        }
    }
}

fn download_links(
    document: &Html,
    strategy: LinkStrategy,
    source_url: &str,
) -> Vec<DownloadLink> {
    match strategy {
        LinkStrategy::Refresh => button_links(document),
        LinkStrategy::Bulk => {
            let mut links = pair_heading_links(&select_all(document, DOWNLOAD_HEADINGS));
            if links.is_empty() {
                links = button_links(document);
            }
            if links.is_empty() && !source_url.is_empty() {
                links.push(DownloadLink::new(DEFAULT_LINK_LABEL, source_url));
            }
            links
        }
    }
}

fn heading_link(heading: ElementRef<'_>) -> Option<String> {
    select_within(heading, "a[href]")
        .into_iter()
        .find_map(|a| a.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
}

/// Pairs label headings with the link of the heading at the next index
fn pair_heading_links(headings: &[ElementRef<'_>]) -> Vec<DownloadLink> {
    let links: Vec<Option<String>> = headings.iter().map(|h| heading_link(*h)).collect();

    headings
        .iter()
        .enumerate()
        .filter(|(i, _)| links[*i].is_none())
        .filter_map(|(i, heading)| {
            let label = collapse_whitespace(&element_text(*heading));
            if !mentions_quality(&label) {
                return None;
            }
            let url = links.get(i + 1)?.clone()?;
            Some(DownloadLink::new(label, url))
        })
        .collect()
}

fn button_links(document: &Html) -> Vec<DownloadLink> {
    select_all(document, DOWNLOAD_BUTTONS)
        .into_iter()
        .filter_map(|anchor| {
            let url = anchor.value().attr("href")?.trim().to_string();
            if url.is_empty() {
                return None;
            }
            let text: String = select_within(anchor, "button")
                .into_iter()
                .map(element_text)
                .collect();
            let label = collapse_whitespace(&text);
            let label = if label.is_empty() {
                DEFAULT_LINK_LABEL.to_string()
            } else {
                label
            };
            Some(DownloadLink::new(label, url))
        })
        .collect()
}

fn image_src(img: ElementRef<'_>) -> Option<&str> {
    img.value()
        .attr("src")
        .or_else(|| img.value().attr("data-src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
}

fn is_screenshot_url(src: &str) -> bool {
    let lower = src.to_lowercase();
    SCREENSHOT_URL_TOKENS.iter().any(|token| lower.contains(token))
}

/// Images following a screenshot heading plus screenshot-named images
fn extract_screenshots(document: &Html, base: &Url) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut screenshots = Vec::new();
    let mut add = |src: &str| {
        let absolute = absolutize(src, base);
        if seen.insert(absolute.clone()) {
            screenshots.push(absolute);
        }
    };

    for heading in select_all(document, "h2, h3, h4") {
        if !element_text(heading).to_lowercase().contains("screenshot") {
            continue;
        }
        for sibling in heading.next_siblings().filter_map(ElementRef::wrap) {
            if sibling.value().name() == "img" {
                if let Some(src) = image_src(sibling) {
                    add(src);
                }
            } else {
                for img in select_within(sibling, "img") {
                    if let Some(src) = image_src(img) {
                        add(src);
                    }
                }
            }
        }
    }

    for img in select_all(document, "img") {
        if let Some(src) = image_src(img) {
            if is_screenshot_url(src) {
                add(src);
            }
        }
    }

    screenshots
}
