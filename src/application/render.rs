//! Markdown rendering: cover-image elision, comrak conversion, ammonia
//! sanitisation.

use std::borrow::Cow;
use std::collections::HashSet;

use comrak::Options;
use regex::Regex;

/// Sanitised HTML produced from a post body.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedContent {
    pub html: String,
}

pub struct RenderService {
    options: Options<'static>,
    sanitizer: ammonia::Builder<'static>,
}

impl RenderService {
    pub fn new() -> Self {
        Self {
            options: default_options(),
            sanitizer: build_sanitizer(),
        }
    }

    /// Render a post body. When a cover image is set, the first inline embed
    /// of exactly that URL is removed before parsing so the hero image is not
    /// shown twice.
    pub fn render(&self, markdown: &str, cover_image: Option<&str>) -> RenderedContent {
        let source = match cover_image {
            Some(url) => elide_cover_embed(markdown, url),
            None => Cow::Borrowed(markdown),
        };

        let html = comrak::markdown_to_html(&source, &self.options);
        RenderedContent {
            html: self.sanitizer.clean(&html).to_string(),
        }
    }
}

impl Default for RenderService {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove the first markdown image embed whose URL equals `cover_image`
/// exactly, plus any newlines that trailed it. The URL is escaped so
/// metacharacters in query strings match literally.
fn elide_cover_embed<'a>(markdown: &'a str, cover_image: &str) -> Cow<'a, str> {
    let pattern = format!(r"!\[[^\]]*\]\({}\)\n*", regex::escape(cover_image));
    match Regex::new(&pattern) {
        Ok(re) => re.replace(markdown, ""),
        Err(_) => Cow::Borrowed(markdown),
    }
}

fn default_options() -> Options<'static> {
    let mut options = Options::default();

    let ext = &mut options.extension;
    ext.strikethrough = true;
    ext.table = true;
    ext.autolink = true;
    ext.tasklist = true;

    let render = &mut options.render;
    render.github_pre_lang = true;
    render.r#unsafe = true;

    options
}

fn build_sanitizer() -> ammonia::Builder<'static> {
    let mut builder = ammonia::Builder::default();

    let tags: HashSet<&'static str> = HashSet::from([
        "a", "blockquote", "br", "code", "del", "em", "h1", "h2", "h3", "h4", "h5", "h6", "hr",
        "img", "input", "li", "ol", "p", "pre", "s", "span", "strong", "table", "tbody", "td",
        "th", "thead", "tr", "ul",
    ]);
    builder.tags(tags);

    builder.add_tag_attributes("a", &["href", "title", "target"]);
    builder.add_tag_attributes("img", &["src", "alt", "title", "width", "height"]);
    builder.add_tag_attributes("code", &["class"]);
    builder.add_tag_attributes("pre", &["class", "lang"]);
    builder.add_tag_attributes("th", &["align", "colspan", "rowspan", "scope"]);
    builder.add_tag_attributes("td", &["align", "colspan", "rowspan"]);
    builder.add_tag_attributes("input", &["type", "checked", "disabled"]);

    builder.add_url_schemes(["http", "https", "mailto"].iter().copied());

    builder
}
