use askama::Template;

/// The HTML shell every markdown page is served in.
///
/// `title` is HTML-escaped on interpolation. `content` is the renderer's
/// output and goes in as-is.
#[derive(Template)]
#[template(path = "page.html")]
pub struct Page<'a> {
    pub title: &'a str,
    pub content: &'a str,
}

impl<'a> Page<'a> {
    pub fn new(title: &'a str, content: &'a str) -> Self {
        Self { title, content }
    }
}
