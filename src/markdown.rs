use comrak::{markdown_to_html, Options};

pub const DEFAULT_TITLE: &str = "Markdown Server";

const ANCHOR_OPEN: &str = "<a href=\"";
const NEW_TAB: &str = "target=\"_blank\" rel=\"noopener noreferrer\" ";

/// Renders markdown to an HTML fragment.
///
/// Raw HTML in the source is left to comrak's default and omitted. Links that
/// leave the site open in a new tab.
pub fn render(markdown: &[u8]) -> String {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.description_lists = true;
    options.extension.footnotes = true;
    options.extension.header_ids = Some(String::new());
    options.parse.smart = true;

    let source = String::from_utf8_lossy(markdown);
    let html = markdown_to_html(&source, &options);
    open_external_links_in_new_tab(&html)
}

/// Same rule as the classic "href target blank" renderers: anything that is
/// not a fragment, a rooted path or an explicitly relative path is external.
fn is_relative(href: &str) -> bool {
    href.starts_with('#')
        || href == "/"
        || (href.starts_with('/') && !href.starts_with("//"))
        || href.starts_with("./")
        || href.starts_with("../")
}

// With raw HTML omitted, every `<a href="` in comrak's output is one it wrote
// itself, and the attribute value never contains a bare quote.
fn open_external_links_in_new_tab(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find(ANCHOR_OPEN) {
        let (before, anchor) = rest.split_at(start);
        out.push_str(before);

        let href = &anchor[ANCHOR_OPEN.len()..];
        let href = href.split('"').next().unwrap_or_default();
        if is_relative(href) || href.is_empty() {
            out.push_str(ANCHOR_OPEN);
        } else {
            out.push_str("<a ");
            out.push_str(NEW_TAB);
            out.push_str("href=\"");
        }
        rest = &anchor[ANCHOR_OPEN.len()..];
    }

    out.push_str(rest);
    out
}

/// Title of a page: the text after the first `# ` heading line, or
/// [`DEFAULT_TITLE`].
pub fn extract_title(markdown: &str) -> &str {
    markdown
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("# "))
        .unwrap_or(DEFAULT_TITLE)
}
