//! Markdown to HTML for backend-generated setup notes.
//!
//! This is a fixed sequence of line-oriented substitutions, not a parser.
//! Rule order is significant: headings, bold, fenced code, inline code,
//! lists, links, rules, blockquotes, then line breaks. Input is trusted
//! backend output and is not escaped.

use std::sync::LazyLock;
use regex::{Captures, Regex};

static H3: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^### (.*)$").unwrap());
static H2: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^## (.*)$").unwrap());
static H1: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^# (.*)$").unwrap());
static H4: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#### (.*)$").unwrap());
static H5: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^##### (.*)$").unwrap());
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```(.*?)```").unwrap());
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`(.*?)`").unwrap());
static DASH_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]*-[ \t]+(.*)$").unwrap());
static STAR_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\*[ \t]+(.*)$").unwrap());
static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\d+\.[ \t]+(.*)$").unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());
static RULE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]*---[ \t]*$").unwrap());
static QUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^>[ \t]*(.*)$").unwrap());
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x00CODE(\d+)\x00").unwrap());

/// Render markdown to an HTML fragment. Deterministic and total: text no
/// rule recognises passes through unchanged.
pub fn render(markdown: &str) -> String {
    if markdown.is_empty() {
        return String::new();
    }

    let text = H3.replace_all(markdown, "<h3>${1}</h3>");
    let text = H2.replace_all(&text, "<h2>${1}</h2>");
    let text = H1.replace_all(&text, "<h1>${1}</h1>");
    let text = H4.replace_all(&text, "<h4>${1}</h4>");
    let text = H5.replace_all(&text, "<h5>${1}</h5>");

    let text = BOLD.replace_all(&text, "<strong>${1}</strong>");

    // Fenced blocks are pulled out so no later rule touches their contents.
    let mut blocks = Vec::new();
    let text = CODE_BLOCK.replace_all(&text, |caps: &Captures| {
        blocks.push(format!("<pre><code>{}</code></pre>", &caps[1]));
        format!("\u{0}CODE{}\u{0}", blocks.len() - 1)
    });

    let text = INLINE_CODE.replace_all(&text, "<code>${1}</code>");

    let text = DASH_ITEM.replace_all(&text, "<li>${1}</li>");
    let text = STAR_ITEM.replace_all(&text, "<li>${1}</li>");
    let text = NUMBERED_ITEM.replace_all(&text, "<li class=\"ordered\">${1}</li>");
    let text = wrap_list_items(&text);

    let text = LINK.replace_all(
        &text,
        "<a href=\"${2}\" target=\"_blank\" rel=\"noopener noreferrer\">${1}</a>",
    );

    let text = RULE.replace_all(&text, "<hr>");
    let text = QUOTE.replace_all(&text, "<blockquote>${1}</blockquote>");

    let text = text.replace("\n\n", "<br><br>").replace('\n', "<br>");

    PLACEHOLDER
        .replace_all(&text, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| blocks.get(i).cloned())
                .unwrap_or_default()
        })
        .into_owned()
}

/// Wrap a standalone page around a rendered fragment.
pub fn render_document(title: &str, markdown: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"en\">\n",
            "<head>\n",
            "<meta charset=\"utf-8\">\n",
            "<title>{title}</title>\n",
            "<style>\n",
            "body {{ font-family: system-ui, sans-serif; line-height: 1.6; max-width: 56rem; margin: 2rem auto; padding: 0 1rem; }}\n",
            "pre {{ background: #0f0f0f; color: #4ade80; padding: 1rem; border-radius: 8px; overflow-x: auto; }}\n",
            "code {{ font-family: Monaco, Consolas, 'Liberation Mono', 'Courier New', monospace; }}\n",
            "blockquote {{ border-left: 4px solid #00bcf2; padding-left: 1rem; font-style: italic; }}\n",
            "li.ordered {{ list-style-type: decimal; }}\n",
            "</style>\n",
            "</head>\n",
            "<body>\n",
            "<h1>{title}</h1>\n",
            "{body}\n",
            "</body>\n",
            "</html>\n",
        ),
        title = escape_text(title),
        body = render(markdown),
    )
}

/// Join each run of consecutive `<li>` lines into a single `<ul>`. Blank
/// lines between two items do not break the run.
fn wrap_list_items(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        if !is_list_item(lines[i]) {
            out.push(lines[i].to_string());
            i += 1;
            continue;
        }

        let mut group = String::from("<ul>");
        loop {
            group.push_str(lines[i].trim());
            let mut next = i + 1;
            while next < lines.len() && lines[next].trim().is_empty() {
                next += 1;
            }
            if next < lines.len() && is_list_item(lines[next]) {
                i = next;
            } else {
                i += 1;
                break;
            }
        }
        group.push_str("</ul>");
        out.push(group);
    }

    out.join("\n")
}

fn is_list_item(line: &str) -> bool {
    let line = line.trim();
    line.starts_with("<li") && line.ends_with("</li>")
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
