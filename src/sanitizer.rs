//! Whitelist HTML filter applied to article text before it leaves the service.
//!
//! Tags on the whitelist are rebuilt from their parsed parts with only the
//! permitted attributes, everything else that looks like markup has its
//! angle brackets escaped. The output of [`clean`] is a fixed point of
//! [`clean`], so running it on every read is safe.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref TAG: Regex = Regex::new(
        r#"(?x)
        <(/?)([A-Za-z][A-Za-z0-9]*)                           # opening bracket and name
        ((?:\s+[^\s"'<>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'<>=`]+))?)*)   # attributes
        \s*(/?)>"#
    )
    .unwrap();
    static ref ATTRIBUTE: Regex = Regex::new(
        r#"([^\s"'<>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'<>=`]+)))?"#
    )
    .unwrap();
    static ref CHAR_REF: Regex =
        Regex::new(r"&(?:#[xX]([0-9a-fA-F]+)|#([0-9]+)|([A-Za-z][A-Za-z0-9]*));?").unwrap();
}

/// Attributes that survive on each whitelisted tag.
fn allowed_attributes(tag: &str) -> Option<&'static [&'static str]> {
    let attrs: &'static [&'static str] = match tag {
        "a" => &["href", "title", "target"],
        "img" => &["src", "alt", "title", "width", "height"],
        "abbr" => &["title"],
        "b" | "blockquote" | "br" | "code" | "del" | "div" | "em" | "h1" | "h2" | "h3" | "h4"
        | "h5" | "h6" | "hr" | "i" | "li" | "ol" | "p" | "pre" | "s" | "small" | "span"
        | "strong" | "sub" | "sup" | "u" | "ul" => &[],
        _ => return None,
    };
    Some(attrs)
}

/// Neutralizes executable markup in `input`.
///
/// ```
/// use blogful_articles::sanitizer::clean;
///
/// assert_eq!(
///     clean(r#"<script>alert("xss")</script>"#),
///     r#"&lt;script&gt;alert("xss")&lt;/script&gt;"#
/// );
/// assert_eq!(clean(r#"<b onclick="x()">hi</b>"#), "<b>hi</b>");
/// ```
pub fn clean(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last = 0;

    for caps in TAG.captures_iter(input) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        escape_text(&input[last..whole.start], &mut out);
        match rebuild_tag(&caps) {
            Some(tag) => out.push_str(&tag),
            None => escape_text(&input[whole.clone()], &mut out),
        }
        last = whole.end;
    }
    escape_text(&input[last..], &mut out);
    out
}

/// Canonical form of a whitelisted tag, `None` when the tag must be escaped.
fn rebuild_tag(caps: &Captures<'_>) -> Option<String> {
    let name = caps[2].to_ascii_lowercase();
    let allowed = allowed_attributes(&name)?;

    if !caps[1].is_empty() {
        return Some(format!("</{name}>"));
    }

    let mut tag = format!("<{name}");
    for attr in ATTRIBUTE.captures_iter(&caps[3]) {
        let attr_name = attr[1].to_ascii_lowercase();
        if !allowed.contains(&attr_name.as_str()) {
            continue;
        }
        let value = attr.get(2).or(attr.get(3)).or(attr.get(4));
        match value {
            Some(value) => {
                let value = value.as_str().trim();
                if is_url_attribute(&attr_name) && !is_safe_url(value) {
                    continue;
                }
                tag.push_str(&format!(" {attr_name}=\""));
                escape_attribute(value, &mut tag);
                tag.push('"');
            }
            None => tag.push_str(&format!(" {attr_name}")),
        }
    }
    if !caps[4].is_empty() {
        tag.push_str(" /");
    }
    tag.push('>');
    Some(tag)
}

fn is_url_attribute(name: &str) -> bool {
    matches!(name, "href" | "src")
}

/// Web and mail schemes, fragments, absolute paths and scheme-less relative paths.
/// Judged on the value a browser would see: references decoded, whitespace
/// and control characters removed.
fn is_safe_url(url: &str) -> bool {
    let lower: String = decode_char_refs(url)
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .collect::<String>()
        .to_ascii_lowercase();
    if ["http://", "https://", "mailto:", "tel:", "#", "/"]
        .iter()
        .any(|prefix| lower.starts_with(prefix))
    {
        return true;
    }
    // A colon before any path separator means some other scheme.
    match lower.find(':') {
        None => true,
        Some(colon) => lower[..colon].contains(['/', '?', '#']),
    }
}

/// Decodes numeric references and the named ones that spell URL punctuation.
/// Unknown names are left as written.
fn decode_char_refs(value: &str) -> String {
    CHAR_REF
        .replace_all(value, |caps: &Captures<'_>| -> String {
            let code = match (caps.get(1), caps.get(2)) {
                (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
                (None, Some(dec)) => dec.as_str().parse().ok(),
                (None, None) => {
                    return match named_reference(&caps[3]) {
                        Some(decoded) => decoded.to_string(),
                        None => caps[0].to_string(),
                    };
                }
            };
            code.and_then(char::from_u32)
                .filter(|c| *c != '\0')
                .unwrap_or('\u{FFFD}')
                .to_string()
        })
        .into_owned()
}

fn named_reference(name: &str) -> Option<&'static str> {
    let decoded = match name {
        "colon" => ":",
        "Tab" => "\t",
        "NewLine" => "\n",
        "nbsp" => "\u{a0}",
        "sol" => "/",
        "quest" => "?",
        "num" => "#",
        "period" => ".",
        "lpar" => "(",
        "rpar" => ")",
        "amp" | "AMP" => "&",
        "lt" | "LT" => "<",
        "gt" | "GT" => ">",
        "quot" | "QUOT" => "\"",
        "apos" => "'",
        _ => return None,
    };
    Some(decoded)
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}
