//! Body-text line encoding for contenteditable regions.
//!
//! A contenteditable body represents each visual line as one `<div>`
//! block, with `<div><br></div>` as the sentinel for an empty line.
//! [`encode_lines`] renders canonical `\n`-separated plain text into
//! that markup; [`decode_lines`] extracts plain text back out of
//! whatever markup the browser left behind after editing.
//!
//! Round-trip invariant: `decode_lines(&encode_lines(t)) == t` for any
//! `t` made of printable characters and `\n`.  The decoder additionally
//! tolerates browser-produced variants the encoder never emits: bare
//! text before the first block, attributes on tags, `<br/>`, inline
//! wrappers such as `<span>`, and `&nbsp;`.

/// Render plain text as contenteditable line markup.
///
/// Each `\n`-delimited line becomes `<div>line</div>`; an empty line
/// becomes `<div><br></div>` so it stays visible and editable.  `&`,
/// `<`, and `>` are entity-escaped so text content cannot be confused
/// with markup.
#[must_use]
pub fn encode_lines(text: &str) -> String {
    let mut html = String::with_capacity(text.len() + 16);
    for line in text.split('\n') {
        if line.is_empty() {
            html.push_str("<div><br></div>");
        } else {
            html.push_str("<div>");
            push_escaped(&mut html, line);
            html.push_str("</div>");
        }
    }
    html
}

/// Extract plain text from contenteditable line markup.
///
/// Inverse of [`encode_lines`].  Rules, matching how browsers lay out
/// edited content:
///
/// - each top-level `<div>` block is one line (or several, if the block
///   contains interior `<br>` breaks);
/// - `<div><br></div>` (or `<div></div>`) is an empty line; a block of
///   `n` bare `<br>` is `n` empty lines;
/// - bare text before the first block belongs to the first line;
/// - unknown tags are stripped, their text kept;
/// - a trailing run of bare `<br>` outside any block is a placeholder
///   and is dropped;
/// - entities are unescaped (`&nbsp;` becomes a plain space).
///
/// Tag matching is lowercase-only: `innerHTML` serialization always
/// lowercases HTML tag names.
#[must_use]
pub fn decode_lines(html: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_block = false;
    // Bare <br> at the start of a block: sentinel candidates until text
    // proves them to be real breaks.
    let mut sentinel_brs = 0usize;

    let mut rest = html;
    while !rest.is_empty() {
        let Some(open) = rest.find('<') else {
            flush_text(rest, &mut current, &mut sentinel_brs);
            break;
        };
        if open > 0 {
            flush_text(&rest[..open], &mut current, &mut sentinel_brs);
        }
        rest = &rest[open..];
        let Some(end) = rest.find('>') else {
            // Unterminated tag: keep it as literal text.
            flush_text(rest, &mut current, &mut sentinel_brs);
            break;
        };
        let tag = &rest[1..end];
        rest = &rest[end + 1..];

        match tag_name(tag) {
            ("div", false) => {
                // A new block starts; finish any pending bare-text line.
                if in_block {
                    close_block(&mut lines, &mut current, &mut sentinel_brs);
                } else if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                in_block = true;
            }
            ("div", true) => {
                if in_block {
                    close_block(&mut lines, &mut current, &mut sentinel_brs);
                    in_block = false;
                }
                // Stray close tag outside a block: ignore.
            }
            ("br", _) => {
                if in_block && current.is_empty() {
                    sentinel_brs += 1;
                } else {
                    current.push('\n');
                }
            }
            // Inline wrappers (<span>, <b>, ...) are stripped.
            _ => {}
        }
    }

    if in_block {
        close_block(&mut lines, &mut current, &mut sentinel_brs);
    } else if !current.is_empty() && current.chars().any(|c| c != '\n') {
        lines.push(std::mem::take(&mut current));
    }
    // A trailing run of newlines from bare <br> placeholders is dropped
    // by the branch above.

    lines.join("\n")
}

/// Append decoded text, converting leading sentinel `<br>` into real
/// breaks now that the block is known to contain content.
fn flush_text(raw: &str, current: &mut String, sentinel_brs: &mut usize) {
    for _ in 0..*sentinel_brs {
        current.push('\n');
    }
    *sentinel_brs = 0;
    push_unescaped(current, raw);
}

/// Finish one `<div>` block, emitting its line(s).
fn close_block(lines: &mut Vec<String>, current: &mut String, sentinel_brs: &mut usize) {
    if current.is_empty() {
        // <div><br></div> is one empty line; n bare <br> are n empty
        // lines; <div></div> also counts as one empty line.
        let empties = (*sentinel_brs).max(1);
        for _ in 0..empties {
            lines.push(String::new());
        }
    } else {
        lines.push(std::mem::take(current));
    }
    *sentinel_brs = 0;
}

/// Split a raw tag body into (name, is_closing), lowercase tag names
/// assumed.  `<br/>` parses as a non-closing `br`.
fn tag_name(tag: &str) -> (&str, bool) {
    let (body, closing) = tag
        .strip_prefix('/')
        .map_or((tag, false), |stripped| (stripped, true));
    let name_end = body
        .find(|c: char| c.is_ascii_whitespace() || c == '/')
        .unwrap_or(body.len());
    (&body[..name_end], closing)
}

/// Escape `&`, `<`, `>` for embedding text in markup.
fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

/// Unescape the entities browsers produce in `innerHTML` text runs.
fn push_unescaped(out: &mut String, raw: &str) {
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        // Entity names are short ASCII; look for the terminator within
        // the first few characters only.
        let semi = rest
            .char_indices()
            .take(8)
            .find(|&(_, c)| c == ';')
            .map(|(i, _)| i);
        let Some(semi) = semi else {
            out.push('&');
            rest = &rest[1..];
            continue;
        };
        let entity = &rest[1..semi];
        match entity {
            "amp" => out.push('&'),
            "lt" => out.push('<'),
            "gt" => out.push('>'),
            "quot" => out.push('"'),
            "#39" | "apos" => out.push('\''),
            "nbsp" => out.push(' '),
            _ => {
                // Unknown entity: keep it verbatim.
                out.push_str(&rest[..=semi]);
            }
        }
        rest = &rest[semi + 1..];
    }
    out.push_str(rest);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// The round-trip must reproduce the input exactly.
    fn assert_round_trip(text: &str) {
        let encoded = encode_lines(text);
        let decoded = decode_lines(&encoded);
        assert_eq!(decoded, text, "round trip failed via {encoded:?}");
    }

    #[test]
    fn round_trip_is_exact() {
        assert_round_trip("");
        assert_round_trip("single line");
        assert_round_trip("a\nb");
        assert_round_trip("a\n\nb");
        assert_round_trip("a\n\n\n\nb");
        assert_round_trip("\nleading blank");
        assert_round_trip("trailing blank\n");
        assert_round_trip("\n");
        assert_round_trip("only\n\n");
    }

    #[test]
    fn round_trip_preserves_markup_characters() {
        assert_round_trip("a & b");
        assert_round_trip("1 < 2 > 0");
        assert_round_trip("<div>not markup</div>");
        assert_round_trip("&amp; already escaped");
    }

    #[test]
    fn round_trip_of_default_body() {
        let body = crate::config::EmailConfig::default().email_content;
        assert_round_trip(&body);
    }

    #[test]
    fn encode_wraps_each_line_in_a_block() {
        assert_eq!(
            encode_lines("a\n\nb"),
            "<div>a</div><div><br></div><div>b</div>"
        );
        assert_eq!(encode_lines(""), "<div><br></div>");
    }

    #[test]
    fn decode_handles_bare_leading_text() {
        // Browsers leave the first line unwrapped once the user starts
        // typing from scratch.
        assert_eq!(decode_lines("first<div>second</div>"), "first\nsecond");
    }

    #[test]
    fn decode_handles_interior_breaks() {
        assert_eq!(decode_lines("<div>a<br>b</div>"), "a\nb");
        assert_eq!(decode_lines("a<br>b"), "a\nb");
    }

    #[test]
    fn decode_handles_sentinel_variants() {
        assert_eq!(decode_lines("<div><br></div>"), "");
        assert_eq!(decode_lines("<div><br/></div>"), "");
        assert_eq!(decode_lines("<div></div>"), "");
        assert_eq!(decode_lines("<div>a</div><div><br></div><div>b</div>"), "a\n\nb");
    }

    #[test]
    fn decode_counts_stacked_breaks_as_blank_lines() {
        assert_eq!(decode_lines("<div><br><br></div>"), "\n");
    }

    #[test]
    fn decode_strips_attributes_and_inline_wrappers() {
        assert_eq!(decode_lines(r#"<div style="color: red">a</div>"#), "a");
        assert_eq!(decode_lines("<div><span>a</span> b</div>"), "a b");
    }

    #[test]
    fn decode_unescapes_entities() {
        assert_eq!(decode_lines("<div>a&nbsp;&amp;&nbsp;b</div>"), "a & b");
        assert_eq!(decode_lines("<div>&lt;tag&gt;</div>"), "<tag>");
        assert_eq!(decode_lines("<div>&unknown;</div>"), "&unknown;");
    }

    #[test]
    fn decode_handles_multibyte_text_around_ampersands() {
        assert_eq!(decode_lines("<div>R&D — 仕様 &まだまだ</div>"), "R&D — 仕様 &まだまだ");
        assert_round_trip("R&D — 仕様 &まだまだ");
    }

    #[test]
    fn decode_drops_trailing_placeholder_break() {
        assert_eq!(decode_lines("<div>a</div><br>"), "a");
    }

    #[test]
    fn decode_keeps_unterminated_tag_as_text() {
        assert_eq!(decode_lines("<div>a</div><oops"), "a\n<oops");
    }
}
