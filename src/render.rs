//! Transcript rendering
//!
//! Converts display turns into the HTML fragments shown in the chat view.
//! Reply text is treated as markdown (the completion model emits it freely)
//! and converted to a small, safe HTML subset with `<`, `>` and `&` escaped
//! in all content. Audio renders as an inline playback control embedding the
//! WAV payload as a base64 `data:` URI, so no separate asset storage exists;
//! only the freshly produced assistant reply carries `autoplay`.

use base64::Engine;

use crate::session::{DisplayTurn, Role};

/// Render an inline audio playback control for a WAV payload
#[must_use]
pub fn audio_element(wav: &[u8], autoplay: bool) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(wav);
    let autoplay_attr = if autoplay { " autoplay" } else { "" };
    format!(
        "<audio controls{autoplay_attr} class=\"turn-audio\">\
         <source src=\"data:audio/wav;base64,{payload}\"></audio>"
    )
}

/// Render one display turn as a chat bubble
#[must_use]
pub fn render_turn(turn: &DisplayTurn) -> String {
    render_turn_with_audio(turn, turn.audio.as_deref())
}

/// Render one display turn with an explicit audio fragment.
///
/// The turn endpoint uses this to swap in the autoplay variant for the
/// fresh assistant reply while the stored copy stays passive.
#[must_use]
pub fn render_turn_with_audio(turn: &DisplayTurn, audio: Option<&str>) -> String {
    let class = match turn.role {
        Role::User => "user",
        Role::Assistant | Role::System => "assistant",
    };
    let body = markdown_to_html(&turn.content);
    let audio = audio.unwrap_or_default();
    format!("<div class=\"turn {class}\"><div class=\"bubble\">{body}{audio}</div></div>")
}

/// Render the full display history, oldest first, all controls passive
#[must_use]
pub fn render_transcript(turns: &[DisplayTurn]) -> String {
    turns.iter().map(render_turn).collect()
}

/// Convert markdown text to the HTML subset used in chat bubbles.
///
/// Supported conversions:
/// - `**bold**` → `<b>bold</b>`
/// - `*italic*` → `<i>italic</i>`
/// - `` `code` `` → `<code>code</code>`
/// - ` ```\nblock\n``` ` → `<pre><code>block</code></pre>`
/// - `[text](url)` → `<a href="url">text</a>`
///
/// HTML special characters (`<`, `>`, `&`) are escaped in non-tag content,
/// and line breaks become `<br>` so bubbles keep the author's layout.
#[must_use]
pub fn markdown_to_html(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let lines: Vec<&str> = input.lines().collect();
    let mut i = 0;
    let mut first = true;

    while i < lines.len() {
        let line = lines[i];

        // Fenced code block: escaped verbatim, no inline conversion inside
        if line.starts_with("```") {
            let mut code_lines = Vec::new();
            i += 1;
            while i < lines.len() && !lines[i].starts_with("```") {
                code_lines.push(lines[i]);
                i += 1;
            }
            if i < lines.len() {
                i += 1;
            }

            if !first {
                output.push_str("<br>");
            }
            let code = escape_html(&code_lines.join("\n"));
            output.push_str(&format!("<pre><code>{code}</code></pre>"));
            first = false;
            continue;
        }

        if !first {
            output.push_str("<br>");
        }
        let escaped = escape_html(line);
        output.push_str(&convert_inline(&escaped));
        first = false;
        i += 1;
    }

    output
}

/// Escape HTML special characters
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Convert inline markdown formatting to HTML tags.
///
/// Inline code runs first, and the remaining conversions only apply outside
/// the produced code spans so formatting markers inside them survive.
fn convert_inline(text: &str) -> String {
    let text = convert_inline_code(text);

    let mut result = String::with_capacity(text.len());
    let mut remaining = text.as_str();
    while let Some(start) = remaining.find("<code>") {
        result.push_str(&convert_formatting(&remaining[..start]));
        if let Some(end) = remaining[start..].find("</code>") {
            let end = start + end + "</code>".len();
            result.push_str(&remaining[start..end]);
            remaining = &remaining[end..];
        } else {
            result.push_str(&remaining[start..]);
            remaining = "";
        }
    }
    result.push_str(&convert_formatting(remaining));
    result
}

/// Bold, italic and link conversion for a segment outside code spans
fn convert_formatting(text: &str) -> String {
    let text = convert_bold(text);
    let text = convert_italic(&text);
    convert_links(&text)
}

/// Convert `` `code` `` to `<code>code</code>`
fn convert_inline_code(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '`' {
            let mut code = String::new();
            let mut found_close = false;
            for next in chars.by_ref() {
                if next == '`' {
                    found_close = true;
                    break;
                }
                code.push(next);
            }
            if found_close {
                result.push_str(&format!("<code>{code}</code>"));
            } else {
                // Unmatched backtick, output as-is
                result.push('`');
                result.push_str(&code);
            }
        } else {
            result.push(ch);
        }
    }

    result
}

/// Convert `**bold**` to `<b>bold</b>`
fn convert_bold(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut remaining = text;
    let mut open = false;

    while let Some(pos) = remaining.find("**") {
        result.push_str(&remaining[..pos]);
        result.push_str(if open { "</b>" } else { "<b>" });
        open = !open;
        remaining = &remaining[pos + 2..];
    }
    result.push_str(remaining);

    // Unmatched opener: put the marker back
    if open && let Some(last_open) = result.rfind("<b>") {
        result.replace_range(last_open..last_open + 3, "**");
    }

    result
}

/// Convert `*italic*` to `<i>italic</i>`, skipping text inside HTML tags
fn convert_italic(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut remaining = text;

    while !remaining.is_empty() {
        if let Some(tag_start) = remaining.find('<') {
            result.push_str(&convert_star_italic(&remaining[..tag_start]));
            if let Some(tag_end) = remaining[tag_start..].find('>') {
                let end = tag_start + tag_end + 1;
                result.push_str(&remaining[tag_start..end]);
                remaining = &remaining[end..];
            } else {
                result.push_str(&remaining[tag_start..]);
                break;
            }
        } else {
            result.push_str(&convert_star_italic(remaining));
            break;
        }
    }

    result
}

/// Star-delimited italic conversion for a tag-free segment
fn convert_star_italic(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut open = false;

    while let Some(ch) = chars.next() {
        if ch == '*' {
            // Bold ran first, so a surviving ** pair is a restored literal
            // marker, not emphasis
            if chars.peek() == Some(&'*') {
                chars.next();
                result.push_str("**");
            } else if open {
                result.push_str("</i>");
                open = false;
            } else if chars.peek().is_some_and(|c| !c.is_whitespace()) {
                // A star before whitespace is a list marker, not emphasis
                result.push_str("<i>");
                open = true;
            } else {
                result.push(ch);
            }
        } else {
            result.push(ch);
        }
    }

    if open && let Some(last_open) = result.rfind("<i>") {
        result.replace_range(last_open..last_open + 3, "*");
    }

    result
}

/// Convert `[text](url)` to `<a href="url">text</a>`.
///
/// The fragment is injected into the page DOM, so only http(s) targets
/// convert and quotes in the URL are escaped for the attribute; anything
/// else stays literal text.
fn convert_links(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut remaining = text;

    while let Some(bracket_start) = remaining.find('[') {
        result.push_str(&remaining[..bracket_start]);

        let after_bracket = &remaining[bracket_start + 1..];
        if let Some(bracket_end) = after_bracket.find("](") {
            let link_text = &after_bracket[..bracket_end];
            let after_paren = &after_bracket[bracket_end + 2..];

            if let Some(paren_end) = after_paren.find(')') {
                let url = &after_paren[..paren_end];
                if url.starts_with("http://") || url.starts_with("https://") {
                    let url = url.replace('"', "&quot;");
                    result.push_str(&format!("<a href=\"{url}\">{link_text}</a>"));
                    remaining = &after_paren[paren_end + 1..];
                    continue;
                }
            }
        }

        // Not a valid link, output the bracket
        result.push('[');
        remaining = after_bracket;
    }

    result.push_str(remaining);
    result
}
