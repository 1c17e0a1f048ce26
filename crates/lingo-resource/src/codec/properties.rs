//! Properties resource codec
//!
//! Reads the `key=value` line format: `#`/`!` comments, `=`, `:` or
//! whitespace separators, trailing-backslash continuations and `\uXXXX`
//! escapes. Files are read and written as UTF-8.

use std::path::Path;

use super::{ResourceCodec, Translations, WriteOptions};
use crate::error::StoreError;

/// Properties codec
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertiesCodec;

impl ResourceCodec for PropertiesCodec {
    fn decode(&self, content: &str, _path: &Path) -> Result<Translations, StoreError> {
        let mut out = Translations::new();
        let mut lines = content.lines();

        while let Some(line) = lines.next() {
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }

            let mut logical = trimmed.to_string();
            while ends_with_continuation(&logical) {
                logical.pop();
                match lines.next() {
                    Some(next) => logical.push_str(next.trim_start()),
                    None => break,
                }
            }

            let (key, value) = split_entry(&logical);
            out.insert(unescape(key), unescape(value));
        }
        Ok(out)
    }

    fn encode(&self, translations: &Translations, options: WriteOptions, _path: &Path) -> Result<String, StoreError> {
        let separator = if options.pretty { " = " } else { "=" };
        let mut out = String::new();
        for (key, value) in translations {
            out.push_str(&escape(key, true));
            out.push_str(separator);
            out.push_str(&escape(value, false));
            out.push('\n');
        }
        Ok(out)
    }

    fn extensions(&self) -> &[&str] {
        &["properties"]
    }
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                break;
            }
            c if c.is_whitespace() => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let rest = line[key_end..].trim_start();
    let value = rest.strip_prefix(['=', ':']).map_or(rest, str::trim_start);
    (key, value)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000C}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16) {
                    Ok(high @ 0xD800..=0xDBFF) => {
                        // surrogate pair written as two escapes
                        let mut look = chars.clone();
                        let low = (look.next() == Some('\\') && look.next() == Some('u'))
                            .then(|| look.by_ref().take(4).collect::<String>())
                            .and_then(|h| u32::from_str_radix(&h, 16).ok())
                            .filter(|low| (0xDC00..=0xDFFF).contains(low));
                        match low.and_then(|low| char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))) {
                            Some(ch) => {
                                out.push(ch);
                                chars = look;
                            }
                            None => out.push(char::REPLACEMENT_CHARACTER),
                        }
                    }
                    Ok(code) => out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)),
                    Err(_) => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn escape(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{000C}' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' if is_key => {
                out.push('\\');
                out.push(c);
            }
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            _ => out.push(c),
        }
    }
    out
}
