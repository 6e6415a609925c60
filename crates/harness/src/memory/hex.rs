//! Text hex image format.
//!
//! One word per whitespace-separated token, stored at consecutive addresses from 0.
//! Tokens may carry a `0x` prefix and `_` digit separators. `//` and `#` start a comment
//! that runs to the end of the line. An `@<hex>` token moves the load cursor to that word
//! address, as with Verilog `$readmemh`.

use crate::common::HexError;

/// Parses `text` into `words`, returning how many words were stored.
pub(crate) fn parse_into(words: &mut [u32], text: &str) -> Result<usize, HexError> {
    let depth = words.len();
    let mut cursor = 0usize;
    let mut stored = 0usize;

    for (index, raw_line) in text.lines().enumerate() {
        let line = index + 1;
        for token in strip_comment(raw_line).split_whitespace() {
            if let Some(addr) = token.strip_prefix('@') {
                cursor = parse_hex_value(addr)
                    .and_then(|a| usize::try_from(a).ok())
                    .ok_or_else(|| HexError::InvalidAddress {
                        line,
                        token: token.to_string(),
                    })?;
                continue;
            }

            let value = parse_hex_value(token)
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| HexError::InvalidWord {
                    line,
                    token: token.to_string(),
                })?;
            if cursor >= depth {
                return Err(HexError::Overflow {
                    line,
                    address: cursor,
                    depth,
                });
            }
            words[cursor] = value;
            cursor += 1;
            stored += 1;
        }
    }
    Ok(stored)
}

fn strip_comment(line: &str) -> &str {
    let end = [line.find("//"), line.find('#')]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(line.len());
    &line[..end]
}

fn parse_hex_value(token: &str) -> Option<u64> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    let digits: String = digits.chars().filter(|&c| c != '_').collect();
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(&digits, 16).ok()
}
