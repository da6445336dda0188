use std::borrow::Cow;

/// Resolves the escapes of a string token's contents.
///
/// `\t`, `\n`, `\0` and `\\` map to their characters. Any other escaped
/// character is dropped along with its backslash, as is a trailing backslash.
pub fn unescape(raw: &str) -> Cow<'_, str> {
    if !raw.contains('\\') {
        return Cow::Borrowed(raw);
    }

    let mut resolved = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            resolved.push(c);
            continue;
        }

        match chars.next() {
            Some('t') => resolved.push('\t'),
            Some('n') => resolved.push('\n'),
            Some('0') => resolved.push('\0'),
            Some('\\') => resolved.push('\\'),
            Some(_) | None => {}
        }
    }

    Cow::Owned(resolved)
}
