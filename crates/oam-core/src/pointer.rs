//! JSON Pointer helpers (RFC 6901) for `$ref` addresses.

/// Escape one pointer segment: `~` becomes `~0`, `/` becomes `~1`.
pub fn escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Reverse of [`escape`]. `~1` is decoded before `~0` so that `~01` stays `~1`.
pub fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Split a pointer (`#/a/b`, `/a/b` or `a/b`) into unescaped segments.
pub fn segments(pointer: &str) -> Vec<String> {
    let trimmed = pointer.strip_prefix('#').unwrap_or(pointer);
    let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('/').map(unescape).collect()
}

/// Build a document-anchored pointer (`#/a/b`) from raw segments.
pub fn join<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::from("#");
    for segment in segments {
        out.push('/');
        out.push_str(&escape(segment.as_ref()));
    }
    out
}

/// Parse the dotted path notation used by JSON-path assertions, e.g.
/// `paths.'/bookings/{id}'.get.responses.'200'`. Quoted segments may contain
/// dots and slashes.
pub fn dotted_segments(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut had_quote = false;

    for ch in path.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    had_quote = true;
                }
                '.' => {
                    if !current.is_empty() || had_quote {
                        segments.push(std::mem::take(&mut current));
                    }
                    had_quote = false;
                }
                _ => current.push(ch),
            },
        }
    }
    if !current.is_empty() || had_quote {
        segments.push(current);
    }
    segments
}
