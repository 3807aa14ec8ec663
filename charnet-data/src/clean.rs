//! Line-level text normalisation for the tab-separated dataset files.

/// Decodes `%XX` escapes into raw bytes, then reads the bytes as UTF-8
/// (invalid sequences become U+FFFD). A `%` not followed by two hex digits is
/// kept literally.
pub fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Percent-decodes then trims surrounding whitespace.
pub fn clean(s: &str) -> String {
    percent_decode(s).trim().to_string()
}

/// Splits one dataset line into its cleaned `(entity, labels)` fields.
///
/// Fields past the second are ignored. A line without a label field yields an
/// empty label string.
pub fn split_line(line: &str) -> (String, String) {
    let mut fields = line.trim_end().split('\t');
    let entity = fields.next().map(clean).unwrap_or_default();
    let labels = fields.next().map(clean).unwrap_or_default();
    (entity, labels)
}

/// Label tokens of a cleaned label field, split on commas.
pub fn label_tokens(labels: &str) -> impl Iterator<Item = &str> {
    labels.split(',')
}
