//! Anchor href extraction
//!
//! A forward, single-pass scanner over raw HTML. No DOM is built: markup the
//! scanner does not understand is stepped over instead of producing an error.
//!
//! # Matching Rules
//!
//! - An anchor starts with `<a` (any case) followed by whitespace
//! - Inside the tag, the first `href` attribute with a quoted value is taken;
//!   the closing quote must be the same character as the opening one
//! - `<!-- ... -->` comments are skipped entirely
//! - Values are trimmed

/// Returns a lazy iterator over the hrefs of every anchor in `html`,
/// in document order
///
/// # Example
///
/// ```
/// use sumi_linkcheck::crawler::extract_hrefs;
///
/// let html = r#"<p><a class="x" href=" /one ">1</a><!-- <a href="/no"> --><A HREF='/two'>2</A></p>"#;
/// let hrefs: Vec<&str> = extract_hrefs(html).collect();
/// assert_eq!(hrefs, vec!["/one", "/two"]);
/// ```
pub fn extract_hrefs(html: &str) -> HrefIter<'_> {
    HrefIter { html, pos: 0 }
}

/// Iterator returned by [`extract_hrefs`]
///
/// Once exhausted it stays exhausted; scanning cannot be restarted.
#[derive(Debug)]
pub struct HrefIter<'a> {
    html: &'a str,
    pos: usize,
}

impl<'a> Iterator for HrefIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let bytes = self.html.as_bytes();

        while self.pos < bytes.len() {
            let lt = match find_byte(bytes, b'<', self.pos) {
                Some(i) => i,
                None => break,
            };

            let rest = &bytes[lt..];
            if rest.starts_with(b"<!--") {
                // `<!-->` and `<!--->` close immediately
                self.pos = match find_seq(bytes, b"-->", lt + 2) {
                    Some(end) => end + 3,
                    // Unterminated comment swallows the rest of the document
                    None => bytes.len(),
                };
                continue;
            }

            if is_anchor_open(rest) {
                let (href, tag_end) = scan_anchor(bytes, lt + 2);
                self.pos = tag_end;
                if let Some((start, end)) = href {
                    return Some(self.html[start..end].trim());
                }
                continue;
            }

            self.pos = lt + 1;
        }

        self.pos = bytes.len();
        None
    }
}

impl std::iter::FusedIterator for HrefIter<'_> {}

fn is_anchor_open(rest: &[u8]) -> bool {
    rest.len() >= 3 && (rest[1] == b'a' || rest[1] == b'A') && rest[2].is_ascii_whitespace()
}

/// Scans the attributes of an anchor tag starting at `pos`
///
/// Returns the byte range of the first quoted href value (if any) and the
/// position just after the tag.
fn scan_anchor(bytes: &[u8], mut pos: usize) -> (Option<(usize, usize)>, usize) {
    let mut href = None;

    loop {
        pos = skip_whitespace(bytes, pos);
        if pos >= bytes.len() {
            return (href, bytes.len());
        }

        match bytes[pos] {
            b'>' => return (href, pos + 1),
            b'/' => {
                pos += 1;
                continue;
            }
            _ => {}
        }

        let name_start = pos;
        while pos < bytes.len()
            && !bytes[pos].is_ascii_whitespace()
            && !matches!(bytes[pos], b'=' | b'>' | b'/')
        {
            pos += 1;
        }
        let name = &bytes[name_start..pos];

        pos = skip_whitespace(bytes, pos);
        if pos >= bytes.len() || bytes[pos] != b'=' {
            // Attribute without a value
            continue;
        }
        pos = skip_whitespace(bytes, pos + 1);
        if pos >= bytes.len() {
            return (href, bytes.len());
        }

        let quote = bytes[pos];
        if quote == b'"' || quote == b'\'' {
            let value_start = pos + 1;
            match find_byte(bytes, quote, value_start) {
                Some(value_end) => {
                    if href.is_none() && name.eq_ignore_ascii_case(b"href") {
                        href = Some((value_start, value_end));
                    }
                    pos = value_end + 1;
                }
                None => {
                    // No matching quote: nothing after this point can be a value
                    return (href, bytes.len());
                }
            }
        } else {
            // Unquoted values never count as an href
            while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() && bytes[pos] != b'>' {
                pos += 1;
            }
        }
    }
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

fn find_byte(bytes: &[u8], needle: u8, from: usize) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|i| from + i)
}

fn find_seq(bytes: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| from + i)
}
