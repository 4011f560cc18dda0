//! Byte-level transforms applied to template file contents.
//!
//! Templates carry removable regions delimited by marker comments:
//!
//! ```text
//! /* @section composer */
//! use Composer\Autoload;
//! /* @endsection composer */
//! ```
//!
//! The name after `@endsection` is informational; a region ends at the
//! first `@endsection` following its `@section`. Whitespace before a marker,
//! including the newline that ends the previous line, belongs to the marker.
//! Contents need not be UTF-8: region bodies may hold any bytes.

use crate::exclusion::LineRange;
use log::trace;
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use std::ops::Range;

static SECTION_REGION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<open>\s*/\*\s*@section\s*(?P<name>[\w-]*)\s*\*/)(?s-u:.)*?(?P<close>/\*\s*@endsection\s*[\w-]*\s*\*/)",
    )
    .expect("section region pattern is valid")
});

static TEMPLATE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*/\*\s*@(?:end)?section\s*[\w-]*\s*\*/").expect("template tag pattern is valid")
});

/// Byte spans of the regions whose opening tag is in `sections`.
///
/// The content is scanned once; spans refer to the content as given.
pub fn section_spans(content: &[u8], sections: &[&str]) -> Vec<Range<usize>> {
    if sections.is_empty() {
        return Vec::new();
    }
    SECTION_REGION
        .captures_iter(content)
        .filter(|caps| {
            caps.name("name")
                .is_some_and(|name| sections.iter().any(|s| s.as_bytes() == name.as_bytes()))
        })
        .filter_map(|caps| {
            let open = caps.name("open")?;
            let close = caps.name("close")?;
            Some(open.start()..close.end())
        })
        .collect()
}

/// Byte spans of the given 1-indexed line ranges.
///
/// Ranges are unioned in line space first. A run of removed lines that
/// reaches the last line also takes the newline before it, the way joining
/// the remaining lines back together would.
pub fn line_spans(content: &[u8], ranges: &[LineRange]) -> Vec<Range<usize>> {
    if ranges.is_empty() {
        return Vec::new();
    }

    let mut line_starts = vec![0];
    line_starts.extend(
        content.iter().enumerate().filter(|(_, byte)| **byte == b'\n').map(|(i, _)| i + 1),
    );
    let line_count = line_starts.len();

    let mut removed = vec![false; line_count];
    for range in ranges {
        if range.start() == 0 || range.count() == 0 {
            continue;
        }
        let first = range.start() - 1;
        let last = first.saturating_add(range.count()).min(line_count);
        for flag in removed.iter_mut().take(last).skip(first) {
            *flag = true;
        }
    }

    let mut spans = Vec::new();
    let mut line = 0;
    while line < line_count {
        if !removed[line] {
            line += 1;
            continue;
        }
        let first = line;
        while line < line_count && removed[line] {
            line += 1;
        }
        let span = if line < line_count {
            line_starts[first]..line_starts[line]
        } else if first > 0 {
            line_starts[first] - 1..content.len()
        } else {
            0..content.len()
        };
        spans.push(span);
    }
    spans
}

/// Copies everything outside `spans`. Spans may overlap or touch.
pub fn remove_spans(content: &[u8], mut spans: Vec<Range<usize>>) -> Vec<u8> {
    if spans.is_empty() {
        return content.to_vec();
    }
    spans.sort_by_key(|span| span.start);

    let mut output = Vec::with_capacity(content.len());
    let mut cursor = 0;
    for span in spans {
        trace!("Removing bytes {}..{}", span.start, span.end);
        if span.start > cursor {
            output.extend_from_slice(&content[cursor..span.start]);
        }
        cursor = cursor.max(span.end);
    }
    if cursor < content.len() {
        output.extend_from_slice(&content[cursor..]);
    }
    output
}

/// Removes the excluded sections and line ranges from `content`.
///
/// Both are resolved against the content as it is on disk, so line numbers
/// keep referring to the template file.
pub fn exclude_regions(content: Vec<u8>, sections: &[&str], lines: &[LineRange]) -> Vec<u8> {
    if sections.is_empty() && lines.is_empty() {
        return content;
    }
    let mut spans = line_spans(&content, lines);
    spans.extend(section_spans(&content, sections));
    remove_spans(&content, spans)
}

/// Removes every remaining `@section`/`@endsection` marker comment.
pub fn strip_template_tags(content: &[u8]) -> Vec<u8> {
    TEMPLATE_TAG.replace_all(content, &b""[..]).into_owned()
}
