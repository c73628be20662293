//! Extraction of the largest balanced bracketed span from noisy text.
//!
//! Generators often surround the real payload with narrative prose. This
//! pass finds every well-nested `{...}` or `[...]` span at the top level of
//! its bracket family and returns the longest one, ignoring brackets that
//! appear inside string literals.

/// Returns the largest well-nested bracketed substring of `text`, or `None`
/// when no bracket family ever closes.
///
/// `{}` and `[]` are tracked independently since a legitimate payload may be
/// array-rooted. Among all candidate spans the longest wins; ties break to
/// the earliest start offset.
pub fn largest_balanced_span(text: &str) -> Option<&str> {
    let mut brace_stack: Vec<usize> = Vec::new();
    let mut bracket_stack: Vec<usize> = Vec::new();
    let mut best: Option<(usize, usize)> = None;
    let mut in_string: Option<char> = None;
    let mut escaped = false;

    for (i, ch) in text.char_indices() {
        // Same string-skipping rule as the lexer: brackets inside literals
        // are data, not structure.
        if let Some(quote) = in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote {
                in_string = None;
            }
            continue;
        }

        match ch {
            '"' | '\'' => in_string = Some(ch),
            '{' => brace_stack.push(i),
            '[' => bracket_stack.push(i),
            '}' => {
                if let Some(start) = brace_stack.pop() {
                    if brace_stack.is_empty() {
                        consider(&mut best, start, i + 1);
                    }
                }
            }
            ']' => {
                if let Some(start) = bracket_stack.pop() {
                    if bracket_stack.is_empty() {
                        consider(&mut best, start, i + 1);
                    }
                }
            }
            _ => {}
        }
    }

    best.map(|(start, end)| &text[start..end])
}

/// Candidates arrive in closing order, so an equal-length later span never
/// displaces an earlier one.
fn consider(best: &mut Option<(usize, usize)>, start: usize, end: usize) {
    let longer = match best {
        None => true,
        Some((best_start, best_end)) => end - start > *best_end - *best_start,
    };
    if longer {
        *best = Some((start, end));
    }
}
