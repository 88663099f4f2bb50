//! `$NAME` and `${NAME}` substitution on raw input text.

/// Replaces every variable reference in `input` with the value `lookup`
/// returns for it, or with nothing when `lookup` returns `None`.
///
/// The scan is a single left-to-right pass: substituted values are never
/// rescanned. A `$` that does not start a well-formed reference is kept as is.
pub fn expand_vars<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let bytes = input.as_bytes();
    let mut result = String::with_capacity(input.len());
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }

        let Some((name, end)) = reference_at(input, i + 1) else {
            i += 1;
            continue;
        };

        result.push_str(&input[literal_start..i]);
        if let Some(value) = lookup(name) {
            result.push_str(&value);
        }
        i = end;
        literal_start = end;
    }

    result.push_str(&input[literal_start..]);
    result
}

/// Letters, digits and underscores, not starting with a digit.
pub fn is_identifier(name: &str) -> bool {
    !name.is_empty() && identifier_len(name) == name.len()
}

// Returns the referenced name and the byte offset just past the reference.
fn reference_at(input: &str, start: usize) -> Option<(&str, usize)> {
    let rest = &input[start..];
    if let Some(braced) = rest.strip_prefix('{') {
        let close = braced.find('}')?;
        let name = &braced[..close];
        is_identifier(name).then_some((name, start + close + 2))
    } else {
        let len = identifier_len(rest);
        (len > 0).then(|| (&rest[..len], start + len))
    }
}

fn identifier_len(s: &str) -> usize {
    s.bytes()
        .enumerate()
        .take_while(|&(idx, b)| b == b'_' || b.is_ascii_alphabetic() || (idx > 0 && b.is_ascii_digit()))
        .count()
}
