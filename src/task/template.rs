// src/task/template.rs

/// Expand a destination template with the captures of a matched path.
///
/// `$1..$N` are replaced by the corresponding capture and `$@` by all
/// captures joined with a single space (trimmed). The template is scanned
/// once, left to right, so text coming from a capture is never expanded
/// again. A run of digits binds to the longest index that names a capture
/// (`$12` is capture 12 when there are twelve, otherwise capture 1 then `2`);
/// placeholders naming no capture are kept as written.
pub fn expand_destination(template: &str, captures: &[String]) -> String {
    let all = captures.join(" ");
    let all = all.trim();

    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(idx) = rest.find('$') {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];

        if let Some(tail) = after.strip_prefix('@') {
            out.push_str(all);
            rest = tail;
            continue;
        }

        let digits = after.len() - after.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        let capture = (1..=digits).rev().find_map(|len| {
            let index: usize = after[..len].parse().ok()?;
            let value = captures.get(index.checked_sub(1)?)?;
            Some((len, value))
        });

        match capture {
            Some((len, value)) => {
                out.push_str(value);
                rest = &after[len..];
            }
            None => {
                out.push('$');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
