//! Placeholder-aware text utilities.
//!
//! All scanners skip single-quoted literals and double-quoted identifiers (an escaped
//! `''` or `""` toggles twice and stays inside), so inlined text values and quoted
//! names never count as placeholders.

/// Call `f` for every character with a flag telling whether it sits inside a quoted
/// literal or identifier.
fn scan(sql: &str, mut f: impl FnMut(char, bool)) {
    let mut open: Option<char> = None;
    for c in sql.chars() {
        match open {
            Some(q) if c == q => {
                open = None;
                f(c, true);
            }
            Some(_) => f(c, true),
            None if c == '\'' || c == '"' => {
                open = Some(c);
                f(c, true);
            }
            None => f(c, false),
        }
    }
}

/// Repeat the marker `count` times, separated by `", "`.
pub fn repeat_marker(marker: &str, count: usize) -> String {
    vec![marker; count].join(", ")
}

/// Count `?` placeholders outside quoted literals.
pub fn count_placeholders(sql: &str) -> usize {
    let mut n = 0;
    scan(sql, |c, quoted| {
        if c == '?' && !quoted {
            n += 1;
        }
    });
    n
}

/// Remove statement terminators (`;`) outside quoted literals.
pub fn strip_terminators(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    scan(sql, |c, quoted| {
        if c != ';' || quoted {
            out.push(c);
        }
    });
    out
}

/// Rewrite `?` placeholders to Postgres-style `$1, $2, ...` in textual order.
pub fn to_numbered(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut n = 0;
    scan(sql, |c, quoted| {
        if c == '?' && !quoted {
            n += 1;
            out.push('$');
            out.push_str(&n.to_string());
        } else {
            out.push(c);
        }
    });
    out
}
