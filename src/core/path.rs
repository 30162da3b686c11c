//! POSIX-style path helpers
//!
//! Embedded paths are always absolute, `/`-separated and free of `.`/`..`
//! segments. These helpers operate on strings rather than `std::path` so the
//! behaviour is identical on every host platform.

/// Clean `path` into its absolute, normalized form.
///
/// The path is joined with the root, redundant separators are collapsed and
/// `.`/`..` segments are resolved. `..` at the root stays at the root.
pub fn clean(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }

    if parts.is_empty() {
        return String::from("/");
    }

    let mut out = String::with_capacity(path.len() + 1);
    for part in parts {
        out.push('/');
        out.push_str(part);
    }
    out
}

/// Join a directory path and a child name, cleaning the result
pub fn join(dir: &str, name: &str) -> String {
    clean(&format!("{}/{}", dir, name))
}

/// Last element of `path` ("/" for the root)
pub fn base(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}
