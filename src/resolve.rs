/// Rebases relative mock paths onto the directory of the module under test.
/// Paths are `/`-separated module specifiers, not filesystem paths.
#[derive(Debug, Clone, Default)]
pub struct MockPathResolver {
    subject: Option<String>,
}

impl MockPathResolver {
    pub fn new(subject: Option<String>) -> Self {
        Self { subject }
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Non-relative paths come back unchanged. A relative path needs a
    /// subject; without one the result is `None`.
    pub fn resolve(&self, raw: &str) -> Option<String> {
        if !is_relative(raw) {
            return Some(raw.to_string());
        }
        self.subject.as_deref().map(|subject| rebase(subject, raw))
    }
}

pub fn is_relative(path: &str) -> bool {
    path.starts_with("./") || path.starts_with("../")
}

pub fn rebase(subject: &str, rel: &str) -> String {
    let joined = normalize(&format!("{}/{}", dirname(subject), rel));
    match joined.as_str() {
        "." => "./".to_string(),
        ".." => "../".to_string(),
        _ if is_relative(&joined) || joined.starts_with('/') => joined,
        _ => format!("./{joined}"),
    }
}

pub fn dirname(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return if path.is_empty() { "." } else { "/" };
    }
    match trimmed.rfind('/') {
        Some(0) => "/",
        Some(i) => trimmed[..i].trim_end_matches('/'),
        None => ".",
    }
}

/// Collapses `.`, `..` and repeated separators. Leading `..` segments survive
/// in relative paths and vanish at the root of absolute ones.
pub fn normalize(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let absolute = path.starts_with('/');
    let trailing = path.ends_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            s => parts.push(s),
        }
    }
    let mut out = parts.join("/");
    if absolute {
        out.insert(0, '/');
    }
    if out.is_empty() {
        return ".".to_string();
    }
    if trailing && !out.ends_with('/') {
        out.push('/');
    }
    out
}
