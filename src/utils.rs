/// Char-boundary safe prefix. Provider descriptions are frequently non-ASCII.
#[inline]
pub fn safe_truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[inline]
pub fn preview(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        format!("{}...", safe_truncate(s, max_chars))
    } else {
        s.to_string()
    }
}

pub fn normalize_role(role: &str) -> String {
    role.trim().to_lowercase().replace(' ', "_")
}
