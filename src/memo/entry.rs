//! Text format of a staged note.
//!
//! ```text
//! - [{title}]({href}) #tag1 #tag2 \n > {description}
//! ```
//!
//! Parts are joined with single spaces; the description, when present, starts
//! on its own quoted line.

/// Format one note entry.
pub fn format_entry(title: &str, href: &str, description: &str, tags: &[String]) -> String {
    let mut parts = Vec::with_capacity(tags.len() + 2);
    parts.push(format!("- [{}]({})", title, href));
    parts.extend(tags.iter().map(|tag| format!("#{}", tag)));
    if !description.is_empty() {
        parts.push(format!("\n > {}", description));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_entry() {
        let entry = format_entry(
            "Example",
            "https://example.com/canonical-x",
            "Hello World",
            &["demo".to_string()],
        );
        assert_eq!(
            entry,
            "- [Example](https://example.com/canonical-x) #demo \n > Hello World"
        );
    }

    #[test]
    fn link_only() {
        assert_eq!(format_entry("T", "https://t", "", &[]), "- [T](https://t)");
    }

    #[test]
    fn description_without_tags() {
        assert_eq!(
            format_entry("T", "https://t", "quote", &[]),
            "- [T](https://t) \n > quote"
        );
    }

    #[test]
    fn several_tags_are_space_separated() {
        let tags = vec!["rust".to_string(), "async".to_string()];
        assert_eq!(
            format_entry("T", "https://t", "", &tags),
            "- [T](https://t) #rust #async"
        );
    }
}
