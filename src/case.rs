//! Naming conventions for the service model: domain property and type names -> JSON:API member names.

/// Convert an identifier to a JSON:API standard member name (lower-case, dash separated).
/// e.g. "first_name" -> "first-name", "FirstName" -> "first-name", "ApiEntryPoint" -> "api-entry-point"
pub fn to_member_name(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev: Option<char> = None;
    for c in s.chars() {
        if c == '_' || c == ' ' || c == '-' {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
        } else if c.is_uppercase() {
            let boundary = prev.map(|p| p.is_lowercase() || p.is_ascii_digit()).unwrap_or(false);
            if boundary && !out.ends_with('-') {
                out.push('-');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    out.trim_end_matches('-').to_string()
}

const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
];

/// Pluralize the last word of a name. Separators ('-', '_') and the rest of the name are kept.
/// e.g. "article" -> "articles", "person" -> "people", "api-entry-point" -> "api-entry-points"
pub fn pluralize(s: &str) -> String {
    let split = s.rfind(|c| c == '-' || c == '_').map(|i| i + 1).unwrap_or(0);
    let (head, word) = s.split_at(split);
    if word.is_empty() {
        return s.to_string();
    }
    let lower = word.to_lowercase();
    if let Some((_, plural)) = IRREGULAR_PLURALS.iter().find(|(single, _)| *single == lower) {
        let mut plural = plural.to_string();
        if word.starts_with(|c: char| c.is_uppercase()) {
            plural = capitalize(&plural);
        }
        return format!("{}{}", head, plural);
    }
    let ends_consonant_y = lower.ends_with('y')
        && lower
            .chars()
            .rev()
            .nth(1)
            .map(|c| !"aeiou".contains(c))
            .unwrap_or(false);
    let plural = if ends_consonant_y {
        format!("{}ies", &word[..word.len() - 1])
    } else if ["s", "x", "z", "ch", "sh"].iter().any(|suffix| lower.ends_with(suffix)) {
        format!("{}es", word)
    } else {
        format!("{}s", word)
    };
    format!("{}{}", head, plural)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_name_from_pascal_and_snake() {
        assert_eq!(to_member_name("FirstName"), "first-name");
        assert_eq!(to_member_name("first_name"), "first-name");
        assert_eq!(to_member_name("ApiEntryPoint"), "api-entry-point");
        assert_eq!(to_member_name("title"), "title");
        assert_eq!(to_member_name("line2_address"), "line2-address");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("article"), "articles");
        assert_eq!(pluralize("blog"), "blogs");
        assert_eq!(pluralize("person"), "people");
        assert_eq!(pluralize("Person"), "People");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("day"), "days");
        assert_eq!(pluralize("box"), "boxes");
        assert_eq!(pluralize("api-entry-point"), "api-entry-points");
        assert_eq!(pluralize("sales-person"), "sales-people");
    }
}
