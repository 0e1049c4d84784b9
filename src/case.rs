//! Identifier case conversion for generated TypeScript.

/// Split an identifier into words on any non-alphanumeric character.
fn words(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty())
}

/// SHOUTY words are folded so IN_PROGRESS and in_progress agree.
fn fold(word: &str) -> String {
    if word.chars().any(|c| c.is_lowercase()) {
        word.to_string()
    } else {
        word.to_lowercase()
    }
}

fn capitalize(word: &str) -> String {
    let word = fold(word);
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase the first letter only, so `createdAt` survives unchanged.
fn decapitalize(word: &str) -> String {
    let word = fold(word);
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Ensure the result is a valid identifier.
fn guard_leading_digit(mut s: String) -> String {
    if s.is_empty() || s.starts_with(|c: char| c.is_ascii_digit()) {
        s.insert(0, '_');
    }
    s
}

/// `in-progress` -> `InProgress`
pub fn pascal_case(s: &str) -> String {
    guard_leading_digit(words(s).map(capitalize).collect())
}

/// `created_at` -> `createdAt`
pub fn camel_case(s: &str) -> String {
    let mut out = String::new();
    for (i, word) in words(s).enumerate() {
        if i == 0 {
            out.push_str(&decapitalize(word));
        } else {
            out.push_str(&capitalize(word));
        }
    }
    guard_leading_digit(out)
}
