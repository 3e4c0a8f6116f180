//! Naming-convention helpers.
//!
//! Controller names are PascalCase, actions and dependency names camelCase, and
//! URL segments kebab-case. A PascalCase word is a sequence of segments, each an
//! uppercase letter followed by lowercase letters and then digits (`Foo`, `Bar2`, `X`).

#[derive(Clone, Copy, PartialEq, Eq)]
enum Class {
    Upper,
    Lower,
    Digit,
}

fn class_of(c: char) -> Option<Class> {
    if c.is_ascii_uppercase() {
        Some(Class::Upper)
    } else if c.is_ascii_lowercase() {
        Some(Class::Lower)
    } else if c.is_ascii_digit() {
        Some(Class::Digit)
    } else {
        None
    }
}

/// Checks the segment grammar from `previous` onwards: within a segment lowercase
/// letters may not follow digits, and every new segment starts uppercase.
fn segments_valid(mut previous: Class, rest: impl Iterator<Item = char>) -> bool {
    for c in rest {
        let Some(class) = class_of(c) else {
            return false;
        };
        if previous == Class::Digit && class == Class::Lower {
            return false;
        }
        previous = class;
    }
    true
}

pub fn is_pascal(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => segments_valid(Class::Upper, chars),
        _ => false,
    }
}

pub fn is_camel(s: &str) -> bool {
    let mut chars = s.chars().peekable();
    if !chars.peek().is_some_and(char::is_ascii_lowercase) {
        return false;
    }
    while chars.peek().is_some_and(char::is_ascii_lowercase) {
        chars.next();
    }
    match chars.next() {
        None => true,
        Some(c) if c.is_ascii_uppercase() => segments_valid(Class::Upper, chars),
        Some(_) => false,
    }
}

pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn pascal_to_camel(s: &str) -> String {
    lower_first(s)
}

pub fn kebab_to_pascal(s: &str) -> String {
    s.split('-').map(upper_first).collect()
}

pub fn kebab_to_camel(s: &str) -> String {
    lower_first(&kebab_to_pascal(s))
}

pub fn camel_to_kebab(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut previous_lower = false;
    for c in s.chars() {
        if previous_lower && (c.is_ascii_uppercase() || c.is_ascii_digit()) {
            out.push('-');
        }
        previous_lower = c.is_ascii_lowercase();
        out.extend(c.to_lowercase());
    }
    out
}
