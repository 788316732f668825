//! Identifier derivation for generated C# code.
//!
//! Centralizes every naming decision so the emitters never have to sanitize
//! or dedupe on their own: class names from table names, property and field
//! identifiers from column names, keyword escaping, and the configurable
//! class-name template.

use std::collections::HashSet;

use crate::schema::Column;

/// Template token replaced with the derived class name, matched
/// case-insensitively.
const CLASS_NAME_TOKEN: &str = "{name}";

/// C# keywords that cannot be used as bare identifiers.
const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char",
    "checked", "class", "const", "continue", "decimal", "default", "delegate",
    "do", "double", "else", "enum", "event", "explicit", "extern", "false",
    "finally", "fixed", "float", "for", "foreach", "goto", "if", "implicit",
    "in", "int", "interface", "internal", "is", "lock", "long", "namespace",
    "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte",
    "sealed", "short", "sizeof", "stackalloc", "static", "string", "struct",
    "switch", "this", "throw", "true", "try", "typeof", "uint", "ulong",
    "unchecked", "unsafe", "ushort", "using", "virtual", "void", "volatile",
    "while",
];

/// Pascal-case an arbitrary physical name.
///
/// Non-alphanumeric characters split words; existing interior casing is
/// preserved ("user_ID" becomes "UserID"). A leading digit, or a name with
/// no alphanumeric characters at all, gets a stable prefix so the result is
/// always a legal identifier.
pub fn pascal_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut start_of_word = true;
    for ch in raw.chars() {
        if !ch.is_ascii_alphanumeric() {
            start_of_word = true;
            continue;
        }
        if start_of_word {
            out.push(ch.to_ascii_uppercase());
            start_of_word = false;
        } else {
            out.push(ch);
        }
    }
    if out.is_empty() || out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert_str(0, "Col");
    }
    out
}

/// Camel-case variant of [`pascal_case`].
pub fn camel_case(raw: &str) -> String {
    let pascal = pascal_case(raw);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(pascal.len());
            out.push(first.to_ascii_lowercase());
            out.push_str(chars.as_str());
            out
        }
        None => pascal,
    }
}

/// Derived class name for a physical table name.
pub fn class_name(table_name: &str) -> String {
    pascal_case(table_name)
}

/// Escape a field identifier that collides with a C# keyword.
pub fn escape_field(name: &str) -> String {
    if CSHARP_KEYWORDS.contains(&name) {
        format!("@{name}")
    } else {
        name.to_string()
    }
}

/// Derive property and field identifiers for every column, in schema order.
///
/// Property names are deduplicated with numeric suffixes so they are unique
/// within the table; field names follow the (unique) property names.
pub fn derive_member_names(columns: &mut [Column]) {
    let mut seen = HashSet::new();
    for col in columns.iter_mut() {
        let base = pascal_case(&col.name);
        let mut property = base.clone();
        let mut n = 2;
        while !seen.insert(property.clone()) {
            property = format!("{base}{n}");
            n += 1;
        }
        col.field_name = escape_field(&camel_case(&property));
        col.property_name = property;
    }
}

/// Whether a class-name template contains the `{Name}` token.
pub fn template_has_token(template: &str) -> bool {
    template.to_ascii_lowercase().contains(CLASS_NAME_TOKEN)
}

/// Substitute every occurrence of the `{Name}` token (case-insensitive).
///
/// Templates are validated up front (`GenerationConfig::validate`), so a
/// token-free template passes through unchanged rather than erroring here.
pub fn apply_class_template(template: &str, class_name: &str) -> String {
    let lower = template.to_ascii_lowercase();
    let mut out = String::with_capacity(template.len() + class_name.len());
    let mut rest = 0;
    for (idx, _) in lower.match_indices(CLASS_NAME_TOKEN) {
        if idx < rest {
            continue;
        }
        out.push_str(&template[rest..idx]);
        out.push_str(class_name);
        rest = idx + CLASS_NAME_TOKEN.len();
    }
    out.push_str(&template[rest..]);
    out
}
