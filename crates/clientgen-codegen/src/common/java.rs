//! Java code generation utilities.
//!
//! Naming conversions, type mapping, and string literal escaping for the
//! emitted Java sources.
//!
//! # Examples
//!
//! ```
//! use clientgen_codegen::common::java;
//! use clientgen_core::FieldType;
//!
//! assert_eq!(java::to_camel_case("api_key"), "apiKey");
//! assert_eq!(java::java_type(&FieldType::Long), "Long");
//! assert_eq!(java::string_literal("say \"hi\""), r#""say \"hi\"""#);
//! ```

use clientgen_core::FieldType;
use std::fmt::Write as _;

/// Converts a snake_case, kebab-case or camelCase name to camelCase.
///
/// # Examples
///
/// ```
/// use clientgen_codegen::common::java::to_camel_case;
///
/// assert_eq!(to_camel_case("api_key"), "apiKey");
/// assert_eq!(to_camel_case("petId"), "petId");
/// assert_eq!(to_camel_case("Pet"), "pet");
/// assert_eq!(to_camel_case("photo-urls"), "photoUrls");
/// ```
#[must_use]
pub fn to_camel_case(name: &str) -> String {
    let pascal = to_pascal_case(name);
    let mut chars = pascal.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

/// Converts a name to PascalCase, keeping inner capitals.
///
/// # Examples
///
/// ```
/// use clientgen_codegen::common::java::to_pascal_case;
///
/// assert_eq!(to_pascal_case("pet_store"), "PetStore");
/// assert_eq!(to_pascal_case("uploadFile"), "UploadFile");
/// assert_eq!(to_pascal_case("pet"), "Pet");
/// ```
#[must_use]
pub fn to_pascal_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut capitalize_next = true;

    for ch in name.chars() {
        if !ch.is_ascii_alphanumeric() {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(ch.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(ch);
        }
    }

    result
}

/// Maps a schema type to the Java type used in models and signatures.
///
/// # Examples
///
/// ```
/// use clientgen_codegen::common::java::java_type;
/// use clientgen_core::FieldType;
///
/// let tags = FieldType::Array {
///     items: Box::new(FieldType::Ref { name: "tag".to_string() }),
/// };
/// assert_eq!(java_type(&tags), "List<Tag>");
/// assert_eq!(java_type(&FieldType::File), "MultipartFile");
/// ```
#[must_use]
pub fn java_type(field_type: &FieldType) -> String {
    match field_type {
        FieldType::Integer => "Integer".to_string(),
        FieldType::Long => "Long".to_string(),
        FieldType::Number => "Double".to_string(),
        FieldType::String => "String".to_string(),
        FieldType::Boolean => "Boolean".to_string(),
        FieldType::Array { items } => format!("List<{}>", java_type(items)),
        FieldType::Ref { name } => to_pascal_case(name),
        FieldType::File => "MultipartFile".to_string(),
    }
}

/// Returns the field initializer used by generated models.
///
/// Lists start empty so that two default-constructed models compare equal
/// and hash identically; everything else starts `null`.
#[must_use]
pub fn field_initializer(field_type: &FieldType) -> String {
    match field_type {
        FieldType::Array { items } => format!("new ArrayList<{}>()", java_type(items)),
        _ => "null".to_string(),
    }
}

/// Quotes a value as a Java string literal.
///
/// Control characters become three-digit octal escapes; `\u` escapes are
/// avoided because Java translates them before lexing string literals.
///
/// # Examples
///
/// ```
/// use clientgen_codegen::common::java::string_literal;
///
/// assert_eq!(string_literal("a\\b"), r#""a\\b""#);
/// assert_eq!(string_literal("line\nbreak"), r#""line\nbreak""#);
/// assert_eq!(string_literal("\u{1}"), r#""\001""#);
/// ```
#[must_use]
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\{:03o}", u32::from(c));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Parses the body of a Java string literal (without the quotes).
///
/// Returns `None` on a malformed escape sequence.
///
/// # Examples
///
/// ```
/// use clientgen_codegen::common::java::unescape_literal_body;
///
/// assert_eq!(unescape_literal_body(r#"say \"hi\""#).as_deref(), Some("say \"hi\""));
/// assert_eq!(unescape_literal_body(r"\001").as_deref(), Some("\u{1}"));
/// assert_eq!(unescape_literal_body(r"\q"), None);
/// ```
#[must_use]
pub fn unescape_literal_body(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next()? {
            '"' => out.push('"'),
            '\'' => out.push('\''),
            '\\' => out.push('\\'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            first @ '0'..='7' => {
                let mut code = first.to_digit(8)?;
                let max_digits = if first <= '3' { 3 } else { 2 };
                for _ in 1..max_digits {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            code = code * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(code)?);
            }
            _ => return None,
        }
    }

    Some(out)
}

/// Returns the getter name for a field (`photoUrls` becomes `getPhotoUrls`).
#[must_use]
pub fn getter_name(field: &str) -> String {
    format!("get{}", to_pascal_case(field))
}

/// Returns the setter name for a field (`photoUrls` becomes `setPhotoUrls`).
#[must_use]
pub fn setter_name(field: &str) -> String {
    format!("set{}", to_pascal_case(field))
}
