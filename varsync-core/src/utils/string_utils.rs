//! String manipulation utilities.
//!
//! Case conversions between `kebab-case`, `camelCase` and title case. The
//! functions are pure and infallible.

fn is_delimiter(c: char) -> bool {
    c == '_' || c == '-' || c == ' '
}

/// Converts a string to `camelCase`.
///
/// Delimiters (`_`, `-`, ` `) are removed and the following character is
/// upper-cased. The first character is lower-cased.
///
/// # Examples
/// ```
/// use varsync_core::utils::string_utils::to_camel_case;
/// assert_eq!(to_camel_case("page-primary"), "pagePrimary");
/// assert_eq!(to_camel_case("PagePrimary"), "pagePrimary");
/// assert_eq!(to_camel_case("text_on-brand"), "textOnBrand");
/// ```
pub fn to_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = false;

    for c in s.chars() {
        if is_delimiter(c) {
            capitalize_next = !result.is_empty();
        } else if result.is_empty() {
            result.extend(c.to_lowercase());
            capitalize_next = false;
        } else if capitalize_next {
            result.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }
    result
}

/// Converts a string to `kebab-case`.
///
/// Words are split on lowercase-to-uppercase transitions and on existing
/// delimiters, then joined with single hyphens.
///
/// # Examples
/// ```
/// use varsync_core::utils::string_utils::to_kebab_case;
/// assert_eq!(to_kebab_case("pagePrimary"), "page-primary");
/// assert_eq!(to_kebab_case("PagePrimary"), "page-primary");
/// assert_eq!(to_kebab_case("text_on brand"), "text-on-brand");
/// ```
pub fn to_kebab_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_delimiter = true;
    let mut prev_was_upper = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if !prev_was_delimiter && !prev_was_upper {
                result.push('-');
            }
            result.extend(c.to_lowercase());
            prev_was_delimiter = false;
            prev_was_upper = true;
        } else if is_delimiter(c) {
            if !prev_was_delimiter && !result.is_empty() {
                result.push('-');
            }
            prev_was_delimiter = true;
            prev_was_upper = false;
        } else {
            result.push(c);
            prev_was_delimiter = false;
            prev_was_upper = false;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }
    result
}

/// Converts a delimited string to space-separated `Title Case`.
///
/// # Examples
/// ```
/// use varsync_core::utils::string_utils::to_title_case;
/// assert_eq!(to_title_case("page-primary"), "Page Primary");
/// assert_eq!(to_title_case("on_brand"), "On Brand");
/// ```
pub fn to_title_case(s: &str) -> String {
    s.split(is_delimiter)
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("bg-page", "bgPage")]
    #[case("text-on-brand", "textOnBrand")]
    #[case("primary", "primary")]
    #[case("-leading", "leading")]
    #[case("", "")]
    fn test_to_camel_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(to_camel_case(input), expected);
    }

    #[rstest]
    #[case("bgPage", "bg-page")]
    #[case("textOnBrand", "text-on-brand")]
    #[case("HTTPRequest", "httprequest")]
    #[case("trailing-", "trailing")]
    #[case("", "")]
    fn test_to_kebab_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(to_kebab_case(input), expected);
    }

    #[test]
    fn test_camel_and_kebab_are_inverse_for_simple_words() {
        for key in ["bg-page-primary", "gap-inline-icon", "radius-xl"] {
            assert_eq!(to_kebab_case(&to_camel_case(key)), key);
        }
    }

    #[test]
    fn test_to_title_case_skips_repeated_delimiters() {
        assert_eq!(to_title_case("a--b"), "A B");
        assert_eq!(to_title_case(""), "");
    }
}
