//! Entity key derivation.
//!
//! Every vertex id is built from an ordered tuple of semantic fields. The
//! components are joined with [`KEY_SEPARATOR`]; separators and escape
//! characters inside a component are backslash-escaped, so two different
//! tuples can never produce the same key.

/// Separator placed between key components.
pub const KEY_SEPARATOR: char = ':';

const ESCAPE: char = '\\';

/// Build a stable entity key from ordered component values.
///
/// # Example
///
/// ```rust
/// use infragraph_types::build_key;
///
/// assert_eq!(build_key(["nova.host", "host-1"]), "nova.host:host-1");
/// assert_ne!(build_key(["a:b", "c"]), build_key(["a", "b:c"]));
/// ```
pub fn build_key<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut key = String::new();
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            key.push(KEY_SEPARATOR);
        }
        for c in value.as_ref().chars() {
            if c == KEY_SEPARATOR || c == ESCAPE {
                key.push(ESCAPE);
            }
            key.push(c);
        }
    }
    key
}

/// Split a key produced by [`build_key`] back into its components.
pub fn split_key(key: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = key.chars();

    while let Some(c) = chars.next() {
        match c {
            ESCAPE => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            KEY_SEPARATOR => parts.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_key_joins_components() {
        assert_eq!(
            build_key(["nagios", "host-1", "cpu_check"]),
            "nagios:host-1:cpu_check"
        );
    }

    #[test]
    fn test_build_key_is_deterministic() {
        let first = build_key(vec!["nova.instance".to_string(), "abc".to_string()]);
        let second = build_key(["nova.instance", "abc"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_build_key_escapes_separator() {
        assert_ne!(build_key(["a:b", "c"]), build_key(["a", "b:c"]));
        assert_ne!(build_key(["a\\", "b"]), build_key(["a\\:b"]));
        assert_eq!(build_key(["a:b"]), "a\\:b");
    }

    #[test]
    fn test_split_key_recovers_components() {
        let values = ["switch", "rack:1\\left", ""];
        let key = build_key(values);
        assert_eq!(split_key(&key), values);
    }

    #[test]
    fn test_component_order_matters() {
        assert_ne!(build_key(["host-1", "cpu"]), build_key(["cpu", "host-1"]));
    }
}
