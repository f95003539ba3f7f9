use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

use crate::error::ApiError;

/// Accumulates per-field messages; empty means the input is acceptable
#[derive(Debug, Default)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    /// Record the error of a field check and pass its value through
    pub fn check<T>(&mut self, field: &str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.add(field, message);
                None
            }
        }
    }

    pub fn into_result(self, message: &str) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error(message, self.0))
        }
    }
}

pub fn required(value: Option<&str>, label: &str) -> Result<String, String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(format!("{} is required", label)),
    }
}

/// Absolute `http`/`https` URL, returned trimmed as the caller wrote it
pub fn bookmark_url(value: Option<&str>) -> Result<String, String> {
    let raw = required(value, "URL")?;
    match url::Url::parse(&raw) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => Ok(raw),
        _ => Err("URL must be an absolute http or https address".to_string()),
    }
}

/// Trim tags and drop blanks, keeping order
pub fn tags(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn description(value: Option<String>) -> Option<String> {
    value
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

/// Distinguishes an absent key (`None`) from an explicit `null` (`Some(None)`)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_must_be_absolute_http() {
        assert_eq!(bookmark_url(Some(" https://a.com ")).unwrap(), "https://a.com");
        assert!(bookmark_url(Some("ftp://a.com")).is_err());
        assert!(bookmark_url(Some("a.com")).is_err());
        assert_eq!(bookmark_url(None).unwrap_err(), "URL is required");
    }

    #[test]
    fn tags_are_trimmed_and_blanks_dropped() {
        let cleaned = tags(vec![" rust ".into(), "".into(), "web".into(), "   ".into()]);
        assert_eq!(cleaned, vec!["rust", "web"]);
    }

    #[test]
    fn field_errors_keep_first_message() {
        let mut errors = FieldErrors::default();
        errors.add("title", "Title is required");
        errors.add("title", "second");
        let err = errors.into_result("Invalid bookmark").unwrap_err();
        assert_eq!(err.to_json()["fieldErrors"]["title"], "Title is required");
    }

    #[test]
    fn double_option_tells_null_from_absent() {
        #[derive(Deserialize)]
        struct Patch {
            #[serde(default, deserialize_with = "double_option")]
            value: Option<Option<String>>,
        }

        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"value":null}"#).unwrap();
        let set: Patch = serde_json::from_str(r#"{"value":"x"}"#).unwrap();
        assert_eq!(absent.value, None);
        assert_eq!(null.value, Some(None));
        assert_eq!(set.value, Some(Some("x".to_string())));
    }
}
