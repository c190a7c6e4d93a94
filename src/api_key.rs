use crate::errors::{Error, Result, ValidationError};

/// Validated API key. Construction fails only on empty input; the key is
/// stored exactly as given.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn parse(raw: impl AsRef<str>) -> Result<Self> {
        let value = raw.as_ref();
        if value.is_empty() {
            return Err(Error::Validation(
                ValidationError::new("api key is required").with_field("api_key"),
            ));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.0.chars().take(3).collect();
        write!(f, "ApiKey({prefix}***)")
    }
}

impl TryFrom<&str> for ApiKey {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        ApiKey::parse(value)
    }
}

impl TryFrom<String> for ApiKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        ApiKey::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_rejected() {
        match ApiKey::parse("") {
            Err(Error::Validation(err)) => assert_eq!(err.field.as_deref(), Some("api_key")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn any_non_empty_key_is_accepted() {
        for raw in ["sk-test", "x", "gooseai-key-123", " ", "\n"] {
            let key = ApiKey::parse(raw).expect("non-empty key");
            assert_eq!(key.as_str(), raw);
        }
    }

    #[test]
    fn key_is_stored_as_given() {
        let key = ApiKey::parse("  sk-abc \n").unwrap();
        assert_eq!(key.as_str(), "  sk-abc \n");
    }

    #[test]
    fn debug_does_not_leak_the_secret() {
        let key = ApiKey::parse("sk-very-secret").unwrap();
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("very-secret"));
    }
}
