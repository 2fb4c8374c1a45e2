use crate::upload::{ConfigError, ResourceKind};

const DEFAULT_CLOUD_NAME: &str = "dtbofqko6";
const DEFAULT_UPLOAD_PRESET: &str = "leemont_hostel_uploads";
const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Media host settings.
///
/// | Env Var                    | Default                           |
/// |----------------------------|-----------------------------------|
/// | `CLOUDINARY_CLOUD_NAME`    | `dtbofqko6`                       |
/// | `CLOUDINARY_UPLOAD_PRESET` | `leemont_hostel_uploads`          |
/// | `CLOUDINARY_API_BASE`      | `https://api.cloudinary.com/v1_1` |
///
/// The upload preset must be an unsigned one, since uploads carry no
/// credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaHostConfig {
    pub cloud_name: String,
    pub upload_preset: String,
    pub api_base: String,
}

impl Default for MediaHostConfig {
    fn default() -> Self {
        Self {
            cloud_name: DEFAULT_CLOUD_NAME.to_string(),
            upload_preset: DEFAULT_UPLOAD_PRESET.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl MediaHostConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &'static str, default: &str| -> Result<String, ConfigError> {
            let value = lookup(key).unwrap_or_else(|| default.to_string());
            let value = value.trim().to_string();
            if value.is_empty() {
                return Err(ConfigError::Missing(key));
            }
            Ok(value)
        };

        let cloud_name = read("CLOUDINARY_CLOUD_NAME", DEFAULT_CLOUD_NAME)?;
        let upload_preset = read("CLOUDINARY_UPLOAD_PRESET", DEFAULT_UPLOAD_PRESET)?;
        let api_base = read("CLOUDINARY_API_BASE", DEFAULT_API_BASE)?;

        if !(api_base.starts_with("https://") || api_base.starts_with("http://")) {
            return Err(ConfigError::Invalid {
                name: "CLOUDINARY_API_BASE",
                reason: format!("{} is not an http(s) URL", api_base),
            });
        }

        Ok(Self {
            cloud_name,
            upload_preset,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn upload_url(&self, kind: ResourceKind) -> String {
        format!("{}/{}/{}/upload", self.api_base, self.cloud_name, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = MediaHostConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, MediaHostConfig::default());
    }

    #[test]
    fn overrides_are_trimmed() {
        let config = MediaHostConfig::from_lookup(lookup_from(&[
            ("CLOUDINARY_CLOUD_NAME", " demo "),
            ("CLOUDINARY_UPLOAD_PRESET", "public_preset"),
            ("CLOUDINARY_API_BASE", "http://localhost:9000/v1_1/"),
        ]))
        .unwrap();
        assert_eq!(config.cloud_name, "demo");
        assert_eq!(config.upload_preset, "public_preset");
        assert_eq!(config.api_base, "http://localhost:9000/v1_1");
    }

    #[test]
    fn empty_value_is_rejected() {
        let err = MediaHostConfig::from_lookup(lookup_from(&[("CLOUDINARY_UPLOAD_PRESET", "  ")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("CLOUDINARY_UPLOAD_PRESET")));
    }

    #[test]
    fn api_base_must_be_http() {
        let err = MediaHostConfig::from_lookup(lookup_from(&[("CLOUDINARY_API_BASE", "ftp://x")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "CLOUDINARY_API_BASE", .. }));
    }

    #[test]
    fn upload_url_per_kind() {
        let config = MediaHostConfig::default();
        assert_eq!(
            config.upload_url(ResourceKind::Image),
            "https://api.cloudinary.com/v1_1/dtbofqko6/image/upload"
        );
        assert_eq!(
            config.upload_url(ResourceKind::Video),
            "https://api.cloudinary.com/v1_1/dtbofqko6/video/upload"
        );
    }
}
