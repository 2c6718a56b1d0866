//! Module-specific URL construction.
//!
//! Each product module (image, video, audio generation) lives on its own
//! subdomain with its own base path, both sourced from configuration.

use std::fmt;

use crate::config::Settings;
use crate::error::Result;

/// A product module with its own subdomain and base path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Module {
    Image,
    Video,
    Audio,
}

impl Module {
    /// Key segment for `module.{name}.subdomain` / `module.{name}.base.path`.
    pub fn config_key(self) -> &'static str {
        match self {
            Module::Image => "image",
            Module::Video => "video",
            Module::Audio => "audio",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}

/// Builds `https://{subdomain}.{base_domain}{base_path}`, appending query
/// parameters in slice order when any are given.
///
/// Keys and values are appended verbatim, without URL-encoding: known module
/// parameter values (model identifiers) are URL-safe tokens, and callers with
/// special characters must pre-encode. Parameter order is preserved so tests
/// keying on exact query strings stay reproducible.
pub fn build_module_url(
    settings: &Settings,
    module: Module,
    params: &[(&str, &str)],
) -> Result<String> {
    let subdomain = settings.module_subdomain(module)?;
    let base_domain = settings.base_domain();
    let base_path = settings.module_base_path(module)?;

    let mut url = format!("https://{subdomain}.{base_domain}{base_path}");
    if !params.is_empty() {
        let query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
        url.push('?');
        url.push_str(&query.join("&"));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigStore;
    use crate::error::Error;

    fn settings() -> Settings {
        Settings::new(
            ConfigStore::from_toml_str(
                r#"
                base.domain = "galaxy.ai"
                module.image.subdomain = "image"
                module.image.base.path = "/ai-image-generator"
                module.video.subdomain = "video"
                module.video.base.path = "/ai-video-generator"
                "#,
            )
            .unwrap(),
        )
    }

    #[test]
    fn image_module_url_with_model_param() {
        let url =
            build_module_url(&settings(), Module::Image, &[("model", "nano-banana-pro")]).unwrap();
        assert_eq!(
            url,
            "https://image.galaxy.ai/ai-image-generator?model=nano-banana-pro"
        );
    }

    #[test]
    fn empty_params_omit_the_question_mark() {
        let url = build_module_url(&settings(), Module::Image, &[]).unwrap();
        assert_eq!(url, "https://image.galaxy.ai/ai-image-generator");
    }

    #[test]
    fn params_keep_insertion_order() {
        let url = build_module_url(
            &settings(),
            Module::Video,
            &[("model", "wan-2"), ("aspect", "16:9"), ("count", "2")],
        )
        .unwrap();
        assert_eq!(
            url,
            "https://video.galaxy.ai/ai-video-generator?model=wan-2&aspect=16:9&count=2"
        );
    }

    #[test]
    fn values_pass_through_unencoded() {
        let url = build_module_url(&settings(), Module::Image, &[("q", "a b")]).unwrap();
        assert!(url.ends_with("?q=a b"));
    }

    #[test]
    fn unconfigured_module_is_a_config_error() {
        let err = build_module_url(&settings(), Module::Audio, &[]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("module.audio.subdomain"));
    }

    #[test]
    fn module_display_matches_config_key() {
        assert_eq!(Module::Image.to_string(), "image");
        assert_eq!(Module::Audio.config_key(), "audio");
    }
}
