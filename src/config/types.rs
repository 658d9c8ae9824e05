use serde::Deserialize;

/// Main configuration structure for a harvest run
#[derive(Debug, Clone, Deserialize)]
pub struct HarvestConfig {
    pub course: CourseConfig,
    #[serde(default)]
    pub harvest: HarvestOptions,
    #[serde(default)]
    pub embeds: EmbedConfig,
}

/// Remote course identity and credentials
#[derive(Debug, Clone, Deserialize)]
pub struct CourseConfig {
    /// Base URL of the course-management API
    #[serde(rename = "api-url")]
    pub api_url: String,

    /// API token for the harvesting account
    #[serde(rename = "api-key")]
    pub api_key: String,

    /// Course to harvest
    #[serde(rename = "course-id")]
    pub course_id: i64,
}

/// Feature flags for one run
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarvestOptions {
    /// Whether module items pointing at external URLs are fetched and indexed
    #[serde(rename = "index-external-urls", default)]
    pub index_external_urls: bool,

    /// Whether embedded-media captions are expanded into documents
    #[serde(rename = "load-media-captions", default)]
    pub load_media_captions: bool,
}

/// Hostnames used to recognize embedded resources
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmbedConfig {
    /// Hostname of the course UI; direct embed links are only trusted on
    /// this host
    #[serde(rename = "ui-hostname", default)]
    pub ui_hostname: String,

    /// Hostname of the caption service; embed URLs on other hosts carry no
    /// media id
    #[serde(rename = "caption-hostname", default)]
    pub caption_hostname: String,
}

impl HarvestConfig {
    /// Builds a configuration programmatically, for embedding the harvester
    /// in another service instead of reading a TOML file.
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        course_id: i64,
        index_external_urls: bool,
        load_media_captions: bool,
    ) -> Self {
        Self {
            course: CourseConfig {
                api_url: api_url.into(),
                api_key: api_key.into(),
                course_id,
            },
            harvest: HarvestOptions {
                index_external_urls,
                load_media_captions,
            },
            embeds: EmbedConfig::default(),
        }
    }

    pub fn with_embed_hosts(
        mut self,
        ui_hostname: impl Into<String>,
        caption_hostname: impl Into<String>,
    ) -> Self {
        self.embeds.ui_hostname = ui_hostname.into();
        self.embeds.caption_hostname = caption_hostname.into();
        self
    }
}
