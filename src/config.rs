use std::{
    collections::BTreeMap,
    fs::File,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{BlogErr, ContextExt};

pub const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Partytown {
    /// Globals whose calls are forwarded from the main thread to the worker.
    pub forward: Vec<String>,
}

impl Default for Partytown {
    fn default() -> Self {
        Self {
            forward: vec!["dataLayer.push".to_string(), "gtag".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Integrations {
    pub mdx: bool,
    pub sitemap: bool,
    pub partytown: Option<Partytown>,
}

impl Default for Integrations {
    fn default() -> Self {
        Self {
            mdx: true,
            sitemap: true,
            partytown: Some(Partytown::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: Option<Url>,
    pub content_path: PathBuf,
    pub collection: String,
    pub integrations: Integrations,
    pub aliases: BTreeMap<String, PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let mut aliases = BTreeMap::from([("@".to_string(), PathBuf::from("src"))]);
        for dir in ["assets", "components", "layouts", "pages", "styles", "utils"] {
            aliases.insert(format!("@{dir}"), Path::new("src").join(dir));
        }
        Self {
            site: Url::parse("https://blog.stackabyss.dev").ok(),
            content_path: PathBuf::from("src/content"),
            collection: "blog".to_string(),
            integrations: Integrations::default(),
            aliases,
        }
    }
}

impl TryFrom<PathBuf> for Config {
    type Error = BlogErr;
    fn try_from(value: PathBuf) -> Result<Self, BlogErr> {
        let config_path = value.join(CONFIG_FILE);
        if !config_path.exists() {
            debug!("no {CONFIG_FILE} in {value:?}, using defaults");
            return Ok(Config::default());
        }
        let f = File::open(&config_path).with_context(|| format!("config file: {config_path:?}"))?;
        let config: Config = serde_yaml::from_reader(f)
            .with_context(|| format!("config file: {config_path:?}"))?;
        config.check()?;
        Ok(config)
    }
}

impl Config {
    /// Rejects combinations the site build cannot work with.
    pub fn check(&self) -> Result<(), BlogErr> {
        if self.integrations.sitemap && self.site.is_none() {
            return Err("the sitemap integration requires `site` to be set".into());
        }
        if let Some(partytown) = &self.integrations.partytown {
            if partytown.forward.iter().any(|name| name.trim().is_empty()) {
                return Err("partytown forward entries must not be empty".into());
            }
        }
        if let Some(alias) = self.aliases.keys().find(|alias| !alias.starts_with('@')) {
            return Err(format!("alias {alias:?} must start with '@'").into());
        }
        if self.collection.trim().is_empty() {
            return Err("collection name must not be empty".into());
        }
        Ok(())
    }

    /// Directory holding the documents of the configured collection.
    pub fn collection_path(&self, project: &Path) -> PathBuf {
        project.join(&self.content_path).join(&self.collection)
    }

    /// File extensions that belong to the collection.
    pub fn extensions(&self) -> Vec<&'static str> {
        if self.integrations.mdx {
            vec!["md", "mdx"]
        } else {
            vec!["md"]
        }
    }

    /// Resolves an aliased import specifier such as `@components/Card.astro`.
    ///
    /// The longest alias that equals the specifier, or prefixes it up to a
    /// `/`, wins.
    pub fn resolve_alias(&self, specifier: &str) -> Option<PathBuf> {
        self.aliases
            .iter()
            .filter_map(|(alias, target)| {
                if specifier == alias {
                    Some((alias.len(), target.clone()))
                } else {
                    specifier
                        .strip_prefix(alias.as_str())
                        .and_then(|rest| rest.strip_prefix('/'))
                        .map(|rest| (alias.len(), target.join(rest)))
                }
            })
            .max_by_key(|(len, _)| *len)
            .map(|(_, path)| path)
    }
}
