use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::{config::Config, error::BlogErr, frontmatter, fs::write_file, metadata::validate};

/// Turns a title into a file stem.
///
/// Letters and digits of any script are kept and lowercased; every other run
/// of characters becomes a single `-`.
pub fn slugify(title: &str) -> Result<String, BlogErr> {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        return Err(format!("cannot derive a file name from title {title:?}").into());
    }
    Ok(slug)
}

/// Renders a markdown document whose frontmatter passes validation.
///
/// String values are written as double-quoted scalars, so the date stays a
/// string for any YAML parser on the rendering side.
pub fn render(title: &str, summary: &str, date: NaiveDate) -> Result<String, BlogErr> {
    let document = format!(
        "---\ntitle: {}\ndate: \"{}\"\nsummary: {}\ntags: []\ndraft: true\n---\n\n# {title}\n",
        serde_json::to_string(title)?,
        date.format("%Y-%m-%d"),
        serde_json::to_string(summary)?,
    );
    validate(&frontmatter::parse(&document)?)?;
    Ok(document)
}

pub struct NewArticle<'a> {
    pub title: &'a str,
    pub summary: Option<&'a str>,
    pub force: bool,
}

/// Writes a new draft post into the collection directory and returns its path.
pub async fn create(project: &Path, config: &Config, article: NewArticle<'_>) -> Result<PathBuf, BlogErr> {
    let slug = slugify(article.title)?;
    let path = config.collection_path(project).join(format!("{slug}.md"));
    let content = render(
        article.title,
        article.summary.unwrap_or(article.title),
        Utc::now().date_naive(),
    )?;
    if path.exists() && !article.force {
        return Err(format!(
            "{} already exists, use --force to overwrite it",
            path.display()
        )
        .into());
    }
    write_file(&path, content.as_bytes(), article.force).await?;
    info!("created {}", path.display());
    Ok(path)
}
