use std::{
    collections::{BTreeSet, HashMap},
    path::{Path, PathBuf},
    sync::Arc,
};

use itertools::Itertools;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::fs::{canonicalize, read};
use tracing::{debug, info};

use crate::{
    config::Config,
    error::{BlogErr, ContextExt},
    frontmatter,
    fs::get_files_by_ext_deep,
    metadata::{validate, BlogPostMetadata},
    r#async::try_map,
};

/// Outcome of reading and validating one file of the collection.
#[derive(Debug)]
pub struct Document {
    pub path: PathBuf,
    pub slug: Arc<str>,
    pub result: Result<BlogPostMetadata, BlogErr>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct Post {
    slug: Arc<str>,
    data: BlogPostMetadata,
}

impl Post {
    pub fn new(slug: Arc<str>, data: BlogPostMetadata) -> Self {
        Self { slug, data }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn data(&self) -> &BlogPostMetadata {
        &self.data
    }
}

/// Validated posts of a collection, newest first.
pub struct Posts {
    posts: HashMap<Arc<str>, Arc<Post>>,
    order: Vec<Arc<str>>,
    tags: HashMap<Arc<str>, Vec<Arc<Post>>>,
}

impl Posts {
    pub fn new() -> Self {
        Self {
            posts: HashMap::new(),
            order: Vec::new(),
            tags: HashMap::new(),
        }
    }

    pub fn add(&mut self, post: Post) -> Result<(), BlogErr> {
        let slug = post.slug.clone();
        if self.posts.contains_key(&slug) {
            return Err(format!("duplicate post slug: {slug}").into());
        }
        let post = Arc::new(post);
        for tag in post.data.tags() {
            self.tags
                .entry(Arc::from(tag.as_str()))
                .or_default()
                .push(post.clone());
        }
        self.posts.insert(slug.clone(), post);
        self.order.push(slug);
        Ok(())
    }

    pub fn keys(&self) -> &[Arc<str>] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, slug: &str) -> Option<&Post> {
        self.posts.get(slug).map(|post| post.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Post> {
        self.order
            .iter()
            .filter_map(|slug| self.posts.get(slug).map(|post| post.as_ref()))
    }

    /// Posts that are not marked as drafts.
    pub fn published(&self) -> impl Iterator<Item = &Post> {
        self.iter().filter(|post| !post.data.is_draft())
    }

    pub fn get_tags(&self) -> BTreeSet<&str> {
        self.tags.keys().map(|tag| &**tag).collect()
    }

    pub fn get_posts_by_tag(&self, tag: &str) -> Vec<&Post> {
        self.tags
            .get(tag)
            .map(|posts| posts.iter().map(|post| post.as_ref()).collect())
            .unwrap_or_default()
    }

    /// JSON handed to the renderer: posts keyed by collection name.
    pub fn export(&self, collection: &str, include_drafts: bool) -> Result<Value, BlogErr> {
        let posts: Vec<&Post> = if include_drafts {
            self.iter().collect()
        } else {
            self.published().collect()
        };
        let mut exported = Map::new();
        exported.insert(collection.to_string(), serde_json::to_value(posts)?);
        Ok(Value::Object(exported))
    }
}

impl Default for Posts {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<Document>> for Posts {
    type Error = BlogErr;

    /// Fails on the first invalid document; partial collections are never built.
    fn try_from(documents: Vec<Document>) -> Result<Self, BlogErr> {
        let mut valid = Vec::with_capacity(documents.len());
        for document in documents {
            let path = document.path;
            let data = document
                .result
                .with_context(|| format!("post: {}", path.display()))?;
            valid.push(Post::new(document.slug, data));
        }

        valid.sort_by(|a, b| {
            b.data
                .date()
                .cmp(a.data.date())
                .then_with(|| a.slug.cmp(&b.slug))
        });

        let mut posts = Posts::new();
        for post in valid {
            posts.add(post)?;
        }
        Ok(posts)
    }
}

fn slug_for(path: &Path, root: &Path) -> Arc<str> {
    path.strip_prefix(root)
        .unwrap_or(path)
        .with_extension("")
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .join("/")
        .into()
}

async fn read_document((path, root): (PathBuf, Arc<PathBuf>)) -> Result<Document, BlogErr> {
    let bytes = read(&path)
        .await
        .with_context(|| format!("read post: {}", path.display()))?;
    let slug = slug_for(&path, &root);
    debug!("validating {slug}");
    let result = String::from_utf8(bytes)
        .map_err(|err| BlogErr::from(format!("post is not valid UTF-8: {err}")))
        .and_then(|contents| frontmatter::parse(&contents))
        .and_then(|raw| Ok(validate(&raw)?));
    Ok(Document { path, slug, result })
}

/// Reads and validates every document of the configured collection.
///
/// Per-document failures are kept in the returned outcomes so every broken
/// file can be reported; only I/O failures abort the load.
pub async fn load(project: &Path, config: &Config) -> Result<Vec<Document>, BlogErr> {
    let collection_path = config.collection_path(project);
    let root = Arc::new(
        canonicalize(&collection_path)
            .await
            .with_context(|| format!("collection directory: {}", collection_path.display()))?,
    );
    let files = get_files_by_ext_deep(&root, &config.extensions()).await?;
    info!(
        "validating {} documents of collection {:?}",
        files.len(),
        config.collection
    );

    let input = files.into_iter().map(|path| (path, root.clone()));
    let mut documents = try_map(input, read_document).await?;
    documents.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(documents)
}
