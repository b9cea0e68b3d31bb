pub mod args;
pub mod article;
pub mod r#async;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod fs;
pub mod metadata;
pub mod posts;

use std::path::Path;

use args::{Args, ArticleArgs, Commands, ExportArgs, ProjectArgs, ResolveArgs};
use article::NewArticle;
use clap::Parser;
use config::Config;
use error::BlogErr;
use posts::Posts;
use tracing::{error, info};
use tracing_log::AsTrace;

async fn check(args: ProjectArgs) -> Result<(), BlogErr> {
    let config = Config::try_from(args.path.clone())?;
    let documents = posts::load(&args.path, &config).await?;
    let total = documents.len();
    let mut failed = 0;
    for document in &documents {
        if let Err(err) = &document.result {
            failed += 1;
            error!("{}: {err}", document.path.display());
        }
    }
    if failed > 0 {
        return Err(format!("{failed} of {total} documents failed validation").into());
    }
    info!("{total} documents valid");
    Ok(())
}

async fn export(args: ExportArgs) -> Result<(), BlogErr> {
    let path = &args.project.path;
    let config = Config::try_from(path.clone())?;
    let posts = Posts::try_from(posts::load(path, &config).await?)?;
    let json = serde_json::to_string_pretty(&posts.export(&config.collection, args.drafts)?)?;
    match args.output {
        Some(output) => {
            fs::write_file(&output, json.as_bytes(), true).await?;
            info!("wrote {} posts to {}", posts.len(), output.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

async fn article(args: ArticleArgs) -> Result<(), BlogErr> {
    let config = Config::try_from(args.path.clone())?;
    let path = article::create(
        &args.path,
        &config,
        NewArticle {
            title: &args.title,
            summary: args.summary.as_deref(),
            force: args.force,
        },
    )
    .await?;
    println!("{}", path.display());
    Ok(())
}

fn resolve(args: ResolveArgs) -> Result<(), BlogErr> {
    let config = Config::try_from(args.project.path.clone())?;
    let resolved = config
        .resolve_alias(&args.specifier)
        .ok_or_else(|| format!("no alias matches {:?}", args.specifier))?;
    println!("{}", Path::new(&args.project.path).join(resolved).display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BlogErr> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.verbose.log_level_filter().as_trace())
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Some(Commands::Check(check_args)) => check(check_args).await,
        Some(Commands::Export(export_args)) => export(export_args).await,
        Some(Commands::Article(article_args)) => article(article_args).await,
        Some(Commands::Resolve(resolve_args)) => resolve(resolve_args),
        None => check(ProjectArgs::default()).await,
    }
}
