use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::Verbosity;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
    #[command(flatten)]
    pub verbose: Verbosity,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        name = "check",
        about = "Validate the frontmatter of every post. [default]"
    )]
    Check(ProjectArgs),
    #[command(
        name = "export",
        about = "Validate the collection and write it as JSON for the renderer."
    )]
    Export(ExportArgs),
    #[command(
        name = "article",
        about = "Create a new draft article in the collection directory."
    )]
    Article(ArticleArgs),
    #[command(name = "resolve", about = "Print the path an aliased import resolves to.")]
    Resolve(ResolveArgs),
}

#[derive(Parser, Debug)]
pub struct ProjectArgs {
    /// Path to the project directory.
    #[clap(default_value = ".")]
    pub path: PathBuf,
}

impl Default for ProjectArgs {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
        }
    }
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
    /// Include posts marked as drafts.
    #[clap(long, action)]
    pub drafts: bool,
    /// Write to this file instead of stdout.
    #[clap(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ArticleArgs {
    /// Title of the article, also used to derive the file name.
    #[clap()]
    pub title: String,
    /// Summary for the frontmatter. Defaults to the title.
    #[clap(short, long)]
    pub summary: Option<String>,
    /// Overwrite an existing article with the same file name.
    #[clap(short, long, action)]
    pub force: bool,
    /// Path to the project directory.
    #[clap(long, default_value = ".")]
    pub path: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Import specifier, e.g. `@components/Card.astro`.
    #[clap()]
    pub specifier: String,
    #[command(flatten)]
    pub project: ProjectArgs,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn parse_export() {
        let args = Args::parse_from(["abyss", "export", "site", "--drafts", "-o", "out.json"]);
        match args.command {
            Some(Commands::Export(export)) => {
                assert_eq!(export.project.path, PathBuf::from("site"));
                assert!(export.drafts);
                assert_eq!(export.output, Some(PathBuf::from("out.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn no_subcommand_means_check() {
        let args = Args::parse_from(["abyss"]);
        assert!(args.command.is_none());
    }
}
