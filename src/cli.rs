use crate::filter::FilterOptions;
use crate::model::{AttributionLabel, Format, OrderBy};
use anyhow::Result;
use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gitfame")]
#[command(about = "Per-author line, commit and file statistics for a git revision")]
#[command(version)]
pub struct Cli {
    #[arg(long, default_value = ".", help = "Path to git repository")]
    pub repository: PathBuf,

    #[arg(long, default_value = "HEAD", help = "Commit to attribute")]
    pub revision: String,

    #[arg(long, value_enum, default_value_t = OrderBy::Lines, help = "Sort key")]
    pub order_by: OrderBy,

    #[arg(long, help = "Attribute lines to the committer instead of the author")]
    pub use_committer: bool,

    #[arg(long, value_enum, default_value_t = Format::Tabular, help = "Output format")]
    pub format: Format,

    #[arg(long, value_delimiter = ',', help = "Only files with these extensions, e.g. '.rs,.md'")]
    pub extensions: Vec<String>,

    #[arg(long, value_delimiter = ',', help = "Only files in these languages, e.g. 'rust,markdown'")]
    pub languages: Vec<String>,

    #[arg(long, value_delimiter = ',', help = "Skip files matching these globs")]
    pub exclude: Vec<String>,

    #[arg(long, value_delimiter = ',', help = "Only files matching these globs")]
    pub restrict_to: Vec<String>,

    #[arg(long, help = "Worker threads [default: available parallelism]")]
    pub jobs: Option<NonZeroUsize>,

    #[arg(long, help = "Show a progress bar on stderr")]
    pub progress: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        crate::fame::exec(self)
    }

    pub fn label(&self) -> AttributionLabel {
        AttributionLabel::from_use_committer(self.use_committer)
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            extensions: self.extensions.clone(),
            languages: self.languages.clone(),
            exclude: self.exclude.clone(),
            restrict_to: self.restrict_to.clone(),
        }
    }

    pub fn jobs(&self) -> usize {
        self.jobs
            .or_else(|| std::thread::available_parallelism().ok())
            .map(NonZeroUsize::get)
            .unwrap_or(4)
    }
}
