//! Command-line surface: old/new tree roots, reference crossmap, output
//! path, log file, and an optional verification crossmap.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "crossmapgen",
    about = "Generates a native-function hash crossmap between two releases of a script bundle"
)]
pub struct Cli {
    /// Root of the old-release script tree.
    pub old_root: PathBuf,

    /// Root of the new-release script tree.
    pub new_root: PathBuf,

    /// Reference crossmap mapping universal hashes to old-release hashes.
    pub reference: PathBuf,

    /// Where to write the resulting universal->new crossmap.
    #[arg(long, default_value = "crossmap_out.txt")]
    pub output: PathBuf,

    /// Where to write the run log.
    #[arg(long, default_value = "crossmapgen.log")]
    pub log_file: PathBuf,

    /// Optional expected crossmap, compared against the produced output for
    /// the summary's wrong-count.
    #[arg(long)]
    pub verify: Option<PathBuf>,
}
