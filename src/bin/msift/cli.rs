use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "msift",
    about = "Fuzzy molecule lookup and SMILES sketching",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options accepted by every command.
#[derive(Args)]
pub struct GlobalOptions {
    /// Suppress banner, tables and progress output (for scripting)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Settings file holding language and theme
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        env = "MSIFT_SETTINGS",
        default_value = ".msift.toml"
    )]
    pub settings: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Rank catalog molecules against a free-text query
    #[command(visible_alias = "s")]
    Search(SearchArgs),

    /// Show the best matching molecule in detail
    Show(ShowArgs),

    /// List catalog molecules
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Sketch a SMILES string as SVG or SDF
    #[command(visible_alias = "d")]
    Draw(DrawArgs),

    /// Inspect or change stored preferences
    Settings(SettingsArgs),
}

/// Catalog selection shared by lookup commands.
#[derive(Args)]
#[command(next_help_heading = "Catalogs")]
pub struct CatalogOptions {
    /// Additional catalog (TOML file), searched after the built-in one; repeatable
    #[arg(long = "catalog", value_name = "FILE", action = ArgAction::Append)]
    pub catalogs: Vec<PathBuf>,

    /// Skip the built-in catalog
    #[arg(long)]
    pub no_builtin: bool,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Name, synonym, formula, PubChem CID or SMILES
    pub query: String,

    /// Maximum number of results
    #[arg(short = 'n', long, value_name = "N", default_value = "10")]
    pub limit: usize,

    /// Drop results scoring below this value
    #[arg(long, value_name = "SCORE", default_value = "0")]
    pub min_score: u32,

    /// Only keep molecules with this category tag
    #[arg(long, value_name = "TAG")]
    pub category: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub catalog: CatalogOptions,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Name, synonym, formula, PubChem CID or SMILES
    pub query: String,

    /// Print the entry as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub catalog: CatalogOptions,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only list molecules with this category tag
    #[arg(long, value_name = "TAG")]
    pub category: Option<String>,

    /// Print entries as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub catalog: CatalogOptions,
}

#[derive(Args)]
pub struct DrawArgs {
    /// SMILES string to sketch
    #[arg(required_unless_present = "name", conflicts_with = "name")]
    pub smiles: Option<String>,

    /// Sketch the best catalog match for this query instead
    #[arg(long, value_name = "QUERY")]
    pub name: Option<String>,

    /// Output file (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (inferred from extension if not specified)
    #[arg(long, value_name = "FORMAT")]
    pub outfmt: Option<OutputFormat>,

    /// Override the stored theme for this drawing
    #[arg(long, value_name = "THEME")]
    pub theme: Option<ThemeArg>,

    #[command(flatten)]
    pub canvas: CanvasOptions,

    #[command(flatten)]
    pub catalog: CatalogOptions,
}

#[derive(Args)]
#[command(next_help_heading = "Canvas")]
pub struct CanvasOptions {
    /// Canvas width in pixels
    #[arg(long, value_name = "PX", default_value = "400")]
    pub width: f64,

    /// Canvas height in pixels
    #[arg(long, value_name = "PX", default_value = "300")]
    pub height: f64,

    /// Blank border kept around the sketch
    #[arg(long, value_name = "PX", default_value = "30")]
    pub margin: f64,
}

#[derive(Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub action: SettingsAction,
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the current settings
    Show,

    /// Set the display language
    SetLanguage {
        #[arg(value_name = "LANG")]
        language: LanguageArg,
    },

    /// Set the drawing theme
    SetTheme {
        #[arg(value_name = "THEME")]
        theme: ThemeArg,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Scalable vector graphics drawing
    Svg,
    /// V2000 mol block
    #[value(alias = "mol")]
    Sdf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LanguageArg {
    /// English
    En,
    /// Chinese
    Zh,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}

pub fn parse() -> Cli {
    Cli::parse()
}
