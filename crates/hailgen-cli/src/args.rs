use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "hailgen")]
#[command(about = "Generate Hail import_gvs invocation scripts from GVS Avro listings")]
#[command(version)]
pub struct Cli {
    /// Base directory (default: ~/.hailgen)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the import and VAT-inputs scripts from an Avro listing
    Generate {
        /// GCS prefix under which the exported Avro files live
        #[arg(long)]
        avro_prefix: String,

        /// File containing a recursive listing under the Avro prefix
        #[arg(long)]
        avro_listing_file: PathBuf,

        /// GCS location for VDS output
        #[arg(long)]
        vds_output_path: String,

        /// GCS location for VCF output generated from the VDS
        #[arg(long)]
        vcf_output_path: String,

        /// GCS location for the sites-only VCF output
        #[arg(long)]
        sites_only_vcf_output_path: String,

        /// GCS location for the VAT custom annotations TSV
        #[arg(long)]
        vat_custom_annotations_tsv_path: String,

        /// Tab-separated ancestry file mapping samples to subpopulations
        #[arg(long)]
        ancestry_file_path: String,

        /// GCS location under which to create temporary files
        #[arg(long)]
        gcs_temporary_path: String,

        /// Write the import script to this file instead of stdout
        #[arg(long)]
        import_script_out: Option<PathBuf>,

        /// Write the VAT-inputs script to this file instead of stdout
        #[arg(long)]
        vat_script_out: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., classify.superpartitioned_keys)
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., classify.superpartitioned_keys)
        key: String,

        /// Value to set (e.g., "vets,refs" or "[vets, refs]")
        value: String,
    },

    /// List all config values
    List,

    /// Show config file path
    Path,

    /// Initialize config file with defaults
    Init,
}
