use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;

use hailgen_core::config::Config;
use hailgen_core::script::{ImportScript, VatInputsScript};
use hailgen_core::serialize::serialize_avro_args;
use hailgen_core::{HailgenError, Result};

mod args;
use args::{Cli, Commands, ConfigAction, Shell};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let base_dir = resolve_base_dir(cli.base_dir);

    let result = match cli.command {
        Some(Commands::Generate {
            avro_prefix,
            avro_listing_file,
            vds_output_path,
            vcf_output_path,
            sites_only_vcf_output_path,
            vat_custom_annotations_tsv_path,
            ancestry_file_path,
            gcs_temporary_path,
            import_script_out,
            vat_script_out,
        }) => handle_generate(
            &base_dir,
            &avro_prefix,
            &avro_listing_file,
            &vds_output_path,
            &vcf_output_path,
            &sites_only_vcf_output_path,
            &vat_custom_annotations_tsv_path,
            &ancestry_file_path,
            &gcs_temporary_path,
            import_script_out.as_deref(),
            vat_script_out.as_deref(),
        ),
        Some(Commands::Config { action }) => handle_config(action, &base_dir),
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        None => {
            Cli::command().print_help().ok();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_generate(
    base_dir: &Path,
    avro_prefix: &str,
    avro_listing_file: &Path,
    vds_output_path: &str,
    vcf_output_path: &str,
    sites_only_vcf_output_path: &str,
    vat_custom_annotations_tsv_path: &str,
    ancestry_file_path: &str,
    gcs_temporary_path: &str,
    import_script_out: Option<&Path>,
    vat_script_out: Option<&Path>,
) -> Result<()> {
    let config = Config::load(base_dir)?;
    let classifier = config.to_classifier();

    let listing =
        fs::read_to_string(avro_listing_file).map_err(|source| HailgenError::ListingRead {
            path: avro_listing_file.to_path_buf(),
            source,
        })?;

    let argset = classifier.classify(avro_prefix, listing.lines())?;
    let avro_args = serialize_avro_args(&argset)?;

    let import_script = ImportScript {
        avro_args: &avro_args,
        vds_output_path,
        temp_dir: gcs_temporary_path,
    }
    .render();

    let vat_script = VatInputsScript {
        vds_output_path,
        vcf_output_path,
        sites_only_vcf_output_path,
        vat_custom_annotations_tsv_path,
        ancestry_file_path,
    }
    .render();

    emit_script(&import_script, import_script_out)?;
    emit_script(&vat_script, vat_script_out)?;

    Ok(())
}

fn emit_script(script: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, script)?;
            eprintln!("{} {}", "Wrote:".green(), path.display());
        }
        None => println!("{}", script),
    }
    Ok(())
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "hailgen", &mut io::stdout());
}

fn resolve_base_dir(cli_base: Option<PathBuf>) -> PathBuf {
    if let Some(base) = cli_base {
        return base;
    }

    if let Ok(base) = std::env::var("HAILGEN_BASE") {
        return PathBuf::from(base);
    }

    dirs::home_dir()
        .map(|h| h.join(".hailgen"))
        .unwrap_or_else(|| PathBuf::from(".hailgen"))
}

fn handle_config(action: ConfigAction, base_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load(base_dir)?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}", value);
                }
                None => {
                    return Err(HailgenError::ConfigKeyNotFound { key });
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(base_dir)?;
            config.set(&key, &value)?;
            config.save(base_dir)?;
            println!("{} {} = {}", "Set:".green(), key, value);
        }
        ConfigAction::List => {
            let config = Config::load(base_dir)?;
            println!();
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
            println!();
        }
        ConfigAction::Path => {
            let path = Config::path(base_dir);
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let path = Config::init(base_dir)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}
