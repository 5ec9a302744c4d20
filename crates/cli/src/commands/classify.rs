use std::process::ExitCode;

use bh_core::classifier::has_failures;
use color_eyre::eyre::WrapErr;
use colored::Colorize;

use crate::args::ClassifyArgs;

/// Exits with 1 when the file contains failed samples.
pub fn execute(args: &ClassifyArgs) -> color_eyre::Result<ExitCode> {
    let failed = has_failures(&args.file)
        .wrap_err_with(|| format!("Failed to classify {}", args.file.display()))?;

    if failed {
        println!("{} {}", "failed".red().bold(), args.file.display());
        Ok(ExitCode::FAILURE)
    } else {
        println!("{} {}", "passed".green().bold(), args.file.display());
        Ok(ExitCode::SUCCESS)
    }
}
