use anyhow::Result;

use crate::cli::CliArgs;
use crate::config::{self, CliOverrides, ResolvedConfiguration};
use crate::diagnostics::DiagnosticsSink;
use crate::output::{self, OutputFormat};

pub fn overrides_from_args(args: &CliArgs) -> CliOverrides {
    CliOverrides {
        config_path: args.config_path.clone(),
        env_file: args.env_file.clone(),
        jdbc_url: args.jdbc_url.clone(),
        username: args.username.clone(),
        password: args.password.clone(),
    }
}

pub fn load_config(args: &CliArgs, sink: &dyn DiagnosticsSink) -> Result<ResolvedConfiguration> {
    let overrides = overrides_from_args(args);
    config::load_from_system(&overrides, sink)
}

pub fn output_format(args: &CliArgs) -> OutputFormat {
    output::select_format(&args.output)
}
