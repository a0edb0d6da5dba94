use std::io::{self, Write};

use anyhow::Result;

use crate::cli::CliArgs;
use crate::commands::common;
use crate::config::PathRole;
use crate::diagnostics::{NOT_SET, TracingSink};
use crate::output::{OutputFormat, TableOptions, json, table};

pub fn run(args: &CliArgs) -> Result<()> {
    let resolved = common::load_config(args, &TracingSink)?;
    let format = common::output_format(args);

    if args.quiet {
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            let payload = json::config_to_json(&resolved);
            let body = json::emit_json_value(&payload, true)?;
            println!("{}", body);
        }
        _ => {
            let mut rows = vec![
                (
                    "configPath".to_string(),
                    resolved.config_path().display().to_string(),
                ),
                ("jdbcUrl".to_string(), resolved.jdbc_url().to_string()),
                ("username".to_string(), resolved.username().to_string()),
                (
                    "password".to_string(),
                    json::password_display(&resolved).to_string(),
                ),
                (
                    "basePath".to_string(),
                    resolved.base_path().display().to_string(),
                ),
            ];
            for role in PathRole::ALL {
                let value = resolved
                    .path(role)
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| NOT_SET.to_string());
                rows.push((format!("{}Path", role.as_str()), value));
            }

            let rendered = table::render_key_value_table(
                "Configuration",
                &rows,
                format,
                &TableOptions::default(),
            );
            writeln!(io::stdout(), "{}", rendered)?;
        }
    }

    Ok(())
}
