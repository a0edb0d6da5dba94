use std::io::{self, Write};

use anyhow::Result;
use serde_json::json;

use crate::cli::{CheckArgs, CliArgs};
use crate::commands::common;
use crate::diagnostics::{TracingSink, WriterSink};
use crate::output::{OutputFormat, json as json_out};

pub fn run(args: &CliArgs, _cmd: &CheckArgs) -> Result<()> {
    let format = common::output_format(args);

    // The transcript is the output unless JSON was requested or output is silenced
    if args.quiet || matches!(format, OutputFormat::Json) {
        let resolved = common::load_config(args, &TracingSink)?;
        if !args.quiet {
            let payload = json!({
                "status": "ok",
                "configuration": json_out::config_to_json(&resolved),
            });
            println!("{}", json_out::emit_json_value(&payload, true)?);
        }
        return Ok(());
    }

    let sink = WriterSink::with_heading(io::stdout());
    common::load_config(args, &sink)?;
    sink.take_error()?;
    writeln!(io::stdout(), "Configuration OK")?;
    Ok(())
}
