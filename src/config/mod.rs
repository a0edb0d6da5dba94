mod env;
mod loader;
mod resolver;
mod schema;
mod validate;

pub use env::{CONFIG_VAR, Env, JDBC_URL_VAR, PASSWORD_VAR, USERNAME_VAR};
pub use loader::{
    CliOverrides, DEFAULT_CONFIG_FILE, load_config, resolve_config_path, resolve_overrides,
};
pub use resolver::{ConfigResolver, Overrides, PathRole, ResolvedConfiguration};
pub use schema::{
    DATABASE_SCHEMA, DeclaredPaths, DescriptorSchema, ElementKind, ElementSchema,
    RawConfiguration,
};
pub use validate::{
    DescriptorFormat, JsonValidator, SchemaError, SchemaValidator, XmlValidator, YamlValidator,
};

use crate::diagnostics::DiagnosticsSink;
use crate::error::{AppError, ErrorKind};

pub fn load_from_system(
    cli: &CliOverrides,
    sink: &dyn DiagnosticsSink,
) -> anyhow::Result<ResolvedConfiguration> {
    let env = Env::from_system(cli.env_file.as_deref()).map_err(|err| {
        let path = cli.env_file.as_deref().unwrap_or(std::path::Path::new(".env"));
        AppError::new(
            ErrorKind::Usage,
            format!("Could not load environment file '{}': {}", path.display(), err),
        )
    })?;
    Ok(load_config(cli, &env, sink)?)
}
