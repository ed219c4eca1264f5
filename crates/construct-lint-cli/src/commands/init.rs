//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# construct-lint configuration

# Severity that fails `construct_lint::check()` in cargo test ("error" or "warning")
fail_on = "error"

# Framework types the resource rules check against
[core]
construct = "constructs.Construct"
resource = "@cdk/core.Resource"
resource_interface = "@cdk/core.IResource"
grant = "@cdk/aws-iam.Grant"

[linter]
# Suppressed violations, as "<code-glob>:<scope-glob>"
exclude = [
    # "resource-attribute:@pkg/foo-bar.Widget.*",
]

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.resource-interface]
enabled = true
# severity = "error"

[rules.grant-result]
enabled = true
# severity = "warning"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("construct-lint.toml"), force)?;

    println!("Created construct-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit construct-lint.toml to configure rules");
    println!("  2. Run: construct-lint check --schema <resources.json> <assembly>");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}
