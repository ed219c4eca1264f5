//! List rules command implementation.

use construct_lint_core::Config;
use construct_lint_rules::{resource_rules, ResourceReflection, Rule};

/// Runs the list-rules command.
///
/// Messages name the core types from the resolved configuration.
pub fn run(config: &Config) {
    let rules: Vec<Rule<ResourceReflection<'_>>> = resource_rules(&config.core);

    println!("Available rules:\n");
    println!("{:<38} {:<9} Description", "Code", "Severity");
    println!("{}", "-".repeat(100));

    for rule in &rules {
        let enabled = if config.is_rule_enabled(rule.code()) {
            ""
        } else {
            " (disabled)"
        };
        let severity = config.rule_severity(rule.code()).unwrap_or(rule.severity());
        println!(
            "{:<38} {:<9} {}{enabled}",
            rule.code(),
            severity.to_string(),
            rule.message()
        );
    }

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  construct-lint check --schema resources.json --rules resource-attribute,grant-result");
}
