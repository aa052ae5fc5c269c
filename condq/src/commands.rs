//! CLI command implementations.

use cond::config::resolve_root;
use cond::{parse_expression, parse_query_with, CompileOptions, Condition, Config, Error, ParseError};

/// Resolve compiler options: `--strict` forces rejection, otherwise use config.
fn compile_options(config: &Config, strict: bool) -> CompileOptions {
    if strict {
        CompileOptions::strict()
    } else {
        config.compile_options()
    }
}

/// Compile a query and print its conditions.
pub fn parse(query: &str, format: Option<&str>, strict: bool) -> cond::Result<()> {
    let config = Config::load()?;
    let conditions = parse_query_with(query, &compile_options(&config, strict))?;
    tracing::debug!(count = conditions.len(), "printing conditions");

    match format.unwrap_or(&config.format) {
        "json" => {
            let json = serde_json::to_string_pretty(&conditions).map_err(std::io::Error::from)?;
            println!("{}", json);
        }
        _ => {
            for condition in &conditions {
                println!("{}\t{}", condition.field(), condition.value());
            }
        }
    }
    Ok(())
}

/// Validate a query; the error (if any) is reported by the caller.
pub fn check(query: &str, strict: bool, quiet: bool) -> cond::Result<()> {
    let config = Config::load()?;
    let conditions = parse_query_with(query, &compile_options(&config, strict))?;

    if !quiet {
        println!("ok: {}", summarize(&conditions));
    }
    Ok(())
}

fn summarize(conditions: &[Condition]) -> String {
    let fields: Vec<&str> = conditions.iter().map(Condition::field).collect();
    let noun = if conditions.len() == 1 { "condition" } else { "conditions" };
    format!("{} {} ({})", conditions.len(), noun, fields.join(", "))
}

/// Print the canonical form of the generic tree.
pub fn tree(query: &str) -> cond::Result<()> {
    let node = parse_expression(query).map_err(ParseError::from)?;
    println!("{}", node);
    Ok(())
}

pub fn config_show() -> cond::Result<()> {
    let config = Config::load()?;
    println!("# {}", config.config_path().display());
    print!("{}", config.to_toml()?);
    Ok(())
}

pub fn config_init(force: bool) -> cond::Result<()> {
    let config = Config::with_root(resolve_root()?);
    let path = config.config_path();
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    config.save()?;
    tracing::info!(path = %path.display(), "wrote default config");
    println!("Wrote {}", path.display());
    Ok(())
}

const QUICK_HELP: &str = r#"condq query syntax

  condition ('and' condition)*

  condition   <field> == '<value>'
  field       job | deployment | metric | origin   (case-sensitive)
  value       single-quoted string; write '' for a literal quote

Examples
  condq parse "job == 'build'"
  condq parse "job == 'build' and deployment == 'prod'" -f json
  condq check "origin == 'edge' and metric == 'p99'"
  condq tree  "job == 'a' or not deployment != 'b'"

Rejected
  or, not, !=, <, >, <=, >=     unsupported expression
  any other field name          unsupported condition
  same field twice (--strict)   conflicting conditions
"#;

pub fn quick_help() -> cond::Result<()> {
    print!("{}", QUICK_HELP);
    Ok(())
}
