use std::path::PathBuf;

use action_flow::AutomationPlan;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tokio::fs;

use crate::config::Config;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum PlanFormat {
    #[default]
    Human,
    Yaml,
    Json,
}

#[derive(Args, Clone, Debug)]
pub struct PlanArgs {
    /// Read the plan from this YAML file instead of the configuration
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = PlanFormat::Human)]
    pub format: PlanFormat,
}

pub async fn cmd_plan(args: PlanArgs, config: &Config) -> Result<()> {
    let plan = match &args.file {
        Some(path) => {
            let content = fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_yaml::from_str::<AutomationPlan>(&content)
                .with_context(|| format!("Invalid plan in {}", path.display()))?
        }
        None => config.plan.clone(),
    };

    match args.format {
        PlanFormat::Human => print!("{}", render_plan(&plan)),
        PlanFormat::Yaml => print!("{}", serde_yaml::to_string(&plan)?),
        PlanFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
    }
    Ok(())
}

fn render_plan(plan: &AutomationPlan) -> String {
    let mut out = format!("{} steps\n", plan.len());
    for (index, step) in plan.steps().iter().enumerate() {
        out.push_str(&format!(
            "{}. {} (reveal: {}){}\n",
            index + 1,
            step.display_name(),
            step.reveal_selector,
            if step.confirm_with_enter { ", confirm with Enter" } else { "" }
        ));
        for (selector, value) in step.input_selectors.iter().zip(&step.values) {
            out.push_str(&format!("   {selector} = {value:?}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_rendering_lists_every_field() {
        let rendered = render_plan(&crate::plan::replacement_plan());
        assert!(rendered.starts_with("4 steps\n"));
        assert!(rendered.contains("1. seller name"));
        assert!(rendered.contains(r#"input[name="seller_email"] = "dvf@trove.co""#));
        assert!(rendered.contains(r#"input[name="seller_address_line2"] = """#));
    }
}
