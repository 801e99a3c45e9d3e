use anyhow::Context;
use collector_core::api::{AppConfig, StepDefinition, EXIT_SUCCESS};

use super::cli::StepsArgs;

pub fn execute(cfg: &AppConfig, args: &StepsArgs) -> anyhow::Result<i32> {
    if args.json {
        let body = serde_json::to_string_pretty(&cfg.steps).context("serialize steps")?;
        println!("{body}");
    } else {
        print!("{}", render_table(&cfg.steps));
    }
    Ok(EXIT_SUCCESS)
}

fn render_table(steps: &[StepDefinition]) -> String {
    let width = steps.iter().map(|s| s.name.len()).max().unwrap_or(0).max("SCRIPT".len());
    let mut out = format!("{:>2}  {:<width$}  {:<8}  {}\n", "#", "SCRIPT", "CRITICAL", "OUTPUTS");
    for (i, step) in steps.iter().enumerate() {
        let outputs = if step.output_files.is_empty() {
            "-".to_string()
        } else {
            step.output_files.join(", ")
        };
        out.push_str(&format!(
            "{:>2}  {:<width$}  {:<8}  {}\n",
            i + 1,
            step.name,
            if step.critical { "yes" } else { "no" },
            outputs
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lists_steps_in_order() {
        let steps = vec![
            StepDefinition::new("01_a.R", "").critical(true).with_outputs(["a.json"]),
            StepDefinition::new("02_long_name.R", ""),
        ];
        let table = render_table(&steps);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("01_a.R") && lines[1].contains("yes") && lines[1].ends_with("a.json"));
        assert!(lines[2].starts_with(" 2  02_long_name.R") && lines[2].ends_with('-'));
    }
}
