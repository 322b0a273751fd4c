//! Pipeline command handlers
//!
//! Handles status lookups, lifecycle actions (pause, unpause, lock release),
//! pipeline creation and run history.

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use colored::*;
use gocd_client::{PipelineAction, PipelinesService};
use gocd_core::domain::instance::PipelineInstance;
use gocd_core::domain::pipeline::Pipeline;
use gocd_core::domain::stage::stage_names;
use gocd_core::domain::status::PipelineStatus;
use tokio_util::sync::CancellationToken;

use crate::config::Config;

/// Pipeline subcommands
#[derive(Subcommand)]
pub enum PipelineCommands {
    /// Show whether a pipeline is locked, paused and schedulable
    Status {
        /// Pipeline name
        name: String,
    },
    /// Pause a pipeline
    Pause {
        /// Pipeline name
        name: String,
    },
    /// Unpause a pipeline
    Unpause {
        /// Pipeline name
        name: String,
    },
    /// Release the lock of a locked pipeline
    ReleaseLock {
        /// Pipeline name
        name: String,
    },
    /// Show a single run of a pipeline
    Instance {
        /// Pipeline name
        name: String,

        /// Page offset
        #[arg(short, long, default_value = "0")]
        offset: i64,
    },
    /// Show the run history of a pipeline
    History {
        /// Pipeline name
        name: String,

        /// Page offset
        #[arg(short, long, default_value = "0")]
        offset: i64,
    },
    /// Create a pipeline from a JSON definition
    Create {
        /// Path to the pipeline JSON file
        #[arg(short, long)]
        file: String,

        /// Pipeline group to create the pipeline in
        #[arg(short, long)]
        group: String,
    },
}

/// Handle pipeline commands
///
/// Routes pipeline subcommands to their respective handlers.
pub async fn handle_pipeline_command(
    command: PipelineCommands,
    config: &Config,
    cancel: &CancellationToken,
) -> Result<()> {
    let pipelines = config.client()?.pipelines();

    match command {
        PipelineCommands::Status { name } => show_status(&pipelines, &name, cancel).await,
        PipelineCommands::Pause { name } => {
            run_action(&pipelines, &name, PipelineAction::Pause, cancel).await
        }
        PipelineCommands::Unpause { name } => {
            run_action(&pipelines, &name, PipelineAction::Unpause, cancel).await
        }
        PipelineCommands::ReleaseLock { name } => {
            run_action(&pipelines, &name, PipelineAction::ReleaseLock, cancel).await
        }
        PipelineCommands::Instance { name, offset } => {
            show_instance(&pipelines, &name, offset, cancel).await
        }
        PipelineCommands::History { name, offset } => {
            show_history(&pipelines, &name, offset, cancel).await
        }
        PipelineCommands::Create { file, group } => {
            create_pipeline(&pipelines, &file, &group, cancel).await
        }
    }
}

/// Show the status of a pipeline
async fn show_status(
    pipelines: &PipelinesService,
    name: &str,
    cancel: &CancellationToken,
) -> Result<()> {
    let response = pipelines
        .get_status(name, cancel)
        .await
        .with_context(|| format!("Failed to get status of pipeline {}", name))?;

    print_status(name, &response.body);

    Ok(())
}

/// Request a lifecycle action and report the outcome
async fn run_action(
    pipelines: &PipelinesService,
    name: &str,
    action: PipelineAction,
    cancel: &CancellationToken,
) -> Result<()> {
    let response = pipelines
        .pipeline_action(name, action, cancel)
        .await
        .with_context(|| format!("Failed to {} pipeline {}", action, name))?;

    if !response.body {
        bail!(
            "{} of pipeline {} was not accepted (status {}): {}",
            action,
            name,
            response.status_code(),
            response.meta.message()
        );
    }

    println!(
        "{}",
        format!("✓ {} {} succeeded", action, name).green().bold()
    );

    Ok(())
}

/// Show one run of a pipeline
async fn show_instance(
    pipelines: &PipelinesService,
    name: &str,
    offset: i64,
    cancel: &CancellationToken,
) -> Result<()> {
    let response = pipelines
        .get_instance(name, offset, cancel)
        .await
        .with_context(|| format!("Failed to get instance of pipeline {}", name))?;

    print_instance_details(&response.body);

    Ok(())
}

/// Show a page of pipeline runs
async fn show_history(
    pipelines: &PipelinesService,
    name: &str,
    offset: i64,
    cancel: &CancellationToken,
) -> Result<()> {
    let response = pipelines
        .get_history(name, offset, cancel)
        .await
        .with_context(|| format!("Failed to get history of pipeline {}", name))?;

    let history = response.body;
    if history.is_empty() {
        println!("{}", "No runs found.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} run(s):", history.pipelines.len()).bold()
    );
    println!();
    for instance in &history.pipelines {
        print_instance_summary(instance);
    }

    Ok(())
}

/// Create a pipeline from a JSON file
async fn create_pipeline(
    pipelines: &PipelinesService,
    path: &str,
    group: &str,
    cancel: &CancellationToken,
) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read pipeline file: {}", path))?;

    let pipeline: Pipeline = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse pipeline definition: {}", path))?;

    if pipeline.name.trim().is_empty() {
        bail!("Pipeline name cannot be empty");
    }

    let response = pipelines
        .create(pipeline, group, cancel)
        .await
        .context("Failed to create pipeline")?;
    let created = response.body;

    println!("{}", "✓ Pipeline created successfully!".green().bold());
    println!("  Name:    {}", created.name.bold());
    println!("  Group:   {}", group.cyan());
    if !created.version.is_empty() {
        println!("  Version: {}", created.version.dimmed());
    }
    println!("  Stages:  {}", stage_names(&created).join(", ").dimmed());

    Ok(())
}

fn flag(value: bool) -> ColoredString {
    if value { "yes".yellow() } else { "no".dimmed() }
}

/// Print pipeline status flags
fn print_status(name: &str, status: &PipelineStatus) {
    println!("{} {}", "Pipeline".bold(), name.cyan());
    println!("  Locked:      {}", flag(status.locked));
    println!("  Paused:      {}", flag(status.paused));
    let schedulable = if status.schedulable {
        "yes".green()
    } else {
        "no".red()
    };
    println!("  Schedulable: {}", schedulable);
}

/// Print a one-block summary of a run
fn print_instance_summary(instance: &PipelineInstance) {
    println!(
        "  {} {} #{}",
        "▸".cyan(),
        instance.name.bold(),
        instance.natural_order
    );
    println!(
        "    Trigger: {}",
        instance.build_cause.trigger_message.dimmed()
    );
    let stages: Vec<String> = instance
        .stages
        .iter()
        .map(|s| format!("{}={}", s.name, stage_result(&s.result)))
        .collect();
    if !stages.is_empty() {
        println!("    Stages:  {}", stages.join(", "));
    }
    println!();
}

/// Print detailed information about a run
fn print_instance_details(instance: &PipelineInstance) {
    println!("{}", "Pipeline Run:".bold());
    println!("  Name:    {}", instance.name.bold());
    println!("  Run:     #{}", instance.natural_order.to_string().cyan());
    println!("  Can run: {}", flag(instance.can_run));
    if !instance.comment.is_empty() {
        println!("  Comment: {}", instance.comment);
    }

    let cause = &instance.build_cause;
    println!("\n{}", "Build Cause:".bold());
    println!("  Trigger: {}", cause.trigger_message);
    if !cause.approver.is_empty() {
        println!("  Approver: {}", cause.approver);
    }
    if cause.trigger_forced {
        println!("  {}", "Forced".yellow());
    }
    for revision in &cause.material_revisions {
        println!(
            "  {} {}",
            "▸".cyan(),
            revision.material.description.dimmed()
        );
        for modification in &revision.modifications {
            let when = modification
                .modified_at()
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default();
            println!(
                "    {} {} {} {}",
                modification.revision.cyan(),
                modification.user_name,
                when.dimmed(),
                modification.comment.lines().next().unwrap_or_default()
            );
        }
    }

    println!("\n{}", "Stages:".bold());
    for stage in &instance.stages {
        println!("  {} {}", stage.name.bold(), stage_result(&stage.result));
    }
}

fn stage_result(result: &str) -> ColoredString {
    match result {
        "Passed" => result.green(),
        "Failed" => result.red(),
        "Cancelled" => result.yellow(),
        "" => "Unknown".dimmed(),
        other => other.normal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gocd_client::{ApiRequest, ApiResponse, GocdClient, Transport};
    use gocd_core::domain::stage::{Stage, StageContainer};
    use reqwest::StatusCode;
    use reqwest::header::HeaderMap;

    /// Answers every request with the same status and body
    struct FixedTransport {
        status: u16,
        body: &'static str,
    }

    #[async_trait]
    impl Transport for FixedTransport {
        async fn execute(
            &self,
            _request: ApiRequest,
            _cancel: &CancellationToken,
        ) -> gocd_client::Result<ApiResponse> {
            Ok(ApiResponse::new(
                StatusCode::from_u16(self.status).unwrap(),
                HeaderMap::new(),
                self.body.as_bytes().to_vec(),
            ))
        }
    }

    fn pipelines(status: u16, body: &'static str) -> PipelinesService {
        GocdClient::with_transport(FixedTransport { status, body }).pipelines()
    }

    #[test]
    fn test_parse_pipeline_definition() {
        let content = r#"{
            "name": "build-pipeline",
            "label_template": "${COUNT}",
            "materials": [{"type": "git", "attributes": {"url": "https://example.com/app.git", "branch": "main"}}],
            "stages": [{"name": "build"}, {"name": "test"}]
        }"#;

        let pipeline: Pipeline = serde_json::from_str(content).unwrap();
        assert_eq!(pipeline.stages().len(), 2);
        assert_eq!(stage_names(&pipeline), vec!["build", "test"]);
        assert_eq!(pipeline.materials[0].attributes.branch, "main");
        assert_eq!(pipeline.stages[1], Stage::new("test"));
    }

    #[test]
    fn test_stage_result_labels() {
        assert!(stage_result("").to_string().contains("Unknown"));
        assert!(stage_result("Passed").to_string().contains("Passed"));
    }

    #[tokio::test]
    async fn test_run_action_succeeds_on_200() {
        let cancel = CancellationToken::new();
        run_action(&pipelines(200, ""), "build-pipeline", PipelineAction::Pause, &cancel)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_run_action_fails_when_not_accepted() {
        let cancel = CancellationToken::new();

        let err = run_action(
            &pipelines(202, ""),
            "build-pipeline",
            PipelineAction::Pause,
            &cancel,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("status 202"));

        let err = run_action(
            &pipelines(409, r#"{"message": "lock is not held"}"#),
            "build-pipeline",
            PipelineAction::ReleaseLock,
            &cancel,
        )
        .await
        .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("status 409"));
        assert!(message.contains("lock is not held"));
    }
}
