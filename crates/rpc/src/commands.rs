//! CLI commands

use signoff_core::{ApprovalConfiguration, ApprovalSetting, CommandId, Decision, UserId, VoteView};
use signoff_engine::{ApproveOutcome, SettingsRequest};

use crate::context::AppContext;

/// Seed the approval configuration
pub async fn init(ctx: &AppContext) -> Result<bool, anyhow::Error> {
    let seeded = ctx.coordinator.initialize().await?;
    let config = ctx.coordinator.active_configuration().await?;

    if seeded {
        println!(
            "✅ Approval settings initialized: {} with {} required approval(s)",
            config.approval_mode, config.required_approvals
        );
    } else {
        println!(
            "ℹ️  Already initialized: {} with {} required approval(s)",
            config.approval_mode, config.required_approvals
        );
    }
    println!("   Database: {}", ctx.database_path().display());
    Ok(seeded)
}

/// Cast an approving vote
pub async fn approve(
    ctx: &AppContext,
    command_id: i64,
    voter_id: i64,
) -> Result<ApproveOutcome, anyhow::Error> {
    let outcome = ctx
        .coordinator
        .approve(CommandId(command_id), UserId(voter_id))
        .await?;

    match outcome.decision {
        Decision::Approved => println!("✅ Command {} approved", command_id),
        Decision::Rejected => println!("❌ Command {} was already rejected", command_id),
        Decision::Pending => println!(
            "⏳ Vote recorded, command {} still pending",
            command_id
        ),
    }
    Ok(outcome)
}

/// Cast a rejecting vote
pub async fn reject(
    ctx: &AppContext,
    command_id: i64,
    voter_id: i64,
) -> Result<Decision, anyhow::Error> {
    let decision = ctx
        .coordinator
        .reject(CommandId(command_id), UserId(voter_id))
        .await?;

    match decision {
        Decision::Approved => println!(
            "✅ Vote recorded, command {} was already approved",
            command_id
        ),
        _ => println!("❌ Command {} rejected by user {}", command_id, voter_id),
    }
    Ok(decision)
}

/// Show the current decision for a command
pub async fn status(ctx: &AppContext, command_id: i64) -> Result<Decision, anyhow::Error> {
    let decision = ctx.coordinator.status(CommandId(command_id)).await?;
    println!("Command {}: {}", command_id, decision);
    Ok(decision)
}

/// List votes on a command
pub async fn votes(
    ctx: &AppContext,
    command_id: i64,
    json: bool,
) -> Result<Vec<VoteView>, anyhow::Error> {
    let views = ctx.coordinator.votes(CommandId(command_id)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(views);
    }

    if views.is_empty() {
        println!("No votes on command {}", command_id);
        return Ok(views);
    }

    println!("Votes on command {}:", command_id);
    println!("{:-<60}", "");
    for view in &views {
        println!(
            "{:>4}  {:<16} {:<9} {}",
            view.id,
            view.user.as_deref().unwrap_or("<unknown>"),
            view.vote,
            view.submitted.format("%Y-%m-%d %H:%M:%S")
        );
    }
    Ok(views)
}

/// Show the active approval settings
pub async fn settings_show(ctx: &AppContext, json: bool) -> Result<ApprovalSetting, anyhow::Error> {
    let setting = ctx.coordinator.active_setting().await?;
    let enabled = ctx.coordinator.maker_checker_enabled().await?;

    if json {
        let value = serde_json::json!({
            "setting": setting,
            "makerChecker": enabled,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(setting);
    }

    println!("Approval mode:      {}", setting.approval_mode);
    println!("Required approvals: {}", setting.required_approvals);
    if let Some(leader) = &setting.required_user {
        println!("Leader:             {}", leader);
    }
    println!(
        "Maker-checker:      {}",
        if enabled { "enabled" } else { "disabled" }
    );
    Ok(setting)
}

/// Change the approval settings
pub async fn settings_update(
    ctx: &AppContext,
    actor: i64,
    request: &SettingsRequest,
) -> Result<ApprovalConfiguration, anyhow::Error> {
    let config = ctx
        .coordinator
        .update_configuration(UserId(actor), request)
        .await?;

    println!(
        "✅ Approval settings updated: {} with {} required approval(s)",
        config.approval_mode, config.required_approvals
    );
    println!(
        "   Maker-checker {}",
        if config.maker_checker_enabled() {
            "enabled"
        } else {
            "disabled"
        }
    );
    Ok(config)
}
