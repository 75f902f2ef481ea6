use anyhow::{Context, Result};
use boostfy_intake::domain::form::validate_attachment;
use boostfy_intake::domain::ports::ConfigProvider;
use boostfy_intake::utils::validation::{validate_attachment_path, Validate};
use boostfy_intake::utils::logger;
use boostfy_intake::{
    AppConfig, Attachment, ClickUpClient, IntakeError, IntakeService, OnboardingForm, SubmitArgs,
};
use clap::Parser;
use std::path::Path;

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("txt") => "text/plain",
        Some("csv") => "text/csv",
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("json") => "application/json",
        Some("zip") => "application/zip",
        _ => "application/octet-stream",
    }
}

async fn read_attachment(path: &Path) -> Result<Attachment> {
    validate_attachment_path(path)?;
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read attachment {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());
    Ok(Attachment::new(file_name, content_type_for(path), bytes))
}

/// 不送出時也要檢查表單與附件
fn dry_run_problems(
    form: &OnboardingForm,
    attachment: Option<&Attachment>,
    max_upload_bytes: usize,
) -> Vec<String> {
    let mut problems: Vec<String> = match form.normalized().validate() {
        Ok(()) => Vec::new(),
        Err(errors) => errors
            .0
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect(),
    };
    if let Some(attachment) = attachment {
        if let Err(e) = validate_attachment(attachment, max_upload_bytes) {
            problems.push(format!("attachment: {}", e.user_friendly_message()));
        }
    }
    problems
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = SubmitArgs::parse();
    logger::init_cli_logger(args.verbose);

    let form = args.form();
    let attachment = match &args.attachment {
        Some(path) => Some(read_attachment(path).await?),
        None => None,
    };

    let config = AppConfig::load(args.config.as_deref())?;

    if args.dry_run {
        let problems = dry_run_problems(&form, attachment.as_ref(), config.max_upload_bytes());
        if !problems.is_empty() {
            for problem in &problems {
                eprintln!("❌ {}", problem);
            }
            std::process::exit(1);
        }

        println!("✅ Form is valid");
        println!("{}", form.normalized().task_description());
        return Ok(());
    }

    config.validate()?;

    let client = ClickUpClient::from_config(&config)?;
    let service = IntakeService::from_config(client, &config);

    match service.submit(&form, attachment).await {
        Ok(receipt) => {
            println!("✅ Task created: {}", receipt.task_id);
            if let Some(url) = &receipt.task_url {
                println!("🔗 {}", url);
            }
            if let Some(attachment_id) = &receipt.attachment_id {
                println!("📎 Attachment: {}", attachment_id);
            }
            Ok(())
        }
        Err(IntakeError::FormValidation(errors)) => {
            for error in &errors.0 {
                eprintln!("❌ {}: {}", error.field, error.message);
            }
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            Err(e.into())
        }
    }
}
