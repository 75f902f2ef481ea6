use anyhow::Result;
use boostfy_intake::utils::validation::Validate;
use boostfy_intake::{AppConfig, Attachment, ClickUpClient, IntakeError, IntakeService, OnboardingForm};
use httpmock::prelude::*;
use tempfile::TempDir;

fn write_config(dir: &TempDir, base_url: &str) -> Result<std::path::PathBuf> {
    let path = dir.path().join("boostfy.toml");
    let content = format!(
        r#"
[server]
bind = "127.0.0.1:0"
max_upload_bytes = 1024

[clickup]
base_url = "{}"
api_token = "pk_flow_token"
list_id = "901107866463"
timeout_seconds = 5

[task]
status = "to do"
priority = 2
notify_all = true
"#,
        base_url
    );
    std::fs::write(&path, content)?;
    Ok(path)
}

fn form() -> OnboardingForm {
    OnboardingForm {
        company_name: "Padaria Central".to_string(),
        cnpj: "11222333000181".to_string(),
        website: "https://padariacentral.com.br".to_string(),
        sector: "Alimentação".to_string(),
        employees: "12".to_string(),
    }
}

fn service(config: &AppConfig) -> Result<IntakeService<ClickUpClient>> {
    let client = ClickUpClient::from_config(config)?;
    Ok(IntakeService::from_config(client, config))
}

#[tokio::test]
async fn test_submission_creates_task_then_attachment() -> Result<()> {
    let server = MockServer::start();
    let temp_dir = TempDir::new()?;
    let config = AppConfig::from_file(write_config(&temp_dir, &server.base_url())?)?;
    config.validate()?;

    let task_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/list/901107866463/task")
            .header("authorization", "pk_flow_token")
            .json_body(serde_json::json!({
                "name": "Padaria Central",
                "description": "Company Name: Padaria Central\nCNPJ: 11.222.333/0001-81\nWeb Site: https://padariacentral.com.br\nSector: Alimentação\nEmployees: 12",
                "status": "to do",
                "priority": 2,
                "notify_all": true
            }));
        then.status(200).json_body(serde_json::json!({
            "id": "86a1b2c3",
            "name": "Padaria Central",
            "url": "https://app.clickup.com/t/86a1b2c3"
        }));
    });

    let attachment_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/task/86a1b2c3/attachment")
            .body_contains("filename=\"contrato.pdf\"");
        then.status(200)
            .json_body(serde_json::json!({"id": "att-99", "title": "contrato.pdf"}));
    });

    let attachment = Attachment::new("contrato.pdf", "application/pdf", b"%PDF-1.4".to_vec());
    let receipt = service(&config)?.submit(&form(), Some(attachment)).await?;

    task_mock.assert();
    attachment_mock.assert();
    assert_eq!(receipt.task_id, "86a1b2c3");
    assert_eq!(receipt.task_url.as_deref(), Some("https://app.clickup.com/t/86a1b2c3"));
    assert_eq!(receipt.attachment_id.as_deref(), Some("att-99"));
    Ok(())
}

#[tokio::test]
async fn test_invalid_cnpj_is_rejected_without_calling_clickup() -> Result<()> {
    let server = MockServer::start();
    let temp_dir = TempDir::new()?;
    let config = AppConfig::from_file(write_config(&temp_dir, &server.base_url())?)?;

    let any_mock = server.mock(|when, then| {
        when.any_request();
        then.status(500);
    });

    let bad = OnboardingForm {
        cnpj: "11.222.333/0001-82".to_string(),
        ..form()
    };
    let err = service(&config)?.submit(&bad, None).await.unwrap_err();

    assert!(matches!(err, IntakeError::FormValidation(ref e) if e.get("cnpj").is_some()));
    any_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_attachment_failure_reports_existing_task() -> Result<()> {
    let server = MockServer::start();
    let temp_dir = TempDir::new()?;
    let config = AppConfig::from_file(write_config(&temp_dir, &server.base_url())?)?;

    server.mock(|when, then| {
        when.method(POST).path("/list/901107866463/task");
        then.status(200).json_body(serde_json::json!({"id": "86zz"}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/task/86zz/attachment");
        then.status(400)
            .json_body(serde_json::json!({"err": "No attachment supplied", "ECODE": "UPLOAD_002"}));
    });

    let attachment = Attachment::new("anexo.txt", "text/plain", b"Ola Mundo".to_vec());
    let err = service(&config)?
        .submit(&form(), Some(attachment))
        .await
        .unwrap_err();

    match err {
        IntakeError::AttachmentFailed { task_id, source } => {
            assert_eq!(task_id, "86zz");
            assert!(matches!(*source, IntakeError::TrackerError { status: 400, .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_attachment_over_configured_limit_is_rejected() -> Result<()> {
    let server = MockServer::start();
    let temp_dir = TempDir::new()?;
    let config = AppConfig::from_file(write_config(&temp_dir, &server.base_url())?)?;

    let any_mock = server.mock(|when, then| {
        when.any_request();
        then.status(200);
    });

    let attachment = Attachment::new("grande.bin", "application/octet-stream", vec![7; 4096]);
    let err = service(&config)?
        .submit(&form(), Some(attachment))
        .await
        .unwrap_err();

    assert!(matches!(err, IntakeError::InvalidAttachment { .. }));
    any_mock.assert_hits(0);
    Ok(())
}
