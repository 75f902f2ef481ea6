use crate::config::toml_config::AppConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "boostfy-intake")]
#[command(about = "Onboarding intake server that forwards submissions to ClickUp")]
pub struct CliConfig {
    #[arg(long, env = "BOOSTFY_CONFIG", help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Address to listen on, e.g. 0.0.0.0:3000")]
    pub bind: Option<String>,

    #[arg(long, help = "ClickUp list that receives new tasks")]
    pub list_id: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Verify the ClickUp token before serving")]
    pub check_token: bool,
}

impl CliConfig {
    /// 命令列參數優先於設定檔與環境變數
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(list_id) = &self.list_id {
            config.clickup.list_id = list_id.clone();
        }
        if self.json_logs {
            config.logging.json = true;
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "submit-onboarding")]
#[command(about = "Submit one onboarding form to ClickUp from the command line")]
pub struct SubmitArgs {
    #[arg(long, env = "BOOSTFY_CONFIG", help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub company_name: String,

    #[arg(long)]
    pub cnpj: String,

    #[arg(long, default_value = "")]
    pub website: String,

    #[arg(long, default_value = "")]
    pub sector: String,

    #[arg(long, default_value = "")]
    pub employees: String,

    #[arg(long, help = "File to attach to the created task")]
    pub attachment: Option<PathBuf>,

    #[arg(long, help = "Only validate the form, do not contact ClickUp")]
    pub dry_run: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl SubmitArgs {
    pub fn form(&self) -> crate::domain::model::OnboardingForm {
        crate::domain::model::OnboardingForm {
            company_name: self.company_name.clone(),
            cnpj: self.cnpj.clone(),
            website: self.website.clone(),
            sector: self.sector.clone(),
            employees: self.employees.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_take_precedence() {
        let cli = CliConfig::parse_from([
            "boostfy-intake",
            "--bind",
            "0.0.0.0:9000",
            "--list-id",
            "555",
            "--json-logs",
        ]);
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.clickup.list_id, "555");
        assert!(config.logging.json);
    }

    #[test]
    fn test_submit_args_build_form() {
        let args = SubmitArgs::parse_from([
            "submit-onboarding",
            "--company-name",
            "Padaria Central",
            "--cnpj",
            "11.222.333/0001-81",
            "--employees",
            "12",
        ]);
        let form = args.form();
        assert_eq!(form.company_name, "Padaria Central");
        assert_eq!(form.employees, "12");
        assert!(form.website.is_empty());
        assert!(args.attachment.is_none());
    }
}
