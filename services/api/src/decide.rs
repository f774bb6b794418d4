use clap::Args;
use loan_origination::config::{AppConfig, ConfigError, DecisionConfig};
use loan_origination::error::AppError;
use loan_origination::telemetry;
use loan_origination::workflows::origination::{
    LoanOriginationService, OriginationView, RawApplication, SchemaVersion,
};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct DecideArgs {
    /// JSON application to decide; `-` reads from stdin
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Classifier artifact (defaults to APP_MODEL_PATH)
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Feature schema the artifact was trained on (defaults to APP_FEATURE_SCHEMA)
    #[arg(long)]
    pub(crate) schema: Option<String>,
}

pub(crate) fn run_decide(args: DecideArgs) -> Result<(), AppError> {
    let DecideArgs {
        input,
        model,
        schema,
    } = args;

    let mut config = AppConfig::load()?;
    if let Some(model) = model {
        config.decision.model_path = model;
    }
    if let Some(schema) = schema {
        config.decision.feature_schema = schema
            .parse::<SchemaVersion>()
            .map_err(|err| ConfigError::UnknownFeatureSchema(err.0))?;
    }

    telemetry::init(&config.telemetry)?;

    let payload = read_input(&input)?;
    let view = decide_payload(&payload, &config.decision)?;

    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

fn read_input(path: &Path) -> Result<String, AppError> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

pub(crate) fn decide_payload(
    payload: &str,
    decision: &DecisionConfig,
) -> Result<OriginationView, AppError> {
    let application: RawApplication = serde_json::from_str(payload)?;
    let service = LoanOriginationService::from_config(decision)?;
    Ok(service.process(&application).status_view())
}
