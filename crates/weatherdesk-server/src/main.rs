use anyhow::Result;
use weatherdesk_core::{AppError, Config};

#[tokio::main]
async fn main() -> Result<()> {
    weatherdesk_core::init()?;

    let (config, validation) = Config::load_validated()
        .map_err(|e| report(AppError::from_anyhow(e)))?;
    if !validation.warnings.is_empty() {
        tracing::info!(
            "Starting with {} configuration warning(s)",
            validation.warnings.len()
        );
    }

    weatherdesk_server::run(config).await.map_err(report)?;

    Ok(())
}

fn report(err: AppError) -> anyhow::Error {
    tracing::error!("{} ({})", err.user_message(), err);
    err.into()
}
