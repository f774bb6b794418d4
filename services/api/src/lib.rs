mod cli;
mod decide;
mod infra;
mod routes;
mod server;

use loan_origination::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
