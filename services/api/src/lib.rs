mod audit;
mod cli;
mod infra;
mod routes;
mod server;

use data_alchemist::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
