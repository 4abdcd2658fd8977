// studyhub - backend for study groups with an ai tutor

use studyhub::cli;

#[tokio::main]
async fn main() -> miette::Result<()> {
    cli::run().await
}
