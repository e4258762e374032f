use client::{ClientConfig, PredictClient, iris, verify};
use log::info;
use model::{Tolerance, codec};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = ClientConfig::from_env();
    let x = iris::load_iris();
    let expected = codec::read_matrix(&config.expected_path)?;
    info!(
        rows = expected.nrows(), cols = expected.ncols();
        "loaded expected output from {}", config.expected_path.display()
    );

    let predictor = PredictClient::new(&config.server_url);
    let outcome = verify(&predictor, x.view(), expected.view(), Tolerance::default()).await?;
    println!("{outcome}");

    Ok(())
}
