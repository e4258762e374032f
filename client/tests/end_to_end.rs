use client::{ClientErr, Outcome, PredictClient, iris, verify};
use model::{ModelRegistry, Pca, Predictor, Tolerance, codec, registry::PCA_KEY};
use ndarray::{Array2, array};
use tokio::{io, net::TcpListener, sync::oneshot, task::JoinHandle};

struct TestServer {
    url: String,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<io::Result<()>>,
}

impl TestServer {
    async fn spawn(pca: Pca) -> io::Result<Self> {
        let mut registry = ModelRegistry::new();
        registry.insert(PCA_KEY, Predictor::Transform(pca));

        let list = TcpListener::bind("127.0.0.1:0").await?;
        let url = format!("http://{}", list.local_addr()?);
        let (stop, stopped) = oneshot::channel();

        let handle = tokio::spawn(server::serve(list, registry, async move {
            let _ = stopped.await;
        }));

        Ok(Self { url, stop, handle })
    }

    async fn shutdown(self) -> io::Result<()> {
        let _ = self.stop.send(());
        self.handle.await.map_err(io::Error::other)?
    }
}

/// Two leading principal axes of the Iris features.
fn iris_pca() -> Pca {
    let mean = array![5.843333, 3.057333, 3.758, 1.199333];
    let components = array![
        [0.36138659, -0.08452251, 0.85667061, 0.3582892],
        [0.65658877, 0.73016143, -0.17337266, -0.07548102],
    ];
    Pca::new(mean, components, array![4.22824171, 0.24267075], false).unwrap()
}

/// Same axes, whitened, so every projection is scaled.
fn whitened_iris_pca() -> Pca {
    let pca = iris_pca();
    Pca::new(
        pca.mean().clone(),
        pca.components().clone(),
        pca.explained_variance().clone(),
        true,
    )
    .unwrap()
}

/// Computes the expected output locally and reads it back from a file like the binary does.
fn expected_output(pca: &Pca, dir: &tempfile::TempDir) -> Array2<f64> {
    let path = dir.path().join("correct_output.bin");
    let expected = pca.transform(iris::load_iris().view()).unwrap();
    codec::write_matrix(&path, expected.view()).unwrap();
    codec::read_matrix(&path).unwrap()
}

#[tokio::test]
async fn test_matching_model_passes() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let expected = expected_output(&iris_pca(), &dir);
    let server = TestServer::spawn(iris_pca()).await?;

    let predictor = PredictClient::new(&server.url);
    let x = iris::load_iris();
    let outcome = verify(&predictor, x.view(), expected.view(), Tolerance::default())
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Pass);
    assert_eq!(outcome.to_string(), "Tests pass!");

    server.shutdown().await
}

#[tokio::test]
async fn test_different_model_fails() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let expected = expected_output(&iris_pca(), &dir);
    let server = TestServer::spawn(whitened_iris_pca()).await?;

    let predictor = PredictClient::new(&server.url);
    let x = iris::load_iris();
    let outcome = verify(&predictor, x.view(), expected.view(), Tolerance::default())
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Fail);
    assert_eq!(outcome.to_string(), "Tests failed!");

    server.shutdown().await
}

#[tokio::test]
async fn test_wider_model_output_fails() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let expected = expected_output(&iris_pca(), &dir);

    let mean = iris_pca().mean().clone();
    let identity = Pca::projection(mean, Array2::eye(4)).unwrap();
    let server = TestServer::spawn(identity).await?;

    let predictor = PredictClient::new(&server.url);
    let x = iris::load_iris();
    let outcome = verify(&predictor, x.view(), expected.view(), Tolerance::default())
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Fail);

    server.shutdown().await
}

#[tokio::test]
async fn test_row_count_mismatch_aborts_before_sending() {
    // Nothing listens here, any request would be an http error instead.
    let predictor = PredictClient::new("http://127.0.0.1:9");
    let x = iris::load_iris();
    let expected = Array2::<f64>::zeros((10, 2));

    let err = verify(&predictor, x.view(), expected.view(), Tolerance::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClientErr::RowCountMismatch {
            got: 10,
            expected: 150
        }
    ));
}

#[tokio::test]
async fn test_server_error_aborts_run() -> io::Result<()> {
    let dir = tempfile::tempdir()?;
    let expected = expected_output(&iris_pca(), &dir);

    // Expects three features, every Iris row has four.
    let narrow = Pca::projection(array![0.0, 0.0, 0.0], Array2::eye(3)).unwrap();
    let server = TestServer::spawn(narrow).await?;

    let predictor = PredictClient::new(&server.url);
    let x = iris::load_iris();
    let err = verify(&predictor, x.view(), expected.view(), Tolerance::default())
        .await
        .unwrap_err();

    match err {
        ClientErr::Http(e) => {
            assert_eq!(e.status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR))
        }
        other => panic!("expected an http error, got {other:?}"),
    }

    server.shutdown().await
}

#[tokio::test]
async fn test_unreachable_server_aborts_run() -> io::Result<()> {
    let list = TcpListener::bind("127.0.0.1:0").await?;
    let url = format!("http://{}", list.local_addr()?);
    drop(list);

    let predictor = PredictClient::new(&url);
    let err = predictor.predict(&[5.1, 3.5, 1.4, 0.2]).await.unwrap_err();

    assert!(matches!(err, ClientErr::Http(_)));
    Ok(())
}
