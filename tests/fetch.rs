use anyhow::Result;
use cslscraper::{
    csl,
    fetch::{urls::UrlConfig, urls::UrlResolver, FetchConfig, Fetcher, HttpFetcher},
    uk,
};
use std::{collections::BTreeMap, io::Read, time::Duration};
use tempfile::tempdir;
use url::Url;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const CSL_BODY: &str = "source,entity_number,type,programs,name\nSSI,1234,Individual,SDN;SSI,Jane Doe\nZZZ,1,Entity,,Nobody\n";
const UK_BODY: &str = "Last Updated,14/10/2026\nName 6,Name 1,Group Type,Group ID\nDOE,Jane,Individual,42\n";

fn fast_config() -> FetchConfig {
    FetchConfig {
        request_timeout: Duration::from_secs(5),
        deadline: Duration::from_secs(30),
        max_retries: 2,
        initial_backoff: Duration::from_millis(10),
        max_age: Some(Duration::from_secs(3600)),
    }
}

fn read_all(mut file: std::fs::File) -> Result<String> {
    let mut s = String::new();
    file.read_to_string(&mut s)?;
    Ok(s)
}

#[tokio::test]
async fn downloads_and_reuses_cached_copy() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lists/consolidated.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CSL_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir()?;
    let fetcher = HttpFetcher::new(fast_config())?;
    let mut files = BTreeMap::new();
    files.insert(
        "csl.csv".to_string(),
        Url::parse(&format!("{}/lists/consolidated.csv", server.uri()))?,
    );

    let first = fetcher.get_files(dir.path(), &files).await?;
    assert_eq!(first.keys().collect::<Vec<_>>(), vec!["csl.csv"]);
    assert!(dir.path().join("csl.csv").exists());

    let mut second = fetcher.get_files(dir.path(), &files).await?;
    let body = read_all(second.remove("csl.csv").expect("csl.csv handle"))?;
    assert_eq!(body, CSL_BODY);

    // `expect(1)` is verified when the server drops
    Ok(())
}

#[tokio::test]
async fn failure_names_the_logical_file() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("a,b\n"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing.csv"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir()?;
    let fetcher = HttpFetcher::new(fast_config())?;
    let mut files = BTreeMap::new();
    files.insert("good.csv".to_string(), Url::parse(&format!("{}/ok.csv", server.uri()))?);
    files.insert(
        "broken.csv".to_string(),
        Url::parse(&format!("{}/missing.csv", server.uri()))?,
    );

    let err = fetcher
        .get_files(dir.path(), &files)
        .await
        .expect_err("404 must fail the whole call");
    assert!(format!("{:#}", err).contains("broken.csv"), "{:#}", err);
    Ok(())
}

#[tokio::test]
async fn transient_server_error_is_retried() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky.csv"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x,y\n"))
        .mount(&server)
        .await;

    let dir = tempdir()?;
    let fetcher = HttpFetcher::new(fast_config())?;
    let mut files = BTreeMap::new();
    files.insert("flaky.csv".to_string(), Url::parse(&format!("{}/flaky.csv", server.uri()))?);

    let mut out = fetcher.get_files(dir.path(), &files).await?;
    assert_eq!(read_all(out.remove("flaky.csv").expect("flaky.csv handle"))?, "x,y\n");
    Ok(())
}

#[tokio::test]
async fn throttled_request_is_retried() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/busy.csv"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/busy.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string("a,b\n"))
        .mount(&server)
        .await;

    let dir = tempdir()?;
    let fetcher = HttpFetcher::new(fast_config())?;
    let mut files = BTreeMap::new();
    files.insert("busy.csv".to_string(), Url::parse(&format!("{}/busy.csv", server.uri()))?);

    let mut out = fetcher.get_files(dir.path(), &files).await?;
    assert_eq!(read_all(out.remove("busy.csv").expect("busy.csv handle"))?, "a,b\n");
    Ok(())
}

#[tokio::test]
async fn deadline_bounds_a_stalled_source() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow.csv"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let dir = tempdir()?;
    let fetcher = HttpFetcher::new(FetchConfig {
        deadline: Duration::from_millis(200),
        ..fast_config()
    })?;
    let mut files = BTreeMap::new();
    files.insert("slow.csv".to_string(), Url::parse(&format!("{}/slow.csv", server.uri()))?);

    assert!(fetcher.get_files(dir.path(), &files).await.is_err());
    Ok(())
}

#[tokio::test]
async fn us_download_follows_template_override() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mirror/consolidated.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CSL_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = UrlResolver::new(UrlConfig {
        csl_download_template: Some(format!("{}/mirror/%s", server.uri())),
        ..Default::default()
    });
    let dir = tempdir()?;
    let fetcher = HttpFetcher::new(fast_config())?;

    let mut files = csl::download(&fetcher, &resolver, dir.path()).await?;
    let file = files.remove(csl::CSL_FILE_NAME).expect("csl.csv handle");
    let parsed = csl::read_csl(file)?;

    assert_eq!(parsed.records.ssis.len(), 1);
    assert_eq!(parsed.records.ssis[0].programs, vec!["SDN", "SSI"]);
    assert_eq!(parsed.errors.len(), 1);
    assert!(dir.path().join("csl.csv").exists());
    Ok(())
}

#[tokio::test]
async fn uk_download_is_stored_as_conlist() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/publishlive/ConList.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(UK_BODY))
        .mount(&server)
        .await;

    let resolver = UrlResolver::new(UrlConfig {
        uk_csl_download_url: Some(format!("{}/publishlive/ConList.csv", server.uri())),
        ..Default::default()
    });
    let dir = tempdir()?;
    let fetcher = HttpFetcher::new(fast_config())?;

    let file = uk::download(&fetcher, &resolver, dir.path()).await?;
    let parsed = uk::read_uk(file)?;

    assert!(dir.path().join(uk::UK_FILE_NAME).exists());
    assert_eq!(parsed.last_updated, "14/10/2026");
    assert_eq!(parsed.records.len(), 1);
    assert_eq!(parsed.records[0].name, "Jane DOE");
    Ok(())
}
