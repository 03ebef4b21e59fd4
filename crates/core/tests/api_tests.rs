//! Library API integration tests
use std::time::Duration;

use harvest_core::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

fn fixture(name: &str) -> String {
    std::fs::read_to_string(get_fixture_path(name)).unwrap()
}

fn rules(entries: &[(&str, RuleSurface)]) -> RuleSet {
    let surfaces: RuleSurfaces = entries
        .iter()
        .map(|(field, surface)| (field.to_string(), surface.clone()))
        .collect();
    RuleSet::from_surfaces(&surfaces).unwrap()
}

/// Serves `status` and `body` to every connection on a local port.
async fn serve(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else { break };
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{}/", addr)
}

/// Accepts connections and never answers.
async fn serve_silence() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    format!("http://{}/", addr)
}

#[test]
fn test_scenario_first_heading() {
    let doc = Document::parse("<html><body><h1>Hello</h1></body></html>");
    let data = extract_fields(&doc, &rules(&[("title", RuleSurface::new("h1"))])).unwrap();
    assert_eq!(data["title"], FieldValue::Text("Hello".to_string()));
}

#[test]
fn test_scenario_all_items() {
    let doc = Document::parse(r#"<div class="item">a</div><div class="item">b</div><div class="item">c</div>"#);
    let data = extract_fields(&doc, &rules(&[("items", RuleSurface::new(".item").with_all(true))])).unwrap();
    assert_eq!(
        data["items"],
        FieldValue::List(vec!["a".to_string(), "b".to_string(), "c".to_string()])
    );
}

#[test]
fn test_scenario_nth_out_of_range() {
    let doc = Document::parse(r#"<div class="item">a</div><div class="item">b</div><div class="item">c</div>"#);
    let result = extract_fields(&doc, &rules(&[("item", RuleSurface::new(".item").with_order(5))]));
    assert!(matches!(
        result,
        Err(HarvestError::IndexOutOfRange { index: 5, matched: 3, .. })
    ));
}

#[test]
fn test_scenario_missing_is_null() {
    let doc = Document::parse("<p>nothing here</p>");
    for surface in [
        RuleSurface::new(".missing"),
        RuleSurface::new(".missing").with_all(true),
        RuleSurface::new(".missing").with_order(2),
    ] {
        let data = extract_fields(&doc, &rules(&[("missing", surface)])).unwrap();
        assert_eq!(data["missing"], FieldValue::Null);
    }
}

#[test]
fn test_fixture_rules_file() {
    let surfaces = load_rules_file(std::path::Path::new(&get_fixture_path("products.rules.json"))).unwrap();
    let rules = RuleSet::from_surfaces(&surfaces).unwrap();
    let data = extract_html(&fixture("products.html"), &rules).unwrap();

    assert_eq!(data["heading"].as_text(), Some("Garden Tools"));
    assert_eq!(
        data["names"].as_list().unwrap(),
        &["Trowel".to_string(), "Pruning shears".to_string(), "Watering can".to_string()]
    );
    assert_eq!(data["second_price"].as_text(), Some("$24.50"));
    assert!(data["note"].as_text().unwrap().starts_with('\n'));
    assert!(data["reviews"].is_null());
}

#[test]
fn test_unicode_text() {
    let doc = Document::parse(&fixture("products.html"));
    let data = extract_fields(&doc, &rules(&[("footer", RuleSurface::new("footer p"))])).unwrap();
    assert_eq!(data["footer"].as_text(), Some("Café Jardín · Ünïcödé ✓"));
}

#[test]
fn test_response_json_shape() {
    let harvester = Harvester::new(HarvesterConfig::default()).unwrap();
    let mut surfaces = RuleSurfaces::new();
    surfaces.insert("heading".to_string(), RuleSurface::new("h1"));
    surfaces.insert("prices".to_string(), RuleSurface::new(".price").with_all(true));
    surfaces.insert("reviews".to_string(), RuleSurface::new(".review"));

    let response = harvester.extract(&fixture("products.html"), &surfaces).unwrap();
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["data"]["heading"], "Garden Tools");
    assert_eq!(json["data"]["prices"][2], "$18.75");
    assert!(json["data"]["reviews"].is_null());
}

#[tokio::test]
async fn test_scrape_over_http() {
    let url = serve("200 OK", r#"<h1>Served</h1><i class="n">1</i><i class="n">2</i>"#).await;
    let harvester = Harvester::new(HarvesterConfig::builder().timeout(5).build()).unwrap();

    let request = ScrapeRequest::new(url)
        .selector("title", RuleSurface::new("h1"))
        .selector("numbers", RuleSurface::new(".n").with_all(true));

    let response = harvester.scrape(&request).await.unwrap();
    assert_eq!(response.data["title"].as_text(), Some("Served"));
    assert_eq!(response.data["numbers"].as_list().map(|n| n.len()), Some(2));
}

#[tokio::test]
async fn test_fetch_and_extract_with_defaults() {
    let url = serve("200 OK", r#"<h1> Quick </h1><p>one</p><p>two</p>"#).await;

    let mut surfaces = RuleSurfaces::new();
    surfaces.insert("title".to_string(), RuleSurface::new("h1"));
    surfaces.insert("last".to_string(), RuleSurface::new("p").with_order(1));

    let response = fetch_and_extract(&url, &surfaces).await.unwrap();
    assert_eq!(response.data["title"].as_text(), Some("Quick"));
    assert_eq!(response.data["last"].as_text(), Some("two"));
}

#[tokio::test]
async fn test_non_success_status_is_fetch_error() {
    let url = serve("404 Not Found", "<h1>Gone</h1>").await;
    let harvester = Harvester::new(HarvesterConfig::builder().timeout(5).build()).unwrap();

    let request = ScrapeRequest::new(url).selector("title", RuleSurface::new("h1"));
    let err = harvester.scrape(&request).await.unwrap_err();

    assert!(matches!(err, HarvestError::Status { status: 404, .. }));
    assert!(err.is_fetch_error());
}

#[tokio::test]
async fn test_fetch_timeout() {
    let url = serve_silence().await;
    let harvester = Harvester::new(HarvesterConfig::builder().timeout(1).build()).unwrap();

    let request = ScrapeRequest::new(url).selector("title", RuleSurface::new("h1"));
    let result = tokio::time::timeout(Duration::from_secs(10), harvester.scrape(&request))
        .await
        .expect("fetch should give up on its own");

    assert!(matches!(result, Err(HarvestError::Timeout { timeout: 1 })));
}

#[tokio::test]
async fn test_unreachable_host() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    drop(listener);

    let harvester = Harvester::new(HarvesterConfig::builder().timeout(5).build()).unwrap();
    let request = ScrapeRequest::new(url).selector("title", RuleSurface::new("h1"));

    let err = harvester.scrape(&request).await.unwrap_err();
    assert!(err.is_fetch_error());
}
