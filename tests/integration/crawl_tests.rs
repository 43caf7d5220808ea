//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! harvest end-to-end: listing walk, product visits, assets and output.

use image::{DynamicImage, ImageFormat, RgbImage};
use larodan_scraper::config::Config;
use larodan_scraper::crawler::run_crawl;
use larodan_scraper::ProductRecord;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_PATH: &str = "/category/mufa/";

/// Creates a test configuration that crawls the mock server and writes into `dir`
fn create_test_config(base_url: &str, dir: &Path, concurrency: u32) -> Config {
    let mut config = Config::default();
    config.crawler.base_url = format!("{}{}", base_url, LISTING_PATH);
    config.crawler.concurrency = concurrency;
    config.crawler.request_timeout_secs = 5;
    config.output.products_file = dir.join("products/products.json").to_string_lossy().into_owned();
    config.output.images_dir = dir.join("products/images").to_string_lossy().into_owned();
    config.output.scratch_dir = dir.join("tmp").to_string_lossy().into_owned();
    config
}

fn listing_html(product_urls: &[String], has_next: bool) -> String {
    let rows: String = product_urls
        .iter()
        .map(|url| {
            format!(
                r#"<tr class="product"><td class="loop-product-sku">-</td>
                   <td class="loop-product-title"><a href="{}">Product</a></td></tr>"#,
                url
            )
        })
        .collect();
    let next = if has_next {
        r##"<a class="next page-numbers" href="#">→</a>"##
    } else {
        ""
    };
    format!(
        "<html><body><table class=\"products\">{}</table><nav>{}</nav></body></html>",
        rows, next
    )
}

fn product_html(sku: &str, name: &str, extra: &str) -> String {
    format!(
        r#"<html><head><title>{1}</title></head><body>
            <h1 class="product-title">{1}</h1>
            <span class="sku">{0}</span>
            <div class="product-prop"><span class="prop-label">CAS number:</span> 112-80-1</div>
            <div class="product-prop product-prop-synonyms"><span class="prop-label">Synonyms:</span> cis-9-Octadecenoic acid, C18:1</div>
            <table class="product-variations-table">
              <tr><td></td><td>{1} - 100 mg</td><td>In stock</td><td>€ 52.00</td><td></td></tr>
              <tr><td></td><td>{1} - 1 g</td><td>In stock</td><td></td><td></td></tr>
            </table>
            {2}
        </body></html>"#,
        sku, name, extra
    )
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::new(width, height))
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("Failed to encode test PNG");
    buf
}

/// Builds a PDF with one line of Courier text per page
fn safety_sheet_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let stream = Stream::new(dictionary! {}, content.encode().expect("Failed to encode page"));
        let content_id = doc.add_object(stream);
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("Failed to write test PDF");
    bytes
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=UTF-8"),
        )
        .mount(server)
        .await;
}

fn read_products(config: &Config) -> Vec<ProductRecord> {
    let content =
        std::fs::read_to_string(&config.output.products_file).expect("Products file missing");
    serde_json::from_str(&content).expect("Products file is not a JSON array of records")
}

#[tokio::test]
async fn test_full_crawl_with_assets() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    let oleic = format!("{}/products/oleic-acid/", base_url);
    let elaidic = format!("{}/products/elaidic-acid/", base_url);
    let erucic = format!("{}/products/erucic-acid/", base_url);

    // Page 2 repeats oleic acid
    mount_html(
        &mock_server,
        LISTING_PATH,
        listing_html(&[oleic.clone(), elaidic.clone()], true),
    )
    .await;
    mount_html(
        &mock_server,
        "/category/mufa/page/2/",
        listing_html(&[oleic.clone(), erucic.clone()], false),
    )
    .await;

    mount_html(
        &mock_server,
        "/products/oleic-acid/",
        product_html(
            "20-1801",
            "Oleic acid",
            r#"<div class="prod-structure"><img src="/img/20-1801.png" alt="Structural formula of Oleic acid"></div>
               <a href="/sds/20-1801.pdf">SDS</a>"#,
        ),
    )
    .await;
    mount_html(
        &mock_server,
        "/products/elaidic-acid/",
        product_html(
            "20-1811",
            "Elaidic acid",
            r#"<div class="prod-structure"><img src="/img/20-1811.svg" alt="Structural formula of Elaidic acid"></div>
               <a href="/sds/20-1811.pdf">SDS</a>"#,
        ),
    )
    .await;
    mount_html(
        &mock_server,
        "/products/erucic-acid/",
        product_html("20-2201", "Erucic acid", ""),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/img/20-1801.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(png_bytes(640, 320))
                .insert_header("content-type", "image/png"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/img/20-1811.svg"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(br#"<svg xmlns="http://www.w3.org/2000/svg"/>"#.to_vec())
                .insert_header("content-type", "image/svg+xml"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sds/20-1801.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(safety_sheet_pdf(&[
                    "SECTION 1 Identification",
                    "14.1 Transport UN 1234 flammable",
                ]))
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&mock_server)
        .await;

    // Not a real PDF: the UN number step fails, the product stays
    Mock::given(method("GET"))
        .and(path("/sds/20-1811.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0x25, 0x50, 0x44, 0x46])
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, dir.path(), 3);
    let stats = run_crawl(config.clone()).await.expect("Crawl failed");

    assert_eq!(stats.listing_pages, 2);
    assert_eq!(stats.products_discovered, 3);
    assert_eq!(stats.products_written, 3);
    assert_eq!(stats.images_saved, 2);
    assert_eq!(stats.un_numbers_found, 1);

    let mut products = read_products(&config);
    products.sort_by(|a, b| a.id.cmp(&b.id));
    let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["20-1801", "20-1811", "20-2201"]);

    let oleic_record = &products[0];
    assert_eq!(oleic_record.name, "Oleic acid");
    assert_eq!(oleic_record.cas, "112-80-1");
    assert_eq!(oleic_record.structure, "Oleic acid");
    assert_eq!(oleic_record.synonyms, vec!["cis-9-Octadecenoic acid", "C18:1"]);
    assert_eq!(oleic_record.packaging.get("100 mg"), Some(&Some(52.0)));
    assert_eq!(oleic_record.packaging.get("1 g"), Some(&None));
    assert_eq!(oleic_record.img, format!("{}/img/20-1801.png", base_url));
    assert_eq!(oleic_record.pdf_msds, format!("{}/sds/20-1801.pdf", base_url));
    assert_eq!(oleic_record.un_number.as_deref(), Some("1234"));

    let png_path = dir.path().join("products/images/20-1801.png");
    assert_eq!(oleic_record.image_path, png_path.to_string_lossy());
    assert_eq!(image::image_dimensions(&png_path).unwrap(), (200, 100));

    let svg_path = dir.path().join("products/images/20-1811.svg");
    assert_eq!(products[1].image_path, svg_path.to_string_lossy());
    assert!(svg_path.exists());
    assert_eq!(products[1].un_number, None);

    assert_eq!(products[2].image_path, "");
    assert_eq!(products[2].img, "");

    // Scratch files never outlive the safety sheet step
    let scratch = std::fs::read_dir(dir.path().join("tmp")).unwrap().count();
    assert_eq!(scratch, 0);
}

#[tokio::test]
async fn test_pagination_stops_on_empty_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    let a = format!("{}/products/a/", base_url);
    let b = format!("{}/products/b/", base_url);

    mount_html(&mock_server, LISTING_PATH, listing_html(&[a.clone()], true)).await;
    mount_html(&mock_server, "/category/mufa/page/2/", listing_html(&[b.clone()], true)).await;
    mount_html(&mock_server, "/category/mufa/page/3/", listing_html(&[], true)).await;

    Mock::given(method("GET"))
        .and(path("/category/mufa/page/4/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&[], false)))
        .expect(0)
        .mount(&mock_server)
        .await;

    mount_html(&mock_server, "/products/a/", product_html("A-1", "A", "")).await;
    mount_html(&mock_server, "/products/b/", product_html("B-1", "B", "")).await;

    let config = create_test_config(&base_url, dir.path(), 2);
    let stats = run_crawl(config.clone()).await.expect("Crawl failed");

    assert_eq!(stats.listing_pages, 3);
    assert_eq!(stats.products_discovered, 2);

    let mut ids: Vec<String> = read_products(&config).into_iter().map(|p| p.id).collect();
    ids.sort();
    assert_eq!(ids, vec!["A-1", "B-1"]);
}

#[tokio::test]
async fn test_one_failing_product_of_ten() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    let urls: Vec<String> = (0..10)
        .map(|i| format!("{}/products/p-{}/", base_url, i))
        .collect();
    mount_html(&mock_server, LISTING_PATH, listing_html(&urls, false)).await;

    for i in 0..10 {
        let route = format!("/products/p-{}/", i);
        if i == 7 {
            Mock::given(method("GET"))
                .and(path(route.as_str()))
                .respond_with(ResponseTemplate::new(500))
                .mount(&mock_server)
                .await;
        } else {
            mount_html(
                &mock_server,
                &route,
                product_html(&format!("P-{}", i), "Fatty acid", ""),
            )
            .await;
        }
    }

    let config = create_test_config(&base_url, dir.path(), 3);
    let stats = run_crawl(config.clone()).await.expect("Crawl failed");

    assert_eq!(stats.products_discovered, 10);
    assert_eq!(stats.products_written, 9);
    assert_eq!(stats.products_dropped, 1);

    let products = read_products(&config);
    assert_eq!(products.len(), 9);
    assert!(products.iter().all(|p| p.id != "P-7"));
}

#[tokio::test]
async fn test_unreachable_listing_writes_empty_document() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, dir.path(), 3);
    let stats = run_crawl(config.clone()).await.expect("Crawl failed");

    assert_eq!(stats.listing_pages, 0);
    assert_eq!(stats.products_written, 0);
    assert!(read_products(&config).is_empty());
}

#[tokio::test]
async fn test_output_write_failure_is_fatal() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let dir = TempDir::new().unwrap();

    mount_html(&mock_server, LISTING_PATH, listing_html(&[], false)).await;

    let mut config = create_test_config(&base_url, dir.path(), 3);
    // The products "file" is an existing directory
    let blocked = dir.path().join("blocked");
    std::fs::create_dir_all(&blocked).unwrap();
    config.output.products_file = blocked.to_string_lossy().into_owned();

    let result = run_crawl(config).await;
    assert!(matches!(
        result,
        Err(larodan_scraper::ScraperError::Persistence { .. })
    ));
}
