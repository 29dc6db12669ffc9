use anyhow::Result;
use httpmock::prelude::*;
use schooldekho::adapters::export::Exporter;
use schooldekho::core::filter::{AlumniQuery, SchoolQuery};
use schooldekho::domain::ports::Storage;
use schooldekho::{
    default_field_specs, FixtureCatalogue, HttpSchoolApi, LocalStorage, SchoolDirectory,
};
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;

fn schools_body() -> serde_json::Value {
    json!({
        "schools": [
            {
                "id": "1",
                "name": "Delhi Public School",
                "type": "Day School",
                "board": "CBSE",
                "location": {"city": "New Delhi", "state": "Delhi"},
                "fees": {"annual_fee": 150000, "admission_fee": 25000},
                "facilities": ["Library", "Sports Complex", "Science Labs", "Auditorium", "Cafeteria", "Transport"],
                "rating": 4.5,
                "reviews_count": 324,
                "established_year": 1949,
                "website": "https://dpsrkp.net"
            },
            {
                "id": "2",
                "name": "The Doon School",
                "type": "Boarding School",
                "board": "ICSE",
                "location": {"city": "Dehradun", "state": "Uttarakhand"},
                "fees": {"annual_fee": 800000, "admission_fee": 100000},
                "facilities": ["Hostel"],
                "rating": 4.8,
                "reviews_count": 512
            }
        ],
        "total": 2,
        "page": 1,
        "pages": 1
    })
}

fn directory(server: &MockServer) -> SchoolDirectory<HttpSchoolApi, LocalStorage> {
    let api = HttpSchoolApi::new(server.base_url(), Duration::from_secs(5)).unwrap();
    SchoolDirectory::new(api, FixtureCatalogue::embedded())
}

#[tokio::test]
async fn test_search_is_applied_to_api_results() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/schools");
            then.status(200).json_body(schools_body());
        })
        .await;

    let query = SchoolQuery::from_params([("search", "doon")]);
    let schools = directory(&server).schools(&query).await;

    assert_eq!(schools.len(), 1);
    assert_eq!(schools[0].name, "The Doon School");
}

#[tokio::test]
async fn test_search_scans_following_pages() {
    let server = MockServer::start_async().await;
    let body = schools_body();
    let first = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/schools")
                .query_param("search", "doon")
                .query_param("page", "1");
            then.status(200).json_body(json!({
                "schools": [body["schools"][0].clone()],
                "total": 2,
                "page": 1,
                "pages": 2
            }));
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/schools")
                .query_param("search", "doon")
                .query_param("page", "2");
            then.status(200).json_body(json!({
                "schools": [body["schools"][1].clone()],
                "total": 2,
                "page": 2,
                "pages": 2
            }));
        })
        .await;

    let query = SchoolQuery::from_params([("search", "doon"), ("limit", "1")]);
    let schools = directory(&server).schools(&query).await;

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(schools.len(), 1);
    assert_eq!(schools[0].name, "The Doon School");
}

#[tokio::test]
async fn test_explicit_page_is_not_scanned() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/schools").query_param("page", "1");
            then.status(200).json_body(json!({
                "schools": [],
                "total": 2,
                "page": 1,
                "pages": 2
            }));
        })
        .await;

    let query = SchoolQuery::from_params([("search", "doon"), ("page", "1")]);
    assert!(directory(&server).schools(&query).await.is_empty());
    mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_unreachable_backend_yields_empty_list() {
    let api = HttpSchoolApi::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
    let directory: SchoolDirectory<_, LocalStorage> =
        SchoolDirectory::new(api, FixtureCatalogue::embedded());

    assert!(directory.schools(&SchoolQuery::default()).await.is_empty());
    assert!(directory.health().await.is_none());
}

#[tokio::test]
async fn test_comparison_table_with_fallback_fetch() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/schools/compare");
            then.status(500);
        })
        .await;
    let body = schools_body();
    for school in body["schools"].as_array().unwrap() {
        let id = school["id"].as_str().unwrap().to_string();
        let school = school.clone();
        server
            .mock_async(move |when, then| {
                when.method(GET).path(format!("/api/schools/{}", id));
                then.status(200).json_body(school);
            })
            .await;
    }

    let ids = vec!["1".to_string(), "2".to_string()];
    let table = directory(&server).compare(&ids, &default_field_specs()).await?;

    assert_eq!(table.header(), vec!["Criteria", "Delhi Public School", "The Doon School"]);
    let fee = table.rows.iter().find(|r| r.label == "Annual Fee").unwrap();
    assert_eq!(fee.cells, vec!["₹1,50,000", "₹8,00,000"]);
    let facilities = table.rows.iter().find(|r| r.label == "Facilities").unwrap();
    assert!(facilities.cells[0].ends_with("+1 more"));
    let website = table.rows.iter().find(|r| r.label == "Website").unwrap();
    assert_eq!(website.cells[1], "Not available");

    let output = TempDir::new()?;
    let storage = LocalStorage::new(output.path().to_string_lossy());
    let exporter = Exporter::new(storage.clone());
    exporter.export_table("compare.csv", &table).await?;

    let csv = String::from_utf8(storage.read_file("compare.csv").await?)?;
    assert!(csv.starts_with("Criteria,Delhi Public School,The Doon School"));
    assert!(csv.contains("Annual Fee,\"₹1,50,000\",\"₹8,00,000\""));
    Ok(())
}

#[tokio::test]
async fn test_fixture_overrides_from_directory() -> Result<()> {
    let dir = TempDir::new()?;
    let storage = LocalStorage::new(dir.path().to_string_lossy());
    storage
        .write_file(
            "alumni.json",
            &json!([{
                "id": "9",
                "name": "Meera Iyer",
                "school": "Bishop Cotton School",
                "graduation_year": 2018,
                "current_position": "Data Scientist",
                "company": "Flipkart",
                "availability": "Available for mentoring"
            }])
            .to_string()
            .into_bytes(),
        )
        .await?;

    let server = MockServer::start_async().await;
    let api = HttpSchoolApi::new(server.base_url(), Duration::from_secs(5))?;
    let directory = SchoolDirectory::new(api, FixtureCatalogue::with_overrides(storage));

    let alumni = directory.alumni(&AlumniQuery::default()).await;
    assert_eq!(alumni.len(), 1);
    assert_eq!(alumni[0].company, "Flipkart");
    Ok(())
}
