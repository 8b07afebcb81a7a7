//! Integration tests for the MongoDB driver.
//!
//! These tests use testcontainers to spin up a real MongoDB instance and are
//! ignored by default. Run with `cargo test -p hospital-db-mongo -- --ignored`.

use hospital_db_mongo::{MongoConfig, MongoDriver};
use hospital_storage::{
    Connection, DocumentFilter, DocumentService, DocumentStore, DriverError, Namespace,
    RequestContext, StoreConfig,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::mongo::Mongo;
use tokio::sync::OnceCell;

// Shared MongoDB container for all tests
static SHARED_MONGO: OnceCell<(ContainerAsync<Mongo>, u16)> = OnceCell::const_new();

/// Get or create the shared MongoDB container
async fn mongo_port() -> u16 {
    let (_, port) = SHARED_MONGO
        .get_or_init(|| async {
            let container = Mongo::default()
                .start()
                .await
                .expect("start mongo container");
            let port = container
                .get_host_port_ipv4(27017)
                .await
                .expect("get port");
            (container, port)
        })
        .await;
    *port
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Bed {
    #[serde(default)]
    id: String,
    department_id: String,
    bed_type: String,
}

async fn beds(collection: &str) -> DocumentService<Bed, MongoDriver> {
    let config = StoreConfig::new()
        .with_host("127.0.0.1")
        .with_port(mongo_port().await)
        .with_database("hospital-test")
        .with_collection(collection)
        .with_timeout_secs(10);
    DocumentService::new(MongoDriver::new(MongoConfig::default()), &config)
}

fn bed(id: &str, department: &str) -> Bed {
    Bed {
        id: id.into(),
        department_id: department.into(),
        bed_type: "ICU".into(),
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn crud_lifecycle() {
    let store = beds("crud_lifecycle").await;
    let ctx = RequestContext::background();

    assert!(store.find_all(&ctx).await.unwrap().is_empty());

    store.create(&ctx, "b1", &bed("b1", "D1")).await.unwrap();
    let other = bed("b1", "D2");
    let err = store.create(&ctx, "b1", &other).await.unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(store.find(&ctx, "b1").await.unwrap(), bed("b1", "D1"));

    store.update(&ctx, "b1", &bed("b1", "D3")).await.unwrap();
    assert_eq!(store.find(&ctx, "b1").await.unwrap().department_id, "D3");
    let missing = bed("nope", "D1");
    let err = store.update(&ctx, "nope", &missing).await.unwrap_err();
    assert!(err.is_not_found());

    store.delete(&ctx, "b1").await.unwrap();
    assert!(store.find(&ctx, "b1").await.unwrap_err().is_not_found());
    assert!(store.find_all(&ctx).await.unwrap().is_empty());

    store.disconnect(&ctx).await.unwrap();
    store.disconnect(&ctx).await.unwrap();
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn filter_by_department() {
    let store = beds("filter_by_department").await;
    let ctx = RequestContext::background();

    store.create(&ctx, "b1", &bed("b1", "D1")).await.unwrap();
    store.create(&ctx, "b2", &bed("b2", "D2")).await.unwrap();
    store.create(&ctx, "b3", &bed("b3", "D1")).await.unwrap();

    let filter = DocumentFilter::all().where_eq("department_id", "D1");
    let mut ids: Vec<_> = store
        .find_by_filter(&ctx, &filter)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect();
    ids.sort();
    assert_eq!(ids, ["b1", "b3"]);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn unique_index_rejects_duplicate_insert() {
    let store = beds("unique_index").await;
    let ctx = RequestContext::background();
    let conn = store.connect(&ctx).await.unwrap();
    let ns = Namespace::new("hospital-test", "unique_index");

    conn.insert_one(&ns, json!({"id": "dup", "bed_type": "ICU"}))
        .await
        .unwrap();
    let err = conn
        .insert_one(&ns, json!({"id": "dup", "bed_type": "ICU"}))
        .await
        .unwrap_err();
    assert!(matches!(err, DriverError::DuplicateKey(_)));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn unreachable_server_is_transport() {
    let config = StoreConfig::new()
        .with_host("127.0.0.1")
        .with_port(1)
        .with_collection("beds")
        .with_timeout_secs(1);
    let store: DocumentService<Bed, _> = DocumentService::new(MongoDriver::default(), &config);

    let err = store
        .find_all(&RequestContext::background())
        .await
        .unwrap_err();
    assert!(err.is_transport());
}
