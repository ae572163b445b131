//! Collection operations over the document store.
//!
//! Every call loads the database fresh. Mutations go through
//! [`DocumentStore::update`] and perform exactly one load and one save.

use std::sync::Arc;

use rand::Rng;
use serde_json::{Map, Value};

use crate::datetime::now_millis;
use crate::{FileHubError, Result};

use super::document::{Database, DocumentStore, Item};
use super::query::ListQuery;

/// Reserved identifier field.
pub const ID_FIELD: &str = "id";

/// High-level CRUD and query operations on named collections.
#[derive(Debug, Clone)]
pub struct CollectionService {
    store: Arc<DocumentStore>,
}

impl CollectionService {
    /// Create a new CollectionService.
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// The underlying document store.
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Load the whole database.
    pub fn dump(&self) -> Result<Database> {
        self.store.load()
    }

    /// List a collection with query transformations applied.
    ///
    /// Undeclared collections list as empty.
    pub fn list(&self, resource: &str, query: &ListQuery) -> Result<Vec<Value>> {
        let db = self.store.load()?;

        let items = match db.collection(resource) {
            Some(items) => items.clone(),
            None => return Ok(Vec::new()),
        };

        if query.is_empty() {
            return Ok(items);
        }
        Ok(query.apply(items))
    }

    /// Get one item by id.
    pub fn get(&self, resource: &str, id: &str) -> Result<Value> {
        let db = self.store.load()?;
        let items = require_collection(&db, resource)?;

        find_position(items, id)
            .map(|index| items[index].clone())
            .ok_or_else(|| item_not_found(resource, id))
    }

    /// Create a new item with a generated id.
    ///
    /// The generated id replaces any `id` supplied in `fields`.
    pub async fn create(&self, resource: &str, fields: Item) -> Result<Value> {
        let item = self
            .store
            .update(|db| {
                let items = db
                    .collection_mut(resource)
                    .ok_or_else(|| FileHubError::ResourceNotFound(resource.to_string()))?;

                let id = generate_id(items);
                let item = Value::Object(with_id(&id, fields));
                items.push(item.clone());
                Ok(item)
            })
            .await?;

        tracing::info!(resource, id = item[ID_FIELD].as_str(), "Created item");
        Ok(item)
    }

    /// Replace all fields of an existing item. The id comes from the path.
    pub async fn replace(&self, resource: &str, id: &str, fields: Item) -> Result<Value> {
        let item = self
            .store
            .update(|db| {
                let items = db
                    .collection_mut(resource)
                    .ok_or_else(|| FileHubError::ResourceNotFound(resource.to_string()))?;
                let index = find_position(items, id).ok_or_else(|| item_not_found(resource, id))?;

                let item = Value::Object(with_id(id, fields));
                items[index] = item.clone();
                Ok(item)
            })
            .await?;

        tracing::info!(resource, id, "Replaced item");
        Ok(item)
    }

    /// Remove an item.
    pub async fn delete(&self, resource: &str, id: &str) -> Result<()> {
        self.store
            .update(|db| {
                let items = db
                    .collection_mut(resource)
                    .ok_or_else(|| FileHubError::ResourceNotFound(resource.to_string()))?;
                let index = find_position(items, id).ok_or_else(|| item_not_found(resource, id))?;

                items.remove(index);
                Ok(())
            })
            .await?;

        tracing::info!(resource, id, "Deleted item");
        Ok(())
    }
}

fn require_collection<'a>(db: &'a Database, resource: &str) -> Result<&'a Vec<Value>> {
    db.collection(resource)
        .ok_or_else(|| FileHubError::ResourceNotFound(resource.to_string()))
}

fn item_not_found(resource: &str, id: &str) -> FileHubError {
    FileHubError::ItemNotFound {
        resource: resource.to_string(),
        id: id.to_string(),
    }
}

/// Index of the item whose `id` is exactly the given string.
pub fn find_position(items: &[Value], id: &str) -> Option<usize> {
    items
        .iter()
        .position(|item| item.get(ID_FIELD).and_then(Value::as_str) == Some(id))
}

/// Generate an id of the form `<unix-millis>-<0..999>` unused in `items`.
pub fn generate_id(items: &[Value]) -> String {
    let mut rng = rand::rng();
    loop {
        let id = format!("{}-{}", now_millis(), rng.random_range(0..1000));
        if find_position(items, &id).is_none() {
            return id;
        }
    }
}

/// Build an item with `id` as its first field followed by `fields`.
fn with_id(id: &str, fields: Item) -> Item {
    let mut item = Map::with_capacity(fields.len() + 1);
    item.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    for (key, value) in fields {
        if key != ID_FIELD {
            item.insert(key, value);
        }
    }
    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn setup_service(content: &str) -> (TempDir, CollectionService) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.json");
        fs::write(&path, content).unwrap();
        let service = CollectionService::new(Arc::new(DocumentStore::new(path)));
        (temp_dir, service)
    }

    fn fields(value: Value) -> Item {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn no_query() -> ListQuery {
        ListQuery::default()
    }

    #[test]
    fn test_list_preserves_order() {
        let (_dir, service) =
            setup_service(r#"{"users": [{"id": "2"}, {"id": "1"}, {"id": "3"}]}"#);

        let items = service.list("users", &no_query()).unwrap();
        let ids: Vec<_> = items.iter().map(|i| i["id"].as_str().unwrap()).collect();

        assert_eq!(ids, vec!["2", "1", "3"]);
    }

    #[test]
    fn test_list_undeclared_is_empty() {
        let (_dir, service) = setup_service(r#"{"users": []}"#);

        assert!(service.list("ghosts", &no_query()).unwrap().is_empty());
    }

    #[test]
    fn test_list_applies_query() {
        let (_dir, service) = setup_service(
            r#"{"users": [{"id": "1", "nome": "Maria"}, {"id": "2", "nome": "Pedro"}]}"#,
        );
        let params: HashMap<String, String> =
            [("q".to_string(), "Mar".to_string())].into_iter().collect();
        let query = ListQuery::from_params(&params, &["nome".to_string()]);

        let items = service.list("users", &query).unwrap();

        assert_eq!(items, vec![json!({"id": "1", "nome": "Maria"})]);
    }

    #[test]
    fn test_list_storage_error() {
        let (_dir, service) = setup_service("garbage");

        assert!(matches!(
            service.list("users", &no_query()),
            Err(FileHubError::Storage(_))
        ));
    }

    #[test]
    fn test_get() {
        let (_dir, service) = setup_service(r#"{"users": [{"id": "1", "nome": "Ana"}]}"#);

        assert_eq!(service.get("users", "1").unwrap()["nome"], "Ana");
        assert!(matches!(
            service.get("users", "2"),
            Err(FileHubError::ItemNotFound { .. })
        ));
        assert!(matches!(
            service.get("posts", "1"),
            Err(FileHubError::ResourceNotFound(_))
        ));
    }

    #[test]
    fn test_get_id_is_exact_string_match() {
        let (_dir, service) = setup_service(r#"{"users": [{"id": 1}, {"id": "10"}]}"#);

        assert!(service.get("users", "1").is_err());
        assert!(service.get("users", "10").is_ok());
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let (_dir, service) = setup_service(r#"{"users": []}"#);

        let created = service
            .create("users", fields(json!({"nome": "Ana", "idade": 30})))
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap().to_string();

        let fetched = service.get("users", &id).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched["nome"], "Ana");
        assert_eq!(fetched["idade"], 30);
    }

    #[tokio::test]
    async fn test_create_overrides_body_id() {
        let (_dir, service) = setup_service(r#"{"users": [{"id": "taken"}]}"#);

        let created = service
            .create("users", fields(json!({"id": "taken", "nome": "Ana"})))
            .await
            .unwrap();

        assert_ne!(created["id"], "taken");
        let keys: Vec<_> = created.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["id", "nome"]);
        assert_eq!(service.list("users", &no_query()).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_unknown_resource() {
        let (dir, service) = setup_service(r#"{"users": []}"#);
        let before = fs::read_to_string(dir.path().join("data.json")).unwrap();

        let result = service.create("posts", Item::new()).await;

        assert!(matches!(result, Err(FileHubError::ResourceNotFound(_))));
        let after = fs::read_to_string(dir.path().join("data.json")).unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_create_generates_unique_ids() {
        let (_dir, service) = setup_service(r#"{"users": []}"#);

        for _ in 0..20 {
            service.create("users", Item::new()).await.unwrap();
        }

        let items = service.list("users", &no_query()).unwrap();
        let mut ids: Vec<_> = items.iter().map(|i| i["id"].as_str().unwrap()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[tokio::test]
    async fn test_replace() {
        let (_dir, service) =
            setup_service(r#"{"users": [{"id": "1", "nome": "Ana", "idade": 30}]}"#);

        let updated = service
            .replace("users", "1", fields(json!({"id": "999", "nome": "Bia"})))
            .await
            .unwrap();

        assert_eq!(updated, json!({"id": "1", "nome": "Bia"}));
        assert_eq!(service.get("users", "1").unwrap(), updated);
    }

    #[tokio::test]
    async fn test_replace_missing_item_leaves_collection() {
        let (_dir, service) = setup_service(r#"{"users": [{"id": "1", "nome": "Ana"}]}"#);

        let result = service
            .replace("users", "2", fields(json!({"nome": "Bia"})))
            .await;

        assert!(matches!(result, Err(FileHubError::ItemNotFound { .. })));
        assert_eq!(
            service.list("users", &no_query()).unwrap(),
            vec![json!({"id": "1", "nome": "Ana"})]
        );
    }

    #[tokio::test]
    async fn test_replace_unknown_resource() {
        let (_dir, service) = setup_service(r#"{"users": []}"#);

        let result = service.replace("posts", "1", Item::new()).await;
        assert!(matches!(result, Err(FileHubError::ResourceNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let (_dir, service) = setup_service(r#"{"users": [{"id": "1"}, {"id": "2"}]}"#);

        service.delete("users", "1").await.unwrap();
        assert_eq!(
            service.list("users", &no_query()).unwrap(),
            vec![json!({"id": "2"})]
        );

        let second = service.delete("users", "1").await;
        assert!(matches!(second, Err(FileHubError::ItemNotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_unknown_resource() {
        let (_dir, service) = setup_service(r#"{"users": []}"#);

        let result = service.delete("posts", "1").await;
        assert!(matches!(result, Err(FileHubError::ResourceNotFound(_))));
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_not_lost() {
        let (_dir, service) = setup_service(r#"{"users": []}"#);

        let mut handles = Vec::new();
        for n in 0..10 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .create("users", fields(json!({ "n": n })))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(service.list("users", &no_query()).unwrap().len(), 10);
    }

    #[test]
    fn test_with_id_puts_id_first() {
        let item = with_id("x", fields(json!({"a": 1, "id": "y", "b": 2})));
        let keys: Vec<_> = item.keys().map(String::as_str).collect();

        assert_eq!(keys, vec!["id", "a", "b"]);
        assert_eq!(item["id"], "x");
    }

    #[test]
    fn test_generate_id_format() {
        let id = generate_id(&[]);
        let (millis, suffix) = id.split_once('-').unwrap();

        assert!(millis.parse::<i64>().is_ok());
        assert!(suffix.parse::<u32>().unwrap() < 1000);
    }
}
