use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;

/// Context for sharing data between tasks in a pipeline run.
///
/// Values are stored as JSON and deserialized into the type the reader asks
/// for. Each run gets a fresh context; nothing outlives the request.
#[derive(Clone, Debug)]
pub struct Context {
    data: Arc<DashMap<String, Value>>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
        }
    }

    pub async fn set(&self, key: impl Into<String>, value: impl serde::Serialize) {
        let value = serde_json::to_value(value).expect("failed to serialize context value");
        self.data.insert(key.into(), value);
    }

    pub async fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub async fn remove(&self, key: &str) -> Option<Value> {
        self.data.remove(key).map(|(_, v)| v)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_and_get_round_trip() {
        let context = Context::new();
        context.set("language", "English").await;

        let language: String = context.get("language").await.unwrap();
        assert_eq!(language, "English");
        assert!(context.get::<String>("missing").await.is_none());
    }

    #[tokio::test]
    async fn clones_share_the_same_store() {
        let context = Context::new();
        let clone = context.clone();
        clone.set("patient_id", "PAT-001").await;

        let seen: String = context.get("patient_id").await.unwrap();
        assert_eq!(seen, "PAT-001");
    }
}
