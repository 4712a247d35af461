use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use super::{ActionArgs, ControllerReply, Controllers};

/// One catalog entry: a show name plus the weekday it updates on.
#[derive(Debug, Clone)]
pub struct Show {
    pub name: String,
    pub update_day: String,
}

impl Show {
    fn new(name: &str, update_day: &str) -> Self {
        Self {
            name: name.to_string(),
            update_day: update_day.to_string(),
        }
    }
}

/// In-memory default implementation of the controller seam.
///
/// Holds a seeded catalog, the followed-show table, a small writable settings
/// map, and the prepared-download queue. Enough to run the server and drive
/// the dispatch layer end to end; a real deployment swaps in an
/// implementation backed by the download manager proper.
pub struct LibraryControllers {
    catalog: Vec<Show>,
    followed: RwLock<HashMap<String, u64>>,
    settings: RwLock<BTreeMap<String, String>>,
    queue: RwLock<Vec<Value>>,
}

impl LibraryControllers {
    pub fn new() -> Self {
        Self::with_catalog(default_catalog())
    }

    pub fn with_catalog(catalog: Vec<Show>) -> Self {
        let mut settings = BTreeMap::new();
        settings.insert("save_path".to_string(), "/var/lib/bgmi/downloads".to_string());
        settings.insert("max_page".to_string(), "3".to_string());
        settings.insert("download_delegate".to_string(), "aria2".to_string());

        Self {
            catalog,
            followed: RwLock::new(HashMap::new()),
            settings: RwLock::new(settings),
            queue: RwLock::new(Vec::new()),
        }
    }

    fn find_show(&self, name: &str) -> Option<&Show> {
        self.catalog.iter().find(|s| s.name == name)
    }
}

impl Default for LibraryControllers {
    fn default() -> Self {
        Self::new()
    }
}

fn default_catalog() -> Vec<Show> {
    vec![
        Show::new("进撃の巨人", "Sunday"),
        Show::new("秒速5センチメートル", "Monday"),
        Show::new("ヴィンランド・サガ", "Monday"),
        Show::new("Dr.STONE", "Friday"),
        Show::new("かぐや様は告らせたい", "Saturday"),
        Show::new("鬼滅の刃", "Saturday"),
    ]
}

fn arg_str(args: &ActionArgs, key: &str) -> Option<String> {
    args.get(key).and_then(Value::as_str).map(str::to_string)
}

fn arg_u64(args: &ActionArgs, key: &str) -> Option<u64> {
    args.get(key).and_then(Value::as_u64)
}

fn arg_bool(args: &ActionArgs, key: &str) -> bool {
    args.get(key).and_then(Value::as_bool).unwrap_or(false)
}

#[async_trait]
impl Controllers for LibraryControllers {
    async fn add(&self, args: ActionArgs) -> ControllerReply {
        let Some(name) = arg_str(&args, "name") else {
            return ControllerReply::error("you must specify a show name");
        };
        if self.find_show(&name).is_none() {
            return ControllerReply::error(format!("{} not found in catalog", name));
        }

        let episode = arg_u64(&args, "episode").unwrap_or(0);
        let mut followed = self.followed.write().await;
        if followed.contains_key(&name) {
            return ControllerReply::warning(format!("{} already followed", name));
        }
        followed.insert(name.clone(), episode);
        tracing::info!(show = %name, episode, "followed show");
        ControllerReply::success_message(format!("{} has been followed", name))
    }

    async fn delete(&self, args: ActionArgs) -> ControllerReply {
        if arg_bool(&args, "clear_all") {
            // Destructive path requires the explicit batch flag
            if !arg_bool(&args, "batch") {
                return ControllerReply::warning("clear_all requires batch confirmation");
            }
            let mut followed = self.followed.write().await;
            let count = followed.len();
            followed.clear();
            return ControllerReply::success_message(format!("{} followed shows cleared", count));
        }

        let Some(name) = arg_str(&args, "name") else {
            return ControllerReply::warning("nothing to delete");
        };
        let mut followed = self.followed.write().await;
        if followed.remove(&name).is_some() {
            tracing::info!(show = %name, "unfollowed show");
            ControllerReply::success_message(format!("{} has been unfollowed", name))
        } else {
            ControllerReply::warning(format!("{} is not followed", name))
        }
    }

    async fn search(&self, args: ActionArgs) -> ControllerReply {
        let Some(keyword) = arg_str(&args, "keyword") else {
            return ControllerReply::error("you must specify a search keyword");
        };
        let needle = keyword.to_lowercase();
        let result: Vec<Value> = self
            .catalog
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .map(|s| json!({ "name": s.name, "update_day": s.update_day }))
            .collect();

        ControllerReply::success(json!({ "keyword": keyword, "result": result }))
    }

    async fn cal(&self) -> ControllerReply {
        let followed = self.followed.read().await;
        let mut week: BTreeMap<String, Vec<Value>> = BTreeMap::new();
        for show in &self.catalog {
            let entry = json!({
                "name": show.name,
                "followed": followed.contains_key(&show.name),
                "episode": followed.get(&show.name).copied().unwrap_or(0),
            });
            week.entry(show.update_day.clone()).or_default().push(entry);
        }

        ControllerReply::success(json!(week))
    }

    async fn config(&self, name: Option<String>, value: Option<String>) -> ControllerReply {
        let mut settings = self.settings.write().await;
        match (name, value) {
            // Read path: the whole map
            (None, _) => ControllerReply::success(json!(&*settings)),
            (Some(name), None) => match settings.get(&name) {
                Some(value) => ControllerReply::success(json!({ name: value })),
                None => ControllerReply::error(format!("unknown config key '{}'", name)),
            },
            (Some(name), Some(value)) => {
                if !settings.contains_key(&name) {
                    return ControllerReply::error(format!("unknown config key '{}'", name));
                }
                settings.insert(name.clone(), value.clone());
                tracing::info!(key = %name, "config updated");
                ControllerReply::success_message(format!("config '{}' set to '{}'", name, value))
            }
        }
    }

    async fn download_prepare(&self, args: ActionArgs) -> ControllerReply {
        let Some(name) = arg_str(&args, "name") else {
            return ControllerReply::error("you must specify a show name");
        };
        let followed = self.followed.read().await;
        let Some(&last_episode) = followed.get(&name) else {
            return ControllerReply::error(format!("{} is not followed", name));
        };
        drop(followed);

        let episode = arg_u64(&args, "episode").unwrap_or(last_episode + 1);
        let item = json!({ "name": name, "episode": episode });
        self.queue.write().await.push(item.clone());
        tracing::info!(show = %name, episode, "download prepared");

        ControllerReply::success(json!({ "download": [item] }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::ReplyStatus;

    fn args(pairs: &[(&str, Value)]) -> ActionArgs {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_add_then_delete() {
        let c = LibraryControllers::new();

        let reply = c.add(args(&[("name", json!("鬼滅の刃"))])).await;
        assert_eq!(reply.status, ReplyStatus::Success);

        // Second add is a warning, not an error
        let reply = c.add(args(&[("name", json!("鬼滅の刃"))])).await;
        assert_eq!(reply.status, ReplyStatus::Warning);

        let reply = c.delete(args(&[("name", json!("鬼滅の刃"))])).await;
        assert_eq!(reply.status, ReplyStatus::Success);

        let reply = c.delete(args(&[("name", json!("鬼滅の刃"))])).await;
        assert_eq!(reply.status, ReplyStatus::Warning);
    }

    #[tokio::test]
    async fn test_add_unknown_show_is_error() {
        let c = LibraryControllers::new();
        let reply = c.add(args(&[("name", json!("no such show"))])).await;
        assert_eq!(reply.status, ReplyStatus::Error);
    }

    #[tokio::test]
    async fn test_clear_all_requires_batch() {
        let c = LibraryControllers::new();
        c.add(args(&[("name", json!("Dr.STONE"))])).await;

        let reply = c.delete(args(&[("clear_all", json!(true))])).await;
        assert_eq!(reply.status, ReplyStatus::Warning);

        let reply = c
            .delete(args(&[("clear_all", json!(true)), ("batch", json!(true))]))
            .await;
        assert_eq!(reply.status, ReplyStatus::Success);
        assert_eq!(c.followed.read().await.len(), 0);
    }

    #[tokio::test]
    async fn test_search_filters_catalog() {
        let c = LibraryControllers::new();
        let reply = c.search(args(&[("keyword", json!("巨人"))])).await;
        assert_eq!(reply.status, ReplyStatus::Success);
        let data = reply.data.unwrap();
        assert_eq!(data["result"].as_array().unwrap().len(), 1);
        assert_eq!(data["result"][0]["name"], "进撃の巨人");
    }

    #[tokio::test]
    async fn test_cal_groups_by_weekday() {
        let c = LibraryControllers::new();
        let reply = c.cal().await;
        let data = reply.data.unwrap();
        assert!(data.get("Monday").is_some());
        assert_eq!(data["Monday"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_config_read_and_write() {
        let c = LibraryControllers::new();

        let reply = c.config(None, None).await;
        assert_eq!(reply.status, ReplyStatus::Success);
        assert!(reply.data.unwrap().get("save_path").is_some());

        let reply = c
            .config(Some("max_page".to_string()), Some("5".to_string()))
            .await;
        assert_eq!(reply.status, ReplyStatus::Success);

        let reply = c.config(Some("max_page".to_string()), None).await;
        assert_eq!(reply.data.unwrap()["max_page"], "5");

        let reply = c.config(Some("bogus".to_string()), None).await;
        assert_eq!(reply.status, ReplyStatus::Error);
    }

    #[tokio::test]
    async fn test_download_requires_followed_show() {
        let c = LibraryControllers::new();

        let reply = c.download_prepare(args(&[("name", json!("Dr.STONE"))])).await;
        assert_eq!(reply.status, ReplyStatus::Error);

        c.add(args(&[("name", json!("Dr.STONE")), ("episode", json!(3))]))
            .await;
        let reply = c.download_prepare(args(&[("name", json!("Dr.STONE"))])).await;
        assert_eq!(reply.status, ReplyStatus::Success);
        assert_eq!(reply.data.unwrap()["download"][0]["episode"], 4);
    }
}
