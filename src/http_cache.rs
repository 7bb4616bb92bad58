use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use reqwest::blocking::Client;
use reqwest::header::{HeaderName, ACCEPT, ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

const CACHE_VERSION: u32 = 1;
const CACHE_DIR: &str = "standings_chart";
const CACHE_FILE: &str = "http_cache.json";

static CACHE: Mutex<Option<HttpCache>> = Mutex::new(None);
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct HttpCache {
    version: u32,
    entries: HashMap<String, CachedBody>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedBody {
    body: String,
    etag: Option<String>,
    last_modified: Option<String>,
    fetched_at: i64,
}

impl HttpCache {
    fn load() -> Self {
        let Some(raw) = cache_path().and_then(|p| fs::read_to_string(p).ok()) else {
            return Self::default();
        };
        match serde_json::from_str::<HttpCache>(&raw) {
            Ok(cache) if cache.version == CACHE_VERSION => cache,
            _ => Self::default(),
        }
    }

    fn save(&self) -> Result<()> {
        let Some(path) = cache_path() else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).ok();
        }
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string(self).context("serialize http cache")?;
        fs::write(&tmp, json).context("write http cache")?;
        fs::rename(&tmp, &path).context("swap http cache")?;
        Ok(())
    }
}

fn with_cache<T>(f: impl FnOnce(&mut HttpCache) -> T) -> T {
    let mut guard = CACHE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let cache = guard.get_or_insert_with(HttpCache::load);
    f(cache)
}
pub fn fetch_json_cached(
    client: &Client,
    url: &str,
    extra_headers: &[(&str, &str)],
) -> Result<String> {
    let cached = with_cache(|cache| cache.entries.get(url).cloned());

    let mut req = client.get(url).header(ACCEPT, "application/json");
    for (name, value) in extra_headers {
        req = req.header(*name, *value);
    }
    if let Some(entry) = cached.as_ref() {
        if let Some(etag) = entry.etag.as_deref() {
            req = req.header(IF_NONE_MATCH, etag);
        }
        if let Some(last_modified) = entry.last_modified.as_deref() {
            req = req.header(IF_MODIFIED_SINCE, last_modified);
        }
    }

    let resp = req.send().context("request failed")?;
    let status = resp.status();
    if status == StatusCode::NOT_MODIFIED {
        let Some(mut entry) = cached else {
            return Err(anyhow!("received 304 without cache body"));
        };
        entry.fetched_at = Utc::now().timestamp();
        let body = entry.body.clone();
        store(url, entry);
        return Ok(body);
    }

    let header = |name: HeaderName| {
        resp.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let etag = header(ETAG);
    let last_modified = header(LAST_MODIFIED);

    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {status} for {url}"));
    }

    store(
        url,
        CachedBody {
            body: body.clone(),
            etag,
            last_modified,
            fetched_at: Utc::now().timestamp(),
        },
    );
    Ok(body)
}

fn store(url: &str, entry: CachedBody) {
    with_cache(|cache| {
        cache.version = CACHE_VERSION;
        cache.entries.insert(url.to_string(), entry);
        let _ = cache.save();
    });
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CACHE_DIR));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

fn cache_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(CACHE_FILE))
}
