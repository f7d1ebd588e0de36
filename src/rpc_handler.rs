//! RPC method handler for the SEOForge JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be tested independently.
//! `handle_method` dispatches calls to the managers and services held by
//! [`App`]. The app lock is taken only around synchronous work; it is always
//! released before a remote call is awaited.

use std::path::PathBuf;
use std::sync::Mutex;

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::content_manager::{ContentManager, ContentManagerTrait};
use crate::managers::local_store::{LocalStore, SERPAPI_API_KEY};
use crate::managers::recent_manager::{format_entry, RecentManager, RecentManagerTrait};
use crate::services::content_length::{count_words_from_html, strip_tags};
use crate::services::export::{export_filename, keywords_to_csv, render_html_document, write_html_document, write_keywords_csv};
use crate::services::fuzzy_search::simple_fuzzy_search;
use crate::services::generation_client::regenerate_section;
use crate::services::seo_markup::{render_json_ld, render_meta_tags};
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::content::Tone;
use crate::types::keyword::KeywordMetrics;
use crate::types::recent::RecentItem;
use crate::types::search::{SearchItem, SearchWeights};

fn str_param<'v>(params: &'v Value, name: &str) -> Option<&'v str> {
    params.get(name).and_then(|v| v.as_str())
}

fn required<'v>(params: &'v Value, name: &str) -> Result<&'v str, String> {
    str_param(params, name).ok_or_else(|| format!("missing {}", name))
}

fn string_list(params: &Value, name: &str) -> Option<Vec<String>> {
    params.get(name).and_then(|v| v.as_array()).map(|items| {
        items
            .iter()
            .filter_map(|i| i.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

fn lock(app: &Mutex<App>) -> Result<std::sync::MutexGuard<'_, App>, String> {
    app.lock().map_err(|e| e.to_string())
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        // ─── Content ───
        "content.generate" => {
            let title = required(params, "title")?;
            let (request, generator) = {
                let a = lock(app)?;
                let request = a.generation_request(
                    title,
                    string_list(params, "keywords").unwrap_or_default(),
                    str_param(params, "language").map(String::from),
                    str_param(params, "tone").map(Tone::parse),
                    params.get("wordCount").and_then(|v| v.as_u64()).map(|n| n.min(u32::MAX as u64) as u32),
                    string_list(params, "outline"),
                );
                (request, a.generator())
            };
            let provider = generator.get().await.map_err(|e| e.to_string())?.clone();
            let result = provider.generate(&request).await.map_err(|e| e.to_string())?;

            let a = lock(app)?;
            let mut mgr = ContentManager::new(a.db.connection());
            let doc = mgr
                .create(&request, &result.content, Some(result.provider_used.as_str()), Some(result.request_id.as_str()))
                .map_err(|e| e.to_string())?;
            serde_json::to_value(doc).map_err(|e| e.to_string())
        }
        "content.get" => {
            let id = required(params, "id")?;
            let a = lock(app)?;
            let doc = ContentManager::new(a.db.connection()).get(id).map_err(|e| e.to_string())?;
            let words = count_words_from_html(&doc.html);
            let mut value = serde_json::to_value(doc).map_err(|e| e.to_string())?;
            value["word_count"] = json!(words);
            Ok(value)
        }
        "content.list" => {
            let a = lock(app)?;
            let docs = ContentManager::new(a.db.connection()).list().map_err(|e| e.to_string())?;
            let arr: Vec<Value> = docs
                .iter()
                .map(|d| json!({"id": d.id, "title": d.title, "seo_score": d.seo_score, "updated_at": d.updated_at}))
                .collect();
            Ok(json!(arr))
        }
        "content.regenerate_section" => {
            let id = required(params, "id")?;
            let heading = required(params, "heading")?;
            let (doc, generator) = {
                let a = lock(app)?;
                let doc = ContentManager::new(a.db.connection()).get(id).map_err(|e| e.to_string())?;
                (doc, a.generator())
            };
            let provider = generator.get().await.map_err(|e| e.to_string())?.clone();
            let html = regenerate_section(provider.as_ref(), &doc, heading)
                .await
                .map_err(|e| e.to_string())?;

            let a = lock(app)?;
            let mut mgr = ContentManager::new(a.db.connection());
            let updated = mgr
                .update_html(id, &html, &format!("regenerate section: {}", heading))
                .map_err(|e| e.to_string())?;
            serde_json::to_value(updated).map_err(|e| e.to_string())
        }
        "content.update" => {
            let id = required(params, "id")?;
            let html = required(params, "html")?;
            let reason = str_param(params, "reason").unwrap_or("edit");
            let a = lock(app)?;
            let doc = ContentManager::new(a.db.connection())
                .update_html(id, html, reason)
                .map_err(|e| e.to_string())?;
            serde_json::to_value(doc).map_err(|e| e.to_string())
        }
        "content.undo" => {
            let id = required(params, "id")?;
            let a = lock(app)?;
            let doc = ContentManager::new(a.db.connection()).undo(id).map_err(|e| e.to_string())?;
            serde_json::to_value(doc).map_err(|e| e.to_string())
        }
        "content.revisions" => {
            let id = required(params, "id")?;
            let a = lock(app)?;
            let revs = ContentManager::new(a.db.connection()).revisions(id).map_err(|e| e.to_string())?;
            let arr: Vec<Value> = revs
                .iter()
                .map(|r| json!({"id": r.id, "reason": r.reason, "created_at": r.created_at}))
                .collect();
            Ok(json!(arr))
        }
        "content.diff" => {
            let id = required(params, "id")?;
            let revision = str_param(params, "revision_id");
            let a = lock(app)?;
            let diff = ContentManager::new(a.db.connection())
                .diff(id, revision)
                .map_err(|e| e.to_string())?;
            serde_json::to_value(diff).map_err(|e| e.to_string())
        }
        "content.export_html" => {
            let id = required(params, "id")?;
            let a = lock(app)?;
            let doc = ContentManager::new(a.db.connection()).get(id).map_err(|e| e.to_string())?;
            match str_param(params, "dir") {
                Some(dir) => {
                    let path = write_html_document(&PathBuf::from(dir), &doc).map_err(|e| e.to_string())?;
                    Ok(json!({"path": path.to_string_lossy()}))
                }
                None => Ok(json!({
                    "html": render_html_document(&doc),
                    "meta": render_meta_tags(&doc),
                    "json_ld": render_json_ld(&doc),
                })),
            }
        }
        "content.delete" => {
            let id = required(params, "id")?;
            let a = lock(app)?;
            ContentManager::new(a.db.connection()).delete(id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Keywords ───
        "keywords.research" => {
            let seed = required(params, "seed")?;
            let (provider, options) = {
                let a = lock(app)?;
                let options = a.keyword_options(
                    str_param(params, "language").map(String::from),
                    str_param(params, "location").map(String::from),
                );
                (a.keyword_provider(), options)
            };
            let research = provider.research(seed, &options).await.map_err(|e| e.to_string())?;
            let mut value = serde_json::to_value(research).map_err(|e| e.to_string())?;
            value["provider"] = json!(provider.name());
            Ok(value)
        }
        "keywords.export_csv" => {
            let seed = required(params, "seed")?;
            let keywords: Vec<KeywordMetrics> = match params.get("keywords") {
                Some(v) => serde_json::from_value(v.clone()).map_err(|e| format!("invalid keywords: {}", e))?,
                None => {
                    let (provider, options) = {
                        let a = lock(app)?;
                        (a.keyword_provider(), a.keyword_options(None, None))
                    };
                    provider.research(seed, &options).await.map_err(|e| e.to_string())?.keywords
                }
            };
            match str_param(params, "dir") {
                Some(dir) => {
                    let path = write_keywords_csv(&PathBuf::from(dir), seed, &keywords).map_err(|e| e.to_string())?;
                    Ok(json!({"path": path.to_string_lossy(), "rows": keywords.len()}))
                }
                None => {
                    let csv = keywords_to_csv(&keywords).map_err(|e| e.to_string())?;
                    Ok(json!({"filename": export_filename(seed), "csv": csv}))
                }
            }
        }
        "keywords.set_api_key" => {
            let key = str_param(params, "key").map(str::trim).unwrap_or("");
            let a = lock(app)?;
            let store = LocalStore::new(a.db.connection());
            if key.is_empty() {
                store.remove(SERPAPI_API_KEY).map_err(|e| e.to_string())?;
            } else {
                store.set(SERPAPI_API_KEY, key).map_err(|e| e.to_string())?;
            }
            Ok(json!({"ok": true}))
        }

        // ─── Recently viewed ───
        "recent.list" => {
            let a = lock(app)?;
            let settings = &a.settings_engine.get_settings().recent;
            let limit = params
                .get("limit")
                .and_then(|v| v.as_u64())
                .map(|n| n as usize)
                .unwrap_or(settings.display_limit);
            let mgr = RecentManager::new(a.db.connection());
            let items = mgr.list(limit).map_err(|e| e.to_string())?;
            let revision = mgr.revision().map_err(|e| e.to_string())?;
            let arr: Vec<Value> = items
                .iter()
                .map(|i| {
                    let mut v = serde_json::to_value(i).unwrap_or(Value::Null);
                    v["display"] = json!(format_entry(i, &settings.date_locale));
                    v
                })
                .collect();
            Ok(json!({"items": arr, "revision": revision}))
        }
        "recent.record" => {
            let item: RecentItem = serde_json::from_value(params.clone()).map_err(|e| format!("invalid item: {}", e))?;
            let a = lock(app)?;
            RecentManager::new(a.db.connection()).record(item).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "recent.clear" => {
            let a = lock(app)?;
            RecentManager::new(a.db.connection()).clear().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Search ───
        "search.fuzzy" => {
            let query = required(params, "query")?;
            let weights: SearchWeights = match params.get("weights") {
                Some(w) => serde_json::from_value(w.clone()).map_err(|e| format!("invalid weights: {}", e))?,
                None => SearchWeights::default(),
            };
            let items: Vec<SearchItem> = match params.get("items") {
                Some(v) => serde_json::from_value(v.clone()).map_err(|e| format!("invalid items: {}", e))?,
                None => {
                    let a = lock(app)?;
                    ContentManager::new(a.db.connection())
                        .list()
                        .map_err(|e| e.to_string())?
                        .into_iter()
                        .map(|d| SearchItem {
                            content: strip_tags(&d.html),
                            id: d.id,
                            title: d.title,
                            keywords: d.keywords,
                        })
                        .collect()
                }
            };
            Ok(json!(simple_fuzzy_search(query, &items, &weights)))
        }

        // ─── Settings ───
        "settings.get" => {
            let a = lock(app)?;
            serde_json::to_value(a.settings_engine.get_settings()).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = required(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = lock(app)?;
            a.settings_engine.set_value(key, value).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "settings.reset" => {
            let mut a = lock(app)?;
            a.settings_engine.reset().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Config ───
        "config.check" => {
            let a = lock(app)?;
            let env = a.effective_env();
            let issues = env.validate();
            Ok(json!({"valid": env.is_valid(), "config": env, "issues": issues}))
        }
        "auth.set_bypass" => {
            let enabled = params.get("enabled").and_then(|v| v.as_bool()).ok_or("missing enabled")?;
            let mut a = lock(app)?;
            a.set_bypass_auth(enabled).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true, "bypass_auth": a.bypass_auth()}))
        }
        "app.info" => {
            let a = lock(app)?;
            Ok(json!({
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
                "mock_content": a.env.use_mock_content,
                "bypass_auth": a.bypass_auth(),
                "keyword_provider": a.keyword_provider().name(),
            }))
        }
        "ping" => Ok(json!({"pong": true})),

        _ => Err(format!("unknown method: {}", method)),
    }
}
