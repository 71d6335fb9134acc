use wasm_bindgen::prelude::*;
use web_sys::console;
use blog_common::{parse_posts, PostSummary, ViewConfig, ViewState};

// 导出模块
pub mod builder;
pub mod models;
pub mod scroll;
pub mod sync;

pub use builder::TimelineBuilder;
pub use models::{anchor_id, MonthBucket, Shortcut, Timeline, TimelineEntry, YearBucket};
pub use scroll::{active_anchor, AnchorPosition, ScrollTracker};
pub use sync::ScrollSyncJS;

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// 初始化函数 - 设置错误处理
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// 版本信息
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// 按年月归档文章
pub fn build_archive(posts: &[PostSummary], config: &ViewConfig) -> ViewState<Timeline> {
    let mut builder = TimelineBuilder::with_config(config);
    builder.add_posts(posts.iter().cloned());
    let timeline = builder.build();
    let empty = timeline.is_empty();
    ViewState::ready_or_empty(timeline, empty)
}

/// WASM入口点 - 构建归档时间线，返回 {status, data}
#[wasm_bindgen]
pub fn build_timeline(posts_json: &str, config_json: Option<String>) -> Result<JsValue, JsValue> {
    let config = match config_json {
        Some(json) => ViewConfig::from_json(&json).map_err(|e| log_error(format!("解析配置失败: {}", e)))?,
        None => ViewConfig::default(),
    };
    let posts = parse_posts(posts_json).map_err(|e| log_error(format!("构建归档失败: {}", e)))?;

    let view = build_archive(&posts, &config);
    serde_wasm_bindgen::to_value(&view).map_err(|e| log_error(format!("序列化归档失败: {}", e)))
}

fn log_error(message: String) -> JsValue {
    console::log_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_post_list_signals_empty_state() {
        let view = build_archive(&[], &ViewConfig::default());
        assert!(view.is_empty());
    }

    #[test]
    fn archive_of_posts_is_ready() {
        let posts = parse_posts(r#"[{"title": "a", "date": "2024-03-01"}, {"title": "b"}]"#).unwrap();
        match build_archive(&posts, &ViewConfig::default()) {
            ViewState::Ready(timeline) => {
                assert_eq!(timeline.total, 2);
                assert_eq!(timeline.shortcuts.len(), 1);
            }
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[test]
    fn epoch_and_array_dates_are_archived() {
        let posts = parse_posts(
            r#"[
                {"id": 1, "date": 1709251200000},
                {"id": 2, "createdAt": [2024, 3, 1, 10, 0]},
                {"id": 3, "date": {"unexpected": true}}
            ]"#,
        )
        .unwrap();
        let ViewState::Ready(timeline) = build_archive(&posts, &ViewConfig::default()) else {
            panic!("timeline should be ready");
        };
        assert_eq!(timeline.total, 3);
        let years: Vec<&str> = timeline.years.iter().map(|y| y.year.as_str()).collect();
        assert_eq!(years, vec!["2024", "未归档"]);

        let march = &timeline.years[0].months[0];
        assert_eq!(march.anchor.as_deref(), Some("archive-2024-03"));
        let ids: Vec<String> = march.entries.iter().map(|e| e.post.id.to_string()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }
}
