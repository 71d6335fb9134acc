use blog_common::{PostSummary, ALL};
use serde::{Deserialize, Serialize};

use crate::pagination::PageItem;

/// 默认每页条数
fn default_page_size() -> usize {
    5
}

fn default_page() -> usize {
    1
}

fn default_all() -> String {
    ALL.to_string()
}

/// 筛选状态 - 列表视图的临时状态，不做持久化
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// 父分类 ID，"all" 表示不限
    #[serde(default = "default_all")]
    pub active_parent: String,
    /// 子分类 ID，"all" 表示不限
    #[serde(default = "default_all")]
    pub active_sub: String,
    /// 标签名，"all" 表示不限
    #[serde(default = "default_all")]
    pub active_tag: String,
    /// 搜索关键字
    #[serde(default)]
    pub keyword: String,
    /// 当前页码，从 1 开始
    #[serde(default = "default_page")]
    pub current_page: usize,
    /// 每页条数
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(default_page_size())
    }
}

impl FilterState {
    pub fn new(page_size: usize) -> Self {
        Self {
            active_parent: default_all(),
            active_sub: default_all(),
            active_tag: default_all(),
            keyword: String::new(),
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    /// 切换父分类，同时把子分类重置为 "all"
    pub fn set_parent(&mut self, parent_id: &str) -> bool {
        if self.active_parent == parent_id {
            return false;
        }
        self.active_parent = parent_id.to_string();
        self.active_sub = default_all();
        self.current_page = 1;
        true
    }

    pub fn set_sub(&mut self, sub_id: &str) -> bool {
        if self.active_sub == sub_id {
            return false;
        }
        self.active_sub = sub_id.to_string();
        self.current_page = 1;
        true
    }

    /// 与入口处的标签归一化一致：去掉首尾空白，空标签视为 "all"
    pub fn set_tag(&mut self, tag: &str) -> bool {
        let tag = match tag.trim() {
            "" => ALL,
            trimmed => trimmed,
        };
        if self.active_tag == tag {
            return false;
        }
        self.active_tag = tag.to_string();
        self.current_page = 1;
        true
    }

    pub fn set_keyword(&mut self, keyword: &str) -> bool {
        if self.keyword == keyword {
            return false;
        }
        self.keyword = keyword.to_string();
        self.current_page = 1;
        true
    }

    /// 修改每页条数，0 视为 1
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        let page_size = page_size.max(1);
        if self.page_size == page_size {
            return false;
        }
        self.page_size = page_size;
        self.current_page = 1;
        true
    }

    /// 跳转到指定页，夹到 [1, total_pages]
    pub fn go_to_page(&mut self, page: usize, total_pages: usize) -> usize {
        self.current_page = page.clamp(1, total_pages.max(1));
        self.current_page
    }

    /// 当前标签已不在已知标签列表中时重置为 "all"
    pub fn reconcile_tag(&mut self, known_tags: &[String]) -> bool {
        if self.active_tag == ALL || known_tags.iter().any(|t| *t == self.active_tag) {
            return false;
        }
        self.active_tag = default_all();
        self.current_page = 1;
        true
    }
}

/// 翻页回顶控制 - 首次渲染不滚动，之后页码变化时滚动到列表顶部
#[derive(Debug, Clone, Default)]
pub struct ScrollToTopGate {
    last_page: Option<usize>,
}

impl ScrollToTopGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录本次渲染的页码，返回是否需要滚动到顶部
    pub fn observe(&mut self, page: usize) -> bool {
        match self.last_page.replace(page) {
            None => false,
            Some(previous) => previous != page,
        }
    }
}

/// 筛选结果 - 返回给视图层的当前页数据
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterResult {
    /// 当前页的文章
    pub items: Vec<PostSummary>,
    /// 筛选结果总数
    pub total: usize,
    /// 当前页码
    pub page: usize,
    /// 每页条数
    pub page_size: usize,
    /// 总页数
    pub total_pages: usize,
    /// 页码控件
    pub pages: Vec<PageItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changing_any_filter_resets_page() {
        let mut state = FilterState::default();
        state.current_page = 3;
        assert!(state.set_tag("rust"));
        assert_eq!(state.current_page, 1);

        state.current_page = 2;
        assert!(state.set_keyword("wasm"));
        assert_eq!(state.current_page, 1);

        state.current_page = 2;
        assert!(state.set_page_size(10));
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn unchanged_value_keeps_page() {
        let mut state = FilterState::default();
        state.set_tag("rust");
        state.current_page = 2;
        assert!(!state.set_tag("rust"));
        assert!(!state.set_page_size(5));
        assert_eq!(state.current_page, 2);
    }

    #[test]
    fn selected_tag_is_trimmed_like_post_tags() {
        let mut state = FilterState::default();
        assert!(state.set_tag(" rust "));
        assert_eq!(state.active_tag, "rust");
        assert!(!state.set_tag("rust"));

        state.current_page = 3;
        assert!(state.set_tag("   "));
        assert_eq!(state.active_tag, ALL);
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn parent_change_clears_sub_category() {
        let mut state = FilterState::default();
        state.set_parent("tech");
        state.set_sub("frontend");
        state.current_page = 4;
        assert!(state.set_parent("life"));
        assert_eq!(state.active_sub, ALL);
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn go_to_page_clamps() {
        let mut state = FilterState::default();
        assert_eq!(state.go_to_page(9, 3), 3);
        assert_eq!(state.go_to_page(0, 3), 1);
        assert_eq!(state.go_to_page(2, 0), 1);
    }

    #[test]
    fn stale_tag_is_reset() {
        let mut state = FilterState::default();
        state.set_tag("removed");
        state.current_page = 2;
        let known = vec!["rust".to_string()];
        assert!(state.reconcile_tag(&known));
        assert_eq!(state.active_tag, ALL);
        assert_eq!(state.current_page, 1);
        assert!(!state.reconcile_tag(&known));
    }

    #[test]
    fn state_deserializes_with_defaults() {
        let state: FilterState = serde_json::from_str(r#"{"activeTag": "rust"}"#).unwrap();
        assert_eq!(state.active_tag, "rust");
        assert_eq!(state.active_parent, ALL);
        assert_eq!(state.current_page, 1);
        assert_eq!(state.page_size, 5);
    }

    #[test]
    fn first_render_does_not_scroll() {
        let mut gate = ScrollToTopGate::new();
        assert!(!gate.observe(1));
        assert!(!gate.observe(1));
        assert!(gate.observe(2));
        assert!(!gate.observe(2));
        assert!(gate.observe(1));
    }
}
