use blog_common::{CategoryTree, PostSummary, ALL};
use tracing::warn;

use crate::models::FilterState;

/// 单个维度的筛选条件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    /// "all"，不限制
    Any,
    /// 必须与该名称完全一致
    Label(&'a str),
    /// 引用了不存在的分类，该维度不匹配任何文章
    Missing,
}

impl Selection<'_> {
    fn accepts(&self, value: &str) -> bool {
        match self {
            Selection::Any => true,
            Selection::Label(label) => *label == value,
            Selection::Missing => false,
        }
    }
}

/// 解析后的筛选谓词 - 分类 ID 已换成名称，关键字已转小写
#[derive(Debug, Clone)]
pub struct PostPredicate<'a> {
    pub parent: Selection<'a>,
    pub sub: Selection<'a>,
    pub tag: Selection<'a>,
    keyword: String,
}

impl<'a> PostPredicate<'a> {
    pub fn resolve(state: &'a FilterState, categories: &'a CategoryTree) -> Self {
        let parent = if state.active_parent == ALL {
            Selection::Any
        } else {
            match categories.parent_label(&state.active_parent) {
                Some(label) => Selection::Label(label),
                None => {
                    warn!(parent = %state.active_parent, "父分类不存在，筛选结果为空");
                    Selection::Missing
                }
            }
        };

        let sub = if state.active_sub == ALL {
            Selection::Any
        } else {
            match categories.sub_label(&state.active_parent, &state.active_sub) {
                Some(label) => Selection::Label(label),
                None => {
                    warn!(sub = %state.active_sub, "子分类不存在，筛选结果为空");
                    Selection::Missing
                }
            }
        };

        // 反序列化得到的状态未经过 set_tag，这里同样去掉空白
        let tag = match state.active_tag.trim() {
            "" | ALL => Selection::Any,
            name => Selection::Label(name),
        };

        Self {
            parent,
            sub,
            tag,
            keyword: state.keyword.trim().to_lowercase(),
        }
    }

    /// 所有维度同时满足才算匹配
    pub fn matches(&self, post: &PostSummary) -> bool {
        if !self.parent.accepts(&post.parent_category) {
            return false;
        }
        if !self.sub.accepts(&post.category) {
            return false;
        }
        match self.tag {
            Selection::Any => {}
            Selection::Label(tag) => {
                if !post.has_tag(tag) {
                    return false;
                }
            }
            Selection::Missing => return false,
        }
        self.matches_keyword(post)
    }

    /// 标题或摘要包含关键字（不区分大小写），空关键字匹配全部
    fn matches_keyword(&self, post: &PostSummary) -> bool {
        if self.keyword.is_empty() {
            return true;
        }
        post.title.to_lowercase().contains(&self.keyword)
            || post.summary_text().to_lowercase().contains(&self.keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, parent: &str, sub: &str, tags: &[&str]) -> PostSummary {
        PostSummary {
            title: title.to_string(),
            parent_category: parent.to_string(),
            category: sub.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn all_sentinels_accept_everything() {
        let state = FilterState::default();
        let tree = CategoryTree::fallback();
        let predicate = PostPredicate::resolve(&state, &tree);
        assert!(predicate.matches(&post("任意", "", "", &[])));
    }

    #[test]
    fn category_ids_resolve_to_labels() {
        let mut state = FilterState::default();
        state.set_parent("tech");
        state.set_sub("backend");
        let tree = CategoryTree::fallback();
        let predicate = PostPredicate::resolve(&state, &tree);
        assert_eq!(predicate.parent, Selection::Label("技术"));
        assert!(predicate.matches(&post("a", "技术", "后端", &[])));
        assert!(!predicate.matches(&post("b", "技术", "前端", &[])));
        assert!(!predicate.matches(&post("c", "生活", "后端", &[])));
    }

    #[test]
    fn stale_category_matches_nothing() {
        let mut state = FilterState::default();
        state.set_parent("deleted");
        let tree = CategoryTree::fallback();
        let predicate = PostPredicate::resolve(&state, &tree);
        assert_eq!(predicate.parent, Selection::Missing);
        assert!(!predicate.matches(&post("a", "技术", "后端", &[])));
    }

    #[test]
    fn tag_match_is_exact_and_case_sensitive() {
        let mut state = FilterState::default();
        state.set_tag("Rust");
        let tree = CategoryTree::fallback();
        let predicate = PostPredicate::resolve(&state, &tree);
        assert!(predicate.matches(&post("a", "", "", &["Rust", "wasm"])));
        assert!(!predicate.matches(&post("b", "", "", &["rust"])));
        assert!(!predicate.matches(&post("c", "", "", &["Rust 入门"])));
    }

    #[test]
    fn padded_tag_selection_matches_normalized_tags() {
        let tree = CategoryTree::fallback();
        let posts: Vec<PostSummary> =
            serde_json::from_str(r#"[{"title": "a", "tags": [" rust "]}, {"title": "b", "tags": ["go"]}]"#).unwrap();

        let mut state = FilterState::default();
        state.set_tag(" rust");
        let predicate = PostPredicate::resolve(&state, &tree);
        assert!(predicate.matches(&posts[0]));
        assert!(!predicate.matches(&posts[1]));

        let raw: FilterState = serde_json::from_str(r#"{"activeTag": "rust "}"#).unwrap();
        let predicate = PostPredicate::resolve(&raw, &tree);
        assert!(predicate.matches(&posts[0]));
        assert!(!predicate.matches(&posts[1]));
    }

    #[test]
    fn keyword_checks_title_and_first_summary_field() {
        let mut state = FilterState::default();
        state.set_keyword("  WASM ");
        let tree = CategoryTree::fallback();
        let predicate = PostPredicate::resolve(&state, &tree);

        assert!(predicate.matches(&post("用 Wasm 写前端", "", "", &[])));

        let mut by_excerpt = post("标题", "", "", &[]);
        by_excerpt.excerpt = "关于 wasm-bindgen".to_string();
        assert!(predicate.matches(&by_excerpt));

        // 只看第一个非空摘要字段
        let mut shadowed = post("标题", "", "", &[]);
        shadowed.excerpt = "无关".to_string();
        shadowed.description = "wasm".to_string();
        assert!(!predicate.matches(&shadowed));
    }
}
