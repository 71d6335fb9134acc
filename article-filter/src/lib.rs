use wasm_bindgen::prelude::*;
use web_sys::console;
use blog_common::{collect_tags, parse_posts, parse_tag_list, CategoryTree, PostSummary, ViewConfig, ViewState};
use tracing::debug;

// 导出模块
pub mod models;
pub mod pagination;
pub mod predicate;

pub use models::{FilterResult, FilterState, ScrollToTopGate};
pub use pagination::{page_window, paginate, total_pages, Page, PageItem};
pub use predicate::{PostPredicate, Selection};

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

/// 文章过滤器 - 处理文章筛选与分页逻辑
pub struct ArticleFilter;

impl ArticleFilter {
    /// 按筛选状态过滤文章，保持原有顺序
    pub fn filter_posts(
        posts: &[PostSummary],
        state: &FilterState,
        categories: &CategoryTree,
    ) -> Vec<PostSummary> {
        let predicate = PostPredicate::resolve(state, categories);
        posts
            .iter()
            .filter(|post| predicate.matches(post))
            .cloned()
            .collect()
    }

    /// 筛选并分页
    pub fn apply(posts: &[PostSummary], state: &FilterState, categories: &CategoryTree) -> FilterResult {
        let filtered = Self::filter_posts(posts, state, categories);
        let total = filtered.len();
        let page = paginate(&filtered, state.current_page, state.page_size);

        debug!(
            total_posts = posts.len(),
            matched = total,
            page = page.page,
            total_pages = page.total_pages,
            "文章筛选完成"
        );

        FilterResult {
            items: page.items,
            total,
            page: page.page,
            page_size: state.page_size.max(1),
            total_pages: page.total_pages,
            pages: page_window(page.page, page.total_pages),
        }
    }

    /// 筛选结果为空时返回 Empty 信号
    pub fn view(posts: &[PostSummary], state: &FilterState, categories: &CategoryTree) -> ViewState<FilterResult> {
        let result = Self::apply(posts, state, categories);
        let empty = result.total == 0;
        ViewState::ready_or_empty(result, empty)
    }
}

fn js_error(message: String) -> JsValue {
    console::log_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

/// 文章过滤器JS接口 - 每个列表视图持有一个实例
#[wasm_bindgen]
pub struct ArticleFilterJS {
    posts: Vec<PostSummary>,
    categories: CategoryTree,
    known_tags: Vec<String>,
    state: FilterState,
    scroll_gate: ScrollToTopGate,
}

#[wasm_bindgen]
impl ArticleFilterJS {
    /// 用文章列表 JSON 和可选的视图配置 JSON 创建过滤器
    #[wasm_bindgen(constructor)]
    pub fn new(posts_json: &str, config_json: Option<String>) -> Result<ArticleFilterJS, JsValue> {
        console_error_panic_hook::set_once();

        let config = match config_json {
            Some(json) => ViewConfig::from_json(&json).map_err(|e| js_error(format!("初始化过滤器失败: {}", e)))?,
            None => ViewConfig::default(),
        };
        let posts = parse_posts(posts_json).map_err(|e| js_error(format!("初始化过滤器失败: {}", e)))?;
        let known_tags = collect_tags(&posts);

        Ok(ArticleFilterJS {
            posts,
            categories: CategoryTree::fallback(),
            known_tags,
            state: FilterState::new(config.page_size),
            scroll_gate: ScrollToTopGate::new(),
        })
    }

    /// 设置分类树，传入 null 或空数组时使用内置分类
    pub fn set_categories(&mut self, categories_json: &str) -> Result<(), JsValue> {
        self.categories = CategoryTree::from_json(categories_json).map_err(|e| js_error(e.to_string()))?;
        Ok(())
    }

    /// 设置已知标签列表，当前标签失效时重置为 "all"
    pub fn set_tags(&mut self, tags_json: &str) -> Result<bool, JsValue> {
        self.known_tags = parse_tag_list(tags_json).map_err(|e| js_error(e.to_string()))?;
        Ok(self.state.reconcile_tag(&self.known_tags))
    }

    /// 获取所有标签
    pub fn known_tags(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.known_tags)
            .map_err(|e| js_error(format!("序列化标签失败: {}", e)))
    }

    pub fn set_parent(&mut self, parent_id: &str) -> bool {
        self.state.set_parent(parent_id)
    }

    pub fn set_sub(&mut self, sub_id: &str) -> bool {
        self.state.set_sub(sub_id)
    }

    pub fn set_tag(&mut self, tag: &str) -> bool {
        self.state.set_tag(tag)
    }

    pub fn set_keyword(&mut self, keyword: &str) -> bool {
        self.state.set_keyword(keyword)
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<bool, JsValue> {
        if page_size == 0 {
            return Err(js_error("每页条数必须大于 0".to_string()));
        }
        Ok(self.state.set_page_size(page_size))
    }

    /// 跳转页码，返回实际页码
    pub fn go_to_page(&mut self, page: usize) -> usize {
        let filtered = ArticleFilter::filter_posts(&self.posts, &self.state, &self.categories);
        let total = total_pages(filtered.len(), self.state.page_size);
        self.state.go_to_page(page, total)
    }

    /// 当前筛选状态
    pub fn state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.state)
            .map_err(|e| js_error(format!("序列化筛选状态失败: {}", e)))
    }

    /// 筛选文章，返回 {status, data}
    pub fn result(&mut self) -> Result<JsValue, JsValue> {
        let view = ArticleFilter::view(&self.posts, &self.state, &self.categories);
        if let ViewState::Ready(result) = &view {
            self.state.current_page = result.page;
        }
        serde_wasm_bindgen::to_value(&view)
            .map_err(|e| js_error(format!("序列化结果失败: {}", e)))
    }

    /// 渲染完成后调用，返回是否需要滚动到列表顶部
    pub fn should_scroll_to_top(&mut self) -> bool {
        self.scroll_gate.observe(self.state.current_page)
    }
}
