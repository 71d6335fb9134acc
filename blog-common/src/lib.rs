pub mod config;
pub mod dates;
pub mod error;
pub mod models;

// 重新导出常用类型，方便直接使用
pub use config::{ScrollConfig, ViewConfig};
pub use dates::{parse_post_date, ParsedDate};
pub use error::BlogError;
pub use models::{
    collect_tags, normalize_tag_list, parse_posts, parse_tag_list, CategoryNode, CategoryTree,
    PostId, PostSummary, RawTag, ViewState, ALL,
};
