use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

use crate::error::BlogError;

/// "全部" 哨兵值 - 父分类、子分类和标签筛选共用
pub const ALL: &str = "all";

/// 文章ID - 后端可能返回数字或字符串
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum PostId {
    Number(i64),
    Text(String),
}

impl Default for PostId {
    fn default() -> Self {
        PostId::Text(String::new())
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Number(n) => write!(f, "{}", n),
            PostId::Text(s) => f.write_str(s),
        }
    }
}

/// 原始标签 - 字符串或 {name|label} 对象
#[derive(Deserialize, Clone, Debug)]
#[serde(untagged)]
pub enum RawTag {
    Plain(String),
    Named {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        label: Option<String>,
    },
    /// 其他形状（数字、null 等）一律丢弃
    Other(serde_json::Value),
}

impl RawTag {
    /// 归一化为单个字符串，空标签返回 None
    pub fn into_name(self) -> Option<String> {
        let name = match self {
            RawTag::Plain(s) => s,
            RawTag::Named { name, label } => name
                .filter(|n| !n.trim().is_empty())
                .or(label)
                .unwrap_or_default(),
            RawTag::Other(_) => return None,
        };
        let name = name.trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}

/// 文章摘要 - 列表与归档页展示所需的字段
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    /// 文章唯一标识符
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: PostId,
    /// 文章标题
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// 文章摘要，优先于 summary 和 description
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub excerpt: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// 子分类名称
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    /// 父分类名称
    #[serde(default, deserialize_with = "null_as_default")]
    pub parent_category: String,
    /// 标签列表，入口处已归一化为字符串
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    /// 发布日期 (YYYY-MM-DD 或自由文本)
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_date", skip_serializing_if = "String::is_empty")]
    pub publish_date: String,
    #[serde(default, deserialize_with = "lenient_date", skip_serializing_if = "String::is_empty")]
    pub published_at: String,
    #[serde(default, deserialize_with = "lenient_date", skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    /// 阅读数
    #[serde(default, deserialize_with = "null_as_default")]
    pub views: u64,
    /// 评论数
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: u64,
    /// 封面图片
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

impl PostSummary {
    /// 按 date → publishDate → publishedAt → createdAt 顺序取第一个非空日期
    pub fn raw_date(&self) -> Option<&str> {
        [&self.date, &self.publish_date, &self.published_at, &self.created_at]
            .into_iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
    }

    /// 按 excerpt → summary → description 顺序取第一个非空摘要
    pub fn summary_text(&self) -> &str {
        [&self.excerpt, &self.summary, &self.description]
            .into_iter()
            .map(String::as_str)
            .find(|s| !s.trim().is_empty())
            .unwrap_or("")
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 日期字段 - 字符串原样保留；数字按毫秒时间戳处理；
/// [年, 月, 日, 时, 分, 秒, 纳秒] 数组（未注册 JavaTime 模块的 LocalDateTime）转为 ISO 文本；
/// 其他形状视为空日期，交给归档的哨兵年份处理
fn lenient_date<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .map(date_value_to_text)
        .unwrap_or_default())
}

fn date_value_to_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            .unwrap_or_else(|| n.to_string()),
        Value::Array(parts) => date_from_parts(&parts).unwrap_or_else(|| {
            debug!(?parts, "无法识别的日期数组");
            String::new()
        }),
        other => {
            debug!(value = %other, "无法识别的日期字段");
            String::new()
        }
    }
}

fn date_from_parts(parts: &[Value]) -> Option<String> {
    let mut numbers = Vec::with_capacity(parts.len());
    for part in parts {
        numbers.push(u32::try_from(part.as_i64()?).ok()?);
    }
    let field = |i: usize| numbers.get(i).copied().unwrap_or(0);
    let year = i32::try_from(*numbers.first()?).ok()?;
    let date = NaiveDate::from_ymd_opt(year, *numbers.get(1)?, *numbers.get(2)?)?;
    let datetime = date.and_hms_nano_opt(field(3), field(4), field(5), field(6))?;
    Some(datetime.format("%Y-%m-%dT%H:%M:%S%.3f").to_string())
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<RawTag>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw.into_iter().filter_map(RawTag::into_name).collect())
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match PostId::deserialize(deserializer)? {
        PostId::Number(n) => n.to_string(),
        PostId::Text(s) => s,
    })
}

/// 归一化标签列表：去掉空标签，按首次出现顺序去重
pub fn normalize_tag_list(raw: Vec<RawTag>) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter_map(RawTag::into_name)
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

/// 从 JSON 解析标签列表
pub fn parse_tag_list(json: &str) -> Result<Vec<String>, BlogError> {
    let raw: Vec<RawTag> = serde_json::from_str(json).map_err(|e| BlogError::json("标签列表", e))?;
    Ok(normalize_tag_list(raw))
}

/// 从文章中收集已知标签（未提供标签列表时使用）
pub fn collect_tags(posts: &[PostSummary]) -> Vec<String> {
    let mut seen = HashSet::new();
    posts
        .iter()
        .flat_map(|post| post.tags.iter().map(String::as_str))
        .filter(|tag| seen.insert(*tag))
        .map(str::to_string)
        .collect()
}

/// 解析文章列表 - 接受数组，或带 posts/data/items/list 字段的响应包装
pub fn parse_posts(json: &str) -> Result<Vec<PostSummary>, BlogError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| BlogError::json("文章列表", e))?;
    let list = unwrap_envelope(value);
    serde_json::from_value(list).map_err(|e| BlogError::json("文章列表", e))
}

fn unwrap_envelope(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(mut map) => {
            for key in ["posts", "data", "items", "list"] {
                if let Some(inner) = map.remove(key) {
                    return unwrap_envelope(inner);
                }
            }
            serde_json::Value::Object(map)
        }
        other => other,
    }
}

/// 分类节点
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CategoryNode {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    fn new(id: &str, label: &str, children: Vec<CategoryNode>) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            children,
        }
    }
}

/// 分类树 - 父分类 → 子分类
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(transparent)]
pub struct CategoryTree {
    pub nodes: Vec<CategoryNode>,
}

impl Default for CategoryTree {
    fn default() -> Self {
        Self::fallback()
    }
}

impl CategoryTree {
    /// 后端未提供分类时使用的内置分类
    pub fn fallback() -> Self {
        Self {
            nodes: vec![
                CategoryNode::new(
                    "tech",
                    "技术",
                    vec![
                        CategoryNode::new("frontend", "前端", Vec::new()),
                        CategoryNode::new("backend", "后端", Vec::new()),
                        CategoryNode::new("devops", "运维", Vec::new()),
                    ],
                ),
                CategoryNode::new(
                    "life",
                    "生活",
                    vec![
                        CategoryNode::new("essay", "随笔", Vec::new()),
                        CategoryNode::new("reading", "读书", Vec::new()),
                    ],
                ),
                CategoryNode::new(
                    "project",
                    "项目",
                    vec![CategoryNode::new("open-source", "开源", Vec::new())],
                ),
            ],
        }
    }

    /// 外部分类为空时回退到内置分类
    pub fn from_nodes(nodes: Option<Vec<CategoryNode>>) -> Self {
        match nodes {
            Some(nodes) if !nodes.is_empty() => Self { nodes },
            _ => Self::fallback(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, BlogError> {
        let nodes: Option<Vec<CategoryNode>> =
            serde_json::from_str(json).map_err(|e| BlogError::json("分类树", e))?;
        Ok(Self::from_nodes(nodes))
    }

    /// 父分类 ID → 名称
    pub fn parent_label(&self, parent_id: &str) -> Option<&str> {
        self.nodes
            .iter()
            .find(|node| node.id == parent_id)
            .map(|node| node.label.as_str())
    }

    /// 子分类 ID → 名称；父分类已知时先在其下查找，否则遍历整棵树
    pub fn sub_label(&self, parent_id: &str, sub_id: &str) -> Option<&str> {
        let in_parent = self
            .nodes
            .iter()
            .find(|node| node.id == parent_id)
            .and_then(|node| node.children.iter().find(|child| child.id == sub_id));

        in_parent
            .or_else(|| {
                self.nodes
                    .iter()
                    .flat_map(|node| node.children.iter())
                    .find(|child| child.id == sub_id)
            })
            .map(|child| child.label.as_str())
    }
}

/// 视图状态 - 区分加载中、失败、空数据和正常数据
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "status", content = "data", rename_all = "camelCase")]
pub enum ViewState<T> {
    Loading,
    Failed { message: String },
    Empty,
    Ready(T),
}

impl<T> ViewState<T> {
    /// 聚合结果为空时给出 Empty 信号
    pub fn ready_or_empty(value: T, empty: bool) -> Self {
        if empty {
            ViewState::Empty
        } else {
            ViewState::Ready(value)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ViewState::Empty)
    }
}
