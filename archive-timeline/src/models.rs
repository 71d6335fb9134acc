use blog_common::PostSummary;
use serde::Serialize;

/// 月份锚点 ID，例如 archive-2024-03
pub fn anchor_id(year: &str, month_index: i32) -> String {
    format!("archive-{}-{:02}", year, month_index + 1)
}

/// 时间线条目 - 单篇文章及其解析后的日期信息
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    /// 原始文章
    pub post: PostSummary,
    /// 毫秒时间戳，日期无法解析时为 0
    pub timestamp: i64,
    /// 年份标签，日期无法解析时为哨兵标签
    pub year: String,
    /// 月份索引（0 表示一月），未知为 -1
    pub month_index: i32,
    /// 展示用日期
    pub display_date: String,
}

impl TimelineEntry {
    pub fn is_dated(&self) -> bool {
        self.month_index >= 0
    }
}

/// 月份分组
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthBucket {
    /// 年份内唯一的分组键
    pub key: String,
    /// 月份索引，未知为 -1
    pub month_index: i32,
    /// 展示名称，例如 "3月"
    pub label: String,
    /// 滚动定位锚点，月份未知时为 None
    pub anchor: Option<String>,
    /// 按时间倒序排列的文章
    pub entries: Vec<TimelineEntry>,
}

/// 年份分组
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YearBucket {
    /// 年份标签
    pub year: String,
    /// 该年文章数
    pub count: usize,
    /// 按月份倒序排列
    pub months: Vec<MonthBucket>,
}

/// 月份快捷跳转项
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Shortcut {
    pub anchor: String,
    pub year: String,
    pub month_index: i32,
    /// 展示名称，例如 "2024年3月"
    pub label: String,
    /// 该月文章数
    pub count: usize,
}

/// 归档时间线 - 年 → 月 → 文章
#[derive(Serialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub years: Vec<YearBucket>,
    pub shortcuts: Vec<Shortcut>,
    /// 文章总数
    pub total: usize,
}

impl Timeline {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// 按展示顺序遍历所有条目
    pub fn entries(&self) -> impl Iterator<Item = &TimelineEntry> {
        self.years
            .iter()
            .flat_map(|year| year.months.iter())
            .flat_map(|month| month.entries.iter())
    }
}
