use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// 自由文本开头的日期，例如 "2024年3月1日 晚" 或 "2024.03.01 更新"
static DATE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d{4})\s*[-/.年]\s*(\d{1,2})\s*[-/.月]\s*(\d{1,2})")
        .expect("日期前缀正则无效")
});

/// 完整日期时间格式（无时区，按 UTC 处理）；%.f 兼容带毫秒的 LocalDateTime
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// 纯日期格式
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// 解析成功的文章日期
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDate {
    /// 文章上书写的日历日期（分组使用）
    pub date: NaiveDate,
    /// 毫秒时间戳（排序使用）
    pub timestamp_millis: i64,
}

impl ParsedDate {
    fn from_naive(datetime: NaiveDateTime) -> Self {
        Self {
            date: datetime.date(),
            timestamp_millis: datetime.and_utc().timestamp_millis(),
        }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// 月份索引，从 0 开始（0 表示一月）
    pub fn month_index(&self) -> i32 {
        self.date.month0() as i32
    }

    /// 展示用日期，格式 YYYY-MM-DD
    pub fn display(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// 解析文章日期字符串，无法识别时返回 None
pub fn parse_post_date(raw: &str) -> Option<ParsedDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    // 带时区的时间：时间戳取绝对时刻，分组仍按书写的日期
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(ParsedDate {
            date: dt.naive_local().date(),
            timestamp_millis: dt.timestamp_millis(),
        });
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ParsedDate::from_naive(dt));
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.and_hms_opt(0, 0, 0).map(ParsedDate::from_naive);
        }
    }

    let caps = DATE_PREFIX.captures(raw)?;
    let year = caps[1].parse::<i32>().ok()?;
    let month = caps[2].parse::<u32>().ok()?;
    let day = caps[3].parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(ParsedDate::from_naive)
}
