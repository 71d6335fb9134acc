use blog_common::{parse_post_date, PostSummary, ViewConfig};
use std::collections::HashMap;
use tracing::debug;

use crate::models::{anchor_id, MonthBucket, Shortcut, Timeline, TimelineEntry, YearBucket};

/// 时间线构建器
pub struct TimelineBuilder {
    posts: Vec<PostSummary>,
    unarchived_label: String,
    pending_label: String,
}

impl Default for TimelineBuilder {
    fn default() -> Self {
        Self::with_config(&ViewConfig::default())
    }
}

impl TimelineBuilder {
    /// 创建新的时间线构建器
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &ViewConfig) -> Self {
        Self {
            posts: Vec::new(),
            unarchived_label: config.unarchived_label.clone(),
            pending_label: config.pending_label.clone(),
        }
    }

    /// 添加文章到构建器
    pub fn add_post(&mut self, post: PostSummary) {
        self.posts.push(post);
    }

    pub fn add_posts<I: IntoIterator<Item = PostSummary>>(&mut self, posts: I) {
        self.posts.extend(posts);
    }

    /// 提取单篇文章的日期信息，无法解析时落入哨兵年份
    pub fn entry_for(&self, post: &PostSummary) -> TimelineEntry {
        let raw = post.raw_date();
        match raw.and_then(parse_post_date) {
            Some(parsed) => TimelineEntry {
                post: post.clone(),
                timestamp: parsed.timestamp_millis,
                year: parsed.year().to_string(),
                month_index: parsed.month_index(),
                display_date: parsed.display(),
            },
            None => TimelineEntry {
                post: post.clone(),
                timestamp: 0,
                year: self.unarchived_label.clone(),
                month_index: -1,
                display_date: raw.unwrap_or(self.pending_label.as_str()).to_string(),
            },
        }
    }

    /// 构建时间线
    pub fn build(&self) -> Timeline {
        let mut entries: Vec<TimelineEntry> = self.posts.iter().map(|post| self.entry_for(post)).collect();

        // 有日期的排在前面，同组内按时间倒序；sort_by 是稳定排序，相同时间保持原顺序
        entries.sort_by(|a, b| (b.is_dated(), b.timestamp).cmp(&(a.is_dated(), a.timestamp)));

        let total = entries.len();
        let mut years: Vec<YearBucket> = Vec::new();
        let mut year_positions: HashMap<String, usize> = HashMap::new();

        for (i, entry) in entries.into_iter().enumerate() {
            let year_pos = *year_positions.entry(entry.year.clone()).or_insert_with(|| {
                years.push(YearBucket {
                    year: entry.year.clone(),
                    count: 0,
                    months: Vec::new(),
                });
                years.len() - 1
            });
            let year = &mut years[year_pos];
            year.count += 1;

            // 未知月份每篇单独成组，避免不相关的文章挤在一起
            let key = if entry.is_dated() {
                format!("{:02}", entry.month_index + 1)
            } else {
                format!("unknown-{}", i)
            };

            match year.months.iter_mut().find(|month| month.key == key) {
                Some(month) => month.entries.push(entry),
                None => {
                    let (label, anchor) = if entry.is_dated() {
                        (
                            format!("{}月", entry.month_index + 1),
                            Some(anchor_id(&entry.year, entry.month_index)),
                        )
                    } else {
                        (entry.display_date.clone(), None)
                    };
                    year.months.push(MonthBucket {
                        key,
                        month_index: entry.month_index,
                        label,
                        anchor,
                        entries: vec![entry],
                    });
                }
            }
        }

        // 数字年份倒序，非数字标签（哨兵）排在最后
        years.sort_by(|a, b| year_rank(&b.year).cmp(&year_rank(&a.year)));
        for year in &mut years {
            year.months.sort_by(|a, b| b.month_index.cmp(&a.month_index));
        }

        let shortcuts = years
            .iter()
            .flat_map(|year| {
                year.months.iter().filter_map(move |month| {
                    month.anchor.as_ref().map(|anchor| Shortcut {
                        anchor: anchor.clone(),
                        year: year.year.clone(),
                        month_index: month.month_index,
                        label: format!("{}年{}", year.year, month.label),
                        count: month.entries.len(),
                    })
                })
            })
            .collect::<Vec<_>>();

        debug!(
            posts = total,
            years = years.len(),
            shortcuts = shortcuts.len(),
            "归档时间线构建完成"
        );

        Timeline {
            years,
            shortcuts,
            total,
        }
    }
}

/// 年份排序键，非数字为 None（排在所有数字之后）
fn year_rank(label: &str) -> Option<i64> {
    label.trim().parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: i64, date: &str) -> PostSummary {
        PostSummary {
            id: blog_common::PostId::Number(id),
            title: format!("文章 {}", id),
            date: date.to_string(),
            ..Default::default()
        }
    }

    fn build(posts: Vec<PostSummary>) -> Timeline {
        let mut builder = TimelineBuilder::new();
        builder.add_posts(posts);
        builder.build()
    }

    #[test]
    fn groups_years_and_months_descending() {
        let timeline = build(vec![
            post(1, "2024-01-15"),
            post(2, "2023-12-20"),
            post(3, "2024-03-01"),
            post(4, ""),
        ]);

        let years: Vec<&str> = timeline.years.iter().map(|y| y.year.as_str()).collect();
        assert_eq!(years, vec!["2024", "2023", "未归档"]);

        let months_2024: Vec<&str> = timeline.years[0].months.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(months_2024, vec!["3月", "1月"]);
        assert_eq!(timeline.years[0].count, 2);
        assert_eq!(timeline.total, 4);
    }

    #[test]
    fn shortcuts_follow_tree_order_and_skip_unknown_months() {
        let timeline = build(vec![post(1, "2024-01-15"), post(2, "待定"), post(3, "2024-03-01"), post(4, "2023-12-20")]);
        let anchors: Vec<&str> = timeline.shortcuts.iter().map(|s| s.anchor.as_str()).collect();
        assert_eq!(anchors, vec!["archive-2024-03", "archive-2024-01", "archive-2023-12"]);
        assert_eq!(timeline.shortcuts[0].label, "2024年3月");
    }

    #[test]
    fn same_month_entries_sorted_by_time_with_stable_ties() {
        let timeline = build(vec![
            post(1, "2024-03-01"),
            post(2, "2024-03-20"),
            post(3, "2024-03-01"),
        ]);
        let march = &timeline.years[0].months[0];
        let ids: Vec<String> = march.entries.iter().map(|e| e.post.id.to_string()).collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
    }

    #[test]
    fn same_day_posts_ordered_by_time_of_day() {
        let timeline = build(vec![
            post(1, "2024-03-01T08:00:00.123"),
            post(2, "2024-03-01T20:00:00.456"),
            post(3, "2024-03-02T08:00"),
            post(4, "2024-03-02T20:00"),
        ]);
        let ids: Vec<String> = timeline.entries().map(|e| e.post.id.to_string()).collect();
        assert_eq!(ids, vec!["4", "3", "2", "1"]);
    }

    #[test]
    fn undated_posts_are_not_merged() {
        let timeline = build(vec![post(1, "不知道"), post(2, ""), post(3, "")]);
        assert_eq!(timeline.years.len(), 1);
        let sentinel = &timeline.years[0];
        assert_eq!(sentinel.year, "未归档");
        assert_eq!(sentinel.months.len(), 3);
        assert!(sentinel.months.iter().all(|m| m.anchor.is_none() && m.entries.len() == 1));
        assert!(timeline.shortcuts.is_empty());

        // 原始字符串或 "待定" 作为展示日期，保持原顺序
        let labels: Vec<&str> = sentinel.months.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["不知道", "待定", "待定"]);
    }

    #[test]
    fn empty_input_builds_empty_timeline() {
        let timeline = build(Vec::new());
        assert!(timeline.is_empty());
        assert!(timeline.years.is_empty());
        assert!(timeline.shortcuts.is_empty());
    }

    #[test]
    fn falls_back_to_other_date_fields() {
        let mut p = post(1, "");
        p.created_at = "2021-06-30T10:00:00Z".to_string();
        let entry = TimelineBuilder::new().entry_for(&p);
        assert_eq!(entry.year, "2021");
        assert_eq!(entry.month_index, 5);
        assert_eq!(entry.display_date, "2021-06-30");
    }

    #[test]
    fn custom_labels_from_config() {
        let config = ViewConfig {
            unarchived_label: "Unknown".to_string(),
            pending_label: "TBD".to_string(),
            ..Default::default()
        };
        let mut builder = TimelineBuilder::with_config(&config);
        builder.add_post(post(1, ""));
        let timeline = builder.build();
        assert_eq!(timeline.years[0].year, "Unknown");
        assert_eq!(timeline.years[0].months[0].entries[0].display_date, "TBD");
    }
}
