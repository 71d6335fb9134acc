use blog_common::ScrollConfig;

/// 月份锚点在文档中的位置
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorPosition {
    pub anchor: String,
    /// 相对文档顶部的像素位置
    pub top: f64,
}

impl AnchorPosition {
    pub fn new(anchor: impl Into<String>, top: f64) -> Self {
        Self {
            anchor: anchor.into(),
            top,
        }
    }
}

/// 找出顶部位置不超过阈值的最后一个锚点；没有时取第一个锚点
pub fn active_anchor(anchors: &[AnchorPosition], threshold: f64) -> Option<&str> {
    anchors
        .iter()
        .filter(|position| position.top <= threshold)
        .fold(None, |best: Option<&AnchorPosition>, position| match best {
            Some(current) if current.top > position.top => Some(current),
            _ => Some(position),
        })
        .or_else(|| anchors.first())
        .map(|position| position.anchor.as_str())
}

/// 滚动同步状态 - 每个归档视图一个实例
///
/// 滚动和窗口尺寸变化事件只在没有待执行的帧回调时才调度新帧，
/// 期间到达的事件直接丢弃，帧回调执行时读取最新的滚动位置。
#[derive(Debug, Clone)]
pub struct ScrollTracker {
    config: ScrollConfig,
    frame_pending: bool,
    active: Option<String>,
    detached: bool,
}

impl ScrollTracker {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            frame_pending: false,
            active: None,
            detached: false,
        }
    }

    /// 事件到达时调用，返回是否需要调度帧回调
    pub fn request_frame(&mut self) -> bool {
        if self.detached || self.frame_pending {
            return false;
        }
        self.frame_pending = true;
        true
    }

    pub fn is_frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// 调度失败或被取消时清除标记
    pub fn cancel_frame(&mut self) {
        self.frame_pending = false;
    }

    /// 帧回调执行，返回当前高亮的锚点是否变化
    pub fn on_frame(&mut self, scroll_y: f64, anchors: &[AnchorPosition]) -> bool {
        self.frame_pending = false;
        if self.detached {
            return false;
        }

        let threshold = scroll_y + self.config.active_offset;
        let next = active_anchor(anchors, threshold).map(str::to_string);
        if next == self.active {
            return false;
        }
        self.active = next;
        true
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// 跳转目标位置：锚点位置减去导航高度和额外间距
    pub fn jump_target(&self, anchor_top: f64, header_height: f64) -> f64 {
        (anchor_top - header_height.max(0.0) - self.config.jump_gap).max(0.0)
    }

    /// 卸载时调用，之后的事件和帧回调都被忽略
    pub fn detach(&mut self) {
        self.detached = true;
        self.frame_pending = false;
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self::new(ScrollConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchors() -> Vec<AnchorPosition> {
        vec![
            AnchorPosition::new("archive-2024-03", 200.0),
            AnchorPosition::new("archive-2024-01", 800.0),
            AnchorPosition::new("archive-2023-12", 1500.0),
        ]
    }

    fn tracker() -> ScrollTracker {
        ScrollTracker::new(ScrollConfig {
            active_offset: 100.0,
            jump_gap: 16.0,
        })
    }

    #[test]
    fn events_coalesce_into_one_pending_frame() {
        let mut tracker = tracker();
        assert!(tracker.request_frame());
        assert!(!tracker.request_frame());
        assert!(!tracker.request_frame());
        assert!(tracker.is_frame_pending());

        tracker.on_frame(0.0, &anchors());
        assert!(!tracker.is_frame_pending());
        assert!(tracker.request_frame());
    }

    #[test]
    fn picks_last_anchor_above_threshold() {
        let mut tracker = tracker();
        assert!(tracker.on_frame(750.0, &anchors()));
        assert_eq!(tracker.active(), Some("archive-2024-01"));

        // 阈值正好等于锚点位置也算越过
        assert!(tracker.on_frame(1400.0, &anchors()));
        assert_eq!(tracker.active(), Some("archive-2023-12"));

        assert!(!tracker.on_frame(1600.0, &anchors()));
    }

    #[test]
    fn defaults_to_first_anchor_near_top() {
        let mut tracker = tracker();
        assert!(tracker.on_frame(0.0, &anchors()));
        assert_eq!(tracker.active(), Some("archive-2024-03"));
        assert_eq!(active_anchor(&[], 500.0), None);
    }

    #[test]
    fn unordered_positions_still_pick_the_nearest_above() {
        let shuffled = vec![
            AnchorPosition::new("b", 800.0),
            AnchorPosition::new("a", 200.0),
            AnchorPosition::new("c", 1500.0),
        ];
        assert_eq!(active_anchor(&shuffled, 900.0), Some("b"));
    }

    #[test]
    fn jump_target_accounts_for_header_and_gap() {
        let tracker = tracker();
        assert_eq!(tracker.jump_target(800.0, 64.0), 720.0);
        assert_eq!(tracker.jump_target(800.0, 96.0), 688.0);
        assert_eq!(tracker.jump_target(30.0, 64.0), 0.0);
    }

    #[test]
    fn detached_tracker_ignores_events() {
        let mut tracker = tracker();
        assert!(tracker.request_frame());
        tracker.detach();
        assert!(!tracker.is_frame_pending());
        assert!(!tracker.request_frame());
        assert!(!tracker.on_frame(900.0, &anchors()));
        assert_eq!(tracker.active(), None);
    }
}
