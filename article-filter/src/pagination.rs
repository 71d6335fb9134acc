use serde::{Serialize, Serializer};

/// 总页数不超过该值时显示全部页码
pub const FULL_DISPLAY_LIMIT: usize = 7;

/// 总页数，至少为 1
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// 一页数据
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// 当前页的条目
    pub items: Vec<T>,
    /// 实际页码（已夹到合法范围）
    pub page: usize,
    /// 总页数
    pub total_pages: usize,
}

/// 切出指定页，页码越界时夹到 [1, total_pages]
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(items.len(), page_size);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let end = start.saturating_add(page_size).min(items.len());

    let paged_items = if start < items.len() {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };

    Page {
        items: paged_items,
        page,
        total_pages,
    }
}

/// 页码控件条目 - 页码或不可点击的省略号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

impl Serialize for PageItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageItem::Page(n) => serializer.serialize_u64(*n as u64),
            PageItem::Ellipsis => serializer.serialize_str("ellipsis"),
        }
    }
}

/// 页码窗口：首页、当前页前后各一页、末页，中间断开处插入省略号
pub fn page_window(current: usize, total: usize) -> Vec<PageItem> {
    let total = total.max(1);
    if total <= FULL_DISPLAY_LIMIT {
        return (1..=total).map(PageItem::Page).collect();
    }

    let current = current.clamp(1, total);
    let start = current.saturating_sub(1).max(2);
    let end = (current + 1).min(total - 1);

    let mut items = vec![PageItem::Page(1)];
    if start > 2 {
        items.push(PageItem::Ellipsis);
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < total - 1 {
        items.push(PageItem::Ellipsis);
    }
    items.push(PageItem::Page(total));
    items
}
