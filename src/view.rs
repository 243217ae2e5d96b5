//! 展示层约定
//!
//! 页面只渲染控制器快照。这里提供所有列表页共用的三种状态
//! (加载中 / 空 / 有数据) 以及线索图片的轮播状态。

/// 客户端筛选条件，纯函数，不触发网络请求
pub trait Filter<T> {
    fn matches(&self, item: &T) -> bool;

    /// 是否有任何条件生效，用于区分"没有数据"和"筛选后没有数据"
    fn is_active(&self) -> bool;
}

/// 不做任何筛选
pub struct NoFilter;

impl<T> Filter<T> for NoFilter {
    fn matches(&self, _: &T) -> bool {
        true
    }

    fn is_active(&self) -> bool {
        false
    }
}

/// 忽略大小写的子串搜索，空关键字匹配所有
pub fn matches_search(needle: &str, haystacks: &[&str]) -> bool {
    let needle = needle.trim().to_lowercase();
    needle.is_empty()
        || haystacks
            .iter()
            .any(|h| h.to_lowercase().contains(&needle))
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListView<T> {
    Loading,
    /// `filtered` 为 true 表示有数据但都被筛掉了
    Empty { filtered: bool },
    Populated(Vec<T>),
}

impl<T: Clone> ListView<T> {
    pub fn derive(loading: bool, entities: &[T], filter: &impl Filter<T>) -> Self {
        if loading {
            return ListView::Loading;
        }
        let visible: Vec<T> = entities
            .iter()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        if visible.is_empty() {
            ListView::Empty {
                filtered: !entities.is_empty() && filter.is_active(),
            }
        } else {
            ListView::Populated(visible)
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            ListView::Populated(items) => items,
            _ => &[],
        }
    }

    /// 空状态文案，例如 "No vehicles yet" / "No vehicles match your filters"
    pub fn empty_message(&self, noun: &str) -> Option<String> {
        match self {
            ListView::Empty { filtered: false } => Some(format!("No {} yet", noun)),
            ListView::Empty { filtered: true } => Some(format!("No {} match your filters", noun)),
            _ => None,
        }
    }
}

// =========================================================
// 图片轮播 (Lightbox)
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lightbox {
    images: Vec<String>,
    current: Option<usize>,
}

impl Lightbox {
    pub fn new(images: Vec<String>) -> Self {
        Self {
            images,
            current: None,
        }
    }

    pub fn open(&mut self, index: usize) {
        if index < self.images.len() {
            self.current = Some(index);
        }
    }

    pub fn close(&mut self) {
        self.current = None;
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn next(&mut self) {
        if let Some(i) = self.current {
            self.current = Some((i + 1) % self.images.len());
        }
    }

    pub fn prev(&mut self) {
        if let Some(i) = self.current {
            let len = self.images.len();
            self.current = Some((i + len - 1) % len);
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current
            .and_then(|i| self.images.get(i))
            .map(String::as_str)
    }

    /// 例如 "2 / 5"
    pub fn position(&self) -> Option<String> {
        self.current
            .map(|i| format!("{} / {}", i + 1, self.images.len()))
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Prefix(&'static str);

    impl Filter<String> for Prefix {
        fn matches(&self, item: &String) -> bool {
            item.starts_with(self.0)
        }

        fn is_active(&self) -> bool {
            !self.0.is_empty()
        }
    }

    #[test]
    fn test_three_list_states() {
        let none: Vec<String> = Vec::new();
        let some = vec!["civic".to_string(), "accord".to_string()];

        assert_eq!(ListView::derive(true, &some, &NoFilter), ListView::Loading);

        let empty = ListView::derive(false, &none, &NoFilter);
        assert_eq!(empty.empty_message("vehicles").as_deref(), Some("No vehicles yet"));

        let filtered = ListView::derive(false, &some, &Prefix("model"));
        assert_eq!(
            filtered.empty_message("vehicles").as_deref(),
            Some("No vehicles match your filters")
        );

        let shown = ListView::derive(false, &some, &Prefix("ci"));
        assert_eq!(shown.items(), ["civic".to_string()]);
        assert_eq!(shown.empty_message("vehicles"), None);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        assert!(matches_search("HONDA", &["2020 Honda Civic"]));
        assert!(matches_search("  ", &[]));
        assert!(!matches_search("tesla", &["2020 Honda Civic", "1HGCM"]));
    }

    #[test]
    fn test_lightbox_wraps_around() {
        let mut lightbox = Lightbox::new(vec!["a.jpg".into(), "b.jpg".into(), "c.jpg".into()]);
        lightbox.next();
        assert!(!lightbox.is_open());

        lightbox.open(0);
        lightbox.prev();
        assert_eq!(lightbox.current(), Some("c.jpg"));
        lightbox.next();
        assert_eq!(lightbox.current(), Some("a.jpg"));
        assert_eq!(lightbox.position().as_deref(), Some("1 / 3"));

        lightbox.open(7);
        assert_eq!(lightbox.current(), Some("a.jpg"));
        lightbox.close();
        assert_eq!(lightbox.current(), None);
    }
}
