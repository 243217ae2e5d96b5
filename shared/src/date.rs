//! 日期类型模块
//!
//! 提供两种工具：
//! - `DateRange`: 经过校验的闭区间，用于按日期查询维修记录
//! - `parse_day`: 宽松解析服务端返回的日期字符串

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// 查询参数使用的日期格式
pub const DAY_FORMAT: &str = "%Y-%m-%d";

// =========================================================
// DateRange - 日期闭区间
// =========================================================

/// 日期闭区间 `[start, end]`
///
/// 只能通过 [`DateRange::new`] 构造，保证 `start <= end`；反序列化同样经过该检查。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawRange> for DateRange {
    type Error = String;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.start, raw.end)
            .ok_or_else(|| format!("start {} is after end {}", raw.start, raw.end))
    }
}

impl DateRange {
    /// 创建区间，起始日期晚于结束日期时返回 `None`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// 从两个 `YYYY-MM-DD` 字符串构造
    pub fn parse(start: &str, end: &str) -> Option<Self> {
        Self::new(parse_day(start)?, parse_day(end)?)
    }

    #[inline]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[inline]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// 日期是否落在区间内（含两端）
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// 转为查询参数对
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("start", self.start.format(DAY_FORMAT).to_string()),
            ("end", self.end.format(DAY_FORMAT).to_string()),
        ]
    }
}

// =========================================================
// 解析
// =========================================================

/// 解析 `YYYY-MM-DD` 或 RFC 3339 时间戳，取其日期部分
///
/// 返回 None 如果两种格式都不匹配
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(day) = NaiveDate::parse_from_str(s, DAY_FORMAT) {
        return Some(day);
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}
