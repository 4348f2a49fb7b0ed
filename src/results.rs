use serde::{Deserialize, Serialize};

/// Message used when a run finishes without anything more specific to say
pub const SUCCESS_MESSAGE: &str = "crawl succeeded";

/// One crawled item in its unified shape.
///
/// Every field is always present on the wire; unresolved values are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    #[serde(rename = "标题")]
    pub title: String,

    #[serde(rename = "内容预览")]
    pub preview: String,

    #[serde(rename = "链接")]
    pub link: String,

    #[serde(rename = "用户名")]
    pub author: String,

    #[serde(rename = "发布时间")]
    pub published_at: String,

    #[serde(rename = "完整内容")]
    pub full_content: String,

    #[serde(rename = "图片列表")]
    pub images: Vec<String>,

    /// Which strategy produced each field, only when debugging was requested
    #[serde(rename = "_debug", default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<Provenance>,
}

/// Strategy labels for the fields of a record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_from: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_from: Option<String>,
}

/// Output of one page or one search query round
#[derive(Debug, Clone, Default)]
pub struct PageResult {
    pub items: Vec<CanonicalRecord>,
    /// Page count reported by the upstream, when it reports one
    pub total_pages: Option<u32>,
    pub has_more: bool,
    /// Diagnostic for an empty page
    pub message: Option<String>,
}

/// `data` of a list response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListData {
    #[serde(rename = "列表")]
    pub items: Vec<CanonicalRecord>,

    #[serde(rename = "数量")]
    pub count: usize,
}

impl ListData {
    pub fn new(items: Vec<CanonicalRecord>) -> Self {
        let count = items.len();
        Self { items, count }
    }
}

/// Serialises as `{}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmptyData {}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseData {
    List(ListData),
    Detail(Box<CanonicalRecord>),
    Empty(EmptyData),
}

/// What the caller gets back for every request, successful or not
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrawlResponse {
    pub code: u16,
    pub data: ResponseData,
    #[serde(rename = "msg")]
    pub message: String,
}

impl CrawlResponse {
    pub fn list(items: Vec<CanonicalRecord>, message: impl Into<String>) -> Self {
        Self {
            code: 200,
            data: ResponseData::List(ListData::new(items)),
            message: message.into(),
        }
    }

    pub fn detail(record: CanonicalRecord, message: impl Into<String>) -> Self {
        Self {
            code: 200,
            data: ResponseData::Detail(Box::new(record)),
            message: message.into(),
        }
    }

    /// A failure that carries no data
    pub fn failure(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            data: ResponseData::Empty(EmptyData::default()),
            message: message.into(),
        }
    }

    /// A failed list crawl that keeps what earlier pages produced
    pub fn partial(code: u16, items: Vec<CanonicalRecord>, message: impl Into<String>) -> Self {
        Self {
            code,
            data: ResponseData::List(ListData::new(items)),
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == 200
    }

    /// Items of a list response; empty for other shapes
    pub fn items(&self) -> &[CanonicalRecord] {
        match &self.data {
            ResponseData::List(list) => &list.items,
            _ => &[],
        }
    }
}
