use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Hot,
    New,
    Top,
    Rising,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::New => "new",
            Self::Top => "top",
            Self::Rising => "rising",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentSort {
    Top,
    New,
    Controversial,
}

impl CommentSort {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::New => "new",
            Self::Controversial => "controversial",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeedQuery {
    pub sort: Option<SortKey>,
    /// Reads the submolt's own feed instead of the global one.
    pub submolt: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct PostDraft {
    pub submolt: String,
    pub title: String,
    pub content: Option<String>,
    pub url: Option<String>,
}

impl PostDraft {
    pub fn text(
        submolt: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            submolt: submolt.into(),
            title: title.into(),
            content: Some(content.into()),
            url: None,
        }
    }

    pub fn link(submolt: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            submolt: submolt.into(),
            title: title.into(),
            content: None,
            url: Some(url.into()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewSubmolt {
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
}

/// Search results, plus a submolt feed when one was requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Discovery {
    pub results: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed: Option<Vec<Value>>,
}
