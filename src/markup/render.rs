use serde::{Deserialize, Serialize};

/// Kind written when the producer could not classify the image
pub const DEFAULT_IMAGE_KIND: &str = "图表/示意图";

/// Key elements preview length when none were supplied
const KEY_ELEMENTS_PREVIEW_CHARS: usize = 50;

/// Input for [`render_block`], typically an LLM-generated description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescription {
    pub kind: Option<String>,
    pub main_content: String,
    pub key_elements: Option<String>,
}

impl ImageDescription {
    pub fn new(main_content: impl Into<String>) -> Self {
        Self {
            main_content: main_content.into(),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_key_elements(mut self, key_elements: impl Into<String>) -> Self {
        self.key_elements = Some(key_elements.into());
        self
    }
}

/// Render a description in the marker syntax the extractor reads back.
///
/// Each field is forced onto a single line, since parsed values stop at
/// the end of the line.
pub fn render_block(description: &ImageDescription) -> String {
    let main_content = single_line(&description.main_content);
    let kind = description
        .kind
        .as_deref()
        .map(single_line)
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| DEFAULT_IMAGE_KIND.to_string());
    let key_elements = description
        .key_elements
        .as_deref()
        .map(single_line)
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| preview(&main_content));

    format!(
        "<!-- IMAGE_START -->\n\
         **[图片描述]**\n\
         - 图片类型: {kind}\n\
         - 主要内容: {main_content}\n\
         - 关键元素: {key_elements}\n\
         <!-- IMAGE_END -->"
    )
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn preview(text: &str) -> String {
    if text.chars().count() > KEY_ELEMENTS_PREVIEW_CHARS {
        let head: String = text.chars().take(KEY_ELEMENTS_PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
