//! 文章抽取服务 - 业务能力层
//!
//! 只负责从页面 HTML 中找出标题和正文，不关心流程

use scraper::{ElementRef, Html};

use crate::error::AppResult;
use crate::models::{ExtractionResult, SelectorConfig};
use crate::services::selector_table::{
    compile_all, element_text, is_heading, normalize_whitespace, CompiledSelector,
};

/// 标题来源，按顺序尝试直到拿到非空文本
#[derive(Debug, Clone)]
pub enum TitleSource {
    /// 标题元素（只接受 h1-h6）
    Heading(CompiledSelector),
    /// meta 标签的 content 属性
    Meta(CompiledSelector),
    /// 文档 `<title>`
    DocumentTitle(CompiledSelector),
}

impl TitleSource {
    pub fn extract(&self, document: &Html) -> Option<String> {
        match self {
            TitleSource::Heading(s) => document
                .select(&s.selector)
                .filter(is_heading)
                .map(|el| element_text(&el))
                .find(|text| !text.is_empty()),
            TitleSource::Meta(s) => document
                .select(&s.selector)
                .filter_map(|el| el.value().attr("content"))
                .map(normalize_whitespace)
                .find(|text| !text.is_empty()),
            TitleSource::DocumentTitle(s) => document
                .select(&s.selector)
                .map(|el| element_text(&el))
                .find(|text| !text.is_empty()),
        }
    }
}

/// 段落过滤阈值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentThreshold {
    pub min_chars: usize,
    pub min_words: usize,
}

impl FragmentThreshold {
    pub fn accepts(&self, text: &str) -> bool {
        text.chars().count() >= self.min_chars && text.split_whitespace().count() >= self.min_words
    }
}

/// 文章抽取服务
///
/// 职责：
/// - 按选择器表抽取标题
/// - 找到正文容器并过滤掉图注、广告等短片段
/// - 不修改页面
pub struct ArticleExtractor {
    title_sources: Vec<TitleSource>,
    body_containers: Vec<CompiledSelector>,
    paragraph: CompiledSelector,
    container_threshold: FragmentThreshold,
    document_threshold: FragmentThreshold,
}

impl ArticleExtractor {
    /// 根据选择器表创建抽取服务
    pub fn new(config: &SelectorConfig) -> AppResult<Self> {
        let mut title_sources: Vec<TitleSource> = compile_all(&config.title_selectors)?
            .into_iter()
            .map(TitleSource::Heading)
            .collect();
        title_sources.extend(
            compile_all(&config.title_meta_selectors)?
                .into_iter()
                .map(TitleSource::Meta),
        );
        title_sources.push(TitleSource::DocumentTitle(CompiledSelector::parse(
            "head > title, title",
        )?));

        Ok(Self {
            title_sources,
            body_containers: compile_all(&config.body_containers)?,
            paragraph: CompiledSelector::parse(&config.paragraph_selector)?,
            container_threshold: FragmentThreshold {
                min_chars: config.container_min_chars,
                min_words: 0,
            },
            document_threshold: FragmentThreshold {
                min_chars: config.document_min_chars,
                min_words: config.document_min_words,
            },
        })
    }

    /// 一次解析同时抽取标题和正文
    pub fn extract(&self, html: &str) -> ExtractionResult {
        let document = Html::parse_document(html);
        ExtractionResult {
            title: self.title_from(&document),
            body: self.body_from(&document),
        }
    }

    /// 抽取标题
    pub fn extract_title(&self, html: &str) -> Option<String> {
        self.title_from(&Html::parse_document(html))
    }

    /// 抽取正文，段落之间用空行分隔
    pub fn extract_body(&self, html: &str) -> Option<String> {
        self.body_from(&Html::parse_document(html))
    }

    /// 标题来源列表（按优先级）
    pub fn title_sources(&self) -> &[TitleSource] {
        &self.title_sources
    }

    fn title_from(&self, document: &Html) -> Option<String> {
        self.title_sources
            .iter()
            .find_map(|source| source.extract(document))
    }

    fn body_from(&self, document: &Html) -> Option<String> {
        // 第一个找到的容器决定正文，即使其中没有合格段落
        let container = self
            .body_containers
            .iter()
            .find_map(|c| document.select(&c.selector).next());

        let fragments = match container {
            Some(container) => self.fragments(
                container.select(&self.paragraph.selector),
                self.container_threshold,
            ),
            // 没有容器时扫描整个文档，阈值更严格
            None => self.fragments(
                document.select(&self.paragraph.selector),
                self.document_threshold,
            ),
        };

        if fragments.is_empty() {
            None
        } else {
            Some(fragments.join("\n\n"))
        }
    }

    fn fragments<'a>(
        &self,
        paragraphs: impl Iterator<Item = ElementRef<'a>>,
        threshold: FragmentThreshold,
    ) -> Vec<String> {
        paragraphs
            .map(|p| element_text(&p))
            .filter(|text| threshold.accepts(text))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_1: &str =
        "The annual national dog show crowned a golden retriever from a small town as its champion.";
    const LONG_2: &str =
        "Buddy, a six year old retriever, impressed judges with his calm temperament and perfect gait.";
    const CAPTION: &str = "Photo: Buddy on stage (AP) ok"; // 29 字符

    fn extractor() -> ArticleExtractor {
        ArticleExtractor::new(&SelectorConfig::default()).unwrap()
    }

    fn page(head: &str, body: &str) -> String {
        format!("<html><head>{head}</head><body>{body}</body></html>")
    }

    #[test]
    fn test_extracts_title_and_body_from_article() {
        let html = page(
            "<title>Site | Dog</title>",
            &format!(
                "<nav><p>Home</p></nav>\
                 <article><h1 class=\"headline\">  Local Dog\n Wins Show </h1>\
                 <p>{LONG_1}</p><p>{CAPTION}</p><p>{LONG_2}</p></article>"
            ),
        );

        let result = extractor().extract(&html);

        assert_eq!(result.title.as_deref(), Some("Local Dog Wins Show"));
        assert_eq!(result.body, Some(format!("{LONG_1}\n\n{LONG_2}")));
        assert!(result.is_complete());
    }

    #[test]
    fn test_short_caption_is_dropped_in_container() {
        assert!(CAPTION.chars().count() < 50);
        let html = page("", &format!("<article><p>{CAPTION}</p><p>{LONG_1}</p></article>"));

        let body = extractor().extract_body(&html).unwrap();
        assert!(!body.contains("Photo:"));
        assert_eq!(body, LONG_1);
    }

    #[test]
    fn test_title_priority_order() {
        let html = page(
            "",
            "<h1>Generic heading</h1><article><h1>Article heading</h1></article>\
             <h1 class=\"article-title\">Specific heading</h1>",
        );
        assert_eq!(
            extractor().extract_title(&html).as_deref(),
            Some("Specific heading")
        );
    }

    #[test]
    fn test_empty_heading_is_skipped() {
        let html = page("", "<h1 class=\"headline\">   </h1><h1>Fallback heading</h1>");
        assert_eq!(
            extractor().extract_title(&html).as_deref(),
            Some("Fallback heading")
        );
    }

    #[test]
    fn test_non_heading_match_is_ignored() {
        let config = SelectorConfig {
            title_selectors: vec![".title".to_string()],
            title_meta_selectors: vec![],
            ..SelectorConfig::default()
        };
        let extractor = ArticleExtractor::new(&config).unwrap();
        let html = page(
            "<title>Doc title</title>",
            "<div class=\"title\">Not a heading</div>",
        );

        assert_eq!(extractor.extract_title(&html).as_deref(), Some("Doc title"));
    }

    #[test]
    fn test_meta_title_fallback() {
        let html = page(
            "<meta property=\"og:title\" content=\"  OG Title \"><title>Doc</title>",
            "<div>no headings</div>",
        );
        assert_eq!(extractor().extract_title(&html).as_deref(), Some("OG Title"));
    }

    #[test]
    fn test_document_title_fallback() {
        let html = page("<title>Only the document title</title>", "<div></div>");
        assert_eq!(
            extractor().extract_title(&html).as_deref(),
            Some("Only the document title")
        );
    }

    #[test]
    fn test_no_title_anywhere() {
        let html = page("", "<div>text</div>");
        assert_eq!(extractor().extract_title(&html), None);
    }

    #[test]
    fn test_each_title_source_individually() {
        let extractor = extractor();
        let html = Html::parse_document(&page(
            "<meta name=\"twitter:title\" content=\"Tw\"><title>Doc</title>",
            "<header><h1>Header</h1></header>",
        ));

        let results: Vec<Option<String>> = extractor
            .title_sources()
            .iter()
            .map(|s| s.extract(&html))
            .collect();

        assert!(results.iter().any(|r| r.as_deref() == Some("Header")));
        assert!(results.iter().any(|r| r.as_deref() == Some("Tw")));
        assert_eq!(results.last().unwrap().as_deref(), Some("Doc"));
    }

    #[test]
    fn test_first_container_found_decides_body() {
        let html = page(
            "",
            &format!(
                "<article><p>{CAPTION}</p></article>\
                 <div class=\"article-body\"><p>{LONG_2}</p></div>"
            ),
        );
        // article 排在 .article-body 前面，里面只有图注
        assert_eq!(extractor().extract_body(&html), None);
    }

    #[test]
    fn test_later_container_used_when_earlier_absent() {
        let html = page(
            "",
            &format!("<div class=\"story-body\"><p>{CAPTION}</p><p>{LONG_2}</p></div><p>{LONG_1}</p>"),
        );
        assert_eq!(extractor().extract_body(&html).as_deref(), Some(LONG_2));
    }

    #[test]
    fn test_document_fallback_uses_stricter_threshold() {
        let long_enough = format!("{LONG_1} {LONG_2}");
        let html = page(
            "",
            &format!("<div><p>{LONG_1}</p><p>{long_enough}</p></div>"),
        );

        // LONG_1 不足 100 字符，只有拼接后的段落保留
        assert!(LONG_1.chars().count() < 100);
        assert_eq!(
            extractor().extract_body(&html).as_deref(),
            Some(long_enough.as_str())
        );
    }

    #[test]
    fn test_no_body() {
        let html = page("", &format!("<div><p>{CAPTION}</p></div>"));
        assert_eq!(extractor().extract_body(&html), None);
        assert!(!extractor().extract(&html).is_complete());
    }
}
