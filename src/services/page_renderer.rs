//! 页面渲染服务 - 业务能力层
//!
//! 根据当前 HTML 决定改写哪个元素，产出 `DomPatch`，不直接接触页面
//!
//! 下标和结构路径都是在快照的重新解析结果上算出的。脚本生成的 DOM 经过 HTML
//! 解析器后可能被重排（例如 `<p>` 里的 `<div>`），实时页面上的下标随之偏移，
//! 因此每个目标还带上文本开头，页面脚本优先按文本重新定位

use scraper::{ElementRef, Html};

use crate::error::AppResult;
use crate::models::{ContentBlock, DomPatch, SelectorConfig};
use crate::services::selector_table::{compile_all, element_text, is_heading, CompiledSelector};

/// 改写后标题的样式
pub const TITLE_STYLE: &str =
    "color:#c0392b;font-style:italic;letter-spacing:.02em;text-shadow:1px 1px 2px rgba(0,0,0,.2);";

/// 目标文本开头保留的字符数
const EXPECTED_TEXT_CHARS: usize = 80;

/// 歌词末尾的署名
pub const SIGNATURE: &str = "🎬 Rewritten as a movie soundtrack by Article Remix";

/// 页面渲染服务
pub struct PageRenderer {
    headings: Vec<CompiledSelector>,
    containers: Vec<CompiledSelector>,
    paragraph: CompiledSelector,
    min_paragraph_chars: usize,
}

impl PageRenderer {
    pub fn new(config: &SelectorConfig) -> AppResult<Self> {
        Ok(Self {
            headings: compile_all(&config.title_selectors)?,
            containers: compile_all(&config.render_containers)?,
            paragraph: CompiledSelector::parse(&config.paragraph_selector)?,
            min_paragraph_chars: config.container_min_chars,
        })
    }

    /// 改写标题
    ///
    /// 按抽取时的优先级找到第一个标题元素（空标题也算）；页面上没有标题元素时只改文档标题
    pub fn render_title(&self, html: &str, text: &str) -> DomPatch {
        let document = Html::parse_document(html);

        for heading in &self.headings {
            let found = document
                .select(&heading.selector)
                .enumerate()
                .find(|(_, el)| is_heading(el));
            if let Some((index, element)) = found {
                return DomPatch::StyleHeading {
                    selector: heading.source.clone(),
                    index,
                    expected_text: expected_text(&element),
                    text: text.to_string(),
                    style: TITLE_STYLE.to_string(),
                };
            }
        }

        DomPatch::SetDocumentTitle {
            text: text.to_string(),
        }
    }

    /// 改写正文
    ///
    /// 渲染容器表中第一个匹配的元素胜出，即使它是空的或被隐藏；
    /// 其次是直接包含最多段落的元素；都没有时追加到页面末尾
    pub fn render_body(&self, html: &str, text: &str) -> DomPatch {
        let block = ContentBlock::from_text(text, SIGNATURE);
        let document = Html::parse_document(html);

        for container in &self.containers {
            if let Some(element) = document.select(&container.selector).next() {
                return DomPatch::ReplaceContainer {
                    selector: container.source.clone(),
                    index: 0,
                    expected_text: expected_text(&element),
                    block,
                };
            }
        }

        match self.densest_paragraph_parent(&document) {
            Some(parent) => DomPatch::ReplaceContainer {
                selector: css_path(parent),
                index: 0,
                expected_text: expected_text(&parent),
                block,
            },
            None => DomPatch::AppendBlock { block },
        }
    }

    /// 直接包含最多合格段落的元素，并列时取文档中靠前的
    fn densest_paragraph_parent<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        let mut counts: Vec<(ElementRef<'a>, usize)> = Vec::new();

        for paragraph in document.select(&self.paragraph.selector) {
            if element_text(&paragraph).chars().count() < self.min_paragraph_chars {
                continue;
            }
            let Some(parent) = paragraph.parent().and_then(ElementRef::wrap) else {
                continue;
            };
            match counts.iter_mut().find(|(el, _)| el.id() == parent.id()) {
                Some((_, count)) => *count += 1,
                None => counts.push((parent, 1)),
            }
        }

        let mut best: Option<(ElementRef<'a>, usize)> = None;
        for (element, count) in counts {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((element, count));
            }
        }
        best.map(|(element, _)| element)
    }
}

/// 元素文本的开头，用于在实时页面上核对目标
fn expected_text(element: &ElementRef) -> String {
    element_text(element)
        .chars()
        .take(EXPECTED_TEXT_CHARS)
        .collect()
}

/// 元素在文档中的结构路径，如 `html > body:nth-child(2) > div:nth-child(3)`
pub fn css_path(element: ElementRef) -> String {
    let mut segments = Vec::new();
    let mut current = Some(element);

    while let Some(el) = current {
        let name = el.value().name();
        if name == "html" {
            segments.push(name.to_string());
            break;
        }
        let position = el
            .prev_siblings()
            .filter(|node| node.value().is_element())
            .count()
            + 1;
        segments.push(format!("{name}:nth-child({position})"));
        current = el.parent().and_then(ElementRef::wrap);
    }

    segments.reverse();
    segments.join(" > ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;

    const PARAGRAPH: &str =
        "A paragraph long enough to count as article text rather than a caption or link.";

    fn renderer() -> PageRenderer {
        PageRenderer::new(&SelectorConfig::default()).unwrap()
    }

    fn page(body: &str) -> String {
        format!("<html><head><title>Doc</title></head><body>{body}</body></html>")
    }

    #[test]
    fn test_title_targets_first_heading_by_priority() {
        let html = page("<h1>Site name</h1><article><h1></h1></article>");

        let patch = renderer().render_title(&html, "Buddy: The Golden Heart");

        assert_eq!(
            patch,
            DomPatch::StyleHeading {
                selector: "article h1".to_string(),
                index: 0,
                expected_text: String::new(),
                text: "Buddy: The Golden Heart".to_string(),
                style: TITLE_STYLE.to_string(),
            }
        );
    }

    #[test]
    fn test_title_index_skips_non_headings() {
        let config = SelectorConfig {
            title_selectors: vec![".headline".to_string()],
            ..SelectorConfig::default()
        };
        let renderer = PageRenderer::new(&config).unwrap();
        let html = page("<div class=\"headline\">kicker</div><h2 class=\"headline\">Real</h2>");

        match renderer.render_title(&html, "New") {
            DomPatch::StyleHeading {
                selector,
                index,
                expected_text,
                ..
            } => {
                assert_eq!(selector, ".headline");
                assert_eq!(index, 1);
                assert_eq!(expected_text, "Real");
            }
            other => panic!("unexpected patch: {other:?}"),
        }
    }

    #[test]
    fn test_title_without_heading_sets_document_title() {
        let html = page("<div>No headings here</div>");
        assert_eq!(
            renderer().render_title(&html, "Movie"),
            DomPatch::SetDocumentTitle {
                text: "Movie".to_string()
            }
        );
    }

    #[test]
    fn test_body_accepts_empty_hidden_container() {
        let html = page(&format!(
            "<article><p>{PARAGRAPH}</p></article>\
             <div class=\"article-body\" style=\"display:none\"></div>"
        ));

        match renderer().render_body(&html, "Verse\n\nChorus") {
            DomPatch::ReplaceContainer {
                selector,
                index,
                block,
                ..
            } => {
                // 渲染表中 .article-body 排在 article 之前
                assert_eq!(selector, ".article-body");
                assert_eq!(index, 0);
                assert_eq!(block.paragraphs, vec!["Verse", "Chorus"]);
                assert_eq!(block.signature, SIGNATURE);
            }
            other => panic!("unexpected patch: {other:?}"),
        }
    }

    #[test]
    fn test_body_falls_back_to_densest_paragraph_parent() {
        let html = page(&format!(
            "<div class=\"sidebar\"><p>{PARAGRAPH}</p></div>\
             <div class=\"story\"><p>{PARAGRAPH}</p><p>{PARAGRAPH}</p><p>short</p></div>"
        ));

        let patch = renderer().render_body(&html, "Lyrics");
        let DomPatch::ReplaceContainer {
            selector,
            expected_text,
            ..
        } = patch
        else {
            panic!("expected container replacement");
        };
        assert_eq!(selector, "html > body:nth-child(2) > div:nth-child(2)");
        assert!(expected_text.starts_with("A paragraph long enough"));
        assert_eq!(expected_text.chars().count(), EXPECTED_TEXT_CHARS);

        // 生成的路径必须能重新选中同一个元素
        let document = Html::parse_document(&html);
        let selected = document
            .select(&Selector::parse(&selector).unwrap())
            .next()
            .unwrap();
        assert_eq!(selected.value().attr("class"), Some("story"));
    }

    #[test]
    fn test_body_appends_when_nothing_qualifies() {
        let html = page("<div><span>nothing</span><p>tiny</p></div>");
        match renderer().render_body(&html, "one\ntwo") {
            DomPatch::AppendBlock { block } => {
                assert_eq!(block.paragraphs, vec!["one", "two"]);
            }
            other => panic!("unexpected patch: {other:?}"),
        }
    }
}
