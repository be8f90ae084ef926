//! 把 `DomPatch` 翻译成页面内执行的 JavaScript
//!
//! 所有参数都经过 JSON 序列化后嵌入脚本，文本统一通过 textContent 写入

use serde_json::Result;

use crate::models::{ContentBlock, DomPatch};

/// 提示框元素 id
pub const NOTICE_ELEMENT_ID: &str = "article-remix-notice";

/// 生成修改脚本，脚本返回是否找到了目标
pub fn build_script(patch: &DomPatch) -> Result<String> {
    let script = match patch {
        DomPatch::StyleHeading {
            selector,
            index,
            expected_text,
            text,
            style,
        } => format!(
            r#"
            (() => {{
                {resolve}
                if (!el) return false;
                el.textContent = {text};
                el.setAttribute('style', {style});
                el.setAttribute('data-article-remix', 'title');
                return true;
            }})()
            "#,
            resolve = resolve_script(selector, *index, expected_text)?,
            text = serde_json::to_string(text)?,
            style = serde_json::to_string(style)?,
        ),
        DomPatch::SetDocumentTitle { text } => format!(
            r#"
            (() => {{
                document.title = {text};
                return true;
            }})()
            "#,
            text = serde_json::to_string(text)?,
        ),
        DomPatch::ReplaceContainer {
            selector,
            index,
            expected_text,
            block,
        } => format!(
            r#"
            (() => {{
                {resolve}
                if (!el) return false;
                {build_block}
                el.replaceChildren(block);
                el.style.display = '';
                el.hidden = false;
                return true;
            }})()
            "#,
            resolve = resolve_script(selector, *index, expected_text)?,
            build_block = block_script(block)?,
        ),
        DomPatch::AppendBlock { block } => format!(
            r#"
            (() => {{
                {build_block}
                (document.body || document.documentElement).appendChild(block);
                return true;
            }})()
            "#,
            build_block = block_script(block)?,
        ),
        DomPatch::ShowNotice { id, message, kind } => format!(
            r#"
            (() => {{
                const existing = document.getElementById('{notice_id}');
                if (existing) existing.remove();
                const notice = document.createElement('div');
                notice.id = '{notice_id}';
                notice.dataset.noticeId = '{id}';
                notice.setAttribute('role', 'status');
                notice.style.cssText = 'position:fixed;top:20px;right:20px;z-index:2147483647;max-width:360px;padding:12px 40px 12px 16px;border-radius:6px;box-shadow:0 4px 12px rgba(0,0,0,.25);font:14px/1.4 sans-serif;color:#fff;background:{color};';
                const text = document.createElement('span');
                text.textContent = {message};
                const close = document.createElement('button');
                close.type = 'button';
                close.textContent = '×';
                close.setAttribute('aria-label', 'Dismiss');
                close.style.cssText = 'position:absolute;top:6px;right:8px;border:0;background:transparent;color:#fff;font-size:18px;cursor:pointer;';
                close.addEventListener('click', () => notice.remove());
                notice.appendChild(text);
                notice.appendChild(close);
                (document.body || document.documentElement).appendChild(notice);
                return true;
            }})()
            "#,
            notice_id = NOTICE_ELEMENT_ID,
            id = id,
            color = kind.color(),
            message = serde_json::to_string(message)?,
        ),
        DomPatch::DismissNotice { id } => format!(
            r#"
            (() => {{
                const notice = document.getElementById('{notice_id}');
                if (!notice) return false;
                const expected = {expected};
                if (expected !== null && notice.dataset.noticeId !== expected) return false;
                notice.remove();
                return true;
            }})()
            "#,
            notice_id = NOTICE_ELEMENT_ID,
            expected = serde_json::to_string(&id.map(|id| id.to_string()))?,
        ),
    };

    Ok(script)
}

/// 生成检查修改目标是否存在的脚本；不依赖已有元素的修改返回 None
pub fn build_locate_script(patch: &DomPatch) -> Result<Option<String>> {
    let (selector, index, expected_text) = match patch {
        DomPatch::StyleHeading {
            selector,
            index,
            expected_text,
            ..
        }
        | DomPatch::ReplaceContainer {
            selector,
            index,
            expected_text,
            ..
        } => (selector, *index, expected_text),
        _ => return Ok(None),
    };

    Ok(Some(format!(
        r#"
            (() => {{
                {resolve}
                return el !== undefined;
            }})()
            "#,
        resolve = resolve_script(selector, index, expected_text)?,
    )))
}

/// 定位目标元素，结果存放在 `el` 变量中
///
/// 下标处元素的文本开头不符时，改用第一个文本相符的匹配项；都不相符时仍用下标处元素
fn resolve_script(selector: &str, index: usize, expected_text: &str) -> Result<String> {
    Ok(format!(
        r#"const norm = (s) => (s || '').replace(/\s+/g, ' ').trim();
                const candidates = Array.from(document.querySelectorAll({selector}));
                const expected = {expected};
                let el = candidates[{index}];
                if (!el || !norm(el.textContent).startsWith(expected)) {{
                    el = candidates.find((c) => norm(c.textContent).startsWith(expected)) || el;
                }}"#,
        selector = serde_json::to_string(selector)?,
        index = index,
        expected = serde_json::to_string(expected_text)?,
    ))
}

/// 构造内容块的脚本片段，结果存放在 `block` 变量中
fn block_script(block: &ContentBlock) -> Result<String> {
    Ok(format!(
        r#"const block = document.createElement('div');
                block.className = 'article-remix-block';
                for (const line of {paragraphs}) {{
                    const p = document.createElement('p');
                    p.textContent = line;
                    block.appendChild(p);
                }}
                const signature = document.createElement('p');
                signature.className = 'article-remix-signature';
                signature.style.cssText = 'margin-top:2em;font-style:italic;opacity:.7;';
                signature.textContent = {signature};
                block.appendChild(signature);"#,
        paragraphs = serde_json::to_string(&block.paragraphs)?,
        signature = serde_json::to_string(&block.signature)?,
    ))
}
