//! HTML 页面渲染

use std::time::Duration;

use url::form_urlencoded;

use crate::app::catalog::service::CatalogController;
use crate::app::form::service::FormController;
use crate::core::notification::Notifier;

const STYLE: &str = r#"
body { font-family: sans-serif; max-width: 760px; margin: 2rem auto; color: #222; }
header { display: flex; justify-content: space-between; align-items: center; }
.btn { display: inline-block; padding: .4rem .9rem; border: 1px solid #888; border-radius: 4px; background: #f4f4f4; color: #222; text-decoration: none; cursor: pointer; }
.btn-delete { border-color: #c33; color: #c33; }
.product-item { border: 1px solid #ddd; border-radius: 6px; padding: 1rem; margin: .8rem 0; }
.product-label { font-size: .8rem; color: #777; }
.product-actions { margin-top: .6rem; }
.empty-state { text-align: center; color: #666; padding: 2rem; }
.modal { position: fixed; inset: 0; background: rgba(0,0,0,.4); display: flex; align-items: center; justify-content: center; }
.modal-content { background: #fff; padding: 1.5rem; border-radius: 6px; }
#toastContainer { position: fixed; top: 1rem; right: 1rem; }
.toast { padding: .7rem 1rem; margin-bottom: .5rem; border-radius: 4px; color: #fff; animation: toast-fade 0s linear forwards; }
.toast.success { background: #2a7; }
.toast.error { background: #c33; }
@keyframes toast-fade { to { opacity: 0; visibility: hidden; } }
label { display: block; margin-top: .8rem; }
input, textarea { width: 100%; padding: .4rem; }
"#;

/// HTML 转义
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// 拼接带查询参数的链接，参数值为空时省略
pub fn href_with(path: &str, params: &[(&str, &str)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params.iter().filter(|(_, value)| !value.is_empty()) {
        serializer.append_pair(key, value);
    }
    let query = serializer.finish();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}

fn page(title: &str, notifier: &Notifier, body: &str) -> String {
    let mut head = String::new();
    if let Some((href, due)) = notifier.pending_navigation() {
        head.push_str(&format!(
            r#"<meta http-equiv="refresh" content="{};url={}">"#,
            whole_seconds(due),
            escape_html(href)
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n{head}\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n{toasts}\n</body>\n</html>\n",
        title = escape_html(title),
        head = head,
        body = body,
        toasts = render_toasts(notifier),
    )
}

fn whole_seconds(due: Duration) -> u64 {
    (due.as_millis() as u64).div_ceil(1000).max(1)
}

fn render_toasts(notifier: &Notifier) -> String {
    let mut out = String::from(r#"<div id="toastContainer">"#);
    for toast in notifier.toasts() {
        let lifetime = notifier
            .remaining_lifetime(toast.id)
            .unwrap_or_default()
            .as_millis();
        out.push_str(&format!(
            r#"<div class="toast {kind}" style="animation-delay: {lifetime}ms">{message}</div>"#,
            kind = toast.kind.as_str(),
            lifetime = lifetime,
            message = escape_html(&toast.message),
        ));
    }
    out.push_str("</div>");
    out
}

/// 目录页
pub fn render_catalog(controller: &CatalogController) -> String {
    let filter = controller.current_filter();
    let mut body = String::new();

    body.push_str(&format!(
        r#"<header><h1>Products</h1><a id="createProductBtn" class="btn" href="/create">Create Product</a></header>
<form class="search" method="get" action="/">
<input id="searchInput" type="text" name="q" placeholder="Search by name" value="{filter}">
<button id="searchBtn" class="btn" type="submit">Search</button>
<a id="clearSearchBtn" class="btn" href="/">Clear</a>
</form>
<div id="productList">"#,
        filter = escape_html(filter),
    ));

    let visible = controller.visible();
    if visible.is_empty() {
        let (title, hint) = controller.empty_state();
        body.push_str(&format!(
            r#"<div class="empty-state"><h2>{}</h2><p>{}</p></div>"#,
            title, hint
        ));
    }

    for product in visible {
        let edit_href = href_with("/create", &[("id", product.id.as_str())]);
        let delete_href = href_with("/", &[("q", filter), ("delete", product.id.as_str())]);
        body.push_str(&format!(
            r#"<div class="product-item" data-id="{id}">
<div class="product-label">Name:</div><div class="product-name">{name}</div>
<div class="product-label">Description:</div><div class="product-description">{description}</div>
<div class="product-actions"><a class="btn btn-edit" href="{edit}">Edit</a> <a class="btn btn-delete" href="{delete}">Delete</a></div>
</div>"#,
            id = escape_html(&product.id),
            name = escape_html(&product.name),
            description = escape_html(&product.description),
            edit = escape_html(&edit_href),
            delete = escape_html(&delete_href),
        ));
    }
    body.push_str("</div>");

    if let Some(id) = controller.pending_delete() {
        let cancel_href = href_with("/", &[("q", filter)]);
        body.push_str(&format!(
            r#"<div id="deleteModal" class="modal active"><div class="modal-content">
<h2>Delete product?</h2><p>This action cannot be undone.</p>
<form method="post" action="/delete">
<input type="hidden" name="id" value="{id}">
<input type="hidden" name="q" value="{filter}">
<a id="cancelDeleteBtn" class="btn" href="{cancel}">Cancel</a>
<button id="confirmDeleteBtn" class="btn btn-delete" type="submit">Delete</button>
</form></div></div>"#,
            id = escape_html(id),
            filter = escape_html(filter),
            cancel = escape_html(&cancel_href),
        ));
    }

    page("Product Manager", controller.notifier(), &body)
}

/// 创建/编辑页
pub fn render_form(controller: &FormController) -> String {
    let editing_id = controller.editing_id().unwrap_or_default();
    let title = if controller.is_edit() {
        "Edit Product"
    } else {
        "Create Product"
    };
    let action = href_with("/create", &[("id", editing_id)]);

    let mut body = String::new();
    body.push_str(&format!(
        r#"<h1 id="pageTitle">{title}</h1>
<form id="productForm" method="post" action="{action}">
<label for="productName">Name</label>
<input id="productName" type="text" name="name" value="{name}">
<label for="productDescription">Description</label>
<textarea id="productDescription" name="description" rows="5">{description}</textarea>
<p><button class="btn" type="submit">Save</button> <a id="cancelBtn" class="btn" href="/">Cancel</a>"#,
        title = title,
        action = escape_html(&action),
        name = escape_html(controller.name()),
        description = escape_html(controller.description()),
    ));

    if controller.is_edit() {
        let confirm_href = href_with("/create", &[("id", editing_id), ("confirm_delete", "true")]);
        body.push_str(&format!(
            r#" <a id="deleteBtn" class="btn btn-delete" href="{}">Delete</a>"#,
            escape_html(&confirm_href)
        ));
    }
    body.push_str("</p>\n</form>");

    if controller.delete_state().pending_id().is_some() {
        let delete_action = href_with("/create/delete", &[("id", editing_id)]);
        let cancel_href = href_with("/create", &[("id", editing_id)]);
        body.push_str(&format!(
            r#"<div id="deleteModal" class="modal active"><div class="modal-content">
<h2>Delete product?</h2><p>This action cannot be undone.</p>
<form method="post" action="{action}">
<a id="cancelDeleteBtn" class="btn" href="{cancel}">Cancel</a>
<button id="confirmDeleteBtn" class="btn btn-delete" type="submit">Delete</button>
</form></div></div>"#,
            action = escape_html(&delete_action),
            cancel = escape_html(&cancel_href),
        ));
    }

    page(title, controller.notifier(), &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_href_with_skips_empty_values() {
        assert_eq!(href_with("/", &[("q", "")]), "/");
        assert_eq!(
            href_with("/", &[("q", "blue widget"), ("delete", "a&b")]),
            "/?q=blue+widget&delete=a%26b"
        );
    }

    #[test]
    fn test_whole_seconds_rounds_up() {
        assert_eq!(whole_seconds(Duration::from_millis(1000)), 1);
        assert_eq!(whole_seconds(Duration::from_millis(1500)), 2);
        assert_eq!(whole_seconds(Duration::ZERO), 1);
    }
}
