//! Route table extraction for `list-routes`.
//!
//! The project urls module is read as text. Its `urlpatterns = [...]` list is
//! split into top-level `path(...)` / `re_path(...)` calls, `include('x.urls')`
//! entries are followed into `<root>/x/urls.py`, and the allowed methods are
//! guessed from the view expression.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::models::RouteEntry;
use crate::project::ProjectContext;
use crate::Result;

static URLPATTERNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"urlpatterns\s*=\s*\[").expect("urlpatterns pattern is valid")
});

static ROUTE_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(re_path|path)\s*\(").expect("route call pattern is valid")
});

const MAX_INCLUDE_DEPTH: usize = 8;

/// One `path(...)` call split into its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
struct RouteCall {
    regex: bool,
    pattern: String,
    view: String,
    name: String,
}

/// Collect every route reachable from the project urls module.
pub fn collect(ctx: &ProjectContext) -> Result<Vec<RouteEntry>> {
    let content = ctx.read(&ctx.urls_path)?;
    let mut routes = Vec::new();
    collect_module(ctx, &content, "", 0, &mut routes);
    debug!("Collected {} route(s)", routes.len());
    Ok(routes)
}

fn collect_module(ctx: &ProjectContext, content: &str, prefix: &str, depth: usize, out: &mut Vec<RouteEntry>) {
    let Some(body) = urlpatterns_body(content) else {
        warn!("No urlpatterns list found under prefix '{}'", prefix);
        return;
    };

    for call in route_calls(body).iter().filter_map(|c| parse_call(c)) {
        let pattern = format!("{}{}", prefix, clean_pattern(&call.pattern, call.regex));

        if let Some(module) = include_target(&call.view) {
            let path = module_path(ctx.root.as_path(), &module);
            if depth >= MAX_INCLUDE_DEPTH {
                warn!("Include depth limit reached at {}", module);
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(included) => collect_module(ctx, &included, &pattern, depth + 1, out),
                Err(e) => {
                    warn!("Cannot read included module {}: {}", path.display(), e);
                    out.push(RouteEntry {
                        pattern,
                        methods: "ANY".to_string(),
                        view: call.view.clone(),
                        name: call.name.clone(),
                    });
                }
            }
            continue;
        }

        out.push(RouteEntry {
            methods: methods_for(&call.view).to_string(),
            view: view_name(&call.view),
            name: call.name,
            pattern,
        });
    }
}

/// Text between `urlpatterns = [` and its matching `]`
fn urlpatterns_body(content: &str) -> Option<&str> {
    let found = URLPATTERNS.find(content)?;
    let open = found.end() - 1;
    let close = matching_close(content, open)?;
    Some(&content[open + 1..close])
}

/// Byte index of the bracket closing the one at `open`, skipping string literals and comments
fn matching_close(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = open;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == b'\\' {
                    i += 1;
                } else if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'\'' | b'"' => quote = Some(b),
                b'#' => {
                    while i < bytes.len() && bytes[i] != b'\n' {
                        i += 1;
                    }
                    continue;
                }
                b'(' | b'[' | b'{' => depth += 1,
                b')' | b']' | b'}' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }
    None
}

/// Top-level route calls of a urlpatterns body, each as `path(...)` text
fn route_calls(body: &str) -> Vec<&str> {
    let mut calls = Vec::new();
    let mut from = 0;

    while let Some(found) = ROUTE_CALL.find_at(body, from) {
        let open = found.end() - 1;
        if in_comment_or_string(&body[..found.start()]) {
            from = found.end();
            continue;
        }
        match matching_close(body, open) {
            Some(close) => {
                calls.push(&body[found.start()..=close]);
                from = close + 1;
            }
            None => break,
        }
    }
    calls
}

/// Whether text ending here leaves us inside a comment or an open string on the last line
fn in_comment_or_string(before: &str) -> bool {
    let line = before.rsplit('\n').next().unwrap_or_default();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in line.chars() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' => quote = Some(c),
                '#' => return true,
                _ => {}
            },
        }
    }
    quote.is_some()
}

/// Split on `sep` at nesting depth zero, outside string literals
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            _ if c == sep && depth == 0 => {
                parts.push(text[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    let last = text[start..].trim();
    if !last.is_empty() {
        parts.push(last);
    }
    parts
}

fn parse_call(call: &str) -> Option<RouteCall> {
    let open = call.find('(')?;
    let inner = call.get(open + 1..call.len() - 1)?;
    let args = split_top_level(inner, ',');

    let pattern = string_literal(args.first()?)?;
    let view = args.get(1)?.split_whitespace().collect::<Vec<_>>().join(" ");
    let name = args
        .iter()
        .skip(2)
        .find_map(|arg| {
            let (key, value) = arg.split_once('=')?;
            (key.trim() == "name").then(|| string_literal(value.trim())).flatten()
        })
        .unwrap_or_default();

    Some(RouteCall {
        regex: call.trim_start().starts_with("re_path"),
        pattern,
        view,
        name,
    })
}

/// Content of a Python string literal, accepting `r`/`u` prefixes
fn string_literal(text: &str) -> Option<String> {
    let text = text.trim().trim_start_matches(['r', 'u', 'R', 'U']);
    let quote = text.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let inner = text.strip_prefix(quote)?.strip_suffix(quote)?;
    Some(inner.to_string())
}

fn clean_pattern(pattern: &str, regex: bool) -> String {
    if regex {
        pattern.replace(['^', '$'], "")
    } else {
        pattern.to_string()
    }
}

/// Module named by `include('app.urls')`, if the view is an include
fn include_target(view: &str) -> Option<String> {
    let rest = view.strip_prefix("include")?.trim_start().strip_prefix('(')?;
    let first = split_top_level(rest.strip_suffix(')')?, ',').into_iter().next()?;
    if first.starts_with('(') {
        let tuple = first.trim_start_matches('(');
        return split_top_level(tuple, ',').first().and_then(|m| string_literal(m));
    }
    string_literal(first)
}

fn module_path(root: &Path, module: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in module.split('.') {
        path.push(segment);
    }
    path.set_extension("py");
    path
}

/// Methods a view accepts, guessed from its class name
pub fn methods_for(view: &str) -> &'static str {
    if view.contains("admin.site.urls") {
        return "ANY";
    }
    let name = view_name(view);
    if name.contains("Logout") {
        "POST"
    } else if ["Create", "Update", "Delete", "FormView", "Login", "PasswordChange"]
        .iter()
        .any(|k| name.contains(k))
    {
        "GET, POST"
    } else if ["ListView", "DetailView", "TemplateView", "RedirectView"]
        .iter()
        .any(|k| name.contains(k))
    {
        "GET"
    } else {
        "ANY"
    }
}

/// Class name for `views.X.as_view(...)`, dotted tail for function views
fn view_name(view: &str) -> String {
    let head = match view.find(".as_view") {
        Some(idx) => &view[..idx],
        None => view.split('(').next().unwrap_or(view),
    };
    if head.contains("admin.site") {
        return head.trim().to_string();
    }
    head.rsplit('.').next().unwrap_or(head).trim().to_string()
}

/// Fixed-width table of the routes
pub fn render_table(routes: &[RouteEntry]) -> String {
    let rule = "=".repeat(100);
    let mut out = format!(
        "{}\n{:<40} | {:<25} | {:<20} | {:<15}\n{}\n",
        rule,
        "URL PATTERN",
        "METHODS",
        "VIEW",
        "NAME",
        "-".repeat(100)
    );
    for route in routes {
        out.push_str(
            format!(
                "{:<40} | {:<25} | {:<20} | {:<15}",
                route.pattern, route.methods, route.view, route.name
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out.push_str(&rule);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::test_helpers::TestProject;

    #[test]
    fn test_route_calls_skip_comments_and_nesting() {
        let body = r#"
    path('a/', views.a, name='a'),
    # path('old/', views.old),
    path('b/', include([path('x/', views.x)])),
    re_path(r'^c/$', views.C.as_view(), name="c"),
"#;
        let calls = route_calls(body);
        assert_eq!(calls.len(), 3);
        assert!(calls[1].starts_with("path('b/'"));
        assert!(calls[1].ends_with("]))"));
    }

    #[test]
    fn test_parse_call() {
        let call = parse_call("path('post/<int:pk>/', views.PostDetailView.as_view(), name='post_detail')").unwrap();
        assert_eq!(call.pattern, "post/<int:pk>/");
        assert_eq!(call.view, "views.PostDetailView.as_view()");
        assert_eq!(call.name, "post_detail");

        let re = parse_call("re_path(r'^about/$', views.about)").unwrap();
        assert!(re.regex);
        assert_eq!(clean_pattern(&re.pattern, re.regex), "about/");
        assert_eq!(re.name, "");
    }

    #[test]
    fn test_methods_for() {
        assert_eq!(methods_for("views.PostListView.as_view()"), "GET");
        assert_eq!(methods_for("views.PostCreateView.as_view()"), "GET, POST");
        assert_eq!(methods_for("auth_views.LoginView.as_view(template_name='x.html')"), "GET, POST");
        assert_eq!(methods_for("auth_views.LogoutView.as_view(next_page='accounts:login')"), "POST");
        assert_eq!(methods_for("views.register"), "ANY");
        assert_eq!(methods_for("admin.site.urls"), "ANY");
    }

    #[test]
    fn test_include_target() {
        assert_eq!(include_target("include('blog.urls')").as_deref(), Some("blog.urls"));
        assert_eq!(
            include_target("include(('blog.urls', 'blog'), namespace='blog')").as_deref(),
            Some("blog.urls")
        );
        assert_eq!(include_target("views.index"), None);
    }

    #[test]
    fn test_collect_follows_includes() {
        let project = TestProject::django("school").unwrap();
        project
            .add_file(
                "school/urls.py",
                "from django.contrib import admin\nfrom django.urls import path, include\n\nurlpatterns = [\n    path('admin/', admin.site.urls),\n    path('blog/', include('blog.urls')),\n]\n",
            )
            .unwrap();
        project
            .add_file(
                "blog/urls.py",
                "from django.urls import path\nfrom . import views\n\napp_name = 'blog'\n\nurlpatterns = [\n    path('post/', views.PostListView.as_view(), name='post_list'),\n    path('post/<int:pk>/delete/', views.PostDeleteView.as_view(), name='post_delete'),\n]\n",
            )
            .unwrap();

        let routes = collect(&project.context()).unwrap();
        assert_eq!(routes.len(), 3);
        assert_eq!(routes[0].pattern, "admin/");
        assert_eq!(routes[0].view, "admin.site.urls");
        assert_eq!(routes[1].pattern, "blog/post/");
        assert_eq!(routes[1].methods, "GET");
        assert_eq!(routes[1].view, "PostListView");
        assert_eq!(routes[2].methods, "GET, POST");
        assert_eq!(routes[2].name, "post_delete");
    }

    #[test]
    fn test_render_table_alignment() {
        let routes = vec![RouteEntry {
            pattern: "blog/post/".to_string(),
            methods: "GET".to_string(),
            view: "PostListView".to_string(),
            name: "post_list".to_string(),
        }];
        let table = render_table(&routes);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("URL PATTERN"));
        assert_eq!(lines[3].find(" | GET"), Some(40));
    }
}
