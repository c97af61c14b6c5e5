//! End-to-end rendering tests for the stencil engine

use pretty_assertions::assert_eq;
use serde_json::json;
use stencil::{RenderError, Template, TemplateRegistry};

fn registry(templates: &[(&str, &str)]) -> TemplateRegistry {
    let mut registry = TemplateRegistry::new();
    for (name, source) in templates {
        registry.register(Template::new(*name, *source));
    }
    registry
}

#[test]
fn test_directive_free_template_is_identity() {
    let sources = [
        "",
        "plain text",
        "text with } braces { and # marks",
        "#{not closed",
    ];
    for source in sources {
        let out = stencil::render(source, &json!({"any": "data"})).expect("Should render");
        assert_eq!(out, source);
    }
}

#[test]
fn test_foreach_over_mapping_end_to_end() {
    let resolver = registry(&[("p", r##"<p id="#{@loop.index}">#{name}</p>"##)]);
    let template = Template::new("page", "#{render p foreach}");
    let data = json!({"a": {"name": "X"}, "b": {"name": "Y"}});
    let out = template.render(&data, &resolver).expect("Should render");
    assert_eq!(out, r#"<p id="a">X</p><p id="b">Y</p>"#);
}

#[test]
fn test_blog_page_composition() {
    let resolver = registry(&[
        ("blog/header", "<header>#{blog_title}</header>\n"),
        ("blog/footer", "<footer>#{year}</footer>"),
        (
            "blog/comment",
            "<li class=\"#{@loop.iteration}\">#{author}: #{text}</li>",
        ),
        (
            "blog/post",
            "#{include blog/header}<h1>#{title}</h1>\n<p>#{body}</p>\n<ol>#{render blog/comment foreach comments}</ol>\n#{include blog/footer}",
        ),
    ]);

    let data = json!({
        "blog_title": "My Blog",
        "year": 2014,
        "title": "Hello",
        "body": "First post.",
        "comments": [
            {"author": "ann", "text": "hi"},
            {"author": "bob", "text": "yo"},
        ],
    });

    let out = resolver
        .render("blog/post", &data)
        .expect("Should render");
    assert_eq!(
        out,
        "<header>My Blog</header>\n<h1>Hello</h1>\n<p>First post.</p>\n\
         <ol><li class=\"even\">ann: hi</li><li class=\"odd\">bob: yo</li></ol>\n\
         <footer>2014</footer>"
    );
}

#[test]
fn test_nested_directives_resolve_before_splicing() {
    // An included template whose own source contains a render directive must
    // fully resolve before its output lands in the parent.
    let resolver = registry(&[
        ("leaf", "[#{v}]"),
        ("middle", "m#{render leaf with inner}m"),
        ("top", "t#{include middle}t"),
    ]);
    let data = json!({"inner": {"v": 1}});
    let out = resolver.render("top", &data).expect("Should render");
    assert_eq!(out, "tm[1]mt");
}

#[test]
fn test_include_shares_context_render_narrows_it() {
    let resolver = registry(&[
        ("shared", "#{title}"),
        ("narrowed", "#{title}"),
    ]);
    let template = Template::new(
        "page",
        "#{include shared}/#{render narrowed with section}",
    );
    let data = json!({"title": "outer", "section": {"title": "inner"}});
    let out = template.render(&data, &resolver).expect("Should render");
    assert_eq!(out, "outer/inner");
}

#[test]
fn test_variables_injected_by_data_are_not_reinterpolated_by_sub_renders() {
    // A data value that happens to contain directive-looking text for an
    // unknown key ends up empty only where a pass actually scans it.
    let resolver = registry(&[("inner", "#{content}")]);
    let template = Template::new("page", "#{render inner}");
    let data = json!({"content": "#{missing}"});
    let out = template.render(&data, &resolver).expect("Should render");
    // The inner render's variable pass produced the text; the outer variable
    // pass then scans the spliced buffer and blanks the unknown key.
    assert_eq!(out, "");
}

#[test]
fn test_unknown_template_propagates_from_nested_render() {
    let resolver = registry(&[("outer", "#{include missing/part}")]);
    let err = resolver.render("outer", &json!({})).unwrap_err();
    match err {
        RenderError::UnknownTemplate { name } => assert_eq!(name, "missing/part"),
        other => panic!("Expected UnknownTemplate, got {:?}", other),
    }
}

#[test]
fn test_failed_render_produces_no_partial_output() {
    let resolver = registry(&[("page", "before #{include ghost} after")]);
    let result = resolver.render("page", &json!({}));
    assert!(result.is_err(), "render must abort, not emit partial text");
}

#[test]
fn test_template_names_with_paths_and_dots() {
    let resolver = registry(&[("widgets/nav-bar.v2", "nav")]);
    let template = Template::new("page", "#{render widgets/nav-bar.v2}");
    let out = template.render(&json!({}), &resolver).expect("Should render");
    assert_eq!(out, "nav");
}

#[test]
fn test_whitespace_inside_tags_is_insignificant() {
    let resolver = registry(&[("row", "#{v};")]);
    let template = Template::new(
        "page",
        "#{\n\trender row\n\tforeach\titems\n}#{  title\t}",
    );
    let data = json!({"items": [{"v": 1}], "title": "T"});
    let out = template.render(&data, &resolver).expect("Should render");
    assert_eq!(out, "1;T");
}
