//! End-to-end conversion of the fixture site through the public API.
//!
//! Each test copies `fixtures/site/` into a temp directory, runs a
//! conversion, and inspects the generated HTML files.

use jemsite::config::{self, SiteConfig};
use jemsite::generate::{self, ConvertContext, ConvertOutcome};
use jemsite::{menu, output};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    for entry in fs::read_dir(fixtures).unwrap() {
        let entry = entry.unwrap();
        fs::copy(entry.path(), tmp.path().join(entry.file_name())).unwrap();
    }
    tmp
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()))
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

fn build(tmp: &TempDir) -> Vec<ConvertOutcome> {
    let config = config::load_config(tmp.path()).unwrap();
    generate::convert_manifest(tmp.path(), &config)
}

#[test]
fn batch_writes_only_present_pages() {
    let tmp = setup_site();
    build(&tmp);

    for name in ["index", "index_cn", "research", "contact"] {
        assert!(tmp.path().join(format!("{name}.html")).exists(), "{name}");
    }
    for name in ["research_cn", "publications", "teaching", "joinus_cn"] {
        assert!(!tmp.path().join(format!("{name}.html")).exists(), "{name}");
    }
}

#[test]
fn batch_output_lines_in_manifest_order() {
    let tmp = setup_site();
    let outcomes = build(&tmp);

    let lines: Vec<String> = outcomes
        .iter()
        .flat_map(|o| output::format_outcome(o, tmp.path()))
        .collect();
    assert_eq!(
        lines,
        vec![
            "Converted index.jemdoc to index.html",
            "Converted index_cn.jemdoc to index_cn.html",
            "Converted research.jemdoc to research.html",
            "Converted contact.jemdoc to contact.html",
        ]
    );
}

#[test]
fn home_page_content() {
    let tmp = setup_site();
    build(&tmp);
    let html = read(&tmp.path().join("index.html"));

    assert!(html.starts_with("<!DOCTYPE html PUBLIC"));
    assert!(html.contains(r#"xml:lang="en""#));
    assert!(html.contains(r#"<link rel="stylesheet" href="jemdoc.css" type="text/css" />"#));
    assert!(html.contains("<title>Alice Smith</title>"));
    assert!(html.contains("<h1>Alice Smith</h1>"));
    assert!(!html.contains("# Alice Smith"));

    // Image fence
    assert!(html.contains(
        r#"<img src="photo.jpg" alt="Alice Smith" width="120px" height="150px" />"#
    ));
    assert!(html.contains("<p><b>Associate Professor</b><br /></p>"));
    assert!(html.contains("<p>alice@uni.edu</p>"));
    assert!(!html.contains("~~~"));

    // Inline rules
    assert!(html.contains("<h2>About</h2>"));
    assert!(html.contains(
        r#"<p>I work on <i>programming languages</i> and <a href="research.html">compilers</a>.</p>"#
    ));
}

#[test]
fn home_page_nested_list() {
    let tmp = setup_site();
    build(&tmp);
    let html = read(&tmp.path().join("index.html"));

    let expected = "\
<ul>
<li>Paper accepted at <b>PLDI</b>.</li>
<li>New course on type systems.
<ul><li>Lecture notes online</li></ul>
<ul><li>Exercises weekly</li></ul>
</li>
<li>Hiring students, see <a href=\"contact.html\">contact</a>.</li>
</ul>";
    assert!(html.contains(expected), "got:\n{html}");
}

#[test]
fn list_tags_balance_on_every_page() {
    let tmp = setup_site();
    build(&tmp);

    for name in ["index", "index_cn", "research", "contact"] {
        let html = read(&tmp.path().join(format!("{name}.html")));
        assert_eq!(count(&html, "<ul>"), count(&html, "</ul>"), "{name}");
        assert_eq!(count(&html, "<ol>"), count(&html, "</ol>"), "{name}");
        assert_eq!(count(&html, "<li>"), count(&html, "</li>"), "{name}");
    }
}

#[test]
fn research_page_ordered_list_and_subheading() {
    let tmp = setup_site();
    build(&tmp);
    let html = read(&tmp.path().join("research.html"));

    assert!(html.contains(
        "<ol>\n<li>Gradual typing</li>\n<li>Incremental compilation</li>\n<li>Verified optimizers</li>\n</ol>"
    ));
    assert!(html.contains("<h3>Funding</h3>"));
    assert!(html.contains(r#"<a href="https://www.nsf.gov">NSF</a>"#));
    assert!(!html.contains("<i>"), "URL slashes must not become italics");
    assert!(html.contains(r#"<a href="research.html" class="current">Research</a>"#));
}

#[test]
fn chinese_page_uses_chinese_menu() {
    let tmp = setup_site();
    build(&tmp);
    let html = read(&tmp.path().join("index_cn.html"));

    assert!(html.contains(r#"xml:lang="zh-CN""#));
    assert!(html.contains("<title>史爱丽</title>"));
    assert!(html.contains(r#"<div class="menu-category">菜单</div>"#));
    assert!(html.contains(r#"<div class="menu-category">语言</div>"#));
    assert!(!html.contains(r#"<div class="menu-category">Menu</div>"#));
    assert!(!html.contains(r#"href="research.html""#));
    assert!(html.contains("<p>我的研究方向是<b>程序设计语言</b>。</p>"));
    assert!(html.contains("<ol>\n<li>编译器</li>\n<li>类型系统</li>\n</ol>"));
}

#[test]
fn english_page_has_one_switch_link() {
    let tmp = setup_site();
    build(&tmp);
    let html = read(&tmp.path().join("contact.html"));

    assert_eq!(count(&html, r#"href="index_cn.html""#), 1);
    assert!(!html.contains("contact_cn.html"));
    assert!(html.contains("<p>Email: alice@uni.edu<br /></p>"));
}

#[test]
fn config_limits_manifest_and_stylesheet() {
    let tmp = setup_site();
    fs::write(
        tmp.path().join("jemsite.toml"),
        "stylesheet = \"css/site.css\"\n\n[pages]\nnames = [\"contact\"]\n",
    )
    .unwrap();

    let outcomes = build(&tmp);

    assert_eq!(outcomes.len(), 2);
    assert!(!tmp.path().join("index.html").exists());
    let html = read(&tmp.path().join("contact.html"));
    assert!(html.contains(r#"href="css/site.css""#));
}

#[test]
fn invalid_config_is_rejected() {
    let tmp = setup_site();
    fs::write(tmp.path().join("jemsite.toml"), "stylesheets = \"x.css\"\n").unwrap();
    assert!(config::load_config(tmp.path()).is_err());
}

#[test]
fn single_file_with_output_override_and_default_title() {
    let tmp = setup_site();
    let input = tmp.path().join("notes.jemdoc");
    fs::write(&input, "- one\n- two\n").unwrap();
    let config = SiteConfig {
        default_title: "Notes".to_string(),
        ..SiteConfig::default()
    };
    let ctx = ConvertContext::new(tmp.path(), &config);
    let output_path = tmp.path().join("out/notes.html");

    let outcome = generate::convert_file(&input, &output_path, &ctx).unwrap();

    assert!(matches!(outcome, ConvertOutcome::Converted { .. }));
    let html = read(&output_path);
    assert!(html.contains("<title>Notes</title>"));
    assert_eq!(count(&html, "<ul>"), 1);
    assert_eq!(count(&html, "</ul>"), 1);
}

#[test]
fn menu_loads_and_serializes() {
    let tmp = setup_site();
    let entries = menu::load_menu(&tmp.path().join("MENU")).unwrap();
    let json = serde_json::to_value(&entries).unwrap();

    assert_eq!(json[0]["kind"], "category");
    assert_eq!(json[0]["name"], "Menu");
    assert_eq!(json[1]["kind"], "item");
    assert_eq!(json[1]["url"], "index.html");
    assert_eq!(json[1]["text"], "Home");
}
