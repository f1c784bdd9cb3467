use page_loader_core::{derive_from_url, filename_for, resources_dir_for, PageNames};
use pretty_assertions::assert_eq;

#[test]
fn derived_name_drops_scheme_and_replaces_punctuation() {
    assert_eq!(derive_from_url("https://ru.hexlet.io/courses"), "ru-hexlet-io-courses");
    assert_eq!(derive_from_url("http://ex.com:8080/a/b"), "ex-com-8080-a-b");
    assert_eq!(derive_from_url("https://ex.com/p"), "ex-com-p");
}

#[test]
fn derived_name_has_no_trailing_separator() {
    assert_eq!(derive_from_url("https://ex.com/p/"), "ex-com-p");
    assert_eq!(derive_from_url("https://ex.com/p//?#"), "ex-com-p");
    assert_eq!(derive_from_url("https://ex.com/my_page.html"), "ex-com-my-page-html");
}

#[test]
fn derived_name_is_stable_and_filesystem_safe() {
    let urls = [
        "https://ex.com/p",
        "https://ex.com/some path/with spaces?q=1&x=2#frag",
        "https://пример.рф/страница",
        "https://ex.com/a_b/c~d/",
        "not a url at all",
    ];
    for url in urls {
        let first = derive_from_url(url);
        assert_eq!(first, derive_from_url(url));
        assert!(
            first.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'),
            "{first:?} from {url}"
        );
        assert!(!first.ends_with('-'), "{first:?} from {url}");
    }
}

#[test]
fn resources_dir_appends_files_suffix() {
    for url in ["https://ex.com/p", "https://site.test/index.html", "http://a.b/"] {
        assert_eq!(resources_dir_for(url), format!("{}_files", derive_from_url(url)));
    }
}

#[test]
fn filename_joins_path_segments_behind_page_name() {
    assert_eq!(filename_for("/a.png", "ex-com-p"), "ex-com-p-a-png");
    assert_eq!(
        filename_for("https://ex.com/assets//css/main.css", "ex-com-p"),
        "ex-com-p-assets-css-main-css"
    );
    assert_eq!(filename_for("img/logo.svg?v=2", "base"), "base-img-logo-svg");
}

#[test]
fn filename_falls_back_for_empty_path() {
    assert_eq!(filename_for("/", "ex-com-p"), "index.html");
    assert_eq!(filename_for("https://ex.com", "ex-com-p"), "index.html");
    assert_eq!(filename_for("?only=query", "ex-com-p"), "index.html");
}

#[test]
fn filename_is_idempotent() {
    let first = filename_for("/scripts/app.js", "site-test");
    assert_eq!(first, filename_for("/scripts/app.js", "site-test"));
}

#[test]
fn query_only_differences_collide() {
    assert_eq!(
        filename_for("/img?id=1", "base"),
        filename_for("/img?id=2", "base")
    );
}

#[test]
fn page_names_compose_local_reference() {
    let names = PageNames::for_page("https://ex.com/p");
    assert_eq!(names.base_name, "ex-com-p");
    assert_eq!(names.resources_dir, "ex-com-p_files");
    assert_eq!(names.html_filename(), "ex-com-p.html");
    assert_eq!(names.local_reference("/a.png"), "ex-com-p_files/ex-com-p-a-png");
}
