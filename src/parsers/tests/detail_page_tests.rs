use crate::config::DetailSelectors;
use crate::parsers::detail::parse_detail_page;

const DETAIL_URL: &str = "https://www.nowcoder.com/feed/main/detail/abc?source=search";

fn long_json_content() -> String {
    "完整的面经正文".repeat(30)
}

#[test]
fn test_dom_title_and_content() {
    let html = r#"
    <html><head><meta property="og:title" content="meta title"></head><body>
      <section>
        <h1 class="tw-text-size-title-lg-pure">腾讯 PCG 面经</h1>
        <div class="feed-content-text">一面问了操作系统、网络和项目细节。</div>
        <div class="feed-img"><img data-original="/pic/a.jpg"><img srcset="https://cdn.x/b.jpg 2x"></div>
      </section>
    </body></html>"#;

    let page = parse_detail_page(html, DETAIL_URL, &DetailSelectors::default());
    assert_eq!(page.title, "腾讯 PCG 面经");
    assert_eq!(page.content, "一面问了操作系统、网络和项目细节。");
    assert_eq!(
        page.images,
        vec![
            "https://www.nowcoder.com/pic/a.jpg".to_string(),
            "https://cdn.x/b.jpg".to_string()
        ]
    );
    assert_eq!(
        page.provenance.title_from.as_deref(),
        Some("h1.tw-text-size-title-lg-pure")
    );
    assert_eq!(
        page.provenance.content_from.as_deref(),
        Some("section .feed-content-text")
    );
}

#[test]
fn test_short_dom_content_loses_to_longer_json() {
    let json_content = long_json_content();
    let html = format!(
        r#"<html><body>
        <h1 class="feed-title">标题</h1>
        <div class="feed-content-text">短内容啊</div>
        <script id="__NEXT_DATA__" type="application/json">{{"props": {{"post": {{"content": "{json_content}"}}}}}}</script>
        </body></html>"#
    );

    let page = parse_detail_page(&html, DETAIL_URL, &DetailSelectors::default());
    assert_eq!(page.content.chars().count(), json_content.chars().count());
    assert_eq!(page.content, json_content);
    assert_eq!(page.provenance.content_from.as_deref(), Some("inline JSON"));
}

#[test]
fn test_five_chars_versus_two_hundred() {
    let candidate = "x".repeat(200);
    let html = format!(
        r#"<html><body>
        <h1 class="title">t</h1>
        <div class="feed-content-text">12345</div>
        <script>window.__INITIAL_STATE__ = {{"detail": {{"fullContent": "{candidate}"}}}};</script>
        </body></html>"#
    );
    let page = parse_detail_page(&html, DETAIL_URL, &DetailSelectors::default());
    assert_eq!(page.content, candidate);
}

#[test]
fn test_long_dom_content_is_kept() {
    let html = r#"<html><body>
        <article>this body is comfortably longer than the threshold</article>
        <script type="application/json">{"content": "an even longer body that must not replace the DOM text at all"}</script>
        </body></html>"#;
    let page = parse_detail_page(html, DETAIL_URL, &DetailSelectors::default());
    assert_eq!(page.content, "this body is comfortably longer than the threshold");
    assert_eq!(
        page.provenance.content_from.as_deref(),
        Some("div.rich-text, article, div.post-content")
    );
}

#[test]
fn test_shorter_json_never_replaces_dom() {
    let html = r#"<html><body>
        <div class="post-content">abcdefg</div>
        <script type="application/json">{"text": "abc"}</script>
        </body></html>"#;
    let page = parse_detail_page(html, DETAIL_URL, &DetailSelectors::default());
    assert_eq!(page.content, "abcdefg");
}

#[test]
fn test_title_falls_back_to_meta_then_json() {
    let with_meta = r#"<html><head><meta property="og:title" content=" 来自 meta "></head>
        <body><div class="feed-content-text">正文内容足够长足够长足够长</div></body></html>"#;
    let page = parse_detail_page(with_meta, DETAIL_URL, &DetailSelectors::default());
    assert_eq!(page.title, "来自 meta");

    let json_only = r#"<html><body>
        <script type="application/json">{"seo": {"seoTitle": "来自 JSON"}, "content": "x"}</script>
        </body></html>"#;
    let page = parse_detail_page(json_only, DETAIL_URL, &DetailSelectors::default());
    assert_eq!(page.title, "来自 JSON");
    assert_eq!(page.content, "x");
    assert_eq!(page.provenance.title_from.as_deref(), Some("inline JSON"));
}

#[test]
fn test_empty_page_resolves_to_empty_fields() {
    let page = parse_detail_page("<html></html>", DETAIL_URL, &DetailSelectors::default());
    assert_eq!(page.title, "");
    assert_eq!(page.content, "");
    assert!(page.images.is_empty());
    assert_eq!(page.provenance.title_from, None);
}

#[test]
fn test_into_record_carries_provenance_only_in_debug() {
    let html = r#"<html><body><h1 class="title">T</h1></body></html>"#;
    let page = parse_detail_page(html, DETAIL_URL, &DetailSelectors::default());

    let plain = page.clone().into_record(DETAIL_URL, false);
    assert_eq!(plain.title, "T");
    assert_eq!(plain.link, DETAIL_URL);
    assert!(plain.debug.is_none());

    let debug = page.into_record(DETAIL_URL, true);
    assert_eq!(
        debug.debug.and_then(|d| d.title_from).as_deref(),
        Some("h1.feed-title, h1.post-title, h1.title")
    );
}
