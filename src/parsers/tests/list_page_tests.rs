use crate::config::ListSelectors;
use crate::parsers::list::{NO_ITEMS_MESSAGE, parse_list_page};

const PAGE_URL: &str = "https://www.nowcoder.com/search/all?query=java&page=1";

#[test]
fn test_newest_markup_generation() {
    let html = r#"
    <html><body>
      <div class="tw-bg-white tw-mt-3 tw-rounded-xl">
        <div class="tw-px-5 tw-relative tw-pb-5 tw-pt-5">
          <a class="dy" href="/feed/main/detail/aaa">字节后端一面</a>
          <div class="feed-text">问了 Redis 和 MySQL</div>
          <span class="user-nickname">小明</span>
          <span class="show-time">03-02 10:15</span>
          <div class="feed-img"><img src="/img/1.png"><img data-src="https://cdn.nowcoder.com/2.png"></div>
        </div>
        <div class="tw-px-5 tw-relative tw-pb-5 tw-pt-5">
          <div class="feed-text">container without a title</div>
        </div>
        <div class="tw-px-5 tw-relative tw-pb-5 tw-pt-5">
          <div class="tw-text-lg tw-font-bold">阿里二面</div>
          <div class="tw-text-gray-800">preview from the gray block</div>
          <a href="https://www.nowcoder.com/feed/main/detail/bbb?sourceSSR=search">open</a>
        </div>
      </div>
      <div class="tw-px-5 tw-relative tw-pb-5 tw-cursor-pointer">
        <a class="dy" href="/feed/main/detail/older">older generation, not used</a>
      </div>
    </body></html>"#;

    let page = parse_list_page(html, PAGE_URL, &ListSelectors::default());
    assert_eq!(page.items.len(), 2);
    assert!(page.message.is_none());
    assert!(page.has_more);

    let first = &page.items[0];
    assert_eq!(first.title, "字节后端一面");
    assert_eq!(first.preview, "问了 Redis 和 MySQL");
    assert_eq!(first.link, "https://www.nowcoder.com/feed/main/detail/aaa");
    assert_eq!(first.author, "小明");
    assert_eq!(first.published_at, "03-02 10:15");
    assert_eq!(
        first.images,
        vec![
            "https://www.nowcoder.com/img/1.png".to_string(),
            "https://cdn.nowcoder.com/2.png".to_string()
        ]
    );
    assert_eq!(first.full_content, "");

    let second = &page.items[1];
    assert_eq!(second.title, "阿里二面");
    assert_eq!(second.preview, "preview from the gray block");
    assert_eq!(second.link, "https://www.nowcoder.com/feed/main/detail/bbb?sourceSSR=search");
    assert_eq!(second.author, "");
    assert!(second.images.is_empty());
}

#[test]
fn test_oldest_markup_generation() {
    let html = r#"
    <html><body>
      <div class="feed-item"><a class="dy" href="/discuss/1">first</a></div>
      <div class="feed-card"><a class="dy" href="/discuss/2">second</a></div>
      <div class="feed-main"><a class="dy" href="/discuss/3">third</a></div>
    </body></html>"#;

    let page = parse_list_page(html, PAGE_URL, &ListSelectors::default());
    let titles: Vec<&str> = page.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "second", "third"]);
    assert_eq!(page.items[1].link, "https://www.nowcoder.com/discuss/2");
}

#[test]
fn test_page_without_containers_is_not_an_error() {
    let html = "<html><body><p>请登录后查看</p></body></html>";
    let page = parse_list_page(html, PAGE_URL, &ListSelectors::default());
    assert!(page.items.is_empty());
    assert!(!page.has_more);
    assert_eq!(page.message.as_deref(), Some(NO_ITEMS_MESSAGE));
}

#[test]
fn test_appended_generation_is_used_as_fallback() {
    let mut selectors = ListSelectors::default();
    selectors.containers.push("li.post-row".to_string());
    selectors.title.push("h3".to_string());

    let html = r#"<ul><li class="post-row"><h3>custom markup</h3></li></ul>"#;
    let page = parse_list_page(html, PAGE_URL, &selectors);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].title, "custom markup");
    assert_eq!(page.items[0].link, "");
}
