use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use nowcoder_crawl::RequestParams;

#[derive(Parser, Debug)]
#[command(name = "nowcoder-crawl")]
#[command(about = "Extracts posts from nowcoder.com search results, list pages and post pages")]
#[command(version)]
pub struct Args {
    /// Target link: a search page, list page, search endpoint or single post
    #[arg(long)]
    pub url: Option<String>,

    /// Search keyword (uses the JSON search endpoint)
    #[arg(short, long)]
    pub query: Option<String>,

    /// Force list or detail mode instead of inferring it
    #[arg(long = "type", value_enum)]
    pub type_: Option<ModeArg>,

    /// Skip fetching each item's detail page
    #[arg(long)]
    pub no_detail: bool,

    /// First page to fetch
    #[arg(long)]
    pub page: Option<i64>,

    /// Number of pages to walk
    #[arg(long)]
    pub pages: Option<i64>,

    /// Items per page (rendered pages cap at 30, the search endpoint at 50)
    #[arg(long)]
    pub limit: Option<i64>,

    /// Session cookie sent with every request
    #[arg(long)]
    pub cookie: Option<String>,

    /// Attach field provenance to every record
    #[arg(long)]
    pub debug: bool,

    /// Pause between detail fetches in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// JSON file with crawler settings
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    List,
    Detail,
}

impl Args {
    /// Converts the command line into the same parameters a query string carries
    pub fn to_params(&self) -> RequestParams {
        RequestParams {
            url: self.url.clone(),
            keyword: self.query.clone(),
            mode: self.type_.map(|m| match m {
                ModeArg::List => "list".to_string(),
                ModeArg::Detail => "detail".to_string(),
            }),
            detail: self.no_detail.then(|| "0".to_string()),
            page: self.page.map(|p| p.to_string()),
            pages: self.pages.map(|p| p.to_string()),
            limit: self.limit.map(|l| l.to_string()),
            cookie: self.cookie.clone(),
            debug: self.debug.then(|| "1".to_string()),
            delay_ms: self.delay_ms.map(|d| d.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nowcoder_crawl::request::Mode;

    #[test]
    fn test_args_map_to_request() {
        let args = Args::parse_from([
            "nowcoder-crawl",
            "-q",
            "rust",
            "--no-detail",
            "--pages",
            "3",
            "--limit",
            "100",
            "--delay-ms",
            "0",
        ]);
        let request = args.to_params().into_request(None).unwrap();
        assert_eq!(request.keyword.as_deref(), Some("rust"));
        assert_eq!(request.mode, Mode::List);
        assert!(!request.enrich_detail);
        assert_eq!(request.page_count, 3);
        assert_eq!(request.item_limit(), 30);
        assert_eq!(request.delay, Some(std::time::Duration::ZERO));
    }

    #[test]
    fn test_forced_detail_mode() {
        let args = Args::parse_from([
            "nowcoder-crawl",
            "--url",
            "https://www.nowcoder.com/search/all?query=go",
            "--type",
            "detail",
        ]);
        let request = args.to_params().into_request(None).unwrap();
        assert_eq!(request.mode, Mode::Detail);
        assert!(request.enrich_detail);
    }
}
