use fr_core::Region;

use super::rules::{ExtractionRule, Lookup, MissingElementPolicy, NodeMatcher};
use super::SourceMetadata;

/// A listing page and the rule that turns it into articles.
#[derive(Debug, Clone, Copy)]
pub struct NewsSource {
    pub metadata: SourceMetadata,
    pub rule: ExtractionRule,
}

pub const YAHOO_FINANCE: NewsSource = NewsSource {
    metadata: SourceMetadata {
        name: "Yahoo Finance",
        emoji: "🇺🇸",
        region: Region::Us,
        url: "https://finance.yahoo.com/news/",
    },
    rule: ExtractionRule {
        scope: None,
        item: NodeMatcher::with_classes("h3", &["clamp", "yf-1y7058a"]),
        title: Lookup::Itself,
        summary: Lookup::FollowingSibling(NodeMatcher::tag("p")),
        on_missing: MissingElementPolicy::Degrade,
    },
};

pub const JAPAN_NEWS: NewsSource = NewsSource {
    metadata: SourceMetadata {
        name: "The Japan News (Yomiuri)",
        emoji: "🇯🇵",
        region: Region::Japan,
        url: "https://japannews.yomiuri.co.jp/business/economy/",
    },
    rule: ExtractionRule {
        scope: None,
        item: NodeMatcher::tag("h2"),
        title: Lookup::Itself,
        summary: Lookup::FollowingSibling(NodeMatcher::tag("h3")),
        on_missing: MissingElementPolicy::Degrade,
    },
};

pub const MONEY_TODAY: NewsSource = NewsSource {
    metadata: SourceMetadata {
        name: "Money Today",
        emoji: "🇰🇷",
        region: Region::Korea,
        url: "https://news.mt.co.kr/newsList.html?comd=7&pDepth=stock&pDepth1=sNews&pDepth2=Ftotal",
    },
    rule: ExtractionRule {
        scope: Some(NodeMatcher::with_classes("ul", &["conlist_p1"])),
        item: NodeMatcher::with_classes("li", &["bundle"]),
        title: Lookup::Descendant(NodeMatcher::with_classes("strong", &["subject"])),
        summary: Lookup::Descendant(NodeMatcher::with_classes("p", &["txt"])),
        on_missing: MissingElementPolicy::Fail,
    },
};

/// Every configured source, in fetch order.
pub static SOURCES: [NewsSource; 3] = [YAHOO_FINANCE, JAPAN_NEWS, MONEY_TODAY];

pub fn source_for(region: Region) -> &'static NewsSource {
    match region {
        Region::Us => &SOURCES[0],
        Region::Japan => &SOURCES[1],
        Region::Korea => &SOURCES[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_follow_region_order() {
        let regions: Vec<Region> = SOURCES.iter().map(|s| s.metadata.region).collect();
        assert_eq!(regions, Region::ALL.to_vec());
        for region in Region::ALL {
            assert_eq!(source_for(region).metadata.region, region);
        }
    }

    #[test]
    fn test_source_urls_parse() {
        for source in SOURCES.iter() {
            assert!(url::Url::parse(source.metadata.url).is_ok(), "{}", source.metadata.name);
        }
    }

    #[test]
    fn test_only_korea_fails_on_missing_elements() {
        assert_eq!(YAHOO_FINANCE.rule.on_missing, MissingElementPolicy::Degrade);
        assert_eq!(JAPAN_NEWS.rule.on_missing, MissingElementPolicy::Degrade);
        assert_eq!(MONEY_TODAY.rule.on_missing, MissingElementPolicy::Fail);
    }
}
